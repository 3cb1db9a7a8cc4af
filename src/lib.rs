//! Fullness Simulator
//!
//! A stomach-fullness simulation engine driven by eating archetypes. Meal
//! events inject discrete quantities of fullness; continuous digestive decay
//! removes it over simulated time, modulated by circadian rhythm and
//! activity level. The engine exists to visualize how eating patterns (a
//! modern office worker versus a traditional low-meal-frequency eater)
//! shape fullness over days.
//!
//! # Overview
//!
//! The engine runs on a fixed real-time tick. A time-acceleration clock maps
//! wall-clock time to simulated hours at an adjustable multiple of real
//! time, continuous across speed changes thanks to per-acceleration epoch
//! bookkeeping. Each tick, the meal scheduler decides whether the archetype
//! eats, the digestion model folds all active meals into a fullness level,
//! and an `UpdateData` event carries the result to the observer.
//!
//! ## Key Features
//!
//! - **Archetype Behavior Model**: eating windows, meal cadence, and an
//!   adaptive meal-size distribution that drifts and periodically snaps back
//! - **Time Acceleration**: dynamically adjustable simulation speed with no
//!   discontinuity in simulated time
//! - **Metabolic Modulation**: circadian and sedentarism multipliers shape
//!   the digestion decay rate across the day
//! - **Message Surface**: ordered command/event channels isolate the engine
//!   from rendering and persistence collaborators
//!
//! ## Quick Start
//!
//! ```rust
//! use fullness_simulator::simulation::{ManualWallClock, SimulationController};
//! use fullness_simulator::types::ArchetypeConfig;
//!
//! let wall = ManualWallClock::new();
//! let mut controller =
//!     SimulationController::with_wall_clock(Box::new(wall.clone()), Some(42));
//! controller.start(&ArchetypeConfig::named("ModernMan")).unwrap();
//!
//! // One 100 ms tick at the baseline speed is 0.1 simulated hours
//! wall.advance_ms(100);
//! let events = controller.tick();
//! assert!(!events.is_empty());
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: identifiers, enums, and archetype/run configuration
//! - [`modulators`]: circadian and sedentarism multiplier functions
//! - [`digestion`]: meal records and the decay aggregation model
//! - [`scheduler`]: adaptive meal-size distribution, jitter, and the
//!   scheduling state machine
//! - [`simulation`]: clock, tick sources, controller, errors, and logging
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod digestion;
pub mod modulators;
pub mod scheduler;
pub mod simulation;
pub mod types;

// Re-export the primary public types

// Core types and identifiers
pub use types::{
    known_archetype,
    known_archetype_names,
    ArchetypeConfig,
    ArchetypeParams,
    CliArgs,
    ConfigValidationError,
    // Identifiers
    MealId,
    MealSize,
    OutputFormat,
    SimulationConfig,
    SimulationId,
};

// Modulators
pub use modulators::{circadian_factor, sedentarism_factor, SedentarismModel};

// Digestion
pub use digestion::{DigestionModel, Meal, MEAL_RELEVANCE_HORIZON_HOURS};

// Scheduling
pub use scheduler::{MealDistribution, MealScheduler, SchedulerState};

// Simulation control
pub use simulation::{
    Command, Event, FullnessSample, LoggingConfig, SimulationController, SimulationError,
    SimulationHandle, SimulationResult, TimeAccelerationClock,
};
