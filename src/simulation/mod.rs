//! Simulation orchestration and control
//!
//! This module contains the time-acceleration clock, the tick source
//! abstraction, the sample buffer, the simulation controller with its
//! command/event surface, error types, and logging configuration.

pub mod clock;
pub mod controller;
pub mod error;
pub mod logging;
pub mod samples;
pub mod tick;

pub use clock::{
    acceleration_for_multiplier, ManualWallClock, SystemWallClock, TimeAccelerationClock,
    WallClock, SIMULATION_START_HOUR,
};
pub use controller::{
    run_simulation, Command, Event, SimulationController, SimulationHandle,
};
pub use error::{SimulationError, SimulationResult};
pub use logging::LoggingConfig;
pub use samples::{FullnessSample, SampleBuffer, SAMPLE_CAPACITY};
pub use tick::{ImmediateTicker, IntervalTicker, TickSource, VirtualTicker, TICK_PERIOD_MS};
