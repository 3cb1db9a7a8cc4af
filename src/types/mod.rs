//! Core types for the fullness simulator
//!
//! This module contains identifier types, enumerations, and configuration
//! structures used throughout the simulation engine.

pub mod config;
pub mod enums;
pub mod identifiers;

pub use config::{
    known_archetype, known_archetype_names, normalize_distribution, ArchetypeConfig,
    ArchetypeParams, CliArgs, ConfigFile, ConfigValidationError, SimulationConfig,
};
pub use enums::{MealSize, OutputFormat};
pub use identifiers::{MealId, SimulationId};
