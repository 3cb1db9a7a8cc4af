//! Metabolic modulator functions
//!
//! Circadian rhythm and sedentarism multipliers that scale the digestion
//! decay rate by time of day.

pub mod circadian;
pub mod sedentarism;

pub use circadian::circadian_factor;
pub use sedentarism::{
    sedentarism_factor, FixedSedentarism, SedentarismModel, StochasticSedentarism,
};
