//! Digestion model and meal records
//!
//! This module contains the active meal set and the exponential-decay
//! aggregation that turns it into a fullness level.

pub mod meal;
pub mod model;

pub use meal::{Meal, MEAL_RELEVANCE_HORIZON_HOURS};
pub use model::DigestionModel;
