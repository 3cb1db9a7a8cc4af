//! Archetype meal scheduling
//!
//! This module contains the adaptive meal-size distribution, the meal-time
//! jitter draw, and the scheduling state machine that decides when the
//! simulated eater has a meal.

pub mod distribution;
pub mod jitter;
pub mod meal_scheduler;

pub use distribution::{MealDistribution, DRIFT_RESET_THRESHOLD};
pub use jitter::draw_jitter;
pub use meal_scheduler::{MealScheduler, SchedulerState};
