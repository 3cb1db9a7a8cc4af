//! Meal records held by the digestion model

use crate::types::MealId;
use serde::{Deserialize, Serialize};

/// Simulated hours after which a meal's contribution is considered negligible
///
/// Fixed design constant, deliberately not derived from the decay rate.
pub const MEAL_RELEVANCE_HORIZON_HOURS: f64 = 12.0;

/// A single meal in the active set
///
/// `time_eaten` is expressed on the unbounded simulated-hour axis (hours
/// since simulation start), not the mod-24 display hour, so meal aging
/// survives day boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    /// Unique identifier of this meal
    pub id: MealId,

    /// Base fullness contribution β, in (0, 1]
    pub amount: f64,

    /// Simulated hour (unbounded) at which the meal was eaten
    pub time_eaten: f64,
}

impl Meal {
    /// Create a meal eaten at the given simulated hour
    pub fn new(amount: f64, time_eaten: f64) -> Self {
        Self { id: MealId::new(), amount, time_eaten }
    }

    /// Simulated hours elapsed since this meal was eaten
    pub fn age_at(&self, now: f64) -> f64 {
        now - self.time_eaten
    }

    /// Whether the meal has aged past the relevance horizon
    pub fn is_expired_at(&self, now: f64) -> bool {
        self.age_at(now) >= MEAL_RELEVANCE_HORIZON_HOURS
    }
}
