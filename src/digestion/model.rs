//! Digestion model: exponential decay of meal contributions
//!
//! Each active meal contributes `β · e^(−k·Δt)` to the current fullness,
//! where the decay rate `k` is modulated by the circadian and sedentarism
//! factors at the query hour. Total fullness is capped at 1.0.

use crate::digestion::meal::Meal;
use crate::modulators::{circadian_factor, SedentarismModel, StochasticSedentarism};
use tracing::{debug, trace};

/// Base decay constant before modulation
const BASE_DECAY_RATE: f64 = 0.27;

/// Aggregates active meals into a fullness level
///
/// Owns the active meal set and the sedentarism model used to modulate the
/// decay rate. Fullness is always recomputed from the meal set; there is no
/// cached value to go stale.
#[derive(Debug)]
pub struct DigestionModel {
    meals: Vec<Meal>,
    sedentarism: Box<dyn SedentarismModel>,
}

impl DigestionModel {
    /// Create a model with the stochastic sedentarism source
    pub fn new() -> Self {
        Self { meals: Vec::new(), sedentarism: Box::new(StochasticSedentarism::new()) }
    }

    /// Create a model with a seeded sedentarism source
    pub fn with_seed(seed: u64) -> Self {
        Self { meals: Vec::new(), sedentarism: Box::new(StochasticSedentarism::with_seed(seed)) }
    }

    /// Create a model with a caller-supplied sedentarism source
    ///
    /// Tests use this to make the decay computation deterministic.
    pub fn with_sedentarism(sedentarism: Box<dyn SedentarismModel>) -> Self {
        Self { meals: Vec::new(), sedentarism }
    }

    /// Add a meal to the active set
    pub fn add_meal(&mut self, meal: Meal) {
        debug!(meal = %meal.id, amount = meal.amount, time_eaten = meal.time_eaten, "Meal added");
        self.meals.push(meal);
    }

    /// The current active meal set
    pub fn active_meals(&self) -> &[Meal] {
        &self.meals
    }

    /// Number of meals currently active
    pub fn meal_count(&self) -> usize {
        self.meals.len()
    }

    /// Drop all meals
    pub fn clear(&mut self) {
        self.meals.clear();
    }

    /// Contribution of a single meal amount after `elapsed` hours
    ///
    /// `effective_k = k0 · circadian(hour) · (1.3 − 0.5 · sedentarism(hour))`.
    pub fn meal_contribution(
        &mut self,
        amount: f64,
        elapsed: f64,
        hour_of_day: f64,
        sed_start: f64,
        sed_end: f64,
    ) -> f64 {
        let circadian = circadian_factor(hour_of_day);
        let sedentarism = self.sedentarism.factor(hour_of_day, sed_start, sed_end);
        let sedentarism_impact = 1.3 - 0.5 * sedentarism;
        let effective_k = BASE_DECAY_RATE * circadian * sedentarism_impact;
        let contribution = amount * (-effective_k * elapsed).exp();

        trace!(
            circadian,
            sedentarism,
            effective_k,
            contribution,
            "Meal contribution computed"
        );
        contribution
    }

    /// Total fullness at the given simulated time
    ///
    /// Evicts meals past the relevance horizon, then sums the contribution of
    /// every remaining meal with positive age. The result is clamped to 1.0;
    /// it can never be negative because contributions are non-negative.
    pub fn total_fullness(
        &mut self,
        now: f64,
        hour_of_day: f64,
        sed_start: f64,
        sed_end: f64,
    ) -> f64 {
        let before = self.meals.len();
        self.meals.retain(|meal| !meal.is_expired_at(now));
        if self.meals.len() < before {
            debug!(evicted = before - self.meals.len(), remaining = self.meals.len(), "Evicted expired meals");
        }

        let mut fullness = 0.0;
        // meal_contribution needs the sedentarism model mutably, so the meal
        // list is taken out for the duration of the pass
        let meals = std::mem::take(&mut self.meals);
        for meal in &meals {
            let elapsed = meal.age_at(now);
            if elapsed > 0.0 {
                fullness +=
                    self.meal_contribution(meal.amount, elapsed, hour_of_day, sed_start, sed_end);
            }
        }
        self.meals = meals;

        fullness.min(1.0)
    }
}

impl Default for DigestionModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modulators::FixedSedentarism;

    fn deterministic_model() -> DigestionModel {
        DigestionModel::with_sedentarism(Box::new(FixedSedentarism(1.0)))
    }

    #[test]
    fn test_fresh_meal_contributes_its_amount() {
        let mut model = deterministic_model();
        let contribution = model.meal_contribution(0.7, 0.0, 12.0, 23.0, 7.0);
        assert!((contribution - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_contribution_decays_over_time() {
        let mut model = deterministic_model();
        let fresh = model.meal_contribution(1.0, 0.5, 10.0, 23.0, 7.0);
        let older = model.meal_contribution(1.0, 3.0, 10.0, 23.0, 7.0);
        assert!(older < fresh);
        assert!(older > 0.0);
    }

    #[test]
    fn test_contribution_matches_closed_form() {
        let mut model = DigestionModel::with_sedentarism(Box::new(FixedSedentarism(0.4)));
        let hour = 10.0;
        let elapsed = 2.0;
        let expected_k = 0.27 * circadian_factor(hour) * (1.3 - 0.5 * 0.4);
        let expected = 1.0 * (-expected_k * elapsed).exp();
        let actual = model.meal_contribution(1.0, elapsed, hour, 23.0, 7.0);
        assert!((actual - expected).abs() < 1e-12);
    }

    #[test]
    fn test_fullness_bounded() {
        let mut model = deterministic_model();
        for i in 0..20 {
            model.add_meal(Meal::new(1.0, i as f64 * 0.01));
        }
        let fullness = model.total_fullness(0.5, 6.5, 23.0, 7.0);
        assert!(fullness <= 1.0);
        assert!(fullness >= 0.0);
    }

    #[test]
    fn test_empty_model_is_empty_stomach() {
        let mut model = deterministic_model();
        assert_eq!(model.total_fullness(5.0, 11.0, 23.0, 7.0), 0.0);
    }

    #[test]
    fn test_meal_evicted_at_horizon() {
        let mut model = deterministic_model();
        model.add_meal(Meal::new(1.0, 2.0));
        assert!(model.total_fullness(13.9, 15.9, 23.0, 7.0) > 0.0);
        assert_eq!(model.meal_count(), 1);

        // Exactly 12 hours later the meal no longer contributes
        assert_eq!(model.total_fullness(14.0, 16.0, 23.0, 7.0), 0.0);
        assert_eq!(model.meal_count(), 0);
    }

    #[test]
    fn test_future_meal_does_not_contribute() {
        let mut model = deterministic_model();
        model.add_meal(Meal::new(0.5, 10.0));
        // Queried at the moment it was eaten: age is zero, no contribution yet
        assert_eq!(model.total_fullness(10.0, 16.0, 23.0, 7.0), 0.0);
        assert_eq!(model.meal_count(), 1);
    }

    #[test]
    fn test_clear_empties_active_set() {
        let mut model = deterministic_model();
        model.add_meal(Meal::new(0.3, 1.0));
        model.add_meal(Meal::new(0.1, 2.0));
        model.clear();
        assert_eq!(model.meal_count(), 0);
    }
}
