//! Adaptive meal-size probability distribution
//!
//! The scheduler draws meal sizes from a four-bucket distribution that
//! drifts after every meal (the drawn bucket loses probability mass to the
//! others) and snaps back to the archetype default at a day boundary once
//! the cumulative drift crosses a threshold.

use crate::types::MealSize;
use rand::Rng;
use tracing::{debug, warn};

/// Probability mass moved away from the drawn bucket after each meal
const ADJUSTMENT_STEP: f64 = 0.025;

/// Cumulative drift at which the distribution resets to its default
pub const DRIFT_RESET_THRESHOLD: f64 = 0.13;

/// Meal-size distribution with drift bookkeeping
///
/// `current` is the live vector the scheduler draws from; `default` is the
/// archetype's configured vector used for drift measurement and resets.
#[derive(Debug, Clone, PartialEq)]
pub struct MealDistribution {
    default: [f64; 4],
    current: [f64; 4],
}

impl MealDistribution {
    /// Create a distribution from an already-normalized default vector
    pub fn new(default: [f64; 4]) -> Self {
        Self { default, current: default }
    }

    /// The live probability vector
    pub fn current(&self) -> [f64; 4] {
        self.current
    }

    /// The archetype's default probability vector
    pub fn default_vector(&self) -> [f64; 4] {
        self.default
    }

    /// Draw a meal size from the live vector
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> MealSize {
        self.select(rng.gen::<f64>())
    }

    /// Resolve a uniform roll in [0, 1) into a meal size
    ///
    /// Cumulative-probability draw: the roll selects the first bucket whose
    /// cumulative threshold exceeds it (strict comparison, so a roll equal to
    /// a bucket's upper edge falls into the next bucket). If floating-point
    /// drift leaves the cumulative sum short of 1.0, the draw resolves to the
    /// last bucket.
    pub fn select(&self, roll: f64) -> MealSize {
        let mut cumulative = 0.0;
        for (index, &probability) in self.current.iter().enumerate() {
            cumulative += probability;
            if roll < cumulative {
                return MealSize::from_index(index).unwrap_or(MealSize::AbsoluteMax);
            }
        }
        MealSize::AbsoluteMax
    }

    /// Shift probability mass away from the drawn bucket
    ///
    /// The drawn bucket loses `ADJUSTMENT_STEP` (floored at zero); the same
    /// step is redistributed across the other three buckets proportionally to
    /// their current mass, and the vector is renormalized to sum to exactly 1.
    pub fn adjust(&mut self, size: MealSize) {
        let chosen = size.index();
        self.current[chosen] = (self.current[chosen] - ADJUSTMENT_STEP).max(0.0);

        let remaining_total: f64 = self
            .current
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != chosen)
            .map(|(_, value)| value)
            .sum();

        if remaining_total > 0.0 {
            for index in 0..4 {
                if index != chosen {
                    let increment = ADJUSTMENT_STEP * self.current[index] / remaining_total;
                    self.current[index] = (self.current[index] + increment).min(1.0);
                }
            }
        } else {
            warn!("All other meal-size buckets are empty, skipping redistribution");
        }

        let total: f64 = self.current.iter().sum();
        for value in &mut self.current {
            *value /= total;
        }

        debug!(distribution = ?self.current, "Meal distribution adjusted after {} meal", size);
    }

    /// Cumulative drift from the default vector
    pub fn drift_offset(&self) -> f64 {
        self.default
            .iter()
            .zip(self.current.iter())
            .map(|(default, current)| (default - current).abs())
            .sum()
    }

    /// Reset to the default vector if drift has crossed the threshold
    ///
    /// Called once per simulated day boundary. Returns true when a reset
    /// happened; otherwise the drifted vector carries into the new day.
    pub fn check_and_reset(&mut self) -> bool {
        let offset = self.drift_offset();
        if offset >= DRIFT_RESET_THRESHOLD {
            debug!(offset, "Cumulative drift exceeded threshold, resetting meal distribution");
            self.current = self.default;
            true
        } else {
            debug!(offset, "Meal distribution continues from previous day");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const MODERN_MAN: [f64; 4] = [0.15, 0.35, 0.44, 0.06];

    fn assert_conserved(distribution: &MealDistribution) {
        let sum: f64 = distribution.current().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "sum drifted to {}", sum);
        for &value in distribution.current().iter() {
            assert!(value >= 0.0, "negative probability {}", value);
        }
    }

    #[test]
    fn test_adjust_conserves_probability_mass() {
        let mut distribution = MealDistribution::new(MODERN_MAN);
        for size in MealSize::ALL {
            distribution.adjust(size);
            assert_conserved(&distribution);
        }
    }

    #[test]
    fn test_adjust_moves_mass_off_drawn_bucket() {
        let mut distribution = MealDistribution::new(MODERN_MAN);
        let before = distribution.current();
        distribution.adjust(MealSize::Big);
        let after = distribution.current();
        assert!(after[2] < before[2]);
        assert!(after[0] > before[0]);
        assert!(after[1] > before[1]);
        assert!(after[3] > before[3]);
    }

    #[test]
    fn test_adjust_floors_small_bucket_at_zero() {
        let mut distribution = MealDistribution::new([0.01, 0.33, 0.33, 0.33]);
        distribution.adjust(MealSize::Small);
        assert_conserved(&distribution);
        assert!(distribution.current()[0] >= 0.0);
    }

    #[test]
    fn test_repeated_adjustment_stays_conserved() {
        let mut distribution = MealDistribution::new(MODERN_MAN);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let size = distribution.draw(&mut rng);
            distribution.adjust(size);
            assert_conserved(&distribution);
        }
    }

    #[test]
    fn test_drift_reset_at_threshold() {
        let mut distribution = MealDistribution::new(MODERN_MAN);
        // Drift the vector until the cumulative offset crosses the threshold
        while distribution.drift_offset() < DRIFT_RESET_THRESHOLD {
            distribution.adjust(MealSize::Big);
        }
        assert!(distribution.check_and_reset());
        assert_eq!(distribution.current(), MODERN_MAN);
        assert_eq!(distribution.drift_offset(), 0.0);
    }

    #[test]
    fn test_no_reset_below_threshold() {
        let mut distribution = MealDistribution::new(MODERN_MAN);
        distribution.adjust(MealSize::Medium);
        let drifted = distribution.current();
        assert!(distribution.drift_offset() < DRIFT_RESET_THRESHOLD);
        assert!(!distribution.check_and_reset());
        assert_eq!(distribution.current(), drifted);
    }

    #[test]
    fn test_select_boundary_is_exclusive() {
        let distribution = MealDistribution::new(MODERN_MAN);
        // A roll of exactly 0.15 is not < 0.15, so it lands in Medium
        assert_eq!(distribution.select(0.15), MealSize::Medium);
    }

    #[test]
    fn test_select_high_roll_selects_last_bucket() {
        let distribution = MealDistribution::new(MODERN_MAN);
        assert_eq!(distribution.select(0.999), MealSize::AbsoluteMax);
    }

    #[test]
    fn test_select_low_roll_selects_first_bucket() {
        let distribution = MealDistribution::new(MODERN_MAN);
        assert_eq!(distribution.select(0.0), MealSize::Small);
    }

    #[test]
    fn test_select_resolves_residual_probability() {
        // Even a roll of 1.0 (impossible from a uniform draw, but reachable
        // through float drift in the cumulative sum) resolves deterministically
        let distribution = MealDistribution::new(MODERN_MAN);
        assert_eq!(distribution.select(1.0), MealSize::AbsoluteMax);
    }

    #[test]
    fn test_draw_respects_distribution_statistically() {
        let distribution = MealDistribution::new([0.5, 0.5, 0.0, 0.0]);
        let mut rng = StdRng::seed_from_u64(11);
        let mut counts = [0usize; 4];
        for _ in 0..2000 {
            counts[distribution.draw(&mut rng).index()] += 1;
        }
        assert_eq!(counts[2], 0);
        assert_eq!(counts[3], 0);
        assert!(counts[0] > 800 && counts[1] > 800);
    }
}
