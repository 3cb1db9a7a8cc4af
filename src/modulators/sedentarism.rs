//! Sedentarism (activity level) modulation of digestion
//!
//! Maps a simulated hour to an activity multiplier between fully active
//! (0.2) and fully sedentary (1.0, the sleep window). Transitions into and
//! out of the sleep window follow a quadratic ease perturbed by biased random
//! variation, so no two days look identical.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Activity multiplier while fully sedentary (asleep)
pub const SLEEP_LEVEL: f64 = 1.0;

/// Activity multiplier during the most active part of the day
pub const MIN_LEVEL: f64 = 0.2;

/// Shortest possible wake/wind-down transition, in hours
const TRANSITION_MIN_HOURS: f64 = 1.5;

/// Longest possible wake/wind-down transition, in hours
const TRANSITION_MAX_HOURS: f64 = 2.0;

/// Perturb a value by a biased random variation
///
/// With probability `upward_bias` the variation is positive, otherwise
/// negative; its magnitude is uniform in `[0, percentage · value)`. The
/// result never drops below the minimum sedentarism level.
fn add_biased_variation<R: Rng + ?Sized>(
    value: f64,
    percentage: f64,
    upward_bias: f64,
    rng: &mut R,
) -> f64 {
    let bias = if rng.gen::<f64>() < upward_bias { 1.0 } else { -1.0 };
    let variation = bias * rng.gen::<f64>() * percentage * value;
    (value + variation).max(MIN_LEVEL)
}

/// Activity multiplier for the given hour of day
///
/// `sed_start`/`sed_end` bound the daily full-sedentarism window; unlike the
/// eating window, this one may wrap across midnight. The transition length is
/// redrawn on every call, which is what gives the factor its day-to-day
/// variation.
pub fn sedentarism_factor<R: Rng + ?Sized>(
    hour: f64,
    sed_start: f64,
    sed_end: f64,
    rng: &mut R,
) -> f64 {
    let transition_length =
        rng.gen::<f64>() * (TRANSITION_MAX_HOURS - TRANSITION_MIN_HOURS) + TRANSITION_MIN_HOURS;

    let in_sleep_window = if sed_start <= sed_end {
        (sed_start..sed_end).contains(&hour)
    } else {
        hour >= sed_start || hour < sed_end
    };

    if in_sleep_window {
        // Deep sleep is static, no variation
        SLEEP_LEVEL
    } else if hour < sed_end + transition_length {
        // Waking up: quadratic ease from sleep toward the active floor
        let progress = (hour - sed_end) / transition_length;
        let factor = SLEEP_LEVEL - (SLEEP_LEVEL - MIN_LEVEL) * progress.powi(2);
        add_biased_variation(factor, 0.13, 0.58, rng)
    } else if hour >= sed_start - transition_length {
        // Winding down toward sleep
        let progress = (sed_start - hour) / transition_length;
        let factor = SLEEP_LEVEL - (SLEEP_LEVEL - MIN_LEVEL) * progress.powi(2);
        add_biased_variation(factor, 0.15, 0.25, rng)
    } else {
        // Active day period, large upward-biased variation off the floor
        add_biased_variation(MIN_LEVEL, 1.5, 0.88, rng)
    }
}

/// Source of sedentarism factors for the digestion model
///
/// The seam exists so the decay computation can be exercised with a
/// deterministic activity level in tests.
pub trait SedentarismModel: std::fmt::Debug + Send {
    /// Activity multiplier for the given hour and sedentarism window
    fn factor(&mut self, hour: f64, sed_start: f64, sed_end: f64) -> f64;
}

/// Production model: the stochastic factor backed by a seedable RNG
#[derive(Debug)]
pub struct StochasticSedentarism {
    rng: StdRng,
}

impl StochasticSedentarism {
    /// Create a model seeded from entropy
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    /// Create a model with a deterministic seed
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for StochasticSedentarism {
    fn default() -> Self {
        Self::new()
    }
}

impl SedentarismModel for StochasticSedentarism {
    fn factor(&mut self, hour: f64, sed_start: f64, sed_end: f64) -> f64 {
        sedentarism_factor(hour, sed_start, sed_end, &mut self.rng)
    }
}

/// Test model returning a constant activity multiplier
#[derive(Debug, Clone, Copy)]
pub struct FixedSedentarism(pub f64);

impl SedentarismModel for FixedSedentarism {
    fn factor(&mut self, _hour: f64, _sed_start: f64, _sed_end: f64) -> f64 {
        self.0
    }
}
