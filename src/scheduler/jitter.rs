//! Randomized meal-time jitter
//!
//! Scheduled meal times are offset by a discretized random adjustment so
//! eating never becomes perfectly periodic.

use rand::Rng;

/// Jitter adjustments in hours, with their draw weights
const TIME_ADJUSTMENTS: [(f64, f64); 5] =
    [(-1.0, 0.05), (-0.5, 0.18), (0.0, 0.55), (0.5, 0.17), (1.0, 0.05)];

/// Draw a meal-time adjustment in hours
///
/// Cumulative draw over the adjustment table. Falls back to the neutral
/// adjustment (0) if floating-point drift leaves the cumulative weights
/// short of 1.0.
pub fn draw_jitter<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let roll = rng.gen::<f64>();
    let mut cumulative = 0.0;
    for (adjustment, weight) in TIME_ADJUSTMENTS {
        cumulative += weight;
        if roll < cumulative {
            return adjustment;
        }
    }
    0.0
}
