//! Circadian rhythm modulation of metabolic rate
//!
//! Pure day-cycle curve mapping a simulated hour to a metabolic-rate
//! multiplier. The curve is flat at the base level overnight, rises smoothly
//! from the early morning to a single mid-afternoon peak, and falls back to
//! base by late evening. Stylized heuristic, not a medical model.

/// Hour at which metabolism begins rising (03:30)
const START_HOUR: f64 = 3.5;

/// Hour of peak metabolic activity (14:00)
const PEAK_HOUR: f64 = 14.0;

/// Hour at which metabolism returns to base level (23:00)
const END_HOUR: f64 = 23.0;

/// Minimum metabolic rate multiplier
const BASE_LEVEL: f64 = 0.8;

/// Maximum metabolic rate multiplier
const PEAK_LEVEL: f64 = 1.2;

/// Metabolic-rate multiplier for the given hour of day
///
/// Returns a value in `[BASE_LEVEL, PEAK_LEVEL]`. Hours outside the active
/// window `[3.5, 23.0]` sit at the base level.
pub fn circadian_factor(hour: f64) -> f64 {
    let cycle_position = if (START_HOUR..=END_HOUR).contains(&hour) {
        let total_active_hours = END_HOUR - START_HOUR;
        let peak_position = (PEAK_HOUR - START_HOUR) / total_active_hours;
        let current_position = (hour - START_HOUR) / total_active_hours;

        // Sine arch, skewed so the maximum lands exactly at PEAK_HOUR
        let arch = (current_position * std::f64::consts::PI).sin();
        if current_position <= peak_position {
            arch * (current_position / peak_position)
        } else {
            arch * (1.0 - (current_position - peak_position) / (1.0 - peak_position))
        }
    } else {
        0.0
    };

    BASE_LEVEL + (PEAK_LEVEL - BASE_LEVEL) * cycle_position
}
