//! Configuration structures for the fullness simulator
//!
//! This module contains the archetype configuration record consumed by the
//! engine, the simulation run configuration, and the CLI argument surface
//! used by the batch driver.

use super::OutputFormat;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Hard defaults used when neither the known-archetype table nor the caller
/// supplies a field
pub mod defaults {
    /// Default daily hour at which eating may begin
    pub const START_EATING_HOUR: f64 = 6.0;

    /// Default daily hour at which eating stops
    pub const STOP_EATING_HOUR: f64 = 22.0;

    /// Default average spacing between meals, in simulated hours
    pub const MEAL_INTERVAL: f64 = 2.0;

    /// Default start of the full-sedentarism (sleep) window
    pub const FULL_SEDENTARISM_START_HOUR: f64 = 23.0;

    /// Default end of the full-sedentarism (sleep) window
    pub const FULL_SEDENTARISM_END_HOUR: f64 = 6.0;

    /// Default meal size distribution (uniform over the four buckets)
    pub const MEAL_DISTRIBUTION: [f64; 4] = [0.25, 0.25, 0.25, 0.25];
}

/// Tolerance when checking that a meal distribution sums to 1.0
const DISTRIBUTION_SUM_TOLERANCE: f64 = 1e-6;

/// Errors produced while validating configuration input
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    /// An hour value fell outside [0, 24)
    #[error("hour value {value} for {field} is outside [0, 24)")]
    HourOutOfRange {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value
        value: f64,
    },

    /// The eating window would wrap past midnight
    #[error("eating window [{start}, {stop}) must not wrap midnight (stop must exceed start)")]
    EatingWindowWraps {
        /// Configured start of the eating window
        start: f64,
        /// Configured stop of the eating window
        stop: f64,
    },

    /// The meal interval is not a positive number of hours
    #[error("meal interval must be positive, got {0}")]
    NonPositiveMealInterval(f64),

    /// A meal distribution entry is negative
    #[error("meal distribution entry {index} is negative: {value}")]
    NegativeDistributionEntry {
        /// Index of the negative entry
        index: usize,
        /// The rejected value
        value: f64,
    },

    /// The meal distribution sums to zero and cannot be normalized
    #[error("meal distribution sums to zero and cannot be normalized")]
    ZeroDistribution,

    /// The speed multiplier is not positive
    #[error("speed multiplier must be positive, got {0}")]
    NonPositiveSpeed(f64),

    /// The simulated-day count is not positive
    #[error("simulated days must be positive, got {0}")]
    NonPositiveDays(f64),
}

/// Archetype configuration record, as received from the collaborator layer
///
/// Every field except `name` is optional; resolution fills the gaps from the
/// known-archetype table and hard defaults. See [`ArchetypeParams::resolve`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ArchetypeConfig {
    /// Archetype identifier, looked up in the known table first
    pub name: String,

    /// Daily hour at which eating may begin, in [0, 24)
    pub start_eating_hour: Option<f64>,

    /// Daily hour at which eating stops, in [0, 24); must exceed the start
    pub stop_eating_hour: Option<f64>,

    /// Average spacing between meals, in simulated hours
    pub meal_interval: Option<f64>,

    /// Probabilities of {Small, Medium, Big, AbsoluteMax} meals, summing to 1.0
    pub meal_distribution: Option<[f64; 4]>,

    /// Start of the daily full-sedentarism window (may wrap midnight)
    pub full_sedentarism_start_hour: Option<f64>,

    /// End of the daily full-sedentarism window (may wrap midnight)
    pub full_sedentarism_end_hour: Option<f64>,
}

impl ArchetypeConfig {
    /// Create a configuration that only names a known archetype
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }
}

/// Fully resolved archetype parameters driving the meal scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeParams {
    /// Archetype name, kept for log output
    pub name: String,

    /// Daily hour at which eating may begin
    pub start_eating_hour: f64,

    /// Daily hour at which eating stops (closed-open window `[start, stop)`)
    pub stop_eating_hour: f64,

    /// Average spacing between meals, in simulated hours
    pub meal_interval: f64,

    /// Default meal size distribution; the scheduler's live copy drifts from this
    pub meal_distribution: [f64; 4],

    /// Start of the daily full-sedentarism window
    pub full_sedentarism_start_hour: f64,

    /// End of the daily full-sedentarism window
    pub full_sedentarism_end_hour: f64,
}

impl ArchetypeParams {
    /// Resolve an archetype configuration into concrete parameters
    ///
    /// Resolution order: known-archetype table by name, then caller-supplied
    /// fields, then hard defaults. An unknown name is not an error: the
    /// caller-supplied fields (or defaults) are used with a logged warning.
    /// A distribution that fails to sum to 1.0 is normalized rather than
    /// rejected.
    pub fn resolve(config: &ArchetypeConfig) -> Result<Self, ConfigValidationError> {
        if let Some(known) = known_archetype(&config.name) {
            return Ok(known);
        }

        if !config.name.is_empty() {
            warn!(
                archetype = %config.name,
                "Archetype not found in known table, using caller-supplied values with defaults"
            );
        }

        let params = Self {
            name: if config.name.is_empty() { "Custom".to_string() } else { config.name.clone() },
            start_eating_hour: config.start_eating_hour.unwrap_or(defaults::START_EATING_HOUR),
            stop_eating_hour: config.stop_eating_hour.unwrap_or(defaults::STOP_EATING_HOUR),
            meal_interval: config.meal_interval.unwrap_or(defaults::MEAL_INTERVAL),
            meal_distribution: config.meal_distribution.unwrap_or(defaults::MEAL_DISTRIBUTION),
            full_sedentarism_start_hour: config
                .full_sedentarism_start_hour
                .unwrap_or(defaults::FULL_SEDENTARISM_START_HOUR),
            full_sedentarism_end_hour: config
                .full_sedentarism_end_hour
                .unwrap_or(defaults::FULL_SEDENTARISM_END_HOUR),
        };
        params.validated()
    }

    /// Validate hour ranges and the eating window, normalizing the distribution
    fn validated(mut self) -> Result<Self, ConfigValidationError> {
        check_hour("start_eating_hour", self.start_eating_hour)?;
        check_hour("stop_eating_hour", self.stop_eating_hour)?;
        check_hour("full_sedentarism_start_hour", self.full_sedentarism_start_hour)?;
        check_hour("full_sedentarism_end_hour", self.full_sedentarism_end_hour)?;

        // The eating window never wraps midnight; the sedentarism window may.
        if self.stop_eating_hour <= self.start_eating_hour {
            return Err(ConfigValidationError::EatingWindowWraps {
                start: self.start_eating_hour,
                stop: self.stop_eating_hour,
            });
        }
        if self.meal_interval <= 0.0 {
            return Err(ConfigValidationError::NonPositiveMealInterval(self.meal_interval));
        }

        self.meal_distribution = normalize_distribution(self.meal_distribution)?;
        Ok(self)
    }
}

/// Check that an hour value lies in [0, 24)
fn check_hour(field: &'static str, value: f64) -> Result<(), ConfigValidationError> {
    if !(0.0..24.0).contains(&value) || value.is_nan() {
        return Err(ConfigValidationError::HourOutOfRange { field, value });
    }
    Ok(())
}

/// Normalize a distribution so its entries sum to exactly 1.0
///
/// Negative entries are rejected; a sum off by more than the tolerance is
/// normalized with a logged warning instead of being rejected.
pub fn normalize_distribution(distribution: [f64; 4]) -> Result<[f64; 4], ConfigValidationError> {
    for (index, &value) in distribution.iter().enumerate() {
        if value < 0.0 || value.is_nan() {
            return Err(ConfigValidationError::NegativeDistributionEntry { index, value });
        }
    }

    let sum: f64 = distribution.iter().sum();
    if sum <= 0.0 {
        return Err(ConfigValidationError::ZeroDistribution);
    }
    if (sum - 1.0).abs() > DISTRIBUTION_SUM_TOLERANCE {
        warn!(sum, "Meal distribution does not sum to 1.0, normalizing");
    }

    let mut normalized = distribution;
    for value in &mut normalized {
        *value /= sum;
    }
    Ok(normalized)
}

/// Look up a known archetype by name
pub fn known_archetype(name: &str) -> Option<ArchetypeParams> {
    match name {
        "ModernMan" => Some(ArchetypeParams {
            name: "ModernMan".to_string(),
            start_eating_hour: 6.0,
            stop_eating_hour: 22.0,
            meal_interval: 1.5,
            meal_distribution: [0.15, 0.35, 0.44, 0.06],
            full_sedentarism_start_hour: 18.0,
            full_sedentarism_end_hour: 7.0,
        }),
        "PonPon" => Some(ArchetypeParams {
            name: "PonPon".to_string(),
            start_eating_hour: 7.0,
            stop_eating_hour: 18.0,
            meal_interval: 4.0,
            meal_distribution: [0.05, 0.31, 0.64, 0.02],
            full_sedentarism_start_hour: 15.0,
            full_sedentarism_end_hour: 8.0,
        }),
        "Lao" => Some(ArchetypeParams {
            name: "Lao".to_string(),
            start_eating_hour: 8.0,
            stop_eating_hour: 22.0,
            meal_interval: 5.0,
            meal_distribution: [0.05, 0.21, 0.58, 0.16],
            full_sedentarism_start_hour: 18.0,
            full_sedentarism_end_hour: 5.0,
        }),
        _ => None,
    }
}

/// Names of the archetypes built into the known table
pub fn known_archetype_names() -> &'static [&'static str] {
    &["ModernMan", "PonPon", "Lao"]
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fullness-simulator",
    version,
    about = "Fullness Simulator - models stomach fullness over simulated time",
    long_about = "Runs the stomach fullness simulation engine for an eating archetype, \
producing a stream of (simulated time, fullness) samples.

EXAMPLES:
    # Run the ModernMan archetype for two simulated days
    fullness-simulator --archetype ModernMan --days 2

    # Use a configuration file
    fullness-simulator --config run.json

    # Override specific settings
    fullness-simulator --archetype Lao --speed 1800 --seed 42

    # Generate configuration template
    fullness-simulator --print-config > my-config.json

    # Validate configuration without running
    fullness-simulator --config my-config.json --dry-run

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(short, long, help = "Configuration file path (JSON format)")]
    pub config: Option<String>,

    /// Archetype to simulate
    #[arg(
        long,
        help = "Archetype name (ModernMan, PonPon, Lao, or custom)",
        long_help = "Archetype name. Known names resolve from the built-in table; \
unknown names fall back to the archetype field overrides and defaults."
    )]
    pub archetype: Option<String>,

    /// Daily hour at which eating may begin
    #[arg(long, help = "Eating window start hour [0, 24)")]
    pub start_eating_hour: Option<f64>,

    /// Daily hour at which eating stops
    #[arg(long, help = "Eating window stop hour [0, 24)")]
    pub stop_eating_hour: Option<f64>,

    /// Average spacing between meals in simulated hours
    #[arg(long, help = "Average hours between meals")]
    pub meal_interval: Option<f64>,

    /// Meal size distribution as four comma-separated probabilities
    #[arg(
        long,
        value_delimiter = ',',
        num_args = 4,
        help = "Meal size distribution, e.g. 0.15,0.35,0.44,0.06"
    )]
    pub meal_distribution: Option<Vec<f64>>,

    /// Start of the full-sedentarism (sleep) window
    #[arg(long, help = "Full sedentarism window start hour [0, 24)")]
    pub sedentarism_start_hour: Option<f64>,

    /// End of the full-sedentarism (sleep) window
    #[arg(long, help = "Full sedentarism window end hour [0, 24)")]
    pub sedentarism_end_hour: Option<f64>,

    /// Speed multiplier (3600 = one simulated hour per real second)
    #[arg(
        long,
        help = "Speed multiplier (3600 = 1 simulated hour per real second; smaller = faster)"
    )]
    pub speed: Option<f64>,

    /// Number of simulated days to run
    #[arg(long, help = "Simulated days to run")]
    pub days: Option<f64>,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Output format for generated samples
    #[arg(long, help = "Output format (json or csv)")]
    pub output_format: Option<String>,

    /// Output path for fullness samples
    #[arg(long, help = "Output path for fullness samples (stdout if omitted)")]
    pub samples_output: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Dry run mode - validate configuration without running the simulation
    #[arg(long, help = "Validate configuration without running the simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Archetype configuration
    pub archetype: Option<ArchetypeConfig>,

    /// Speed multiplier
    pub speed_multiplier: Option<f64>,

    /// Number of simulated days to run
    pub days: Option<f64>,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// Output format for generated samples
    pub output_format: Option<String>,

    /// Output path for fullness samples
    pub samples_output: Option<String>,
}

impl ConfigFile {
    /// Load a configuration file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))
    }
}

/// Configuration for a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Archetype to simulate
    pub archetype: ArchetypeConfig,

    /// Speed multiplier (3600 = one simulated hour per real second)
    pub speed_multiplier: f64,

    /// Number of simulated days to run (batch driver only)
    pub days: f64,

    /// Random seed; None draws from entropy
    pub seed: Option<u64>,

    /// Output format for generated samples
    pub output_format: OutputFormat,

    /// Output path for fullness samples; None writes to stdout
    pub samples_output: Option<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            archetype: ArchetypeConfig::named("ModernMan"),
            speed_multiplier: 3600.0,
            days: 2.0,
            seed: None,
            output_format: OutputFormat::Json,
            samples_output: None,
        }
    }
}

impl SimulationConfig {
    /// Build a configuration from CLI arguments and an optional config file
    ///
    /// CLI arguments override file settings, which override defaults.
    pub fn from_cli_args(args: CliArgs) -> Result<Self, String> {
        let file = match &args.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };

        let defaults = SimulationConfig::default();
        let mut archetype = file.archetype.unwrap_or(defaults.archetype);

        if let Some(name) = args.archetype {
            archetype.name = name;
        }
        if let Some(hour) = args.start_eating_hour {
            archetype.start_eating_hour = Some(hour);
        }
        if let Some(hour) = args.stop_eating_hour {
            archetype.stop_eating_hour = Some(hour);
        }
        if let Some(interval) = args.meal_interval {
            archetype.meal_interval = Some(interval);
        }
        if let Some(distribution) = args.meal_distribution {
            let entries: [f64; 4] = distribution
                .try_into()
                .map_err(|_| "Meal distribution must have exactly 4 entries".to_string())?;
            archetype.meal_distribution = Some(entries);
        }
        if let Some(hour) = args.sedentarism_start_hour {
            archetype.full_sedentarism_start_hour = Some(hour);
        }
        if let Some(hour) = args.sedentarism_end_hour {
            archetype.full_sedentarism_end_hour = Some(hour);
        }

        let output_format = match args.output_format.or(file.output_format) {
            Some(raw) => raw.parse().map_err(|e: String| e)?,
            None => defaults.output_format,
        };

        Ok(Self {
            archetype,
            speed_multiplier: args
                .speed
                .or(file.speed_multiplier)
                .unwrap_or(defaults.speed_multiplier),
            days: args.days.or(file.days).unwrap_or(defaults.days),
            seed: args.seed.or(file.seed),
            output_format,
            samples_output: args.samples_output.or(file.samples_output),
        })
    }

    /// Validate the run configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.speed_multiplier <= 0.0 || self.speed_multiplier.is_nan() {
            return Err(ConfigValidationError::NonPositiveSpeed(self.speed_multiplier));
        }
        if self.days <= 0.0 || self.days.is_nan() {
            return Err(ConfigValidationError::NonPositiveDays(self.days));
        }
        ArchetypeParams::resolve(&self.archetype)?;
        Ok(())
    }

    /// Serialize the configuration as pretty JSON
    pub fn print_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
