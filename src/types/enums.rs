//! Enumeration types for the fullness simulator
//!
//! This module contains the meal size buckets drawn by the scheduler and the
//! output formats supported by the sample writer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Meal size buckets drawn from the scheduler's probability distribution
///
/// The four buckets line up index-for-index with the archetype's
/// `meal_distribution` vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealSize {
    /// Light snack
    Small,
    /// Regular meal
    Medium,
    /// Heavy meal
    Big,
    /// Full stomach in one sitting
    AbsoluteMax,
}

impl MealSize {
    /// All sizes, in distribution-vector order
    pub const ALL: [MealSize; 4] =
        [MealSize::Small, MealSize::Medium, MealSize::Big, MealSize::AbsoluteMax];

    /// Base fullness contribution (β) injected when a meal of this size is eaten
    pub fn amount(&self) -> f64 {
        match self {
            MealSize::Small => 0.1,
            MealSize::Medium => 0.3,
            MealSize::Big => 0.7,
            MealSize::AbsoluteMax => 1.0,
        }
    }

    /// Index of this size in the distribution vector
    pub fn index(&self) -> usize {
        match self {
            MealSize::Small => 0,
            MealSize::Medium => 1,
            MealSize::Big => 2,
            MealSize::AbsoluteMax => 3,
        }
    }

    /// Size at the given distribution-vector index
    pub fn from_index(index: usize) -> Option<MealSize> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for MealSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealSize::Small => write!(f, "Small"),
            MealSize::Medium => write!(f, "Medium"),
            MealSize::Big => write!(f, "Big"),
            MealSize::AbsoluteMax => write!(f, "Absolute Max"),
        }
    }
}

impl FromStr for MealSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(MealSize::Small),
            "medium" => Ok(MealSize::Medium),
            "big" => Ok(MealSize::Big),
            "absolute max" | "absolutemax" | "max" => Ok(MealSize::AbsoluteMax),
            _ => Err(format!("Unknown meal size: {}", s)),
        }
    }
}

/// Output formats for generated fullness samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// JSON Lines format (one sample object per line)
    Json,
    /// Comma-separated values with a header row
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" | "jsonl" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown output format: {} (expected json or csv)", s)),
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Json
    }
}
