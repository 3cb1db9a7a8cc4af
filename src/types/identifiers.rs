//! Unique identifier types for the fullness simulator
//!
//! This module contains UUID-based identifier types for meals and simulation
//! instances used throughout the engine.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a meal in the active set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MealId(pub Uuid);

impl MealId {
    /// Create a new random meal ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MealId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MEAL_{}", self.0.simple())
    }
}

impl Serialize for MealId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("MEAL_{}", self.0.simple()))
    }
}

impl<'de> Deserialize<'de> for MealId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if let Some(uuid_str) = s.strip_prefix("MEAL_") {
            let uuid = Uuid::parse_str(uuid_str).map_err(serde::de::Error::custom)?;
            Ok(MealId(uuid))
        } else {
            // Fallback: raw UUID for data produced before the prefix existed
            let uuid = Uuid::parse_str(&s).map_err(serde::de::Error::custom)?;
            Ok(MealId(uuid))
        }
    }
}

/// Unique identifier for a simulation instance
///
/// Several simulations may run concurrently (one per archetype card), so the
/// identifier is carried in log output to tell their tick streams apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimulationId(pub Uuid);

impl SimulationId {
    /// Create a new random simulation ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SimulationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SimulationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SIM_{}", self.0.simple())
    }
}

impl Serialize for SimulationId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("SIM_{}", self.0.simple()))
    }
}

impl<'de> Deserialize<'de> for SimulationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if let Some(uuid_str) = s.strip_prefix("SIM_") {
            let uuid = Uuid::parse_str(uuid_str).map_err(serde::de::Error::custom)?;
            Ok(SimulationId(uuid))
        } else {
            let uuid = Uuid::parse_str(&s).map_err(serde::de::Error::custom)?;
            Ok(SimulationId(uuid))
        }
    }
}
