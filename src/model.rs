/// Core data types for the rockfall monitoring demo service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond range clamping, no I/O, and no randomness —
/// only types and the error taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

/// Clamp ceiling for rainfall, in millimeters.
pub const RAINFALL_MAX_MM: f64 = 300.0;

/// Clamp ceiling for seismic magnitude.
pub const SEISMIC_MAX_MAG: f64 = 10.0;

/// Clamp ceiling for blasting activity level.
pub const BLASTING_MAX_LEVEL: f64 = 100.0;

/// The three externally adjustable "what-if" inputs driving every derived
/// risk computation. Initialized to zeros at process start and mutated only
/// through [`SimulationState::apply`] and the periodic drift tick, so the
/// clamp invariant holds after every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationState {
    /// Rainfall over the last 24h, mm, in [0, 300].
    pub rainfall_mm: f64,
    /// Peak seismic magnitude, in [0, 10].
    pub seismic_mag: f64,
    /// Blasting activity level, in [0, 100].
    pub blasting_level: f64,
}

/// Partial update payload for the simulation state. Absent fields leave the
/// corresponding state field unchanged. Non-numeric JSON input fails at
/// deserialization, before it can reach the engine.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SimulationUpdate {
    pub rainfall_mm: Option<f64>,
    pub seismic_mag: Option<f64>,
    pub blasting_level: Option<f64>,
}

impl Default for SimulationState {
    fn default() -> Self {
        SimulationState {
            rainfall_mm: 0.0,
            seismic_mag: 0.0,
            blasting_level: 0.0,
        }
    }
}

impl SimulationState {
    /// Applies a partial update, clamping each present field into its range.
    ///
    /// Validation happens before any assignment: a non-finite value in any
    /// present field rejects the whole update and leaves the state untouched.
    pub fn apply(&mut self, update: &SimulationUpdate) -> Result<(), EngineError> {
        for (field, value) in [
            ("rainfallMm", update.rainfall_mm),
            ("seismicMag", update.seismic_mag),
            ("blastingLevel", update.blasting_level),
        ] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(EngineError::InvalidParameter {
                        field: field.to_string(),
                        reason: "value must be a finite number".to_string(),
                    });
                }
            }
        }
        if let Some(v) = update.rainfall_mm {
            self.rainfall_mm = v.clamp(0.0, RAINFALL_MAX_MM);
        }
        if let Some(v) = update.seismic_mag {
            self.seismic_mag = v.clamp(0.0, SEISMIC_MAX_MAG);
        }
        if let Some(v) = update.blasting_level {
            self.blasting_level = v.clamp(0.0, BLASTING_MAX_LEVEL);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Severity tiers
// ---------------------------------------------------------------------------

/// Risk severity tiers, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "Low"),
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
        }
    }
}

/// Weather impact tier derived from current rainfall.
///
/// Boundaries are exclusive: rainfall > 50 → High, > 10 → Moderate,
/// otherwise Low. Exactly 50 is Moderate, exactly 10 is Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeatherImpact {
    Low,
    Moderate,
    High,
}

impl WeatherImpact {
    pub fn from_rainfall(rainfall_mm: f64) -> Self {
        if rainfall_mm > 50.0 {
            WeatherImpact::High
        } else if rainfall_mm > 10.0 {
            WeatherImpact::Moderate
        } else {
            WeatherImpact::Low
        }
    }
}

// ---------------------------------------------------------------------------
// Alert record
// ---------------------------------------------------------------------------

/// A single alert in the feed.
///
/// `id` is derived from the creation timestamp in milliseconds and is
/// strictly increasing even when several alerts land in the same
/// millisecond (see `alert::feed`). `time` is RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub id: i64,
    pub zone: String,
    pub msg: String,
    pub severity: Severity,
    pub time: String,
    pub acknowledged: bool,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise from engine operations.
///
/// Every derivation is a pure computation over in-memory state; the only
/// failure paths are an unknown alert id on acknowledge and rejected
/// (non-finite) numeric input to the simulation setter.
#[derive(Debug, PartialEq)]
pub enum EngineError {
    /// No alert with the given id exists in the feed.
    AlertNotFound(i64),
    /// A submitted parameter value was rejected before assignment.
    InvalidParameter { field: String, reason: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::AlertNotFound(id) => write!(f, "Alert not found: {}", id),
            EngineError::InvalidParameter { field, reason } => {
                write!(f, "Invalid parameter {}: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for EngineError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
