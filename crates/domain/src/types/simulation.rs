//! Simulation engine payload types
//!
//! The energy simulation, optimization, and financial modelling all run in
//! an external engine; these types describe the request payloads this
//! backend assembles. Engine responses are relayed as opaque JSON so engine
//! upgrades never require a lockstep release here.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::project::SystemDesign;

/// One point of a demand series sent to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesPoint {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub kw: f64,
}

/// Full simulation request: a system design against a demand series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub project_id: Option<Uuid>,
    pub system: SystemDesign,
    /// Interval demand values, kW.
    pub demand_kw: Vec<f64>,
    pub interval_minutes: u32,
}

/// Quick-design simulation: a scaled stock profile against a templated
/// system. The backend resolves and scales the profile before forwarding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickSimulationRequest {
    pub profile_id: Uuid,
    /// Positive scale factor applied to the stock profile.
    pub multiplier: f64,
    pub system: SystemDesign,
}

/// Financial model request; assumptions are engine-defined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialModelRequest {
    pub project_id: Option<Uuid>,
    pub system: SystemDesign,
    #[serde(default)]
    pub assumptions: serde_json::Value,
}
