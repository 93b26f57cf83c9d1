//! Uploaded consumption data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One interval reading from an uploaded consumption file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionPoint {
    pub timestamp: DateTime<Utc>,
    pub kw: f64,
}

/// Parsed consumption data attached to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumptionSeries {
    pub project_id: Uuid,
    pub source_filename: Option<String>,
    pub points: Vec<ConsumptionPoint>,
    pub uploaded_at: DateTime<Utc>,
}
