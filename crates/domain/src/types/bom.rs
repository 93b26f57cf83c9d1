//! Bill-of-materials types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Editing mode for a project's BOM.
///
/// `FullSystem` locks core-line quantity and removal (those lines mirror the
/// system design); `ComponentQuote` additionally unlocks cost editing for a
/// parts-only quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BomMode {
    FullSystem,
    ComponentQuote,
}

/// One priced line of a project's bill of materials.
///
/// `override_margin` and `unit_cost_at_time` pin pricing at the moment they
/// were set so historical quotes survive later catalog changes. Both are
/// preserved by core-line regeneration when the product id survives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomLine {
    pub product_id: Uuid,
    pub quantity: u32,
    /// Per-line margin override, stored as a 0–1 fraction.
    pub override_margin: Option<f64>,
    /// Unit cost pinned when the line was priced.
    pub unit_cost_at_time: Option<f64>,
}

impl BomLine {
    /// A fresh line for a product with no pricing overrides.
    pub fn new(product_id: Uuid, quantity: u32) -> Self {
        Self { product_id, quantity, override_margin: None, unit_cost_at_time: None }
    }
}

/// Line stored in a reusable BOM template (non-core components only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateLine {
    pub product_id: Uuid,
    pub quantity: u32,
}

/// A named, project-independent set of non-core BOM lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomTemplate {
    pub id: Uuid,
    pub name: String,
    pub lines: Vec<TemplateLine>,
    pub created_at: DateTime<Utc>,
}
