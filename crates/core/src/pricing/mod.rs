//! BOM pricing rules
//!
//! Unit price = unit cost × (1 + effective margin). The effective margin is
//! the line's override if present, else the product's catalog margin
//! normalized to a fraction, else the default. Margins arrive from two
//! conventions (0–1 fraction and 0–100 percentage); anything above 1 is
//! treated as a percentage.

use serde::Serialize;
use sunquote_domain::constants::DEFAULT_CATALOG_MARGIN;
use sunquote_domain::types::{BomLine, Product, ProductCategory, QuoteLine};
use uuid::Uuid;

/// A BOM line resolved against the catalog with all pricing applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub category: ProductCategory,
    pub description: String,
    pub quantity: u32,
    pub unit_cost: f64,
    /// Effective margin, 0–1 fraction.
    pub margin: f64,
    pub unit_price: f64,
    pub line_total: f64,
}

impl From<PricedLine> for QuoteLine {
    fn from(line: PricedLine) -> Self {
        Self {
            product_id: line.product_id,
            category: line.category,
            description: line.description,
            quantity: line.quantity,
            unit_cost: line.unit_cost,
            margin: line.margin,
            unit_price: line.unit_price,
            line_total: line.line_total,
        }
    }
}

/// Normalize a raw margin to a 0–1 fraction.
///
/// Values above 1 are percentages (30 means 30%); negatives clamp to zero.
pub fn normalize_margin(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    if raw > 1.0 {
        (raw / 100.0).min(10.0)
    } else {
        raw.max(0.0)
    }
}

/// The margin that applies to a line: override, else catalog, else default.
pub fn effective_margin(line: &BomLine, product: &Product) -> f64 {
    match (line.override_margin, product.margin) {
        (Some(margin), _) => normalize_margin(margin),
        (None, Some(margin)) => normalize_margin(margin),
        (None, None) => DEFAULT_CATALOG_MARGIN,
    }
}

/// The unit cost that applies to a line: pinned historical cost if present,
/// else the live catalog cost.
pub fn effective_unit_cost(line: &BomLine, product: &Product) -> f64 {
    line.unit_cost_at_time.unwrap_or(product.cost)
}

/// Unit price from cost and margin fraction.
pub fn unit_price(unit_cost: f64, margin: f64) -> f64 {
    unit_cost * (1.0 + margin)
}

/// Price a single BOM line against its catalog product.
pub fn price_line(line: &BomLine, product: &Product) -> PricedLine {
    let margin = effective_margin(line, product);
    let unit_cost = effective_unit_cost(line, product);
    let unit_price = unit_price(unit_cost, margin);
    PricedLine {
        product_id: line.product_id,
        category: product.category,
        description: product.display_name(),
        quantity: line.quantity,
        unit_cost,
        margin,
        unit_price,
        line_total: unit_price * f64::from(line.quantity),
    }
}

/// Sum of line totals.
pub fn subtotal(lines: &[PricedLine]) -> f64 {
    lines.iter().map(|line| line.line_total).sum()
}
