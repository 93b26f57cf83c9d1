//! Product catalog types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog category a product belongs to.
///
/// Panel, inverter, and battery are **core** categories: BOM lines in these
/// categories are derived from a project's system design rather than added
/// freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Panel,
    Inverter,
    Battery,
    Mounting,
    Protection,
    Cabling,
    Monitoring,
    Labour,
    Other,
}

impl ProductCategory {
    /// Whether lines in this category are sourced from the system design.
    pub fn is_core(self) -> bool {
        matches!(self, Self::Panel | Self::Inverter | Self::Battery)
    }

    /// Stable lowercase identifier used in storage and queries.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Panel => "panel",
            Self::Inverter => "inverter",
            Self::Battery => "battery",
            Self::Mounting => "mounting",
            Self::Protection => "protection",
            Self::Cabling => "cabling",
            Self::Monitoring => "monitoring",
            Self::Labour => "labour",
            Self::Other => "other",
        }
    }

    /// Parse the storage identifier back into a category.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "panel" => Some(Self::Panel),
            "inverter" => Some(Self::Inverter),
            "battery" => Some(Self::Battery),
            "mounting" => Some(Self::Mounting),
            "protection" => Some(Self::Protection),
            "cabling" => Some(Self::Cabling),
            "monitoring" => Some(Self::Monitoring),
            "labour" => Some(Self::Labour),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Catalog product.
///
/// `margin` is stored as supplied by the catalog import and may be either a
/// 0–1 fraction or a 0–100 percentage; the pricing module normalizes it
/// before use. The sell price is always derived (cost × (1 + margin)), never
/// stored, so catalog price and cost cannot drift apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub category: ProductCategory,
    pub brand: String,
    pub model: String,
    /// Unit cost to the installer.
    pub cost: f64,
    /// Raw catalog margin; `None` means the default margin applies.
    pub margin: Option<f64>,
    /// Panel rating, watts.
    pub power_w: Option<f64>,
    /// Inverter rating, kVA.
    pub rating_kva: Option<f64>,
    /// Battery capacity, kWh.
    pub capacity_kwh: Option<f64>,
    pub active: bool,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Human-readable label used in quote documents and search results.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_categories() {
        assert!(ProductCategory::Panel.is_core());
        assert!(ProductCategory::Inverter.is_core());
        assert!(ProductCategory::Battery.is_core());
        assert!(!ProductCategory::Mounting.is_core());
        assert!(!ProductCategory::Labour.is_core());
    }

    #[test]
    fn category_round_trips_through_storage_identifier() {
        for category in [
            ProductCategory::Panel,
            ProductCategory::Inverter,
            ProductCategory::Battery,
            ProductCategory::Mounting,
            ProductCategory::Protection,
            ProductCategory::Cabling,
            ProductCategory::Monitoring,
            ProductCategory::Labour,
            ProductCategory::Other,
        ] {
            assert_eq!(ProductCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(ProductCategory::parse("solar_pony"), None);
    }
}
