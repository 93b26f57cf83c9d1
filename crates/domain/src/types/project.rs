//! Project and system design types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the project was designed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignType {
    /// Wizard flow: stock load profile + templated system.
    Quick,
    /// Full manual design.
    Full,
}

/// A catalog product chosen for the system design, with its count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentSelection {
    pub product_id: Uuid,
    pub quantity: u32,
}

/// Sizing and component selection for a project's PV system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemDesign {
    pub panel_kw: f64,
    pub inverter_kva: f64,
    pub battery_kwh: f64,
    pub panel: Option<ComponentSelection>,
    #[serde(default)]
    pub inverters: Vec<ComponentSelection>,
    #[serde(default)]
    pub batteries: Vec<ComponentSelection>,
}

impl SystemDesign {
    /// All selected core components in a stable order: panel, inverters,
    /// batteries.
    pub fn selections(&self) -> Vec<ComponentSelection> {
        let mut out = Vec::new();
        if let Some(panel) = self.panel {
            out.push(panel);
        }
        out.extend(self.inverters.iter().copied());
        out.extend(self.batteries.iter().copied());
        out
    }
}

/// Sales project: client/site intake plus the current system design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub client_name: String,
    pub site_address: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    /// Reference to the client's electricity tariff.
    pub tariff_id: Option<String>,
    pub design_type: DesignType,
    pub system: SystemDesign,
    /// Last saved BOM subtotal, pushed back onto the project at save time.
    pub bom_subtotal: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selections_keep_panel_inverter_battery_order() {
        let panel = ComponentSelection { product_id: Uuid::new_v4(), quantity: 12 };
        let inverter = ComponentSelection { product_id: Uuid::new_v4(), quantity: 1 };
        let battery = ComponentSelection { product_id: Uuid::new_v4(), quantity: 2 };

        let system = SystemDesign {
            panel_kw: 5.4,
            inverter_kva: 5.0,
            battery_kwh: 10.0,
            panel: Some(panel),
            inverters: vec![inverter],
            batteries: vec![battery],
        };

        let selections = system.selections();
        assert_eq!(selections.len(), 3);
        assert_eq!(selections[0].product_id, panel.product_id);
        assert_eq!(selections[1].product_id, inverter.product_id);
        assert_eq!(selections[2].product_id, battery.product_id);
    }
}
