//! Fixture builders for core integration tests

use chrono::Utc;
use sunquote_domain::types::{
    ComponentSelection, DesignType, Product, ProductCategory, Project, SystemDesign,
};
use uuid::Uuid;

/// Build a catalog product with the given category and cost.
pub fn product(category: ProductCategory, brand: &str, model: &str, cost: f64) -> Product {
    Product {
        id: Uuid::new_v4(),
        category,
        brand: brand.to_string(),
        model: model.to_string(),
        cost,
        margin: None,
        power_w: None,
        rating_kva: None,
        capacity_kwh: None,
        active: true,
        updated_at: Utc::now(),
    }
}

/// Build a full-system project whose design selects the given components.
pub fn project_with_design(
    panel: &Product,
    panel_qty: u32,
    inverter: &Product,
    battery: Option<&Product>,
) -> Project {
    let now = Utc::now();
    Project {
        id: Uuid::new_v4(),
        client_name: "Test Client".to_string(),
        site_address: "1 Example Street".to_string(),
        contact_email: Some("client@example.com".to_string()),
        contact_phone: None,
        tariff_id: None,
        design_type: DesignType::Full,
        system: SystemDesign {
            panel_kw: f64::from(panel_qty) * 0.5,
            inverter_kva: 5.0,
            battery_kwh: battery.map(|_| 10.0).unwrap_or(0.0),
            panel: Some(ComponentSelection { product_id: panel.id, quantity: panel_qty }),
            inverters: vec![ComponentSelection { product_id: inverter.id, quantity: 1 }],
            batteries: battery
                .map(|b| vec![ComponentSelection { product_id: b.id, quantity: 1 }])
                .unwrap_or_default(),
        },
        bom_subtotal: None,
        created_at: now,
        updated_at: now,
    }
}
