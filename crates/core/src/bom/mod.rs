//! Bill-of-materials management
//!
//! Core-line regeneration, edit gating, and the save path that persists
//! lines and pushes the computed subtotal back onto the project.

pub mod ports;
pub mod service;

pub use ports::{BomRepository, TemplateRepository};
pub use service::{BomService, SavedBom};

use std::collections::HashMap;

use sunquote_domain::types::{BomLine, BomMode, Product, ProductCategory, SystemDesign};
use uuid::Uuid;

/// What a caller may do to a line under the current editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePermissions {
    pub can_edit_quantity: bool,
    pub can_remove: bool,
    pub can_edit_cost: bool,
}

/// Edit gating for one line.
///
/// Core lines are locked in `FullSystem` mode (they mirror the design) and
/// are always locked once the project has a sent quote, regardless of mode.
/// Cost editing is only ever available in `ComponentQuote` mode.
pub fn line_permissions(
    mode: BomMode,
    has_sent_quote: bool,
    category: ProductCategory,
) -> LinePermissions {
    let locked_core = category.is_core() && (has_sent_quote || mode == BomMode::FullSystem);
    LinePermissions {
        can_edit_quantity: !locked_core,
        can_remove: !locked_core,
        can_edit_cost: mode == BomMode::ComponentQuote && !locked_core,
    }
}

/// Rebuild the core-category lines of a BOM from the system design.
///
/// Non-core lines pass through untouched and keep their order. Core lines
/// are replaced wholesale by the design's selections; any
/// `override_margin` / `unit_cost_at_time` previously set on a line whose
/// product id survives the change is preserved.
///
/// `categories` maps product ids to their catalog category and must cover
/// every product referenced by `existing` (unknown products are treated as
/// non-core and passed through).
pub fn regenerate_core_lines(
    system: &SystemDesign,
    existing: &[BomLine],
    categories: &HashMap<Uuid, Product>,
) -> Vec<BomLine> {
    let is_core = |line: &BomLine| {
        categories.get(&line.product_id).map(|p| p.category.is_core()).unwrap_or(false)
    };

    let overrides: HashMap<Uuid, (Option<f64>, Option<f64>)> = existing
        .iter()
        .filter(|line| is_core(line))
        .map(|line| (line.product_id, (line.override_margin, line.unit_cost_at_time)))
        .collect();

    let mut lines: Vec<BomLine> = system
        .selections()
        .into_iter()
        .map(|selection| {
            let mut line = BomLine::new(selection.product_id, selection.quantity.max(1));
            if let Some((margin, cost)) = overrides.get(&selection.product_id) {
                line.override_margin = *margin;
                line.unit_cost_at_time = *cost;
            }
            line
        })
        .collect();

    lines.extend(existing.iter().filter(|line| !is_core(line)).cloned());
    lines
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sunquote_domain::types::ComponentSelection;

    use super::*;

    fn product(id: Uuid, category: ProductCategory) -> Product {
        Product {
            id,
            category,
            brand: "Brand".into(),
            model: "Model".into(),
            cost: 100.0,
            margin: None,
            power_w: None,
            rating_kva: None,
            capacity_kwh: None,
            active: true,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn full_system_mode_locks_core_lines() {
        let perms = line_permissions(BomMode::FullSystem, false, ProductCategory::Panel);
        assert!(!perms.can_edit_quantity);
        assert!(!perms.can_remove);
        assert!(!perms.can_edit_cost);

        let perms = line_permissions(BomMode::FullSystem, false, ProductCategory::Mounting);
        assert!(perms.can_edit_quantity);
        assert!(perms.can_remove);
        assert!(!perms.can_edit_cost);
    }

    #[test]
    fn component_quote_mode_unlocks_cost_editing() {
        let perms = line_permissions(BomMode::ComponentQuote, false, ProductCategory::Panel);
        assert!(perms.can_edit_quantity);
        assert!(perms.can_edit_cost);
    }

    #[test]
    fn sent_quote_locks_core_lines_in_any_mode() {
        for mode in [BomMode::FullSystem, BomMode::ComponentQuote] {
            let perms = line_permissions(mode, true, ProductCategory::Battery);
            assert!(!perms.can_edit_quantity, "mode {mode:?}");
            assert!(!perms.can_remove, "mode {mode:?}");
            assert!(!perms.can_edit_cost, "mode {mode:?}");
        }
        // Non-core cost editing survives a sent quote in component mode.
        let perms = line_permissions(BomMode::ComponentQuote, true, ProductCategory::Cabling);
        assert!(perms.can_edit_cost);
    }

    #[test]
    fn regeneration_replaces_core_and_preserves_survivor_overrides() {
        let panel_id = Uuid::new_v4();
        let old_inverter_id = Uuid::new_v4();
        let new_inverter_id = Uuid::new_v4();
        let rail_id = Uuid::new_v4();

        let mut catalog = HashMap::new();
        catalog.insert(panel_id, product(panel_id, ProductCategory::Panel));
        catalog.insert(old_inverter_id, product(old_inverter_id, ProductCategory::Inverter));
        catalog.insert(new_inverter_id, product(new_inverter_id, ProductCategory::Inverter));
        catalog.insert(rail_id, product(rail_id, ProductCategory::Mounting));

        let existing = vec![
            BomLine {
                product_id: panel_id,
                quantity: 10,
                override_margin: Some(0.18),
                unit_cost_at_time: Some(210.0),
            },
            BomLine::new(old_inverter_id, 1),
            BomLine { product_id: rail_id, quantity: 4, override_margin: Some(0.4), unit_cost_at_time: None },
        ];

        // Design swaps the inverter and bumps panel count.
        let system = SystemDesign {
            panel_kw: 6.2,
            inverter_kva: 6.0,
            battery_kwh: 0.0,
            panel: Some(ComponentSelection { product_id: panel_id, quantity: 14 }),
            inverters: vec![ComponentSelection { product_id: new_inverter_id, quantity: 1 }],
            batteries: vec![],
        };

        let lines = regenerate_core_lines(&system, &existing, &catalog);
        assert_eq!(lines.len(), 3);

        // Panel survived: new quantity, old overrides.
        assert_eq!(lines[0].product_id, panel_id);
        assert_eq!(lines[0].quantity, 14);
        assert_eq!(lines[0].override_margin, Some(0.18));
        assert_eq!(lines[0].unit_cost_at_time, Some(210.0));

        // Old inverter replaced by the new one, with no inherited overrides.
        assert_eq!(lines[1].product_id, new_inverter_id);
        assert_eq!(lines[1].override_margin, None);

        // Non-core line untouched.
        assert_eq!(lines[2].product_id, rail_id);
        assert_eq!(lines[2].override_margin, Some(0.4));
    }

    #[test]
    fn regeneration_with_empty_design_drops_core_lines_only() {
        let panel_id = Uuid::new_v4();
        let rail_id = Uuid::new_v4();
        let mut catalog = HashMap::new();
        catalog.insert(panel_id, product(panel_id, ProductCategory::Panel));
        catalog.insert(rail_id, product(rail_id, ProductCategory::Mounting));

        let existing = vec![BomLine::new(panel_id, 8), BomLine::new(rail_id, 2)];
        let lines = regenerate_core_lines(&SystemDesign::default(), &existing, &catalog);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_id, rail_id);
    }
}
