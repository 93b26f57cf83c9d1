//! Stock load profile types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stock template of interval demand values.
///
/// Profiles are half-hourly by convention (see
/// [`crate::constants::LOAD_PROFILE_INTERVAL_MINUTES`]) and are scaled by a
/// positive multiplier before use in a quick design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadProfile {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub interval_minutes: u32,
    /// Ordered demand values, kW.
    pub values: Vec<f64>,
}

impl LoadProfile {
    /// Demand values scaled by `multiplier`.
    pub fn scaled_values(&self, multiplier: f64) -> Vec<f64> {
        self.values.iter().map(|v| v * multiplier).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaling_multiplies_every_value() {
        let profile = LoadProfile {
            id: Uuid::new_v4(),
            name: "3-bed household".into(),
            description: None,
            interval_minutes: 30,
            values: vec![0.5, 1.0, 2.5],
        };

        assert_eq!(profile.scaled_values(2.0), vec![1.0, 2.0, 5.0]);
        assert_eq!(profile.scaled_values(1.0), profile.values);
    }
}
