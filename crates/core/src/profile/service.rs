//! Load profile service

use std::sync::Arc;

use sunquote_domain::types::{LoadProfile, QuickSimulationRequest, SimulationRequest};
use sunquote_domain::{Result, SunquoteError};
use uuid::Uuid;

use super::ports::LoadProfileRepository;

/// Stock load profile service
pub struct ProfileService {
    profiles: Arc<dyn LoadProfileRepository>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn LoadProfileRepository>) -> Self {
        Self { profiles }
    }

    /// List all stock profiles.
    pub async fn list(&self) -> Result<Vec<LoadProfile>> {
        self.profiles.list_profiles().await
    }

    /// Get a profile by id.
    pub async fn get(&self, id: Uuid) -> Result<LoadProfile> {
        self.profiles
            .get_profile(id)
            .await?
            .ok_or_else(|| SunquoteError::NotFound(format!("load profile {id}")))
    }

    /// Scale a stock profile by a positive multiplier.
    pub async fn scaled(&self, id: Uuid, multiplier: f64) -> Result<LoadProfile> {
        validate_multiplier(multiplier)?;
        let mut profile = self.get(id).await?;
        profile.values = profile.scaled_values(multiplier);
        Ok(profile)
    }

    /// Resolve a quick-design request into a full simulation request by
    /// scaling the chosen stock profile.
    pub async fn build_quick_simulation(
        &self,
        request: &QuickSimulationRequest,
    ) -> Result<SimulationRequest> {
        let profile = self.scaled(request.profile_id, request.multiplier).await?;
        Ok(SimulationRequest {
            project_id: None,
            system: request.system.clone(),
            demand_kw: profile.values,
            interval_minutes: profile.interval_minutes,
        })
    }
}

fn validate_multiplier(multiplier: f64) -> Result<()> {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(SunquoteError::InvalidInput(format!(
            "profile multiplier must be positive, got {multiplier}"
        )));
    }
    Ok(())
}
