pub mod financial;
pub mod ranking;
pub mod residue;

use crate::config::Settings;
use crate::domain::advisory::{AdvisoryRequest, AdvisorySnapshot};
use crate::tables::{Crop, CropRegistry, CropTable, DemandTable, ProfileTable, NEUTRAL_DEMAND};
use chrono::{DateTime, Utc};

pub use ranking::ScoreWeights;

/// Round to 2 decimal places. Part of the pipeline contract: estimator,
/// projector and ranking all emit 2-decimal values.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The advisory pipeline: residue estimation -> financial projection ->
/// ranking, run strictly in that order.
///
/// Built once at startup from read-only tables and shared across requests;
/// every method takes `&self` and keeps no per-request state.
pub struct AdvisoryEngine {
    registry: Box<dyn CropRegistry>,
    profiles: ProfileTable,
    demand: DemandTable,
    weights: ScoreWeights,
}

impl AdvisoryEngine {
    pub fn try_new(
        registry: Box<dyn CropRegistry>,
        profiles: ProfileTable,
        demand: DemandTable,
        weights: ScoreWeights,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            !profiles.is_empty(),
            "at least one alternative must be configured"
        );
        weights.validate()?;

        Ok(Self {
            registry,
            profiles,
            demand,
            weights,
        })
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let registry = match settings.crop_table_path.as_deref() {
            Some(path) => {
                tracing::info!(path, "loading crop table");
                CropTable::from_path(path)?
            }
            None => CropTable::defaults(),
        };

        let profiles = match settings.profile_table_path.as_deref() {
            Some(path) => {
                tracing::info!(path, "loading financial profile table");
                ProfileTable::from_path(path)?
            }
            None => ProfileTable::defaults(),
        };

        let demand = match settings.demand_table_path.as_deref() {
            Some(path) => {
                tracing::info!(path, "loading district demand table");
                DemandTable::from_path(path)?
            }
            None => DemandTable::defaults(),
        };

        Self::try_new(Box::new(registry), profiles, demand, ScoreWeights::from_env())
    }

    /// Run one advisory request through the full pipeline.
    pub fn advise(
        &self,
        request: &AdvisoryRequest,
        generated_at: DateTime<Utc>,
    ) -> anyhow::Result<AdvisorySnapshot> {
        let residue_tons = residue::estimate(
            self.registry.as_ref(),
            request.field_size_acres,
            &request.crop_type,
        )?;

        let candidates =
            financial::project(&self.profiles, residue_tons, &request.district, NEUTRAL_DEMAND)?;
        let recommendations = ranking::rank(candidates, &request.district, &self.demand, &self.weights);

        tracing::debug!(
            crop_type = %request.crop_type,
            district = %request.district,
            residue_tons,
            alternatives = recommendations.len(),
            "advisory computed"
        );

        Ok(AdvisorySnapshot {
            advisory_id: uuid::Uuid::new_v4(),
            generated_at,
            field_size_acres: request.field_size_acres,
            crop_type: request.crop_type.clone(),
            district: request.district.clone(),
            state: request.state.clone(),
            residue_estimate_tons: residue_tons,
            recommendations,
        })
    }

    pub fn crops(&self) -> Vec<Crop> {
        self.registry.crops()
    }

    pub fn profiles(&self) -> &ProfileTable {
        &self.profiles
    }
}
