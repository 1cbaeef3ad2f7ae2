use crate::domain::error::AdvisoryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A validated advisory request. Construct via [`AdvisoryRequest::try_new`]
/// so malformed values are rejected before any computation runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryRequest {
    pub field_size_acres: f64,
    pub crop_type: String,
    pub district: String,
    pub state: Option<String>,
}

impl AdvisoryRequest {
    pub fn try_new(
        field_size_acres: f64,
        crop_type: &str,
        district: &str,
        state: Option<&str>,
    ) -> anyhow::Result<Self> {
        if !(field_size_acres.is_finite() && field_size_acres > 0.0) {
            return Err(AdvisoryError::invalid_input(format!(
                "field_size_acres must be a positive number (got {field_size_acres})"
            ))
            .into());
        }

        let crop_type = crop_type.trim();
        if crop_type.is_empty() {
            return Err(AdvisoryError::invalid_input("crop_type must be non-empty").into());
        }

        let district = district.trim();
        if district.is_empty() {
            return Err(AdvisoryError::invalid_input("district must be non-empty").into());
        }

        let state = state
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            field_size_acres,
            crop_type: crop_type.to_string(),
            district: district.to_string(),
            state,
        })
    }
}

/// One residue-valorization pathway with its projected metrics.
///
/// `final_score` stays `None` until the ranking stage fills it in; a returned
/// advisory always carries scored recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub alternative: String,
    pub setup_cost: f64,
    pub expected_income: f64,
    pub profit: f64,
    pub break_even_months: u32,
    pub co2_saved_tons: f64,
    pub final_score: Option<f64>,
}

/// The assembled advisory result, one per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorySnapshot {
    pub advisory_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub field_size_acres: f64,
    pub crop_type: String,
    pub district: String,
    pub state: Option<String>,
    pub residue_estimate_tons: f64,
    pub recommendations: Vec<Recommendation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_trims_and_keeps_values() {
        let req = AdvisoryRequest::try_new(12.5, " wheat ", " Pune ", Some("Maharashtra")).unwrap();
        assert_eq!(req.field_size_acres, 12.5);
        assert_eq!(req.crop_type, "wheat");
        assert_eq!(req.district, "Pune");
        assert_eq!(req.state.as_deref(), Some("Maharashtra"));
    }

    #[test]
    fn try_new_drops_blank_state() {
        let req = AdvisoryRequest::try_new(1.0, "rice", "Nagpur", Some("  ")).unwrap();
        assert_eq!(req.state, None);
    }

    #[test]
    fn try_new_rejects_non_positive_field_size() {
        for bad in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let err = AdvisoryRequest::try_new(bad, "wheat", "Pune", None).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<AdvisoryError>(),
                Some(AdvisoryError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn try_new_rejects_blank_identifiers() {
        assert!(AdvisoryRequest::try_new(1.0, "  ", "Pune", None).is_err());
        assert!(AdvisoryRequest::try_new(1.0, "wheat", "", None).is_err());
    }
}
