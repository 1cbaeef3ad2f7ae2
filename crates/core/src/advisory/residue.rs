use crate::advisory::round2;
use crate::domain::error::AdvisoryError;
use crate::tables::CropRegistry;

/// Estimate the residue mass of a field, in tons.
///
/// `residue_tons = round(field_size_acres * residue_ratio, 2)`; the
/// 2-decimal rounding is part of the contract. An unknown crop fails with
/// [`AdvisoryError::UnsupportedCrop`] and must reach the caller unchanged.
pub fn estimate(
    registry: &dyn CropRegistry,
    field_size_acres: f64,
    crop_type: &str,
) -> anyhow::Result<f64> {
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

    let ratio = registry
        .residue_ratio(crop_type)
        .ok_or_else(|| AdvisoryError::UnsupportedCrop {
            crop_type: crop_type.to_string(),
        })?;

    Ok(round2(field_size_acres * ratio))
}
