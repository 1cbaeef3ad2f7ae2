use anyhow::Context;

pub mod crops;
pub mod demand;
pub mod profiles;

pub use crops::{Crop, CropRegistry, CropTable};
pub use demand::{DemandTable, NEUTRAL_DEMAND};
pub use profiles::{FinancialProfile, ProfileTable};

pub(crate) fn read_json_file(path: &str) -> anyhow::Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read table file {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("table file {path} is not valid JSON"))
}
