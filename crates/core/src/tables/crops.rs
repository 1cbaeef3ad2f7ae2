use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Residue ratios for crops shipped with the default table, in tons of
/// residue per acre. Override via CROP_TABLE_PATH.
const DEFAULT_CROPS: &[(&str, f64)] = &[
    ("wheat", 1.5),
    ("rice", 1.5),
    ("maize", 2.0),
    ("sugarcane", 0.3),
    ("cotton", 3.0),
    ("soybean", 1.2),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crop {
    pub name: String,
    pub residue_ratio: f64,
}

/// Read-only lookup of crop type -> residue ratio. The estimator treats a
/// miss as an unsupported crop; implementations never invent a ratio.
pub trait CropRegistry: Send + Sync {
    fn residue_ratio(&self, crop_type: &str) -> Option<f64>;

    fn crops(&self) -> Vec<Crop>;
}

/// In-memory crop registry. Names are matched case-insensitively so request
/// payloads like "Wheat" resolve against a lowercase table.
#[derive(Debug, Clone)]
pub struct CropTable {
    ratios: BTreeMap<String, f64>,
}

impl CropTable {
    pub fn defaults() -> Self {
        let ratios = DEFAULT_CROPS
            .iter()
            .map(|(name, ratio)| (name.to_string(), *ratio))
            .collect();
        Self { ratios }
    }

    pub fn try_new(raw: BTreeMap<String, f64>) -> anyhow::Result<Self> {
        anyhow::ensure!(!raw.is_empty(), "crop table must not be empty");

        let mut ratios = BTreeMap::new();
        for (name, ratio) in raw {
            let key = name.trim().to_ascii_lowercase();
            anyhow::ensure!(!key.is_empty(), "crop name must be non-empty");
            anyhow::ensure!(
                ratio.is_finite() && ratio >= 0.0,
                "residue_ratio for {key} must be a non-negative number (got {ratio})"
            );
            ratios.insert(key, ratio);
        }

        Ok(Self { ratios })
    }

    pub fn from_json_value(v: serde_json::Value) -> anyhow::Result<Self> {
        let raw: BTreeMap<String, f64> = serde_json::from_value(v)
            .map_err(|e| anyhow::anyhow!("crop table must map crop name -> residue_ratio: {e}"))?;
        Self::try_new(raw)
    }

    pub fn from_path(path: &str) -> anyhow::Result<Self> {
        Self::from_json_value(super::read_json_file(path)?)
    }
}

impl CropRegistry for CropTable {
    fn residue_ratio(&self, crop_type: &str) -> Option<f64> {
        self.ratios
            .get(&crop_type.trim().to_ascii_lowercase())
            .copied()
    }

    fn crops(&self) -> Vec<Crop> {
        self.ratios
            .iter()
            .map(|(name, ratio)| Crop {
                name: name.clone(),
                residue_ratio: *ratio,
            })
            .collect()
    }
}
