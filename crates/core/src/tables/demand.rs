use std::collections::BTreeMap;

/// Demand score used when a district or alternative has no entry.
pub const NEUTRAL_DEMAND: f64 = 0.5;

/// District -> alternative -> market-demand score in [0, 1].
///
/// Districts are matched exactly (proper nouns); missing keys fall back to
/// [`NEUTRAL_DEMAND`] rather than failing.
#[derive(Debug, Clone)]
pub struct DemandTable {
    districts: BTreeMap<String, BTreeMap<String, f64>>,
}

impl DemandTable {
    pub fn defaults() -> Self {
        let pune = [
            ("biochar", 0.9),
            ("pellets", 0.7),
            ("compost", 0.5),
            ("direct_incorporation", 0.4),
        ]
        .iter()
        .map(|(alt, score)| (alt.to_string(), *score))
        .collect();

        let mut districts = BTreeMap::new();
        districts.insert("Pune".to_string(), pune);
        Self { districts }
    }

    pub fn try_new(districts: BTreeMap<String, BTreeMap<String, f64>>) -> anyhow::Result<Self> {
        for (district, alternatives) in &districts {
            for (alternative, score) in alternatives {
                anyhow::ensure!(
                    score.is_finite() && (0.0..=1.0).contains(score),
                    "demand score for {district}/{alternative} must be within 0..=1 (got {score})"
                );
            }
        }
        Ok(Self { districts })
    }

    pub fn from_json_value(v: serde_json::Value) -> anyhow::Result<Self> {
        let districts: BTreeMap<String, BTreeMap<String, f64>> = serde_json::from_value(v)
            .map_err(|e| {
                anyhow::anyhow!("demand table must map district -> alternative -> score: {e}")
            })?;
        Self::try_new(districts)
    }

    pub fn from_path(path: &str) -> anyhow::Result<Self> {
        Self::from_json_value(super::read_json_file(path)?)
    }

    pub fn score(&self, district: &str, alternative: &str) -> f64 {
        self.districts
            .get(district)
            .and_then(|alternatives| alternatives.get(alternative))
            .copied()
            .unwrap_or(NEUTRAL_DEMAND)
    }
}
