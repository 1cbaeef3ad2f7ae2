use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-ton economics of one valorization alternative. Static configuration:
/// changing these values is a deployment change, not a runtime operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialProfile {
    pub setup_cost_per_ton: f64,
    pub income_per_ton: f64,
    pub co2_saving_per_ton: f64,
}

/// Alternative -> financial profile. Loaded once at startup and read-only
/// thereafter; the projector iterates it in key order, which fixes the
/// pre-ranking candidate order.
#[derive(Debug, Clone)]
pub struct ProfileTable {
    by_alternative: BTreeMap<String, FinancialProfile>,
}

impl ProfileTable {
    pub fn defaults() -> Self {
        let mut by_alternative = BTreeMap::new();
        by_alternative.insert(
            "biochar".to_string(),
            FinancialProfile {
                setup_cost_per_ton: 3000.0,
                income_per_ton: 5500.0,
                co2_saving_per_ton: 0.3,
            },
        );
        by_alternative.insert(
            "pellets".to_string(),
            FinancialProfile {
                setup_cost_per_ton: 2000.0,
                income_per_ton: 4200.0,
                co2_saving_per_ton: 0.2,
            },
        );
        by_alternative.insert(
            "compost".to_string(),
            FinancialProfile {
                setup_cost_per_ton: 1500.0,
                income_per_ton: 2800.0,
                co2_saving_per_ton: 0.1,
            },
        );
        by_alternative.insert(
            "direct_incorporation".to_string(),
            FinancialProfile {
                setup_cost_per_ton: 800.0,
                income_per_ton: 1500.0,
                co2_saving_per_ton: 0.05,
            },
        );
        Self { by_alternative }
    }

    pub fn try_new(by_alternative: BTreeMap<String, FinancialProfile>) -> anyhow::Result<Self> {
        anyhow::ensure!(
            !by_alternative.is_empty(),
            "profile table must configure at least one alternative"
        );

        for (alternative, profile) in &by_alternative {
            for (field, value) in [
                ("setup_cost_per_ton", profile.setup_cost_per_ton),
                ("income_per_ton", profile.income_per_ton),
                ("co2_saving_per_ton", profile.co2_saving_per_ton),
            ] {
                anyhow::ensure!(
                    value.is_finite() && value >= 0.0,
                    "{field} for {alternative} must be a non-negative number (got {value})"
                );
            }
        }

        Ok(Self { by_alternative })
    }

    pub fn from_json_value(v: serde_json::Value) -> anyhow::Result<Self> {
        let by_alternative: BTreeMap<String, FinancialProfile> = serde_json::from_value(v)
            .map_err(|e| {
                anyhow::anyhow!("profile table must map alternative -> financial profile: {e}")
            })?;
        Self::try_new(by_alternative)
    }

    pub fn from_path(path: &str) -> anyhow::Result<Self> {
        Self::from_json_value(super::read_json_file(path)?)
    }

    pub fn get(&self, alternative: &str) -> Option<&FinancialProfile> {
        self.by_alternative.get(alternative)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FinancialProfile)> {
        self.by_alternative.iter()
    }

    pub fn len(&self) -> usize {
        self.by_alternative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_alternative.is_empty()
    }
}
