use crate::advisory::round2;
use crate::tables::ProfileTable;
use chrono::{DateTime, Datelike, Utc};
use std::collections::BTreeMap;

/// Base price per ton for alternatives absent from the profile table.
const FALLBACK_BASE_PRICE: f64 = 3000.0;

/// Demand lifts the price by up to 15% at full demand.
const DEMAND_PRICE_LIFT: f64 = 0.15;

/// Harvest-heavy months carry a small oversupply discount.
const HARVEST_MONTHS: [u32; 4] = [3, 4, 10, 11];
const HARVEST_DISCOUNT: f64 = 0.9;

/// Per-ton price predictor: the alternative's base income adjusted for
/// district, demand and season.
#[derive(Debug, Clone)]
pub struct PriceModel {
    multipliers: BTreeMap<String, f64>,
}

impl Default for PriceModel {
    fn default() -> Self {
        let multipliers = [("Pune", 1.1), ("Nagpur", 0.95), ("Nashik", 1.05)]
            .iter()
            .map(|(district, m)| (district.to_string(), *m))
            .collect();
        Self { multipliers }
    }
}

impl PriceModel {
    pub fn try_new(multipliers: BTreeMap<String, f64>) -> anyhow::Result<Self> {
        for (district, m) in &multipliers {
            anyhow::ensure!(
                m.is_finite() && *m > 0.0,
                "price multiplier for {district} must be positive (got {m})"
            );
        }
        Ok(Self { multipliers })
    }

    pub fn from_json_value(v: serde_json::Value) -> anyhow::Result<Self> {
        let multipliers: BTreeMap<String, f64> = serde_json::from_value(v)
            .map_err(|e| anyhow::anyhow!("price table must map district -> multiplier: {e}"))?;
        Self::try_new(multipliers)
    }

    pub fn from_path(path: &str) -> anyhow::Result<Self> {
        Self::from_json_value(crate::tables::read_json_file(path)?)
    }

    /// Predict the market price per ton for an alternative.
    ///
    /// Base price is the alternative's configured income per ton (flat
    /// fallback for unknown alternatives), multiplied by the district factor,
    /// a demand lift and the seasonal factor for `now`'s month.
    pub fn predict_price(
        &self,
        profiles: &ProfileTable,
        alternative: &str,
        district: Option<&str>,
        demand_score: f64,
        now: DateTime<Utc>,
    ) -> anyhow::Result<f64> {
        anyhow::ensure!(
            demand_score.is_finite() && (0.0..=1.0).contains(&demand_score),
            "demand_score must be within 0..=1 (got {demand_score})"
        );

        let base_price = profiles
            .get(alternative)
            .map(|p| p.income_per_ton)
            .unwrap_or(FALLBACK_BASE_PRICE);

        let district_factor = district
            .and_then(|d| self.multipliers.get(d))
            .copied()
            .unwrap_or(1.0);

        let demand_factor = 1.0 + demand_score * DEMAND_PRICE_LIFT;

        let season_factor = if HARVEST_MONTHS.contains(&now.month()) {
            HARVEST_DISCOUNT
        } else {
            1.0
        };

        Ok(round2(base_price * district_factor * demand_factor * season_factor))
    }
}
