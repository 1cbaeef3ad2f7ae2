use crate::advisory::round2;
use crate::domain::advisory::Recommendation;
use crate::tables::DemandTable;

/// Weights of the composite score. Must sum to 1.0 so final scores stay
/// within [0, 100].
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub profit: f64,
    pub break_even: f64,
    pub co2: f64,
    pub demand: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            profit: 0.4,
            break_even: 0.2,
            co2: 0.2,
            demand: 0.2,
        }
    }
}

impl ScoreWeights {
    /// Deployment-time overrides via SCORE_WEIGHT_PROFIT, SCORE_WEIGHT_BREAK_EVEN,
    /// SCORE_WEIGHT_CO2, SCORE_WEIGHT_DEMAND. Overridden weights still have to
    /// pass [`ScoreWeights::validate`] at engine construction.
    pub fn from_env() -> Self {
        let mut out = Self::default();

        for (var, slot) in [
            ("SCORE_WEIGHT_PROFIT", &mut out.profit),
            ("SCORE_WEIGHT_BREAK_EVEN", &mut out.break_even),
            ("SCORE_WEIGHT_CO2", &mut out.co2),
            ("SCORE_WEIGHT_DEMAND", &mut out.demand),
        ] {
            if let Ok(s) = std::env::var(var) {
                if let Ok(w) = s.parse::<f64>() {
                    *slot = w;
                }
            }
        }

        out
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, w) in [
            ("profit", self.profit),
            ("break_even", self.break_even),
            ("co2", self.co2),
            ("demand", self.demand),
        ] {
            anyhow::ensure!(
                w.is_finite() && w >= 0.0,
                "{name} weight must be a non-negative number (got {w})"
            );
        }

        let sum = self.profit + self.break_even + self.co2 + self.demand;
        anyhow::ensure!(
            (sum - 1.0).abs() < 1e-9,
            "score weights must sum to 1.0 (got {sum})"
        );
        Ok(())
    }
}

/// Min-max normalize into [0, 1]. A metric with no spread across the set
/// counts as 1.0 for every candidate rather than dividing by zero.
fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 1.0;
    }
    (value - min) / (max - min)
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
        (min.min(v), max.max(v))
    })
}

/// Score and order the candidate set for a district.
///
/// Profit, CO2 savings and break-even are min-max normalized across the set
/// (break-even inverted: sooner is better), combined with the district demand
/// signal and scaled to [0, 100]. The sort is stable, so candidates with
/// equal scores keep their pre-ranking order. Ranking permutes the set; it
/// never drops or adds candidates.
pub fn rank(
    mut candidates: Vec<Recommendation>,
    district: &str,
    demand: &DemandTable,
    weights: &ScoreWeights,
) -> Vec<Recommendation> {
    if candidates.is_empty() {
        return candidates;
    }

    let (min_profit, max_profit) =
        min_max(candidates.iter().map(|c| c.expected_income - c.setup_cost));
    let (min_co2, max_co2) = min_max(candidates.iter().map(|c| c.co2_saved_tons));
    let (min_be, max_be) = min_max(candidates.iter().map(|c| f64::from(c.break_even_months)));

    for candidate in &mut candidates {
        let profit = candidate.expected_income - candidate.setup_cost;
        let norm_profit = normalize(profit, min_profit, max_profit);
        let norm_co2 = normalize(candidate.co2_saved_tons, min_co2, max_co2);
        // Sooner break-even is better, so invert after normalizing.
        let norm_break_even = 1.0 - normalize(f64::from(candidate.break_even_months), min_be, max_be);

        let demand_score = demand.score(district, &candidate.alternative);

        let score = weights.profit * norm_profit
            + weights.break_even * norm_break_even
            + weights.co2 * norm_co2
            + weights.demand * demand_score;

        candidate.final_score = Some(round2(score * 100.0));
    }

    candidates.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::financial;
    use crate::tables::ProfileTable;

    fn default_candidates_at_ten_tons() -> Vec<Recommendation> {
        financial::project(&ProfileTable::defaults(), 10.0, "unused", 0.5).unwrap()
    }

    #[test]
    fn deterministic_scores_for_unknown_district() {
        let candidates = default_candidates_at_ten_tons();
        let ranked = rank(
            candidates,
            "Wardha",
            &DemandTable::defaults(),
            &ScoreWeights::default(),
        );

        // All four alternatives share a 3-month break-even, so the inverted
        // break-even term is 0 for everyone; demand defaults to 0.5.
        let expected = [
            ("biochar", 70.0),
            ("pellets", 55.33),
            ("compost", 27.33),
            ("direct_incorporation", 10.0),
        ];
        assert_eq!(ranked.len(), expected.len());
        for (candidate, (alternative, score)) in ranked.iter().zip(expected) {
            assert_eq!(candidate.alternative, alternative);
            assert_eq!(candidate.final_score, Some(score));
        }
    }

    #[test]
    fn configured_district_demand_lifts_the_score() {
        let candidates = default_candidates_at_ten_tons();
        let ranked = rank(
            candidates,
            "Pune",
            &DemandTable::defaults(),
            &ScoreWeights::default(),
        );

        // biochar demand in Pune is 0.9: 70.0 - 10.0 + 100 * 0.2 * 0.9 = 78.0
        assert_eq!(ranked[0].alternative, "biochar");
        assert_eq!(ranked[0].final_score, Some(78.0));
    }

    #[test]
    fn scores_are_bounded_and_sorted_descending() {
        let ranked = rank(
            default_candidates_at_ten_tons(),
            "Pune",
            &DemandTable::defaults(),
            &ScoreWeights::default(),
        );

        let mut last = f64::INFINITY;
        for candidate in &ranked {
            let score = candidate.final_score.unwrap();
            assert!((0.0..=100.0).contains(&score));
            assert!(score <= last);
            last = score;
        }
    }

    #[test]
    fn ranking_permutes_but_never_drops_candidates() {
        let candidates = default_candidates_at_ten_tons();
        let mut before: Vec<String> = candidates.iter().map(|c| c.alternative.clone()).collect();
        before.sort();

        let ranked = rank(
            candidates,
            "Pune",
            &DemandTable::defaults(),
            &ScoreWeights::default(),
        );
        let mut after: Vec<String> = ranked.iter().map(|c| c.alternative.clone()).collect();
        after.sort();

        assert_eq!(before, after);
    }

    #[test]
    fn empty_input_returns_empty() {
        let ranked = rank(
            Vec::new(),
            "Pune",
            &DemandTable::defaults(),
            &ScoreWeights::default(),
        );
        assert!(ranked.is_empty());
    }

    #[test]
    fn identical_candidates_all_score_alike_and_keep_order() {
        let template = Recommendation {
            alternative: String::new(),
            setup_cost: 100.0,
            expected_income: 300.0,
            profit: 200.0,
            break_even_months: 3,
            co2_saved_tons: 1.0,
            final_score: None,
        };
        let candidates: Vec<Recommendation> = ["first", "second", "third"]
            .iter()
            .map(|name| Recommendation {
                alternative: name.to_string(),
                ..template.clone()
            })
            .collect();

        let ranked = rank(
            candidates,
            "Wardha",
            &DemandTable::defaults(),
            &ScoreWeights::default(),
        );

        // No spread anywhere: profit and CO2 terms get the full degenerate 1.0,
        // break-even inverts to 0, demand stays neutral.
        // 100 * (0.4 + 0.0 + 0.2 + 0.2 * 0.5) = 70.0
        for candidate in &ranked {
            assert_eq!(candidate.final_score, Some(70.0));
        }
        // Stable sort: first-computed order wins among equal scores.
        let order: Vec<&str> = ranked.iter().map(|c| c.alternative.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn default_weights_validate_and_bad_weights_do_not() {
        assert!(ScoreWeights::default().validate().is_ok());

        let lopsided = ScoreWeights {
            profit: 0.9,
            break_even: 0.2,
            co2: 0.2,
            demand: 0.2,
        };
        assert!(lopsided.validate().is_err());

        let negative = ScoreWeights {
            profit: -0.2,
            break_even: 0.6,
            co2: 0.3,
            demand: 0.3,
        };
        assert!(negative.validate().is_err());
    }
}
