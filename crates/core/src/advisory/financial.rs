use crate::advisory::round2;
use crate::domain::advisory::Recommendation;
use crate::tables::ProfileTable;

pub const BREAK_EVEN_FAST_MONTHS: u32 = 3;
pub const BREAK_EVEN_SLOW_MONTHS: u32 = 12;

/// Project financial metrics for every configured alternative.
///
/// `district` and `demand_score` are accepted for forward compatibility only:
/// demand enters the pipeline at the ranking stage, not here.
///
/// Break-even is a deliberate two-bucket classifier (3 months when the
/// projection is profitable, 12 otherwise), not an amortization schedule.
pub fn project(
    profiles: &ProfileTable,
    residue_tons: f64,
    _district: &str,
    _demand_score: f64,
) -> anyhow::Result<Vec<Recommendation>> {
    anyhow::ensure!(
        residue_tons.is_finite() && residue_tons >= 0.0,
        "residue_tons must be a non-negative number (got {residue_tons})"
    );

    let mut out = Vec::with_capacity(profiles.len());
    for (alternative, profile) in profiles.iter() {
        let setup_cost = residue_tons * profile.setup_cost_per_ton;
        let expected_income = residue_tons * profile.income_per_ton;
        let profit = expected_income - setup_cost;

        let break_even_months = if profit > 0.0 {
            BREAK_EVEN_FAST_MONTHS
        } else {
            BREAK_EVEN_SLOW_MONTHS
        };

        out.push(Recommendation {
            alternative: alternative.clone(),
            setup_cost: round2(setup_cost),
            expected_income: round2(expected_income),
            profit: round2(profit),
            break_even_months,
            co2_saved_tons: round2(residue_tons * profile.co2_saving_per_ton),
            final_score: None,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn biochar_metrics_at_ten_tons() {
        let profiles = ProfileTable::defaults();
        let candidates = project(&profiles, 10.0, "Pune", 0.5).unwrap();

        let biochar = candidates
            .iter()
            .find(|c| c.alternative == "biochar")
            .unwrap();
        assert_eq!(biochar.setup_cost, 30000.0);
        assert_eq!(biochar.expected_income, 55000.0);
        assert_eq!(biochar.profit, 25000.0);
        assert_eq!(biochar.break_even_months, BREAK_EVEN_FAST_MONTHS);
        assert_eq!(biochar.co2_saved_tons, 3.0);
        assert_eq!(biochar.final_score, None);
    }

    #[test]
    fn one_entry_per_configured_alternative() {
        let profiles = ProfileTable::defaults();
        let candidates = project(&profiles, 5.0, "Pune", 0.5).unwrap();
        assert_eq!(candidates.len(), profiles.len());
    }

    #[test]
    fn profit_is_income_minus_cost_for_every_alternative() {
        let profiles = ProfileTable::defaults();
        for c in project(&profiles, 7.25, "Pune", 0.5).unwrap() {
            assert_eq!(c.profit, round2(c.expected_income - c.setup_cost));
            assert!(
                c.break_even_months == BREAK_EVEN_FAST_MONTHS
                    || c.break_even_months == BREAK_EVEN_SLOW_MONTHS
            );
        }
    }

    #[test]
    fn zero_residue_projects_all_zeros_and_slow_break_even() {
        let profiles = ProfileTable::defaults();
        for c in project(&profiles, 0.0, "Pune", 0.5).unwrap() {
            assert_eq!(c.setup_cost, 0.0);
            assert_eq!(c.expected_income, 0.0);
            assert_eq!(c.profit, 0.0);
            // Zero profit is not "profitable": the slow bucket applies.
            assert_eq!(c.break_even_months, BREAK_EVEN_SLOW_MONTHS);
        }
    }

    #[test]
    fn is_idempotent() {
        let profiles = ProfileTable::defaults();
        let first = project(&profiles, 12.34, "Pune", 0.5).unwrap();
        let second = project(&profiles, 12.34, "Pune", 0.5).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_negative_residue() {
        let profiles = ProfileTable::defaults();
        assert!(project(&profiles, -0.01, "Pune", 0.5).is_err());
        assert!(project(&profiles, f64::NAN, "Pune", 0.5).is_err());
    }
}
