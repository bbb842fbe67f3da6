use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::appreciation::future_value;
use crate::costs::{entry_costs, exit_costs, EntryCosts, ExitCosts};
use crate::error::RoiError;
use crate::inputs::{ExitScenarioSet, InvestmentInput, MAX_HOLD_MONTHS};
use crate::payment_plan::{evaluate_payment_plan, PaymentSchedule};
use crate::schedule::month_to_calendar;
use crate::time_value::{annualize, percent_to_rate};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, YearMonth};
use crate::validation::{IssueCode, ValidationReport};
use crate::RoiResult;

/// Profitability of a resale `exit_month` months after booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitScenarioResult {
    pub exit_month: u32,
    pub exit_date: YearMonth,
    pub years_held: Decimal,
    pub exit_price: Money,
    pub appreciation: Money,
    pub percent_paid: Percent,
    pub amount_paid: Money,
    /// Unpaid plan balance the next buyer takes over
    pub outstanding_balance: Money,
    pub entry_costs: Money,
    pub exit_costs: ExitCosts,
    /// Plan payments made plus entry costs
    pub capital_invested: Money,
    pub true_profit: Money,
    pub net_roe: Percent,
    pub annualized_roe: Percent,
    /// Enough of the price is paid for the developer to allow a resale
    pub is_available: bool,
    pub is_post_handover: bool,
}

/// Resale at `exit_month`.
///
/// The seller receives the exit price less the balance still owed under the
/// plan, so before handover the profit is the appreciation net of fees, and
/// once fully paid it is exit price minus capital minus exit costs.
pub fn calculate_exit_scenario(
    exit_month: u32,
    input: &InvestmentInput,
    schedule: &PaymentSchedule,
    entry: &EntryCosts,
) -> RoiResult<ExitScenarioResult> {
    if exit_month > MAX_HOLD_MONTHS {
        return Err(RoiError::InvalidInput {
            field: "exit_scenarios".into(),
            reason: format!("Exit at month {exit_month} is past the {MAX_HOLD_MONTHS}-month limit"),
        });
    }
    let exit_price = future_value(
        input.base_price,
        schedule.construction_months,
        &input.appreciation,
        exit_month,
    )?;
    let costs = exit_costs(exit_price, &input.costs);

    let amount_paid = schedule.amount_paid_by(exit_month);
    let percent_paid = schedule.percent_paid_by(exit_month);
    let outstanding_balance = schedule.outstanding_after(exit_month);
    let capital_invested = amount_paid + entry.total;

    let true_profit = exit_price - outstanding_balance - capital_invested - costs.total;

    let net_roe = if capital_invested.is_zero() {
        Decimal::ZERO
    } else {
        true_profit / capital_invested * dec!(100)
    };
    let annualized_roe = if capital_invested.is_zero() {
        Decimal::ZERO
    } else {
        annualize(percent_to_rate(net_roe), exit_month) * dec!(100)
    };

    Ok(ExitScenarioResult {
        exit_month,
        exit_date: month_to_calendar(&input.booking, exit_month)?,
        years_held: Decimal::from(exit_month) / dec!(12),
        appreciation: exit_price - input.base_price,
        exit_price,
        percent_paid,
        amount_paid,
        outstanding_balance,
        entry_costs: entry.total,
        exit_costs: costs,
        capital_invested,
        true_profit,
        net_roe,
        annualized_roe,
        is_available: percent_paid >= input.minimum_exit_threshold,
        is_post_handover: exit_month >= schedule.construction_months,
    })
}

/// Exit points used when the caller supplies none: handover, then every
/// twelve months after it within the projection horizon. When handover lies
/// past the horizon the only default is a resale at the horizon end.
pub fn default_exit_months(construction_months: u32, horizon_years: u32) -> ExitScenarioSet {
    let horizon_months = horizon_years.saturating_mul(12);
    if construction_months > horizon_months {
        return ExitScenarioSet::new([horizon_months]);
    }
    let months = (construction_months..=horizon_months).step_by(12);
    ExitScenarioSet::new(months)
}

/// Every exit in `exits`, flagging those below the resale threshold or
/// beyond the projection horizon.
pub fn calculate_exit_scenarios(
    exits: &ExitScenarioSet,
    input: &InvestmentInput,
    schedule: &PaymentSchedule,
    entry: &EntryCosts,
    report: &mut ValidationReport,
) -> RoiResult<Vec<ExitScenarioResult>> {
    let horizon_months = input.horizon_years().saturating_mul(12);
    let mut results = Vec::with_capacity(exits.months().len());

    for &month in exits.months() {
        let scenario = calculate_exit_scenario(month, input, schedule, entry)?;
        if !scenario.is_available {
            report.push(
                IssueCode::ExitBelowThreshold,
                format!(
                    "Exit at month {month}: {}% paid, below the {}% resale threshold",
                    scenario.percent_paid.normalize(),
                    input.minimum_exit_threshold.normalize()
                ),
            );
        }
        if month > horizon_months {
            report.push(
                IssueCode::ExitBeyondHorizon,
                format!("Exit at month {month} is beyond the {horizon_months}-month projection"),
            );
        }
        results.push(scenario);
    }

    Ok(results)
}

/// A quote and the resale months to evaluate, as one serialisable document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitRequest {
    pub input: InvestmentInput,
    /// Defaults to handover and yearly points after it
    #[serde(default)]
    pub exit_scenarios: ExitScenarioSet,
}

/// Exit scenarios for a quote without the rest of the pipeline.
pub fn run_exit_scenarios(
    request: &ExitRequest,
) -> RoiResult<ComputationOutput<Vec<ExitScenarioResult>>> {
    let start = Instant::now();
    let input = &request.input;
    input.validate()?;

    let mut report = ValidationReport::new();
    let schedule = evaluate_payment_plan(input, &mut report)?;
    let entry = entry_costs(input.base_price, &input.costs);

    let exits = if request.exit_scenarios.is_empty() {
        default_exit_months(schedule.construction_months, input.horizon_years())
    } else {
        request.exit_scenarios.clone()
    };
    let results = calculate_exit_scenarios(&exits, input, &schedule, &entry, &mut report)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Resale profitability (buyer assumes unpaid plan balance)",
        request,
        report.messages(),
        elapsed,
        results,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costs::entry_costs;
    use crate::inputs::PostHandoverGrowth;
    use crate::payment_plan::evaluate_payment_plan;
    use crate::test_support::scenario_input;
    use rust_decimal::MathematicalOps;
    use rust_decimal_macros::dec;

    fn setup(input: &InvestmentInput) -> (PaymentSchedule, EntryCosts) {
        let plan = evaluate_payment_plan(input, &mut ValidationReport::new()).unwrap();
        let entry = entry_costs(input.base_price, &input.costs);
        (plan, entry)
    }

    #[test]
    fn test_exit_at_handover_no_appreciation_loses_entry_costs() {
        let input = scenario_input();
        let (plan, entry) = setup(&input);
        let exit = calculate_exit_scenario(24, &input, &plan, &entry).unwrap();

        // DLD 4% of 1.5M + 4,000 oqood
        assert_eq!(entry.total, dec!(64000));
        assert_eq!(exit.exit_price, dec!(1500000));
        assert_eq!(exit.capital_invested, dec!(1564000));
        assert_eq!(exit.outstanding_balance, Decimal::ZERO);
        assert_eq!(exit.true_profit, dec!(-64000));
        assert!(exit.is_post_handover);
    }

    #[test]
    fn test_exit_at_month_zero() {
        let mut input = scenario_input();
        input.appreciation.construction_rate = dec!(10);
        let (plan, entry) = setup(&input);
        let exit = calculate_exit_scenario(0, &input, &plan, &entry).unwrap();

        assert_eq!(exit.true_profit, -entry.total);
        assert_eq!(exit.capital_invested, dec!(364000));
        assert!((exit.annualized_roe - exit.net_roe).abs() < dec!(0.000001));
        assert_eq!(exit.years_held, Decimal::ZERO);
    }

    #[test]
    fn test_pre_handover_flip_profit_is_appreciation_net_of_fees() {
        let mut input = scenario_input();
        input.appreciation.construction_rate = dec!(12);
        input.costs.exit_agent_commission_enabled = true;
        input.costs.exit_noc_fee = dec!(5000);
        let (plan, entry) = setup(&input);
        let exit = calculate_exit_scenario(12, &input, &plan, &entry).unwrap();

        let expected = exit.exit_price - input.base_price - entry.total - exit.exit_costs.total;
        assert!((exit.true_profit - expected).abs() < dec!(0.0001));
        assert_eq!(exit.amount_paid, dec!(600000));
        assert_eq!(exit.outstanding_balance, dec!(900000));
        assert!(exit.true_profit > Decimal::ZERO);
        assert!(!exit.is_post_handover);
    }

    #[test]
    fn test_annualized_roe_compounds() {
        let mut input = scenario_input();
        input.appreciation.construction_rate = dec!(10);
        input.appreciation.post_handover = PostHandoverGrowth::Flat { rate: dec!(10) };
        let (plan, entry) = setup(&input);
        let exit = calculate_exit_scenario(48, &input, &plan, &entry).unwrap();

        let expected = ((Decimal::ONE + exit.net_roe / dec!(100)).powf(0.25) - Decimal::ONE)
            * dec!(100);
        assert!((exit.annualized_roe - expected).abs() < dec!(0.01));
        assert!(exit.annualized_roe < exit.net_roe);
    }

    #[test]
    fn test_threshold_availability() {
        let mut input = scenario_input();
        input.minimum_exit_threshold = dec!(40);
        let (plan, entry) = setup(&input);
        let mut report = ValidationReport::new();
        let exits = ExitScenarioSet::new(vec![6, 12, 24]);
        let results = calculate_exit_scenarios(&exits, &input, &plan, &entry, &mut report).unwrap();

        assert!(!results[0].is_available);
        assert!(results[1].is_available);
        assert!(results[2].is_available);
        assert!(report.has(IssueCode::ExitBelowThreshold));
        assert_eq!(report.issues.len(), 1);
    }

    #[test]
    fn test_exit_beyond_horizon_flagged() {
        let input = scenario_input();
        let (plan, entry) = setup(&input);
        let mut report = ValidationReport::new();
        let exits = ExitScenarioSet::new(vec![180]);
        calculate_exit_scenarios(&exits, &input, &plan, &entry, &mut report).unwrap();
        assert!(report.has(IssueCode::ExitBeyondHorizon));
    }

    #[test]
    fn test_default_exit_months() {
        let set = default_exit_months(24, 5);
        assert_eq!(set.months(), &[24, 36, 48, 60]);
        let set = default_exit_months(24, 2);
        assert_eq!(set.months(), &[24]);
    }

    #[test]
    fn test_default_exits_stay_inside_horizon() {
        // handover at month 30 with a 2-year horizon
        assert_eq!(default_exit_months(30, 2).months(), &[24]);

        let mut input = scenario_input();
        input.handover = YearMonth { year: 2036, month: 1 };
        let request = ExitRequest {
            input,
            exit_scenarios: ExitScenarioSet::default(),
        };
        let out = run_exit_scenarios(&request).unwrap();
        assert_eq!(out.result.len(), 1);
        assert_eq!(out.result[0].exit_month, 120);
        assert!(!out.result[0].is_post_handover);
        assert!(!out.warnings.iter().any(|w| w.contains("beyond")));
    }

    #[test]
    fn test_exit_past_hold_limit_is_rejected() {
        let request = ExitRequest {
            input: scenario_input(),
            exit_scenarios: ExitScenarioSet::new(vec![4000]),
        };
        let err = run_exit_scenarios(&request).unwrap_err();
        assert!(matches!(err, RoiError::InvalidInput { ref field, .. } if field == "exit_scenarios"));
    }

    #[test]
    fn test_run_exit_scenarios_defaults_to_handover_points() {
        let request = ExitRequest {
            input: scenario_input(),
            exit_scenarios: ExitScenarioSet::default(),
        };
        let out = run_exit_scenarios(&request).unwrap();
        assert_eq!(out.result.len(), 9);
        assert_eq!(out.result[0].exit_month, 24);
        assert!(out.warnings.is_empty());
    }
}
