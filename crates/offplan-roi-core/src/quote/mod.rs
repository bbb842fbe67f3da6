pub mod cache;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::costs::{entry_costs, EntryCosts};
use crate::exit::{calculate_exit_scenarios, default_exit_months, ExitScenarioResult};
use crate::inputs::{ExitScenarioSet, InvestmentInput, MortgageConfig};
use crate::mortgage::{analyze_mortgage, MortgageAnalysis};
use crate::payment_plan::{evaluate_payment_plan, PaymentSchedule};
use crate::projection::{hold_analysis, project, HoldAnalysis, YearlyProjection};
use crate::types::{with_metadata, ComputationOutput, Currency, YearMonth};
use crate::validation::{IssueCode, ValidationReport};
use crate::RoiResult;

pub use cache::QuoteCache;

/// A quote with its optional financing and chosen exit points, as one
/// serialisable document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub input: InvestmentInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mortgage: Option<MortgageConfig>,
    /// Defaults to handover and yearly points after it
    #[serde(default)]
    pub exit_scenarios: ExitScenarioSet,
}

/// Everything derived from one quote. Recomputed from the input, never stored in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteCalculation {
    pub currency: Currency,
    pub booking: YearMonth,
    pub handover: YearMonth,
    pub handover_label: String,
    pub construction_months: u32,
    pub payment_schedule: PaymentSchedule,
    pub entry_costs: EntryCosts,
    pub projections: Vec<YearlyProjection>,
    pub hold_analysis: HoldAnalysis,
    pub exit_scenarios: Vec<ExitScenarioResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mortgage: Option<MortgageAnalysis>,
    pub validation: ValidationReport,
}

/// Run the full single-quote pipeline: payment plan, entry costs, yearly
/// projection, hold analysis, exit scenarios and, when configured, the mortgage.
pub fn calculate_quote(
    input: &InvestmentInput,
    mortgage: Option<&MortgageConfig>,
    exits: &ExitScenarioSet,
) -> RoiResult<ComputationOutput<QuoteCalculation>> {
    let start = Instant::now();
    input.validate()?;

    let mut report = ValidationReport::new();
    let schedule = evaluate_payment_plan(input, &mut report)?;
    let entry = entry_costs(input.base_price, &input.costs);

    if input.service_charge_per_sqft > Decimal::ZERO && input.unit_size().is_none() {
        report.push(
            IssueCode::UnitSizeMissing,
            "Service charge per sqft given without a unit size; service charge taken as 0",
        );
    }

    let projections = project(input, &schedule, &entry)?;
    let hold = hold_analysis(input, &schedule, &entry, &projections)?;

    let exit_set = if exits.is_empty() {
        default_exit_months(schedule.construction_months, input.horizon_years())
    } else {
        exits.clone()
    };
    let exit_scenarios = calculate_exit_scenarios(&exit_set, input, &schedule, &entry, &mut report)?;

    let mortgage = match mortgage {
        Some(config) => analyze_mortgage(input, config, &schedule, &mut report)?,
        None => None,
    };

    tracing::debug!(
        construction_months = schedule.construction_months,
        years = projections.len(),
        exits = exit_scenarios.len(),
        issues = report.issues.len(),
        "quote calculated"
    );

    let warnings = report.messages();
    let output = QuoteCalculation {
        currency: input.currency.clone(),
        booking: input.booking,
        handover: input.handover,
        handover_label: input.handover.quarter_label(),
        construction_months: schedule.construction_months,
        payment_schedule: schedule,
        entry_costs: entry,
        projections,
        hold_analysis: hold,
        exit_scenarios,
        mortgage,
        validation: report,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Off-plan cashflow projection (monthly compounding, payment-plan capital)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// `calculate_quote` over a `QuoteRequest` document.
pub fn run_quote(request: &QuoteRequest) -> RoiResult<ComputationOutput<QuoteCalculation>> {
    calculate_quote(
        &request.input,
        request.mortgage.as_ref(),
        &request.exit_scenarios,
    )
}
