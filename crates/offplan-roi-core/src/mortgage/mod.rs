pub mod amortization;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::inputs::{InvestmentInput, MortgageConfig};
use crate::payment_plan::{evaluate_payment_plan, PaymentSchedule};
use crate::projection::full_year_rent;
use crate::time_value::percent_to_rate;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::validation::{IssueCode, ValidationReport};
use crate::RoiResult;

pub use amortization::{amortization_schedule, monthly_payment, AmortizationYear};

/// Cash the buyer must find before handover because the plan collects less
/// than the equity the bank requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingGap {
    pub equity_required_percent: Percent,
    pub pre_handover_percent: Percent,
    pub gap_percent: Percent,
    pub gap_amount: Money,
    pub has_gap: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageFees {
    pub processing_fee: Money,
    pub valuation_fee: Money,
    pub registration_fee: Money,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageAnalysis {
    pub loan_amount: Money,
    pub equity_required_amount: Money,
    pub monthly_payment: Money,
    pub total_months: u32,
    pub total_interest: Money,
    pub total_repayment: Money,
    pub upfront_fees: MortgageFees,
    pub annual_life_insurance: Money,
    pub annual_property_insurance: Money,
    /// Loan payment plus insurance, per month
    pub monthly_total_cost: Money,
    pub financing_gap: FinancingGap,
    pub monthly_net_rent: Money,
    /// Net monthly rent over monthly total cost; `None` without a cost
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_coverage_ratio: Option<Decimal>,
    pub amortization: Vec<AmortizationYear>,
}

/// equity required = 100 - financing; gap = max(0, equity required - pre-handover paid).
pub fn financing_gap(
    financing_percent: Percent,
    pre_handover_percent: Percent,
    base_price: Money,
) -> FinancingGap {
    let equity_required_percent = dec!(100) - financing_percent;
    let gap_percent = (equity_required_percent - pre_handover_percent).max(Decimal::ZERO);
    FinancingGap {
        equity_required_percent,
        pre_handover_percent,
        gap_percent,
        gap_amount: base_price * percent_to_rate(gap_percent),
        has_gap: gap_percent > Decimal::ZERO,
    }
}

/// Mortgage economics for a quote. A disabled config yields `None`; a config
/// without a term is reported and yields `None`.
pub fn analyze_mortgage(
    input: &InvestmentInput,
    config: &MortgageConfig,
    schedule: &PaymentSchedule,
    report: &mut ValidationReport,
) -> RoiResult<Option<MortgageAnalysis>> {
    if !config.enabled {
        return Ok(None);
    }
    if config.loan_term_years == 0 {
        report.push(
            IssueCode::MortgageTermMissing,
            "Mortgage is enabled but has no loan term; financing skipped",
        );
        return Ok(None);
    }

    let base = input.base_price;
    let loan_amount = base * percent_to_rate(config.financing_percent);
    let payment = monthly_payment(loan_amount, config.interest_rate, config.loan_term_years)?;
    let total_months = config.loan_term_years * 12;
    let total_repayment = payment * Decimal::from(total_months);

    let processing_fee = loan_amount * percent_to_rate(config.processing_fee_percent);
    let registration_fee = loan_amount * percent_to_rate(config.mortgage_registration_percent);
    let upfront_fees = MortgageFees {
        processing_fee,
        valuation_fee: config.valuation_fee,
        registration_fee,
        total: processing_fee + config.valuation_fee + registration_fee,
    };

    let annual_life_insurance = loan_amount * percent_to_rate(config.life_insurance_percent);
    let annual_property_insurance = config.property_insurance;
    let monthly_total_cost =
        payment + (annual_life_insurance + annual_property_insurance) / dec!(12);

    let gap = financing_gap(config.financing_percent, schedule.pre_handover_percent, base);
    if gap.has_gap {
        report.push(
            IssueCode::FinancingGap,
            format!(
                "Bank requires {}% equity but only {}% is paid before handover: {} to cover",
                gap.equity_required_percent.normalize(),
                gap.pre_handover_percent.normalize(),
                gap.gap_amount.round_dp(2)
            ),
        );
    }

    let monthly_net_rent = full_year_rent(input, 0)?.net_annual_rent / dec!(12);
    let rent_coverage_ratio = if monthly_total_cost > Decimal::ZERO {
        Some(monthly_net_rent / monthly_total_cost)
    } else {
        None
    };

    tracing::debug!(
        loan = %loan_amount,
        payment = %payment,
        gap = %gap.gap_percent,
        "mortgage analysed"
    );

    Ok(Some(MortgageAnalysis {
        equity_required_amount: base - loan_amount,
        monthly_payment: payment,
        total_months,
        total_interest: total_repayment - loan_amount,
        total_repayment,
        upfront_fees,
        annual_life_insurance,
        annual_property_insurance,
        monthly_total_cost,
        financing_gap: gap,
        monthly_net_rent,
        rent_coverage_ratio,
        amortization: amortization_schedule(
            loan_amount,
            config.interest_rate,
            config.loan_term_years,
            payment,
        ),
        loan_amount,
    }))
}

/// A quote with the financing terms to test against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageRequest {
    pub input: InvestmentInput,
    pub mortgage: MortgageConfig,
}

/// Mortgage analysis for a quote without the rest of the pipeline.
pub fn run_mortgage(
    request: &MortgageRequest,
) -> RoiResult<ComputationOutput<Option<MortgageAnalysis>>> {
    let start = Instant::now();
    request.input.validate()?;

    let mut report = ValidationReport::new();
    let schedule = evaluate_payment_plan(&request.input, &mut report)?;
    let analysis = analyze_mortgage(&request.input, &request.mortgage, &schedule, &mut report)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Annuity mortgage on the handover balance with plan-derived equity",
        request,
        report.messages(),
        elapsed,
        analysis,
    ))
}
