use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Instant;

use offplan_roi_core::mortgage::{
    self, amortization_schedule, monthly_payment, AmortizationYear, MortgageRequest,
};
use offplan_roi_core::with_metadata;

use crate::input;

/// Arguments for mortgage analysis
#[derive(Args)]
pub struct MortgageArgs {
    /// Path to a mortgage document (`{"input": ..., "mortgage": ...}`)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal, for a quick payment calculation without a quote
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 4.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value = "25")]
    pub years: u32,
}

#[derive(Serialize)]
struct LoanSummary {
    principal: Decimal,
    interest_rate: Decimal,
    loan_term_years: u32,
    monthly_payment: Decimal,
    total_repayment: Decimal,
    total_interest: Decimal,
    amortization: Vec<AmortizationYear>,
}

pub fn run_mortgage(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(request) = input::read_document::<MortgageRequest>(args.input.as_deref())? {
        let result = mortgage::run_mortgage(&request)?;
        return Ok(serde_json::to_value(result)?);
    }

    let start = Instant::now();
    let principal = args
        .principal
        .ok_or("--principal is required (or provide --input)")?;
    let rate = args.rate.unwrap_or(dec!(4.5));

    let payment = monthly_payment(principal, rate, args.years)?;
    let total_repayment = payment * Decimal::from(args.years * 12);
    let summary = LoanSummary {
        principal,
        interest_rate: rate,
        loan_term_years: args.years,
        monthly_payment: payment,
        total_repayment,
        total_interest: total_repayment - principal,
        amortization: amortization_schedule(principal, rate, args.years, payment),
    };

    let assumptions = json!({ "principal": principal, "rate": rate, "years": args.years });
    let output = with_metadata(
        "Level annuity payment on a fixed-rate loan",
        &assumptions,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        summary,
    );
    Ok(serde_json::to_value(output)?)
}
