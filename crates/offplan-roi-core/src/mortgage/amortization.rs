use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RoiError;
use crate::time_value::{annuity_payment, monthly_rate};
use crate::types::{Money, Percent};
use crate::RoiResult;

/// One loan year of a fixed-rate amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub opening_balance: Money,
    pub interest_paid: Money,
    pub principal_paid: Money,
    pub closing_balance: Money,
}

/// Longest loan term accepted.
pub const MAX_LOAN_TERM_YEARS: u32 = 50;

/// Fixed monthly payment for `principal` at `annual_rate_percent` over
/// `term_years`. A zero rate repays in equal installments.
pub fn monthly_payment(principal: Money, annual_rate_percent: Percent, term_years: u32) -> RoiResult<Money> {
    if term_years > MAX_LOAN_TERM_YEARS {
        return Err(RoiError::InvalidInput {
            field: "loan_term_years".into(),
            reason: format!("Loan term is limited to {MAX_LOAN_TERM_YEARS} years"),
        });
    }
    annuity_payment(principal, monthly_rate(annual_rate_percent), term_years * 12)
}

/// Year-by-year balance rundown for a level-payment loan.
pub fn amortization_schedule(
    principal: Money,
    annual_rate_percent: Percent,
    term_years: u32,
    payment: Money,
) -> Vec<AmortizationYear> {
    let rate = monthly_rate(annual_rate_percent);
    let total_months = term_years * 12;
    let mut balance = principal;
    let mut years = Vec::with_capacity(term_years as usize);

    for year in 1..=term_years {
        let opening_balance = balance;
        let mut interest_paid = Decimal::ZERO;
        let mut principal_paid = Decimal::ZERO;

        for month in 1..=12 {
            if (year - 1) * 12 + month > total_months || balance <= Decimal::ZERO {
                break;
            }
            let interest = balance * rate;
            // Final payment clears rounding residue
            let principal_part = (payment - interest).min(balance);
            balance -= principal_part;
            interest_paid += interest;
            principal_paid += principal_part;
        }

        years.push(AmortizationYear {
            year,
            opening_balance,
            interest_paid,
            principal_paid,
            closing_balance: balance,
        });
    }

    years
}
