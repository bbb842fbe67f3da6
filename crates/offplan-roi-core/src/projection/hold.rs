use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::yearly::{full_year_rent, YearlyProjection};
use crate::appreciation::appreciation_percent;
use crate::costs::EntryCosts;
use crate::inputs::InvestmentInput;
use crate::payment_plan::PaymentSchedule;
use crate::types::{Money, Percent};
use crate::RoiResult;

/// Buy-and-hold aggregates for a stabilised rental year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldAnalysis {
    /// Full plan amount plus entry costs
    pub total_capital_invested: Money,
    pub gross_annual_rent: Money,
    pub annual_service_charge: Money,
    pub net_annual_rent: Money,
    /// Gross rent over base price
    pub gross_rental_yield: Percent,
    /// Net rent over base price
    pub net_rental_yield: Percent,
    /// Net rent over total capital invested
    pub rental_yield_on_investment: Percent,
    /// Years of first-year net rent needed to recover the capital; `None`
    /// when the property nets no rent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_to_pay_off: Option<Decimal>,
    pub final_property_value: Money,
    pub total_appreciation_percent: Percent,
    pub cumulative_net_rent: Money,
}

pub fn hold_analysis(
    input: &InvestmentInput,
    schedule: &PaymentSchedule,
    entry: &EntryCosts,
    projections: &[YearlyProjection],
) -> RoiResult<HoldAnalysis> {
    let total_capital_invested = schedule.total_amount + entry.total;
    let rent = full_year_rent(input, 0)?;

    let ratio = |numerator: Money, denominator: Money| -> Percent {
        if denominator.is_zero() {
            Decimal::ZERO
        } else {
            numerator / denominator * dec!(100)
        }
    };

    let years_to_pay_off = if rent.net_annual_rent > Decimal::ZERO {
        Some((total_capital_invested / rent.net_annual_rent).round_dp(2))
    } else {
        None
    };

    let (final_property_value, cumulative_net_rent) = projections
        .last()
        .map(|row| (row.property_value, row.cumulative_net_rent))
        .unwrap_or((input.base_price, Decimal::ZERO));

    Ok(HoldAnalysis {
        total_capital_invested,
        gross_rental_yield: ratio(rent.gross_annual_rent, input.base_price),
        net_rental_yield: ratio(rent.net_annual_rent, input.base_price),
        rental_yield_on_investment: ratio(rent.net_annual_rent, total_capital_invested),
        gross_annual_rent: rent.gross_annual_rent,
        annual_service_charge: rent.annual_service_charge,
        net_annual_rent: rent.net_annual_rent,
        years_to_pay_off,
        total_appreciation_percent: appreciation_percent(input.base_price, final_property_value),
        final_property_value,
        cumulative_net_rent,
    })
}
