use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::appreciation::{appreciation_percent, future_value};
use crate::costs::EntryCosts;
use crate::error::RoiError;
use crate::inputs::{InvestmentInput, MAX_PROJECTION_YEARS};
use crate::payment_plan::PaymentSchedule;
use crate::time_value::{compound_factor, percent_to_rate};
use crate::types::{Money, Percent};
use crate::RoiResult;

/// Rent for one fully let year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentBreakdown {
    pub gross_annual_rent: Money,
    pub annual_service_charge: Money,
    pub net_annual_rent: Money,
}

/// Snapshot at the end of projection year `year` (month `12 * year`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyProjection {
    pub year: u32,
    pub month: u32,
    pub calendar_year: i32,
    /// The year ends on or before handover
    pub under_construction: bool,
    pub property_value: Money,
    pub appreciation_percent: Percent,
    /// Months of this year the unit was rentable (0..=12)
    pub rented_months: u32,
    pub gross_annual_rent: Money,
    pub annual_service_charge: Money,
    pub net_annual_rent: Money,
    pub cumulative_net_rent: Money,
    /// Entry costs plus plan payments made so far
    pub cumulative_capital: Money,
    /// Net rent received minus capital paid out
    pub cumulative_cashflow: Money,
    pub outstanding_balance: Money,
    /// Value minus unpaid balance, plus cumulative cashflow
    pub net_equity: Money,
}

/// Service charge for a year; zero when the unit size is unknown.
pub fn annual_service_charge(input: &InvestmentInput) -> Money {
    input
        .unit_size()
        .map(|size| size * input.service_charge_per_sqft)
        .unwrap_or(Decimal::ZERO)
}

/// Rent for a fully let year after `rent_years` years of rent growth.
pub fn full_year_rent(input: &InvestmentInput, rent_years: u32) -> RoiResult<RentBreakdown> {
    let growth = compound_factor(percent_to_rate(input.rent_growth_rate), rent_years)?;
    let gross_annual_rent = (input.base_price * percent_to_rate(input.rental_yield_percent))
        .checked_mul(growth)
        .ok_or_else(|| RoiError::InvalidInput {
            field: "rent_growth_rate".into(),
            reason: format!("rent overflows after {rent_years} years of growth"),
        })?;
    let annual_service_charge = annual_service_charge(input);
    Ok(RentBreakdown {
        net_annual_rent: (gross_annual_rent - annual_service_charge).max(Decimal::ZERO),
        gross_annual_rent,
        annual_service_charge,
    })
}

/// Year-by-year projection for years `0..=horizon`.
///
/// Row `y` covers months `(12(y-1), 12y]`. Rent accrues only for months after
/// handover and is prorated when handover falls inside the year; rent growth
/// applies once per completed rental year.
pub fn project(
    input: &InvestmentInput,
    schedule: &PaymentSchedule,
    entry: &EntryCosts,
) -> RoiResult<Vec<YearlyProjection>> {
    let construction_months = schedule.construction_months;
    let horizon = input.horizon_years();
    if horizon > MAX_PROJECTION_YEARS {
        return Err(RoiError::InvalidInput {
            field: "projection_years".into(),
            reason: format!("Projection is limited to {MAX_PROJECTION_YEARS} years"),
        });
    }
    let mut rows = Vec::with_capacity(horizon as usize + 1);
    let mut cumulative_net_rent = Decimal::ZERO;

    for year in 0..=horizon {
        let month = year * 12;
        let property_value =
            future_value(input.base_price, construction_months, &input.appreciation, month)?;

        let (rented_months, rent) = if year == 0 {
            (0, None)
        } else {
            let rented = month.saturating_sub(construction_months).min(12);
            let year_start = month - 12;
            let rent_years = year_start.saturating_sub(construction_months) / 12;
            (rented, Some(full_year_rent(input, rent_years)?))
        };

        let share = Decimal::from(rented_months) / dec!(12);
        let (gross_annual_rent, annual_service_charge, net_annual_rent) = match rent {
            Some(r) if rented_months > 0 => (
                r.gross_annual_rent * share,
                r.annual_service_charge * share,
                r.net_annual_rent * share,
            ),
            _ => (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        };
        cumulative_net_rent += net_annual_rent;

        let cumulative_capital = entry.total + schedule.amount_paid_by(month);
        let outstanding_balance = schedule.outstanding_after(month);
        let cumulative_cashflow = cumulative_net_rent - cumulative_capital;

        rows.push(YearlyProjection {
            year,
            month,
            calendar_year: input.booking.year + year as i32,
            under_construction: month <= construction_months,
            appreciation_percent: appreciation_percent(input.base_price, property_value),
            property_value,
            rented_months,
            gross_annual_rent,
            annual_service_charge,
            net_annual_rent,
            cumulative_net_rent,
            cumulative_capital,
            cumulative_cashflow,
            outstanding_balance,
            net_equity: property_value - outstanding_balance + cumulative_cashflow,
        });
    }

    Ok(rows)
}
