use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::RoiError;
use crate::inputs::{AppreciationProfile, PostHandoverGrowth};
use crate::time_value::monthly_rate;
use crate::types::{Money, Percent};
use crate::RoiResult;

/// Annual rate (percent) in force during `month` (1-based, months after booking).
///
/// Construction months use the per-year schedule when it covers that year,
/// otherwise the flat construction rate. Post-handover years are counted from
/// the month after handover.
pub fn rate_for_month(profile: &AppreciationProfile, construction_months: u32, month: u32) -> Percent {
    let month = month.max(1);

    if month <= construction_months {
        let year_index = ((month - 1) / 12) as usize;
        return profile
            .construction_schedule
            .as_ref()
            .and_then(|schedule| schedule.get(year_index).copied())
            .unwrap_or(profile.construction_rate);
    }

    let years_after_handover = (month - construction_months - 1) / 12;
    match &profile.post_handover {
        PostHandoverGrowth::Flat { rate } => *rate,
        PostHandoverGrowth::Phased {
            growth_rate,
            growth_period_years,
            mature_rate,
        } => {
            if years_after_handover < *growth_period_years {
                *growth_rate
            } else {
                *mature_rate
            }
        }
    }
}

/// One month of growth, or an error once the value leaves the Decimal range.
fn grow(
    value: Money,
    profile: &AppreciationProfile,
    construction_months: u32,
    month: u32,
) -> RoiResult<Money> {
    let factor = Decimal::ONE + monthly_rate(rate_for_month(profile, construction_months, month));
    value.checked_mul(factor).ok_or_else(|| RoiError::InvalidInput {
        field: "appreciation".into(),
        reason: format!("property value overflows at month {month}"),
    })
}

/// Property value after `target_months`, compounding monthly at `rate/100/12`.
pub fn future_value(
    base_price: Money,
    construction_months: u32,
    profile: &AppreciationProfile,
    target_months: u32,
) -> RoiResult<Money> {
    let mut value = base_price;
    for month in 1..=target_months {
        value = grow(value, profile, construction_months, month)?;
    }
    Ok(value)
}

/// Month-by-month values, index 0 being the base price.
pub fn value_path(
    base_price: Money,
    construction_months: u32,
    profile: &AppreciationProfile,
    target_months: u32,
) -> RoiResult<Vec<Money>> {
    let mut path = Vec::with_capacity(target_months as usize + 1);
    let mut value = base_price;
    path.push(value);
    for month in 1..=target_months {
        value = grow(value, profile, construction_months, month)?;
        path.push(value);
    }
    Ok(path)
}

/// Growth of `value` over `base_price`, in percent.
pub fn appreciation_percent(base_price: Money, value: Money) -> Percent {
    if base_price.is_zero() {
        return Decimal::ZERO;
    }
    (value - base_price) / base_price * dec!(100)
}
