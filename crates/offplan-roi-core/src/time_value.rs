use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::RoiError;
use crate::types::{Money, Percent, Rate};
use crate::RoiResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Whole percentage to decimal rate (7 -> 0.07).
pub fn percent_to_rate(percent: Percent) -> Rate {
    percent / dec!(100)
}

/// Annual percentage to the simple monthly rate used for compounding (6 -> 0.005).
pub fn monthly_rate(annual_percent: Percent) -> Rate {
    percent_to_rate(annual_percent) / MONTHS_PER_YEAR
}

/// (1 + r)^n via iterative multiplication (avoids powd drift). Growth past
/// the Decimal range is an error rather than a panic.
pub fn compound_factor(rate: Rate, periods: u32) -> RoiResult<Decimal> {
    let step = Decimal::ONE + rate;
    let mut factor = Decimal::ONE;
    for _ in 0..periods {
        factor = factor.checked_mul(step).ok_or_else(|| RoiError::InvalidInput {
            field: "rate".into(),
            reason: format!("compounding {rate} over {periods} periods overflows"),
        })?;
    }
    Ok(factor)
}

/// Level payment that amortises `principal` over `periods` at `periodic_rate`:
/// P * r(1+r)^n / ((1+r)^n - 1), or straight-line when the rate is zero.
pub fn annuity_payment(principal: Money, periodic_rate: Rate, periods: u32) -> RoiResult<Money> {
    if periods == 0 {
        return Err(RoiError::DivisionByZero {
            context: "annuity payment over zero periods".into(),
        });
    }

    if periodic_rate.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }

    let compound = compound_factor(periodic_rate, periods)?;
    let denominator = compound - Decimal::ONE;

    if denominator.is_zero() {
        return Err(RoiError::DivisionByZero {
            context: "annuity payment denominator".into(),
        });
    }

    principal
        .checked_mul(periodic_rate)
        .and_then(|v| v.checked_mul(compound / denominator))
        .ok_or_else(|| RoiError::InvalidInput {
            field: "principal".into(),
            reason: "annuity payment overflows".into(),
        })
}

/// Convert a holding-period return into an annual compounding rate:
/// (1 + R)^(12 / months) - 1.
///
/// Zero months returns the period return unchanged; a loss of 100% or more
/// annualises to -100%.
pub fn annualize(period_return: Rate, months: u32) -> Rate {
    if months == 0 || months == 12 {
        return period_return;
    }

    let growth = Decimal::ONE + period_return;
    if growth <= Decimal::ZERO {
        return dec!(-1);
    }

    let exponent = MONTHS_PER_YEAR / Decimal::from(months);
    match growth.checked_powd(exponent) {
        Some(v) => v - Decimal::ONE,
        None => period_return,
    }
}
