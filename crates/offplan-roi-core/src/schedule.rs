use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::inputs::{PaymentMilestone, TriggerKind};
use crate::types::YearMonth;
use crate::RoiResult;

/// Months between booking and handover, never less than one.
pub fn construction_months(booking: &YearMonth, handover: &YearMonth) -> u32 {
    let months = booking.months_until(handover);
    if months < 1 {
        1
    } else {
        months as u32
    }
}

/// A milestone trigger mapped onto the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTrigger {
    /// Months after booking
    pub month: u32,
    /// The raw trigger fell outside its valid range and was clamped
    pub clamped: bool,
}

/// Resolve a milestone to a month index within `[0, construction_months]`.
///
/// Construction-percent triggers are linear in elapsed construction time:
/// 50% built on a 24-month build is month 12.
pub fn resolve_trigger_month(milestone: &PaymentMilestone, construction_months: u32) -> ResolvedTrigger {
    let span = Decimal::from(construction_months);
    let (raw_month, clamped) = match milestone.trigger {
        TriggerKind::Time => {
            let v = milestone.trigger_value;
            let clamped = v < Decimal::ZERO || v > span;
            (v.clamp(Decimal::ZERO, span), clamped)
        }
        TriggerKind::Construction => {
            let v = milestone.trigger_value;
            let clamped = v < Decimal::ZERO || v > dec!(100);
            let pct = v.clamp(Decimal::ZERO, dec!(100));
            (pct / dec!(100) * span, clamped)
        }
    };

    let month = raw_month
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0);

    ResolvedTrigger { month, clamped }
}

/// Calendar month of a schedule position.
pub fn month_to_calendar(booking: &YearMonth, month: u32) -> RoiResult<YearMonth> {
    booking.add_months(month)
}
