use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::inputs::{InvestmentInput, PaymentMilestone, TriggerKind};

/// Spread the allocable pre-handover percent (pre-handover minus downpayment)
/// evenly across the existing milestones and re-space their triggers at even
/// intervals over construction. The last milestone absorbs rounding so the
/// shares always add up to the allocable total.
pub fn auto_distribute(input: &InvestmentInput) -> Vec<PaymentMilestone> {
    let count = input.additional_payments.len();
    if count == 0 {
        return Vec::new();
    }

    let construction_months = Decimal::from(input.construction_months());
    let allocable = (input.pre_handover_percent - input.downpayment_percent).max(Decimal::ZERO);
    let share = (allocable / Decimal::from(count)).round_dp(2);
    let slots = Decimal::from(count + 1);

    input
        .additional_payments
        .iter()
        .enumerate()
        .map(|(i, milestone)| {
            let position = Decimal::from(i + 1);
            let payment_percent = if i + 1 == count {
                allocable - share * Decimal::from(count - 1)
            } else {
                share
            };
            let trigger_value = match milestone.trigger {
                TriggerKind::Time => (construction_months * position / slots)
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
                TriggerKind::Construction => (dec!(100) * position / slots).round_dp(2),
            };
            PaymentMilestone {
                trigger_value,
                payment_percent,
                ..milestone.clone()
            }
        })
        .collect()
}

/// Copy of `input` with its milestones auto-distributed.
pub fn with_auto_distributed(input: &InvestmentInput) -> InvestmentInput {
    InvestmentInput {
        additional_payments: auto_distribute(input),
        ..input.clone()
    }
}
