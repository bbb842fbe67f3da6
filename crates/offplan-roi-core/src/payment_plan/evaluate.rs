use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{Installment, InstallmentKind, PaymentSchedule};
use crate::inputs::InvestmentInput;
use crate::schedule::{month_to_calendar, resolve_trigger_month};
use crate::time_value::percent_to_rate;
use crate::types::{Money, Percent};
use crate::validation::{IssueCode, ValidationReport};
use crate::RoiResult;

/// Allowed deviation of the plan total from 100%, in percentage points.
pub const BALANCE_TOLERANCE: Percent = dec!(0.5);

/// Unresolved line item before calendar dates and running totals are attached.
struct Draft {
    id: String,
    kind: InstallmentKind,
    label: String,
    month: u32,
    percent: Percent,
}

/// Allocate the base price across the plan and resolve every installment's
/// month. Imbalanced or inconsistent plans are reported, never rejected.
pub fn evaluate_payment_plan(
    input: &InvestmentInput,
    report: &mut ValidationReport,
) -> RoiResult<PaymentSchedule> {
    let base = input.base_price;
    let construction_months = input.construction_months();

    if input.booking.months_until(&input.handover) < 1 {
        report.push(
            IssueCode::HandoverNotAfterBooking,
            format!(
                "Handover {}-{:02} is not after booking {}-{:02}; construction treated as 1 month",
                input.handover.year, input.handover.month, input.booking.year, input.booking.month
            ),
        );
    }

    let mut drafts = vec![Draft {
        id: "downpayment".into(),
        kind: InstallmentKind::Downpayment,
        label: "Downpayment".into(),
        month: 0,
        percent: input.downpayment_percent,
    }];

    let mut milestones_percent = Decimal::ZERO;
    for (i, milestone) in input.additional_payments.iter().enumerate() {
        let resolved = resolve_trigger_month(milestone, construction_months);
        if resolved.clamped {
            report.push(
                IssueCode::TriggerOutOfRange,
                format!(
                    "Milestone '{}' trigger {} is out of range; moved to month {}",
                    milestone.id, milestone.trigger_value, resolved.month
                ),
            );
        }
        milestones_percent += milestone.payment_percent;
        drafts.push(Draft {
            id: milestone.id.clone(),
            kind: InstallmentKind::Milestone,
            label: milestone
                .label
                .clone()
                .unwrap_or_else(|| format!("Installment {}", i + 1)),
            month: resolved.month,
            percent: milestone.payment_percent,
        });
    }

    let post_handover_percent = input.post_handover_percent();
    let handover_percent = match input.on_handover_percent {
        Some(p) => p,
        None => (dec!(100) - input.downpayment_percent - milestones_percent - post_handover_percent)
            .max(Decimal::ZERO),
    };

    if handover_percent > Decimal::ZERO {
        drafts.push(Draft {
            id: "on_handover".into(),
            kind: InstallmentKind::OnHandover,
            label: "On handover".into(),
            month: construction_months,
            percent: handover_percent,
        });
    }

    if let Some(plan) = input.post_handover.as_ref().filter(|p| p.percent > Decimal::ZERO) {
        let count = plan.duration_months.max(1);
        let share = plan.percent / Decimal::from(count);
        for n in 1..=count {
            let percent = if n == count {
                plan.percent - share * Decimal::from(count - 1)
            } else {
                share
            };
            drafts.push(Draft {
                id: format!("post_handover_{n}"),
                kind: InstallmentKind::PostHandover,
                label: format!("Post-handover {n}/{count}"),
                month: construction_months + n,
                percent,
            });
        }
    }

    // Stable: milestones sharing a month keep their input order
    drafts.sort_by_key(|d| (d.month, d.kind));

    let mut installments = Vec::with_capacity(drafts.len());
    let mut cumulative_percent = Decimal::ZERO;
    let mut cumulative_amount = Decimal::ZERO;
    for draft in drafts {
        let amount = amount_for(base, draft.percent);
        cumulative_percent += draft.percent;
        cumulative_amount += amount;
        installments.push(Installment {
            date: month_to_calendar(&input.booking, draft.month)?,
            id: draft.id,
            kind: draft.kind,
            label: draft.label,
            month: draft.month,
            percent: draft.percent,
            amount,
            cumulative_percent,
            cumulative_amount,
        });
    }

    let pre_handover_percent = input.downpayment_percent + milestones_percent;
    let total_percent = pre_handover_percent + handover_percent + post_handover_percent;
    let is_balanced = (total_percent - dec!(100)).abs() <= BALANCE_TOLERANCE;

    if !is_balanced {
        report.push(
            IssueCode::PlanImbalance,
            format!(
                "Payment plan allocates {}% of the price (expected 100%)",
                total_percent.normalize()
            ),
        );
    }

    if (input.pre_handover_percent - pre_handover_percent).abs() > BALANCE_TOLERANCE {
        report.push(
            IssueCode::PreHandoverMismatch,
            format!(
                "Declared pre-handover {}% but downpayment and installments total {}%",
                input.pre_handover_percent.normalize(),
                pre_handover_percent.normalize()
            ),
        );
    }

    if pre_handover_percent > dec!(100) + BALANCE_TOLERANCE {
        report.push(
            IssueCode::PreHandoverExceedsTotal,
            format!(
                "Downpayment and installments before handover total {}%, more than the full price",
                pre_handover_percent.normalize()
            ),
        );
    }

    if input.downpayment_percent > input.pre_handover_percent {
        report.push(
            IssueCode::DownpaymentExceedsPreHandover,
            format!(
                "Downpayment {}% exceeds pre-handover {}%",
                input.downpayment_percent.normalize(),
                input.pre_handover_percent.normalize()
            ),
        );
    }

    let milestones_amount = amount_for(base, milestones_percent);
    let monthly_burn_rate = milestones_amount / Decimal::from(construction_months);

    let mut schedule = PaymentSchedule {
        base_price: base,
        construction_months,
        installments,
        downpayment_percent: input.downpayment_percent,
        milestones_percent,
        pre_handover_percent,
        handover_percent,
        post_handover_percent,
        total_percent,
        pre_handover_amount: amount_for(base, pre_handover_percent),
        handover_amount: amount_for(base, handover_percent),
        post_handover_amount: amount_for(base, post_handover_percent),
        total_amount: amount_for(base, total_percent),
        is_balanced,
        monthly_burn_rate,
        resell_eligible_month: None,
        mortgage_eligible_month: None,
    };
    schedule.resell_eligible_month = schedule.month_reaching_percent(input.resell_eligible_percent);
    schedule.mortgage_eligible_month =
        schedule.month_reaching_percent(input.mortgage_eligible_percent);

    tracing::debug!(
        installments = schedule.installments.len(),
        total_percent = %schedule.total_percent,
        balanced = schedule.is_balanced,
        "payment plan evaluated"
    );

    Ok(schedule)
}

fn amount_for(base: Money, percent: Percent) -> Money {
    base * percent_to_rate(percent)
}
