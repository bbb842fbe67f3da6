pub mod distribute;
pub mod evaluate;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::inputs::InvestmentInput;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, YearMonth};
use crate::validation::ValidationReport;
use crate::RoiResult;

pub use distribute::{auto_distribute, with_auto_distributed};
pub use evaluate::{evaluate_payment_plan, BALANCE_TOLERANCE};

/// Where an installment sits in the plan. Variant order is the payment order
/// for installments falling in the same month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentKind {
    Downpayment,
    Milestone,
    OnHandover,
    PostHandover,
}

/// One resolved payment with its calendar position and amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub id: String,
    pub kind: InstallmentKind,
    pub label: String,
    /// Months after booking
    pub month: u32,
    pub date: YearMonth,
    pub percent: Percent,
    pub amount: Money,
    pub cumulative_percent: Percent,
    pub cumulative_amount: Money,
}

/// The full payment plan, ordered by due month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSchedule {
    pub base_price: Money,
    pub construction_months: u32,
    pub installments: Vec<Installment>,
    pub downpayment_percent: Percent,
    pub milestones_percent: Percent,
    /// Downpayment plus construction milestones
    pub pre_handover_percent: Percent,
    pub handover_percent: Percent,
    pub post_handover_percent: Percent,
    pub total_percent: Percent,
    pub pre_handover_amount: Money,
    pub handover_amount: Money,
    pub post_handover_amount: Money,
    pub total_amount: Money,
    /// Allocations sum to 100% within tolerance
    pub is_balanced: bool,
    /// Construction installments (downpayment excluded) per construction month
    pub monthly_burn_rate: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resell_eligible_month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mortgage_eligible_month: Option<u32>,
}

impl PaymentSchedule {
    /// Total paid up to and including `month`.
    pub fn amount_paid_by(&self, month: u32) -> Money {
        self.installments
            .iter()
            .filter(|i| i.month <= month)
            .map(|i| i.amount)
            .sum()
    }

    pub fn percent_paid_by(&self, month: u32) -> Percent {
        self.installments
            .iter()
            .filter(|i| i.month <= month)
            .map(|i| i.percent)
            .sum()
    }

    /// Plan amounts still unpaid after `month`.
    pub fn outstanding_after(&self, month: u32) -> Money {
        (self.total_amount - self.amount_paid_by(month)).max(Decimal::ZERO)
    }

    /// First month at which the cumulative paid percent reaches `percent`.
    pub fn month_reaching_percent(&self, percent: Percent) -> Option<u32> {
        if percent <= Decimal::ZERO {
            return Some(0);
        }
        self.installments
            .iter()
            .find(|i| i.cumulative_percent >= percent)
            .map(|i| i.month)
    }

    /// Last month with a scheduled payment.
    pub fn final_payment_month(&self) -> u32 {
        self.installments
            .iter()
            .map(|i| i.month)
            .max()
            .unwrap_or(0)
    }

    /// "20/40/60", or "20/50/30/20PH" with a post-handover tail: downpayment,
    /// pre-handover total, on-handover, post-handover.
    pub fn shape_label(&self) -> String {
        let base = format!(
            "{}/{}/{}",
            self.downpayment_percent.normalize(),
            self.pre_handover_percent.normalize(),
            self.handover_percent.normalize()
        );
        if self.post_handover_percent > Decimal::ZERO {
            format!("{base}/{}PH", self.post_handover_percent.normalize())
        } else {
            base
        }
    }
}

/// A quote's payment terms, optionally with milestones auto-distributed first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub input: InvestmentInput,
    #[serde(default)]
    pub auto_distribute: bool,
}

pub fn run_payment_plan(request: &PlanRequest) -> RoiResult<ComputationOutput<PaymentSchedule>> {
    let start = Instant::now();
    request.input.validate()?;

    let input = if request.auto_distribute {
        with_auto_distributed(&request.input)
    } else {
        request.input.clone()
    };
    let mut report = ValidationReport::new();
    let schedule = evaluate_payment_plan(&input, &mut report)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Payment plan schedule (downpayment, milestones, handover, post-handover)",
        request,
        report.messages(),
        elapsed,
        schedule,
    ))
}
