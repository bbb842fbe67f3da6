use clap::Args;
use serde_json::Value;

use offplan_roi_core::payment_plan::{self, PlanRequest};

use super::missing_input;
use crate::input;

/// Arguments for payment plan evaluation
#[derive(Args)]
pub struct PlanArgs {
    /// Path to a plan document (`{"input": ..., "auto_distribute": false}`)
    #[arg(long)]
    pub input: Option<String>,

    /// Spread the pre-handover percent evenly over the milestones first
    #[arg(long)]
    pub auto_distribute: bool,
}

pub fn run_plan(args: PlanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request: PlanRequest =
        input::read_document(args.input.as_deref())?.ok_or_else(|| missing_input("plan"))?;
    request.auto_distribute |= args.auto_distribute;

    let result = payment_plan::run_payment_plan(&request)?;
    Ok(serde_json::to_value(result)?)
}
