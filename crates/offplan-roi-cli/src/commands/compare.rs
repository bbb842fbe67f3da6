use clap::Args;
use serde_json::Value;

use offplan_roi_core::comparison::{self, ComparisonInput};

use super::missing_input;
use crate::input;

/// Arguments for multi-quote comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to a comparison document (`{"quotes": [{"label", "input", "mortgage"}], ...}`)
    #[arg(long)]
    pub input: Option<String>,

    /// Exit month compared across quotes; repeat for several
    #[arg(long = "exit-month")]
    pub exit_months: Vec<u32>,

    /// Judge the ROI axis of the recommendation at this exit month
    #[arg(long)]
    pub reference_month: Option<u32>,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request: ComparisonInput =
        input::read_document(args.input.as_deref())?.ok_or_else(|| missing_input("compare"))?;

    if !args.exit_months.is_empty() {
        request.exit_points = args.exit_months;
    }
    if args.reference_month.is_some() {
        request.weights.reference_exit_month = args.reference_month;
    }

    tracing::debug!(quotes = request.quotes.len(), "comparing quotes");
    let result = comparison::compare_quotes(&request)?;
    Ok(serde_json::to_value(result)?)
}
