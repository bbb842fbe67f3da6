use clap::Args;
use serde_json::Value;

use offplan_roi_core::exit::{self, ExitRequest};
use offplan_roi_core::inputs::ExitScenarioSet;

use super::missing_input;
use crate::input;

/// Arguments for exit scenario analysis
#[derive(Args)]
pub struct ExitArgs {
    /// Path to an exit document (`{"input": ..., "exit_scenarios": [...]}`)
    #[arg(long)]
    pub input: Option<String>,

    /// Resale month after booking; repeat for several
    #[arg(long = "month")]
    pub months: Vec<u32>,
}

pub fn run_exit(args: ExitArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request: ExitRequest =
        input::read_document(args.input.as_deref())?.ok_or_else(|| missing_input("exit"))?;

    if !args.months.is_empty() {
        request.exit_scenarios = ExitScenarioSet::new(args.months);
    }

    let result = exit::run_exit_scenarios(&request)?;
    Ok(serde_json::to_value(result)?)
}
