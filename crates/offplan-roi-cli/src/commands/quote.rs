use clap::Args;
use serde_json::Value;

use offplan_roi_core::inputs::ExitScenarioSet;
use offplan_roi_core::quote::{self, QuoteRequest};

use super::missing_input;
use crate::input;

/// Arguments for a full quote calculation
#[derive(Args)]
pub struct QuoteArgs {
    /// Path to a quote document (`{"input": ..., "mortgage": ..., "exit_scenarios": [...]}`)
    #[arg(long)]
    pub input: Option<String>,

    /// Exit month to evaluate; repeat for several (replaces the document's list)
    #[arg(long = "exit-month")]
    pub exit_months: Vec<u32>,

    /// Projection horizon in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Ignore the document's mortgage terms
    #[arg(long)]
    pub no_mortgage: bool,
}

pub fn run_quote(args: QuoteArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request: QuoteRequest =
        input::read_document(args.input.as_deref())?.ok_or_else(|| missing_input("quote"))?;

    if !args.exit_months.is_empty() {
        request.exit_scenarios = ExitScenarioSet::new(args.exit_months);
    }
    if let Some(years) = args.years {
        request.input.projection_years = Some(years);
    }
    if args.no_mortgage {
        request.mortgage = None;
    }

    tracing::debug!(exits = request.exit_scenarios.months().len(), "running quote");
    let result = quote::run_quote(&request)?;
    Ok(serde_json::to_value(result)?)
}
