use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Serialize;

use offplan_roi_core::comparison::ComparisonInput;
use offplan_roi_core::exit::ExitRequest;
use offplan_roi_core::mortgage::MortgageRequest;
use offplan_roi_core::payment_plan::PlanRequest;
use offplan_roi_core::quote::QuoteRequest;
use offplan_roi_core::RoiResult;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse the JSON request, run `op`, and return the JSON envelope.
fn call<I, O>(input_json: &str, op: impl FnOnce(&I) -> RoiResult<O>) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
{
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = op(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Full quote: payment plan, projection, hold analysis, exits and mortgage.
#[napi]
pub fn calculate_quote(input_json: String) -> NapiResult<String> {
    call(&input_json, |req: &QuoteRequest| offplan_roi_core::quote::run_quote(req))
}

#[napi]
pub fn exit_scenario(input_json: String) -> NapiResult<String> {
    call(&input_json, |req: &ExitRequest| offplan_roi_core::exit::run_exit_scenarios(req))
}

#[napi]
pub fn mortgage_analysis(input_json: String) -> NapiResult<String> {
    call(&input_json, |req: &MortgageRequest| offplan_roi_core::mortgage::run_mortgage(req))
}

#[napi]
pub fn payment_plan(input_json: String) -> NapiResult<String> {
    call(&input_json, |req: &PlanRequest| offplan_roi_core::payment_plan::run_payment_plan(req))
}

#[napi]
pub fn compare_quotes(input_json: String) -> NapiResult<String> {
    call(&input_json, |req: &ComparisonInput| offplan_roi_core::comparison::compare_quotes(req))
}
