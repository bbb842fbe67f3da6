use offplan_roi_core::appreciation::future_value;
use offplan_roi_core::inputs::{ExitScenarioSet, InvestmentInput, MortgageConfig};
use offplan_roi_core::mortgage::monthly_payment;
use offplan_roi_core::quote::{calculate_quote, run_quote, QuoteCache, QuoteRequest};
use offplan_roi_core::validation::IssueCode;
use offplan_roi_core::RoiError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

// ===========================================================================
// Fixtures
// ===========================================================================

fn marina_tower() -> InvestmentInput {
    // 1.5M, two-year build, 20% down + two 10% milestones, 60% on handover
    serde_json::from_value(json!({
        "base_price": "1500000",
        "booking": { "year": 2025, "month": 1 },
        "handover": { "year": 2027, "month": 1 },
        "downpayment_percent": "20",
        "pre_handover_percent": "40",
        "additional_payments": [
            { "id": "m1", "trigger": "time", "trigger_value": "6", "payment_percent": "10" },
            { "id": "m2", "trigger": "construction", "trigger_value": "50", "payment_percent": "10" }
        ],
        "costs": { "oqood_fee": "4000" }
    }))
    .unwrap()
}

fn growth_tower() -> InvestmentInput {
    let mut input = marina_tower();
    input.appreciation = serde_json::from_value(json!({
        "construction_rate": "12",
        "post_handover": {
            "mode": "phased",
            "growth_rate": "8",
            "growth_period_years": 3,
            "mature_rate": "4"
        }
    }))
    .unwrap();
    input.rental_yield_percent = dec!(7);
    input.rent_growth_rate = dec!(3);
    input.unit_size_sqft = Some(dec!(1100));
    input.service_charge_per_sqft = dec!(16);
    input
}

// ===========================================================================
// Payment plan scenario
// ===========================================================================

#[test]
fn test_plan_split_for_marina_tower() {
    let out = calculate_quote(&marina_tower(), None, &ExitScenarioSet::default()).unwrap();
    let plan = &out.result.payment_schedule;

    assert_eq!(plan.pre_handover_amount, dec!(600000));
    assert_eq!(plan.handover_amount, dec!(900000));
    assert_eq!(plan.handover_percent, dec!(60));
    assert!(plan.is_balanced);
    assert!((plan.total_amount - dec!(1500000)).abs() <= Decimal::ONE);

    // construction 50% of 24 months lands on month 12
    let months: Vec<u32> = plan.installments.iter().map(|i| i.month).collect();
    assert_eq!(months, vec![0, 6, 12, 24]);
}

#[test]
fn test_handover_exit_loses_only_entry_costs() {
    let exits = ExitScenarioSet::new(vec![24]);
    let out = calculate_quote(&marina_tower(), None, &exits).unwrap();
    let exit = &out.result.exit_scenarios[0];

    // 4% DLD on 1.5M plus 4,000 oqood
    assert_eq!(exit.true_profit, dec!(-64000));
    assert_eq!(exit.percent_paid, dec!(100));
}

#[test]
fn test_exit_at_booking_month() {
    let exits = ExitScenarioSet::new(vec![0]);
    let out = calculate_quote(&growth_tower(), None, &exits).unwrap();
    let exit = &out.result.exit_scenarios[0];
    assert_eq!(exit.true_profit, dec!(-64000));
    assert_eq!(exit.exit_price, dec!(1500000));
}

// ===========================================================================
// Appreciation and projection
// ===========================================================================

#[test]
fn test_value_never_falls_with_positive_rates() {
    let input = growth_tower();
    let cm = input.construction_months();
    let mut previous = input.base_price;
    for month in 1..=120 {
        let value = future_value(input.base_price, cm, &input.appreciation, month).unwrap();
        assert!(value >= previous, "value fell at month {month}");
        previous = value;
    }
}

#[test]
fn test_projection_rows_for_growth_tower() {
    let out = calculate_quote(&growth_tower(), None, &ExitScenarioSet::default()).unwrap();
    let rows = &out.result.projections;

    assert_eq!(rows.len(), 11);
    assert_eq!(rows[0].property_value, dec!(1500000));
    assert_eq!(rows[2].net_annual_rent, Decimal::ZERO);
    // first rented year: 7% of 1.5M less 1,100 sqft at 16
    assert_eq!(rows[3].gross_annual_rent, dec!(105000));
    assert_eq!(rows[3].annual_service_charge, dec!(17600));
    assert_eq!(rows[3].net_annual_rent, dec!(87400));
    assert!(rows[4].gross_annual_rent > rows[3].gross_annual_rent);
    assert!(out.warnings.is_empty());
}

#[test]
fn test_hold_analysis_for_growth_tower() {
    let out = calculate_quote(&growth_tower(), None, &ExitScenarioSet::default()).unwrap();
    let hold = &out.result.hold_analysis;

    assert_eq!(hold.total_capital_invested, dec!(1564000));
    assert_eq!(hold.gross_rental_yield, dec!(7));
    assert!(hold.years_to_pay_off.is_some());
    assert!(hold.final_property_value > dec!(1500000));
}

// ===========================================================================
// Mortgage
// ===========================================================================

#[test]
fn test_reference_amortization_payment() {
    let payment = monthly_payment(dec!(1000000), dec!(5), 25).unwrap();
    assert!((payment - dec!(5845.9)).abs() < Decimal::ONE);
}

#[test]
fn test_financing_gap_flows_into_warnings() {
    let mortgage: MortgageConfig = serde_json::from_value(json!({
        "financing_percent": "50",
        "interest_rate": "4.25",
        "loan_term_years": 20
    }))
    .unwrap();
    let out = calculate_quote(&marina_tower(), Some(&mortgage), &ExitScenarioSet::default()).unwrap();
    let analysis = out.result.mortgage.as_ref().unwrap();

    assert!(analysis.financing_gap.has_gap);
    assert_eq!(analysis.financing_gap.gap_amount, dec!(150000));
    assert!(out.result.validation.has(IssueCode::FinancingGap));
    assert_eq!(out.warnings.len(), 1);
}

// ===========================================================================
// Errors, requests and caching
// ===========================================================================

#[test]
fn test_non_positive_price_is_rejected() {
    let mut input = marina_tower();
    input.base_price = dec!(-1);
    let err = calculate_quote(&input, None, &ExitScenarioSet::default()).unwrap_err();
    assert!(matches!(err, RoiError::InvalidInput { .. }));
}

#[test]
fn test_impossible_month_is_rejected() {
    let mut input = marina_tower();
    input.handover.month = 13;
    let err = calculate_quote(&input, None, &ExitScenarioSet::default()).unwrap_err();
    assert!(matches!(err, RoiError::DateError(_)));
}

#[test]
fn test_imbalanced_plan_is_a_warning_not_an_error() {
    let mut input = marina_tower();
    input.on_handover_percent = Some(dec!(50));
    let out = calculate_quote(&input, None, &ExitScenarioSet::default()).unwrap();
    assert!(!out.result.payment_schedule.is_balanced);
    assert!(out.result.validation.has(IssueCode::PlanImbalance));
}

#[test]
fn test_request_document_and_cache() {
    let request: QuoteRequest = serde_json::from_value(json!({
        "input": serde_json::to_value(growth_tower()).unwrap(),
        "exit_scenarios": [48, 24, 48]
    }))
    .unwrap();
    assert_eq!(request.exit_scenarios.months(), &[24, 48]);

    let direct = run_quote(&request).unwrap();
    let mut cache = QuoteCache::new();
    let cached = cache.get_or_compute(&request).unwrap();
    assert_eq!(cached.result, direct.result);
    cache.get_or_compute(&request).unwrap();
    assert_eq!(cache.hits(), 1);
}
