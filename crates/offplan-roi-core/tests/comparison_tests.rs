#![cfg(feature = "comparison")]

use offplan_roi_core::comparison::{compare_quotes, ComparisonInput, MetricValue};
use offplan_roi_core::RoiError;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

fn quote(label: &str, price: &str, construction_rate: &str, handover_year: i32) -> Value {
    json!({
        "label": label,
        "input": {
            "base_price": price,
            "booking": { "year": 2025, "month": 3 },
            "handover": { "year": handover_year, "month": 3 },
            "downpayment_percent": "20",
            "pre_handover_percent": "50",
            "additional_payments": [
                { "id": "a", "trigger": "construction", "trigger_value": "40", "payment_percent": "15" },
                { "id": "b", "trigger": "construction", "trigger_value": "80", "payment_percent": "15" }
            ],
            "appreciation": { "construction_rate": construction_rate },
            "rental_yield_percent": "6.5",
            "unit_size_sqft": "950",
            "service_charge_per_sqft": "14",
            "costs": { "oqood_fee": "3500" }
        }
    })
}

fn three_quotes() -> ComparisonInput {
    serde_json::from_value(json!({
        "quotes": [
            quote("Creek Vista", "1800000", "9", 2027),
            quote("Harbour Point", "1250000", "6", 2028),
            quote("Palm Residences", "2100000", "11", 2027)
        ]
    }))
    .unwrap()
}

#[test]
fn test_defaults_fill_exit_points_and_weights() {
    let input = three_quotes();
    assert_eq!(input.exit_points, vec![24, 36, 48, 60]);
    assert_eq!(input.weights.roi, dec!(0.4));
}

#[test]
fn test_rows_are_column_aligned() {
    let out = compare_quotes(&three_quotes()).unwrap();
    let result = &out.result;

    assert_eq!(result.quotes.len(), 3);
    assert!(result.rows.iter().all(|r| r.values.len() == 3));

    let price = result.rows.iter().find(|r| r.key == "price").unwrap();
    assert_eq!(price.best_index, Some(1));
    assert_eq!(price.worst_index, Some(2));

    let handover = result.rows.iter().find(|r| r.key == "handover").unwrap();
    assert_eq!(handover.values[1], MetricValue::Text("Q1 2028".into()));

    let plan = result.rows.iter().find(|r| r.key == "payment_plan").unwrap();
    assert_eq!(plan.values[0], MetricValue::Text("20/50/50".into()));
    assert!(result.rows.iter().any(|r| r.key == "exit_roe_60"));
}

#[test]
fn test_reordering_quotes_permutes_results() {
    let forward = three_quotes();
    let mut reversed = forward.clone();
    reversed.quotes.reverse();

    let a = compare_quotes(&forward).unwrap().result;
    let b = compare_quotes(&reversed).unwrap().result;

    for (i, summary) in a.quotes.iter().enumerate() {
        let mirrored = &b.quotes[2 - i];
        assert_eq!(summary, mirrored);
        assert_eq!(
            a.recommendation.scores[i].scores,
            b.recommendation.scores[2 - i].scores
        );
    }

    let label_of = |out: &offplan_roi_core::comparison::ComparisonOutput| {
        out.recommendation
            .overall_winner
            .map(|i| out.quotes[i].label.clone())
    };
    assert_eq!(label_of(&a), label_of(&b));
}

#[test]
fn test_empty_comparison_is_invalid() {
    let input: ComparisonInput = serde_json::from_value(json!({ "quotes": [] })).unwrap();
    let err = compare_quotes(&input).unwrap_err();
    assert!(matches!(err, RoiError::InvalidInput { .. }));
}
