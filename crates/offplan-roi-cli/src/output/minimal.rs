use serde_json::Value;

use super::scalar_text;

/// Headline figures, as dotted paths into the result, in priority order.
/// The first path that resolves to a non-null value is printed.
const PRIORITY_PATHS: [&str; 7] = [
    "recommendation.overall_winner",
    "hold_analysis.net_rental_yield",
    "monthly_payment",
    "total_amount",
    "exit_scenarios.0.annualized_roe",
    "0.annualized_roe",
    "0.true_profit",
];

/// Print just the key answer from the output.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for path in PRIORITY_PATHS {
        if let Some(found) = lookup(result, path).filter(|v| !v.is_null()) {
            println!("{}", winner_label(result, path, found));
            return;
        }
    }

    if let Some((key, val)) = result.as_object().and_then(|m| m.iter().next()) {
        println!("{}: {}", key, scalar_text(val, "null"));
        return;
    }

    println!("{}", scalar_text(result, "null"));
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// A comparison winner prints as its quote label rather than its index.
fn winner_label(result: &Value, path: &str, found: &Value) -> String {
    if path == "recommendation.overall_winner" {
        if let Some(label) = found
            .as_u64()
            .and_then(|i| lookup(result, &format!("quotes.{i}.label")))
            .and_then(Value::as_str)
        {
            return label.to_string();
        }
    }
    scalar_text(found, "null")
}
