use serde_json::{Map, Value};
use std::io;

use super::scalar_text;

/// Result arrays whose rows make the most useful CSV, in priority order.
const ROW_SETS: [&str; 3] = ["projections", "rows", "installments"];

/// Write the result as CSV to stdout.
///
/// Array results become one row per item. Object results with a row set
/// (yearly projections, comparison rows, installments) emit that set;
/// anything else is flattened to `field,value` pairs with dotted keys.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        Value::Object(map) => {
            let row_set = ROW_SETS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_array));
            match row_set {
                Some(rows) => write_array_csv(&mut wtr, rows),
                None => {
                    let _ = wtr.write_record(["field", "value"]);
                    write_flat(&mut wtr, "", map);
                }
            }
        }
        other => {
            let _ = wtr.write_record([scalar_text(other, "")]);
        }
    }

    let _ = wtr.flush();
}

fn write_flat(wtr: &mut csv::Writer<io::StdoutLock<'_>>, prefix: &str, map: &Map<String, Value>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => write_flat(wtr, &name, inner),
            other => {
                let _ = wtr.write_record([name, scalar_text(other, "")]);
            }
        }
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    let Some(first) = arr.first() else {
        return;
    };

    if let Value::Object(first) = first {
        let headers: Vec<&str> = first.keys().map(String::as_str).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(|v| scalar_text(v, "")).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([scalar_text(item, "")]);
        }
    }
}
