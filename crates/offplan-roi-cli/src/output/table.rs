use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::scalar_text;

/// Render the envelope as tables: scalar fields in a Field/Value table, then
/// one titled table per array of rows (installments, projections, exits).
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => print_result(result, map),
            None => print_object("", map),
        },
        Value::Array(arr) => print_rows("", arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res) => print_object("", res),
        Value::Array(rows) => print_rows("result", rows),
        Value::Null => println!("(no result)"),
        other => println!("{}", scalar_text(other, "null")),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Scalars and flat sub-objects go into one table under dotted keys; arrays
/// of objects are printed afterwards as their own tables.
fn print_object(title: &str, map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut nested: Vec<(String, &Vec<Value>)> = Vec::new();
    push_fields(&mut builder, &mut nested, "", map);

    if !title.is_empty() {
        println!("\n{}:", title);
    }
    println!("{}", Table::from(builder));

    for (name, rows) in nested {
        print_rows(&name, rows);
    }
}

fn push_fields<'a>(
    builder: &mut Builder,
    nested: &mut Vec<(String, &'a Vec<Value>)>,
    prefix: &str,
    map: &'a Map<String, Value>,
) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => push_fields(builder, nested, &name, inner),
            Value::Array(items) if items.iter().any(Value::is_object) => nested.push((name, items)),
            other => builder.push_record([name, format_value(other)]),
        }
    }
}

fn print_rows(title: &str, arr: &[Value]) {
    if !title.is_empty() {
        println!("\n{}:", title);
    }
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        other => scalar_text(other, "-"),
    }
}
