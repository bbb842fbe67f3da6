use serde_json::Value;
use std::io::{self, Read};

/// Document piped on stdin, or `None` when stdin is a terminal or empty.
/// JSON is tried first; anything else is parsed as YAML.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(json_err) => serde_yaml::from_str(trimmed)
            .map_err(|_| format!("stdin is neither JSON nor YAML: {json_err}"))?,
    };
    Ok(Some(value))
}
