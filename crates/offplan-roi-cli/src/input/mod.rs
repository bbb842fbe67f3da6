pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Typed document from `--input` when given, else from piped stdin.
/// `Ok(None)` means neither source had anything to read.
pub fn read_document<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_document(path)?));
    }
    match stdin::read_stdin()? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}
