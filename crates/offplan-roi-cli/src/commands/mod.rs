pub mod compare;
pub mod exit;
pub mod mortgage;
pub mod plan;
pub mod quote;

/// Error for commands that need a document and got none.
pub(crate) fn missing_input(command: &str) -> Box<dyn std::error::Error> {
    format!("{command} needs a JSON/YAML document: pass --input <file> or pipe JSON on stdin").into()
}
