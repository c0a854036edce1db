use serde_json::Value;

/// Errors raised while flattening documents or writing exports
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document handed to the flattener was not a JSON object
    #[error("expected a JSON object document, found {found}")]
    NotAnObject { found: &'static str },

    #[error("failed to (de)serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Name of the JSON type of `value`, as used in error messages
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
