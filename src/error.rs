use serde_json::Value;

pub type Error = DecodeError;
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors from strict decoding of JSON resources
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid field `{field}`: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("field `{field}` is not valid base64: {source}")]
    Encoding {
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    #[error("unsupported {kind} `{value}`")]
    UnsupportedVariant { kind: &'static str, value: String },

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("line {line}: {source}")]
    ExportLine {
        line: usize,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    pub fn empty(field: &'static str) -> Self {
        Self::Validation { field, reason: "must not be empty".into() }
    }

    pub fn missing(field: &'static str) -> Self {
        Self::Validation { field, reason: "is required".into() }
    }

    pub fn wrong_type(field: &'static str, expected: &'static str, found: &Value) -> Self {
        Self::Validation {
            field,
            reason: format!("expected {expected}, found {}", json_type(found)),
        }
    }

    pub fn unsupported(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnsupportedVariant { kind, value: value.into() }
    }

    /// The field this error is about, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } | Self::Encoding { field, .. } => Some(*field),
            Self::ExportLine { source, .. } => source.field(),
            Self::UnsupportedVariant { .. } | Self::Json(_) => None,
        }
    }
}

/// Required string fields must not be empty
pub(crate) fn non_empty(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(DecodeError::empty(field));
    }

    Ok(())
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
