//! Non-fatal findings from tolerant decoding

/// A field that was missing or malformed and got replaced by its zero value
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{path}: {kind}")]
pub struct Diagnostic {
    /// Dotted path from the payload root, `results[0].output.rx_bytes`
    pub path: String,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum DiagnosticKind {
    #[display("missing")]
    Missing,

    #[display("expected {expected}, found {found}")]
    WrongType { expected: &'static str, found: &'static str },

    #[display("unrecognized value `{_0}`")]
    InvalidValue(String),

    #[display("not valid base64: {_0}")]
    Base64(String),
}

impl Diagnostic {
    pub fn new(path: impl Into<String>, kind: DiagnosticKind) -> Self {
        Self { path: path.into(), kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let diagnostic = Diagnostic::new("tag.uid", DiagnosticKind::Base64("invalid byte".into()));
        assert_eq!(diagnostic.to_string(), "tag.uid: not valid base64: invalid byte");

        let diagnostic = Diagnostic::new(
            "status",
            DiagnosticKind::WrongType { expected: "a string", found: "a number" },
        );
        assert_eq!(diagnostic.to_string(), "status: expected a string, found a number");
    }
}
