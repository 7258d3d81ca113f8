//! Field access shared by strict decoding and tolerant reconstruction
//!
//! Every resource is read through a [`FieldReader`]. [`Strict`] turns type mismatches into
//! errors, [`Tolerant`] records a [`Diagnostic`] and hands back the zero value instead.

use std::{convert::Infallible, fmt::Display, str::FromStr};

use serde_json::{Map, Value};
use tagcodec_util::{encoding::base64_decode, result_ext::ResultExt as _};
use tracing::warn;

use crate::{
    diagnostic::{Diagnostic, DiagnosticKind},
    error::{DecodeError, json_type},
};

pub(crate) type Object = Map<String, Value>;

static EMPTY: &[Value] = &[];

pub(crate) trait FieldReader {
    type Error;

    /// Absent and `null` read as an empty string
    fn string(&mut self, object: &Object, key: &'static str) -> Result<String, Self::Error>;

    fn int(&mut self, object: &Object, key: &'static str) -> Result<i64, Self::Error>;

    fn bool(&mut self, object: &Object, key: &'static str) -> Result<bool, Self::Error>;

    fn object<'v>(
        &mut self,
        object: &'v Object,
        key: &'static str,
    ) -> Result<Option<&'v Object>, Self::Error>;

    fn array<'v>(&mut self, object: &'v Object, key: &'static str)
    -> Result<&'v [Value], Self::Error>;

    /// An array element or a top level value that should be an object
    fn element<'v>(
        &mut self,
        value: &'v Value,
        key: &'static str,
    ) -> Result<Option<&'v Object>, Self::Error>;

    fn base64(&mut self, key: &'static str, encoded: &str) -> Result<Vec<u8>, Self::Error>;

    /// A string that does not name any known variant of `kind`
    fn invalid(&mut self, key: &'static str, kind: &'static str, value: &str)
    -> Result<(), Self::Error>;

    /// A required key that is absent or empty
    fn missing(&mut self, key: &'static str) -> Result<(), Self::Error>;

    /// Semantic checks, only enforced when decoding strictly
    fn validate(
        &mut self,
        check: impl FnOnce() -> Result<(), DecodeError>,
    ) -> Result<(), Self::Error>;

    /// Run `f` one level deeper in the document
    fn scoped<T>(&mut self, segment: impl Display, f: impl FnOnce(&mut Self) -> T) -> T;

    fn variant<T: FromStr>(
        &mut self,
        key: &'static str,
        kind: &'static str,
        raw: &str,
    ) -> Result<Option<T>, Self::Error> {
        match raw.parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                self.invalid(key, kind, raw)?;
                Ok(None)
            }
        }
    }

    fn string_base64(&mut self, object: &Object, key: &'static str) -> Result<Vec<u8>, Self::Error> {
        let encoded = self.string(object, key)?;
        self.base64(key, &encoded)
    }
}

pub(crate) fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

fn present<'v>(object: &'v Object, key: &str) -> Option<&'v Value> {
    object.get(key).filter(|value| !value.is_null())
}

// MARK: strict

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Strict;

impl FieldReader for Strict {
    type Error = DecodeError;

    fn string(&mut self, object: &Object, key: &'static str) -> Result<String, DecodeError> {
        match present(object, key) {
            None => Ok(String::new()),
            Some(Value::String(string)) => Ok(string.clone()),
            Some(other) => Err(DecodeError::wrong_type(key, "a string", other)),
        }
    }

    fn int(&mut self, object: &Object, key: &'static str) -> Result<i64, DecodeError> {
        match present(object, key) {
            None => Ok(0),
            Some(value) => value.as_i64().ok_or_else(|| DecodeError::wrong_type(key, "an integer", value)),
        }
    }

    fn bool(&mut self, object: &Object, key: &'static str) -> Result<bool, DecodeError> {
        match present(object, key) {
            None => Ok(false),
            Some(value) => value.as_bool().ok_or_else(|| DecodeError::wrong_type(key, "a boolean", value)),
        }
    }

    fn object<'v>(
        &mut self,
        object: &'v Object,
        key: &'static str,
    ) -> Result<Option<&'v Object>, DecodeError> {
        match present(object, key) {
            None => Ok(None),
            Some(Value::Object(inner)) => Ok(Some(inner)),
            Some(other) => Err(DecodeError::wrong_type(key, "an object", other)),
        }
    }

    fn array<'v>(&mut self, object: &'v Object, key: &'static str) -> Result<&'v [Value], DecodeError> {
        match present(object, key) {
            None => Ok(EMPTY),
            Some(Value::Array(values)) => Ok(values.as_slice()),
            Some(other) => Err(DecodeError::wrong_type(key, "an array", other)),
        }
    }

    fn element<'v>(
        &mut self,
        value: &'v Value,
        key: &'static str,
    ) -> Result<Option<&'v Object>, DecodeError> {
        match value {
            Value::Object(object) => Ok(Some(object)),
            other => Err(DecodeError::wrong_type(key, "an object", other)),
        }
    }

    fn base64(&mut self, key: &'static str, encoded: &str) -> Result<Vec<u8>, DecodeError> {
        base64_decode(encoded).map_err_field(key, |field, source| DecodeError::Encoding { field, source })
    }

    fn invalid(&mut self, _key: &'static str, kind: &'static str, value: &str) -> Result<(), DecodeError> {
        Err(DecodeError::unsupported(kind, value))
    }

    fn missing(&mut self, key: &'static str) -> Result<(), DecodeError> {
        Err(DecodeError::missing(key))
    }

    fn validate(
        &mut self,
        check: impl FnOnce() -> Result<(), DecodeError>,
    ) -> Result<(), DecodeError> {
        check()
    }

    fn scoped<T>(&mut self, _segment: impl Display, f: impl FnOnce(&mut Self) -> T) -> T {
        f(self)
    }
}

// MARK: tolerant

#[derive(Debug, Default)]
pub(crate) struct Tolerant {
    path: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl Tolerant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn report(&mut self, key: &str, kind: DiagnosticKind) {
        let diagnostic = Diagnostic::new(self.path_to(key), kind);
        warn!("tolerant decode: {diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    fn path_to(&self, key: &str) -> String {
        let mut path = self.path.join(".");
        if !key.is_empty() {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(key);
        }

        path
    }

    fn wrong_type(&mut self, key: &str, expected: &'static str, found: &Value) {
        self.report(key, DiagnosticKind::WrongType { expected, found: json_type(found) });
    }

    fn lookup<'v>(&mut self, object: &'v Object, key: &str) -> Option<&'v Value> {
        let value = present(object, key);
        if value.is_none() {
            self.report(key, DiagnosticKind::Missing);
        }

        value
    }
}

impl FieldReader for Tolerant {
    type Error = Infallible;

    fn string(&mut self, object: &Object, key: &'static str) -> Result<String, Infallible> {
        Ok(match self.lookup(object, key) {
            None => String::new(),
            Some(Value::String(string)) => string.clone(),
            Some(other) => {
                self.wrong_type(key, "a string", other);
                String::new()
            }
        })
    }

    fn int(&mut self, object: &Object, key: &'static str) -> Result<i64, Infallible> {
        let Some(value) = self.lookup(object, key) else { return Ok(0) };

        Ok(value.as_i64().unwrap_or_else(|| {
            self.wrong_type(key, "an integer", value);
            0
        }))
    }

    fn bool(&mut self, object: &Object, key: &'static str) -> Result<bool, Infallible> {
        let Some(value) = self.lookup(object, key) else { return Ok(false) };

        Ok(value.as_bool().unwrap_or_else(|| {
            self.wrong_type(key, "a boolean", value);
            false
        }))
    }

    fn object<'v>(
        &mut self,
        object: &'v Object,
        key: &'static str,
    ) -> Result<Option<&'v Object>, Infallible> {
        Ok(match self.lookup(object, key) {
            None => None,
            Some(Value::Object(inner)) => Some(inner),
            Some(other) => {
                self.wrong_type(key, "an object", other);
                None
            }
        })
    }

    fn array<'v>(&mut self, object: &'v Object, key: &'static str) -> Result<&'v [Value], Infallible> {
        Ok(match self.lookup(object, key) {
            None => EMPTY,
            Some(Value::Array(values)) => values.as_slice(),
            Some(other) => {
                self.wrong_type(key, "an array", other);
                EMPTY
            }
        })
    }

    fn element<'v>(
        &mut self,
        value: &'v Value,
        _key: &'static str,
    ) -> Result<Option<&'v Object>, Infallible> {
        Ok(match value {
            Value::Object(object) => Some(object),
            other => {
                self.wrong_type("", "an object", other);
                None
            }
        })
    }

    fn base64(&mut self, key: &'static str, encoded: &str) -> Result<Vec<u8>, Infallible> {
        Ok(base64_decode(encoded).unwrap_or_else(|error| {
            self.report(key, DiagnosticKind::Base64(error.to_string()));
            Vec::new()
        }))
    }

    fn invalid(&mut self, key: &'static str, _kind: &'static str, value: &str) -> Result<(), Infallible> {
        self.report(key, DiagnosticKind::InvalidValue(value.to_string()));
        Ok(())
    }

    fn missing(&mut self, key: &'static str) -> Result<(), Infallible> {
        // absent keys were already reported by the lookup
        let path = self.path_to(key);
        if self.diagnostics.last().is_none_or(|last| last.path != path) {
            self.report(key, DiagnosticKind::Missing);
        }

        Ok(())
    }

    fn validate(
        &mut self,
        _check: impl FnOnce() -> Result<(), DecodeError>,
    ) -> Result<(), Infallible> {
        Ok(())
    }

    fn scoped<T>(&mut self, segment: impl Display, f: impl FnOnce(&mut Self) -> T) -> T {
        self.path.push(segment.to_string());
        let result = f(self);
        self.path.pop();

        result
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Object {
        match value {
            Value::Object(object) => object,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn strict_absent_fields_are_zero() {
        let data = object(json!({"other": 1, "nothing": null}));

        assert_eq!(Strict.string(&data, "missing").unwrap(), "");
        assert_eq!(Strict.string(&data, "nothing").unwrap(), "");
        assert_eq!(Strict.int(&data, "missing").unwrap(), 0);
        assert!(!Strict.bool(&data, "missing").unwrap());
        assert!(Strict.object(&data, "missing").unwrap().is_none());
        assert!(Strict.array(&data, "missing").unwrap().is_empty());
    }

    #[test]
    fn strict_wrong_type_is_validation_error() {
        let data = object(json!({"tnf": "1", "url": 5}));

        let error = Strict.int(&data, "tnf").unwrap_err();
        assert!(matches!(error, DecodeError::Validation { field: "tnf", .. }));

        let error = Strict.string(&data, "url").unwrap_err();
        assert!(matches!(error, DecodeError::Validation { field: "url", .. }));
    }

    #[test]
    fn strict_bad_base64_is_encoding_error() {
        let error = Strict.base64("tx_bytes", "!!").unwrap_err();
        assert!(matches!(error, DecodeError::Encoding { field: "tx_bytes", .. }));
    }

    #[test]
    fn strict_unknown_variant() {
        let error = Strict.variant::<crate::locale::Locale>("locale", "locale", "de").unwrap_err();
        assert!(matches!(error, DecodeError::UnsupportedVariant { kind: "locale", .. }));
    }

    #[test]
    fn tolerant_reports_with_path() {
        let data = object(json!({"tag": {"uid": "!!", "product": 7}}));
        let mut reader = Tolerant::new();

        let tag = infallible(reader.object(&data, "tag")).unwrap();
        reader.scoped("tag", |reader| {
            assert_eq!(infallible(reader.string_base64(tag, "uid")), Vec::<u8>::new());
            assert_eq!(infallible(reader.string(tag, "product")), "");
            assert_eq!(infallible(reader.string(tag, "vendor")), "");
        });
        assert_eq!(infallible(reader.int(&data, "repeat")), 0);

        let paths = reader
            .into_diagnostics()
            .into_iter()
            .map(|diagnostic| diagnostic.path)
            .collect::<Vec<_>>();

        assert_eq!(paths, vec!["tag.uid", "tag.product", "tag.vendor", "repeat"]);
    }

    #[test]
    fn missing_is_reported_once() {
        let data = object(json!({"data": {}}));
        let mut reader = Tolerant::new();

        assert_eq!(infallible(reader.string(&data, "type")), "");
        infallible(reader.missing("type"));
        assert_eq!(reader.into_diagnostics(), vec![Diagnostic::new("type", DiagnosticKind::Missing)]);

        let error = Strict.missing("type").unwrap_err();
        assert!(matches!(error, DecodeError::Validation { field: "type", .. }));
    }

    #[test]
    fn tolerant_wrong_type_kind() {
        let data = object(json!({"status": 3}));
        let mut reader = Tolerant::new();

        assert_eq!(infallible(reader.string(&data, "status")), "");
        assert_eq!(
            reader.into_diagnostics(),
            vec![Diagnostic::new(
                "status",
                DiagnosticKind::WrongType { expected: "a string", found: "a number" }
            )]
        );
    }
}
