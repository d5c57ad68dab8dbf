//! Resolved imports and their output encoding

use serde_json::{Number, Value};

use crate::environment::OutputValue;
use crate::error::{DomainError, DomainResult};
use crate::reference::{EncodingHint, ReferenceSpec};

/// The fully resolved form of a `ReferenceSpec`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImport {
    /// Key in the output file.
    pub input_key: String,

    /// Output name that was looked up.
    pub output_key: String,

    /// ID of the environment the value was taken from.
    pub environment_id: String,

    /// Name of the environment the value was taken from.
    pub environment_name: String,

    /// The recorded output.
    pub value: OutputValue,

    /// Output encoding carried over from the reference syntax.
    pub encoding: EncodingHint,
}

impl ResolvedImport {
    /// Creates a resolved import for the given reference.
    #[must_use]
    pub fn new(
        spec: &ReferenceSpec,
        environment_id: impl Into<String>,
        environment_name: impl Into<String>,
        value: OutputValue,
    ) -> Self {
        Self {
            input_key: spec.input_key.clone(),
            output_key: spec.output_key.clone(),
            environment_id: environment_id.into(),
            environment_name: environment_name.into(),
            value,
            encoding: spec.encoding,
        }
    }
}

/// A value ready to be written to the output file.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportedValue {
    /// Written as a JSON string.
    Text(String),
    /// Written as a JSON number.
    Number(Number),
    /// Written as a JSON boolean.
    Bool(bool),
    /// Written as nested JSON.
    Json(Value),
    /// Written as `null`.
    Null,
}

impl ImportedValue {
    /// Encodes a recorded output according to the reference's encoding hint.
    ///
    /// JSON-object references whose output is a scalar-typed string have that
    /// string parsed and emitted as nested JSON. Everything else is emitted
    /// as recorded.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidJsonOutput` if a JSON-encoded string is
    /// not valid JSON.
    pub fn encode(output: &OutputValue, encoding: EncodingHint) -> DomainResult<Self> {
        match (&output.value, encoding) {
            (Value::String(raw), EncodingHint::Json) if output.has_scalar_type() => {
                serde_json::from_str(raw)
                    .map(Self::Json)
                    .map_err(|e| DomainError::InvalidJsonOutput(e.to_string()))
            }
            (value, _) => Ok(Self::plain(value)),
        }
    }

    /// Wraps a recorded value without reinterpreting it.
    #[must_use]
    pub fn plain(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => Self::Number(n.clone()),
            Value::String(s) => Self::Text(s.clone()),
            structured @ (Value::Array(_) | Value::Object(_)) => Self::Json(structured.clone()),
        }
    }

    /// Converts into the JSON value written to the output file.
    #[must_use]
    pub fn into_json(self) -> Value {
        match self {
            Self::Text(s) => Value::String(s),
            Self::Number(n) => Value::Number(n),
            Self::Bool(b) => Value::Bool(b),
            Self::Json(v) => v,
            Self::Null => Value::Null,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_json_hint_nests_string_value() {
        let output = OutputValue::string(r#"{"a":1}"#);
        let encoded = ImportedValue::encode(&output, EncodingHint::Json).unwrap();
        assert_eq!(encoded.into_json(), json!({"a": 1}));
    }

    #[test]
    fn test_json_hint_without_declared_type() {
        let output = OutputValue::new(None, json!(r#"["x","y"]"#));
        let encoded = ImportedValue::encode(&output, EncodingHint::Json).unwrap();
        assert_eq!(encoded, ImportedValue::Json(json!(["x", "y"])));
    }

    #[test]
    fn test_plain_hint_keeps_string() {
        let output = OutputValue::string("hello");
        let encoded = ImportedValue::encode(&output, EncodingHint::Plain).unwrap();
        assert_eq!(encoded, ImportedValue::Text("hello".into()));
        assert_eq!(encoded.into_json(), json!("hello"));
    }

    #[test]
    fn test_plain_hint_does_not_reinterpret_json_looking_string() {
        let output = OutputValue::string("123");
        let encoded = ImportedValue::encode(&output, EncodingHint::Plain).unwrap();
        assert_eq!(encoded.into_json(), json!("123"));
    }

    #[test]
    fn test_complex_type_passes_through() {
        let output = OutputValue::new(Some(json!(["map", "string"])), json!({"k": "v"}));
        let encoded = ImportedValue::encode(&output, EncodingHint::Json).unwrap();
        assert_eq!(encoded, ImportedValue::Json(json!({"k": "v"})));
    }

    #[test]
    fn test_complex_type_string_is_not_parsed() {
        let output = OutputValue::new(Some(json!(["list", "string"])), json!("[1]"));
        let encoded = ImportedValue::encode(&output, EncodingHint::Json).unwrap();
        assert_eq!(encoded, ImportedValue::Text("[1]".into()));
    }

    #[test]
    fn test_invalid_json_string_is_an_error() {
        let output = OutputValue::string("{not json");
        let result = ImportedValue::encode(&output, EncodingHint::Json);
        assert!(matches!(result, Err(DomainError::InvalidJsonOutput(_))));
    }

    #[test]
    fn test_scalars() {
        assert_eq!(ImportedValue::plain(&json!(true)), ImportedValue::Bool(true));
        assert_eq!(ImportedValue::plain(&json!(null)), ImportedValue::Null);
        assert_eq!(ImportedValue::plain(&json!(42)).into_json(), json!(42));
    }
}
