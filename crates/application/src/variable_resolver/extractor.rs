//! Output extraction from resolved environments

use importer_domain::{EnvironmentRecord, OutputValue};
use tracing::warn;

/// Returns the named output of the environment's latest deployment.
///
/// A missing output resolves to an empty (`null`) value and is logged as a
/// warning rather than treated as an error.
#[must_use]
pub fn extract_output(record: &EnvironmentRecord, output_key: &str) -> OutputValue {
    if let Some(output) = record.outputs().get(output_key) {
        return output.clone();
    }

    warn!(
        environment = %record.name,
        environment_id = %record.id,
        output = %output_key,
        "output not found in latest deployment, importing an empty value"
    );
    OutputValue::default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_extract_existing_output() {
        let record = EnvironmentRecord::new("E1", "net").with_output(
            "ids",
            OutputValue::new(Some(json!(["list", "string"])), json!(["a", "b"])),
        );

        let output = extract_output(&record, "ids");

        assert_eq!(output.value, json!(["a", "b"]));
        assert_eq!(output.declared_type, Some(json!(["list", "string"])));
    }

    #[test]
    fn test_extract_missing_output() {
        let record = EnvironmentRecord::new("E1", "net");

        let output = extract_output(&record, "nope");

        assert_eq!(output.value, Value::Null);
        assert!(!output.sensitive);
        assert!(output.declared_type.is_none());
    }
}
