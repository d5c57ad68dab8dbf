//! Remote environment records as returned by the env0 API
//!
//! Only the fields needed to resolve references are modelled. Unknown fields
//! are ignored and `null` values collapse to their defaults.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Deserializes `null` as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Snapshot of a remote environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentRecord {
    /// Environment ID.
    pub id: String,

    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// ID of the workflow environment containing this one; empty if none.
    #[serde(default, deserialize_with = "null_as_default")]
    pub workflow_environment_id: String,

    /// The latest deployment of this environment.
    #[serde(default, deserialize_with = "null_as_default")]
    pub latest_deployment_log: DeploymentLog,
}

impl EnvironmentRecord {
    /// Creates a record with the given ID and name.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the containing workflow environment.
    #[must_use]
    pub fn with_workflow(mut self, workflow_environment_id: impl Into<String>) -> Self {
        self.workflow_environment_id = workflow_environment_id.into();
        self
    }

    /// Adds an output to the latest deployment.
    #[must_use]
    pub fn with_output(mut self, key: impl Into<String>, output: OutputValue) -> Self {
        self.latest_deployment_log.output.insert(key.into(), output);
        self
    }

    /// Adds a child to the workflow definition.
    #[must_use]
    pub fn with_workflow_child(
        mut self,
        name: impl Into<String>,
        environment_id: impl Into<String>,
    ) -> Self {
        let name = name.into();
        self.latest_deployment_log.workflow_file.environments.insert(
            name.clone(),
            WorkflowEnvironment {
                name,
                template_type: String::new(),
                environment_id: environment_id.into(),
            },
        );
        self
    }

    /// Returns the containing workflow environment ID, if any.
    #[must_use]
    pub fn workflow_environment(&self) -> Option<&str> {
        Some(self.workflow_environment_id.as_str()).filter(|id| !id.is_empty())
    }

    /// Returns the outputs recorded by the latest deployment.
    #[must_use]
    pub fn outputs(&self) -> &HashMap<String, OutputValue> {
        &self.latest_deployment_log.output
    }

    /// Looks up the environment ID of a named child in this workflow.
    #[must_use]
    pub fn workflow_child_id(&self, name: &str) -> Option<&str> {
        self.latest_deployment_log
            .workflow_file
            .environments
            .get(name)
            .map(|child| child.environment_id.as_str())
            .filter(|id| !id.is_empty())
    }
}

/// Record of a deployment: its outputs and, for workflows, the definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentLog {
    /// Output name to recorded value.
    #[serde(default, deserialize_with = "null_as_default")]
    pub output: HashMap<String, OutputValue>,

    /// Workflow definition; empty for ordinary environments.
    #[serde(default, deserialize_with = "null_as_default")]
    pub workflow_file: WorkflowFile,
}

/// Definition of a workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowFile {
    /// Child name to child environment.
    #[serde(default, deserialize_with = "null_as_default")]
    pub environments: HashMap<String, WorkflowEnvironment>,
}

/// One child environment in a workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowEnvironment {
    /// Child name within the workflow.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Template kind, e.g. `terraform`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub template_type: String,
    /// Concrete environment ID of the child.
    #[serde(default, deserialize_with = "null_as_default")]
    pub environment_id: String,
}

/// A recorded deployment output.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputValue {
    /// Whether Terraform marked the output as sensitive.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sensitive: bool,

    /// Terraform type, e.g. `"string"` or `["map", "string"]`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<Value>,

    /// The value itself, untyped until encoded.
    #[serde(default)]
    pub value: Value,
}

impl OutputValue {
    /// Creates a non-sensitive output with a declared type.
    #[must_use]
    pub fn new(declared_type: Option<Value>, value: Value) -> Self {
        Self {
            sensitive: false,
            declared_type,
            value,
        }
    }

    /// Creates a non-sensitive output of type `string`.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::new(
            Some(Value::String("string".into())),
            Value::String(value.into()),
        )
    }

    /// Marks the output as sensitive.
    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Returns true if the declared type is absent or a primitive type name.
    ///
    /// Complex Terraform types (`["list", "string"]`, objects) arrive as
    /// structured JSON and are never re-parsed.
    #[must_use]
    pub fn has_scalar_type(&self) -> bool {
        matches!(self.declared_type, None | Some(Value::String(_)))
    }
}

impl fmt::Debug for OutputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("OutputValue");
        dbg.field("sensitive", &self.sensitive)
            .field("declared_type", &self.declared_type);
        if self.sensitive {
            dbg.field("value", &"<redacted>");
        } else {
            dbg.field("value", &self.value);
        }
        dbg.finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_deserialize_environment() {
        let record: EnvironmentRecord = serde_json::from_value(json!({
            "id": "e1",
            "name": "network",
            "workflowEnvironmentId": null,
            "status": "ACTIVE",
            "latestDeploymentLog": {
                "output": {
                    "vpc-id": { "sensitive": false, "type": "string", "value": "vpc-0123" }
                }
            }
        }))
        .unwrap();

        assert_eq!(record.id, "e1");
        assert_eq!(record.workflow_environment(), None);
        assert_eq!(
            record.outputs().get("vpc-id"),
            Some(&OutputValue::string("vpc-0123"))
        );
    }

    #[test]
    fn test_deserialize_workflow() {
        let record: EnvironmentRecord = serde_json::from_value(json!({
            "id": "W1",
            "name": "stack",
            "latestDeploymentLog": {
                "output": null,
                "workflowFile": {
                    "environments": {
                        "vpc": { "name": "vpc", "templateType": "terraform", "environmentId": "E2" }
                    }
                }
            }
        }))
        .unwrap();

        assert_eq!(record.workflow_child_id("vpc"), Some("E2"));
        assert_eq!(record.workflow_child_id("db"), None);
        assert!(record.outputs().is_empty());
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let result = serde_json::from_value::<EnvironmentRecord>(json!({ "name": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_helpers() {
        let record = EnvironmentRecord::new("e2", "app")
            .with_workflow("W1")
            .with_workflow_child("vpc", "");

        assert_eq!(record.workflow_environment(), Some("W1"));
        assert_eq!(record.workflow_child_id("vpc"), None);
    }

    #[test]
    fn test_scalar_type() {
        assert!(OutputValue::string("x").has_scalar_type());
        assert!(OutputValue::new(None, json!("x")).has_scalar_type());
        assert!(!OutputValue::new(Some(json!(["list", "string"])), json!(["a"])).has_scalar_type());
    }

    #[test]
    fn test_sensitive_value_is_redacted_in_debug() {
        let output = OutputValue::string("hunter2").sensitive();
        let rendered = format!("{output:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
