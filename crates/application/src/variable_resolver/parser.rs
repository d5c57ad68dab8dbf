//! Reference parser for env0 import syntax
//!
//! Classifies raw input values and extracts references from them. Two
//! syntaxes are recognised:
//! - templated strings: `${env0-environment:<name-or-id>:<output>}` and
//!   `${env0-workflow:<child>:<output>}`
//! - JSON objects: `{"ENV0_ENVIRONMENT_NAME": "<name>", "Output": "<output>"}`
//!   or `{"ENV0_WORKFLOW_PARENT": "<child>", "Output": "<output>"}`, either
//!   inline or encoded as a JSON string

use std::sync::LazyLock;

use importer_domain::{DomainError, DomainResult, EncodingHint, ReferenceSpec, TargetSelector};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

/// `${<tag>:<target>:<field>}`
#[allow(clippy::expect_used)]
static TEMPLATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$\{(?P<tag>[^:{}]+):(?P<target>[^:{}]+):(?P<field>[^:{}]+)\}$")
        .expect("valid regex")
});

/// 8-4-4-4-12 hex groups.
#[allow(clippy::expect_used)]
static ENVIRONMENT_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
    )
    .expect("valid regex")
});

const WORKFLOW_TAG: &str = "env0-workflow";

const ENVIRONMENT_NAME_FIELD: &str = "ENV0_ENVIRONMENT_NAME";
const WORKFLOW_PARENT_FIELD: &str = "ENV0_WORKFLOW_PARENT";
const OUTPUT_FIELD: &str = "Output";

/// Which reference syntax an input value uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceSyntax {
    /// JSON-object reference.
    Json,
    /// `${...}` templated string.
    Template,
}

impl ReferenceSyntax {
    /// Returns the output encoding implied by this syntax.
    #[must_use]
    pub const fn encoding(self) -> EncodingHint {
        match self {
            Self::Json => EncodingHint::Json,
            Self::Template => EncodingHint::Plain,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonReference {
    #[serde(rename = "ENV0_ENVIRONMENT_NAME", default)]
    environment_name: Option<String>,
    #[serde(rename = "ENV0_WORKFLOW_PARENT", default)]
    workflow_parent: Option<String>,
    #[serde(rename = "Output")]
    output: String,
}

/// Classifies a raw input value by its leading token.
///
/// Returns `None` for literal values. A `Some` result does not guarantee the
/// value parses; see [`parse_reference`].
#[must_use]
pub fn classify(value: &Value) -> Option<ReferenceSyntax> {
    match value {
        Value::Object(fields) if is_reference_object(fields) => Some(ReferenceSyntax::Json),
        Value::String(s) if s.starts_with("${") => Some(ReferenceSyntax::Template),
        Value::String(s) if s.trim_start().starts_with('{') => {
            match serde_json::from_str::<Value>(s) {
                Ok(Value::Object(fields)) if !is_reference_object(&fields) => None,
                _ => Some(ReferenceSyntax::Json),
            }
        }
        _ => None,
    }
}

/// Parses one input entry into a reference.
///
/// Returns `Ok(None)` for literal values.
///
/// # Errors
///
/// Returns `DomainError::InvalidReference` if the value uses one of the
/// reference syntaxes but is malformed.
///
/// # Examples
///
/// ```
/// use importer_application::variable_resolver::parser::parse_reference;
/// use importer_domain::TargetSelector;
/// use serde_json::json;
///
/// let spec = parse_reference("vpc", &json!("${env0-workflow:network:vpc-id}"))
///     .unwrap()
///     .unwrap();
/// assert_eq!(spec.selector, TargetSelector::ByWorkflowParent("network".into()));
/// assert_eq!(spec.output_key, "vpc-id");
/// ```
pub fn parse_reference(key: &str, value: &Value) -> DomainResult<Option<ReferenceSpec>> {
    match (classify(value), value) {
        (None, _) => Ok(None),
        (Some(ReferenceSyntax::Template), Value::String(s)) => parse_template(key, s).map(Some),
        (Some(ReferenceSyntax::Json), Value::String(s)) => {
            let object = serde_json::from_str(s)
                .map_err(|e| DomainError::invalid_reference(key, e.to_string()))?;
            parse_json_object(key, object).map(Some)
        }
        (Some(ReferenceSyntax::Json), object) => parse_json_object(key, object.clone()).map(Some),
        (Some(ReferenceSyntax::Template), _) => Err(DomainError::invalid_reference(
            key,
            "templated reference must be a string",
        )),
    }
}

/// Returns true if the token has the shape of an env0 environment ID.
#[must_use]
pub fn is_environment_id(token: &str) -> bool {
    ENVIRONMENT_ID_PATTERN.is_match(token)
}

fn is_reference_object(fields: &Map<String, Value>) -> bool {
    [ENVIRONMENT_NAME_FIELD, WORKFLOW_PARENT_FIELD, OUTPUT_FIELD]
        .iter()
        .any(|field| fields.contains_key(*field))
}

fn parse_template(key: &str, raw: &str) -> DomainResult<ReferenceSpec> {
    let captures = TEMPLATE_PATTERN.captures(raw).ok_or_else(|| {
        DomainError::invalid_reference(key, format!("'{raw}' is not of the form ${{tag:target:output}}"))
    })?;

    let tag = &captures["tag"];
    let target = captures["target"].to_string();
    let field = &captures["field"];

    let selector = if tag.starts_with(WORKFLOW_TAG) {
        TargetSelector::ByWorkflowParent(target)
    } else if is_environment_id(&target) {
        TargetSelector::ById(target)
    } else {
        TargetSelector::ByName(target)
    };

    ReferenceSpec::new(key, selector, field, ReferenceSyntax::Template.encoding())
}

fn parse_json_object(key: &str, object: Value) -> DomainResult<ReferenceSpec> {
    let reference: JsonReference = serde_json::from_value(object)
        .map_err(|e| DomainError::invalid_reference(key, e.to_string()))?;

    let parent = reference.workflow_parent.unwrap_or_default();
    let selector = if parent.is_empty() {
        TargetSelector::ByName(reference.environment_name.unwrap_or_default())
    } else {
        TargetSelector::ByWorkflowParent(parent)
    };

    ReferenceSpec::new(key, selector, reference.output, ReferenceSyntax::Json.encoding())
}
