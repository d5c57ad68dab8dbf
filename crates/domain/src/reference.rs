//! Parsed variable references
//!
//! A reference is an input value that points at an output of another env0
//! environment instead of carrying a literal value.

use std::fmt;

use crate::error::{DomainError, DomainResult};

/// Which input file a reference was declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VariableSource {
    /// `env0.auto.tfvars.json`
    #[default]
    Terraform,
    /// `env0.env-vars.json`
    Environment,
}

impl VariableSource {
    /// Returns the conventional file name for this source.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Terraform => "env0.auto.tfvars.json",
            Self::Environment => "env0.env-vars.json",
        }
    }
}

/// How the environment holding the requested output is identified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetSelector {
    /// A concrete environment ID.
    ById(String),
    /// An environment name. Names are not unique across an organization.
    ByName(String),
    /// A sibling environment, named inside the workflow that contains the
    /// current environment.
    ByWorkflowParent(String),
}

impl TargetSelector {
    /// Returns the raw target token (ID, name or workflow child name).
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::ById(s) | Self::ByName(s) | Self::ByWorkflowParent(s) => s,
        }
    }
}

impl fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ById(id) => write!(f, "id:{id}"),
            Self::ByName(name) => write!(f, "name:{name}"),
            Self::ByWorkflowParent(parent) => write!(f, "workflow:{parent}"),
        }
    }
}

/// How a resolved value is re-serialized into the output file.
///
/// Derived from the syntax the reference was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingHint {
    /// JSON-object reference: string values are emitted as nested raw JSON.
    Json,
    /// Templated-string reference: values are emitted unchanged.
    Plain,
}

/// One parsed input reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSpec {
    /// Key in the input file, reused as the key in the output file.
    pub input_key: String,

    /// Target environment selector.
    pub selector: TargetSelector,

    /// Name of the output inside the target environment's latest deployment.
    pub output_key: String,

    /// Output encoding.
    pub encoding: EncodingHint,

    /// Input file the reference came from.
    pub source: VariableSource,
}

impl ReferenceSpec {
    /// Creates a new reference.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidReference` if the output key or the
    /// selector target is empty.
    pub fn new(
        input_key: impl Into<String>,
        selector: TargetSelector,
        output_key: impl Into<String>,
        encoding: EncodingHint,
    ) -> DomainResult<Self> {
        let input_key = input_key.into();
        let output_key = output_key.into();

        if output_key.trim().is_empty() {
            return Err(DomainError::invalid_reference(
                input_key,
                "output name is empty",
            ));
        }
        if selector.target().trim().is_empty() {
            return Err(DomainError::invalid_reference(
                input_key,
                "target environment is empty",
            ));
        }

        Ok(Self {
            input_key,
            selector,
            output_key,
            encoding,
            source: VariableSource::default(),
        })
    }

    /// Sets the input file this reference was read from.
    #[must_use]
    pub fn with_source(mut self, source: VariableSource) -> Self {
        self.source = source;
        self
    }
}
