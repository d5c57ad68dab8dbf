//! Importer Domain - Core types
//!
//! This crate defines the domain model for importing env0 environment
//! outputs into Terraform variables files.
//! All types here are pure Rust with no I/O dependencies.

pub mod environment;
pub mod error;
pub mod import;
pub mod reference;

pub use environment::{
    DeploymentLog, EnvironmentRecord, OutputValue, WorkflowEnvironment, WorkflowFile,
};
pub use error::{DomainError, DomainResult};
pub use import::{ImportedValue, ResolvedImport};
pub use reference::{EncodingHint, ReferenceSpec, TargetSelector, VariableSource};
