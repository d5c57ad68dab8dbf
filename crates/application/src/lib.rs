//! Importer Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (env0 API, variables files)
//! - Reference parsing, resolution and output assembly
//! - Use case orchestration
//! - Application-level error handling

pub mod error;
pub mod ports;
pub mod use_cases;
pub mod variable_resolver;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{EnvironmentApi, VariableMap, VariablesStore};
pub use use_cases::{ImportReport, ImportVariables};
pub use variable_resolver::{TargetResolver, assemble, parse_reference};
