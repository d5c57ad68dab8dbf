//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod environment_api;
mod variables_store;

pub use environment_api::EnvironmentApi;
pub use variables_store::{VariableMap, VariablesStore};
