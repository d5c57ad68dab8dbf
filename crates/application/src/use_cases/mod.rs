//! Application use cases (business logic orchestration).

mod import_variables;

pub use import_variables::{ImportReport, ImportVariables};
