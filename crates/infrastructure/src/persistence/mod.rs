//! Persistence adapters.

mod vars_file;

pub use vars_file::{FileVariablesStore, OUTPUT_FILE_NAME};
