//! Importer Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus process settings.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod serialization;

pub use adapters::Env0Client;
pub use config::{DEFAULT_API_ENDPOINT, Settings, SettingsError};
pub use persistence::{FileVariablesStore, OUTPUT_FILE_NAME};
pub use serialization::{SerializationError, from_json_bytes, to_json_pretty, to_json_pretty_bytes};
