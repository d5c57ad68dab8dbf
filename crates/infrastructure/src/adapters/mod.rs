//! Adapters for external services.

mod env0_client;

pub use env0_client::Env0Client;
