//! Variable reference resolution module
//!
//! Parses env0 references out of input variables, resolves them against the
//! env0 API and assembles the output variables.
//!
//! # Usage
//!
//! ```
//! use importer_application::variable_resolver::{assemble, parse_reference};
//! use importer_domain::{OutputValue, ResolvedImport};
//! use serde_json::json;
//!
//! let spec = parse_reference("vpc_id", &json!("${env0-environment:network:vpc-id}"))
//!     .unwrap()
//!     .unwrap();
//! let import = ResolvedImport::new(&spec, "E1", "network", OutputValue::string("vpc-0123"));
//!
//! let outputs = assemble([&import]);
//! assert_eq!(outputs["vpc_id"], json!("vpc-0123"));
//! ```

pub mod assembler;
pub mod engine;
pub mod extractor;
pub mod parser;

pub use assembler::assemble;
pub use engine::TargetResolver;
pub use extractor::extract_output;
pub use parser::{ReferenceSyntax, classify, is_environment_id, parse_reference};
