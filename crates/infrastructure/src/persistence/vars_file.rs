//! File-based variables store.
//!
//! Inputs and output live side by side in one directory:
//! ```text
//! working_dir/
//!   env0.auto.tfvars.json   (required input)
//!   env0.env-vars.json      (optional input)
//!   env1.auto.tfvars.json   (output)
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use importer_application::{ApplicationError, ApplicationResult, VariableMap, VariablesStore};
use importer_domain::VariableSource;
use tokio::fs;
use tracing::debug;

use crate::serialization::{from_json_bytes, to_json_pretty_bytes};

/// Name of the output file.
pub const OUTPUT_FILE_NAME: &str = "env1.auto.tfvars.json";

/// Variables store reading and writing JSON files with `tokio::fs`.
#[derive(Debug, Clone)]
pub struct FileVariablesStore {
    directory: PathBuf,
}

impl FileVariablesStore {
    /// Creates a store rooted at the given directory.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Returns the path of an input file.
    #[must_use]
    pub fn input_path(&self, source: VariableSource) -> PathBuf {
        self.directory.join(source.file_name())
    }

    /// Returns the path of the output file.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.directory.join(OUTPUT_FILE_NAME)
    }
}

fn storage_error(action: &str, path: &Path, error: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::Storage(format!("failed to {action} {}: {error}", path.display()))
}

#[async_trait]
impl VariablesStore for FileVariablesStore {
    async fn load(&self, source: VariableSource) -> ApplicationResult<Option<VariableMap>> {
        let path = self.input_path(source);

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error("read", &path, e)),
        };
        debug!(path = %path.display(), bytes = bytes.len(), "read variables file");

        from_json_bytes(&bytes)
            .map(Some)
            .map_err(|e| storage_error("parse", &path, e))
    }

    async fn save(&self, outputs: &VariableMap) -> ApplicationResult<()> {
        let path = self.output_path();
        let contents = to_json_pretty_bytes(outputs).map_err(|e| storage_error("encode", &path, e))?;

        fs::write(&path, contents)
            .await
            .map_err(|e| storage_error("write", &path, e))?;
        debug!(path = %path.display(), entries = outputs.len(), "wrote output file");
        Ok(())
    }
}
