//! Variables file port

use async_trait::async_trait;
use importer_domain::VariableSource;
use indexmap::IndexMap;

use crate::ApplicationResult;

/// Ordered key to raw JSON value mapping, as found in a variables file.
pub type VariableMap = IndexMap<String, serde_json::Value>;

/// Reads the input variables files and writes the resolved output file.
#[async_trait]
pub trait VariablesStore: Send + Sync {
    /// Loads the variables declared in the given source.
    ///
    /// Returns `Ok(None)` if the source does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Storage` if the source exists but cannot be
    /// read or is not a JSON object.
    async fn load(&self, source: VariableSource) -> ApplicationResult<Option<VariableMap>>;

    /// Writes the resolved variables, replacing any previous output.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Storage` if the output cannot be written.
    async fn save(&self, outputs: &VariableMap) -> ApplicationResult<()>;
}
