//! env0 API port

use async_trait::async_trait;
use importer_domain::EnvironmentRecord;

use crate::ApplicationResult;

/// Read-only access to env0 environments.
///
/// Implementations issue one authenticated request per call. A non-success
/// status must surface as `ApplicationError::Api` and an unexpected body as
/// `ApplicationError::Decode`.
#[async_trait]
pub trait EnvironmentApi: Send + Sync {
    /// Fetches a single environment by ID (`GET /environments/<id>`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn get_environment(&self, id: &str) -> ApplicationResult<EnvironmentRecord>;

    /// Lists the organization's environments with the given name
    /// (`GET /environments?organizationId=<org>&name=<name>`).
    ///
    /// The order of the returned records is the order the service sent them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn find_environments(&self, name: &str) -> ApplicationResult<Vec<EnvironmentRecord>>;
}
