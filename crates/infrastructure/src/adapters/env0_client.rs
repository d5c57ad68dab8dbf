//! env0 API client implementation using reqwest.
//!
//! This adapter implements the `EnvironmentApi` port. Every call is a single
//! authenticated GET; there is no retry and no timeout beyond reqwest's
//! defaults.

use async_trait::async_trait;
use importer_application::{ApplicationError, ApplicationResult, EnvironmentApi};
use importer_domain::EnvironmentRecord;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Settings;
use crate::serialization::from_json_bytes;

/// env0 API client.
pub struct Env0Client {
    client: Client,
    base_url: Url,
    organization_id: String,
    credential: Option<String>,
}

impl Env0Client {
    /// Creates a client from settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(settings: &Settings) -> ApplicationResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("env0-importer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApplicationError::Config(e.to_string()))?;

        Ok(Self::with_client(client, settings))
    }

    /// Creates a client from settings with a custom reqwest client.
    #[must_use]
    pub fn with_client(client: Client, settings: &Settings) -> Self {
        Self {
            client,
            base_url: settings.api_endpoint.clone(),
            organization_id: settings.organization_id.clone(),
            credential: settings.credential.clone(),
        }
    }

    /// `<base>/environments/<id>`
    fn environment_url(&self, id: &str) -> ApplicationResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApplicationError::Config(format!("invalid API endpoint: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["environments", id]);
        Ok(url)
    }

    /// `<base>/environments?organizationId=<org>&name=<name>`
    fn search_url(&self, name: &str) -> ApplicationResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApplicationError::Config(format!("invalid API endpoint: {}", self.base_url)))?
            .pop_if_empty()
            .push("environments");
        url.query_pairs_mut()
            .append_pair("organizationId", &self.organization_id)
            .append_pair("name", name);
        Ok(url)
    }

    /// Issues a GET and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ApplicationResult<T> {
        let path = match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_string(),
        };
        debug!(path = %path, "GET");

        let mut request = self.client.get(url).header(ACCEPT, "application/json");
        if let Some(credential) = &self.credential {
            request = request.header(AUTHORIZATION, format!("Basic {credential}"));
        }

        let response = request.send().await.map_err(|e| ApplicationError::Api {
            path: path.clone(),
            status: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApplicationError::Api {
                path,
                status: status.to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| ApplicationError::Api {
            path: path.clone(),
            status: format!("failed to read body: {e}"),
        })?;

        from_json_bytes(&body).map_err(|e| ApplicationError::Decode {
            path,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl EnvironmentApi for Env0Client {
    async fn get_environment(&self, id: &str) -> ApplicationResult<EnvironmentRecord> {
        let url = self.environment_url(id)?;
        self.get_json(url).await
    }

    async fn find_environments(&self, name: &str) -> ApplicationResult<Vec<EnvironmentRecord>> {
        let url = self.search_url(name)?;
        self.get_json(url).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client(endpoint: &str) -> Env0Client {
        let settings = Settings::from_lookup(|key| match key {
            "ENV0_API_ENDPOINT" => Some(endpoint.to_string()),
            "ENV0_ORGANIZATION_ID" => Some("org-1".to_string()),
            _ => None,
        })
        .unwrap();
        Env0Client::with_client(Client::new(), &settings)
    }

    #[test]
    fn test_environment_url() {
        let url = client("https://api.env0.com").environment_url("E1").unwrap();
        assert_eq!(url.as_str(), "https://api.env0.com/environments/E1");
    }

    #[test]
    fn test_environment_url_with_base_path() {
        let url = client("http://localhost:8080/api/").environment_url("E1").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/environments/E1");
    }

    #[test]
    fn test_search_url_encodes_name() {
        let url = client("https://api.env0.com").search_url("my env&co").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.env0.com/environments?organizationId=org-1&name=my+env%26co"
        );
    }

    #[test]
    fn test_id_is_a_single_path_segment() {
        let url = client("https://api.env0.com").environment_url("../admin").unwrap();
        assert_eq!(url.path(), "/environments/..%2Fadmin");
    }
}
