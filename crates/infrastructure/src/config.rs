//! Process settings read from environment variables.
//!
//! | Variable | Meaning |
//! |---|---|
//! | `ENV0_ORGANIZATION_ID` | Organization used for name lookups |
//! | `ENV0_API_KEY` / `ENV0_API_SECRET` | API key pair |
//! | `TF_TOKEN_backend_api_env0_com` | Pre-encoded Basic credential, preferred over the key pair |
//! | `ENV0_ENVIRONMENT_ID` | Environment this run belongs to, root of workflow lookups |
//! | `TF_LOG` | Verbosity: empty or `info` logs at info, anything else at debug |
//! | `ENV0_API_ENDPOINT` | API base URL, defaults to `https://api.env0.com` |
//! | `ENV0_IMPORT_DIR` | Directory holding the variables files, defaults to `.` |

use std::fmt;
use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use url::Url;

/// Default env0 API base URL.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.env0.com";

/// Errors raised while reading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `ENV0_API_ENDPOINT` is not a usable base URL.
    #[error("invalid API endpoint '{value}': {reason}")]
    InvalidEndpoint {
        /// The configured value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Settings for a single import run.
#[derive(Clone)]
pub struct Settings {
    /// env0 organization ID.
    pub organization_id: String,

    /// ID of the environment running the import.
    pub environment_id: String,

    /// Base64 `key:secret` credential for Basic auth, if any was configured.
    pub credential: Option<String>,

    /// API base URL.
    pub api_endpoint: Url,

    /// Raw `TF_LOG` value.
    pub log_level: String,

    /// Directory holding input and output files.
    pub working_dir: PathBuf,
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `ENV0_API_ENDPOINT` is set to an invalid URL.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through the given lookup function.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if `ENV0_API_ENDPOINT` is set to an invalid URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let credential = get("TF_TOKEN_backend_api_env0_com").or_else(|| {
            match (get("ENV0_API_KEY"), get("ENV0_API_SECRET")) {
                (Some(key), Some(secret)) => Some(STANDARD.encode(format!("{key}:{secret}"))),
                _ => None,
            }
        });

        let endpoint = get("ENV0_API_ENDPOINT").unwrap_or_else(|| DEFAULT_API_ENDPOINT.into());
        let api_endpoint = Url::parse(&endpoint).map_err(|e| SettingsError::InvalidEndpoint {
            value: endpoint.clone(),
            reason: e.to_string(),
        })?;
        if api_endpoint.cannot_be_a_base() {
            return Err(SettingsError::InvalidEndpoint {
                value: endpoint,
                reason: "not a base URL".into(),
            });
        }

        Ok(Self {
            organization_id: get("ENV0_ORGANIZATION_ID").unwrap_or_default(),
            environment_id: get("ENV0_ENVIRONMENT_ID").unwrap_or_default(),
            credential,
            api_endpoint,
            log_level: get("TF_LOG").unwrap_or_default(),
            working_dir: get("ENV0_IMPORT_DIR").map_or_else(|| PathBuf::from("."), PathBuf::from),
        })
    }

    /// Returns true if a Basic credential is available.
    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        self.credential.is_some()
    }

    /// Returns the tracing filter implied by `TF_LOG`.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.log_level.is_empty() || self.log_level.eq_ignore_ascii_case("info") {
            "info"
        } else {
            "debug"
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("organization_id", &self.organization_id)
            .field("environment_id", &self.environment_id)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("api_endpoint", &self.api_endpoint.as_str())
            .field("log_level", &self.log_level)
            .field("working_dir", &self.working_dir)
            .finish()
    }
}
