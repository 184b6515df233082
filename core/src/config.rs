//! Client configuration: base URI and API key.

use std::fmt;
use std::path::Path;

use crate::error::Error;

pub const DEFAULT_BASE_URI: &str = "https://app.emailverify.io";
pub const ENV_API_KEY: &str = "EMAIL_VERIFY_API_KEY";
pub const ENV_URI: &str = "EMAIL_VERIFY_URI";

/// Connection settings owned by a `Client`.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub base_uri: String,
    pub api_key: String,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_uri: DEFAULT_BASE_URI.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Read `EMAIL_VERIFY_API_KEY` and `EMAIL_VERIFY_URI`, falling back to an
    /// empty key and the production URI.
    pub fn from_env() -> Self {
        Self {
            base_uri: env_or(ENV_URI, DEFAULT_BASE_URI),
            api_key: env_or(ENV_API_KEY, ""),
        }
    }

    /// Load a dotenv file into the process environment, then read the
    /// variables as [`Config::from_env`] does. Variables already set in the
    /// environment win over the file.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        dotenv::from_path(path)?;
        tracing::debug!(path = %path.display(), "loaded environment file");
        Ok(Self::from_env())
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        let base_uri = base_uri.into();
        if !base_uri.is_empty() {
            self.base_uri = base_uri;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.api_key.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("Config")
            .field("base_uri", &self.base_uri)
            .field("api_key", &key)
            .finish()
    }
}

fn env_or(name: &str, fallback: &str) -> String {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => fallback.to_string(),
    }
}
