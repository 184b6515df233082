//! Error types for the EmailVerify client.
//!
//! # Design
//! Local precondition failures (`MissingApiKey`, `InvalidInput`) are raised
//! before any request is built, so callers can tell "nothing was sent" apart
//! from a failed round trip. Every non-200 answer from the service lands in
//! `Api` with a single normalized message; see [`Error::from_response`].

use serde_json::{Map, Value};
use thiserror::Error;

use crate::http::BoxError;

/// Errors returned by `Client` operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No API key is configured.
    #[error("API key not set; use Client::set_api_key or Config::from_env_file to set it")]
    MissingApiKey,

    /// The caller supplied an empty or out-of-range argument.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The base URI and endpoint do not form a valid URL.
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request never completed: DNS, connect, TLS or I/O failure.
    #[error("HTTP request failed: {0}")]
    Transport(#[source] BoxError),

    /// The service answered with a status other than 200.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// A 200 response body did not match the expected shape.
    #[error("failed to decode JSON response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The dotenv file could not be loaded.
    #[error("failed to load environment file: {0}")]
    EnvFile(#[from] dotenv::Error),
}

impl Error {
    /// Normalize a non-200 response into `Error::Api`.
    ///
    /// The service reports errors either as a JSON object of strings
    /// (`{"error": "..."}`, sometimes with several keys) or as plain text.
    /// Object values are joined with `", "` in body order; anything else is
    /// reported verbatim.
    pub fn from_response(status: u16, body: &[u8]) -> Error {
        // Only the leading JSON value counts; trailing bytes are ignored.
        let leading = serde_json::Deserializer::from_slice(body)
            .into_iter::<Map<String, Value>>()
            .next();
        let message = match leading {
            Some(Ok(fields)) => join_string_values(&fields),
            _ => None,
        }
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());

        Error::Api { status, message }
    }

    /// HTTP status for `Api` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// `None` if any value is not a string.
fn join_string_values(fields: &Map<String, Value>) -> Option<String> {
    let values = fields
        .values()
        .map(|value| value.as_str())
        .collect::<Option<Vec<&str>>>()?;
    Some(values.join(", "))
}
