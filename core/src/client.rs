//! Blocking client for the EmailVerify API.
//!
//! # Design
//! `Client` owns its `Config` and an `Arc<dyn Transport>`; it holds no other
//! state. Endpoint methods validate inputs, build the URL with `prepare_url`,
//! and hand it to `execute_get` / `execute_post`, which run the round trip and
//! decode the answer with [`parse_response`]. Each endpoint also has a
//! `build_*` method producing the same `HttpRequest` as plain data, for hosts
//! that do their own I/O and call `parse_response` directly.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::Config;
use crate::endpoint;
use crate::error::Error;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::types::{
    AccountBalance, BatchRequest, BatchResult, BatchSubmission, EmailAddress, FinderResult,
    ValidationResult,
};
use crate::Result;

/// Synchronous client; each call performs at most one HTTP round trip.
#[derive(Clone)]
pub struct Client {
    config: Config,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Client using the default `ureq` transport.
    pub fn new(config: Config) -> Self {
        Self::with_transport(config, Arc::new(UreqTransport::new()))
    }

    /// Client configured from `EMAIL_VERIFY_API_KEY` / `EMAIL_VERIFY_URI`.
    pub fn from_env() -> Self {
        Self::new(Config::from_env())
    }

    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.config.api_key = api_key.into();
    }

    /// Empty values are ignored.
    pub fn set_base_uri(&mut self, base_uri: impl Into<String>) {
        let base_uri = base_uri.into();
        if !base_uri.is_empty() {
            self.config.base_uri = base_uri;
        }
    }

    // -----------------------------------------------------------------------
    // Request pathway
    // -----------------------------------------------------------------------

    /// Fully qualified URL for `endpoint` with `params` and the API key in the
    /// query string. A caller-supplied `key` parameter is overwritten.
    pub fn prepare_url(&self, endpoint: &str, mut params: BTreeMap<String, String>) -> Result<String> {
        if self.config.api_key.is_empty() {
            return Err(Error::MissingApiKey);
        }
        params.insert("key".to_string(), self.config.api_key.clone());

        let joined = format!(
            "{}/{}",
            self.config.base_uri.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined)?;
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in &params {
                query.append_pair(name, value);
            }
        }
        Ok(url.into())
    }

    pub fn execute_get<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        self.execute(get_request(url))
    }

    pub fn execute_post<T: DeserializeOwned, B: Serialize>(&self, url: String, body: &B) -> Result<T> {
        self.execute(post_request(url, body)?)
    }

    fn execute<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T> {
        let path = request.url.split('?').next().unwrap_or_default();
        tracing::debug!(method = request.method.as_str(), path, "sending request");

        let response = self.transport.send(&request).map_err(Error::Transport)?;
        tracing::debug!(status = response.status, path, "received response");
        if response.status != 200 {
            tracing::warn!(status = response.status, path, "service returned an error");
        }
        parse_response(response)
    }

    // -----------------------------------------------------------------------
    // Request builders
    // -----------------------------------------------------------------------

    pub fn build_validate(&self, email: &str) -> Result<HttpRequest> {
        Ok(get_request(self.validate_url(email)?))
    }

    pub fn build_validate_batch<S: AsRef<str>>(&self, title: &str, emails: &[S]) -> Result<HttpRequest> {
        let (url, body) = self.validate_batch_payload(title, emails)?;
        post_request(url, &body)
    }

    pub fn build_batch_results(&self, task_id: i64) -> Result<HttpRequest> {
        Ok(get_request(self.batch_results_url(task_id)?))
    }

    pub fn build_find_email(&self, name: &str, domain: &str) -> Result<HttpRequest> {
        Ok(get_request(self.find_email_url(name, domain)?))
    }

    pub fn build_account_balance(&self) -> Result<HttpRequest> {
        Ok(get_request(self.account_balance_url()?))
    }

    fn validate_url(&self, email: &str) -> Result<String> {
        if email.is_empty() {
            return Err(Error::InvalidInput("email cannot be empty".to_string()));
        }
        let params = BTreeMap::from([("email".to_string(), email.to_string())]);
        self.prepare_url(endpoint::VALIDATE, params)
    }

    fn validate_batch_payload<S: AsRef<str>>(&self, title: &str, emails: &[S]) -> Result<(String, BatchRequest)> {
        if title.is_empty() {
            return Err(Error::InvalidInput("title is required".to_string()));
        }
        if emails.is_empty() {
            return Err(Error::InvalidInput("email list cannot be empty".to_string()));
        }
        let url = self.prepare_url(endpoint::VALIDATE_BATCH, BTreeMap::new())?;
        let body = BatchRequest {
            title: title.to_string(),
            key: self.config.api_key.clone(),
            email_batch: emails
                .iter()
                .map(|email| EmailAddress {
                    address: email.as_ref().to_string(),
                })
                .collect(),
        };
        Ok((url, body))
    }

    fn batch_results_url(&self, task_id: i64) -> Result<String> {
        if task_id <= 0 {
            return Err(Error::InvalidInput(format!(
                "task id must be greater than 0, got {task_id}"
            )));
        }
        let params = BTreeMap::from([("task_id".to_string(), task_id.to_string())]);
        self.prepare_url(endpoint::BATCH_RESULT, params)
    }

    fn find_email_url(&self, name: &str, domain: &str) -> Result<String> {
        if name.is_empty() || domain.is_empty() {
            return Err(Error::InvalidInput("both name and domain are required".to_string()));
        }
        let params = BTreeMap::from([
            ("name".to_string(), name.to_string()),
            ("domain".to_string(), domain.to_string()),
        ]);
        self.prepare_url(endpoint::EMAIL_FINDER, params)
    }

    fn account_balance_url(&self) -> Result<String> {
        self.prepare_url(endpoint::ACCOUNT_BALANCE, BTreeMap::new())
    }

    // -----------------------------------------------------------------------
    // Endpoints
    // -----------------------------------------------------------------------

    /// Verify a single address. `GET /api/v1/validate`
    pub fn validate(&self, email: &str) -> Result<ValidationResult> {
        self.execute_get(self.validate_url(email)?)
    }

    /// Submit addresses as an asynchronous batch task. The returned
    /// `task_id` is what [`Client::batch_results`] polls.
    pub fn validate_batch<S: AsRef<str>>(&self, title: &str, emails: &[S]) -> Result<BatchSubmission> {
        let (url, body) = self.validate_batch_payload(title, emails)?;
        self.execute_post(url, &body)
    }

    pub fn batch_results(&self, task_id: i64) -> Result<BatchResult> {
        self.execute_get(self.batch_results_url(task_id)?)
    }

    /// Look up a business address from a full name such as `"John Smith"`
    /// and a domain.
    pub fn find_email(&self, name: &str, domain: &str) -> Result<FinderResult> {
        self.execute_get(self.find_email_url(name, domain)?)
    }

    pub fn account_balance(&self) -> Result<AccountBalance> {
        self.execute_get(self.account_balance_url()?)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").field("config", &self.config).finish_non_exhaustive()
    }
}

/// Decode a 200 response into `T`; any other status becomes `Error::Api`.
pub fn parse_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T> {
    if response.status != 200 {
        return Err(Error::from_response(response.status, &response.body));
    }
    serde_json::from_slice(&response.body).map_err(Error::Decode)
}

fn get_request(url: String) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        url,
        headers: Vec::new(),
        body: None,
    }
}

fn post_request<B: Serialize>(url: String, body: &B) -> Result<HttpRequest> {
    let body = serde_json::to_string(body).map_err(Error::Encode)?;
    Ok(HttpRequest {
        method: HttpMethod::Post,
        url,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}
