//! HTTP transport types and the pluggable `Transport` seam.
//!
//! # Design
//! Requests and responses are plain data. `Client` builds an `HttpRequest`,
//! hands it to a `Transport`, and parses the returned `HttpResponse`. The
//! transport is the only piece that touches the network, so tests swap in a
//! fake and host applications can bring their own HTTP stack.
//!
//! `HttpResponse` owns its body bytes. `UreqTransport` drains the network body
//! into that buffer and drops the connection-side body before returning, so
//! nothing stays open regardless of how the caller handles the response.

use std::time::Duration;

/// Largest response body `UreqTransport` reads by default. Larger bodies fail
/// with a transport error wrapping `ureq::Error::BodyExceedsLimit`.
pub const DEFAULT_BODY_LIMIT: u64 = 64 * 1024 * 1024;

/// Boxed error produced by a `Transport` implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is fully qualified and already carries the query string, including
/// the API key.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Sends one `HttpRequest` and returns the service's answer.
///
/// Implementations must return non-2xx responses as `Ok` data; only failures
/// to complete the round trip (DNS, connect, TLS, I/O) are `Err`.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError>;
}

/// Blocking transport backed by a `ureq::Agent`.
///
/// Response bodies are capped at [`DEFAULT_BODY_LIMIT`] unless changed with
/// [`UreqTransport::with_body_limit`]; results of very large batch tasks may
/// need a higher cap.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    body_limit: u64,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Transport whose requests fail once `timeout` elapses end to end.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Self {
        // Status interpretation belongs to the client, not the transport.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self {
            agent,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Change the largest response body this transport accepts, in bytes.
    pub fn with_body_limit(mut self, body_limit: u64) -> Self {
        self.body_limit = body_limit;
        self
    }
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport")
            .field("body_limit", &self.body_limit)
            .finish_non_exhaustive()
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError> {
        let mut response = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()?
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes())?,
                    None => builder.send_empty()?,
                }
            }
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.body_limit)
            .read_to_vec()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;

    use super::*;

    /// Serve `connections` requests with a 200 carrying `body`, then exit.
    fn serve_fixed_body(body: &'static str, connections: usize) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            for stream in listener.incoming().take(connections) {
                let mut stream = stream.unwrap();
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut buf).unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).unwrap();
            }
        });
        format!("http://{addr}/api/v1/check-account-balance?key=k")
    }

    fn get(url: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    #[test]
    fn method_names() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        let transport = UreqTransport::with_timeout(Duration::from_secs(2));
        let request = HttpRequest {
            method: HttpMethod::Get,
            // Port 1 on loopback is reserved and refuses connections.
            url: "http://127.0.0.1:1/api/v1/validate".to_string(),
            headers: Vec::new(),
            body: None,
        };
        assert!(transport.send(&request).is_err());
    }

    #[test]
    fn body_within_limit_is_read() {
        let body = r#"{"api_status":"enabled","daily_credits_limit":150}"#;
        let url = serve_fixed_body(body, 1);
        let response = UreqTransport::new().send(&get(url)).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, body.as_bytes());
    }

    #[test]
    fn body_over_limit_is_a_transport_error() {
        let body = r#"{"api_status":"enabled","daily_credits_limit":150}"#;
        let url = serve_fixed_body(body, 1);
        let transport = UreqTransport::new().with_body_limit(16);
        let err = transport.send(&get(url)).unwrap_err();
        assert!(
            matches!(err.downcast_ref::<ureq::Error>(), Some(ureq::Error::BodyExceedsLimit(_))),
            "{err}"
        );
    }

    #[test]
    fn default_limit_is_applied() {
        let debug = format!("{:?}", UreqTransport::default());
        assert!(debug.contains(&DEFAULT_BODY_LIMIT.to_string()), "{debug}");
    }
}
