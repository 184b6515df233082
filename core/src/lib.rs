//! Blocking client for the EmailVerify email-verification API.
//!
//! # Overview
//! Validates single addresses, submits and polls batch verification tasks,
//! finds business addresses from a name and domain, and reports the account's
//! credit balance.
//!
//! # Design
//! - `Client` owns a `Config` (base URI and API key) and a pluggable
//!   `Transport`; there is no global state, and clones are independent.
//! - Every request passes through one pathway: `prepare_url` attaches the key
//!   and query, the transport performs the round trip, `parse_response`
//!   decodes 200 bodies and normalizes everything else into `Error::Api`.
//! - `build_*` methods expose the requests as plain data for hosts that
//!   execute HTTP themselves.
//!
//! ```no_run
//! use emailverify_core::{Client, Config};
//!
//! # fn main() -> emailverify_core::Result<()> {
//! let client = Client::new(Config::from_env());
//! let result = client.validate("john.doe@example.com")?;
//! if result.is_valid() {
//!     println!("{} is deliverable", result.email);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod types;

pub use client::{parse_response, Client};
pub use config::Config;
pub use error::Error;
pub use http::{
    BoxError, HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport, DEFAULT_BODY_LIMIT,
};
pub use types::{
    AccountBalance, BatchEmailResult, BatchRequest, BatchResult, BatchResults, BatchSubmission,
    EmailAddress, FinderResult, ValidationResult,
};

pub type Result<T> = std::result::Result<T, Error>;
