//! Response entities and request payloads for the EmailVerify API.
//!
//! # Design
//! Every response field is `#[serde(default)]`: the service omits fields
//! depending on account type and task state, and an absent or `null` field
//! decodes to its zero value instead of failing the whole call. Account balance fields
//! that only some accounts carry are `Option` so "absent" stays distinct
//! from "zero". Status values stay as `String` so unrecognized values from
//! the service survive decoding unchanged.

use serde::{Deserialize, Deserializer, Serialize};

/// Primary verification statuses.
pub mod status {
    pub const VALID: &str = "valid";
    pub const INVALID: &str = "invalid";
    pub const CATCH_ALL: &str = "catch_all";
    pub const DO_NOT_MAIL: &str = "do_not_mail";
    pub const UNKNOWN: &str = "unknown";
    /// Shared mailbox such as `info@` or `support@`.
    pub const ROLE_BASED: &str = "role_based";
    pub const SKIPPED: &str = "skipped";
}

/// Secondary classifications refining a primary status.
pub mod sub_status {
    pub const PERMITTED: &str = "permitted";
    pub const FAILED_SYNTAX_CHECK: &str = "failed_syntax_check";
    pub const MAILBOX_QUOTA_EXCEEDED: &str = "mailbox_quota_exceeded";
    pub const MAILBOX_NOT_FOUND: &str = "mailbox_not_found";
    pub const NO_DNS_ENTRIES: &str = "no_dns_entries";
    pub const DISPOSABLE: &str = "disposable";
    pub const NONE: &str = "none";
    pub const OPT_OUT: &str = "opt_out";
    pub const BLOCKED_DOMAIN: &str = "blocked_domain";
}

/// Email finder statuses.
pub mod finder {
    pub const FOUND: &str = "found";
    pub const NOT_FOUND: &str = "not_found";
    /// Value of `email` when nothing was found.
    pub const NULL_EMAIL: &str = "null";
}

/// Result of validating a single address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationResult {
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sub_status: String,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.status == status::VALID
    }
}

/// Acknowledgement of a submitted batch task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSubmission {
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub task_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub count_submitted: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub count_duplicates_removed: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub count_rejected_emails: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub count_processing: u64,
}

/// State and results of a batch task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchResult {
    #[serde(deserialize_with = "null_as_default")]
    pub count_checked: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub count_total: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub task_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub progress_percentage: f64,
    pub results: Option<BatchResults>,
}

impl BatchResult {
    /// Per-address results in service order; empty while the task is pending.
    pub fn email_results(&self) -> &[BatchEmailResult] {
        self.results
            .as_ref()
            .map(|r| r.email_batch.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_complete(&self) -> bool {
        self.progress_percentage >= 100.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchResults {
    #[serde(deserialize_with = "null_as_default")]
    pub email_batch: Vec<BatchEmailResult>,
}

/// Verification outcome for one address of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchEmailResult {
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sub_status: String,
}

impl BatchEmailResult {
    pub fn is_valid(&self) -> bool {
        self.status == status::VALID
    }
}

/// Email finder answer. `email` is `"null"` when nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderResult {
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

impl FinderResult {
    pub fn is_found(&self) -> bool {
        self.status == finder::FOUND
    }

    /// The found address, if any.
    pub fn found_email(&self) -> Option<&str> {
        if self.is_found() && self.email != finder::NULL_EMAIL {
            Some(&self.email)
        } else {
            None
        }
    }
}

/// Credits and API status of the account.
///
/// Appsumo accounts carry no `remaining_credits` or `referral_credits`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountBalance {
    #[serde(deserialize_with = "null_as_default")]
    pub api_status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub daily_credits_limit: u64,
    pub remaining_credits: Option<u64>,
    pub referral_credits: Option<u64>,
    pub remaining_daily_credits: Option<u64>,
    pub bonus_credits: Option<u64>,
}

/// Decode `null` as the field's default, as an absent field would be.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// One address in a batch submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub address: String,
}

/// JSON body of `POST /api/v1/validate-batch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub title: String,
    pub key: String,
    pub email_batch: Vec<EmailAddress>,
}
