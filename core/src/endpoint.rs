//! API endpoint paths, relative to the configured base URI.

pub const VALIDATE: &str = "/api/v1/validate";
pub const VALIDATE_BATCH: &str = "/api/v1/validate-batch";
pub const BATCH_RESULT: &str = "/api/v1/get-result-bulk-verification-task";
pub const EMAIL_FINDER: &str = "/api/v1/finder";
pub const ACCOUNT_BALANCE: &str = "/api/v1/check-account-balance";
