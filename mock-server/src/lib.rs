//! In-memory emulation of the EmailVerify HTTP API.
//!
//! Classification is deterministic (see [`classify`]) so tests can assert on
//! exact statuses. Batch tasks complete immediately on submission.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailResult {
    pub address: String,
    pub status: String,
    pub sub_status: String,
}

#[derive(Deserialize)]
pub struct EmailAddress {
    pub address: String,
}

#[derive(Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub email_batch: Vec<EmailAddress>,
}

#[derive(Clone, Debug)]
pub struct Task {
    pub name: String,
    pub results: Vec<EmailResult>,
}

#[derive(Debug)]
pub struct TaskStore {
    next_id: i64,
    tasks: HashMap<i64, Task>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self {
            next_id: 1000,
            tasks: HashMap::new(),
        }
    }
}

pub type Db = Arc<RwLock<TaskStore>>;

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    db: Db,
}

type ApiError = (StatusCode, Json<Value>);

pub const BALANCE: &str =
    r#"{"api_status":"enabled","daily_credits_limit":150,"remaining_credits":15000,"referral_credits":0}"#;

const DISPOSABLE_DOMAINS: &[&str] = &["mailinator.com", "guerrillamail.com", "10minutemail.com"];
const ROLE_ACCOUNTS: &[&str] = &["admin", "info", "sales", "support"];

pub fn app(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        db: Db::default(),
    };
    Router::new()
        .route("/api/v1/validate", get(validate))
        .route("/api/v1/validate-batch", post(validate_batch))
        .route("/api/v1/get-result-bulk-verification-task", get(batch_result))
        .route("/api/v1/finder", get(finder))
        .route("/api/v1/check-account-balance", get(account_balance))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    let app = app(api_key);
    axum::serve(listener, app).await
}

/// Deterministic `(status, sub_status)` for an address.
pub fn classify(email: &str) -> (&'static str, &'static str) {
    let Some((local, domain)) = email.split_once('@') else {
        return ("invalid", "failed_syntax_check");
    };
    let local = local.to_ascii_lowercase();
    let domain = domain.to_ascii_lowercase();
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return ("invalid", "failed_syntax_check");
    }
    if domain.ends_with(".invalid") {
        return ("invalid", "no_dns_entries");
    }
    if local.starts_with("invalid") {
        return ("invalid", "mailbox_not_found");
    }
    if DISPOSABLE_DOMAINS.contains(&domain.as_str()) {
        return ("do_not_mail", "disposable");
    }
    if ROLE_ACCOUNTS.contains(&local.as_str()) {
        return ("role_based", "none");
    }
    if domain.starts_with("catchall.") {
        return ("catch_all", "none");
    }
    ("valid", "permitted")
}

fn error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

fn authorize(state: &AppState, key: Option<&str>) -> Result<(), ApiError> {
    match key {
        None | Some("") => Err(error(StatusCode::BAD_REQUEST, "Missing parameter: key.")),
        Some(key) if key == &*state.api_key => Ok(()),
        Some(_) => Err(error(StatusCode::UNAUTHORIZED, "Invalid API key")),
    }
}

fn required<'a>(params: &'a HashMap<String, String>, name: &str) -> Result<&'a str, ApiError> {
    params
        .get(name)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, &format!("Missing parameter: {name}.")))
}

async fn validate(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, params.get("key").map(String::as_str))?;
    let email = required(&params, "email")?;
    let (status, sub_status) = classify(email);
    tracing::debug!(email, status, "validated address");
    Ok(Json(json!({ "email": email, "status": status, "sub_status": sub_status })))
}

async fn validate_batch(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    Json(input): Json<BatchRequest>,
) -> Result<Json<Value>, ApiError> {
    let key = params.get("key").map(String::as_str).unwrap_or(input.key.as_str());
    authorize(&state, Some(key))?;
    if input.title.is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "Missing parameter: title."));
    }
    if input.email_batch.is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "Missing parameter: email_batch."));
    }

    let submitted = input.email_batch.len();
    let mut seen = Vec::<String>::new();
    let mut rejected = 0;
    for EmailAddress { address } in input.email_batch {
        let address = address.trim().to_string();
        if seen.iter().any(|s| s.eq_ignore_ascii_case(&address)) {
            continue;
        }
        if classify(&address).1 == "failed_syntax_check" {
            rejected += 1;
            continue;
        }
        seen.push(address);
    }
    // Every malformed occurrence counts as rejected, repeated or not.
    let duplicates = submitted - seen.len() - rejected;

    let results = seen
        .iter()
        .map(|address| {
            let (status, sub_status) = classify(address);
            EmailResult {
                address: address.clone(),
                status: status.to_string(),
                sub_status: sub_status.to_string(),
            }
        })
        .collect::<Vec<_>>();
    let processing = results.len();

    let mut store = state.db.write().await;
    let task_id = store.next_id;
    store.next_id += 1;
    store.tasks.insert(
        task_id,
        Task {
            name: input.title,
            results,
        },
    );
    tracing::info!(task_id, submitted, processing, "batch task created");

    Ok(Json(json!({
        "status": "success",
        "task_id": task_id,
        "count_submitted": submitted,
        "count_duplicates_removed": duplicates,
        "count_rejected_emails": rejected,
        "count_processing": processing,
    })))
}

async fn batch_result(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, params.get("key").map(String::as_str))?;
    let task_id: i64 = required(&params, "task_id")?
        .parse()
        .map_err(|_| error(StatusCode::BAD_REQUEST, "Invalid parameter: task_id."))?;

    let store = state.db.read().await;
    let task = store
        .tasks
        .get(&task_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Task not found."))?;

    Ok(Json(json!({
        "count_checked": task.results.len(),
        "count_total": task.results.len(),
        "name": task.name,
        "progress_percentage": 100,
        "task_id": task_id,
        "status": "verified",
        "results": { "email_batch": task.results },
    })))
}

async fn finder(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, params.get("key").map(String::as_str))?;
    let name = required(&params, "name")?;
    let domain = required(&params, "domain")?;

    let words = name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>();
    match words.as_slice() {
        [first, .., last] => Ok(Json(json!({
            "email": format!("{first}.{last}@{}", domain.to_lowercase()),
            "status": "found",
        }))),
        _ => Ok(Json(json!({ "email": "null", "status": "not_found" }))),
    }
}

async fn account_balance(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, params.get("key").map(String::as_str))?;
    let balance: Value = serde_json::from_str(BALANCE)
        .map_err(|_| error(StatusCode::INTERNAL_SERVER_ERROR, "balance unavailable"))?;
    Ok(Json(balance))
}
