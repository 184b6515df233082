use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::Value;
use tower::ServiceExt;

const KEY: &str = "test-key";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- key handling ---

#[tokio::test]
async fn missing_key_returns_400_with_json_error() {
    let resp = app(KEY)
        .oneshot(get_request("/api/v1/check-account-balance"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Missing parameter: key.");
}

#[tokio::test]
async fn wrong_key_returns_401() {
    let resp = app(KEY)
        .oneshot(get_request("/api/v1/validate?email=a%40b.com&key=nope"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Invalid API key");
}

// --- validate ---

#[tokio::test]
async fn validate_classifies_address() {
    let resp = app(KEY)
        .oneshot(get_request("/api/v1/validate?email=invalid%40example.com&key=test-key"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["email"], "invalid@example.com");
    assert_eq!(body["status"], "invalid");
    assert_eq!(body["sub_status"], "mailbox_not_found");
}

#[tokio::test]
async fn validate_without_email_returns_400() {
    let resp = app(KEY)
        .oneshot(get_request("/api/v1/validate?key=test-key"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Missing parameter: email.");
}

// --- batch ---

#[tokio::test]
async fn batch_submission_counts_duplicates_and_rejections() {
    let resp = app(KEY)
        .oneshot(json_request(
            "/api/v1/validate-batch?key=test-key",
            r#"{"title":"Leads","key":"test-key","email_batch":[
                {"address":"a@example.com"},
                {"address":"A@example.com"},
                {"address":"broken"},
                {"address":"b@example.com"}
            ]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["task_id"], 1000);
    assert_eq!(body["count_submitted"], 4);
    assert_eq!(body["count_duplicates_removed"], 1);
    assert_eq!(body["count_rejected_emails"], 1);
    assert_eq!(body["count_processing"], 2);
}

#[tokio::test]
async fn batch_key_may_come_from_body() {
    let resp = app(KEY)
        .oneshot(json_request(
            "/api/v1/validate-batch",
            r#"{"title":"Leads","key":"test-key","email_batch":[{"address":"a@example.com"}]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn batch_without_title_returns_400() {
    let resp = app(KEY)
        .oneshot(json_request(
            "/api/v1/validate-batch?key=test-key",
            r#"{"title":"","email_batch":[{"address":"a@example.com"}]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batch_results_round_trip() {
    let app = app(KEY);

    let resp = app
        .clone()
        .oneshot(json_request(
            "/api/v1/validate-batch?key=test-key",
            r#"{"title":"Round trip","email_batch":[{"address":"a@example.com"},{"address":"info@example.com"}]}"#,
        ))
        .await
        .unwrap();
    let task_id = body_json(resp).await["task_id"].as_i64().unwrap();

    let resp = app
        .oneshot(get_request(&format!(
            "/api/v1/get-result-bulk-verification-task?task_id={task_id}&key=test-key"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["name"], "Round trip");
    assert_eq!(body["progress_percentage"], 100);
    let batch = body["results"]["email_batch"].as_array().unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[1]["address"], "info@example.com");
    assert_eq!(batch[1]["status"], "role_based");
}

#[tokio::test]
async fn unknown_task_returns_404() {
    let resp = app(KEY)
        .oneshot(get_request(
            "/api/v1/get-result-bulk-verification-task?task_id=42&key=test-key",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Task not found.");
}

#[tokio::test]
async fn batch_without_json_content_type_is_plain_text_error() {
    let resp = app(KEY)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/validate-batch?key=test-key")
                .body("title=x".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body = body_bytes(resp).await;
    assert!(serde_json::from_slice::<Value>(&body).is_err());
}

// --- finder ---

#[tokio::test]
async fn finder_builds_address_from_full_name() {
    let resp = app(KEY)
        .oneshot(get_request(
            "/api/v1/finder?name=John+Doe&domain=Example.com&key=test-key",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["email"], "john.doe@example.com");
    assert_eq!(body["status"], "found");
}

#[tokio::test]
async fn finder_single_name_is_not_found() {
    let resp = app(KEY)
        .oneshot(get_request("/api/v1/finder?name=Cher&domain=example.com&key=test-key"))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["email"], "null");
    assert_eq!(body["status"], "not_found");
}

// --- balance ---

#[tokio::test]
async fn account_balance_returns_fixture() {
    let resp = app(KEY)
        .oneshot(get_request("/api/v1/check-account-balance?key=test-key"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["api_status"], "enabled");
    assert_eq!(body["remaining_credits"], 15000);
}
