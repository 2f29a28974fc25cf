//! Executor integration tests against a local mock server: retry bounds,
//! failure shapes, and the end-to-end path into the classifier.

use rpc_harness::classify::{classify, ErrorCode};
use rpc_harness::error::{ResponseError, SchemaViolation};
use rpc_harness::executor::{Request, RequestExecutor, RetryPolicy};
use rpc_harness::users::User;
use serde_json::json;
use std::time::Duration;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("rpc_harness=debug")
        .try_init();
}

/// Millisecond backoff so retry tests finish instantly.
fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        backoff_unit: Duration::from_millis(1),
        ..RetryPolicy::default()
    }
}

fn user_body() -> serde_json::Value {
    json!({ "id": 1, "firstName": "Terry", "lastName": "Medhurst", "age": 50 })
}

#[tokio::test]
async fn conforming_response_deserializes() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/users/1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(user_body().to_string())
        .create_async()
        .await;

    let executor = RequestExecutor::with_policy(&server.url(), fast_policy()).unwrap();
    let user: User = executor.execute(Request::get("/users/1")).await.unwrap();

    assert_eq!(user.id, 1);
    assert_eq!(user.first_name, "Terry");
    mock.assert_async().await;
}

#[tokio::test]
async fn retryable_status_exhausts_all_attempts() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/users/1")
        .with_status(503)
        .with_body(json!({ "message": "overloaded" }).to_string())
        .expect(3)
        .create_async()
        .await;

    let executor = RequestExecutor::with_policy(&server.url(), fast_policy()).unwrap();
    let failure = executor
        .execute::<User>(Request::get("/users/1"))
        .await
        .unwrap_err();

    let resp = failure.downcast_ref::<ResponseError>().unwrap();
    assert_eq!(resp.status, 503);
    mock.assert_async().await;
}

#[tokio::test]
async fn retryable_status_recovers_on_a_later_attempt() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    init_tracing();

    // Scripted upstream: first connection gets a 503, the second a user
    // body. `connection: close` forces the retry onto a fresh connection.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));

    let server_hits = Arc::clone(&hits);
    tokio::spawn(async move {
        for _ in 0..2 {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let response = if server_hits.fetch_add(1, Ordering::SeqCst) == 0 {
                "HTTP/1.1 503 Service Unavailable\r\nconnection: close\r\ncontent-length: 0\r\n\r\n"
                    .to_string()
            } else {
                let body = user_body().to_string();
                format!(
                    "HTTP/1.1 200 OK\r\nconnection: close\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n{}",
                    body.len(),
                    body
                )
            };
            let _ = socket.write_all(response.as_bytes()).await;
        }
    });

    let executor =
        RequestExecutor::with_policy(&format!("http://{addr}"), fast_policy()).unwrap();
    let user: User = executor.execute(Request::get("/users/1")).await.unwrap();

    assert_eq!(user.id, 1);
    assert_eq!(user.first_name, "Terry");
    assert_eq!(hits.load(Ordering::SeqCst), 2, "exactly one retry expected");
}

#[tokio::test]
async fn non_retryable_status_propagates_after_one_attempt() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/users/99")
        .with_status(404)
        .with_body(json!({ "message": "User not found" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let executor = RequestExecutor::with_policy(&server.url(), fast_policy()).unwrap();
    let failure = executor
        .execute::<User>(Request::get("/users/99"))
        .await
        .unwrap_err();

    // The upstream message survives into the normalized record.
    let err = classify(&failure);
    assert_eq!(err.code, ErrorCode::Http(404));
    assert_eq!(err.message, "User not found");
    assert_eq!(err.status, Some(404));
    mock.assert_async().await;
}

#[tokio::test]
async fn error_body_without_message_falls_back_to_the_reason_phrase() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/users/2")
        .with_status(404)
        .with_body("{}")
        .create_async()
        .await;

    let executor = RequestExecutor::with_policy(&server.url(), fast_policy()).unwrap();
    let failure = executor
        .execute::<User>(Request::get("/users/2"))
        .await
        .unwrap_err();

    let resp = failure.downcast_ref::<ResponseError>().unwrap();
    assert_eq!(resp.status, 404);
    assert_eq!(resp.message, "Not Found");
}

#[tokio::test]
async fn status_without_a_reason_phrase_still_yields_a_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/users/3")
        .with_status(599)
        .with_body("{}")
        .create_async()
        .await;

    let executor = RequestExecutor::with_policy(&server.url(), fast_policy()).unwrap();
    let failure = executor
        .execute::<User>(Request::get("/users/3"))
        .await
        .unwrap_err();

    let resp = failure.downcast_ref::<ResponseError>().unwrap();
    assert_eq!(resp.status, 599);
    assert_eq!(resp.message, "HTTP 599");

    // The shape is self-describing before classification ever sees it.
    let err = classify(&failure);
    assert_eq!(err.code, ErrorCode::Http(599));
    assert_eq!(err.message, "HTTP 599");
}

#[tokio::test]
async fn mismatched_body_surfaces_as_a_schema_violation() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/users/1")
        .with_status(200)
        .with_body(json!({ "id": "one", "firstName": 5 }).to_string())
        .create_async()
        .await;

    let executor = RequestExecutor::with_policy(&server.url(), fast_policy()).unwrap();
    let failure = executor
        .execute::<User>(Request::get("/users/1"))
        .await
        .unwrap_err();

    let violation = failure.downcast_ref::<SchemaViolation>().unwrap();
    assert!(!violation.issues.is_empty());

    // The validation shape wins classification even though the issue list
    // is discarded on the way out.
    let err = classify(&failure);
    assert_eq!(err.code, ErrorCode::Validation);
    assert_eq!(err.status, Some(400));
}

#[tokio::test]
async fn non_json_success_body_is_a_schema_violation() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/users/1")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let executor = RequestExecutor::with_policy(&server.url(), fast_policy()).unwrap();
    let failure = executor
        .execute::<User>(Request::get("/users/1"))
        .await
        .unwrap_err();

    assert_eq!(classify(&failure).code, ErrorCode::Validation);
}

#[tokio::test]
async fn query_parameters_reach_the_wire() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/users/search")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("q".into(), "terry".into()),
            mockito::Matcher::UrlEncoded("limit".into(), "5".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({ "users": [user_body()], "total": 1, "skip": 0, "limit": 5 }).to_string(),
        )
        .create_async()
        .await;

    let executor = RequestExecutor::with_policy(&server.url(), fast_policy()).unwrap();
    let page: rpc_harness::users::UserPage = executor
        .execute(Request::get("/users/search").query("q", "terry").query("limit", 5))
        .await
        .unwrap();

    assert_eq!(page.users.len(), 1);
    assert_eq!(page.total, 1);
    mock.assert_async().await;
}
