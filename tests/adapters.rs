//! Adapter shells: each one maps the same normalized error onto its own wire
//! shape, and input validation short-circuits before any network call.

use rpc_harness::adapters::{elysia, elysia_typegen, hono, orpc, trpc};
use rpc_harness::executor::{RequestExecutor, RetryPolicy};
use rpc_harness::users::UserService;
use serde_json::json;
use std::time::Duration;

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        backoff_unit: Duration::from_millis(1),
        ..RetryPolicy::default()
    }
}

/// A service pointed at nothing; used where the handler must not reach the
/// network at all.
fn offline_service() -> UserService {
    let executor = RequestExecutor::with_policy("http://127.0.0.1:9", fast_policy()).unwrap();
    UserService::new(executor)
}

async fn not_found_service(server: &mut mockito::Server) -> UserService {
    server
        .mock("GET", "/users/99")
        .with_status(404)
        .with_body(json!({ "message": "User not found" }).to_string())
        .create_async()
        .await;
    let executor = RequestExecutor::with_policy(&server.url(), fast_policy()).unwrap();
    UserService::new(executor)
}

#[tokio::test]
async fn each_adapter_renders_the_same_not_found_in_its_own_shape() {
    let mut server = mockito::Server::new_async().await;
    let service = not_found_service(&mut server).await;

    let trpc = trpc::get_user(&service, 99).await;
    assert_eq!(trpc.status, 404);
    assert_eq!(trpc.body["error"]["json"]["data"]["code"], "HTTP_404");
    assert_eq!(trpc.body["error"]["json"]["message"], "User not found");

    let orpc = orpc::get_user(&service, 99).await;
    assert_eq!(orpc.status, 404);
    assert_eq!(orpc.body["code"], "HTTP_404");
    assert_eq!(orpc.body["defined"], false);

    let hono = hono::get_user(&service, 99).await;
    assert_eq!(hono.status, 404);
    assert_eq!(hono.body["error"]["code"], "HTTP_404");

    let elysia = elysia::get_user(&service, 99).await;
    assert_eq!(elysia.status, 404);
    assert_eq!(elysia.body["code"], "HTTP_404");
    assert_eq!(elysia.body["message"], "User not found");

    let typegen = elysia_typegen::get_user(&service, 99).await;
    assert_eq!(typegen.status, 404);
    assert_eq!(typegen.body["code"], "HTTP_404");
}

#[tokio::test]
async fn invalid_ids_short_circuit_without_touching_the_network() {
    let service = offline_service();

    for resp in [
        trpc::get_user(&service, 0).await,
        orpc::get_user(&service, -3).await,
        hono::get_user(&service, 0).await,
        elysia::get_user(&service, -1).await,
        elysia_typegen::get_user(&service, 0).await,
    ] {
        assert_eq!(resp.status, 400);
    }
}

#[tokio::test]
async fn blank_search_terms_are_rejected_by_every_shell() {
    let service = offline_service();

    let trpc = trpc::search_users(&service, "  ", None, None).await;
    assert_eq!(trpc.status, 400);
    assert_eq!(trpc.body["error"]["json"]["data"]["code"], "BAD_REQUEST");

    let orpc = orpc::search_users(&service, "", None, None).await;
    assert_eq!(orpc.status, 400);
    assert_eq!(orpc.body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn successful_list_flows_through_unwrapped_and_enveloped() {
    let mut server = mockito::Server::new_async().await;
    let body = json!({
        "users": [{ "id": 1, "firstName": "Terry", "lastName": "Medhurst" }],
        "total": 1,
        "skip": 0,
        "limit": 30
    });
    server
        .mock("GET", "/users")
        .with_status(200)
        .with_body(body.to_string())
        .expect(2)
        .create_async()
        .await;
    let executor = RequestExecutor::with_policy(&server.url(), fast_policy()).unwrap();
    let service = UserService::new(executor);

    let hono = hono::list_users(&service, None, None).await;
    assert_eq!(hono.status, 200);
    assert_eq!(hono.body["users"][0]["firstName"], "Terry");

    // tRPC wraps the same payload in its result envelope.
    let trpc = trpc::list_users(&service, None, None).await;
    assert_eq!(trpc.status, 200);
    assert_eq!(trpc.body["result"]["data"]["json"]["total"], 1);
}

#[test]
fn every_adapter_declares_the_six_operations() {
    assert_eq!(trpc::ROUTES.len(), 6);
    assert_eq!(orpc::ROUTES.len(), 6);
    assert_eq!(hono::ROUTES.len(), 6);
    assert_eq!(elysia::ROUTES.len(), 6);
    assert_eq!(elysia_typegen::ROUTES.len(), 6);
}

#[test]
fn every_adapter_publishes_an_openapi_document() {
    for doc in [
        trpc::document(),
        orpc::document(),
        hono::document(),
        elysia::document(),
        elysia_typegen::document(),
    ] {
        assert_eq!(doc["openapi"], "3.1.0");
        assert!(doc["paths"].as_object().unwrap().len() >= 4);
        assert!(doc["components"]["schemas"].get("User").is_some());
    }
}
