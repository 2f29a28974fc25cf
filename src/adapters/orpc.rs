//! oRPC-style adapter: REST verbs via the OpenAPI handler, flat error bodies
//! with a `defined` marker (all harness errors are contract-undefined).

use super::{RouteDecl, WireResponse};
use crate::classify::{classify, NormalizedError};
use crate::users::{NewUser, User, UserPage, UserPatch, UserService};
use serde_json::{json, Value};

pub const MOUNT: &str = "/orpc";

pub const ROUTES: [RouteDecl; 6] = [
    RouteDecl { method: "GET", path: "/orpc/users", operation: "listUsers" },
    RouteDecl { method: "GET", path: "/orpc/users/search", operation: "searchUsers" },
    RouteDecl { method: "GET", path: "/orpc/users/{id}", operation: "getUser" },
    RouteDecl { method: "POST", path: "/orpc/users", operation: "createUser" },
    RouteDecl { method: "PUT", path: "/orpc/users/{id}", operation: "updateUser" },
    RouteDecl { method: "DELETE", path: "/orpc/users/{id}", operation: "deleteUser" },
];

pub fn error_response(err: &NormalizedError) -> WireResponse {
    let status = err.status.unwrap_or(500);
    WireResponse::json(
        status,
        json!({
            "defined": false,
            "code": err.code.to_string(),
            "status": status,
            "message": err.message
        }),
    )
}

fn bad_request(message: &str) -> WireResponse {
    WireResponse::json(
        400,
        json!({ "defined": false, "code": "BAD_REQUEST", "status": 400, "message": message }),
    )
}

pub async fn list_users(
    service: &UserService,
    limit: Option<u32>,
    skip: Option<u32>,
) -> WireResponse {
    match service.list(limit, skip).await {
        Ok(page) => WireResponse::json(200, page),
        Err(failure) => error_response(&classify(&failure)),
    }
}

pub async fn search_users(
    service: &UserService,
    q: &str,
    limit: Option<u32>,
    skip: Option<u32>,
) -> WireResponse {
    if q.trim().is_empty() {
        return bad_request("q must not be blank");
    }
    match service.search(q, limit, skip).await {
        Ok(page) => WireResponse::json(200, page),
        Err(failure) => error_response(&classify(&failure)),
    }
}

pub async fn get_user(service: &UserService, id: i64) -> WireResponse {
    if id < 1 {
        return bad_request("id must be a positive integer");
    }
    match service.get(id as u64).await {
        Ok(user) => WireResponse::json(200, user),
        Err(failure) => error_response(&classify(&failure)),
    }
}

pub async fn create_user(service: &UserService, input: &NewUser) -> WireResponse {
    if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
        return bad_request("firstName and lastName must not be blank");
    }
    match service.create(input).await {
        Ok(user) => WireResponse::json(201, user),
        Err(failure) => error_response(&classify(&failure)),
    }
}

pub async fn update_user(service: &UserService, id: i64, patch: &UserPatch) -> WireResponse {
    if id < 1 {
        return bad_request("id must be a positive integer");
    }
    match service.update(id as u64, patch).await {
        Ok(user) => WireResponse::json(200, user),
        Err(failure) => error_response(&classify(&failure)),
    }
}

pub async fn delete_user(service: &UserService, id: i64) -> WireResponse {
    if id < 1 {
        return bad_request("id must be a positive integer");
    }
    match service.delete(id as u64).await {
        Ok(deleted) => WireResponse::json(200, deleted),
        Err(failure) => error_response(&classify(&failure)),
    }
}

pub fn document() -> Value {
    let mut paths = serde_json::Map::new();
    for route in ROUTES {
        let entry = paths
            .entry(route.path.to_string())
            .or_insert_with(|| json!({}));
        entry[route.method.to_lowercase()] = json!({
            "operationId": route.operation,
            "responses": {
                "200": { "description": "Success" },
                "default": { "$ref": "#/components/responses/OrpcError" }
            }
        });
    }
    json!({
        "openapi": "3.1.0",
        "info": { "title": "oRPC adapter", "version": "1.0.0" },
        "paths": paths,
        "components": {
            "schemas": {
                "User": serde_json::to_value(schemars::schema_for!(User)).unwrap_or(Value::Null),
                "UserPage": serde_json::to_value(schemars::schema_for!(UserPage)).unwrap_or(Value::Null)
            },
            "responses": {
                "OrpcError": { "description": "Flat error body with a `defined` marker" }
            }
        }
    })
}
