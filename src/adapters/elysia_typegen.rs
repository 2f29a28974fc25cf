//! Elysia-typegen-style adapter: same surface as the runtime Elysia shell,
//! but its OpenAPI document is generated wholesale from the type registry
//! instead of per-route annotations. Kept separate on purpose — the harness
//! compares the two Elysia integration styles against each other.

use super::{RouteDecl, WireResponse};
use crate::classify::{classify, NormalizedError};
use crate::users::{DeletedUser, NewUser, User, UserPage, UserPatch, UserService};
use serde_json::{json, Value};

pub const MOUNT: &str = "/elysia-typegen";

pub const ROUTES: [RouteDecl; 6] = [
    RouteDecl { method: "GET", path: "/elysia-typegen/users", operation: "listUsers" },
    RouteDecl { method: "GET", path: "/elysia-typegen/users/search", operation: "searchUsers" },
    RouteDecl { method: "GET", path: "/elysia-typegen/users/:id", operation: "getUser" },
    RouteDecl { method: "POST", path: "/elysia-typegen/users", operation: "createUser" },
    RouteDecl { method: "PUT", path: "/elysia-typegen/users/:id", operation: "updateUser" },
    RouteDecl { method: "DELETE", path: "/elysia-typegen/users/:id", operation: "deleteUser" },
];

pub fn error_response(err: &NormalizedError) -> WireResponse {
    let status = err.status.unwrap_or(500);
    WireResponse::json(
        status,
        json!({ "code": err.code.to_string(), "status": status, "message": err.message }),
    )
}

fn bad_request(message: &str) -> WireResponse {
    WireResponse::json(
        400,
        json!({ "code": "BAD_REQUEST", "status": 400, "message": message }),
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

/// Document generated from the full type registry: every request and
/// response type is emitted as a component schema.
pub fn document() -> Value {
    let mut paths = serde_json::Map::new();
    for route in ROUTES {
        let path = route.path.replace(":id", "{id}");
        let entry = paths.entry(path).or_insert_with(|| json!({}));
        entry[route.method.to_lowercase()] = json!({
            "operationId": route.operation,
            "responses": {
                "200": { "description": "Success" },
                "default": { "description": "Flat error body" }
            }
        });
    }
    json!({
        "openapi": "3.1.0",
        "info": { "title": "Elysia typegen adapter", "version": "1.0.0" },
        "paths": paths,
        "components": {
            "schemas": {
                "User": serde_json::to_value(schemars::schema_for!(User)).unwrap_or(Value::Null),
                "UserPage": serde_json::to_value(schemars::schema_for!(UserPage)).unwrap_or(Value::Null),
                "NewUser": serde_json::to_value(schemars::schema_for!(NewUser)).unwrap_or(Value::Null),
                "UserPatch": serde_json::to_value(schemars::schema_for!(UserPatch)).unwrap_or(Value::Null),
                "DeletedUser": serde_json::to_value(schemars::schema_for!(DeletedUser)).unwrap_or(Value::Null)
            }
        }
    })
}
