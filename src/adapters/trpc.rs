//! tRPC-style adapter: dot-separated procedure paths, JSON-RPC-flavoured
//! envelopes. Queries mount as GET, mutations as POST.

use super::{RouteDecl, WireResponse};
use crate::classify::{classify, NormalizedError};
use crate::users::{NewUser, User, UserPage, UserPatch, UserService};
use serde_json::{json, Value};

pub const MOUNT: &str = "/trpc";

pub const ROUTES: [RouteDecl; 6] = [
    RouteDecl { method: "GET", path: "/trpc/users.list", operation: "users.list" },
    RouteDecl { method: "GET", path: "/trpc/users.search", operation: "users.search" },
    RouteDecl { method: "GET", path: "/trpc/users.byId", operation: "users.byId" },
    RouteDecl { method: "POST", path: "/trpc/users.create", operation: "users.create" },
    RouteDecl { method: "POST", path: "/trpc/users.update", operation: "users.update" },
    RouteDecl { method: "POST", path: "/trpc/users.delete", operation: "users.delete" },
];

/// JSON-RPC numeric code for a given HTTP status, per the tRPC wire protocol.
fn rpc_code(status: u16) -> i64 {
    match status {
        400 => -32600,
        401 => -32001,
        403 => -32003,
        404 => -32004,
        408 => -32008,
        429 => -32029,
        _ => -32603,
    }
}

fn ok(data: impl serde::Serialize) -> WireResponse {
    WireResponse::json(200, json!({ "result": { "data": { "json": data } } }))
}

pub fn error_response(err: &NormalizedError) -> WireResponse {
    let status = err.status.unwrap_or(500);
    WireResponse::json(
        status,
        json!({
            "error": {
                "json": {
                    "message": err.message,
                    "code": rpc_code(status),
                    "data": { "code": err.code.to_string(), "httpStatus": status }
                }
            }
        }),
    )
}

fn bad_request(message: &str) -> WireResponse {
    WireResponse::json(
        400,
        json!({
            "error": {
                "json": {
                    "message": message,
                    "code": rpc_code(400),
                    "data": { "code": "BAD_REQUEST", "httpStatus": 400 }
                }
            }
        }),
    )
}

pub async fn list_users(
    service: &UserService,
    limit: Option<u32>,
    skip: Option<u32>,
) -> WireResponse {
    match service.list(limit, skip).await {
        Ok(page) => ok(page),
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
        Ok(page) => ok(page),
        Err(failure) => error_response(&classify(&failure)),
    }
}

pub async fn get_user(service: &UserService, id: i64) -> WireResponse {
    if id < 1 {
        return bad_request("id must be a positive integer");
    }
    match service.get(id as u64).await {
        Ok(user) => ok(user),
        Err(failure) => error_response(&classify(&failure)),
    }
}

pub async fn create_user(service: &UserService, input: &NewUser) -> WireResponse {
    if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
        return bad_request("firstName and lastName must not be blank");
    }
    match service.create(input).await {
        Ok(user) => ok(user),
        Err(failure) => error_response(&classify(&failure)),
    }
}

pub async fn update_user(service: &UserService, id: i64, patch: &UserPatch) -> WireResponse {
    if id < 1 {
        return bad_request("id must be a positive integer");
    }
    match service.update(id as u64, patch).await {
        Ok(user) => ok(user),
        Err(failure) => error_response(&classify(&failure)),
    }
}

pub async fn delete_user(service: &UserService, id: i64) -> WireResponse {
    if id < 1 {
        return bad_request("id must be a positive integer");
    }
    match service.delete(id as u64).await {
        Ok(deleted) => ok(deleted),
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
                "200": { "description": "tRPC result envelope" },
                "default": { "$ref": "#/components/responses/TrpcError" }
            }
        });
    }
    json!({
        "openapi": "3.1.0",
        "info": { "title": "tRPC adapter", "version": "1.0.0" },
        "paths": paths,
        "components": {
            "schemas": {
                "User": serde_json::to_value(schemars::schema_for!(User)).unwrap_or(Value::Null),
                "UserPage": serde_json::to_value(schemars::schema_for!(UserPage)).unwrap_or(Value::Null)
            },
            "responses": {
                "TrpcError": { "description": "JSON-RPC-flavoured error envelope" }
            }
        }
    })
}
