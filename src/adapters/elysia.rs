//! Elysia-style adapter (runtime schemas): REST routes with a flat error body.

use super::{RouteDecl, WireResponse};
use crate::classify::{classify, NormalizedError};
use crate::users::{NewUser, User, UserPage, UserPatch, UserService};
use serde_json::{json, Value};

pub const MOUNT: &str = "/elysia";

pub const ROUTES: [RouteDecl; 6] = [
    RouteDecl { method: "GET", path: "/elysia/users", operation: "listUsers" },
    RouteDecl { method: "GET", path: "/elysia/users/search", operation: "searchUsers" },
    RouteDecl { method: "GET", path: "/elysia/users/:id", operation: "getUser" },
    RouteDecl { method: "POST", path: "/elysia/users", operation: "createUser" },
    RouteDecl { method: "PUT", path: "/elysia/users/:id", operation: "updateUser" },
    RouteDecl { method: "DELETE", path: "/elysia/users/:id", operation: "deleteUser" },
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
        "info": { "title": "Elysia adapter", "version": "1.0.0" },
        "paths": paths,
        "components": {
            "schemas": {
                "User": serde_json::to_value(schemars::schema_for!(User)).unwrap_or(Value::Null),
                "UserPage": serde_json::to_value(schemars::schema_for!(UserPage)).unwrap_or(Value::Null)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ErrorCode;

    #[test]
    fn http_error_maps_onto_the_flat_body() {
        let err = NormalizedError {
            code: ErrorCode::Http(502),
            message: "bad gateway".into(),
            status: Some(502),
        };
        let resp = error_response(&err);
        assert_eq!(resp.status, 502);
        assert_eq!(resp.body["code"], "HTTP_502");
        assert_eq!(resp.body["status"], 502);
    }
}
