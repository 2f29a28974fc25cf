//! The five framework adapter shells.
//!
//! Each module mirrors one framework integration from the comparison: route
//! declarations, input validation, a success envelope, an error envelope, and
//! an OpenAPI document. They are intentionally parallel — the harness exists
//! to compare the shells, so the duplication is the point and must not be
//! collapsed into a shared abstraction.
//!
//! What every adapter shares is the boundary: on any service failure it calls
//! [`crate::classify::classify`] and maps the resulting
//! [`crate::classify::NormalizedError`] onto its own wire shape, taking the
//! HTTP status from the normalized record (500 when absent).
//!
//! Adapters produce [`WireResponse`] values rather than framework-native
//! responses, which keeps the comparison free of five server stacks and makes
//! every shell directly testable.

pub mod elysia;
pub mod elysia_typegen;
pub mod hono;
pub mod orpc;
pub mod trpc;

use serde::Serialize;
use serde_json::Value;

/// A wire-level response: HTTP status plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct WireResponse {
    pub status: u16,
    pub body: Value,
}

impl WireResponse {
    pub fn json(status: u16, body: impl Serialize) -> Self {
        Self {
            status,
            body: serde_json::to_value(body).unwrap_or(Value::Null),
        }
    }
}

/// One declared route: how an adapter mounts an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDecl {
    pub method: &'static str,
    pub path: &'static str,
    pub operation: &'static str,
}
