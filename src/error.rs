//! Failure shapes surfaced by the request executor.
//!
//! These are standalone error types rather than variants of one enum, on
//! purpose: the executor's failure channel stays heterogeneous, and the
//! classifier in [`crate::classify`] must detect each shape structurally by
//! probing the error source chain. That keeps classification correct even
//! when a failure originates from a lower layer (reqwest, tokio, std::io)
//! instead of from these types.

use thiserror::Error;

/// One schema violation inside a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    /// JSON pointer to the offending location (e.g. `/users/0/id`).
    pub path: String,
    /// Human-readable description of the violation.
    pub detail: String,
}

/// A 2xx response whose body did not match the expected schema.
#[derive(Debug, Clone, Error)]
#[error("response body failed schema validation ({} issue(s))", issues.len())]
pub struct SchemaViolation {
    pub issues: Vec<SchemaIssue>,
}

impl SchemaViolation {
    pub fn single(path: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            issues: vec![SchemaIssue {
                path: path.into(),
                detail: detail.into(),
            }],
        }
    }
}

/// The request exceeded its deadline before a response arrived.
#[derive(Debug, Clone, Error)]
#[error("request exceeded the {limit_ms} ms deadline")]
pub struct TimeoutElapsed {
    pub limit_ms: u64,
}

/// A completed HTTP exchange that ended in a non-2xx status.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ResponseError {
    pub status: u16,
    pub message: String,
}

impl ResponseError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}
