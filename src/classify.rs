//! The error-normalization boundary.
//!
//! Every framework adapter funnels its failures through [`classify`], which
//! maps an arbitrary failure value to exactly one [`NormalizedError`] from a
//! closed taxonomy:
//!
//! | Case | code | status | message source |
//! |------|------|--------|----------------|
//! | schema validation | `VALIDATION_ERROR` | 400 | fixed string |
//! | timeout | `TIMEOUT` | 408 | fixed string |
//! | HTTP error | `HTTP_<status>` | upstream status | failure's message, else fixed fallback |
//! | anything else | `UNKNOWN_ERROR` | absent | failure's message, else fixed fallback |
//!
//! Detection is structural: each case is an explicit predicate probing the
//! failure's source chain for a known shape, so classification holds no matter
//! which underlying client layer produced the failure. The predicates run in
//! a fixed priority order (validation, then timeout, then HTTP response, then
//! fallback) and the first match wins; a value satisfying several shapes
//! resolves by that priority, never ambiguously.
//!
//! `classify` is a total, pure function: it never fails, never logs, and
//! never mutates its input. Equal inputs produce field-equal outputs.

use crate::error::{ResponseError, SchemaViolation, TimeoutElapsed};
use serde::{Serialize, Serializer};
use std::fmt;

/// Fixed message for schema-validation failures. The underlying issue list is
/// intentionally discarded so validator internals never reach API consumers.
pub const VALIDATION_MESSAGE: &str = "Received data did not match the expected schema";

/// Fixed message for timed-out requests.
pub const TIMEOUT_MESSAGE: &str = "The request timed out";

/// Fallback message for HTTP error responses that carry no message of their own.
pub const HTTP_FALLBACK_MESSAGE: &str = "The upstream request failed";

/// Fallback message for failures that match no known shape.
pub const UNKNOWN_FALLBACK_MESSAGE: &str = "An unexpected error occurred";

/// The closed error taxonomy.
///
/// Three fixed variants plus one parametrized family: `Http` carries the
/// upstream status code as a payload rather than baking it into a flat string
/// enumeration, so the embedded status stays type-safe. The rendered form
/// (`VALIDATION_ERROR`, `TIMEOUT`, `HTTP_503`, `UNKNOWN_ERROR`) is produced by
/// the `Display` impl and used verbatim on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Validation,
    Timeout,
    Http(u16),
    Unknown,
}

impl ErrorCode {
    /// The HTTP status implied by this code, if any.
    #[inline]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Validation => Some(400),
            Self::Timeout => Some(408),
            Self::Http(status) => Some(*status),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => f.write_str("VALIDATION_ERROR"),
            Self::Timeout => f.write_str("TIMEOUT"),
            Self::Http(status) => write!(f, "HTTP_{status}"),
            Self::Unknown => f.write_str("UNKNOWN_ERROR"),
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The normalized error record consumed by every adapter.
///
/// An immutable value: constructed once per failure, compared by its fields,
/// discarded after the adapter turns it into a wire response. `status` is
/// absent (not zero) for unknown failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

/// Discriminant computed by the shape predicates, consumed by one `match`.
enum FailureShape {
    Validation,
    Timeout,
    Http { status: u16, message: Option<String> },
    Unknown { message: Option<String> },
}

/// Classify an arbitrary failure value into a [`NormalizedError`].
///
/// Total over every failure the executor can surface; never panics.
pub fn classify(failure: &anyhow::Error) -> NormalizedError {
    match detect(failure) {
        FailureShape::Validation => NormalizedError {
            code: ErrorCode::Validation,
            message: VALIDATION_MESSAGE.to_string(),
            status: Some(400),
        },
        FailureShape::Timeout => NormalizedError {
            code: ErrorCode::Timeout,
            message: TIMEOUT_MESSAGE.to_string(),
            status: Some(408),
        },
        FailureShape::Http { status, message } => NormalizedError {
            code: ErrorCode::Http(status),
            message: message.unwrap_or_else(|| HTTP_FALLBACK_MESSAGE.to_string()),
            status: Some(status),
        },
        FailureShape::Unknown { message } => NormalizedError {
            code: ErrorCode::Unknown,
            message: message.unwrap_or_else(|| UNKNOWN_FALLBACK_MESSAGE.to_string()),
            status: None,
        },
    }
}

fn detect(failure: &anyhow::Error) -> FailureShape {
    if carries_schema_issues(failure) {
        return FailureShape::Validation;
    }
    if timed_out(failure) {
        return FailureShape::Timeout;
    }
    if let Some((status, message)) = response_status(failure) {
        return FailureShape::Http { status, message };
    }
    FailureShape::Unknown {
        message: non_blank(failure.to_string()),
    }
}

/// Case 1: something in the chain carries a list of schema issues, or is a
/// serde data error (a decode mismatch is a schema mismatch from the caller's
/// point of view).
fn carries_schema_issues(failure: &anyhow::Error) -> bool {
    // Top-level downcast also reaches values attached as context, which the
    // chain walk cannot see.
    if failure.downcast_ref::<SchemaViolation>().is_some() {
        return true;
    }
    failure.chain().any(|cause| {
        cause.downcast_ref::<SchemaViolation>().is_some()
            || cause
                .downcast_ref::<serde_json::Error>()
                .map_or(false, serde_json::Error::is_data)
    })
}

/// Case 2: a deadline expired somewhere in the chain. Probes every timeout
/// shape the underlying layers produce, not just our own marker type.
fn timed_out(failure: &anyhow::Error) -> bool {
    if failure.downcast_ref::<TimeoutElapsed>().is_some() {
        return true;
    }
    failure.chain().any(|cause| {
        cause.downcast_ref::<TimeoutElapsed>().is_some()
            || cause.downcast_ref::<tokio::time::error::Elapsed>().is_some()
            || cause
                .downcast_ref::<reqwest::Error>()
                .map_or(false, reqwest::Error::is_timeout)
            || cause
                .downcast_ref::<std::io::Error>()
                .map_or(false, |io| io.kind() == std::io::ErrorKind::TimedOut)
    })
}

/// Case 3: a completed exchange with a non-2xx status. Returns the status and
/// the carrier's own message, already filtered for blankness.
fn response_status(failure: &anyhow::Error) -> Option<(u16, Option<String>)> {
    if let Some(resp) = failure.downcast_ref::<ResponseError>() {
        return Some((resp.status, non_blank(resp.message.clone())));
    }
    failure.chain().find_map(|cause| {
        if let Some(resp) = cause.downcast_ref::<ResponseError>() {
            return Some((resp.status, non_blank(resp.message.clone())));
        }
        if let Some(err) = cause.downcast_ref::<reqwest::Error>() {
            if let Some(status) = err.status() {
                return Some((status.as_u16(), non_blank(err.to_string())));
            }
        }
        None
    })
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
