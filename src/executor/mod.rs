//! Schema-validated HTTP request execution.
//!
//! [`RequestExecutor`] is the single transport every service call goes
//! through: it enforces a deadline, validates 2xx bodies against the JSON
//! Schema generated for the expected response type, and applies a bounded
//! sequential retry for a fixed allowlist of transient statuses. Failures
//! surface as the shapes in [`crate::error`]; callers hand them to
//! [`crate::classify::classify`] untouched.

mod retry;

pub use retry::{RetryPolicy, DEFAULT_RETRYABLE_STATUSES};

use crate::error::{ResponseError, SchemaIssue, SchemaViolation, TimeoutElapsed};
use anyhow::Context;
use jsonschema::{Draft, JSONSchema};
use reqwest::Method;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::env;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default base of the remote user-data fixture API.
pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// One HTTP call: path, method, optional JSON body, query pairs.
#[derive(Debug, Clone)]
pub struct Request {
    pub path: String,
    pub method: Method,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
}

impl Request {
    pub fn get(path: impl Into<String>) -> Self {
        Self::build(path, Method::GET, None)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::build(path, Method::POST, Some(body))
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::build(path, Method::PUT, Some(body))
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::build(path, Method::DELETE, None)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    fn build(path: impl Into<String>, method: Method, body: Option<Value>) -> Self {
        Self {
            path: path.into(),
            method,
            body,
            query: Vec::new(),
        }
    }
}

/// HTTP transport with timeout, retry, and response-shape validation.
pub struct RequestExecutor {
    client: reqwest::Client,
    base_url: String,
    policy: RetryPolicy,
    timeout_ms: u64,
}

impl RequestExecutor {
    /// Executor with the default retry policy.
    pub fn new(base_url: &str) -> crate::Result<Self> {
        Self::with_policy(base_url, RetryPolicy::default())
    }

    /// Executor with an explicit retry policy. The deadline is env-overridable
    /// (`HARNESS_TIMEOUT_SECS`), defaulting to 30 s.
    pub fn with_policy(base_url: &str, policy: RetryPolicy) -> crate::Result<Self> {
        Url::parse(base_url).with_context(|| format!("invalid base URL: {base_url}"))?;

        let timeout_secs = env::var("HARNESS_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            policy,
            timeout_ms: timeout_secs * 1000,
        })
    }

    /// Executor configured from the environment: `HARNESS_BASE_URL` and
    /// `HARNESS_MAX_ATTEMPTS`, with fixture-API defaults.
    pub fn from_env() -> crate::Result<Self> {
        let base_url =
            env::var("HARNESS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut policy = RetryPolicy::default();
        if let Some(attempts) = env::var("HARNESS_MAX_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
        {
            policy.max_attempts = attempts.max(1);
        }
        Self::with_policy(&base_url, policy)
    }

    /// Execute one request, retrying per the policy, and validate the 2xx
    /// body against the schema of `T` before deserializing.
    ///
    /// The retry loop is sequential: each attempt waits out the previous
    /// attempt's deadline and backoff before the next one is issued. Only
    /// responses with an allowlisted status are retried; deadline failures
    /// and validation failures propagate after the first attempt.
    pub async fn execute<T>(&self, request: Request) -> crate::Result<T>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let mut attempt = 1u32;
        loop {
            debug!(attempt, method = %request.method, path = %request.path, "issuing request");
            match self.attempt::<T>(&request).await {
                Ok(value) => return Ok(value),
                Err(failure) => {
                    let retryable = failure
                        .downcast_ref::<ResponseError>()
                        .map(|resp| resp.status)
                        .filter(|status| self.policy.retries(*status));
                    match retryable {
                        Some(status) if attempt < self.policy.max_attempts => {
                            let delay = self.policy.delay(attempt);
                            warn!(
                                status,
                                attempt,
                                delay_ms = delay.as_millis() as u64,
                                path = %request.path,
                                "retryable status, backing off"
                            );
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                        }
                        _ => return Err(failure),
                    }
                }
            }
        }
    }

    async fn attempt<T>(&self, request: &Request) -> crate::Result<T>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let url = format!(
            "{}/{}",
            self.base_url,
            request.path.trim_start_matches('/')
        );

        let mut req = self.client.request(request.method.clone(), url);
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::upstream_message(response).await.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .map(str::to_string)
                    // Statuses without a reason phrase still get a
                    // self-describing message.
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
            });
            return Err(ResponseError::new(status.as_u16(), message).into());
        }

        let body: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                anyhow::Error::new(TimeoutElapsed {
                    limit_ms: self.timeout_ms,
                })
            } else {
                SchemaViolation::single("", "response body is not valid JSON").into()
            }
        })?;

        validate_shape::<T>(&body)?;

        serde_json::from_value(body)
            .map_err(|e| SchemaViolation::single("", e.to_string()).into())
    }

    fn map_send_error(&self, err: reqwest::Error) -> anyhow::Error {
        if err.is_timeout() {
            anyhow::Error::new(TimeoutElapsed {
                limit_ms: self.timeout_ms,
            })
        } else {
            anyhow::Error::new(err)
        }
    }

    /// Pull a `message` field out of an error body when the upstream sends
    /// one; non-JSON bodies yield nothing.
    async fn upstream_message(response: reqwest::Response) -> Option<String> {
        let body: Value = response.json().await.ok()?;
        let message = body.get("message")?.as_str()?.trim();
        if message.is_empty() {
            None
        } else {
            Some(message.to_string())
        }
    }
}

/// Validate a JSON value against the Draft 7 schema generated for `T`.
fn validate_shape<T: JsonSchema>(value: &Value) -> Result<(), SchemaViolation> {
    let schema = schemars::gen::SchemaGenerator::default().into_root_schema_for::<T>();
    let schema_value = serde_json::to_value(schema)
        .map_err(|e| SchemaViolation::single("", format!("schema serialization failed: {e}")))?;

    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema_value)
        .map_err(|e| SchemaViolation::single("", format!("schema failed to compile: {e}")))?;

    if let Err(errors) = compiled.validate(value) {
        let issues: Vec<SchemaIssue> = errors
            .map(|e| SchemaIssue {
                path: e.instance_path.to_string(),
                detail: e.to_string(),
            })
            .collect();
        return Err(SchemaViolation { issues });
    }
    Ok(())
}
