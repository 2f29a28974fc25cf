//! # rpc-harness
//!
//! A comparison harness for five RPC/OpenAPI framework adapter styles (tRPC,
//! oRPC, Hono, Elysia, Elysia-typegen) exposing the same CRUD "User" resource
//! against an external demo data source.
//!
//! Every adapter is a thin, deliberately duplicated shell over one shared
//! [`users::UserService`], which proxies HTTP calls through a single
//! [`executor::RequestExecutor`]. The one piece of real logic, reused
//! identically by all five adapters, is the error-normalization boundary:
//! [`classify::classify`] maps any failure surfaced by the executor —
//! schema-validation failures, timeouts, HTTP error responses, anything else —
//! to exactly one [`classify::NormalizedError`] from a closed taxonomy.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rpc_harness::classify::classify;
//! use rpc_harness::executor::RequestExecutor;
//! use rpc_harness::users::UserService;
//!
//! #[tokio::main]
//! async fn main() {
//!     let executor = RequestExecutor::new("https://dummyjson.com").unwrap();
//!     let service = UserService::new(executor);
//!
//!     match service.get(1).await {
//!         Ok(user) => println!("{} {}", user.first_name, user.last_name),
//!         Err(failure) => {
//!             let err = classify(&failure);
//!             eprintln!("{}: {}", err.code, err.message);
//!         }
//!     }
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`classify`] | The error classifier: failure values in, normalized errors out |
//! | [`executor`] | Schema-validated HTTP request execution with timeout and retry |
//! | [`error`] | The failure shapes the executor surfaces |
//! | [`users`] | User model and the shared CRUD service |
//! | [`adapters`] | The five parallel framework adapter shells |

pub mod adapters;
pub mod classify;
pub mod error;
pub mod executor;
pub mod users;

/// Result type alias for the harness.
///
/// The error side is deliberately untyped: failures reaching the adapter layer
/// may originate from any of the underlying client layers, and the classifier
/// detects their shape structurally rather than through one closed enum.
pub type Result<T> = std::result::Result<T, anyhow::Error>;

// Re-export the core surface for convenience
pub use classify::{classify, ErrorCode, NormalizedError};
pub use executor::{Request, RequestExecutor, RetryPolicy};
pub use users::UserService;
