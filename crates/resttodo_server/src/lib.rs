//! HTTP transport for the todo service.
//!
//! Exposes `resttodo_core` use-cases as JSON endpoints under `/api/todos`
//! and serves the static landing page at `/`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod payload;
pub mod server;
pub mod storage;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use error::{ApiError, ServerError};
pub use server::{build_router, AppState, Server};
pub use storage::Storage;
