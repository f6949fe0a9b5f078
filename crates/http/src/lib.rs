//! # docsearch-http
//!
//! The HTTP surface of docsearch, built on axum.
//!
//! - `POST /upload/`: multipart upload of a UTF-8 text file (field `file`)
//! - `GET /search/?query=...`: ranked TF-IDF results
//! - `GET /health`: liveness plus database reachability
//!
//! [`build_router`] assembles the routes and middleware around an
//! [`AppState`]; [`start_server`] serves them until Ctrl+C or SIGTERM.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{HttpConfig, HttpDefaults};
pub use errors::{HttpError, HttpResult};
pub use logging::{init_logging, log_shutdown_info, log_startup_info, LoggingConfig};
pub use routes::build_router;
pub use server::{serve_with_shutdown, shutdown_signal, start_server};
pub use state::AppState;
