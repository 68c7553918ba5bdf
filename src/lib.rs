//! # specdeck
//!
//! A terminal client for HTTP APIs described by an OpenAPI (or Swagger 2)
//! document.
//!
//! ## Features
//! - Endpoint catalog with fuzzy filtering
//! - Path, query and body value entry with type checks
//! - Raw JSON bodies through `$EDITOR`
//! - Bearer tokens and OAuth2 password grant, stored per security scheme
//! - Response view with JSON highlighting, re-run and cURL export
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod curl;
pub mod discovery;
pub mod editor;
pub mod error;
pub mod fuzzy;
pub mod messages;
pub mod models;
pub mod network;
pub mod request;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use catalog::Catalog;
pub use curl::to_curl;
pub use discovery::{Endpoint, SecurityScheme, SpecSource};
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{ExecResult, HttpMethod, RequestSpec};
pub use network::NetworkActor;
pub use request::build_request;
