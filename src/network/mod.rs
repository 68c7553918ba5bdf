//! Network layer - HTTP request execution and token exchange
//!
//! The Network actor receives commands and sends back responses.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
pub use client::{create_client, execute};
