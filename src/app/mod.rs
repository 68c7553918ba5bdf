//! App layer - central state management and command processing
//!
//! The App actor receives UI events and network responses,
//! updates state, and emits network commands, editor requests and render state.

pub mod actor;
pub mod auth;
pub mod commands;
pub mod state;

pub use actor::AppActor;
pub use auth::AuthModal;
pub use state::AppState;
