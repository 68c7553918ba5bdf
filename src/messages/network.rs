//! Network messages - communication between App and Network layers

use std::time::Duration;

use crate::auth::{PasswordCredentials, TokenGrant};
use crate::models::{ExecResult, RequestSpec};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Execute an assembled HTTP request
    Execute {
        id: u64,
        request: RequestSpec,
        timeout: Duration,
    },
    /// Run an OAuth2 password grant for a scheme
    FetchToken {
        id: u64,
        scheme: String,
        token_url: String,
        base_url: Option<String>,
        credentials: PasswordCredentials,
    },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// The server answered (any status)
    Completed { id: u64, result: ExecResult },
    /// Transport failure; no response was received
    Failed { id: u64, message: String },
    /// Token endpoint issued a token
    TokenIssued {
        id: u64,
        scheme: String,
        grant: TokenGrant,
    },
    /// Token acquisition failed
    TokenRejected {
        id: u64,
        scheme: String,
        message: String,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Completed { id, .. } => *id,
            NetworkResponse::Failed { id, .. } => *id,
            NetworkResponse::TokenIssued { id, .. } => *id,
            NetworkResponse::TokenRejected { id, .. } => *id,
        }
    }
}
