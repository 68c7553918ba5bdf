//! Network actor - runs HTTP calls and token exchanges in the Tokio runtime

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::auth::password_grant;
use crate::constants::TOKEN_TIMEOUT;
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::execute;

/// Network actor that processes request and token commands
pub struct NetworkActor {
    client: reqwest::Client,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(client: reqwest::Client, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                // Handle incoming commands
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Execute { id, request, timeout }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            self.active_requests.spawn(async move {
                                tracing::info!(id, url = %request.url, method = ?request.method, "Executing request");
                                let response = match execute(&client, &request, timeout).await {
                                    Ok(result) => {
                                        tracing::info!(id, status = result.status, "Request completed");
                                        NetworkResponse::Completed { id, result }
                                    }
                                    Err(e) => {
                                        tracing::warn!(id, error = %e, "Request failed");
                                        NetworkResponse::Failed { id, message: e.to_string() }
                                    }
                                };
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(NetworkCommand::FetchToken { id, scheme, token_url, base_url, credentials }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            self.active_requests.spawn(async move {
                                tracing::info!(id, scheme = %scheme, "Requesting password grant");
                                let response = match password_grant::request_token(
                                    &client,
                                    base_url.as_deref(),
                                    &token_url,
                                    &credentials,
                                    TOKEN_TIMEOUT,
                                ).await {
                                    Ok(grant) => NetworkResponse::TokenIssued { id, scheme, grant },
                                    Err(e) => NetworkResponse::TokenRejected { id, scheme, message: e.to_string() },
                                };
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(NetworkCommand::Shutdown) | None => {
                            self.active_requests.abort_all();
                            break;
                        }
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}
