//! OAuth2 resource-owner password grant

use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::auth::store::TokenGrant;
use crate::error::{AuthError, TransportError};

/// Longest error body kept for display
const MAX_ERROR_BODY: usize = 200;

/// What the user typed into the password form
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PasswordCredentials {
    pub username: String,
    pub password: String,
    pub scope: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    token_type: Option<String>,
}

/// Absolute http(s) URLs are used as-is; anything else is joined to the base URL.
pub fn resolve_token_url(base_url: Option<&str>, token_url: &str) -> Result<String, AuthError> {
    let token_url = token_url.trim();
    if token_url.starts_with("http://") || token_url.starts_with("https://") {
        return Ok(token_url.to_string());
    }
    let base = base_url
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .ok_or_else(|| AuthError::MissingBaseUrl(token_url.to_string()))?;
    Ok(format!(
        "{}/{}",
        base.trim_end_matches('/'),
        token_url.trim_start_matches('/')
    ))
}

/// Exchange username and password for an access token
pub async fn request_token(
    client: &reqwest::Client,
    base_url: Option<&str>,
    token_url: &str,
    credentials: &PasswordCredentials,
    timeout: Duration,
) -> Result<TokenGrant, AuthError> {
    let url = resolve_token_url(base_url, token_url)?;

    let mut form = vec![
        ("grant_type", "password"),
        ("username", credentials.username.as_str()),
        ("password", credentials.password.as_str()),
    ];
    let scope = credentials.scope.trim();
    if !scope.is_empty() {
        form.push(("scope", scope));
    }

    debug!(url = %url, "requesting password grant");
    let resp = client
        .post(&url)
        .header(ACCEPT, "application/json")
        .form(&form)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| TransportError::from_reqwest(e, timeout))?;

    let status = resp.status();
    let text = resp.text().await.map_err(|e| {
        if e.is_timeout() {
            TransportError::Timeout(timeout)
        } else {
            TransportError::ReadBody(e)
        }
    })?;
    if !status.is_success() {
        warn!(url = %url, status = status.as_u16(), "token endpoint rejected credentials");
        return Err(AuthError::Rejected {
            status: status.as_u16(),
            body: truncate(text.trim(), MAX_ERROR_BODY),
        });
    }

    let parsed: TokenResponse = serde_json::from_str(&text).map_err(AuthError::Malformed)?;
    let access_token = parsed
        .access_token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingAccessToken)?;

    Ok(TokenGrant {
        access_token,
        token_type: parsed.token_type,
    })
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max).collect::<String>())
    }
}
