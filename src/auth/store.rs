//! In-memory credentials, keyed by security scheme name

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::discovery::Endpoint;

pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// A token accepted for one scheme
#[derive(Clone, Debug, PartialEq)]
pub struct CredentialEntry {
    pub scheme: String,
    pub token: String,
    pub token_type: String,
    pub acquired_at: DateTime<Utc>,
}

impl CredentialEntry {
    /// `Authorization` header value
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type.trim(), self.token.trim())
    }

    pub fn is_usable(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

/// Access token as returned by a token endpoint
#[derive(Clone, Debug, PartialEq)]
pub struct TokenGrant {
    pub access_token: String,
    pub token_type: Option<String>,
}

/// Credentials for the current session; nothing is persisted.
#[derive(Debug, Default)]
pub struct CredentialStore {
    entries: HashMap<String, CredentialEntry>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a hand-typed bearer token. A blank token clears the scheme.
    pub fn set_manual(&mut self, scheme: &str, token: &str) {
        let token = token.trim();
        if token.is_empty() {
            self.clear(scheme);
            return;
        }
        debug!(scheme, "manual token stored");
        self.entries.insert(
            scheme.to_string(),
            CredentialEntry {
                scheme: scheme.to_string(),
                token: token.to_string(),
                token_type: DEFAULT_TOKEN_TYPE.to_string(),
                acquired_at: Utc::now(),
            },
        );
    }

    /// Store a token issued by a token endpoint
    pub fn accept_grant(&mut self, scheme: &str, grant: TokenGrant) -> &CredentialEntry {
        debug!(scheme, "token grant stored");
        let entry = CredentialEntry {
            scheme: scheme.to_string(),
            token: grant.access_token.trim().to_string(),
            token_type: normalize_token_type(grant.token_type.as_deref()),
            acquired_at: Utc::now(),
        };
        self.entries.insert(scheme.to_string(), entry);
        &self.entries[scheme]
    }

    pub fn get(&self, scheme: &str) -> Option<&CredentialEntry> {
        self.entries.get(scheme)
    }

    pub fn is_set(&self, scheme: &str) -> bool {
        self.get(scheme).map(CredentialEntry::is_usable).unwrap_or(false)
    }

    pub fn clear(&mut self, scheme: &str) {
        if self.entries.remove(scheme).is_some() {
            debug!(scheme, "credential cleared");
        }
    }

    /// Headers satisfying the endpoint's security, or `None` when it needs
    /// none or no alternative is fully covered.
    ///
    /// Alternatives are tried in declaration order and the first one whose
    /// every scheme holds a token wins. All schemes write `Authorization`,
    /// so with several members the last (by name) is the one sent.
    pub fn headers_for(&self, endpoint: &Endpoint) -> Option<BTreeMap<String, String>> {
        endpoint.security.iter().find_map(|requirement| {
            let entries: Option<Vec<&CredentialEntry>> = requirement
                .keys()
                .map(|scheme| self.get(scheme).filter(|e| e.is_usable()))
                .collect();
            entries.map(|entries| {
                entries
                    .into_iter()
                    .map(|e| ("Authorization".to_string(), e.authorization()))
                    .collect()
            })
        })
    }
}

/// Blank or any-case "bearer" becomes "Bearer"; anything else is kept.
pub fn normalize_token_type(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        None | Some("") => DEFAULT_TOKEN_TYPE.to_string(),
        Some(t) if t.eq_ignore_ascii_case("bearer") => DEFAULT_TOKEN_TYPE.to_string(),
        Some(t) => t.to_string(),
    }
}
