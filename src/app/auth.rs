//! Auth modal - credential entry overlay, one security scheme at a time

use tracing::{debug, info};

use crate::app::state::{AppState, PendingCall, PendingKind};
use crate::auth::{PasswordCredentials, TokenGrant};
use crate::discovery::SchemeKind;
use crate::error::AuthError;
use crate::messages::ui_events::{AuthField, AuthFocus};
use crate::messages::NetworkCommand;

/// Overlay state; the screen underneath is left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthModal {
    /// Declared scheme names, sorted
    pub schemes: Vec<String>,
    pub selected: usize,
    pub focus: AuthFocus,
    pub token: String,
    pub username: String,
    pub password: String,
    pub scope: String,
    pub error: Option<String>,
}

impl AuthModal {
    pub fn selected_scheme(&self) -> Option<&str> {
        self.schemes.get(self.selected).map(String::as_str)
    }

    fn field_mut(&mut self, field: AuthField) -> &mut String {
        match field {
            AuthField::Token => &mut self.token,
            AuthField::Username => &mut self.username,
            AuthField::Password => &mut self.password,
            AuthField::Scope => &mut self.scope,
        }
    }

    fn reset_form(&mut self) {
        self.token.clear();
        self.username.clear();
        self.password.clear();
        self.scope.clear();
        self.focus = AuthFocus::Schemes;
        self.error = None;
    }
}

impl AppState {
    pub fn open_auth(&mut self) {
        if self.auth.is_some() {
            return;
        }
        let schemes: Vec<String> = self.catalog.schemes().keys().cloned().collect();
        if schemes.is_empty() {
            self.error = Some("this API declares no security schemes".to_string());
            return;
        }

        // Start on a scheme the active endpoint asks for, if any
        let wanted = self
            .active_endpoint()
            .and_then(|e| e.security.iter().flat_map(|req| req.keys()).next())
            .and_then(|name| schemes.iter().position(|s| s == name))
            .unwrap_or(0);

        self.auth = Some(AuthModal {
            schemes,
            selected: wanted,
            ..AuthModal::default()
        });
        self.load_auth_form();
        debug!("auth modal opened");
    }

    pub fn close_auth(&mut self) {
        if self.auth.take().is_some() {
            debug!("auth modal closed");
        }
    }

    pub fn auth_move(&mut self, delta: isize) {
        let Some(modal) = self.auth.as_mut() else {
            return;
        };
        let last = modal.schemes.len().saturating_sub(1);
        modal.selected = modal.selected.saturating_add_signed(delta).min(last);
        self.load_auth_form();
    }

    /// Fill the form from what is stored for the selected scheme
    fn load_auth_form(&mut self) {
        let Some(modal) = self.auth.as_mut() else {
            return;
        };
        modal.reset_form();
        if let Some(entry) = modal.selected_scheme().and_then(|s| self.credentials.get(s)) {
            modal.token = entry.token.clone();
        }
    }

    /// Enter: start editing the selected scheme's form, or submit it
    pub fn auth_activate(&mut self) -> Option<NetworkCommand> {
        let modal = self.auth.as_mut()?;
        let name = modal.selected_scheme()?.to_string();
        let kind = self.catalog.scheme(&name).map(|s| s.kind.clone());

        match (modal.focus, kind) {
            (AuthFocus::Schemes, Some(SchemeKind::Bearer)) => {
                modal.focus = AuthFocus::Field(AuthField::Token);
                modal.error = None;
                None
            }
            (AuthFocus::Schemes, Some(SchemeKind::OAuth2 { token_url: Some(url), .. }))
                if !url.trim().is_empty() =>
            {
                modal.focus = AuthFocus::Field(AuthField::Username);
                modal.error = None;
                None
            }
            (AuthFocus::Field(_), Some(SchemeKind::Bearer)) => {
                let token = modal.token.trim().to_string();
                modal.token = token.clone();
                modal.focus = AuthFocus::Schemes;
                modal.error = None;
                self.credentials.set_manual(&name, &token);
                info!(scheme = %name, set = !token.is_empty(), "bearer token updated");
                None
            }
            (AuthFocus::Field(_), Some(SchemeKind::OAuth2 { token_url: Some(url), .. }))
                if !url.trim().is_empty() =>
            {
                let credentials = PasswordCredentials {
                    username: modal.username.trim().to_string(),
                    password: modal.password.clone(),
                    scope: modal.scope.trim().to_string(),
                };
                modal.error = None;
                let id = self.next_id();
                self.pending = Some(PendingCall {
                    id,
                    kind: PendingKind::Token {
                        scheme: name.clone(),
                    },
                    label: format!("Requesting token for {}", name),
                });
                Some(NetworkCommand::FetchToken {
                    id,
                    scheme: name,
                    token_url: url,
                    base_url: self.base_url.clone(),
                    credentials,
                })
            }
            _ => {
                modal.error = Some(AuthError::UnsupportedScheme.to_string());
                None
            }
        }
    }

    pub fn auth_char(&mut self, c: char) {
        if let Some(modal) = self.auth.as_mut() {
            if let AuthFocus::Field(field) = modal.focus {
                modal.field_mut(field).push(c);
            }
        }
    }

    pub fn auth_backspace(&mut self) {
        if let Some(modal) = self.auth.as_mut() {
            if let AuthFocus::Field(field) = modal.focus {
                modal.field_mut(field).pop();
            }
        }
    }

    pub fn auth_next_field(&mut self) {
        if let Some(modal) = self.auth.as_mut() {
            modal.focus = match modal.focus {
                AuthFocus::Field(AuthField::Username) => AuthFocus::Field(AuthField::Password),
                AuthFocus::Field(AuthField::Password) => AuthFocus::Field(AuthField::Scope),
                AuthFocus::Field(AuthField::Scope) => AuthFocus::Field(AuthField::Username),
                other => other,
            };
        }
    }

    /// Drop the stored credential of the selected scheme
    pub fn auth_clear(&mut self) {
        let Some(name) = self
            .auth
            .as_ref()
            .and_then(|m| m.selected_scheme())
            .map(String::from)
        else {
            return;
        };
        self.credentials.clear(&name);
        if let Some(modal) = self.auth.as_mut() {
            modal.reset_form();
        }
        info!(scheme = %name, "credential cleared");
    }

    pub(crate) fn token_issued(&mut self, scheme: &str, grant: TokenGrant) {
        let token = self.credentials.accept_grant(scheme, grant).token.clone();
        info!(scheme, "token acquired");
        if let Some(modal) = self.auth.as_mut() {
            if modal.selected_scheme() == Some(scheme) {
                modal.token = token;
                modal.password.clear();
                modal.focus = AuthFocus::Schemes;
                modal.error = None;
            }
        }
    }

    pub(crate) fn token_rejected(&mut self, message: String) {
        match self.auth.as_mut() {
            Some(modal) => modal.error = Some(message),
            None => self.error = Some(message),
        }
    }
}
