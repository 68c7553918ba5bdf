//! Session state - plain data mutated only by the App actor's handlers

use std::collections::HashMap;

use crate::app::auth::AuthModal;
use crate::auth::CredentialStore;
use crate::catalog::Catalog;
use crate::curl::to_curl;
use crate::discovery::{Endpoint, SchemeKind};
use crate::messages::render::{
    AuthForm, AuthStatus, AuthView, BuilderView, EditView, EndpointRow, FieldRow, PaneView,
    ResponseView, SchemeRow,
};
use crate::messages::ui_events::{Pane, Screen};
use crate::messages::RenderState;
use crate::models::{ExecResult, RequestSpec};

/// Single-line text input with a byte cursor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineInput {
    pub buffer: String,
    pub cursor: usize,
}

impl LineInput {
    pub fn new(text: impl Into<String>) -> Self {
        let buffer = text.into();
        let cursor = buffer.len();
        LineInput { buffer, cursor }
    }

    pub fn insert(&mut self, c: char) {
        if self.cursor <= self.buffer.len() {
            self.buffer.insert(self.cursor, c);
            self.cursor += c.len_utf8();
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.buffer[..self.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.buffer.remove(prev);
            self.cursor = prev;
        }
    }

    pub fn left(&mut self) {
        if let Some((i, _)) = self.buffer[..self.cursor].char_indices().last() {
            self.cursor = i;
        }
    }

    pub fn right(&mut self) {
        if let Some(c) = self.buffer[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.buffer.len();
    }
}

/// An in-progress edit of one path/query/body value
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEdit {
    pub pane: Pane,
    pub name: String,
    pub input: LineInput,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PendingKind {
    /// First dispatch from the builder; the request is stored on success
    Execute(RequestSpec),
    /// Re-dispatch of the stored request
    Rerun,
    /// Password grant for a scheme
    Token { scheme: String },
}

/// The one network call allowed in flight
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCall {
    pub id: u64,
    pub kind: PendingKind,
    pub label: String,
}

/// Application state
#[derive(Debug)]
pub struct AppState {
    pub catalog: Catalog,
    pub base_url: Option<String>,
    pub credentials: CredentialStore,

    pub screen: Screen,

    // Endpoint list
    pub filter: String,
    pub filtered: Vec<usize>,
    pub selected: usize,

    // Builder
    pub active: Option<usize>,
    pub path_values: HashMap<String, String>,
    pub query_values: HashMap<String, String>,
    pub body_values: HashMap<String, String>,
    /// Literal JSON that replaces the field-built body
    pub raw_body: Option<String>,
    pub pane: Pane,
    pub row: usize,
    pub edit: Option<FieldEdit>,

    // Overlay
    pub auth: Option<AuthModal>,

    // Calls
    pub pending: Option<PendingCall>,
    pub last_request: Option<RequestSpec>,
    pub last_response: Option<ExecResult>,
    pub response_scroll: u16,
    pub show_curl: bool,
    /// Set from the editor request until its outcome arrives
    pub editor_pending: bool,

    pub error: Option<String>,
    pub show_help: bool,

    next_request_id: u64,
}

impl AppState {
    pub fn new(catalog: Catalog, base_url: Option<String>) -> Self {
        let filtered = catalog.filter("");
        AppState {
            catalog,
            base_url,
            credentials: CredentialStore::new(),
            screen: Screen::EndpointList,
            filter: String::new(),
            filtered,
            selected: 0,
            active: None,
            path_values: HashMap::new(),
            query_values: HashMap::new(),
            body_values: HashMap::new(),
            raw_body: None,
            pane: Pane::Path,
            row: 0,
            edit: None,
            auth: None,
            pending: None,
            last_request: None,
            last_response: None,
            response_scroll: 0,
            show_curl: false,
            editor_pending: false,
            error: None,
            show_help: false,
            next_request_id: 1,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn active_endpoint(&self) -> Option<&Endpoint> {
        self.active.and_then(|i| self.catalog.get(i))
    }

    /// Panes with something in them, in cycle order. Never empty: with no
    /// parameters and no body the Path pane stands alone.
    pub fn available_panes(&self) -> Vec<Pane> {
        let Some(endpoint) = self.active_endpoint() else {
            return vec![Pane::Path];
        };
        let mut panes = Vec::new();
        if !endpoint.path_params.is_empty() {
            panes.push(Pane::Path);
        }
        if !endpoint.query_params.is_empty() {
            panes.push(Pane::Query);
        }
        if endpoint.body.is_some() {
            panes.push(Pane::Body);
        }
        if panes.is_empty() {
            panes.push(Pane::Path);
        }
        panes
    }

    /// Names of the editable rows of a pane
    pub fn pane_rows(&self, pane: Pane) -> Vec<String> {
        let Some(endpoint) = self.active_endpoint() else {
            return Vec::new();
        };
        match pane {
            Pane::Path => endpoint.path_params.iter().map(|p| p.name.clone()).collect(),
            Pane::Query => endpoint.query_params.iter().map(|p| p.name.clone()).collect(),
            Pane::Body => endpoint.body_fields().iter().map(|f| f.name.clone()).collect(),
        }
    }

    /// Name of the row under the cursor
    pub fn current_row(&self) -> Option<String> {
        self.pane_rows(self.pane).into_iter().nth(self.row)
    }

    pub fn values(&self, pane: Pane) -> &HashMap<String, String> {
        match pane {
            Pane::Path => &self.path_values,
            Pane::Query => &self.query_values,
            Pane::Body => &self.body_values,
        }
    }

    pub fn values_mut(&mut self, pane: Pane) -> &mut HashMap<String, String> {
        match pane {
            Pane::Path => &mut self.path_values,
            Pane::Query => &mut self.query_values,
            Pane::Body => &mut self.body_values,
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let endpoints = self
            .filtered
            .iter()
            .filter_map(|&i| self.catalog.get(i))
            .map(|e| EndpointRow {
                method: e.method,
                path: e.path.clone(),
                label: e.label().map(String::from),
                secured: e.requires_auth(),
            })
            .collect();

        RenderState {
            screen: self.screen,
            api_title: self.api_title(),
            base_url: self.base_url.clone(),
            filter: self.filter.clone(),
            endpoints,
            selected: self.selected,
            total_endpoints: self.catalog.len(),
            builder: self.builder_view(),
            edit: self.edit_view(),
            response: self.response_view(),
            response_scroll: self.response_scroll,
            auth: self.auth_view(),
            error: self.error.clone(),
            busy: self.pending.as_ref().map(|p| p.label.clone()),
            editor_pending: self.editor_pending,
            show_help: self.show_help,
        }
    }

    fn api_title(&self) -> String {
        match (&self.catalog.title, &self.catalog.version) {
            (Some(title), Some(version)) => format!("{} {}", title, version),
            (Some(title), None) => title.clone(),
            _ => crate::constants::APP_NAME.to_string(),
        }
    }

    fn builder_view(&self) -> Option<BuilderView> {
        let endpoint = self.active_endpoint()?;

        let panes = self
            .available_panes()
            .into_iter()
            .map(|pane| self.pane_view(endpoint, pane))
            .collect();

        let auth_status = if !endpoint.requires_auth() {
            AuthStatus::NotRequired
        } else if self.credentials.headers_for(endpoint).is_some() {
            AuthStatus::Satisfied
        } else {
            AuthStatus::Missing
        };

        Some(BuilderView {
            method: endpoint.method,
            path: endpoint.path.clone(),
            label: endpoint.label().map(String::from),
            panes,
            active_pane: self.pane,
            row: self.row,
            raw_body: self.raw_body.clone(),
            auth_status,
        })
    }

    fn pane_view(&self, endpoint: &Endpoint, pane: Pane) -> PaneView {
        let values = self.values(pane);

        let rows: Vec<FieldRow> = match pane {
            Pane::Path | Pane::Query => {
                let params = if pane == Pane::Path {
                    &endpoint.path_params
                } else {
                    &endpoint.query_params
                };
                params
                    .iter()
                    .map(|p| {
                        field_row(
                            values,
                            &p.name,
                            p.required,
                            p.param_type.as_str(),
                            p.default.as_ref(),
                            p.example.as_ref(),
                            &p.enum_values,
                        )
                    })
                    .collect()
            }
            Pane::Body => endpoint
                .body_fields()
                .iter()
                .map(|f| {
                    field_row(
                        values,
                        &f.name,
                        f.required,
                        f.field_type.as_str(),
                        f.default.as_ref(),
                        f.example.as_ref(),
                        &f.enum_values,
                    )
                })
                .collect(),
        };

        let note = match (pane, &endpoint.body) {
            (Pane::Body, Some(body)) if !body.supported => {
                Some("schema too complex for fields; press e to edit raw JSON".to_string())
            }
            (Pane::Body, Some(_)) if rows.is_empty() => Some("(empty object)".to_string()),
            _ if rows.is_empty() => Some("(none)".to_string()),
            _ => None,
        };

        PaneView { pane, rows, note }
    }

    fn edit_view(&self) -> Option<EditView> {
        let edit = self.edit.as_ref()?;
        let endpoint = self.active_endpoint()?;
        let hint = match edit.pane {
            Pane::Path => endpoint.path_params.iter().find(|p| p.name == edit.name).and_then(|p| {
                placeholder(p.default.as_ref(), p.example.as_ref(), &p.enum_values)
            }),
            Pane::Query => endpoint.query_params.iter().find(|p| p.name == edit.name).and_then(|p| {
                placeholder(p.default.as_ref(), p.example.as_ref(), &p.enum_values)
            }),
            Pane::Body => endpoint.body_fields().iter().find(|f| f.name == edit.name).and_then(|f| {
                placeholder(f.default.as_ref(), f.example.as_ref(), &f.enum_values)
            }),
        };
        Some(EditView {
            title: format!("{} {}", edit.pane.title(), edit.name),
            buffer: edit.input.buffer.clone(),
            cursor: edit.input.cursor,
            hint,
        })
    }

    fn response_view(&self) -> Option<ResponseView> {
        let result = self.last_response.as_ref()?;
        let request = self.last_request.as_ref();
        Some(ResponseView {
            request_line: request
                .map(|r| format!("{} {}", r.method.as_str(), r.url))
                .unwrap_or_default(),
            status: result.status,
            status_line: result.status_line(),
            elapsed_ms: result.elapsed.as_millis(),
            content_type: result.content_type().map(String::from),
            body: result.body.clone(),
            curl: if self.show_curl { request.map(to_curl) } else { None },
        })
    }

    fn auth_view(&self) -> Option<AuthView> {
        let modal = self.auth.as_ref()?;
        let schemes = modal
            .schemes
            .iter()
            .map(|name| SchemeRow {
                name: name.clone(),
                type_label: self
                    .catalog
                    .scheme(name)
                    .map(|s| s.type_label().to_string())
                    .unwrap_or_default(),
                is_set: self.credentials.is_set(name),
            })
            .collect();

        let scheme = modal.selected_scheme().and_then(|name| self.catalog.scheme(name));
        let form = match scheme.map(|s| &s.kind) {
            Some(SchemeKind::Bearer) => AuthForm::Bearer {
                token: modal.token.clone(),
            },
            Some(SchemeKind::OAuth2 {
                token_url: Some(token_url),
                scopes,
            }) if !token_url.trim().is_empty() => AuthForm::Password {
                token_url: token_url.clone(),
                username: modal.username.clone(),
                password_len: modal.password.chars().count(),
                scope: modal.scope.clone(),
                scopes: scopes.keys().cloned().collect(),
            },
            Some(SchemeKind::OAuth2 { .. }) => AuthForm::Unsupported {
                reason: "oauth2 scheme declares no password flow".to_string(),
            },
            Some(SchemeKind::Unsupported(label)) => AuthForm::Unsupported {
                reason: format!("{} schemes are not supported", label),
            },
            None => AuthForm::Unsupported {
                reason: "unknown scheme".to_string(),
            },
        };

        Some(AuthView {
            schemes,
            selected: modal.selected,
            focus: modal.focus,
            description: scheme.and_then(|s| s.description.clone()),
            form,
            error: modal.error.clone(),
        })
    }
}

fn field_row(
    values: &HashMap<String, String>,
    name: &str,
    required: bool,
    type_label: &'static str,
    default: Option<&String>,
    example: Option<&String>,
    enums: &[String],
) -> FieldRow {
    FieldRow {
        name: name.to_string(),
        required,
        type_label,
        value: values.get(name).cloned(),
        hint: placeholder(default, example, enums),
    }
}

/// Visual placeholder for an empty value
fn placeholder(default: Option<&String>, example: Option<&String>, enums: &[String]) -> Option<String> {
    if let Some(default) = default {
        return Some(format!("default: {}", default));
    }
    if let Some(example) = example {
        return Some(format!("e.g. {}", example));
    }
    if !enums.is_empty() {
        return Some(format!("one of: {}", enums.join(" | ")));
    }
    None
}
