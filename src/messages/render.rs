//! Render state - data structure sent from App layer to UI for rendering

use crate::messages::ui_events::{AuthFocus, KeyContext, Pane, Screen};
use crate::models::HttpMethod;

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub screen: Screen,

    // Header line
    pub api_title: String,
    pub base_url: Option<String>,

    // Endpoint list
    pub filter: String,
    pub endpoints: Vec<EndpointRow>,
    pub selected: usize,
    pub total_endpoints: usize,

    // Builder
    pub builder: Option<BuilderView>,
    pub edit: Option<EditView>,

    // Response
    pub response: Option<ResponseView>,
    pub response_scroll: u16,

    // Auth modal
    pub auth: Option<AuthView>,

    // Status
    pub error: Option<String>,
    /// Label of the call in flight
    pub busy: Option<String>,
    /// The external editor owns the terminal
    pub editor_pending: bool,

    // Popups
    pub show_help: bool,
}

impl RenderState {
    pub fn key_context(&self) -> KeyContext {
        KeyContext {
            screen: self.screen,
            editing: self.edit.is_some(),
            auth: self.auth.as_ref().map(|a| a.focus),
            show_help: self.show_help,
            busy: self.busy.is_some(),
            editor_pending: self.editor_pending,
        }
    }
}

/// One line of the endpoint list
#[derive(Debug, Clone)]
pub struct EndpointRow {
    pub method: HttpMethod,
    pub path: String,
    pub label: Option<String>,
    pub secured: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    NotRequired,
    Satisfied,
    Missing,
}

/// The builder screen for the active endpoint
#[derive(Debug, Clone)]
pub struct BuilderView {
    pub method: HttpMethod,
    pub path: String,
    pub label: Option<String>,
    pub panes: Vec<PaneView>,
    pub active_pane: Pane,
    pub row: usize,
    pub raw_body: Option<String>,
    pub auth_status: AuthStatus,
}

#[derive(Debug, Clone)]
pub struct PaneView {
    pub pane: Pane,
    pub rows: Vec<FieldRow>,
    /// Shown instead of (or below) the rows, e.g. "(none)"
    pub note: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FieldRow {
    pub name: String,
    pub required: bool,
    pub type_label: &'static str,
    pub value: Option<String>,
    /// Placeholder drawn when no value is set: default, example or enum
    pub hint: Option<String>,
}

/// The field edit popup
#[derive(Debug, Clone)]
pub struct EditView {
    pub title: String,
    pub buffer: String,
    pub cursor: usize,
    pub hint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResponseView {
    pub request_line: String,
    pub status: u16,
    pub status_line: String,
    pub elapsed_ms: u128,
    pub content_type: Option<String>,
    pub body: String,
    /// cURL rendering of the sent request, when toggled on
    pub curl: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SchemeRow {
    pub name: String,
    pub type_label: String,
    pub is_set: bool,
}

/// Form for the selected scheme
#[derive(Debug, Clone, PartialEq)]
pub enum AuthForm {
    Bearer {
        token: String,
    },
    Password {
        token_url: String,
        username: String,
        password_len: usize,
        scope: String,
        scopes: Vec<String>,
    },
    Unsupported {
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AuthView {
    pub schemes: Vec<SchemeRow>,
    pub selected: usize,
    pub focus: AuthFocus,
    pub description: Option<String>,
    pub form: AuthForm,
    pub error: Option<String>,
}
