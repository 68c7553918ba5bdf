//! State transitions - one method per user intent

use tracing::{debug, info, warn};

use crate::app::state::{AppState, FieldEdit, LineInput, PendingCall, PendingKind};
use crate::constants::EXECUTE_TIMEOUT;
use crate::editor::{self, EditorOutcome, EditorRequest};
use crate::messages::ui_events::{Pane, Screen};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::request::build_request;

/// Lines moved by PageUp/PageDown
const PAGE: u16 = 10;

impl AppState {
    // ========================
    // Endpoint list
    // ========================

    pub fn filter_char(&mut self, c: char) {
        self.filter.push(c);
        self.refilter();
    }

    pub fn filter_backspace(&mut self) {
        self.filter.pop();
        self.refilter();
    }

    fn refilter(&mut self) {
        self.filtered = self.catalog.filter(&self.filter);
        if self.selected >= self.filtered.len() {
            self.selected = 0;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.filtered.len() {
            self.selected += 1;
        }
    }

    /// Make the highlighted endpoint active. The only place value maps are reset.
    pub fn open_endpoint(&mut self) {
        let Some(&index) = self.filtered.get(self.selected) else {
            return;
        };
        self.active = Some(index);
        self.path_values.clear();
        self.query_values.clear();
        self.body_values.clear();
        self.raw_body = None;
        self.edit = None;
        self.pane = Pane::Path;
        self.row = 0;
        self.ensure_pane_available();
        self.error = None;
        self.screen = Screen::Builder;
        if let Some(endpoint) = self.active_endpoint() {
            debug!(method = endpoint.method.as_str(), path = %endpoint.path, "endpoint opened");
        }
    }

    // ========================
    // Builder navigation
    // ========================

    fn ensure_pane_available(&mut self) {
        let panes = self.available_panes();
        if !panes.contains(&self.pane) {
            self.pane = panes.first().copied().unwrap_or_default();
            self.row = 0;
        }
    }

    /// Path -> Query -> Body -> Path, skipping empty panes
    pub fn next_pane(&mut self) {
        let panes = self.available_panes();
        let current = panes.iter().position(|p| *p == self.pane).unwrap_or(0);
        self.pane = panes[(current + 1) % panes.len()];
        self.row = 0;
    }

    pub fn row_up(&mut self) {
        self.row = self.row.saturating_sub(1);
    }

    pub fn row_down(&mut self) {
        if self.row + 1 < self.pane_rows(self.pane).len() {
            self.row += 1;
        }
    }

    // ========================
    // Field editing
    // ========================

    /// Open the edit popup pre-filled with the stored value only
    pub fn begin_edit(&mut self) {
        if self.screen != Screen::Builder {
            return;
        }
        let Some(name) = self.current_row() else {
            return;
        };
        let value = self.values(self.pane).get(&name).cloned().unwrap_or_default();
        self.edit = Some(FieldEdit {
            pane: self.pane,
            name,
            input: LineInput::new(value),
        });
    }

    pub fn edit_input(&mut self) -> Option<&mut LineInput> {
        self.edit.as_mut().map(|e| &mut e.input)
    }

    /// Store the trimmed buffer; an empty string is stored too
    pub fn confirm_edit(&mut self) {
        if let Some(edit) = self.edit.take() {
            let value = edit.input.buffer.trim().to_string();
            debug!(pane = edit.pane.title(), name = %edit.name, "value set");
            self.values_mut(edit.pane).insert(edit.name, value);
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Forget the value under the cursor; on the Body pane also drop the raw JSON
    pub fn reset_field(&mut self) {
        if self.screen != Screen::Builder {
            return;
        }
        if let Some(name) = self.current_row() {
            self.values_mut(self.pane).remove(&name);
        }
        if self.pane == Pane::Body {
            self.raw_body = None;
        }
    }

    // ========================
    // External editor
    // ========================

    /// Phase one of the editor round-trip: the seed to open, if the Body
    /// pane of an endpoint with a body is focused.
    pub fn request_body_editor(&mut self) -> Option<EditorRequest> {
        if self.editor_pending || self.is_busy() {
            return None;
        }
        if self.screen != Screen::Builder || self.pane != Pane::Body {
            return None;
        }
        let endpoint = self.active_endpoint()?;
        endpoint.body.as_ref()?;
        let request = EditorRequest {
            seed: editor::seed_body(endpoint, &self.body_values, self.raw_body.as_deref()),
        };
        self.editor_pending = true;
        Some(request)
    }

    /// Phase three: apply what the editor produced
    pub fn resume_from_editor(&mut self, outcome: EditorOutcome) {
        self.editor_pending = false;
        let EditorOutcome { content, failure } = outcome;
        let Some(content) = content else {
            self.error = failure;
            return;
        };
        match editor::parse_edited_body(&content) {
            Ok(raw) => {
                debug!(raw_set = raw.is_some(), "editor body applied");
                self.raw_body = raw;
                self.error = failure.map(|f| format!("{}; saved content applied", f));
            }
            Err(e) => {
                self.error = Some(match failure {
                    Some(f) => format!("{}; {}", f, e),
                    None => e.to_string(),
                });
            }
        }
    }

    // ========================
    // Execution
    // ========================

    /// Assemble the request and hand it to the network layer
    pub fn execute_request(&mut self) -> Option<NetworkCommand> {
        if self.screen != Screen::Builder || self.edit.is_some() || self.is_busy() || self.editor_pending {
            return None;
        }
        let endpoint = self.active.and_then(|i| self.catalog.get(i))?;
        let Some(base_url) = self.base_url.as_deref() else {
            self.error = Some("base URL unknown; restart with --base-url".to_string());
            return None;
        };

        let built = build_request(
            base_url,
            endpoint,
            &self.path_values,
            &self.query_values,
            &self.body_values,
            self.raw_body.as_deref(),
        );
        let mut request = match built {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "request rejected");
                self.error = Some(e.to_string());
                return None;
            }
        };

        match self.credentials.headers_for(endpoint) {
            Some(auth) => request.headers.extend(auth),
            None if endpoint.requires_auth() => {
                debug!(path = %endpoint.path, "no credentials satisfy endpoint security")
            }
            None => {}
        }

        let id = self.next_id();
        let label = format!("{} {}", request.method.as_str(), request.url);
        info!(id, request = %label, "dispatching");
        self.error = None;
        self.pending = Some(PendingCall {
            id,
            kind: PendingKind::Execute(request.clone()),
            label,
        });
        Some(NetworkCommand::Execute {
            id,
            request,
            timeout: EXECUTE_TIMEOUT,
        })
    }

    /// Send the stored request again, unchanged
    pub fn rerun(&mut self) -> Option<NetworkCommand> {
        if self.screen != Screen::Response || self.is_busy() {
            return None;
        }
        let request = self.last_request.clone()?;
        let id = self.next_id();
        let label = format!("{} {}", request.method.as_str(), request.url);
        info!(id, request = %label, "re-running");
        self.pending = Some(PendingCall {
            id,
            kind: PendingKind::Rerun,
            label,
        });
        Some(NetworkCommand::Execute {
            id,
            request,
            timeout: EXECUTE_TIMEOUT,
        })
    }

    /// Handle a response from the network layer
    pub fn handle_response(&mut self, response: NetworkResponse) {
        if self.pending.as_ref().map(|p| p.id) != Some(response.id()) {
            warn!(id = response.id(), "dropping response for unknown request");
            return;
        }
        let Some(pending) = self.pending.take() else {
            return;
        };

        match (pending.kind, response) {
            (PendingKind::Execute(request), NetworkResponse::Completed { result, .. }) => {
                self.last_request = Some(request);
                self.last_response = Some(result);
                self.screen = Screen::Response;
                self.response_scroll = 0;
                self.show_curl = false;
                self.error = None;
            }
            (PendingKind::Rerun, NetworkResponse::Completed { result, .. }) => {
                self.last_response = Some(result);
                self.response_scroll = 0;
                self.error = None;
            }
            (PendingKind::Execute(_) | PendingKind::Rerun, NetworkResponse::Failed { message, .. }) => {
                self.error = Some(message);
            }
            (PendingKind::Token { scheme }, NetworkResponse::TokenIssued { grant, .. }) => {
                self.token_issued(&scheme, grant);
            }
            (PendingKind::Token { .. }, NetworkResponse::TokenRejected { message, .. }) => {
                self.token_rejected(message);
            }
            (kind, response) => {
                warn!(?kind, ?response, "response does not match pending call");
            }
        }
    }

    // ========================
    // Navigation
    // ========================

    /// Esc: one step back. Open popups close first.
    pub fn back(&mut self) {
        if self.edit.take().is_some() {
            return;
        }
        if self.auth.is_some() {
            self.close_auth();
            return;
        }
        match self.screen {
            Screen::EndpointList => {}
            Screen::Builder => self.screen = Screen::EndpointList,
            Screen::Response => {
                self.screen = Screen::Builder;
                self.show_curl = false;
            }
        }
        self.error = None;
    }

    /// Enter on the response: straight back to the list
    pub fn back_to_list(&mut self) {
        self.screen = Screen::EndpointList;
        self.show_curl = false;
        self.error = None;
    }

    // ========================
    // Response scrolling
    // ========================

    fn max_scroll(&self) -> u16 {
        let lines = match (&self.last_response, &self.last_request) {
            (Some(_), Some(request)) if self.show_curl => crate::curl::to_curl(request).lines().count(),
            (Some(result), _) => result.body.lines().count(),
            _ => 0,
        };
        u16::try_from(lines.saturating_sub(1)).unwrap_or(u16::MAX)
    }

    pub fn scroll_up(&mut self) {
        self.response_scroll = self.response_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.response_scroll = self.response_scroll.saturating_add(1).min(self.max_scroll());
    }

    pub fn page_up(&mut self) {
        self.response_scroll = self.response_scroll.saturating_sub(PAGE);
    }

    pub fn page_down(&mut self) {
        self.response_scroll = self.response_scroll.saturating_add(PAGE).min(self.max_scroll());
    }

    pub fn toggle_curl(&mut self) {
        self.show_curl = !self.show_curl;
        self.response_scroll = 0;
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::discovery::{
        BodyField, BodySchema, Endpoint, Param, ParamLocation, ParamType, SchemeKind,
        SecurityScheme,
    };
    use crate::models::{ExecResult, HttpMethod, RequestSpec};
    use std::collections::BTreeMap;
    use std::time::Duration;

    /// 0: GET /users/{id} (bearerAuth), 1: POST /users, 2: GET /health
    fn users_state(base_url: Option<&str>) -> AppState {
        let mut get = Endpoint::new(HttpMethod::GET, "/users/{id}");
        get.summary = Some("Get user".into());
        get.path_params = vec![Param::new("id", ParamLocation::Path, ParamType::String)];
        get.query_params = vec![Param::new("verbose", ParamLocation::Query, ParamType::Boolean)];
        get.security = vec![[("bearerAuth".to_string(), Vec::new())].into_iter().collect()];

        let mut post = Endpoint::new(HttpMethod::POST, "/users");
        post.summary = Some("Create user".into());
        let mut name = BodyField::new("name", ParamType::String);
        name.required = true;
        post.body = Some(BodySchema {
            supported: true,
            fields: vec![name, BodyField::new("age", ParamType::Integer)],
        });

        let health = Endpoint::new(HttpMethod::GET, "/health");

        let schemes: BTreeMap<String, SecurityScheme> = [(
            "bearerAuth".to_string(),
            SecurityScheme {
                name: "bearerAuth".into(),
                kind: SchemeKind::Bearer,
                description: None,
                bearer_format: None,
            },
        )]
        .into_iter()
        .collect();

        AppState::new(
            Catalog::new(vec![get, post, health], schemes),
            base_url.map(String::from),
        )
    }

    fn open(state: &mut AppState, index: usize) {
        state.selected = state.filtered.iter().position(|&i| i == index).unwrap();
        state.open_endpoint();
    }

    fn set_value(state: &mut AppState, text: &str) {
        state.begin_edit();
        let input = state.edit_input().unwrap();
        input.end();
        for c in text.chars() {
            input.insert(c);
        }
        state.confirm_edit();
    }

    fn ok_result(body: &str) -> ExecResult {
        ExecResult {
            status: 200,
            reason: "OK".into(),
            elapsed: Duration::from_millis(12),
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    #[test]
    fn filter_narrows_and_resets_selection() {
        let mut state = users_state(None);
        state.selected = 2;
        for c in "get u".chars() {
            state.filter_char(c);
        }
        assert_eq!(state.filtered, vec![0]);
        assert_eq!(state.selected, 0);

        state.filter.clear();
        state.filter_char('x');
        state.filter_char('y');
        state.filter_char('z');
        assert!(state.filtered.is_empty());
        state.open_endpoint();
        assert_eq!(state.screen, Screen::EndpointList);

        for _ in 0..3 {
            state.filter_backspace();
        }
        assert_eq!(state.filtered, vec![0, 1, 2]);
    }

    #[test]
    fn reopening_an_endpoint_clears_values() {
        let mut state = users_state(Some("http://localhost"));
        open(&mut state, 0);
        set_value(&mut state, "42");
        assert_eq!(state.path_values.get("id").map(String::as_str), Some("42"));

        state.back();
        assert_eq!(state.screen, Screen::EndpointList);
        open(&mut state, 0);
        assert!(state.path_values.is_empty());
        assert!(state.raw_body.is_none());
    }

    #[test]
    fn edit_prefills_stored_value_and_cancel_discards() {
        let mut state = users_state(None);
        open(&mut state, 0);
        set_value(&mut state, "  7 ");
        assert_eq!(state.path_values["id"], "7");

        state.begin_edit();
        assert_eq!(state.edit.as_ref().unwrap().input.buffer, "7");
        state.edit_input().unwrap().insert('8');
        state.cancel_edit();
        assert_eq!(state.path_values["id"], "7");
    }

    #[test]
    fn reset_removes_key_and_empty_counts_as_missing() {
        let mut state = users_state(Some("http://localhost"));
        open(&mut state, 0);
        set_value(&mut state, "42");
        state.reset_field();
        assert!(!state.path_values.contains_key("id"));

        // an empty confirmed value is stored but rejected like an absent one
        state.begin_edit();
        state.confirm_edit();
        assert_eq!(state.path_values.get("id").map(String::as_str), Some(""));
        assert!(state.execute_request().is_none());
        assert_eq!(state.error.as_deref(), Some("missing required path param: id"));
    }

    #[test]
    fn panes_cycle_and_skip_empty_ones() {
        let mut state = users_state(None);
        open(&mut state, 0);
        assert_eq!(state.pane, Pane::Path);
        state.next_pane();
        assert_eq!(state.pane, Pane::Query);
        state.next_pane();
        assert_eq!(state.pane, Pane::Path);

        state.back();
        open(&mut state, 1);
        // no path or query params: straight to Body
        assert_eq!(state.pane, Pane::Body);
        state.next_pane();
        assert_eq!(state.pane, Pane::Body);

        state.back();
        open(&mut state, 2);
        assert_eq!(state.available_panes(), vec![Pane::Path]);
        let render = state.to_render_state();
        let builder = render.builder.unwrap();
        assert_eq!(builder.panes[0].note.as_deref(), Some("(none)"));
        state.begin_edit();
        assert!(state.edit.is_none());
    }

    #[test]
    fn row_navigation_is_clamped() {
        let mut state = users_state(None);
        open(&mut state, 1);
        state.row_down();
        state.row_down();
        assert_eq!(state.row, 1);
        assert_eq!(state.current_row().as_deref(), Some("age"));
        state.row_up();
        state.row_up();
        assert_eq!(state.row, 0);
    }

    #[test]
    fn execute_without_base_url_is_an_error() {
        let mut state = users_state(None);
        open(&mut state, 2);
        assert!(state.execute_request().is_none());
        assert!(state.error.as_deref().unwrap().contains("base URL"));
        assert_eq!(state.screen, Screen::Builder);
    }

    #[test]
    fn missing_required_body_field_stays_on_builder() {
        let mut state = users_state(Some("http://localhost:8000"));
        open(&mut state, 1);
        assert!(state.execute_request().is_none());
        assert_eq!(state.screen, Screen::Builder);
        assert_eq!(state.error.as_deref(), Some("missing required body field: name"));
        assert!(!state.is_busy());
    }

    #[test]
    fn execute_merges_credentials_and_completes_to_response() {
        let mut state = users_state(Some("http://localhost:8000/"));
        state.credentials.set_manual("bearerAuth", "abc");
        open(&mut state, 0);
        set_value(&mut state, "42");

        let Some(NetworkCommand::Execute { id, request, timeout }) = state.execute_request() else {
            panic!("expected a dispatch");
        };
        assert_eq!(timeout, EXECUTE_TIMEOUT);
        assert_eq!(request.url, "http://localhost:8000/users/42");
        assert_eq!(request.headers["Authorization"], "Bearer abc");
        assert!(state.is_busy());
        assert!(state.to_render_state().busy.is_some());

        state.handle_response(NetworkResponse::Completed {
            id,
            result: ok_result("{}"),
        });
        assert!(!state.is_busy());
        assert_eq!(state.screen, Screen::Response);
        assert_eq!(state.last_request.as_ref(), Some(&request));
        assert_eq!(state.last_response.as_ref().unwrap().status, 200);
    }

    #[test]
    fn transport_failure_keeps_builder_and_values() {
        let mut state = users_state(Some("http://localhost"));
        open(&mut state, 0);
        set_value(&mut state, "1");
        let Some(NetworkCommand::Execute { id, .. }) = state.execute_request() else {
            panic!("expected a dispatch");
        };
        state.handle_response(NetworkResponse::Failed {
            id,
            message: "connection failed: refused".into(),
        });
        assert_eq!(state.screen, Screen::Builder);
        assert_eq!(state.error.as_deref(), Some("connection failed: refused"));
        assert_eq!(state.path_values["id"], "1");
        assert!(state.last_response.is_none());
    }

    #[test]
    fn stale_responses_are_ignored() {
        let mut state = users_state(Some("http://localhost"));
        open(&mut state, 2);
        let Some(NetworkCommand::Execute { id, .. }) = state.execute_request() else {
            panic!("expected a dispatch");
        };
        state.handle_response(NetworkResponse::Completed {
            id: id + 100,
            result: ok_result("{}"),
        });
        assert!(state.is_busy());
        assert_eq!(state.screen, Screen::Builder);
    }

    #[test]
    fn rerun_replaces_only_the_result() {
        let mut state = users_state(Some("http://localhost"));
        open(&mut state, 2);
        let Some(NetworkCommand::Execute { id, request, .. }) = state.execute_request() else {
            panic!("expected a dispatch");
        };
        state.handle_response(NetworkResponse::Completed {
            id,
            result: ok_result("first"),
        });

        let Some(NetworkCommand::Execute { id, request: again, .. }) = state.rerun() else {
            panic!("expected a re-dispatch");
        };
        assert_eq!(again, request);
        state.handle_response(NetworkResponse::Completed {
            id,
            result: ok_result("second"),
        });
        assert_eq!(state.last_response.as_ref().unwrap().body, "second");
        assert_eq!(state.last_request.as_ref(), Some(&request));

        let Some(NetworkCommand::Execute { id, .. }) = state.rerun() else {
            panic!("expected a re-dispatch");
        };
        state.handle_response(NetworkResponse::Failed {
            id,
            message: "request timed out after 20s".into(),
        });
        assert_eq!(state.screen, Screen::Response);
        assert_eq!(state.last_response.as_ref().unwrap().body, "second");
        assert!(state.error.is_some());
    }

    #[test]
    fn rerun_needs_a_stored_request() {
        let mut state = users_state(Some("http://localhost"));
        state.screen = Screen::Response;
        assert!(state.rerun().is_none());
    }

    #[test]
    fn esc_and_enter_navigate_back() {
        let mut state = users_state(Some("http://localhost"));
        state.back();
        assert_eq!(state.screen, Screen::EndpointList);

        open(&mut state, 2);
        state.last_request = Some(RequestSpec {
            method: HttpMethod::GET,
            url: "http://localhost/health".into(),
            headers: BTreeMap::new(),
            body: None,
        });
        state.last_response = Some(ok_result("ok"));
        state.screen = Screen::Response;
        state.error = Some("stale".into());

        state.back();
        assert_eq!(state.screen, Screen::Builder);
        assert!(state.error.is_none());

        state.screen = Screen::Response;
        state.back_to_list();
        assert_eq!(state.screen, Screen::EndpointList);
    }

    #[test]
    fn esc_closes_edit_before_leaving_builder() {
        let mut state = users_state(None);
        open(&mut state, 0);
        state.begin_edit();
        state.back();
        assert!(state.edit.is_none());
        assert_eq!(state.screen, Screen::Builder);
    }

    #[test]
    fn editor_round_trip_sets_and_clears_raw_body() {
        let mut state = users_state(Some("http://localhost"));
        open(&mut state, 0);
        assert!(state.request_body_editor().is_none());

        state.back();
        open(&mut state, 1);
        let request = state.request_body_editor().unwrap();
        assert_eq!(request.seed, "{}\n");

        let outcome = EditorOutcome {
            content: Some("{\"name\": \"Ada\"}\n".into()),
            failure: None,
        };
        state.resume_from_editor(outcome.clone());
        let first = state.raw_body.clone();
        state.resume_from_editor(outcome);
        assert_eq!(state.raw_body, first);
        assert_eq!(state.raw_body.as_deref(), Some("{\n  \"name\": \"Ada\"\n}"));

        // raw body satisfies the required field
        let Some(NetworkCommand::Execute { request, .. }) = state.execute_request() else {
            panic!("expected a dispatch");
        };
        assert!(request.body.unwrap().contains("Ada"));
    }

    #[test]
    fn editor_is_requested_once_until_it_closes() {
        let mut state = users_state(Some("http://localhost"));
        open(&mut state, 1);

        assert!(state.request_body_editor().is_some());
        assert!(state.editor_pending);
        assert!(state.request_body_editor().is_none());
        assert!(state.execute_request().is_none());

        state.resume_from_editor(EditorOutcome {
            content: None,
            failure: Some("failed to launch editor nope".into()),
        });
        assert!(!state.editor_pending);
        assert!(state.request_body_editor().is_some());
    }

    #[test]
    fn editor_errors_keep_previous_raw_body() {
        let mut state = users_state(None);
        open(&mut state, 1);
        state.raw_body = Some("[1]".into());

        state.resume_from_editor(EditorOutcome {
            content: Some("{\"a\":1} extra".into()),
            failure: None,
        });
        assert_eq!(state.raw_body.as_deref(), Some("[1]"));
        assert!(state.error.as_deref().unwrap().starts_with("invalid json body"));

        state.resume_from_editor(EditorOutcome {
            content: None,
            failure: Some("failed to launch editor nope".into()),
        });
        assert_eq!(state.raw_body.as_deref(), Some("[1]"));

        state.resume_from_editor(EditorOutcome {
            content: Some("  ".into()),
            failure: Some("editor vi exited with 1".into()),
        });
        assert_eq!(state.raw_body, None);
        assert!(state.error.as_deref().unwrap().contains("exited"));
    }

    #[test]
    fn reset_on_body_pane_drops_raw_body() {
        let mut state = users_state(None);
        open(&mut state, 1);
        state.raw_body = Some("{}".into());
        set_value(&mut state, "Ada");
        state.reset_field();
        assert!(state.raw_body.is_none());
        assert!(!state.body_values.contains_key("name"));
    }

    #[test]
    fn scrolling_is_bounded_by_body() {
        let mut state = users_state(None);
        state.last_response = Some(ok_result("a\nb\nc"));
        state.screen = Screen::Response;
        state.page_down();
        assert_eq!(state.response_scroll, 2);
        state.scroll_up();
        assert_eq!(state.response_scroll, 1);
        state.toggle_curl();
        assert!(state.show_curl);
        assert_eq!(state.response_scroll, 0);
    }
}
