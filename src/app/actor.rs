//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;
use tracing::debug;

use crate::app::state::AppState;
use crate::editor::EditorRequest;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
    editor_tx: mpsc::UnboundedSender<EditorRequest>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
        editor_tx: mpsc::UnboundedSender<EditorRequest>,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
            editor_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Send initial render state
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn dispatch(&self, command: Option<NetworkCommand>) {
        if let Some(cmd) = command {
            let _ = self.network_tx.send(cmd);
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        // While a call is in flight or the editor is open only quitting is allowed.
        // The editor outcome always gets through.
        let gated = self.state.is_busy() || self.state.editor_pending;
        if gated && !matches!(event, UiEvent::Quit | UiEvent::EditorClosed(_)) {
            debug!(?event, "ignored while busy");
            return false;
        }

        match event {
            // Endpoint list
            UiEvent::FilterChar(c) => self.state.filter_char(c),
            UiEvent::FilterBackspace => self.state.filter_backspace(),
            UiEvent::SelectPrev => self.state.select_prev(),
            UiEvent::SelectNext => self.state.select_next(),
            UiEvent::OpenEndpoint => self.state.open_endpoint(),

            // Builder
            UiEvent::NextPane => self.state.next_pane(),
            UiEvent::RowUp => self.state.row_up(),
            UiEvent::RowDown => self.state.row_down(),
            UiEvent::BeginEdit => self.state.begin_edit(),
            UiEvent::ResetField => self.state.reset_field(),
            UiEvent::OpenBodyEditor => {
                if let Some(request) = self.state.request_body_editor() {
                    let _ = self.editor_tx.send(request);
                }
            }
            UiEvent::Execute => {
                let cmd = self.state.execute_request();
                self.dispatch(cmd);
            }

            // Field edit
            UiEvent::EditChar(c) => {
                if let Some(input) = self.state.edit_input() {
                    input.insert(c);
                }
            }
            UiEvent::EditBackspace => {
                if let Some(input) = self.state.edit_input() {
                    input.backspace();
                }
            }
            UiEvent::EditLeft => {
                if let Some(input) = self.state.edit_input() {
                    input.left();
                }
            }
            UiEvent::EditRight => {
                if let Some(input) = self.state.edit_input() {
                    input.right();
                }
            }
            UiEvent::EditHome => {
                if let Some(input) = self.state.edit_input() {
                    input.home();
                }
            }
            UiEvent::EditEnd => {
                if let Some(input) = self.state.edit_input() {
                    input.end();
                }
            }
            UiEvent::ConfirmEdit => self.state.confirm_edit(),
            UiEvent::CancelEdit => self.state.cancel_edit(),

            // Response
            UiEvent::ScrollUp => self.state.scroll_up(),
            UiEvent::ScrollDown => self.state.scroll_down(),
            UiEvent::PageUp => self.state.page_up(),
            UiEvent::PageDown => self.state.page_down(),
            UiEvent::Rerun => {
                let cmd = self.state.rerun();
                self.dispatch(cmd);
            }
            UiEvent::ToggleCurl => self.state.toggle_curl(),
            UiEvent::BackToList => self.state.back_to_list(),

            // Auth modal
            UiEvent::OpenAuth => self.state.open_auth(),
            UiEvent::AuthPrev => self.state.auth_move(-1),
            UiEvent::AuthNext => self.state.auth_move(1),
            UiEvent::AuthActivate => {
                let cmd = self.state.auth_activate();
                self.dispatch(cmd);
            }
            UiEvent::AuthChar(c) => self.state.auth_char(c),
            UiEvent::AuthBackspace => self.state.auth_backspace(),
            UiEvent::AuthNextField => self.state.auth_next_field(),
            UiEvent::AuthClear => self.state.auth_clear(),
            UiEvent::CloseAuth => self.state.close_auth(),

            UiEvent::EditorClosed(outcome) => self.state.resume_from_editor(outcome),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            UiEvent::Back => self.state.back(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::discovery::{BodyField, BodySchema, Endpoint};
    use crate::messages::ui_events::Screen;
    use crate::models::HttpMethod;
    use std::collections::BTreeMap;

    struct Harness {
        ui_tx: mpsc::UnboundedSender<UiEvent>,
        net_rx: mpsc::UnboundedReceiver<NetworkCommand>,
        render_rx: mpsc::UnboundedReceiver<RenderState>,
        editor_rx: mpsc::UnboundedReceiver<EditorRequest>,
        handle: tokio::task::JoinHandle<()>,
        _resp_tx: mpsc::UnboundedSender<NetworkResponse>,
    }

    fn spawn(base_url: Option<&str>) -> Harness {
        let mut post = Endpoint::new(HttpMethod::POST, "/pets");
        post.body = Some(BodySchema {
            supported: true,
            fields: vec![BodyField::new("name", crate::discovery::ParamType::String)],
        });
        let catalog = Catalog::new(vec![post], BTreeMap::new());
        let state = AppState::new(catalog, base_url.map(String::from));

        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (net_tx, net_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();
        let (render_tx, render_rx) = mpsc::unbounded_channel();
        let (editor_tx, editor_rx) = mpsc::unbounded_channel();

        let actor = AppActor::new(state, net_tx, render_tx, editor_tx);
        let handle = tokio::spawn(actor.run(ui_rx, resp_rx));
        Harness {
            ui_tx,
            net_rx,
            render_rx,
            editor_rx,
            handle,
            _resp_tx: resp_tx,
        }
    }

    async fn last_render(rx: &mut mpsc::UnboundedReceiver<RenderState>, count: usize) -> RenderState {
        let mut last = None;
        for _ in 0..count {
            last = rx.recv().await;
        }
        last.unwrap()
    }

    #[tokio::test]
    async fn quit_sends_shutdown_and_stops() {
        let mut h = spawn(None);
        let initial = h.render_rx.recv().await.unwrap();
        assert_eq!(initial.screen, Screen::EndpointList);
        assert_eq!(initial.endpoints.len(), 1);

        h.ui_tx.send(UiEvent::Quit).unwrap();
        assert!(matches!(h.net_rx.recv().await, Some(NetworkCommand::Shutdown)));
        h.handle.await.unwrap();
    }

    #[tokio::test]
    async fn body_editor_request_goes_to_editor_channel() {
        let mut h = spawn(None);
        h.ui_tx.send(UiEvent::OpenEndpoint).unwrap();
        h.ui_tx.send(UiEvent::OpenBodyEditor).unwrap();
        let request = h.editor_rx.recv().await.unwrap();
        assert_eq!(request.seed, "{}\n");

        h.ui_tx
            .send(UiEvent::EditorClosed(crate::editor::EditorOutcome {
                content: Some("{\"name\":\"Rex\"}".into()),
                failure: None,
            }))
            .unwrap();
        let render = last_render(&mut h.render_rx, 4).await;
        let builder = render.builder.unwrap();
        assert!(builder.raw_body.unwrap().contains("Rex"));
    }

    #[tokio::test]
    async fn editor_suspends_other_events_until_closed() {
        let mut h = spawn(Some("http://localhost:1"));
        h.ui_tx.send(UiEvent::OpenEndpoint).unwrap();
        h.ui_tx.send(UiEvent::OpenBodyEditor).unwrap();
        h.ui_tx.send(UiEvent::OpenBodyEditor).unwrap();
        h.ui_tx.send(UiEvent::Execute).unwrap();
        h.ui_tx
            .send(UiEvent::EditorClosed(crate::editor::EditorOutcome {
                content: Some("{\"name\":\"Rex\"}".into()),
                failure: None,
            }))
            .unwrap();

        // 1 initial + 5 events
        let render = last_render(&mut h.render_rx, 6).await;
        assert!(!render.editor_pending);
        assert!(render.builder.unwrap().raw_body.unwrap().contains("Rex"));

        assert!(h.editor_rx.try_recv().is_ok());
        assert!(h.editor_rx.try_recv().is_err());
        assert!(h.net_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn events_are_ignored_while_busy() {
        let mut h = spawn(Some("http://localhost:1"));
        h.ui_tx.send(UiEvent::OpenEndpoint).unwrap();
        for c in "Rex".chars() {
            // BeginEdit only once; chars go to the popup
            if c == 'R' {
                h.ui_tx.send(UiEvent::BeginEdit).unwrap();
            }
            h.ui_tx.send(UiEvent::EditChar(c)).unwrap();
        }
        h.ui_tx.send(UiEvent::ConfirmEdit).unwrap();
        h.ui_tx.send(UiEvent::Execute).unwrap();

        let Some(NetworkCommand::Execute { request, .. }) = h.net_rx.recv().await else {
            panic!("expected execute");
        };
        assert_eq!(request.body.as_deref(), Some("{\"name\":\"Rex\"}"));

        h.ui_tx.send(UiEvent::Back).unwrap();
        // 1 initial + 7 events + Back
        let render = last_render(&mut h.render_rx, 9).await;
        assert_eq!(render.screen, Screen::Builder);
        assert!(render.busy.is_some());
    }
}
