//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::editor::EditorOutcome;

/// Top-level screens
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Screen {
    #[default]
    EndpointList,
    Builder,
    Response,
}

/// Builder panes
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Pane {
    #[default]
    Path,
    Query,
    Body,
}

impl Pane {
    pub fn title(&self) -> &'static str {
        match self {
            Pane::Path => "Path",
            Pane::Query => "Query",
            Pane::Body => "Body",
        }
    }
}

/// Auth form field
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AuthField {
    Token,
    Username,
    Password,
    Scope,
}

/// Where keystrokes go inside the auth modal
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum AuthFocus {
    #[default]
    Schemes,
    Field(AuthField),
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone)]
pub enum UiEvent {
    // Endpoint list
    FilterChar(char),
    FilterBackspace,
    SelectPrev,
    SelectNext,
    OpenEndpoint,

    // Builder
    NextPane,
    RowUp,
    RowDown,
    BeginEdit,
    ResetField,
    OpenBodyEditor,
    Execute,

    // Field edit
    EditChar(char),
    EditBackspace,
    EditLeft,
    EditRight,
    EditHome,
    EditEnd,
    ConfirmEdit,
    CancelEdit,

    // Response
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Rerun,
    ToggleCurl,
    BackToList,

    // Auth modal
    OpenAuth,
    AuthPrev,
    AuthNext,
    AuthActivate,
    AuthChar(char),
    AuthBackspace,
    AuthNextField,
    AuthClear,
    CloseAuth,

    // External editor finished
    EditorClosed(EditorOutcome),

    // Popups
    ToggleHelp,
    CloseHelp,

    // Navigation
    Back,

    // System
    Quit,
}

/// What the UI currently shows (needed for context-aware event mapping)
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct KeyContext {
    pub screen: Screen,
    pub editing: bool,
    pub auth: Option<AuthFocus>,
    pub show_help: bool,
    /// A network call is pending
    pub busy: bool,
    /// The external editor is open
    pub editor_pending: bool,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, ctx: KeyContext) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    // Input is ignored until the pending call or the editor completes
    if ctx.busy || ctx.editor_pending {
        return None;
    }

    // Handle popups first
    if ctx.show_help {
        return Some(UiEvent::CloseHelp);
    }

    if let Some(focus) = ctx.auth {
        return handle_auth_keys(key, focus);
    }

    if ctx.editing {
        return handle_edit_keys(key);
    }

    if ctrl {
        return match key.code {
            KeyCode::Char('a') => Some(UiEvent::OpenAuth),
            KeyCode::Char('r') if ctx.screen == Screen::Builder => Some(UiEvent::Execute),
            _ => None,
        };
    }

    if key.code == KeyCode::F(1) {
        return Some(UiEvent::ToggleHelp);
    }

    match ctx.screen {
        Screen::EndpointList => handle_list_keys(key),
        Screen::Builder => handle_builder_keys(key),
        Screen::Response => handle_response_keys(key),
    }
}

/// Handle keys for the endpoint list; printable keys go to the filter
fn handle_list_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::Back),
        KeyCode::Enter => Some(UiEvent::OpenEndpoint),
        KeyCode::Up => Some(UiEvent::SelectPrev),
        KeyCode::Down => Some(UiEvent::SelectNext),
        KeyCode::Backspace => Some(UiEvent::FilterBackspace),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => {
            Some(UiEvent::FilterChar(c))
        }
        _ => None,
    }
}

fn handle_builder_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('A') => Some(UiEvent::OpenAuth),
        KeyCode::Tab => Some(UiEvent::NextPane),
        KeyCode::Up => Some(UiEvent::RowUp),
        KeyCode::Down => Some(UiEvent::RowDown),
        KeyCode::Enter => Some(UiEvent::BeginEdit),
        KeyCode::Char('e') => Some(UiEvent::OpenBodyEditor),
        KeyCode::Char('d') => Some(UiEvent::ResetField),
        KeyCode::Esc => Some(UiEvent::Back),
        _ => None,
    }
}

fn handle_response_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('A') => Some(UiEvent::OpenAuth),
        KeyCode::Up => Some(UiEvent::ScrollUp),
        KeyCode::Down => Some(UiEvent::ScrollDown),
        KeyCode::PageUp => Some(UiEvent::PageUp),
        KeyCode::PageDown => Some(UiEvent::PageDown),
        KeyCode::Char('r') => Some(UiEvent::Rerun),
        KeyCode::Char('c') => Some(UiEvent::ToggleCurl),
        KeyCode::Enter => Some(UiEvent::BackToList),
        KeyCode::Esc => Some(UiEvent::Back),
        _ => None,
    }
}

fn handle_edit_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::CancelEdit),
        KeyCode::Enter => Some(UiEvent::ConfirmEdit),
        KeyCode::Left => Some(UiEvent::EditLeft),
        KeyCode::Right => Some(UiEvent::EditRight),
        KeyCode::Home => Some(UiEvent::EditHome),
        KeyCode::End => Some(UiEvent::EditEnd),
        KeyCode::Backspace => Some(UiEvent::EditBackspace),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(UiEvent::EditChar(c))
        }
        _ => None,
    }
}

fn handle_auth_keys(key: KeyEvent, focus: AuthFocus) -> Option<UiEvent> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match (focus, key.code) {
        (_, KeyCode::Esc) => Some(UiEvent::CloseAuth),
        (_, KeyCode::Char('d')) if ctrl => Some(UiEvent::AuthClear),
        (_, KeyCode::Enter) => Some(UiEvent::AuthActivate),
        (AuthFocus::Schemes, KeyCode::Up) => Some(UiEvent::AuthPrev),
        (AuthFocus::Schemes, KeyCode::Down) => Some(UiEvent::AuthNext),
        (AuthFocus::Field(_), KeyCode::Tab) => Some(UiEvent::AuthNextField),
        (AuthFocus::Field(_), KeyCode::Backspace) => Some(UiEvent::AuthBackspace),
        (AuthFocus::Field(_), KeyCode::Char(c)) if !ctrl => Some(UiEvent::AuthChar(c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn on(screen: Screen) -> KeyContext {
        KeyContext {
            screen,
            ..KeyContext::default()
        }
    }

    #[test]
    fn list_sends_printable_keys_to_filter() {
        let ctx = on(Screen::EndpointList);
        assert!(matches!(
            key_to_ui_event(press(KeyCode::Char('q')), ctx),
            Some(UiEvent::FilterChar('q'))
        ));
        assert!(matches!(
            key_to_ui_event(press(KeyCode::Char('?')), ctx),
            Some(UiEvent::FilterChar('?'))
        ));
        assert!(matches!(
            key_to_ui_event(press(KeyCode::F(1)), ctx),
            Some(UiEvent::ToggleHelp)
        ));
    }

    #[test]
    fn ctrl_r_executes_only_in_builder() {
        assert!(matches!(
            key_to_ui_event(ctrl('r'), on(Screen::Builder)),
            Some(UiEvent::Execute)
        ));
        assert!(key_to_ui_event(ctrl('r'), on(Screen::Response)).is_none());
        assert!(matches!(
            key_to_ui_event(press(KeyCode::Char('r')), on(Screen::Response)),
            Some(UiEvent::Rerun)
        ));
    }

    #[test]
    fn busy_swallows_everything_but_quit() {
        let ctx = KeyContext {
            busy: true,
            ..on(Screen::Builder)
        };
        assert!(key_to_ui_event(press(KeyCode::Esc), ctx).is_none());
        assert!(matches!(key_to_ui_event(ctrl('c'), ctx), Some(UiEvent::Quit)));
    }

    #[test]
    fn open_editor_swallows_everything_but_quit() {
        let ctx = KeyContext {
            editor_pending: true,
            ..on(Screen::Builder)
        };
        assert!(key_to_ui_event(press(KeyCode::Char('e')), ctx).is_none());
        assert!(key_to_ui_event(ctrl('r'), ctx).is_none());
        assert!(matches!(key_to_ui_event(ctrl('c'), ctx), Some(UiEvent::Quit)));
    }

    #[test]
    fn edit_mode_captures_letters() {
        let ctx = KeyContext {
            editing: true,
            ..on(Screen::Builder)
        };
        assert!(matches!(
            key_to_ui_event(press(KeyCode::Char('q')), ctx),
            Some(UiEvent::EditChar('q'))
        ));
        assert!(matches!(
            key_to_ui_event(press(KeyCode::Esc), ctx),
            Some(UiEvent::CancelEdit)
        ));
    }

    #[test]
    fn auth_modal_routes_by_focus() {
        let schemes = KeyContext {
            auth: Some(AuthFocus::Schemes),
            ..on(Screen::Builder)
        };
        assert!(matches!(
            key_to_ui_event(press(KeyCode::Down), schemes),
            Some(UiEvent::AuthNext)
        ));
        assert!(key_to_ui_event(press(KeyCode::Char('x')), schemes).is_none());
        assert!(matches!(key_to_ui_event(ctrl('d'), schemes), Some(UiEvent::AuthClear)));

        let field = KeyContext {
            auth: Some(AuthFocus::Field(AuthField::Token)),
            ..on(Screen::Builder)
        };
        assert!(matches!(
            key_to_ui_event(press(KeyCode::Char('x')), field),
            Some(UiEvent::AuthChar('x'))
        ));
        assert!(matches!(
            key_to_ui_event(press(KeyCode::Esc), field),
            Some(UiEvent::CloseAuth)
        ));
    }

    #[test]
    fn help_popup_closes_on_any_key() {
        let ctx = KeyContext {
            show_help: true,
            ..on(Screen::Response)
        };
        assert!(matches!(
            key_to_ui_event(press(KeyCode::Char('r')), ctx),
            Some(UiEvent::CloseHelp)
        ));
    }
}
