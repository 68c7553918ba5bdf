//! Terminal drawing. Everything here reads a `RenderState` and nothing else.

use std::sync::OnceLock;

use ratatui::{prelude::*, widgets::*};
use regex::Regex;

use crate::messages::render::{
    AuthForm, AuthStatus, AuthView, BuilderView, EditView, PaneView, ResponseView,
};
use crate::messages::ui_events::{AuthField, AuthFocus, Pane, Screen};
use crate::messages::RenderState;

pub fn draw(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Screen
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_title_bar(f, state, chunks[0]);

    match state.screen {
        Screen::EndpointList => draw_endpoint_list(f, state, chunks[1]),
        Screen::Builder => match &state.builder {
            Some(builder) => draw_builder(f, builder, chunks[1]),
            None => draw_endpoint_list(f, state, chunks[1]),
        },
        Screen::Response => match &state.response {
            Some(response) => draw_response(f, response, state.response_scroll, chunks[1]),
            None => draw_endpoint_list(f, state, chunks[1]),
        },
    }

    draw_status_bar(f, state, chunks[2]);

    // Popups
    if let Some(auth) = &state.auth {
        draw_auth_modal(f, auth, area);
    }

    if let Some(edit) = &state.edit {
        draw_edit_popup(f, edit, area);
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_title_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let base = match &state.base_url {
        Some(url) => Span::styled(url.clone(), Style::default().fg(Color::Gray)),
        None => Span::styled("no base URL", Style::default().fg(Color::Red)),
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", state.api_title),
            Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
        ),
        Span::raw(" "),
        base,
    ]);
    f.render_widget(Paragraph::new(line), area);
}

// ============================================================================
// Endpoint list
// ============================================================================

fn draw_endpoint_list(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let filter = Paragraph::new(state.filter.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Filter "),
    );
    f.render_widget(filter, chunks[0]);
    let cursor_x = chunks[0].x + 1 + state.filter.chars().count() as u16;
    f.set_cursor_position(Position::new(
        cursor_x.min(chunks[0].right().saturating_sub(2)),
        chunks[0].y + 1,
    ));

    let title = format!(
        " Endpoints ({}/{}) ",
        state.endpoints.len(),
        state.total_endpoints
    );

    if state.endpoints.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No endpoints match the filter.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(empty, chunks[1]);
        return;
    }

    let items: Vec<ListItem> = state
        .endpoints
        .iter()
        .map(|ep| {
            let mut spans = vec![Span::styled(
                format!("{:7}", ep.method.as_str()),
                Style::default().fg(method_color(ep.method.as_str())).bold(),
            )];
            spans.extend(path_spans(&ep.path));
            if let Some(label) = &ep.label {
                spans.push(Span::styled(
                    format!("  {}", label),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            if ep.secured {
                spans.push(Span::raw(" 🔒"));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray).bold())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected));
    f.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn path_param_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\{[^}/]+\}").ok())
        .as_ref()
}

/// Path with `{param}` segments highlighted
fn path_spans(path: &str) -> Vec<Span<'static>> {
    let Some(pattern) = path_param_pattern() else {
        return vec![Span::raw(path.to_string())];
    };

    let mut spans = Vec::new();
    let mut last = 0;
    for m in pattern.find_iter(path) {
        if m.start() > last {
            spans.push(Span::raw(path[last..m.start()].to_string()));
        }
        spans.push(Span::styled(
            m.as_str().to_string(),
            Style::default().fg(Color::Magenta),
        ));
        last = m.end();
    }
    if last < path.len() {
        spans.push(Span::raw(path[last..].to_string()));
    }
    spans
}

// ============================================================================
// Builder
// ============================================================================

fn draw_builder(f: &mut Frame, builder: &BuilderView, area: Rect) {
    let mut constraints = vec![Constraint::Length(3)];
    constraints.extend(builder.panes.iter().map(|pane| {
        let rows = pane.rows.len().max(1) as u16;
        Constraint::Min(rows + 2)
    }));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let (auth_text, auth_color) = match builder.auth_status {
        AuthStatus::NotRequired => ("", Color::Reset),
        AuthStatus::Satisfied => (" 🔑 authorized", Color::Green),
        AuthStatus::Missing => (" 🔒 no credentials (A to authorize)", Color::Red),
    };
    let mut header = vec![Span::styled(
        format!("{} ", builder.method.as_str()),
        Style::default().fg(method_color(builder.method.as_str())).bold(),
    )];
    header.extend(path_spans(&builder.path));
    header.push(Span::styled(auth_text, Style::default().fg(auth_color)));

    let title = builder
        .label
        .as_ref()
        .map(|l| format!(" {} ", l))
        .unwrap_or_else(|| " Request ".to_string());
    let header = Paragraph::new(Line::from(header))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(header, chunks[0]);

    for (i, pane) in builder.panes.iter().enumerate() {
        let focused = pane.pane == builder.active_pane;
        draw_pane(f, pane, focused, builder, chunks[i + 1]);
    }
}

fn draw_pane(f: &mut Frame, pane: &PaneView, focused: bool, builder: &BuilderView, area: Rect) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let mut lines: Vec<Line> = pane
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let marker = if row.required { "*" } else { " " };
            let selected = focused && i == builder.row;
            let name_style = if selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default()
            };
            let value = match (&row.value, &row.hint) {
                (Some(v), _) => Span::raw(v.clone()),
                (None, Some(hint)) => Span::styled(hint.clone(), Style::default().fg(Color::DarkGray)),
                (None, None) => Span::styled("-", Style::default().fg(Color::DarkGray)),
            };
            Line::from(vec![
                Span::styled(if selected { "> " } else { "  " }, name_style),
                Span::styled(format!("{}{}", row.name, marker), name_style),
                Span::styled(format!(" ({}) ", row.type_label), Style::default().fg(Color::DarkGray)),
                value,
            ])
        })
        .collect();

    if let Some(note) = &pane.note {
        lines.push(Line::from(Span::styled(
            note.clone(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    if pane.pane == Pane::Body {
        if let Some(raw) = &builder.raw_body {
            lines.push(Line::from(Span::styled(
                "raw JSON (replaces fields, d to drop):",
                Style::default().fg(Color::Yellow),
            )));
            lines.extend(highlight_json(raw));
        }
    }

    let hint = match pane.pane {
        Pane::Body => " (Enter:edit e:editor d:reset) ",
        _ => " (Enter:edit d:reset) ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", pane.pane.title()))
        .title_bottom(Line::from(if focused { hint } else { "" }).right_aligned());

    f.render_widget(Paragraph::new(lines).block(block), area);
}

// ============================================================================
// Response
// ============================================================================

fn draw_response(f: &mut Frame, response: &ResponseView, scroll: u16, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let mut summary = vec![
        Span::styled(
            format!(" {} ", response.status_line),
            Style::default().fg(status_color(response.status)).bold(),
        ),
        Span::raw(format!(" {}ms", response.elapsed_ms)),
    ];
    if let Some(ct) = &response.content_type {
        summary.push(Span::styled(format!("  {}", ct), Style::default().fg(Color::DarkGray)));
    }
    let header = Paragraph::new(Line::from(summary)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", response.request_line)),
    );
    f.render_widget(header, chunks[0]);

    let (title, lines) = match &response.curl {
        Some(curl) => (
            " cURL (c:body) ",
            curl.lines().map(|l| Line::from(l.to_string())).collect(),
        ),
        None => (" Body (c:cURL r:re-run) ", highlight_json(&response.body)),
    };

    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((scroll, 0));
    f.render_widget(body, chunks[1]);
}

// ============================================================================
// Status bar and popups
// ============================================================================

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if let Some(label) = &state.busy {
        Span::styled(format!(" waiting: {} ", label), Style::default().fg(Color::Yellow))
    } else if state.editor_pending {
        Span::styled(" waiting: editor ", Style::default().fg(Color::Yellow))
    } else if let Some(err) = &state.error {
        Span::styled(format!(" {} ", err), Style::default().fg(Color::Red))
    } else {
        let hints = if state.auth.is_some() {
            " ↑/↓:scheme | Enter:edit/submit | Tab:field | Ctrl+D:clear | Esc:close "
        } else if state.edit.is_some() {
            " Enter:confirm | Esc:cancel | ←/→ Home/End:move "
        } else {
            match state.screen {
                Screen::EndpointList => " type:filter | ↑/↓:select | Enter:open | F1:help | Ctrl+C:quit ",
                Screen::Builder => " Tab:pane | Enter:edit | Ctrl+R:execute | A:auth | Esc:back | ?:help | q:quit ",
                Screen::Response => " ↑/↓ PgUp/PgDn:scroll | r:re-run | c:cURL | Enter:list | Esc:back | q:quit ",
            }
        };
        Span::styled(hints, Style::default().fg(Color::DarkGray))
    };
    f.render_widget(Paragraph::new(Line::from(status)), area);
}

fn draw_edit_popup(f: &mut Frame, edit: &EditView, area: Rect) {
    let popup_area = centered_rect(60, 20, area);

    let mut lines = vec![Line::from(edit.buffer.clone())];
    if let Some(hint) = &edit.hint {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(hint.clone(), Style::default().fg(Color::DarkGray))));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" {} (Enter:confirm Esc:cancel) ", edit.title))
        .style(Style::default().bg(Color::Black));

    f.render_widget(Clear, popup_area);
    f.render_widget(Paragraph::new(lines).block(block), popup_area);

    let cursor_col = edit.buffer[..edit.cursor.min(edit.buffer.len())].chars().count() as u16;
    let max_x = popup_area.x + popup_area.width.saturating_sub(2);
    let cursor_x = (popup_area.x + 1 + cursor_col).min(max_x);
    f.set_cursor_position(Position::new(cursor_x, popup_area.y + 1));
}

fn draw_auth_modal(f: &mut Frame, auth: &AuthView, area: Rect) {
    let popup_area = centered_rect(70, 60, area);
    f.render_widget(Clear, popup_area);

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" Authorize ")
        .style(Style::default().bg(Color::Black));
    let inner = outer.inner(popup_area);
    f.render_widget(outer, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(inner);

    let items: Vec<ListItem> = auth
        .schemes
        .iter()
        .map(|s| {
            let (mark, color) = if s.is_set {
                ("[set]  ", Color::Green)
            } else {
                ("[unset]", Color::DarkGray)
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, Style::default().fg(color)),
                Span::raw(format!(" {} ", s.name)),
                Span::styled(format!("({})", s.type_label), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let schemes_border = if auth.focus == AuthFocus::Schemes {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(schemes_border)
                .title(" Schemes "),
        )
        .highlight_style(Style::default().fg(Color::Yellow).bold());
    let mut list_state = ListState::default();
    list_state.select(Some(auth.selected));
    f.render_stateful_widget(list, chunks[0], &mut list_state);

    let field = |label: &str, value: String, which: AuthField| -> Line<'static> {
        let focused = auth.focus == AuthFocus::Field(which);
        let style = if focused {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default()
        };
        let cursor = if focused { "_" } else { "" };
        Line::from(vec![
            Span::styled(format!("{:<9}", label), style),
            Span::raw(format!("{}{}", value, cursor)),
        ])
    };

    let mut lines: Vec<Line> = Vec::new();
    if let Some(desc) = &auth.description {
        lines.push(Line::from(Span::styled(desc.clone(), Style::default().fg(Color::DarkGray))));
        lines.push(Line::from(""));
    }
    match &auth.form {
        AuthForm::Bearer { token } => {
            lines.push(field("Token", token.clone(), AuthField::Token));
        }
        AuthForm::Password {
            token_url,
            username,
            password_len,
            scope,
            scopes,
        } => {
            lines.push(Line::from(Span::styled(
                format!("POST {}", token_url),
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(field("Username", username.clone(), AuthField::Username));
            lines.push(field("Password", "*".repeat(*password_len), AuthField::Password));
            lines.push(field("Scope", scope.clone(), AuthField::Scope));
            if !scopes.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("available: {}", scopes.join(" ")),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        AuthForm::Unsupported { reason } => {
            lines.push(Line::from(Span::styled(reason.clone(), Style::default().fg(Color::Red))));
        }
    }
    if let Some(err) = &auth.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(err.clone(), Style::default().fg(Color::Red))));
    }

    let form = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Credentials "))
        .wrap(Wrap { trim: false });
    f.render_widget(form, chunks[1]);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 80, area);

    let help_text = r#"
 SPECDECK - Keyboard Shortcuts

 ENDPOINT LIST
   type               Filter endpoints
   ↑ / ↓              Move selection
   Enter              Open endpoint

 BUILDER
   Tab                Next pane (Path/Query/Body)
   ↑ / ↓              Move between fields
   Enter              Edit field
   e                  Edit raw JSON body in $EDITOR
   d                  Reset field
   Ctrl+R             Execute request

 RESPONSE
   ↑ / ↓ PgUp / PgDn  Scroll
   r                  Re-run request
   c                  Toggle cURL
   Enter              Back to endpoint list

 AUTH
   Ctrl+A / A         Open authorize dialog
   Enter              Edit / submit credentials
   Ctrl+D             Clear credential

 GENERAL
   Esc                Back
   ? / F1             Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

// ============================================================================
// Colors and highlighting
// ============================================================================

/// Simple JSON syntax highlighting
pub fn highlight_json(text: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for line in text.lines() {
        let mut spans = Vec::new();
        let mut current = String::new();
        let mut in_string = false;
        let mut escaped = false;
        let mut is_key = false;

        for (i, c) in line.char_indices() {
            if in_string {
                current.push(c);
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    let color = if is_key { Color::Cyan } else { Color::Green };
                    spans.push(Span::styled(std::mem::take(&mut current), Style::default().fg(color)));
                    in_string = false;
                }
                continue;
            }

            match c {
                '"' => {
                    flush_plain(&mut spans, &mut current);
                    in_string = true;
                    current.push(c);
                    // a key is a string followed by ':'
                    is_key = closing_quote(&line[i + 1..])
                        .map(|end| line[i + 1 + end + 1..].trim_start().starts_with(':'))
                        .unwrap_or(false);
                }
                '{' | '}' | '[' | ']' | ':' | ',' => {
                    flush_plain(&mut spans, &mut current);
                    let color = if c == ':' || c == ',' { Color::White } else { Color::Yellow };
                    spans.push(Span::styled(c.to_string(), Style::default().fg(color)));
                }
                _ => current.push(c),
            }
        }
        if in_string {
            spans.push(Span::raw(current));
        } else {
            flush_plain(&mut spans, &mut current);
        }

        lines.push(Line::from(spans));
    }

    lines
}

/// Byte offset of the unescaped closing quote in `rest`
fn closing_quote(rest: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(i),
            _ => {}
        }
    }
    None
}

/// Emit a run of non-string text, coloring literals
fn flush_plain(spans: &mut Vec<Span<'static>>, current: &mut String) {
    if current.is_empty() {
        return;
    }
    let text = std::mem::take(current);
    let word = text.trim();
    let style = if word == "true" || word == "false" || word == "null" {
        Style::default().fg(Color::Magenta)
    } else if !word.is_empty() && word.parse::<f64>().is_ok() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    spans.push(Span::styled(text, style));
}

/// Status code color
pub fn status_color(code: u16) -> Color {
    match code {
        200..=299 => Color::Green,
        300..=399 => Color::Cyan,
        400..=499 => Color::Red,
        500..=599 => Color::Magenta,
        _ => Color::Yellow,
    }
}

/// Method color
pub fn method_color(method: &str) -> Color {
    match method {
        "GET" => Color::Green,
        "POST" => Color::Yellow,
        "PUT" => Color::Blue,
        "PATCH" => Color::Cyan,
        "DELETE" => Color::Red,
        _ => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn highlight_keeps_text_and_colors_keys() {
        let lines = highlight_json("{\n  \"na:me\": \"a\\\"b\",\n  \"n\": 1.5\n}");
        assert_eq!(lines.len(), 4);
        assert_eq!(text(&lines[1]), "  \"na:me\": \"a\\\"b\",");
        let key = lines[1].spans.iter().find(|s| s.content == "\"na:me\"").unwrap();
        assert_eq!(key.style.fg, Some(Color::Cyan));
        let value = lines[1].spans.iter().find(|s| s.content == "\"a\\\"b\"").unwrap();
        assert_eq!(value.style.fg, Some(Color::Green));
        let number = lines[2].spans.iter().find(|s| s.content.trim() == "1.5").unwrap();
        assert_eq!(number.style.fg, Some(Color::Yellow));
    }

    #[test]
    fn path_params_are_split_out() {
        let spans = path_spans("/users/{id}/posts");
        let parts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["/users/", "{id}", "/posts"]);
        assert_eq!(spans[1].style.fg, Some(Color::Magenta));
    }

    #[test]
    fn status_classes() {
        assert_eq!(status_color(204), Color::Green);
        assert_eq!(status_color(404), Color::Red);
        assert_eq!(status_color(503), Color::Magenta);
    }

    #[test]
    fn draws_every_screen() {
        use crate::messages::render::{EndpointRow, FieldRow, SchemeRow};
        use crate::models::HttpMethod;
        use ratatui::backend::TestBackend;

        let mut state = RenderState {
            api_title: "Pets 1.0".into(),
            endpoints: vec![EndpointRow {
                method: HttpMethod::GET,
                path: "/pets/{id}".into(),
                label: Some("Get pet".into()),
                secured: true,
            }],
            total_endpoints: 1,
            show_help: true,
            ..RenderState::default()
        };
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| draw(f, &state)).unwrap();

        state.show_help = false;
        state.screen = Screen::Builder;
        state.builder = Some(BuilderView {
            method: HttpMethod::GET,
            path: "/pets/{id}".into(),
            label: None,
            panes: vec![PaneView {
                pane: Pane::Path,
                rows: vec![FieldRow {
                    name: "id".into(),
                    required: true,
                    type_label: "integer",
                    value: None,
                    hint: Some("e.g. 1".into()),
                }],
                note: None,
            }],
            active_pane: Pane::Path,
            row: 0,
            raw_body: None,
            auth_status: AuthStatus::Missing,
        });
        state.edit = Some(EditView {
            title: "Path id".into(),
            buffer: "12".into(),
            cursor: 2,
            hint: None,
        });
        terminal.draw(|f| draw(f, &state)).unwrap();

        state.edit = None;
        state.screen = Screen::Response;
        state.response = Some(ResponseView {
            request_line: "GET http://x/pets/1".into(),
            status: 200,
            status_line: "200 OK".into(),
            elapsed_ms: 3,
            content_type: Some("application/json".into()),
            body: "{\"id\": 1}".into(),
            curl: None,
        });
        state.auth = Some(AuthView {
            schemes: vec![SchemeRow {
                name: "bearerAuth".into(),
                type_label: "http bearer".into(),
                is_set: false,
            }],
            selected: 0,
            focus: AuthFocus::Field(AuthField::Token),
            description: None,
            form: AuthForm::Bearer { token: "abc".into() },
            error: None,
        });
        terminal.draw(|f| draw(f, &state)).unwrap();
    }
}
