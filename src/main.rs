//! specdeck - interactive OpenAPI client
//!
//! Architecture:
//! - UI Layer (Ratatui) - terminal rendering and the external editor hand-off
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async HTTP execution and token requests

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

use specdeck::app::{AppActor, AppState};
use specdeck::config::{Cli, Config};
use specdeck::constants::{APP_NAME, APP_VERSION, LOAD_TIMEOUT, LOG_FILE_NAME};
use specdeck::discovery;
use specdeck::editor::{self, EditorRequest};
use specdeck::messages::{key_to_ui_event, NetworkCommand, NetworkResponse, RenderState, UiEvent};
use specdeck::network::{create_client, NetworkActor};
use specdeck::ui;

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_cli(Cli::parse()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", APP_NAME, e);
            return ExitCode::from(2);
        }
    };

    let _log_guard = init_logging(config.debug_log);
    info!(version = APP_VERSION, spec = %config.spec.describe(), "starting");

    let client = create_client();
    let catalog = match discovery::load(&client, &config.spec, LOAD_TIMEOUT)
        .await
        .with_context(|| format!("cannot load {}", config.spec.describe()))
    {
        Ok(catalog) => catalog,
        Err(e) => {
            error!(error = %format!("{:#}", e), "load failed");
            eprintln!("{}: {:#}", APP_NAME, e);
            return ExitCode::from(2);
        }
    };

    let base_url = discovery::resolve_base_url(config.base_url.as_deref(), &config.spec, &catalog);
    info!(endpoints = catalog.len(), base_url = ?base_url, "catalog loaded");

    match run(&config, client, AppState::new(catalog, base_url)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{:#}", e), "terminated");
            eprintln!("{}: {:#}", APP_NAME, e);
            ExitCode::from(1)
        }
    }
}

/// File logging, only when asked for; the terminal belongs to the UI
fn init_logging(enabled: bool) -> Option<WorkerGuard> {
    if !enabled {
        return None;
    }
    let file_appender = tracing_appender::rolling::never(std::env::temp_dir(), LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Some(guard)
}

async fn run(config: &Config, client: reqwest::Client, state: AppState) -> anyhow::Result<()> {
    // Terminal setup
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();
    let (editor_tx, mut editor_rx) = mpsc::unbounded_channel::<EditorRequest>();

    // Spawn network actor
    let network_actor = NetworkActor::new(client, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(state, net_cmd_tx, render_tx, editor_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    run_ui_loop(
        &mut terminal,
        &config.editor,
        ui_tx,
        &mut render_rx,
        &mut editor_rx,
    )
    .await
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop<B: Backend + io::Write>(
    terminal: &mut Terminal<B>,
    editor_command: &str,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
    editor_rx: &mut mpsc::UnboundedReceiver<EditorRequest>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| ui::draw(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(key, current_state.key_context()) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // The editor runs here, where the terminal is owned
        while let Ok(request) = editor_rx.try_recv() {
            let outcome = with_terminal_released(terminal, || editor::run(editor_command, &request))?;
            let _ = ui_tx.send(UiEvent::EditorClosed(outcome));
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

/// Hand the terminal to a child process and take it back afterwards
fn with_terminal_released<B, T>(terminal: &mut Terminal<B>, f: impl FnOnce() -> T) -> anyhow::Result<T>
where
    B: Backend + io::Write,
{
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let result = tokio::task::block_in_place(f);

    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.clear()?;
    Ok(result)
}
