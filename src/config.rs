//! Command line and environment configuration

use std::path::PathBuf;

use clap::Parser;

use crate::constants::{
    APP_NAME, ENV_BASE_URL, ENV_DEBUG, ENV_EDITOR, ENV_SPEC_FILE, ENV_SPEC_URL, FALLBACK_EDITOR,
};
use crate::discovery::SpecSource;
use crate::error::ConfigError;

/// Browse and call an HTTP API from its OpenAPI description
#[derive(Parser, Debug, Default)]
#[command(name = APP_NAME, version, about)]
pub struct Cli {
    /// OpenAPI description URL (http/https); a service root gets /openapi.json appended
    /// [env: SPECDECK_SPEC_URL]
    #[arg(long)]
    pub spec_url: Option<String>,

    /// Path to a local OpenAPI description (JSON or YAML) [env: SPECDECK_SPEC_FILE]
    #[arg(long)]
    pub spec_file: Option<PathBuf>,

    /// Base URL for executing requests (e.g. http://localhost:8000)
    #[arg(long, env = ENV_BASE_URL)]
    pub base_url: Option<String>,
}

/// Resolved runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub spec: SpecSource,
    /// Explicit base URL; when absent it is derived from the description
    pub base_url: Option<String>,
    /// Command line used to edit JSON bodies
    pub editor: String,
    /// Write a debug log to the temp directory
    pub debug_log: bool,
}

/// Environment values consulted after the flags
#[derive(Debug, Default)]
struct EnvVars {
    spec_url: Option<String>,
    spec_file: Option<String>,
    debug: Option<String>,
    editor: Option<String>,
    fallback_editor: Option<String>,
}

impl EnvVars {
    fn from_process() -> Self {
        EnvVars {
            spec_url: std::env::var(ENV_SPEC_URL).ok(),
            spec_file: std::env::var(ENV_SPEC_FILE).ok(),
            debug: std::env::var(ENV_DEBUG).ok(),
            editor: std::env::var(ENV_EDITOR).ok(),
            fallback_editor: std::env::var("EDITOR").ok(),
        }
    }
}

impl Config {
    /// Resolve the parsed flags together with the process environment
    pub fn from_cli(cli: Cli) -> Result<Config, ConfigError> {
        Config::resolve(cli, EnvVars::from_process())
    }

    fn resolve(cli: Cli, env: EnvVars) -> Result<Config, ConfigError> {
        // Flags win over the environment. Flags prefer the URL, the environment prefers the file.
        let flag_file = cli
            .spec_file
            .filter(|p| !p.as_os_str().is_empty() && !p.to_string_lossy().trim().is_empty());
        let spec = if let Some(url) = non_blank(cli.spec_url) {
            SpecSource::parse_url(&url)?
        } else if let Some(path) = flag_file {
            SpecSource::File(path)
        } else if let Some(path) = non_blank(env.spec_file) {
            SpecSource::File(PathBuf::from(path))
        } else if let Some(url) = non_blank(env.spec_url) {
            SpecSource::parse_url(&url)?
        } else {
            return Err(ConfigError::MissingSpec);
        };

        let editor = non_blank(env.editor)
            .or_else(|| non_blank(env.fallback_editor))
            .unwrap_or_else(|| FALLBACK_EDITOR.to_string());

        Ok(Config {
            spec,
            base_url: cli.base_url.as_deref().and_then(normalize_base_url),
            editor,
            debug_log: env.debug.map(|v| v.trim() == "1").unwrap_or(false),
        })
    }
}

/// Trims, strips trailing slashes and adds `http://` when no scheme is given.
pub fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Some(trimmed.to_string())
    } else {
        Some(format!("http://{}", trimmed))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
