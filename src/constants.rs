//! Application constants
//!
//! Centralized location for timeouts, environment variable names and defaults.

use std::time::Duration;

/// Application name
pub const APP_NAME: &str = "specdeck";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upper bound for fetching and parsing the API description at startup
pub const LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound for executing (or re-running) a request
pub const EXECUTE_TIMEOUT: Duration = Duration::from_secs(20);

/// Upper bound for a password-grant token exchange
pub const TOKEN_TIMEOUT: Duration = Duration::from_secs(10);

/// Document appended to a spec URL that points at a service root
pub const DEFAULT_SPEC_DOCUMENT: &str = "openapi.json";

pub const ENV_SPEC_URL: &str = "SPECDECK_SPEC_URL";
pub const ENV_SPEC_FILE: &str = "SPECDECK_SPEC_FILE";
pub const ENV_BASE_URL: &str = "SPECDECK_BASE_URL";
pub const ENV_DEBUG: &str = "SPECDECK_DEBUG";
pub const ENV_EDITOR: &str = "SPECDECK_EDITOR";

/// Log file written to the system temp directory when debug logging is on
pub const LOG_FILE_NAME: &str = "specdeck.log";

/// Editor used when neither `SPECDECK_EDITOR` nor `EDITOR` is set
pub const FALLBACK_EDITOR: &str = "vi";
