//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.sage/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::AskMode;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SageConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub subjects: Vec<SubjectEntry>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_mode: Option<AskMode>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// A subject shortcut: pressing its function key prefills the input with
/// the prompt.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubjectEntry {
    pub label: String,
    pub prompt: Option<String>,
}

impl SubjectEntry {
    /// The text placed into the input box when this subject is picked.
    pub fn prompt_text(&self) -> String {
        self.prompt
            .clone()
            .unwrap_or_else(|| format!("Help me with {}", self.label))
    }
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Built-in subject cards, used when the config file defines none.
pub fn default_subjects() -> Vec<SubjectEntry> {
    ["Math", "Science", "History", "Literature"]
        .into_iter()
        .map(|label| SubjectEntry {
            label: label.to_string(),
            prompt: None,
        })
        .collect()
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub mode: AskMode,
    pub subjects: Vec<SubjectEntry>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.sage/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".sage").join("config.toml"))
}

/// Load config from `~/.sage/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `SageConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<SageConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(SageConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(SageConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: SageConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Sage Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_mode = "auto"              # "auto", "math" or "summary"

# [service]
# base_url = "http://127.0.0.1:5000" # Or set SAGE_ENDPOINT env var
# timeout_secs = 30

# [[subjects]]
# label = "Math"
# prompt = "Help me with Math"       # Defaults to "Help me with <label>"

# [[subjects]]
# label = "Chemistry"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// CLI overrides, already parsed by clap (None = flag not given).
#[derive(Debug, Default, Clone, Copy)]
pub struct CliOverrides<'a> {
    pub endpoint: Option<&'a str>,
    pub mode: Option<AskMode>,
    pub timeout_secs: Option<u64>,
}

/// Resolve the final config by collapsing: defaults → config file → env
/// vars → CLI.
pub fn resolve(config: &SageConfig, cli: CliOverrides<'_>) -> ResolvedConfig {
    // Endpoint: CLI → env → config → default
    let base_url = cli
        .endpoint
        .map(|s| s.to_string())
        .or_else(|| std::env::var("SAGE_ENDPOINT").ok())
        .or_else(|| config.service.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Timeout: CLI → env → config → default
    let timeout_secs = cli
        .timeout_secs
        .or_else(|| {
            std::env::var("SAGE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
        })
        .or(config.service.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    // Mode: CLI → env → config → default
    let mode = cli
        .mode
        .or_else(|| {
            std::env::var("SAGE_MODE")
                .ok()
                .and_then(|v| match v.as_str() {
                    "auto" => Some(AskMode::Auto),
                    "math" => Some(AskMode::Math),
                    "summary" => Some(AskMode::Summary),
                    _ => None,
                })
        })
        .or(config.general.default_mode)
        .unwrap_or_default();

    let subjects = if config.subjects.is_empty() {
        default_subjects()
    } else {
        config.subjects.clone()
    };

    ResolvedConfig {
        base_url,
        timeout_secs,
        mode,
        subjects,
    }
}
