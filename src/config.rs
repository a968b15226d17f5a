//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$PFF2EML_CONFIG` (environment variable)
//! 2. `~/.config/pff2eml/config.toml` (Linux/macOS)
//!    `%APPDATA%\pff2eml\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Names used by the export utility for messages and their resources.
    pub layout: LayoutConfig,
    /// Output file settings.
    pub output: OutputConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Override directory for the log file.
    pub log_dir: Option<PathBuf>,
}

/// The export tree's naming contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Entries whose name starts with this are exported messages.
    pub message_prefix: String,
    /// Entries whose name starts with this are calendar items and are skipped.
    pub meeting_prefix: String,
    /// Raw header block inside a message folder. Required.
    pub headers_file: String,
    /// HTML body inside a message folder.
    pub html_file: String,
    /// Plain-text body, used only when there is no HTML body.
    pub text_file: String,
    /// Attachments collection inside a message folder.
    pub attachments_dir: String,
}

/// Output file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Extension of generated message files, without the dot.
    pub extension: String,
    /// How many leading bytes of an HTML body are searched for a charset declaration.
    pub charset_sniff_len: usize,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_dir: None,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            message_prefix: "Message".to_string(),
            meeting_prefix: "Meeting".to_string(),
            headers_file: "InternetHeaders.txt".to_string(),
            html_file: "Message.html".to_string(),
            text_file: "Message.txt".to_string(),
            attachments_dir: "Attachments".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: "eml".to_string(),
            charset_sniff_len: 1024,
        }
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("PFF2EML_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("pff2eml").join("config.toml"))
}

/// Return the directory the log file is written to.
pub fn log_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.log_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pff2eml")
}
