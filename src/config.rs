//! Default binding configuration.
//!
//! Resolves the app name and executable path to use when the caller gives
//! none. The config file is only ever read.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Environment variable overriding the app name
pub const ENV_APP_NAME: &str = "AUTORUN_APP_NAME";

/// Environment variable overriding the executable path
pub const ENV_EXECUTABLE_PATH: &str = "AUTORUN_EXECUTABLE_PATH";

/// Configuration file structure
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub autorun: Option<AutorunSection>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AutorunSection {
    /// Registry value name on Windows (e.g., "MyApp")
    pub app_name: Option<String>,
    /// Login item target (e.g., "/Applications/MyApp.app")
    pub executable_path: Option<String>,
}

/// Where a setting came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Nothing configured, built-in defaults apply
    Default,
    /// Loaded from environment variable
    Environment,
    /// Loaded from config file
    ConfigFile,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::ConfigFile => write!(f, "config file"),
        }
    }
}

/// Resolved binding defaults. `None` leaves the choice to [`Autorun`](crate::Autorun).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutorunConfig {
    pub app_name: Option<String>,
    pub app_name_source: ConfigSource,
    pub executable_path: Option<String>,
    pub executable_path_source: ConfigSource,
}

impl Default for AutorunConfig {
    fn default() -> Self {
        Self {
            app_name: None,
            app_name_source: ConfigSource::Default,
            executable_path: None,
            executable_path_source: ConfigSource::Default,
        }
    }
}

/// Get the path to the configuration file
fn get_config_file_path() -> Option<PathBuf> {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .map(|p| p.join("autorun").join("config.toml"))
}

/// Parse configuration file content
pub fn parse_config(content: &str) -> Result<ConfigFile, toml::de::Error> {
    toml::from_str(content)
}

/// Load configuration from the config file
fn load_config_file() -> Option<ConfigFile> {
    let path = get_config_file_path()?;

    if !path.exists() {
        return None;
    }

    match fs::read_to_string(&path) {
        Ok(content) => match parse_config(&content) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                None
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read config file {:?}: {}", path, e);
            None
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn pick(env: Option<String>, file: Option<String>) -> (Option<String>, ConfigSource) {
    if let Some(value) = non_empty(env) {
        return (Some(value), ConfigSource::Environment);
    }
    if let Some(value) = non_empty(file) {
        return (Some(value), ConfigSource::ConfigFile);
    }
    (None, ConfigSource::Default)
}

/// Merge the sources, per field, with priority:
/// 1. Environment variables
/// 2. Config file
/// 3. Default (unset)
pub fn resolve_config(
    env_app_name: Option<String>,
    env_executable_path: Option<String>,
    file: Option<ConfigFile>,
) -> AutorunConfig {
    let section = file.and_then(|f| f.autorun).unwrap_or_default();

    let (app_name, app_name_source) = pick(env_app_name, section.app_name);
    let (executable_path, executable_path_source) =
        pick(env_executable_path, section.executable_path);

    AutorunConfig {
        app_name,
        app_name_source,
        executable_path,
        executable_path_source,
    }
}

/// Load the binding defaults for this process
pub fn load_autorun_config() -> AutorunConfig {
    let config = resolve_config(
        std::env::var(ENV_APP_NAME).ok(),
        std::env::var(ENV_EXECUTABLE_PATH).ok(),
        load_config_file(),
    );

    if let Some(name) = &config.app_name {
        tracing::info!("Using app name {:?} from {}", name, config.app_name_source);
    }
    if let Some(path) = &config.executable_path {
        tracing::info!(
            "Using executable path {:?} from {}",
            path,
            config.executable_path_source
        );
    }

    config
}

/// Get the path to the config file for documentation purposes
pub fn get_config_file_path_string() -> String {
    get_config_file_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "~/.config/autorun/config.toml".to_string())
}

/// Generate example config file content
pub fn generate_example_config() -> String {
    r#"# Autorun Configuration
# Place this file at: ~/.config/autorun/config.toml

[autorun]
# Name of the startup entry (used as the registry value name on Windows)
# Default: AutorunApp
# app_name = "MyApp"

# Program launched at login (identifies the login item on macOS)
# Default: detected from the running process
# executable_path = "/Applications/MyApp.app"
"#
    .to_string()
}
