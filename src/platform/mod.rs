//! Platform backends for autostart registration.
//!
//! - macOS: "System Events" login items, keyed by executable path
//! - Windows: the current user's `Run` registry key, keyed by app name
//!
//! Anything else gets [`Unsupported`], which fails every operation before
//! touching the system.

pub mod macos;
pub mod windows;

pub use macos::{MacOsLoginItems, Osascript, ScriptError, ScriptRunner};
pub use windows::{RegistryTarget, WindowsRunKey};

use crate::error::{AutorunError, Result};
use crate::process::CommandRunner;
use async_trait::async_trait;
use std::sync::Arc;

/// Platform identifier of the running process
pub fn current_platform() -> &'static str {
    std::env::consts::OS
}

/// Supported autostart mechanisms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Unsupported(String),
}

impl Platform {
    /// Exact match for macOS, prefix match for Windows.
    pub fn from_identifier(identifier: &str) -> Self {
        if identifier == "macos" {
            Platform::MacOs
        } else if identifier.starts_with("win") {
            Platform::Windows
        } else {
            Platform::Unsupported(identifier.to_string())
        }
    }

    pub fn current() -> Self {
        Self::from_identifier(current_platform())
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Platform::Unsupported(_))
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::MacOs => write!(f, "macos"),
            Platform::Windows => write!(f, "windows"),
            Platform::Unsupported(id) => write!(f, "{}", id),
        }
    }
}

/// The `(app name, executable path)` pair one [`Autorun`](crate::Autorun) is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub app_name: String,
    pub executable_path: String,
}

/// One platform's implementation of the autostart contract
#[async_trait]
pub trait AutorunBackend: Send + Sync {
    /// The string this backend matches entries by
    fn identity<'a>(&self, binding: &'a Binding) -> &'a str;

    async fn is_set(&self, binding: &Binding) -> Result<bool>;

    async fn enable(&self, binding: &Binding) -> Result<bool>;

    async fn disable(&self, binding: &Binding) -> Result<bool>;
}

/// Backend for platforms without an autostart mechanism
#[derive(Debug, Clone)]
pub struct Unsupported {
    platform: String,
}

impl Unsupported {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
        }
    }

    fn error(&self) -> AutorunError {
        AutorunError::PlatformUnsupported {
            platform: self.platform.clone(),
        }
    }
}

#[async_trait]
impl AutorunBackend for Unsupported {
    fn identity<'a>(&self, binding: &'a Binding) -> &'a str {
        &binding.app_name
    }

    async fn is_set(&self, _binding: &Binding) -> Result<bool> {
        Err(self.error())
    }

    async fn enable(&self, _binding: &Binding) -> Result<bool> {
        Err(self.error())
    }

    async fn disable(&self, _binding: &Binding) -> Result<bool> {
        Err(self.error())
    }
}

/// Pick the backend for `identifier`. Windows runs `reg` through `runner`,
/// macOS runs its scripts through `scripts`.
pub(crate) fn select_backend(
    identifier: &str,
    runner: Arc<dyn CommandRunner>,
    scripts: Arc<dyn ScriptRunner>,
) -> Arc<dyn AutorunBackend> {
    match Platform::from_identifier(identifier) {
        Platform::MacOs => Arc::new(MacOsLoginItems::new(identifier, scripts)),
        Platform::Windows => Arc::new(WindowsRunKey::new(
            identifier,
            runner,
            RegistryTarget::default(),
        )),
        Platform::Unsupported(platform) => Arc::new(Unsupported::new(platform)),
    }
}
