//! The [`Autorun`] facade
//!
//! Binds an app name and executable path, picks the backend for the current
//! platform once, and forwards each operation to it.

use crate::config::AutorunConfig;
use crate::error::Result;
use crate::identity::detect_executable_path;
use crate::platform::{self, AutorunBackend, Binding, Osascript, Platform, ScriptRunner};
use crate::process::{CommandRunner, ProcessRunner};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// App name used when none is configured
pub const DEFAULT_APP_NAME: &str = "AutorunApp";

/// Launch-at-login registration for one application.
///
/// macOS identifies the entry by `executable_path`, Windows by `app_name`.
/// Keep both stable between runs or `is_set`/`disable` will not find what
/// `enable` created.
///
/// Each operation runs exactly one external command. Concurrent calls on
/// the same binding are not ordered against each other.
#[derive(Clone)]
pub struct Autorun {
    binding: Binding,
    platform: String,
    backend: Arc<dyn AutorunBackend>,
}

impl std::fmt::Debug for Autorun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Autorun")
            .field("binding", &self.binding)
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

impl Autorun {
    /// Bind to the running platform. Missing values fall back to
    /// [`DEFAULT_APP_NAME`] and the detected executable path.
    pub fn new(app_name: Option<&str>, executable_path: Option<&str>) -> Self {
        let mut builder = Self::builder();
        if let Some(name) = app_name {
            builder = builder.app_name(name);
        }
        if let Some(path) = executable_path {
            builder = builder.executable_path(path);
        }
        builder.build()
    }

    pub fn builder() -> AutorunBuilder {
        AutorunBuilder::default()
    }

    pub fn app_name(&self) -> &str {
        &self.binding.app_name
    }

    pub fn executable_path(&self) -> &str {
        &self.binding.executable_path
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Platform identifier this instance dispatches on
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// The string entries are matched by on this platform
    pub fn identity(&self) -> &str {
        self.backend.identity(&self.binding)
    }

    pub fn is_platform_supported(&self) -> bool {
        Platform::from_identifier(&self.platform).is_supported()
    }

    /// Whether an autostart entry for this binding exists
    pub async fn is_set(&self) -> Result<bool> {
        tracing::debug!("Checking autostart entry {:?} on {}", self.identity(), self.platform);
        self.backend.is_set(&self.binding).await
    }

    /// Register this binding to launch at login
    pub async fn enable(&self) -> Result<bool> {
        tracing::debug!("Enabling autostart entry {:?} on {}", self.identity(), self.platform);
        self.backend.enable(&self.binding).await
    }

    /// Remove this binding's autostart entry. `Ok(false)` if there was none.
    pub async fn disable(&self) -> Result<bool> {
        tracing::debug!("Disabling autostart entry {:?} on {}", self.identity(), self.platform);
        self.backend.disable(&self.binding).await
    }

    /// Run [`is_set`](Self::is_set) on the tokio runtime and hand the result to `callback`
    pub fn is_set_with<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<bool>) + Send + 'static,
    {
        let autorun = self.clone();
        tokio::spawn(async move { callback(autorun.is_set().await) })
    }

    /// Run [`enable`](Self::enable) on the tokio runtime and hand the result to `callback`
    pub fn enable_with<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<bool>) + Send + 'static,
    {
        let autorun = self.clone();
        tokio::spawn(async move { callback(autorun.enable().await) })
    }

    /// Run [`disable`](Self::disable) on the tokio runtime and hand the result to `callback`
    pub fn disable_with<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<bool>) + Send + 'static,
    {
        let autorun = self.clone();
        tokio::spawn(async move { callback(autorun.disable().await) })
    }
}

/// Builder for [`Autorun`]
#[derive(Default)]
pub struct AutorunBuilder {
    app_name: Option<String>,
    executable_path: Option<String>,
    platform: Option<String>,
    runner: Option<Arc<dyn CommandRunner>>,
    scripts: Option<Arc<dyn ScriptRunner>>,
}

impl AutorunBuilder {
    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn executable_path(mut self, executable_path: impl Into<String>) -> Self {
        self.executable_path = Some(executable_path.into());
        self
    }

    /// Fill in values not set explicitly from a loaded [`AutorunConfig`]
    pub fn config(mut self, config: &AutorunConfig) -> Self {
        if self.app_name.is_none() {
            self.app_name = config.app_name.clone();
        }
        if self.executable_path.is_none() {
            self.executable_path = config.executable_path.clone();
        }
        self
    }

    /// Dispatch as if running on `identifier` instead of the host platform
    pub fn platform(mut self, identifier: impl Into<String>) -> Self {
        self.platform = Some(identifier.into());
        self
    }

    /// Run external commands through `runner` instead of spawning processes
    pub fn command_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Run login-item scripts through `scripts` instead of `osascript`
    pub fn script_runner(mut self, scripts: Arc<dyn ScriptRunner>) -> Self {
        self.scripts = Some(scripts);
        self
    }

    pub fn build(self) -> Autorun {
        let platform = self
            .platform
            .unwrap_or_else(|| platform::current_platform().to_string());

        let app_name = self
            .app_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());
        let executable_path = self
            .executable_path
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| detect_executable_path(&Platform::from_identifier(&platform)));

        let runner: Arc<dyn CommandRunner> = self.runner.unwrap_or_else(|| Arc::new(ProcessRunner));
        let scripts: Arc<dyn ScriptRunner> = self
            .scripts
            .unwrap_or_else(|| Arc::new(Osascript::new(runner.clone())));

        Autorun {
            backend: platform::select_backend(&platform, runner, scripts),
            binding: Binding {
                app_name,
                executable_path,
            },
            platform,
        }
    }
}
