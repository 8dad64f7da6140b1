//! macOS login items via AppleScript and "System Events".
//!
//! Login items are identified by executable path only. System Events ignores
//! any name given on creation and derives it from the path (the executable or
//! bundle name), so the app name plays no part here.

use super::{AutorunBackend, Binding};
use crate::error::{AutorunError, Cause, Result};
use crate::process::{CommandError, CommandRunner};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors from running an AppleScript
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("osascript exited with status {0}")]
    ExitStatus(i32),

    #[error("Unexpected script result: {0:?}")]
    UnexpectedOutput(String),
}

/// Executes an AppleScript source string and returns its textual result.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    async fn exec(&self, script: &str) -> std::result::Result<String, ScriptError>;
}

/// [`ScriptRunner`] that shells out to `osascript -e <script>`
pub struct Osascript {
    runner: Arc<dyn CommandRunner>,
}

impl Osascript {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl ScriptRunner for Osascript {
    async fn exec(&self, script: &str) -> std::result::Result<String, ScriptError> {
        let args = vec!["-e".to_string(), script.to_string()];
        let output = self.runner.run("osascript", &args).await?;
        if !output.success() {
            return Err(ScriptError::ExitStatus(output.exit_code));
        }
        Ok(output.stdout.trim().to_string())
    }
}

/// Quote `value` as an AppleScript string literal.
pub fn quote_applescript(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '\\' || c == '"' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Returns 1 if a login item with `path` exists, 0 otherwise.
pub fn is_set_script(path: &str) -> String {
    format!(
        "tell application \"System Events\"\n\
         set loginList to get the properties of every login item\n\
         repeat with loginItem in loginList\n\
         if path of loginItem is equal to {} then\n\
         return 1\n\
         end if\n\
         end repeat\n\
         return 0\n\
         end tell",
        quote_applescript(path)
    )
}

/// Appends a visible login item for `path`.
pub fn enable_script(path: &str) -> String {
    format!(
        "tell application \"System Events\" to make login item at end \
         with properties {{path:{}, hidden:false}}",
        quote_applescript(path)
    )
}

/// Deletes the first login item with `path`. Returns 1 if one was deleted, 0 otherwise.
pub fn disable_script(path: &str) -> String {
    format!(
        "tell application \"System Events\"\n\
         set loginList to get the properties of every login item\n\
         repeat with loginItem in loginList\n\
         if path of loginItem is equal to {} then\n\
         set loginItemName to name of loginItem\n\
         delete login item loginItemName\n\
         return 1\n\
         end if\n\
         end repeat\n\
         return 0\n\
         end tell",
        quote_applescript(path)
    )
}

fn parse_flag(output: &str) -> Option<bool> {
    match output.trim() {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}

/// Path-keyed login-item backend
pub struct MacOsLoginItems {
    platform: String,
    scripts: Arc<dyn ScriptRunner>,
}

impl MacOsLoginItems {
    pub fn new(platform: impl Into<String>, scripts: Arc<dyn ScriptRunner>) -> Self {
        Self {
            platform: platform.into(),
            scripts,
        }
    }

    /// Whether any login item points at exactly `path`
    pub async fn is_set(&self, path: &str) -> Result<bool> {
        let output = self
            .scripts
            .exec(&is_set_script(path))
            .await
            .map_err(|e| self.is_set_failed(e))?;

        match parse_flag(&output) {
            Some(found) => {
                tracing::debug!("Login item for {} present: {}", path, found);
                Ok(found)
            }
            None => Err(self.is_set_failed(ScriptError::UnexpectedOutput(output))),
        }
    }

    /// Add a login item for `path`.
    ///
    /// Does not check for an existing item, so calling this twice leaves two
    /// entries behind.
    pub async fn enable(&self, path: &str) -> Result<bool> {
        if tokio::fs::metadata(path).await.is_err() {
            tracing::warn!("Refusing to add login item, {} does not exist", path);
            return Err(AutorunError::EnableFailed {
                platform: self.platform.clone(),
                cause: None,
            });
        }

        self.scripts
            .exec(&enable_script(path))
            .await
            .map_err(|e| AutorunError::EnableFailed {
                platform: self.platform.clone(),
                cause: Some(Cause::Script(e)),
            })?;

        tracing::debug!("Added login item for {}", path);
        Ok(true)
    }

    /// Remove the first login item pointing at `path`
    pub async fn disable(&self, path: &str) -> Result<bool> {
        let output = self
            .scripts
            .exec(&disable_script(path))
            .await
            .map_err(|e| AutorunError::DisableFailed {
                platform: self.platform.clone(),
                cause: Some(Cause::Script(e)),
            })?;

        let removed = parse_flag(&output).unwrap_or(false);
        tracing::debug!("Login item for {} removed: {}", path, removed);
        Ok(removed)
    }

    fn is_set_failed(&self, e: ScriptError) -> AutorunError {
        AutorunError::IsSetFailed {
            platform: self.platform.clone(),
            cause: Some(Cause::Script(e)),
        }
    }
}

#[async_trait]
impl AutorunBackend for MacOsLoginItems {
    fn identity<'a>(&self, binding: &'a Binding) -> &'a str {
        &binding.executable_path
    }

    async fn is_set(&self, binding: &Binding) -> Result<bool> {
        MacOsLoginItems::is_set(self, &binding.executable_path).await
    }

    async fn enable(&self, binding: &Binding) -> Result<bool> {
        MacOsLoginItems::enable(self, &binding.executable_path).await
    }

    async fn disable(&self, binding: &Binding) -> Result<bool> {
        MacOsLoginItems::disable(self, &binding.executable_path).await
    }
}
