//! Windows startup entries in the current user's `Run` registry key.
//!
//! Entries are identified by value name (the app name); the value data is
//! the executable path. All access goes through the `reg` command-line tool.

use super::{AutorunBackend, Binding};
use crate::error::{AutorunError, Cause, Result};
use crate::process::{CommandError, CommandOutput, CommandRunner};
use async_trait::async_trait;
use std::sync::Arc;

/// Startup key of the current user
pub const RUN_KEY: &str = r"HKEY_CURRENT_USER\Software\Microsoft\Windows\CurrentVersion\Run";

/// Registry tool invoked for every operation
pub const REG_TOOL: &str = "reg";

/// Where startup values are read from and written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryTarget {
    pub tool: String,
    pub key: String,
}

impl Default for RegistryTarget {
    fn default() -> Self {
        Self {
            tool: REG_TOOL.to_string(),
            key: RUN_KEY.to_string(),
        }
    }
}

impl RegistryTarget {
    pub fn query_args(&self, app_name: &str) -> Vec<String> {
        to_args(&["QUERY", &self.key, "/v", app_name])
    }

    pub fn add_args(&self, app_name: &str, path: &str) -> Vec<String> {
        to_args(&[
            "ADD", &self.key, "/f", "/v", app_name, "/t", "REG_SZ", "/d", path,
        ])
    }

    pub fn delete_args(&self, app_name: &str) -> Vec<String> {
        to_args(&["DELETE", &self.key, "/f", "/v", app_name])
    }
}

fn to_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}

/// `reg` reports errors on stderr together with a non-zero exit code.
/// A command that ran and exited non-zero is an answer (`false`); anything
/// else is a failure to run it.
fn exit_status(
    result: std::result::Result<CommandOutput, CommandError>,
) -> std::result::Result<bool, CommandError> {
    match result {
        Ok(output) => Ok(output.success()),
        Err(e) if e.exit_code().is_some_and(|code| code != 0) => {
            tracing::debug!("reg exited non-zero: {}", e);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Name-keyed registry backend
pub struct WindowsRunKey {
    platform: String,
    runner: Arc<dyn CommandRunner>,
    target: RegistryTarget,
}

impl WindowsRunKey {
    pub fn new(
        platform: impl Into<String>,
        runner: Arc<dyn CommandRunner>,
        target: RegistryTarget,
    ) -> Self {
        Self {
            platform: platform.into(),
            runner,
            target,
        }
    }

    /// Whether a value named `app_name` exists. Any failure reads as `false`.
    pub async fn is_set(&self, app_name: &str) -> Result<bool> {
        let result = self
            .runner
            .run(&self.target.tool, &self.target.query_args(app_name))
            .await;

        match result {
            Ok(output) => Ok(output.success()),
            Err(e) => {
                tracing::debug!("Treating failed query for {} as not set: {}", app_name, e);
                Ok(false)
            }
        }
    }

    /// Create or overwrite the value `app_name` with `path`
    pub async fn enable(&self, app_name: &str, path: &str) -> Result<bool> {
        let result = self
            .runner
            .run(&self.target.tool, &self.target.add_args(app_name, path))
            .await;

        let added = exit_status(result).map_err(|e| AutorunError::EnableFailed {
            platform: self.platform.clone(),
            cause: Some(Cause::Command(e)),
        })?;
        tracing::debug!("Registry value {} -> {} added: {}", app_name, path, added);
        Ok(added)
    }

    /// Delete the value `app_name`
    pub async fn disable(&self, app_name: &str) -> Result<bool> {
        let result = self
            .runner
            .run(&self.target.tool, &self.target.delete_args(app_name))
            .await;

        let deleted = exit_status(result).map_err(|e| AutorunError::DisableFailed {
            platform: self.platform.clone(),
            cause: Some(Cause::Command(e)),
        })?;
        tracing::debug!("Registry value {} deleted: {}", app_name, deleted);
        Ok(deleted)
    }
}

#[async_trait]
impl AutorunBackend for WindowsRunKey {
    fn identity<'a>(&self, binding: &'a Binding) -> &'a str {
        &binding.app_name
    }

    async fn is_set(&self, binding: &Binding) -> Result<bool> {
        WindowsRunKey::is_set(self, &binding.app_name).await
    }

    async fn enable(&self, binding: &Binding) -> Result<bool> {
        WindowsRunKey::enable(self, &binding.app_name, &binding.executable_path).await
    }

    async fn disable(&self, binding: &Binding) -> Result<bool> {
        WindowsRunKey::disable(self, &binding.app_name).await
    }
}
