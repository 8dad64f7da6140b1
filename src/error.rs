//! Error types for autorun operations.

use crate::platform::macos::ScriptError;
use crate::process::CommandError;
use thiserror::Error;

/// Underlying reason an adapter could not complete an operation.
#[derive(Debug, Error)]
pub enum Cause {
    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Errors returned by [`Autorun`](crate::Autorun) operations.
///
/// Every variant carries the platform identifier it was raised on. Expected
/// "not set" conditions are never errors; they resolve to `Ok(false)`.
#[derive(Debug, Error)]
pub enum AutorunError {
    /// The current platform has no autostart backend
    #[error("Your platform \"{platform}\" is not supported")]
    PlatformUnsupported { platform: String },

    /// The login-item store could not be queried
    #[error("Could not check if autostart was set on {platform}")]
    IsSetFailed {
        platform: String,
        #[source]
        cause: Option<Cause>,
    },

    /// The entry could not be created. No cause means the executable is missing.
    #[error("Could not enable autorun on {platform}")]
    EnableFailed {
        platform: String,
        #[source]
        cause: Option<Cause>,
    },

    /// The entry could not be removed
    #[error("Could not disable autorun on {platform}")]
    DisableFailed {
        platform: String,
        #[source]
        cause: Option<Cause>,
    },
}

impl AutorunError {
    /// Stable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlatformUnsupported { .. } => "PlatformUnsupported",
            Self::IsSetFailed { .. } => "AutorunIsSetFailed",
            Self::EnableFailed { .. } => "AutorunEnableFailed",
            Self::DisableFailed { .. } => "AutorunDisableFailed",
        }
    }

    /// Platform identifier the error was raised on
    pub fn platform(&self) -> &str {
        match self {
            Self::PlatformUnsupported { platform }
            | Self::IsSetFailed { platform, .. }
            | Self::EnableFailed { platform, .. }
            | Self::DisableFailed { platform, .. } => platform,
        }
    }

    /// Underlying cause, if the failure came from an external call
    pub fn cause(&self) -> Option<&Cause> {
        match self {
            Self::PlatformUnsupported { .. } => None,
            Self::IsSetFailed { cause, .. }
            | Self::EnableFailed { cause, .. }
            | Self::DisableFailed { cause, .. } => cause.as_ref(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AutorunError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_kind_and_platform() {
        let err = AutorunError::PlatformUnsupported {
            platform: "linux".to_string(),
        };
        assert_eq!(err.kind(), "PlatformUnsupported");
        assert_eq!(err.platform(), "linux");
        assert_eq!(err.to_string(), "Your platform \"linux\" is not supported");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_cause_is_exposed_as_source() {
        let err = AutorunError::DisableFailed {
            platform: "windows".to_string(),
            cause: Some(Cause::Command(CommandError::ChildProcessFailed {
                output: "ERROR: Access is denied.\r\n".to_string(),
                exit_code: Some(0),
            })),
        };
        assert_eq!(err.kind(), "AutorunDisableFailed");
        assert!(err.cause().is_some());
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("ChildProcess failed: ERROR: Access is denied.".to_string())
        );
    }

    #[test]
    fn test_enable_failed_without_cause() {
        let err = AutorunError::EnableFailed {
            platform: "macos".to_string(),
            cause: None,
        };
        assert_eq!(err.kind(), "AutorunEnableFailed");
        assert!(err.cause().is_none());
        assert!(err.source().is_none());
    }
}
