//! Autorun Library
//!
//! Enable, disable and query "launch at login" registration for an
//! application:
//! - macOS: a "System Events" login item, identified by executable path
//! - Windows: a value under `HKCU\Software\Microsoft\Windows\CurrentVersion\Run`,
//!   identified by app name
//!
//! To get reliable results always use the same app name and executable path,
//! since each platform matches entries by a different one of the two.
//!
//! # Example
//!
//! ```no_run
//! use autorun::Autorun;
//!
//! #[tokio::main]
//! async fn main() -> autorun::Result<()> {
//!     let autorun = Autorun::new(Some("MyApp"), Some("/Applications/MyApp.app"));
//!
//!     if autorun.is_platform_supported() && !autorun.is_set().await? {
//!         autorun.enable().await?;
//!     }
//!
//!     Ok(())
//! }
//! ```

mod autorun;
pub mod config;
pub mod error;
pub mod identity;
pub mod platform;
pub mod process;

#[cfg(test)]
mod fakes;

// Re-export commonly used types
pub use autorun::{Autorun, AutorunBuilder, DEFAULT_APP_NAME};
pub use config::{load_autorun_config, AutorunConfig, ConfigSource};
pub use error::{AutorunError, Cause, Result};
pub use platform::{AutorunBackend, Binding, Platform};
pub use process::{CommandError, CommandOutput, CommandRunner, ProcessRunner};
