//! Default executable path detection
//!
//! Used only when no executable path is configured. On macOS the login item
//! should point at the enclosing `.app` bundle rather than the binary inside it.

use crate::platform::Platform;
use std::path::Path;

/// Best guess of the running application's location on `platform`.
pub fn default_executable_path(platform: &Platform, cwd: &str, current_exe: &str) -> String {
    match platform {
        Platform::MacOs => match cwd.find(".app") {
            Some(idx) => cwd[..idx + ".app".len()].to_string(),
            None => cwd.to_string(),
        },
        Platform::Windows => current_exe.to_string(),
        Platform::Unsupported(_) => cwd.to_string(),
    }
}

/// [`default_executable_path`] for the running process
pub fn detect_executable_path(platform: &Platform) -> String {
    let cwd = std::env::current_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default();
    let exe = std::env::current_exe()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default();

    let path = default_executable_path(platform, &cwd, &exe);
    tracing::debug!("Detected executable path {:?} for {}", path, platform);
    path
}

/// Whether `path` names something that exists on disk
pub fn path_exists(path: &str) -> bool {
    Path::new(path).exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macos_uses_enclosing_bundle() {
        assert_eq!(
            default_executable_path(
                &Platform::MacOs,
                "/Applications/Test.app/Contents/MacOS",
                "/Applications/Test.app/Contents/MacOS/test"
            ),
            "/Applications/Test.app"
        );
    }

    #[test]
    fn test_macos_picks_outermost_bundle() {
        assert_eq!(
            default_executable_path(
                &Platform::MacOs,
                "/Applications/Outer.app/Contents/Helpers/Inner.app/Contents",
                ""
            ),
            "/Applications/Outer.app"
        );
    }

    #[test]
    fn test_macos_without_bundle_uses_cwd() {
        assert_eq!(
            default_executable_path(&Platform::MacOs, "/Users/me/project", "/usr/local/bin/app"),
            "/Users/me/project"
        );
    }

    #[test]
    fn test_windows_uses_current_exe() {
        assert_eq!(
            default_executable_path(
                &Platform::Windows,
                r"C:\Users\me",
                r"C:\Program Files\Test\test.exe"
            ),
            r"C:\Program Files\Test\test.exe"
        );
    }

    #[test]
    fn test_other_platforms_use_cwd() {
        assert_eq!(
            default_executable_path(
                &Platform::Unsupported("linux".to_string()),
                "/home/me",
                "/usr/bin/app"
            ),
            "/home/me"
        );
    }

    #[test]
    fn test_path_exists() {
        let dir = tempfile::tempdir().unwrap();
        assert!(path_exists(&dir.path().to_string_lossy()));
        assert!(!path_exists("/no/such/file"));
    }
}
