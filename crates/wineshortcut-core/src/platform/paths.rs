//! Platform-specific path utilities.

use crate::config::PathsConfig;
use crate::error::{Result, ShortcutError};
use std::path::PathBuf;

/// Get the XDG applications directory.
///
/// # Platform Behavior
/// - **Linux**: `~/.local/share/applications`
/// - **Other**: not supported, desktop entries are an XDG concept
pub fn apps_dir() -> Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let data_dir = dirs::data_local_dir().ok_or_else(|| ShortcutError::Platform {
            message: "Could not determine local data directory".to_string(),
        })?;
        Ok(data_dir.join("applications"))
    }

    #[cfg(not(target_os = "linux"))]
    {
        Err(ShortcutError::Platform {
            message: "Application menu entries are only supported on Linux".to_string(),
        })
    }
}

/// Get the folder Wine uses for its own menu entries.
///
/// `~/.local/share/applications/wine/Programs`
pub fn menu_dir() -> Result<PathBuf> {
    let mut dir = apps_dir()?;
    for part in PathsConfig::MENU_SUBDIR {
        dir.push(part);
    }
    Ok(dir)
}

/// Get the user's desktop directory.
///
/// Uses the `dirs` crate, which honors `XDG_DESKTOP_DIR` on Linux.
pub fn desktop_dir() -> Result<PathBuf> {
    dirs::desktop_dir().ok_or_else(|| ShortcutError::Platform {
        message: "Could not determine desktop directory".to_string(),
    })
}

/// Check if a command exists in the system PATH.
///
/// # Platform Behavior
/// - **Linux/macOS**: Uses `which` command
/// - **Windows**: Uses `where` command
pub fn command_exists(cmd: &str) -> bool {
    #[cfg(unix)]
    {
        std::process::Command::new("which")
            .arg(cmd)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[cfg(windows)]
    {
        std::process::Command::new("where")
            .arg(cmd)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}
