//! Centralized configuration for wineshortcut.
//!
//! Holds the fixed constants of the launcher format and the option layer:
//! a configuration file supplies defaults, command-line flags override them.

use crate::error::{Result, ShortcutError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const CONFIG_FILE_NAME: &'static str = "wineshortcut.json";
}

/// Fixed values written into every launcher.
pub struct EntryConfig;

impl EntryConfig {
    pub const SHORTCUT_EXTENSION: &'static str = "desktop";
    pub const CATEGORY_NAMESPACE: &'static str = "Wine";
    pub const COMMENT: &'static str = "Windows application run through Wine";
    pub const DEFAULT_WINE: &'static str = "wine";
    pub const LAUNCHER_ARGS: &'static str = "start /unix";
}

/// External icon tool configuration.
pub struct IconConfig;

impl IconConfig {
    pub const DEFAULT_TOOL: &'static str = "wrestool";
    pub const ICON_EXTENSION: &'static str = "png";
    pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(30);
    /// Resource kinds that may be extracted as the launcher icon.
    pub const ACCEPTED_KINDS: [&'static str; 2] = ["group_icon", "png"];
}

/// Shared directory names.
pub struct PathsConfig;

impl PathsConfig {
    /// Menu folder relative to `~/.local/share/applications`.
    pub const MENU_SUBDIR: [&'static str; 2] = ["wine", "Programs"];
}

/// Every option, keyed by the long flag name.
///
/// Used for both layers: the parsed command line and the on-disk file. A
/// `None` field means "not given in this layer".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Options {
    pub output: Option<PathBuf>,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub no_icon: Option<bool>,
    pub strict_icon: Option<bool>,
    pub categories: Option<String>,
    pub prefix: Option<PathBuf>,
    pub desktop: Option<bool>,
    pub menu: Option<bool>,
    pub print: Option<bool>,
    pub wine: Option<String>,
    pub tool: Option<String>,
    pub tool_timeout: Option<u64>,
}

impl Options {
    /// Load options from a JSON file.
    ///
    /// A missing file is not an error and yields `Ok(None)`.
    pub fn load_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            debug!("No configuration file at {}", path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ShortcutError::config(format!("unreadable: {}", e), path))?;
        let options = serde_json::from_str(&content)
            .map_err(|e| ShortcutError::config(e.to_string(), path))?;

        debug!("Loaded configuration from {}", path.display());
        Ok(Some(options))
    }

    /// Load options from an explicitly requested file, which must exist.
    pub fn load_required(path: &Path) -> Result<Self> {
        Self::load_file(path)?
            .ok_or_else(|| ShortcutError::config("file does not exist", path))
    }

    /// Load `wineshortcut.json` from the given working directory, if present.
    pub fn discover(cwd: &Path) -> Result<Option<Self>> {
        Self::load_file(&cwd.join(AppConfig::CONFIG_FILE_NAME))
    }

    /// Merge two layers: values in `self` win, gaps are filled from `fallback`.
    ///
    /// `icon` and `no-icon` form one setting: if either is given in `self`,
    /// both are taken from `self`.
    pub fn or(self, fallback: Options) -> Options {
        let (icon, no_icon) = if self.icon.is_some() || self.no_icon.is_some() {
            (self.icon, self.no_icon)
        } else {
            (fallback.icon, fallback.no_icon)
        };

        Options {
            output: self.output.or(fallback.output),
            name: self.name.or(fallback.name),
            icon,
            no_icon,
            strict_icon: self.strict_icon.or(fallback.strict_icon),
            categories: self.categories.or(fallback.categories),
            prefix: self.prefix.or(fallback.prefix),
            desktop: self.desktop.or(fallback.desktop),
            menu: self.menu.or(fallback.menu),
            print: self.print.or(fallback.print),
            wine: self.wine.or(fallback.wine),
            tool: self.tool.or(fallback.tool),
            tool_timeout: self.tool_timeout.or(fallback.tool_timeout),
        }
    }
}

/// Merge command-line flags over file-supplied values.
pub fn merge(flags: Options, file: Option<Options>) -> Options {
    match file {
        Some(file) => flags.or(file),
        None => flags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Options::discover(temp_dir.path()).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_file_keys_match_flag_names() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(AppConfig::CONFIG_FILE_NAME),
            r#"{ "categories": "Game", "no-icon": true, "tool-timeout": 5, "prefix": "/p" }"#,
        )
        .unwrap();

        let options = Options::discover(temp_dir.path()).unwrap().unwrap();
        assert_eq!(options.categories.as_deref(), Some("Game"));
        assert_eq!(options.no_icon, Some(true));
        assert_eq!(options.tool_timeout, Some(5));
        assert_eq!(options.prefix, Some(PathBuf::from("/p")));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(AppConfig::CONFIG_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();

        let err = Options::load_file(&path).unwrap_err();
        assert!(matches!(err, ShortcutError::Config { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_unknown_key_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(AppConfig::CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{ "destkop": true }"#).unwrap();

        assert!(Options::load_file(&path).is_err());
    }

    #[test]
    fn test_required_file_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let err = Options::load_required(&temp_dir.path().join("other.json")).unwrap_err();
        assert!(matches!(err, ShortcutError::Config { .. }));
    }

    #[test]
    fn test_flags_override_file() {
        let flags = Options {
            name: Some("Flag Name".into()),
            menu: Some(true),
            ..Default::default()
        };
        let file = Options {
            name: Some("File Name".into()),
            categories: Some("Game".into()),
            menu: Some(false),
            ..Default::default()
        };

        let merged = merge(flags, Some(file));
        assert_eq!(merged.name.as_deref(), Some("Flag Name"));
        assert_eq!(merged.categories.as_deref(), Some("Game"));
        assert_eq!(merged.menu, Some(true));
        assert_eq!(merged.desktop, None);
    }

    #[test]
    fn test_flag_icon_overrides_file_no_icon() {
        let flags = Options {
            icon: Some("wine".into()),
            ..Default::default()
        };
        let file = Options {
            no_icon: Some(true),
            ..Default::default()
        };

        let merged = merge(flags, Some(file));
        assert_eq!(merged.icon.as_deref(), Some("wine"));
        assert_eq!(merged.no_icon, None);
    }

    #[test]
    fn test_flag_no_icon_overrides_file_icon() {
        let flags = Options {
            no_icon: Some(true),
            ..Default::default()
        };
        let file = Options {
            icon: Some("wine".into()),
            ..Default::default()
        };

        let merged = merge(flags, Some(file));
        assert_eq!(merged.icon, None);
        assert_eq!(merged.no_icon, Some(true));
    }

    #[test]
    fn test_file_icon_used_without_icon_flags() {
        let flags = Options {
            menu: Some(true),
            ..Default::default()
        };
        let file = Options {
            icon: Some("wine".into()),
            ..Default::default()
        };

        let merged = merge(flags, Some(file));
        assert_eq!(merged.icon.as_deref(), Some("wine"));
    }
}
