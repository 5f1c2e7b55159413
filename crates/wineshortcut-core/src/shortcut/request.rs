//! The shortcut request value object.

use crate::config::{EntryConfig, IconConfig, Options};
use crate::error::{Result, ShortcutError};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How the launcher icon is obtained.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IconPolicy {
    /// Extract the icon embedded in the executable.
    #[default]
    Auto,
    /// Emit no `Icon=` line.
    Skip,
    /// Use this file, or embed the value literally as a theme icon name.
    Path(String),
}

/// Everything needed to build one launcher. Immutable once resolved.
#[derive(Debug, Clone)]
pub struct ShortcutRequest {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub name: Option<String>,
    pub icon: IconPolicy,
    /// Treat an explicit icon path that does not exist as "no icon" instead
    /// of embedding it literally.
    pub strict_icon: bool,
    pub categories: Option<String>,
    pub prefix: Option<PathBuf>,
    pub desktop: bool,
    pub menu: bool,
    pub dry_run: bool,
    pub wine: String,
    pub tool: String,
    pub tool_timeout: Duration,
    /// Fallback destination when none is requested.
    pub cwd: PathBuf,
}

impl ShortcutRequest {
    /// Build a request from merged options, applying defaults.
    ///
    /// Relative paths are resolved against `cwd`. Fails if the input
    /// executable does not exist.
    pub fn resolve(input: &Path, options: Options, cwd: &Path) -> Result<Self> {
        let input = absolutize(input, cwd);
        if !input.is_file() {
            return Err(ShortcutError::InputNotFound(input));
        }

        let icon = if options.no_icon.unwrap_or(false) {
            IconPolicy::Skip
        } else {
            match options.icon {
                Some(icon) => IconPolicy::Path(icon),
                None => IconPolicy::Auto,
            }
        };

        Ok(Self {
            input,
            output: options.output.map(|p| absolutize(&p, cwd)),
            name: options.name,
            icon,
            strict_icon: options.strict_icon.unwrap_or(false),
            categories: options.categories,
            prefix: options.prefix.map(|p| absolutize(&p, cwd)),
            desktop: options.desktop.unwrap_or(false),
            menu: options.menu.unwrap_or(false),
            dry_run: options.print.unwrap_or(false),
            wine: options
                .wine
                .unwrap_or_else(|| EntryConfig::DEFAULT_WINE.to_string()),
            tool: options
                .tool
                .unwrap_or_else(|| IconConfig::DEFAULT_TOOL.to_string()),
            tool_timeout: options
                .tool_timeout
                .map(Duration::from_secs)
                .unwrap_or(IconConfig::DEFAULT_TOOL_TIMEOUT),
            cwd: cwd.to_path_buf(),
        })
    }

    /// Basename of the executable, e.g. `App.exe`.
    pub fn exe_name(&self) -> String {
        self.input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File stem of the executable, e.g. `App`.
    pub fn exe_stem(&self) -> String {
        self.input
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Name shown in menus: the custom name, else the executable's stem.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => self.exe_stem(),
        }
    }

    /// Directory the executable lives in, used as the working directory.
    pub fn working_dir(&self) -> &Path {
        self.input.parent().unwrap_or(Path::new("/"))
    }

    /// Deterministic location of an extracted icon: `<dir>/<stem>.png`.
    pub fn icon_output_path(&self) -> PathBuf {
        self.working_dir()
            .join(format!("{}.{}", self.exe_stem(), IconConfig::ICON_EXTENSION))
    }

    /// File name of the written launcher, e.g. `App.desktop`.
    pub fn shortcut_file_name(&self) -> String {
        let safe: String = self
            .display_name()
            .chars()
            .map(|c| if c == '/' || c == '\\' { '-' } else { c })
            .collect();
        format!("{}.{}", safe, EntryConfig::SHORTCUT_EXTENSION)
    }
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
