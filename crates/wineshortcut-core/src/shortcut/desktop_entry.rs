//! Desktop entry (.desktop file) generation.
//!
//! The launcher is rendered from a fixed template. Two kinds of omission are
//! handled separately: an absent icon removes the whole `Icon=` line, an
//! absent prefix removes only the `env WINEPREFIX=...` token from `Exec=`.

use super::request::ShortcutRequest;
use crate::config::EntryConfig;
use crate::error::{Result, ShortcutError};
use crate::platform;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

/// Launcher template. Placeholders are `{key}`.
pub const TEMPLATE: &str = "\
[Desktop Entry]
Version=1.0
Encoding=UTF-8
Name={name}
Exec={prefix}{launcher} \"{file}\"
Type=Application
StartupNotify=true
Path={path}
Icon={icon}
StartupWMClass={exe}
Comment={comment}
Categories={categories}
";

const ICON_PLACEHOLDER: &str = "{icon}";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([a-z]+)\}").unwrap());

/// A Wine launcher ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    /// Entry name (shown in menus).
    pub name: String,
    /// Wine command, e.g. `wine`.
    pub wine: String,
    /// Absolute path of the Windows executable.
    pub file: PathBuf,
    /// Working directory.
    pub path: PathBuf,
    /// Icon path or theme icon name.
    pub icon: Option<String>,
    /// StartupWMClass for window matching.
    pub exe: String,
    /// User categories, appended after the Wine namespace.
    pub categories: Option<String>,
    /// Wine prefix.
    pub prefix: Option<PathBuf>,
}

impl DesktopEntry {
    /// Create an entry for a request and an already resolved icon.
    pub fn from_request(request: &ShortcutRequest, icon: Option<String>) -> Self {
        Self {
            name: request.display_name(),
            wine: request.wine.clone(),
            file: request.input.clone(),
            path: request.working_dir().to_path_buf(),
            icon,
            exe: request.exe_name(),
            categories: request.categories.clone(),
            prefix: request.prefix.clone(),
        }
    }

    /// `env WINEPREFIX="<prefix>" ` or nothing at all.
    fn prefix_wrapper(&self) -> String {
        match self.prefix {
            Some(ref prefix) => format!("env WINEPREFIX=\"{}\" ", quoted_arg(prefix)),
            None => String::new(),
        }
    }

    fn launcher(&self) -> String {
        format!("{} {}", self.wine, EntryConfig::LAUNCHER_ARGS)
    }

    fn categories_value(&self) -> String {
        let user = self.categories.as_deref().unwrap_or("");
        format!("{};{}", EntryConfig::CATEGORY_NAMESPACE, user)
    }

    fn value(&self, key: &str) -> Option<String> {
        let value = match key {
            "name" => self.name.clone(),
            "prefix" => self.prefix_wrapper(),
            "launcher" => self.launcher(),
            "file" => quoted_arg(&self.file),
            "path" => self.path.display().to_string(),
            "icon" => self.icon.clone()?,
            "exe" => self.exe.clone(),
            "comment" => EntryConfig::COMMENT.to_string(),
            "categories" => self.categories_value(),
            _ => return None,
        };
        Some(value)
    }

    /// Render the .desktop file content.
    pub fn render(&self) -> String {
        let template = if self.icon.is_some() {
            TEMPLATE.to_string()
        } else {
            remove_line(TEMPLATE, ICON_PLACEHOLDER)
        };

        // Single pass so substituted values are never re-expanded.
        PLACEHOLDER
            .replace_all(&template, |caps: &Captures| {
                self.value(&caps[1]).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Write the desktop entry to a file and mark it executable.
    ///
    /// The parent directory must already exist.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render()).map_err(|e| ShortcutError::io_with_path(e, path))?;

        // Required for desktop files to be trusted
        platform::set_executable(path)?;

        debug!("Wrote desktop entry to {:?}", path);
        Ok(())
    }
}

/// Escape a path for use inside a double-quoted `Exec=` argument.
///
/// `"`, `` ` ``, `$` and `\` take a backslash inside the quotes, and that
/// backslash is itself escaped at the string level, as is a literal `\`.
/// `%` is doubled so it is not read as a field code.
fn quoted_arg(path: &Path) -> String {
    let raw = path.display().to_string();
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '"' | '`' | '$' => {
                escaped.push_str("\\\\");
                escaped.push(c);
            }
            '\\' => escaped.push_str("\\\\\\\\"),
            '%' => escaped.push_str("%%"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn remove_line(text: &str, marker: &str) -> String {
    text.lines()
        .filter(|line| !line.contains(marker))
        .map(|line| format!("{}\n", line))
        .collect()
}
