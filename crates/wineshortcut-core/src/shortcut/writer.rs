//! Writing launchers to their destination folders.

use super::desktop_entry::DesktopEntry;
use super::request::ShortcutRequest;
use crate::error::{Result, ShortcutError};
use crate::platform;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

/// Which kind of folder a launcher goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    Output,
    Desktop,
    Menu,
    /// Fallback when nothing else is requested.
    WorkingDir,
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DestinationKind::Output => "output",
            DestinationKind::Desktop => "desktop",
            DestinationKind::Menu => "menu",
            DestinationKind::WorkingDir => "working directory",
        };
        write!(f, "{}", s)
    }
}

/// A destination that was requested but not written.
#[derive(Debug)]
pub struct SkippedDestination {
    pub kind: DestinationKind,
    pub error: ShortcutError,
}

/// Result of writing a launcher to all requested destinations.
#[derive(Debug, Default)]
pub struct WriteReport {
    /// Files that were written.
    pub written: Vec<PathBuf>,
    /// Destinations that were skipped, one warning each.
    pub skipped: Vec<SkippedDestination>,
}

/// Writes launchers to the output, desktop and menu folders.
pub struct ShortcutWriter {
    /// Desktop directory (~/Desktop).
    desktop_dir: Option<PathBuf>,
    /// Wine menu directory (~/.local/share/applications/wine/Programs).
    menu_dir: Option<PathBuf>,
}

impl ShortcutWriter {
    /// Create a writer using the platform's desktop and menu folders.
    pub fn new() -> Self {
        Self {
            desktop_dir: platform::desktop_dir().ok(),
            menu_dir: platform::menu_dir().ok(),
        }
    }

    /// Create a writer with explicit desktop and menu folders.
    pub fn with_dirs(desktop_dir: impl Into<PathBuf>, menu_dir: impl Into<PathBuf>) -> Self {
        Self {
            desktop_dir: Some(desktop_dir.into()),
            menu_dir: Some(menu_dir.into()),
        }
    }

    /// Folders the request asks for, in output, desktop, menu order.
    ///
    /// Falls back to the request's working directory when none is requested.
    /// Folders that cannot be determined are returned as errors.
    pub fn destinations(
        &self,
        request: &ShortcutRequest,
    ) -> Vec<(DestinationKind, Result<PathBuf>)> {
        let mut destinations = Vec::new();

        if let Some(ref output) = request.output {
            destinations.push((DestinationKind::Output, Ok(output.clone())));
        }
        if request.desktop {
            destinations.push((
                DestinationKind::Desktop,
                lookup(&self.desktop_dir, "desktop"),
            ));
        }
        if request.menu {
            destinations.push((DestinationKind::Menu, lookup(&self.menu_dir, "menu")));
        }
        if destinations.is_empty() {
            destinations.push((DestinationKind::WorkingDir, Ok(request.cwd.clone())));
        }

        destinations
    }

    /// Write the entry to every requested destination.
    ///
    /// A missing folder is a warning and never stops the remaining writes.
    pub fn write_all(&self, request: &ShortcutRequest, entry: &DesktopEntry) -> WriteReport {
        let mut report = WriteReport::default();
        let file_name = request.shortcut_file_name();

        for (kind, dir) in self.destinations(request) {
            let result = dir.and_then(|dir| {
                if !dir.is_dir() {
                    return Err(ShortcutError::DestinationMissing(dir));
                }
                let path = dir.join(&file_name);
                if report.written.contains(&path) {
                    return Ok(None);
                }
                entry.write_to_file(&path)?;
                Ok(Some(path))
            });

            match result {
                Ok(Some(path)) => {
                    info!("Created {} shortcut {}", kind, path.display());
                    report.written.push(path);
                }
                Ok(None) => {}
                Err(error) => {
                    warn!("Skipping {} shortcut: {}", kind, error);
                    report.skipped.push(SkippedDestination { kind, error });
                }
            }
        }

        report
    }
}

impl Default for ShortcutWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn lookup(dir: &Option<PathBuf>, what: &str) -> Result<PathBuf> {
    dir.clone().ok_or_else(|| ShortcutError::Platform {
        message: format!("Could not determine {} directory", what),
    })
}
