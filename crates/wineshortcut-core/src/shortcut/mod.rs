//! Wine launcher creation.
//!
//! Provides functionality for:
//! - Resolving the launcher icon (explicit, reused or extracted with `wrestool`)
//! - Rendering the desktop entry from its fixed template
//! - Writing the entry to the output, desktop and menu folders
//!
//! # Example
//!
//! ```rust,ignore
//! use wineshortcut_core::{Options, ShortcutBuilder, ShortcutRequest};
//! use std::path::Path;
//!
//! fn main() -> wineshortcut_core::Result<()> {
//!     let cwd = std::env::current_dir()?;
//!     let request = ShortcutRequest::resolve(Path::new("App.exe"), Options::default(), &cwd)?;
//!     let outcome = ShortcutBuilder::new(request).run(&mut std::io::stdout())?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

mod desktop_entry;
mod icon;
mod request;
mod writer;

pub use desktop_entry::{DesktopEntry, TEMPLATE};
pub use icon::{
    parse_listing, resolve_icon, select_best, IconExtractor, IconOrigin, IconResource,
    ResolvedIcon, WrestoolExtractor,
};
pub use request::{IconPolicy, ShortcutRequest};
pub use writer::{DestinationKind, ShortcutWriter, SkippedDestination, WriteReport};

use crate::error::{IconError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What a run produced.
#[derive(Debug)]
pub enum ShortcutOutcome {
    /// Dry run: the rendered entry, printed and not written.
    Printed(String),
    /// Files written and destinations skipped.
    Written(WriteReport),
}

/// Runs the whole pipeline for one request.
pub struct ShortcutBuilder {
    request: ShortcutRequest,
    extractor: Box<dyn IconExtractor>,
    writer: ShortcutWriter,
}

impl ShortcutBuilder {
    /// Create a builder using `wrestool` and the platform folders.
    pub fn new(request: ShortcutRequest) -> Self {
        let extractor = WrestoolExtractor::new(request.tool.clone(), request.tool_timeout);
        Self {
            request,
            extractor: Box::new(extractor),
            writer: ShortcutWriter::new(),
        }
    }

    /// Replace the icon extractor.
    pub fn with_extractor(mut self, extractor: impl IconExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    /// Replace the destination writer.
    pub fn with_writer(mut self, writer: ShortcutWriter) -> Self {
        self.writer = writer;
        self
    }

    pub fn request(&self) -> &ShortcutRequest {
        &self.request
    }

    /// Resolve the icon and assemble the entry.
    ///
    /// In dry-run mode nothing is extracted, so only explicit icons and
    /// previously extracted ones are used.
    pub fn build(&self) -> DesktopEntry {
        let icon = if self.request.dry_run {
            resolve_icon(&self.request, &NoExtraction)
        } else {
            resolve_icon(&self.request, self.extractor.as_ref())
        };
        debug!("Resolved icon {:?} ({:?})", icon.value, icon.origin);

        DesktopEntry::from_request(&self.request, icon.value)
    }

    /// Build the entry, then print it (dry run) or write it.
    pub fn run(&self, out: &mut impl Write) -> Result<ShortcutOutcome> {
        let entry = self.build();

        if self.request.dry_run {
            let content = entry.render();
            out.write_all(content.as_bytes())?;
            out.flush()?;
            return Ok(ShortcutOutcome::Printed(content));
        }

        let report = self.writer.write_all(&self.request, &entry);
        debug!(
            "Wrote {} shortcut(s) for {}, skipped {}",
            report.written.len(),
            self.request.exe_name(),
            report.skipped.len()
        );
        Ok(ShortcutOutcome::Written(report))
    }
}

/// Extractor used for dry runs, which must not touch the filesystem.
struct NoExtraction;

impl IconExtractor for NoExtraction {
    fn extract(
        &self,
        _exe: &Path,
        _dest: &Path,
    ) -> std::result::Result<Option<PathBuf>, IconError> {
        debug!("Dry run, skipping icon extraction");
        Ok(None)
    }
}
