//! wineshortcut core - desktop launchers for Windows executables run through Wine.
//!
//! This crate builds XDG desktop entries for `.exe` files, optionally pulling
//! the embedded icon out with `wrestool` and installing the launcher to the
//! desktop and the application menu. The `wineshortcut` binary is a thin CLI
//! over it.
//!
//! # Example
//!
//! ```rust,ignore
//! use wineshortcut_core::{Options, ShortcutBuilder, ShortcutRequest};
//!
//! let cwd = std::env::current_dir()?;
//! let options = Options {
//!     categories: Some("Game".into()),
//!     menu: Some(true),
//!     ..Default::default()
//! };
//! let request = ShortcutRequest::resolve("App.exe".as_ref(), options, &cwd)?;
//! ShortcutBuilder::new(request).run(&mut std::io::stdout())?;
//! ```

pub mod config;
pub mod error;
pub mod platform;
pub mod shortcut;

pub use config::{merge, Options};
pub use error::{IconError, Result, ShortcutError};
pub use shortcut::{
    DesktopEntry, IconExtractor, IconPolicy, ShortcutBuilder, ShortcutOutcome, ShortcutRequest,
    ShortcutWriter, WrestoolExtractor, WriteReport,
};
