//! Platform abstraction layer.
//!
//! All `#[cfg]` blocks for OS-specific behavior live here:
//! - `paths` - desktop and application menu folders, command lookup
//! - `permissions` - executable bits on written launchers
//!
//! Launchers are XDG desktop entries, so only Linux has a real menu folder.

pub mod paths;
pub mod permissions;

pub use paths::{apps_dir, command_exists, desktop_dir, menu_dir};
pub use permissions::{is_executable, set_executable};
