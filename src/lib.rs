//! "Open in Sublime Text" for the File Explorer context menu.
//!
//! Built as a DLL that Explorer loads in-process. The decision logic lives
//! in [`command`] and compiles on every platform; the COM plumbing in
//! `shellext` and the DLL exports are Windows only.

pub mod command;
pub mod config;
pub mod lifecycle;
pub mod logging;

#[cfg(windows)]
mod dll;
#[cfg(windows)]
pub mod shellext;
