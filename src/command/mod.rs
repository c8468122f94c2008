//! Platform-independent logic of the "Open in Sublime Text" explorer command.
//!
//! The COM layer in `shellext` only translates between shell interfaces and
//! the traits defined here, so every decision the command makes can be
//! exercised without a running Explorer.

mod editor;
mod error;
mod item;
mod state;

pub use editor::{Host, LaunchRequest, OpenInEditor};
pub use error::{CommandError, Result};
pub use item::{FolderSite, ItemAttribute, Selection, ShellItem, resolve_location};
pub use state::{CommandFlag, CommandState};
