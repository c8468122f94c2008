// Context menu handler for Windows Explorer
// This implements a COM object that provides the "Open in Sublime Text" item

mod explorer_command;
mod factory;

pub use explorer_command::OpenInSublimeCommand;
pub use factory::OpenInSublimeCommandFactory;

use crate::config::OPEN_IN_SUBLIME_CLSID;
use windows::core::GUID;

/// CLSID registered for the command, also its canonical name
pub const CLSID_OPEN_IN_SUBLIME: GUID = GUID::from_u128(OPEN_IN_SUBLIME_CLSID.as_u128());
