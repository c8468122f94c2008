//! COM side of the extension: adapters from shell interfaces to the
//! platform-independent command.

pub mod activation;
pub(crate) mod boundary;
pub mod context_menu;
pub mod host;
pub mod items;

pub use activation::OpenInSublimeActivationFactory;
pub use context_menu::{CLSID_OPEN_IN_SUBLIME, OpenInSublimeCommand, OpenInSublimeCommandFactory};
