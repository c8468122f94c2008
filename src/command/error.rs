use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CommandError>;

/// Failures of the explorer command. None of them escape the COM boundary
/// as anything richer than an HRESULT.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Neither the selection nor the site produced a shell item
    #[error("no location could be resolved from the selection or the site")]
    NoLocation,

    /// The file name of this module could not be queried
    #[error("failed to determine module path: {0}")]
    ModulePath(String),

    /// The module lives too close to the file-system root
    #[error("module path {0} has no ancestor to host the editor")]
    NoParentDirectory(PathBuf),

    /// The shell could not report the item's attributes
    #[error("failed to query item attributes: {0}")]
    Attributes(String),

    /// The resolved item has no file-system path
    #[error("failed to get file-system path of the item: {0}")]
    DisplayName(String),

    /// The command line cannot be passed to the OS (interior NUL)
    #[error("invalid command line: {0}")]
    InvalidCommandLine(String),

    /// Process creation failed
    #[error("failed to launch {executable}: {reason}")]
    Launch { executable: PathBuf, reason: String },

    #[error("not implemented")]
    NotImplemented,
}
