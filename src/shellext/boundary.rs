// Every call the shell makes into this DLL passes through here. A panic
// unwinding into explorer.exe would take the whole shell down with it.

use crate::command::CommandError;
use std::panic::{self, AssertUnwindSafe};
use windows::{
    Win32::Foundation::{E_FAIL, E_NOTIMPL},
    core::{Error, HRESULT, Result},
};

impl From<CommandError> for Error {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::NotImplemented => Error::from(E_NOTIMPL),
            _ => Error::from(E_FAIL),
        }
    }
}

/// Runs a COM method body, logging failures and turning panics into `E_FAIL`.
pub(crate) fn guard<T>(operation: &'static str, body: impl FnOnce() -> Result<T>) -> Result<T> {
    tracing::trace!(target: "shellext::context_menu", operation, "Called");

    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::debug!(target: "shellext::boundary", operation, error = %e, "Operation failed");
            Err(e)
        }
        Err(_) => {
            tracing::error!(target: "shellext::boundary", operation, "Operation panicked");
            Err(Error::from(E_FAIL))
        }
    }
}

/// Same as [`guard`] for exports that return a bare `HRESULT`.
pub(crate) fn guard_hresult(operation: &'static str, body: impl FnOnce() -> HRESULT) -> HRESULT {
    tracing::trace!(target: "dll", operation, "Called");

    panic::catch_unwind(AssertUnwindSafe(body)).unwrap_or_else(|_| {
        tracing::error!(target: "shellext::boundary", operation, "Export panicked");
        E_FAIL
    })
}
