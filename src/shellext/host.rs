use crate::command::{CommandError, Host, LaunchRequest, Result};
use crate::lifecycle::MODULE_HANDLE;
use std::ffi::{OsString, c_void};
use std::os::windows::ffi::OsStringExt;
use std::path::PathBuf;
use widestring::U16CString;
use windows::{
    Win32::{
        Foundation::*,
        System::{LibraryLoader::GetModuleFileNameW, Threading::*},
        UI::WindowsAndMessaging::SW_SHOWNORMAL,
    },
    core::*,
};

// Long-path aware upper bound for GetModuleFileNameW
const MAX_MODULE_PATH: usize = 32 * 1024;

/// The real process: module path from the loader, launches via CreateProcessW.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Host;

impl Host for Win32Host {
    fn module_path(&self) -> Result<PathBuf> {
        let handle = MODULE_HANDLE
            .get()
            .ok_or_else(|| CommandError::ModulePath("module handle was not captured".to_string()))?;
        let module = HMODULE(handle as *mut c_void);

        let mut buffer = vec![0u16; MAX_PATH as usize];
        loop {
            let len = unsafe { GetModuleFileNameW(module, &mut buffer) } as usize;
            if len == 0 {
                return Err(CommandError::ModulePath(Error::from_win32().to_string()));
            }

            // A full buffer means the path was truncated
            if len < buffer.len() {
                buffer.truncate(len);
                return Ok(PathBuf::from(OsString::from_wide(&buffer)));
            }

            if buffer.len() >= MAX_MODULE_PATH {
                return Err(CommandError::ModulePath("module path is too long".to_string()));
            }
            buffer.resize(buffer.len() * 2, 0);
        }
    }

    fn launch(&self, request: &LaunchRequest) -> Result<()> {
        let application = HSTRING::from(request.executable.as_os_str());
        let mut command_line = U16CString::from_os_str(&request.command_line)
            .map_err(|e| CommandError::InvalidCommandLine(e.to_string()))?
            .into_vec_with_nul();

        let startup_info = STARTUPINFOW {
            cb: std::mem::size_of::<STARTUPINFOW>() as u32,
            dwFlags: STARTF_USESHOWWINDOW,
            wShowWindow: SW_SHOWNORMAL.0 as u16,
            ..Default::default()
        };
        let mut process_info = PROCESS_INFORMATION::default();

        unsafe {
            CreateProcessW(
                &application,
                PWSTR(command_line.as_mut_ptr()),
                None,
                None,
                FALSE,
                CREATE_UNICODE_ENVIRONMENT,
                None,
                PCWSTR::null(),
                &startup_info,
                &mut process_info,
            )
        }
        .map_err(|e| CommandError::Launch {
            executable: request.executable.clone(),
            reason: e.to_string(),
        })?;

        tracing::info!(
            target: "shellext::context_menu",
            pid = process_info.dwProcessId,
            "Editor process started"
        );

        // Fire and forget, the child is not tracked
        unsafe {
            let _ = CloseHandle(process_info.hThread);
            let _ = CloseHandle(process_info.hProcess);
        }
        Ok(())
    }
}
