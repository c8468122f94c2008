//! Entry points the COM runtime and Explorer call on the DLL itself.

use crate::config::ACTIVATABLE_CLASS_ID;
use crate::lifecycle::{INSTANCES, MODULE_HANDLE};
use crate::shellext::boundary::guard_hresult;
use crate::shellext::{CLSID_OPEN_IN_SUBLIME, OpenInSublimeActivationFactory, OpenInSublimeCommandFactory};
use std::ffi::c_void;
use std::mem::ManuallyDrop;
use std::ptr::null_mut;
use windows::{
    Win32::{
        Foundation::*,
        System::{
            Com::IClassFactory, LibraryLoader::DisableThreadLibraryCalls,
            SystemServices::DLL_PROCESS_ATTACH, WinRT::IActivationFactory,
        },
    },
    core::*,
};

#[cfg(debug_assertions)]
static LOG_GUARD: std::sync::Mutex<Option<crate::logging::LogGuard>> = std::sync::Mutex::new(None);

#[cfg(debug_assertions)]
fn create_console() {
    use crate::config::DiagnosticsConfig;
    use crate::logging::{LogConfig, init_logging};
    use windows::Win32::System::Console::{AllocConsole, SetConsoleTitleW};

    unsafe {
        if AllocConsole().is_ok() {
            let _ = SetConsoleTitleW(w!("sublime_explorer_commands.dll"));
        }
    }

    // Stdout now resolves to the new console
    let diagnostics = DiagnosticsConfig::from_env();
    match init_logging(LogConfig::from(&diagnostics)) {
        Ok(guard) => {
            if let Ok(mut slot) = LOG_GUARD.lock() {
                *slot = Some(guard);
            }
        }
        Err(e) => eprintln!("sublime_explorer_commands: {e:#}"),
    }
}

#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn DllMain(hinst: HINSTANCE, reason: u32, _reserved: *mut c_void) -> BOOL {
    if reason == DLL_PROCESS_ATTACH {
        MODULE_HANDLE.init(hinst.0 as usize);

        #[cfg(debug_assertions)]
        create_console();

        unsafe {
            let _ = DisableThreadLibraryCalls(HMODULE(hinst.0));
        }
        tracing::debug!(target: "dll", "Attached to process");
    }
    TRUE
}

#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn DllCanUnloadNow() -> HRESULT {
    guard_hresult("DllCanUnloadNow", || {
        if INSTANCES.can_unload() { S_OK } else { S_FALSE }
    })
}

#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn DllGetClassObject(
    rclsid: *const GUID,
    riid: *const GUID,
    ppv: *mut *mut c_void,
) -> HRESULT {
    guard_hresult("DllGetClassObject", || unsafe {
        if ppv.is_null() || rclsid.is_null() || riid.is_null() {
            return E_POINTER;
        }
        *ppv = null_mut();

        if *rclsid != CLSID_OPEN_IN_SUBLIME {
            tracing::debug!(target: "dll", clsid = ?*rclsid, "Unknown class requested");
            return CLASS_E_CLASSNOTAVAILABLE;
        }

        let factory: IClassFactory = OpenInSublimeCommandFactory.into();
        factory.query(riid, ppv)
    })
}

#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn DllGetActivationFactory(
    activatable_class_id: ManuallyDrop<HSTRING>,
    factory: *mut *mut c_void,
) -> HRESULT {
    guard_hresult("DllGetActivationFactory", || unsafe {
        if factory.is_null() {
            return E_POINTER;
        }
        *factory = null_mut();

        let class_id = activatable_class_id.to_string_lossy();
        if class_id != ACTIVATABLE_CLASS_ID {
            tracing::debug!(target: "dll", %class_id, "Unknown activatable class requested");
            return CLASS_E_CLASSNOTAVAILABLE;
        }

        let activation_factory: IActivationFactory = OpenInSublimeActivationFactory.into();
        *factory = activation_factory.into_raw();
        S_OK
    })
}
