use super::CLSID_OPEN_IN_SUBLIME;
use crate::command::{CommandState, OpenInEditor, resolve_location};
use crate::config::EditorConfig;
use crate::lifecycle::{INSTANCES, InstanceGuard};
use crate::shellext::boundary::guard;
use crate::shellext::host::Win32Host;
use crate::shellext::items::{ComShellItem, ComSite};
use std::ffi::c_void;
use std::ptr::null_mut;
use std::sync::Mutex;
use windows::{
    Win32::{Foundation::*, System::Com::*, System::Ole::*, UI::Shell::*},
    core::*,
};

#[implement(IExplorerCommand, IObjectWithSite)]
pub struct OpenInSublimeCommand {
    command: OpenInEditor<Win32Host>,
    site: Mutex<Option<IUnknown>>,
    _instance: InstanceGuard,
}

impl OpenInSublimeCommand {
    pub fn new() -> Self {
        Self {
            command: OpenInEditor::new(EditorConfig::default(), Win32Host),
            site: Mutex::new(None),
            _instance: INSTANCES.acquire(),
        }
    }

    fn site(&self) -> Option<IUnknown> {
        match self.site.lock() {
            Ok(site) => site.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_site(&self, site: Option<IUnknown>) {
        match self.site.lock() {
            Ok(mut current) => *current = site,
            Err(poisoned) => *poisoned.into_inner() = site,
        }
    }

    fn location(&self, items: Option<&IShellItemArray>) -> Option<ComShellItem> {
        let site = self.site();
        let site = site.as_ref().map(ComSite);
        resolve_location(items, site.as_ref())
    }
}

impl Default for OpenInSublimeCommand {
    fn default() -> Self {
        Self::new()
    }
}

fn to_expcmdstate(state: CommandState) -> u32 {
    let state = match state {
        CommandState::Enabled => ECS_ENABLED,
        CommandState::Disabled => ECS_DISABLED,
        CommandState::Hidden => ECS_HIDDEN,
    };
    state.0 as u32
}

impl IExplorerCommand_Impl for OpenInSublimeCommand_Impl {
    fn GetTitle(&self, _items: Option<&IShellItemArray>) -> Result<PWSTR> {
        guard("GetTitle", || {
            let hstring = HSTRING::from(self.command.title());
            unsafe { SHStrDupW(&hstring) }
        })
    }

    fn GetIcon(&self, _items: Option<&IShellItemArray>) -> Result<PWSTR> {
        guard("GetIcon", || {
            let icon = self.command.icon()?;
            let hstring = HSTRING::from(icon.as_os_str());
            unsafe { SHStrDupW(&hstring) }
        })
    }

    fn GetToolTip(&self, _items: Option<&IShellItemArray>) -> Result<PWSTR> {
        guard("GetToolTip", || {
            let tip = self.command.tool_tip()?;
            unsafe { SHStrDupW(&HSTRING::from(tip)) }
        })
    }

    fn GetCanonicalName(&self) -> Result<GUID> {
        Ok(CLSID_OPEN_IN_SUBLIME)
    }

    fn GetState(&self, items: Option<&IShellItemArray>, _oktobeslow: BOOL) -> Result<u32> {
        let state = guard("GetState", || {
            let location = self.location(items);
            Ok(self.command.state(location.as_ref()))
        })
        .unwrap_or(CommandState::Hidden);

        tracing::trace!(target: "shellext::context_menu", ?state, "State resolved");
        Ok(to_expcmdstate(state))
    }

    fn Invoke(
        &self,
        selection: Option<&IShellItemArray>,
        _bindctx: Option<&IBindCtx>,
    ) -> Result<()> {
        guard("Invoke", || {
            let location = self.location(selection);
            self.command.invoke(location.as_ref())?;
            Ok(())
        })
    }

    fn GetFlags(&self) -> Result<u32> {
        Ok(self.command.flags().bits())
    }

    fn EnumSubCommands(&self) -> Result<IEnumExplorerCommand> {
        Err(Error::from(E_NOTIMPL))
    }
}

impl IObjectWithSite_Impl for OpenInSublimeCommand_Impl {
    fn SetSite(&self, site: Option<&IUnknown>) -> Result<()> {
        tracing::trace!(target: "shellext::context_menu", present = site.is_some(), "SetSite called");
        self.set_site(site.cloned());
        Ok(())
    }

    fn GetSite(&self, riid: *const GUID, site: *mut *mut c_void) -> Result<()> {
        if site.is_null() {
            return Err(Error::from(E_POINTER));
        }
        unsafe { *site = null_mut() };

        match self.site() {
            Some(current) => unsafe { current.query(riid, site).ok() },
            None => Err(Error::from(E_FAIL)),
        }
    }
}
