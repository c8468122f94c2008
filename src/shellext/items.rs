use crate::command::{CommandError, FolderSite, ItemAttribute, Result, Selection, ShellItem};
use flagset::FlagSet;
use std::ffi::{OsString, c_void};
use std::os::windows::ffi::OsStringExt;
use std::path::PathBuf;
use windows::{
    Win32::{
        System::{
            Com::{CoTaskMemFree, IServiceProvider},
            SystemServices::SFGAO_FLAGS,
        },
        UI::Shell::*,
    },
    core::*,
};

#[derive(Clone)]
pub struct ComShellItem(pub IShellItem);

impl ShellItem for ComShellItem {
    fn attributes(&self, mask: FlagSet<ItemAttribute>) -> Result<FlagSet<ItemAttribute>> {
        let found = unsafe { self.0.GetAttributes(SFGAO_FLAGS(mask.bits())) }
            .map_err(|e| CommandError::Attributes(e.to_string()))?;
        Ok(FlagSet::new_truncated(found.0))
    }

    fn file_system_path(&self) -> Result<PathBuf> {
        unsafe {
            let name = self
                .0
                .GetDisplayName(SIGDN_FILESYSPATH)
                .map_err(|e| CommandError::DisplayName(e.to_string()))?;
            let path = OsString::from_wide(name.as_wide());
            CoTaskMemFree(Some(name.0 as *const c_void));
            Ok(PathBuf::from(path))
        }
    }
}

impl Selection for IShellItemArray {
    type Item = ComShellItem;

    fn first_item(&self) -> Option<ComShellItem> {
        unsafe {
            let count = self.GetCount().ok()?;
            if count == 0 {
                return None;
            }
            self.GetItemAt(0).ok().map(ComShellItem)
        }
    }
}

/// The command's site, asked for the folder view it belongs to.
pub struct ComSite<'a>(pub &'a IUnknown);

impl FolderSite for ComSite<'_> {
    type Item = ComShellItem;

    fn current_folder(&self) -> Option<ComShellItem> {
        let provider: IServiceProvider = self.0.cast().ok()?;
        unsafe {
            let view: IFolderView = provider.QueryService(&SID_SFolderView).ok()?;
            view.GetFolder::<IShellItem>().ok().map(ComShellItem)
        }
    }
}
