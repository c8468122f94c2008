use super::Result;
use flagset::{FlagSet, flags};
use std::path::PathBuf;

flags! {
    /// Shell item attributes the command cares about. Values are the shell's
    /// `SFGAO_*` bits so they can be passed through unchanged.
    pub enum ItemAttribute: u32 {
        Stream = 0x0040_0000,
        Folder = 0x2000_0000,
        FileSystem = 0x4000_0000,
    }
}

/// A file-system or virtual object as seen by Explorer.
pub trait ShellItem {
    /// Returns which of the attributes in `mask` hold for this item.
    fn attributes(&self, mask: FlagSet<ItemAttribute>) -> Result<FlagSet<ItemAttribute>>;

    fn file_system_path(&self) -> Result<PathBuf>;

    /// True when every attribute in `mask` holds. A failed query counts as
    /// the attributes being absent.
    fn has_attributes(&self, mask: impl Into<FlagSet<ItemAttribute>>) -> bool {
        let mask = mask.into();
        match self.attributes(mask) {
            Ok(found) => found.contains(mask),
            Err(e) => {
                tracing::debug!(target: "command::item", error = %e, "Attribute query failed, treating as absent");
                false
            }
        }
    }
}

/// Items the user right-clicked, in shell order.
pub trait Selection {
    type Item: ShellItem;

    fn first_item(&self) -> Option<Self::Item>;
}

/// The host object embedding the command, able to report the folder
/// currently displayed.
pub trait FolderSite {
    type Item: ShellItem;

    fn current_folder(&self) -> Option<Self::Item>;
}

impl<I: ShellItem + Clone> Selection for [I] {
    type Item = I;

    fn first_item(&self) -> Option<I> {
        self.iter().next().cloned()
    }
}

impl<I: ShellItem + Clone> Selection for Vec<I> {
    type Item = I;

    fn first_item(&self) -> Option<I> {
        self.as_slice().first_item()
    }
}

/// Picks the item the command acts on: the first selected item, or the
/// folder shown at the site when nothing is selected. Additional selected
/// items are ignored and the site is not consulted when a selection exists.
pub fn resolve_location<S, F>(selection: Option<&S>, site: Option<&F>) -> Option<S::Item>
where
    S: Selection + ?Sized,
    F: FolderSite<Item = S::Item> + ?Sized,
{
    if let Some(item) = selection.and_then(|s| s.first_item()) {
        return Some(item);
    }

    tracing::trace!(target: "command::item", "Empty selection, asking site for current folder");
    site.and_then(|s| s.current_folder())
}
