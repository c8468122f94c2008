use super::{ItemAttribute, ShellItem};
use flagset::flags;

/// Visibility of the command in a context menu, numbered like the shell's
/// `EXPCMDSTATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum CommandState {
    Enabled = 0,
    Disabled = 1,
    Hidden = 2,
}

impl CommandState {
    /// Enabled only for a real file-system folder that is not a packed
    /// stream (zip and friends report both folder and stream).
    pub fn for_location<I: ShellItem>(location: Option<&I>) -> Self {
        let Some(item) = location else {
            return CommandState::Hidden;
        };

        let is_file_system_folder =
            item.has_attributes(ItemAttribute::FileSystem | ItemAttribute::Folder);
        let is_compressed = item.has_attributes(ItemAttribute::Stream);

        if is_file_system_folder && !is_compressed {
            CommandState::Enabled
        } else {
            CommandState::Hidden
        }
    }
}

flags! {
    /// Behaviour flags of an explorer command, valued like `EXPCMDFLAGS`.
    /// The empty set is `ECF_DEFAULT`.
    pub enum CommandFlag: u32 {
        HasSubCommands = 0x0001,
        HasSplitButton = 0x0002,
        HideLabel = 0x0004,
        IsSeparator = 0x0008,
        HasLuaShield = 0x0010,
        SeparatorBefore = 0x0020,
        SeparatorAfter = 0x0040,
        IsDropDown = 0x0080,
        ToggleAble = 0x0100,
        AutoMenuIcons = 0x0200,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::item::tests::FakeItem;
    use flagset::FlagSet;

    fn state_for(attributes: Option<FlagSet<ItemAttribute>>) -> CommandState {
        CommandState::for_location(Some(&FakeItem::with_attributes(attributes)))
    }

    #[test]
    fn test_file_system_folder_is_enabled() {
        let attributes = ItemAttribute::FileSystem | ItemAttribute::Folder;
        assert_eq!(state_for(Some(attributes)), CommandState::Enabled);
    }

    #[test]
    fn test_compressed_folder_is_hidden() {
        let attributes = ItemAttribute::FileSystem | ItemAttribute::Folder | ItemAttribute::Stream;
        assert_eq!(state_for(Some(attributes)), CommandState::Hidden);
    }

    #[test]
    fn test_other_attribute_combinations_are_hidden() {
        let combinations: [FlagSet<ItemAttribute>; 5] = [
            FlagSet::default(),
            ItemAttribute::Folder.into(),
            ItemAttribute::FileSystem.into(),
            ItemAttribute::Stream.into(),
            ItemAttribute::FileSystem | ItemAttribute::Stream,
        ];

        for attributes in combinations {
            assert_eq!(state_for(Some(attributes)), CommandState::Hidden, "{attributes:?}");
        }
    }

    #[test]
    fn test_failed_query_is_hidden() {
        assert_eq!(state_for(None), CommandState::Hidden);
    }

    #[test]
    fn test_no_location_is_hidden() {
        assert_eq!(CommandState::for_location::<FakeItem>(None), CommandState::Hidden);
    }

    #[test]
    fn test_state_values_match_shell() {
        assert_eq!(CommandState::Enabled as u32, 0);
        assert_eq!(CommandState::Disabled as u32, 1);
        assert_eq!(CommandState::Hidden as u32, 2);
    }
}
