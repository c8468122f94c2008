use super::{CommandError, CommandFlag, CommandState, Result, ShellItem};
use crate::config::EditorConfig;
use flagset::FlagSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// What the command needs from the process it is loaded into.
pub trait Host {
    /// Full path of the module implementing the command.
    fn module_path(&self) -> Result<PathBuf>;

    /// Starts `request.executable` detached. Returns once the process exists.
    fn launch(&self, request: &LaunchRequest) -> Result<()>;
}

/// A process to start: the executable and the raw command line handed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub executable: PathBuf,
    pub command_line: OsString,
}

impl LaunchRequest {
    /// Builds `<flag> "<folder>"`.
    pub fn open_folder(executable: PathBuf, flag: &str, folder: &Path) -> Self {
        let mut command_line = OsString::from(flag);
        command_line.push(" \"");
        command_line.push(folder.as_os_str());
        command_line.push("\"");

        Self {
            executable,
            command_line,
        }
    }
}

/// The "Open in <editor>" command, independent of COM.
pub struct OpenInEditor<H> {
    config: EditorConfig,
    host: H,
}

impl<H: Host> OpenInEditor<H> {
    pub fn new(config: EditorConfig, host: H) -> Self {
        Self { config, host }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    /// Location of the editor relative to this module. Recomputed on every
    /// call so a moved installation is picked up.
    pub fn editor_path(&self) -> Result<PathBuf> {
        let module_path = self.host.module_path()?;

        let mut dir = module_path.parent();
        for _ in 0..self.config.levels_up {
            dir = dir.and_then(Path::parent);
        }

        let dir = dir
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or_else(|| CommandError::NoParentDirectory(module_path.clone()))?;

        Ok(dir.join(&self.config.executable_name))
    }

    /// Icon resource locator, `<editor path>,<resource index>`.
    pub fn icon(&self) -> Result<OsString> {
        let mut locator = self.editor_path()?.into_os_string();
        locator.push(format!(",{}", self.config.icon_resource));
        Ok(locator)
    }

    pub fn tool_tip(&self) -> Result<String> {
        Err(CommandError::NotImplemented)
    }

    pub fn flags(&self) -> FlagSet<CommandFlag> {
        FlagSet::default()
    }

    pub fn canonical_name(&self) -> Uuid {
        self.config.canonical_name
    }

    pub fn state<I: ShellItem>(&self, location: Option<&I>) -> CommandState {
        CommandState::for_location(location)
    }

    /// Opens the editor on `location`. Nothing is started unless both the
    /// editor path and the folder path are known.
    pub fn invoke<I: ShellItem>(&self, location: Option<&I>) -> Result<()> {
        let executable = self.editor_path()?;
        let item = location.ok_or(CommandError::NoLocation)?;
        let folder = item.file_system_path()?;

        let request = LaunchRequest::open_folder(executable, &self.config.new_window_flag, &folder);
        tracing::debug!(
            target: "command::editor",
            executable = %request.executable.display(),
            command_line = ?request.command_line,
            "Launching editor"
        );

        self.host.launch(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::item::tests::FakeItem;
    use crate::command::ItemAttribute;
    use std::cell::RefCell;

    struct FakeHost {
        module_path: Option<PathBuf>,
        launch_fails: bool,
        launched: RefCell<Vec<LaunchRequest>>,
    }

    impl FakeHost {
        fn at(module_path: PathBuf) -> Self {
            Self {
                module_path: Some(module_path),
                launch_fails: false,
                launched: RefCell::new(Vec::new()),
            }
        }

        fn without_module() -> Self {
            Self {
                module_path: None,
                launch_fails: false,
                launched: RefCell::new(Vec::new()),
            }
        }
    }

    impl Host for &FakeHost {
        fn module_path(&self) -> Result<PathBuf> {
            self.module_path
                .clone()
                .ok_or_else(|| CommandError::ModulePath("GetModuleFileNameW failed".to_string()))
        }

        fn launch(&self, request: &LaunchRequest) -> Result<()> {
            if self.launch_fails {
                return Err(CommandError::Launch {
                    executable: request.executable.clone(),
                    reason: "file not found".to_string(),
                });
            }
            self.launched.borrow_mut().push(request.clone());
            Ok(())
        }
    }

    fn install_root() -> PathBuf {
        PathBuf::from("Program Files").join("Sublime Text")
    }

    fn module_path() -> PathBuf {
        install_root().join("Package").join("sublime_explorer_commands.dll")
    }

    fn command(host: &FakeHost) -> OpenInEditor<&FakeHost> {
        OpenInEditor::new(EditorConfig::default(), host)
    }

    #[test]
    fn test_editor_path_is_one_level_above_module() {
        let host = FakeHost::at(module_path());

        let path = command(&host).editor_path().unwrap();

        assert_eq!(path, install_root().join("sublime_text.exe"));
    }

    #[test]
    fn test_editor_path_follows_moved_module() {
        let mut host = FakeHost::at(module_path());
        let before = command(&host).editor_path().unwrap();

        host.module_path = Some(PathBuf::from("Elsewhere").join("Package").join("x.dll"));
        let after = command(&host).editor_path().unwrap();

        assert_ne!(before, after);
        assert_eq!(after, PathBuf::from("Elsewhere").join("sublime_text.exe"));
    }

    #[test]
    fn test_editor_path_without_ancestor_fails() {
        let host = FakeHost::at(PathBuf::from("Package").join("x.dll"));

        let result = command(&host).editor_path();

        assert!(matches!(result, Err(CommandError::NoParentDirectory(_))));
    }

    #[test]
    fn test_icon_locator_uses_editor_path() {
        let host = FakeHost::at(module_path());
        let command = command(&host);

        let icon = command.icon().unwrap();
        let expected = format!("{},-103", command.editor_path().unwrap().display());

        assert!(icon.to_string_lossy().ends_with(",-103"));
        assert_eq!(icon.to_string_lossy(), expected);
    }

    #[test]
    fn test_icon_fails_without_module_path() {
        let host = FakeHost::without_module();

        assert!(matches!(command(&host).icon(), Err(CommandError::ModulePath(_))));
    }

    #[test]
    fn test_fixed_properties() {
        let host = FakeHost::at(module_path());
        let command = command(&host);

        assert_eq!(command.title(), "Open in Sublime Text");
        assert!(command.flags().is_empty());
        assert_eq!(command.canonical_name(), crate::config::OPEN_IN_SUBLIME_CLSID);
        assert!(matches!(command.tool_tip(), Err(CommandError::NotImplemented)));
    }

    #[test]
    fn test_invoke_launches_editor_once_with_quoted_path() {
        let host = FakeHost::at(module_path());
        let folder = PathBuf::from("Users").join("me").join("My Project");

        command(&host).invoke(Some(&FakeItem::folder(folder.clone()))).unwrap();

        let launched = host.launched.borrow();
        assert_eq!(launched.len(), 1);
        assert_eq!(launched[0].executable, install_root().join("sublime_text.exe"));
        assert_eq!(
            launched[0].command_line.to_string_lossy(),
            format!("-n \"{}\"", folder.display())
        );
    }

    #[test]
    fn test_invoke_without_location_spawns_nothing() {
        let host = FakeHost::at(module_path());

        let result = command(&host).invoke::<FakeItem>(None);

        assert!(matches!(result, Err(CommandError::NoLocation)));
        assert!(host.launched.borrow().is_empty());
    }

    #[test]
    fn test_invoke_without_module_path_spawns_nothing() {
        let host = FakeHost::without_module();

        let result = command(&host).invoke(Some(&FakeItem::folder("folder")));

        assert!(matches!(result, Err(CommandError::ModulePath(_))));
        assert!(host.launched.borrow().is_empty());
    }

    #[test]
    fn test_invoke_without_file_system_path_spawns_nothing() {
        let host = FakeHost::at(module_path());
        let item = FakeItem {
            path: None,
            attributes: Some(ItemAttribute::Folder.into()),
        };

        let result = command(&host).invoke(Some(&item));

        assert!(matches!(result, Err(CommandError::DisplayName(_))));
        assert!(host.launched.borrow().is_empty());
    }

    #[test]
    fn test_invoke_reports_launch_failure() {
        let mut host = FakeHost::at(module_path());
        host.launch_fails = true;

        let result = command(&host).invoke(Some(&FakeItem::folder("folder")));

        assert!(matches!(result, Err(CommandError::Launch { .. })));
    }

    #[test]
    fn test_state_delegates_to_location() {
        let host = FakeHost::at(module_path());

        assert_eq!(
            command(&host).state(Some(&FakeItem::folder("folder"))),
            CommandState::Enabled
        );
        assert_eq!(command(&host).state::<FakeItem>(None), CommandState::Hidden);
    }
}
