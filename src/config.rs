use std::env;
use uuid::{Uuid, uuid};

/// Environment variable selecting the diagnostic log level
pub const LOG_LEVEL_ENV: &str = "SUBLIME_EXPLORER_LOG";
/// Environment variable enabling the rotating JSON log file
pub const LOG_FILE_ENV: &str = "SUBLIME_EXPLORER_LOG_FILE";

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

/// Fixed description of the editor the command opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// File name of the editor executable
    pub executable_name: String,
    /// Menu title shown by Explorer
    pub title: String,
    /// Icon resource index inside the executable, negative for a resource id
    pub icon_resource: i32,
    /// Argument asking the editor to open a new window
    pub new_window_flag: String,
    /// Number of directories between this module and the executable
    pub levels_up: usize,
    /// Canonical name of the command, also its CLSID
    pub canonical_name: Uuid,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            executable_name: "sublime_text.exe".to_string(),
            title: "Open in Sublime Text".to_string(),
            icon_resource: -103,
            new_window_flag: "-n".to_string(),
            levels_up: 1,
            canonical_name: OPEN_IN_SUBLIME_CLSID,
        }
    }
}

/// CLSID of the "Open in Sublime Text" explorer command
pub const OPEN_IN_SUBLIME_CLSID: Uuid = uuid!("b2ba1a2e-6c0b-4f1e-9bb9-1f6f4ad6e6a5");

/// Activatable class id used for packaged (MSIX) registration
pub const ACTIVATABLE_CLASS_ID: &str = "SublimeText.ExplorerCommands.OpenInSublimeText";

/// Diagnostic output settings. Only honoured by debug builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    pub log_level: LogLevel,
    /// Whether to also write JSON logs to a rotating file
    pub log_to_file: bool,
    /// Maximum number of log files to keep
    pub log_max_files: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Trace,
            log_to_file: false,
            log_max_files: 5,
        }
    }
}

impl DiagnosticsConfig {
    /// Defaults overridden by the `SUBLIME_EXPLORER_LOG*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            config.log_level = LogLevel::from_str(&level);
        }
        if let Some(flag) = lookup(LOG_FILE_ENV) {
            config.log_to_file = matches!(flag.trim(), "1" | "true" | "yes" | "on");
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_editor_config() {
        let config = EditorConfig::default();
        assert_eq!(config.executable_name, "sublime_text.exe");
        assert_eq!(config.title, "Open in Sublime Text");
        assert_eq!(config.icon_resource, -103);
        assert_eq!(config.new_window_flag, "-n");
        assert_eq!(config.levels_up, 1);
        assert_eq!(config.canonical_name, OPEN_IN_SUBLIME_CLSID);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("TRACE"), LogLevel::Trace);
        assert_eq!(LogLevel::from_str(" warn "), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("verbose"), LogLevel::Info);
        assert_eq!(LogLevel::Debug.as_str(), "debug");
    }

    #[test]
    fn test_diagnostics_from_lookup() {
        let vars: HashMap<&str, &str> =
            HashMap::from([(LOG_LEVEL_ENV, "error"), (LOG_FILE_ENV, "true")]);
        let config = DiagnosticsConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.log_level, LogLevel::Error);
        assert!(config.log_to_file);
        assert_eq!(config.log_max_files, 5);
    }

    #[test]
    fn test_diagnostics_defaults_without_env() {
        let config = DiagnosticsConfig::from_lookup(|_| None);
        assert_eq!(config, DiagnosticsConfig::default());
    }
}
