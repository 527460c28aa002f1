//! Launcher configuration.
//!
//! The chosen tool path is persisted as a configuration record under the
//! user's configuration directory, keyed by the application name.

use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "cast_launcher";

/// Default install location of the screen casting tool, used until the
/// user saves their own.
pub const DEFAULT_TOOL_PATH: &str =
    "C:/Program Files (x86)/Viewsonic/vCastSender/vCastSender.exe";

/// File name the chosen path must point at.
pub const TOOL_FILE_NAME: &str = "vCastSender.exe";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LauncherConfig {
    pub version: u32,
    pub tool_path: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            version: 1,
            tool_path: DEFAULT_TOOL_PATH.into(),
        }
    }
}

pub fn load_config() -> LauncherConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

pub fn save_config(cfg: &LauncherConfig) -> Result<(), confy::ConfyError> {
    confy::store(CONFIG_NAME, None, cfg)
}

/// Whether `path` points at an existing copy of the expected tool
/// executable.
pub fn is_valid_tool_path(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    let path = std::path::Path::new(path);
    path.is_file()
        && path
            .file_name()
            .map(|name| name == TOOL_FILE_NAME)
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_the_stock_install_path() {
        let cfg = LauncherConfig::default();
        assert_eq!(cfg.tool_path, DEFAULT_TOOL_PATH);
        assert_eq!(cfg.version, 1);
    }

    #[test]
    fn empty_and_missing_paths_are_invalid() {
        assert!(!is_valid_tool_path(""));
        assert!(!is_valid_tool_path("Z:/definitely/not/here/vCastSender.exe"));
    }

    #[test]
    fn wrong_file_name_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let other = dir.path().join("OtherTool.exe");
        std::fs::write(&other, b"").unwrap();

        assert!(!is_valid_tool_path(&other.to_string_lossy()));
    }

    #[test]
    fn existing_tool_file_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join(TOOL_FILE_NAME);
        std::fs::write(&tool, b"").unwrap();

        assert!(is_valid_tool_path(&tool.to_string_lossy()));
    }
}
