use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "Sova";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.config/Sova`, or the platform config dir when HOME is unset
    pub fn config_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".config").join(APP_NAME))
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
        }
    }

    pub fn history_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("results.txt"))
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("sova.log"))
    }
}
