//! Config directory resolution.
//!
//! All config files live in one directory: `--config-dir` when given, else
//! `$XDG_CONFIG_HOME/library-manager`, else `$HOME/.config/library-manager`,
//! else the current directory.

use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = "library-manager";
pub const THEME_FILE: &str = "theme.conf";
pub const KEYBINDS_FILE: &str = "keybinds.conf";
pub const LOG_FILE: &str = "library-manager.log";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigPaths {
    dir: PathBuf,
}

impl ConfigPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Use `explicit` if set, otherwise the platform default.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        match explicit {
            Some(dir) => Self::new(dir),
            None => Self::new(default_config_dir(
                std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
                std::env::var_os("HOME").map(PathBuf::from),
            )),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn theme(&self) -> PathBuf {
        self.dir.join(THEME_FILE)
    }

    pub fn keybinds(&self) -> PathBuf {
        self.dir.join(KEYBINDS_FILE)
    }

    pub fn log_file(&self) -> PathBuf {
        self.dir.join(LOG_FILE)
    }

    pub fn ensure_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }
}

fn default_config_dir(xdg_config_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    if let Some(xdg) = xdg_config_home.filter(|p| !p.as_os_str().is_empty()) {
        return xdg.join(APP_DIR_NAME);
    }
    if let Some(home) = home.filter(|p| !p.as_os_str().is_empty()) {
        return home.join(".config").join(APP_DIR_NAME);
    }
    PathBuf::from(".")
}
