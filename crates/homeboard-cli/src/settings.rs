//! Persistent CLI settings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use homeboard_admin::DEFAULT_PAGE_SIZE;
use homeboard_store::DraftConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Contents of `settings.toml`.
///
/// Every section defaults, so a partial or missing file is fine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub list: ListSettings,
    pub drafts: DraftConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding one JSON file per storage key.
    ///
    /// Defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListSettings {
    pub page_size: usize,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Settings {
    /// Load from `path`, or the default location when `None`.
    pub fn load(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&Self::config_path()),
        }
    }

    /// Load settings from a specific path.
    ///
    /// A missing file yields defaults silently; an unreadable or invalid one
    /// yields defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(error) => {
                warn!(path = %path.display(), %error, "cannot read settings, using defaults");
                return Self::default();
            }
        };
        toml::from_str(&content).unwrap_or_else(|error| {
            warn!(path = %path.display(), %error, "invalid settings, using defaults");
            Self::default()
        })
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create config directory {}", parent.display()))?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).with_context(|| format!("write settings {}", path.display()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialize settings")
    }

    /// Get the default config file path.
    pub fn config_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }

    /// The data directory in effect.
    pub fn data_dir(&self) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("homeboard-data"))
        })
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("org", "Homeboard", "homeboard")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings: Settings = toml::from_str("[list]\npage_size = 10\n").unwrap();
        assert_eq!(settings.list.page_size, 10);
        assert_eq!(settings.drafts, DraftConfig::default());
        assert_eq!(settings.storage.data_dir, None);
    }

    #[test]
    fn invalid_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "list = 3").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        let settings = Settings {
            storage: StorageSettings {
                data_dir: Some(dir.path().join("data")),
            },
            list: ListSettings { page_size: 12 },
            drafts: DraftConfig::disabled(),
        };

        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load(Some(&path)), settings);
        assert_eq!(Settings::load(Some(&path)).data_dir(), dir.path().join("data"));
    }
}
