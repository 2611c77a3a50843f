//! Editor settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::scene::SceneSettings;
use crate::history::DEFAULT_CAPACITY;

/// All editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Undo units kept before the oldest is evicted
    pub history_capacity: usize,
    /// Settings every new scene starts with
    pub new_scene: SceneSettings,
    /// Snap gizmo translation to the scene snap size
    pub snap_to_grid: bool,
    /// Write the scene to the autosave file after every command batch
    pub autosave: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_CAPACITY,
            new_scene: SceneSettings::default(),
            snap_to_grid: true,
            autosave: false,
        }
    }
}

impl EditorSettings {
    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "ultraed", "ultra-editor")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Read settings from `path`, `None` if missing or unreadable
    pub fn load_from(path: &Path) -> Option<Self> {
        let json = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&json) {
            Ok(settings) => Some(settings),
            Err(err) => {
                tracing::warn!("ignoring settings {}: {err}", path.display());
                None
            }
        }
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(dir) = path.parent() {
            if std::fs::create_dir_all(dir).is_err() {
                return;
            }
        }
        if let Ok(json) = serde_json::to_string_pretty(self) {
            if let Err(err) = std::fs::write(path, json) {
                tracing::warn!("cannot write settings {}: {err}", path.display());
            }
        }
    }
}
