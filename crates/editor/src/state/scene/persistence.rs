//! Scene files and autosave

use std::path::{Path, PathBuf};

use super::Scene;
use crate::state::EditorError;

impl Scene {
    /// Write the scene document to `path` and take the file stem as scene name
    pub fn write_file(&mut self, path: &Path) -> Result<(), EditorError> {
        let json = serde_json::to_string_pretty(&self.save())?;
        std::fs::write(path, json)?;
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            self.name = stem.to_string();
        }
        self.dirty = false;
        tracing::info!("scene saved to {}", path.display());
        Ok(())
    }

    /// Read a scene document from `path`
    pub fn read_file(path: &Path) -> Result<Scene, EditorError> {
        let json = std::fs::read_to_string(path)?;
        let document: serde_json::Value = serde_json::from_str(&json)?;
        let mut scene = Scene::from_snapshot(&document)?;
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            scene.name = stem.to_string();
        }
        tracing::info!(
            "scene loaded from {} ({} actors)",
            path.display(),
            scene.actor_count()
        );
        Ok(scene)
    }

    /// Get autosave file path
    fn autosave_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "ultraed", "ultra-editor")
            .map(|dirs| dirs.data_dir().join(format!("autosave.{}", shared::SCENE_FILE_EXT)))
    }

    /// Save scene to autosave file
    pub fn autosave(&self) {
        let Some(path) = Self::autosave_path() else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(&self.save()) {
            Ok(json) => {
                if let Err(err) = std::fs::write(&path, json) {
                    tracing::warn!("autosave to {} failed: {err}", path.display());
                }
            }
            Err(err) => tracing::warn!("autosave failed: {err}"),
        }
    }

    /// Load scene from autosave file
    pub fn load_autosave() -> Option<Scene> {
        let path = Self::autosave_path().filter(|p| p.exists())?;
        match Self::read_file(&path) {
            Ok(scene) => Some(scene),
            Err(err) => {
                tracing::warn!("ignoring autosave {}: {err}", path.display());
                None
            }
        }
    }
}
