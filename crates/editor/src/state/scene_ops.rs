//! Scene-level operations: files, settings, history traversal

use std::path::Path;

use super::scene::Scene;
use super::{EditorError, EditorState};

impl EditorState {
    /// Replace the scene with an empty one and forget all history
    pub fn new_scene(&mut self) {
        self.scene.clear();
        self.scene = Scene::new(self.settings.new_scene);
        self.history.reset();
        self.gesture = None;
        self.file_path = None;
        tracing::info!("new scene");
    }

    pub fn save_to(&mut self, path: &Path) -> Result<(), EditorError> {
        self.scene.write_file(path)?;
        self.file_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Load a scene file. On failure the open scene and history are kept.
    pub fn load_from(&mut self, path: &Path) -> Result<(), EditorError> {
        let scene = Scene::read_file(path)?;
        self.replace_scene(scene);
        self.file_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Swap in an already loaded scene and forget all history
    pub fn replace_scene(&mut self, scene: Scene) {
        self.scene.clear();
        self.scene = scene;
        self.history.reset();
        self.gesture = None;
    }

    /// Scene name with `*` when there are unsaved changes
    pub fn title(&self) -> String {
        self.scene.title()
    }

    pub fn is_dirty(&self) -> bool {
        self.scene.is_dirty()
    }

    pub fn set_background_color(&mut self, rgb: [u8; 3]) -> Result<(), EditorError> {
        self.history.change_scene("Background Color", &self.scene)?;
        self.scene.settings.background_color = rgb;
        self.scene.mark_changed();
        Ok(())
    }

    pub fn set_gizmo_snap_size(&mut self, size: f32) -> Result<(), EditorError> {
        self.history.change_scene("Snap Size", &self.scene)?;
        self.scene.settings.gizmo_snap_size = size;
        self.scene.mark_changed();
        Ok(())
    }

    /// Undo one step. Returns `false` when there was nothing to undo.
    pub fn undo(&mut self) -> Result<bool, EditorError> {
        self.end_drag();
        Ok(self.history.undo(&mut self.scene)?)
    }

    /// Redo one step. Returns `false` when there was nothing to redo.
    pub fn redo(&mut self) -> Result<bool, EditorError> {
        self.end_drag();
        Ok(self.history.redo(&mut self.scene)?)
    }

    /// Status bar line, e.g. `"Actors:3 | Tris:24"`
    pub fn stats(&self) -> String {
        self.scene.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_color_undo() {
        let mut state = EditorState::default();
        state.set_background_color([200, 100, 50]).unwrap();
        assert_eq!(state.history.labels().undo.as_deref(), Some("Background Color"));

        assert!(state.undo().unwrap());
        assert_eq!(state.scene.settings.background_color, [0, 0, 0]);
        assert!(state.redo().unwrap());
        assert_eq!(state.scene.settings.background_color, [200, 100, 50]);
    }

    #[test]
    fn test_new_scene_resets() {
        let mut state = EditorState::default();
        state.set_gizmo_snap_size(2.0).unwrap();
        state.add_camera().unwrap();

        state.new_scene();
        assert_eq!(state.scene.actor_count(), 0);
        assert_eq!(state.scene.settings.gizmo_snap_size, 0.5);
        assert!(state.history.is_empty());
        assert!(state.history.store().is_empty());
        assert!(!state.is_dirty());
        assert!(!state.undo().unwrap());
    }

    #[test]
    fn test_title_tracks_dirty() {
        let mut state = EditorState::default();
        assert_eq!(state.title(), "Untitled");
        state.add_camera().unwrap();
        assert_eq!(state.title(), "Untitled*");
    }

    #[test]
    fn test_load_failure_keeps_scene() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ultra");
        std::fs::write(&path, r#"{ "views": [] }"#).unwrap();

        let mut state = EditorState::default();
        let id = state.add_camera().unwrap();
        let err = state.load_from(&path).unwrap_err();
        assert!(matches!(err, EditorError::Snapshot(_)));
        assert!(state.scene.actor(id).is_some());
        assert_eq!(state.history.len(), 1);
    }
}
