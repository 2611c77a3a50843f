//! Headless test harness for programmatic scene manipulation.
//!
//! Wraps an [`EditorState`] with default settings (never the user's config)
//! and exposes a small, panic-free API for tests and the command protocol.

use glam::Vec3;
use shared::{ActorId, Snapshot};

use crate::history::Persistence;
use crate::state::{EditorError, EditorSettings, EditorState, GizmoModifier, Scene};

/// Headless test harness: editor state without UI or user settings
#[derive(Debug, Default)]
pub struct TestHarness {
    pub state: EditorState,
}

impl TestHarness {
    /// Create a new empty harness.
    pub fn new() -> Self {
        Self::default()
    }

    /// Harness with explicit settings
    pub fn with_settings(settings: EditorSettings) -> Self {
        Self {
            state: EditorState::with_settings(settings),
        }
    }

    // ── Scene manipulation ────────────────────────────────────

    /// Add a camera and return its ID
    pub fn add_camera(&mut self) -> ActorId {
        self.state.add_camera().unwrap_or_default()
    }

    /// Add a cube model and return its ID
    pub fn add_cube(&mut self, name: &str, size: f32) -> ActorId {
        self.state.add_cube(Some(name), size).unwrap_or_default()
    }

    /// Move the selected actors as one drag
    pub fn move_selected(&mut self, delta: Vec3) -> Result<usize, EditorError> {
        self.state.begin_drag(GizmoModifier::Move);
        let moved = self.state.drag(delta);
        self.state.end_drag();
        moved
    }

    /// Select exactly `ids`
    pub fn select_only(&mut self, ids: &[ActorId]) {
        self.state.unselect_all();
        for id in ids {
            self.state.select(*id, false);
        }
    }

    pub fn clear_selection(&mut self) {
        self.state.unselect_all();
    }

    /// Undo the last operation
    pub fn undo(&mut self) -> bool {
        self.state.undo().unwrap_or_else(|err| {
            tracing::warn!("undo failed: {err}");
            false
        })
    }

    /// Redo the last undone operation
    pub fn redo(&mut self) -> bool {
        self.state.redo().unwrap_or_else(|err| {
            tracing::warn!("redo failed: {err}");
            false
        })
    }

    /// Start over with an empty scene
    pub fn clear(&mut self) {
        self.state.new_scene();
    }

    /// Load a scene from JSON string (replaces current, resets history)
    pub fn load_scene_json(&mut self, json: &str) -> Result<(), String> {
        let document: Snapshot =
            serde_json::from_str(json).map_err(|e| format!("JSON parse error: {e}"))?;
        let scene = Scene::from_snapshot(&document).map_err(|e| e.to_string())?;
        self.state.replace_scene(scene);
        Ok(())
    }

    /// Export the current scene as JSON
    pub fn export_scene_json(&self) -> String {
        serde_json::to_string_pretty(&self.state.scene.save()).unwrap_or_default()
    }

    // ── Queries ───────────────────────────────────────────────

    /// Number of actors in the scene
    pub fn actor_count(&self) -> usize {
        self.state.scene.actor_count()
    }

    /// Number of recorded undo units
    pub fn history_len(&self) -> usize {
        self.state.history.len()
    }

    /// Current actor snapshot
    pub fn snapshot_of(&self, id: ActorId) -> Option<Snapshot> {
        self.state.scene.save_actor(id)
    }

    pub fn position_of(&self, id: ActorId) -> Option<Vec3> {
        self.state
            .scene
            .actor(id)
            .map(|actor| actor.borrow().transform.position)
    }

    pub fn selected(&self) -> Vec<ActorId> {
        self.state.scene.selected_ids()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_empty() {
        let h = TestHarness::new();
        assert_eq!(h.actor_count(), 0);
        assert_eq!(h.history_len(), 0);
    }

    #[test]
    fn test_harness_add_and_undo() {
        let mut h = TestHarness::new();
        let id = h.add_cube("c1", 1.0);
        assert_eq!(h.actor_count(), 1);
        assert_eq!(h.selected(), vec![id]);
        assert!(h.undo());
        assert_eq!(h.actor_count(), 0);
        assert!(h.redo());
        assert_eq!(h.actor_count(), 1);
        assert!(!h.redo());
    }

    #[test]
    fn test_harness_move_selected() {
        let mut h = TestHarness::new();
        let id = h.add_cube("c1", 1.0);
        assert_eq!(h.move_selected(Vec3::new(1.0, 0.0, 0.0)).unwrap(), 1);
        assert_eq!(h.position_of(id), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(h.history_len(), 2);
    }

    #[test]
    fn test_harness_export_load_round_trip() {
        let mut h = TestHarness::new();
        let id = h.add_cube("c1", 1.0);
        let json = h.export_scene_json();

        let mut h2 = TestHarness::new();
        h2.load_scene_json(&json).unwrap();
        assert_eq!(h2.actor_count(), 1);
        assert_eq!(h2.snapshot_of(id), h.snapshot_of(id));
        assert_eq!(h2.history_len(), 0);
    }

    #[test]
    fn test_harness_load_invalid_json() {
        let mut h = TestHarness::new();
        assert!(h.load_scene_json("{ not json").is_err());
        assert!(h.load_scene_json(r#"{ "actors": [] }"#).is_err());
    }
}
