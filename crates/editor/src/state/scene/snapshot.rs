//! Scene snapshots and the history replay target

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Map, Value};
use shared::{text, ActorId, Snapshot, SnapshotError, ViewType};

use super::{Scene, SceneSettings, View};
use crate::history::Persistence;
use crate::state::actor::Actor;

impl SceneSettings {
    /// Write `background_color` and `gizmo_snap_size` into `root`
    pub fn save_into(&self, root: &mut Map<String, Value>) {
        root.insert(
            "background_color".to_string(),
            Value::String(text::format_rgb(self.background_color)),
        );
        root.insert(
            "gizmo_snap_size".to_string(),
            Value::String(text::format_float(self.gizmo_snap_size)),
        );
    }

    pub fn load(snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        Ok(Self {
            background_color: text::rgb_field(snapshot, "background_color")?,
            gizmo_snap_size: text::float_field(snapshot, "gizmo_snap_size")?,
        })
    }
}

impl Scene {
    /// Full scene document: views, active view, actors and settings
    pub fn save(&self) -> Snapshot {
        let mut root = Map::new();
        root.insert(
            "views".to_string(),
            Value::Array(self.views.iter().map(View::save).collect()),
        );
        root.insert(
            "active_view".to_string(),
            Value::String(text::format_int(self.active_view.tag())),
        );
        root.insert(
            "actors".to_string(),
            Value::Array(self.actors().map(|a| a.borrow().save()).collect()),
        );
        self.settings.save_into(&mut root);
        Value::Object(root)
    }

    /// Build a scene from a saved document.
    ///
    /// The current scene is never touched: callers swap the result in only
    /// when the whole document was read.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Scene, SnapshotError> {
        text::as_object(snapshot, "scene")?;
        let mut scene = Scene::new(SceneSettings::load(snapshot)?);

        for (slot, item) in scene.views.iter_mut().zip(text::array_field(snapshot, "views")?) {
            *slot = View::load(slot.kind, item)?;
        }
        scene.active_view = ViewType::from_tag(text::int_field(snapshot, "active_view")?)?;

        for item in text::array_field(snapshot, "actors")? {
            scene.restore_actor(item)?;
        }

        scene.dirty = false;
        Ok(scene)
    }

    /// Restore one actor, updating it in place when its id is live.
    pub fn restore_actor(&mut self, snapshot: &Snapshot) -> Result<ActorId, SnapshotError> {
        let id = Actor::snapshot_id(snapshot)?;
        match self.actors.get(&id) {
            Some(existing) => existing.borrow_mut().load(snapshot)?,
            None => {
                let actor = Actor::from_snapshot(snapshot)?;
                self.actors.insert(id, Rc::new(RefCell::new(actor)));
            }
        }
        tracing::trace!("restored actor {id}");
        self.mark_changed();
        Ok(id)
    }
}

impl Persistence for Scene {
    fn contains_actor(&self, id: ActorId) -> bool {
        self.actors.contains_key(&id)
    }

    fn save_actor(&self, id: ActorId) -> Option<Snapshot> {
        self.actors.get(&id).map(|actor| actor.borrow().save())
    }

    fn restore_actor(&mut self, snapshot: &Snapshot) -> Result<ActorId, SnapshotError> {
        Scene::restore_actor(self, snapshot)
    }

    fn delete_actor(&mut self, id: ActorId) -> bool {
        self.remove(id).is_some()
    }

    fn select_actor(&mut self, id: ActorId, clear_others: bool) {
        self.select(id, clear_others);
    }

    fn unselect_all(&mut self) {
        Scene::unselect_all(self);
    }

    fn partial_save(&self) -> Snapshot {
        let mut root = Map::new();
        self.settings.save_into(&mut root);
        Value::Object(root)
    }

    fn partial_load(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        self.settings = SceneSettings::load(snapshot)?;
        self.mark_changed();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh;
    use glam::Vec3;
    use serde_json::json;
    use shared::{ActorType, ColliderType};

    fn cube_scene() -> (Scene, ActorId) {
        let mut scene = Scene::default();
        let actor = Actor::model_from_path("Cube", &mesh::cube_preset_path(2.0)).unwrap();
        let id = actor.id();
        scene.insert(actor);
        (scene, id)
    }

    #[test]
    fn test_partial_save_has_only_settings() {
        let (scene, _) = cube_scene();
        let partial = scene.partial_save();
        assert_eq!(
            partial,
            json!({ "background_color": "0 0 0", "gizmo_snap_size": "0.500000" })
        );
    }

    #[test]
    fn test_partial_load() {
        let mut scene = Scene::default();
        scene
            .partial_load(&json!({ "background_color": "10 20 30", "gizmo_snap_size": "0.25" }))
            .unwrap();
        assert_eq!(scene.settings.background_color, [10, 20, 30]);
        assert_eq!(scene.settings.gizmo_snap_size, 0.25);
    }

    #[test]
    fn test_partial_load_rejects_bad_color() {
        let mut scene = Scene::default();
        let err = scene
            .partial_load(&json!({ "background_color": "red", "gizmo_snap_size": "0.25" }))
            .unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidValue { .. }));
        assert_eq!(scene.settings, SceneSettings::default());
    }

    #[test]
    fn test_restore_in_place_keeps_handle() {
        let (mut scene, id) = cube_scene();
        let handle = scene.actor(id).unwrap();
        let before = scene.save_actor(id).unwrap();

        handle.borrow_mut().transform.position = Vec3::new(5.0, 0.0, 0.0);
        scene.restore_actor(&before).unwrap();

        let after = scene.actor(id).unwrap();
        assert!(Rc::ptr_eq(&handle, &after));
        assert_eq!(after.borrow().transform.position, Vec3::ZERO);
    }

    #[test]
    fn test_restore_unknown_id_inserts() {
        let (mut scene, id) = cube_scene();
        let snapshot = scene.save_actor(id).unwrap();
        scene.delete_actor(id);
        assert!(!scene.contains_actor(id));

        assert_eq!(scene.restore_actor(&snapshot).unwrap(), id);
        let actor = scene.actor(id).unwrap();
        assert_eq!(actor.borrow().kind, ActorType::Model);
        assert_eq!(actor.borrow().triangle_count(), 12);
    }

    #[test]
    fn test_restore_unknown_type() {
        let (mut scene, id) = cube_scene();
        let mut snapshot = scene.save_actor(id).unwrap();
        snapshot["id"] = json!(text::format_id(shared::new_id()));
        snapshot["type"] = json!("9");
        let err = scene.restore_actor(&snapshot).unwrap_err();
        assert_eq!(
            err,
            SnapshotError::UnknownEntityType {
                kind: "actor",
                tag: 9
            }
        );
        assert_eq!(scene.actor_count(), 1);
    }

    #[test]
    fn test_scene_document_round_trip() {
        let (mut scene, id) = cube_scene();
        scene.insert(Actor::new(ActorType::Camera, "Camera 2"));
        scene.actor(id).unwrap().borrow_mut().set_collider(ColliderType::Box);
        scene.settings.background_color = [1, 2, 3];
        scene.active_view = ViewType::Top;

        let document = scene.save();
        assert_eq!(document["views"].as_array().map(Vec::len), Some(4));
        assert_eq!(document["active_view"], "1");

        let loaded = Scene::from_snapshot(&document).unwrap();
        assert_eq!(loaded.actor_count(), 2);
        assert_eq!(loaded.settings.background_color, [1, 2, 3]);
        assert_eq!(loaded.active_view, ViewType::Top);
        assert!(loaded.actor(id).unwrap().borrow().has_collider());
        assert!(!loaded.is_dirty());
        assert_eq!(loaded.save(), document);
    }

    #[test]
    fn test_from_snapshot_missing_actors() {
        let (scene, _) = cube_scene();
        let mut document = scene.save();
        if let Some(map) = document.as_object_mut() {
            map.remove("actors");
        }
        let err = Scene::from_snapshot(&document).unwrap_err();
        assert_eq!(err, SnapshotError::missing("actors"));
    }
}
