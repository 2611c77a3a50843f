//! Factory functions for creating test data.
//!
//! Provides convenient helpers to construct `Actor`, `Scene` and scene
//! documents used in tests and by the command interface.

use glam::Vec3;
use shared::{ActorType, ColliderType, Snapshot};

use crate::mesh;
use crate::state::{Actor, Scene, SceneSettings};

// ── Mesh sources ────────────────────────────────────────────────

/// Single triangle in OBJ form
pub const TRIANGLE_OBJ: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

/// Unit quad in OBJ form, two triangles once fanned
pub const QUAD_OBJ: &str = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";

// ── Actor factories ─────────────────────────────────────────────

/// Cube model of edge `size`, 12 triangles.
pub fn cube_actor(name: &str, size: f32) -> Actor {
    let mut actor = Actor::new(ActorType::Model, name);
    actor.vertices = mesh::cube(size);
    actor.resources.insert(
        shared::VERTEX_DATA_PATH.to_string(),
        mesh::cube_preset_path(size),
    );
    actor
}

/// Cube model placed at `position`.
pub fn cube_actor_at(name: &str, size: f32, position: Vec3) -> Actor {
    let mut actor = cube_actor(name, size);
    actor.transform.position = position;
    actor
}

pub fn camera_actor(name: &str) -> Actor {
    Actor::new(ActorType::Camera, name)
}

/// Cube with a box collider and a texture path.
pub fn decorated_cube(name: &str) -> Actor {
    let mut actor = cube_actor(name, 2.0);
    actor.set_collider(ColliderType::Box);
    actor.set_texture("textures/brick.png");
    actor.script = "void $start()\n{\n    // spin\n}\n".to_string();
    actor
}

// ── Scene factories ─────────────────────────────────────────────

/// Scene holding `actors`, marked clean.
pub fn scene_with(actors: Vec<Actor>) -> Scene {
    let mut scene = Scene::new(SceneSettings::default());
    for actor in actors {
        scene.insert(actor);
    }
    scene.set_dirty(false);
    scene
}

/// Camera, plain cube and decorated cube with a blue background.
pub fn sample_scene() -> Scene {
    let mut scene = scene_with(vec![
        camera_actor("Camera 1"),
        cube_actor_at("Cube 2", 1.0, Vec3::new(0.0, 0.5, 0.0)),
        decorated_cube("Crate 3"),
    ]);
    scene.settings.background_color = [0, 0, 128];
    scene
}

/// Saved document of [`sample_scene`].
pub fn sample_scene_document() -> Snapshot {
    sample_scene().save()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_scene() {
        let scene = sample_scene();
        assert_eq!(scene.actor_count(), 3);
        assert!(!scene.is_dirty());
        assert_eq!(scene.stats(), "Actors:3 | Tris:24");
    }

    #[test]
    fn test_fixture_objs_parse() {
        assert_eq!(mesh::parse_obj(TRIANGLE_OBJ).unwrap().len(), 3);
        assert_eq!(mesh::parse_obj(QUAD_OBJ).unwrap().len(), 6);
    }

    #[test]
    fn test_decorated_cube() {
        let actor = decorated_cube("Crate");
        assert!(actor.has_collider());
        assert!(actor.has_texture());
    }
}
