//! Scene actors: models and cameras
//!
//! An actor serializes to a flat snapshot whose leaves are all strings (see
//! [`shared::text`]). Loading validates the whole document before touching the
//! actor, so a failed restore never leaves a half-applied actor behind.

use std::collections::BTreeMap;

use glam::{EulerRot, Quat, Vec3};
use serde_json::{json, Map, Value};
use shared::{
    text, ActorId, ActorType, ColliderType, Snapshot, SnapshotError, TEXTURE_DATA_PATH,
    VERTEX_DATA_PATH,
};

use crate::mesh;

/// Script every new actor starts with
pub const DEFAULT_SCRIPT: &str = "void $start()\n{\n\n}\n\nvoid $update()\n{\n\n}\n\n\
void $input(NUContData gamepads[4])\n{\n\n}\n\nvoid $collide(actor *other)\n{\n\n}";

/// Position, scale and rotation of an actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub scale: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Rotate by euler angles (radians, XYZ) on top of the current rotation
    pub fn rotate_euler(&mut self, angles: Vec3) {
        let delta = Quat::from_euler(EulerRot::XYZ, angles.x, angles.y, angles.z);
        self.rotation = (self.rotation * delta).normalize();
    }
}

/// Collision volume attached to an actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    Box { center: Vec3, extents: Vec3 },
    Sphere { center: Vec3, radius: f32 },
}

impl Collider {
    /// Fit a collider of `kind` around `vertices`
    pub fn from_vertices(kind: ColliderType, vertices: &[Vec3]) -> Self {
        let (min, max) = bounds(vertices);
        let center = (min + max) * 0.5;
        match kind {
            ColliderType::Box => Collider::Box {
                center,
                extents: (max - min) * 0.5,
            },
            ColliderType::Sphere => Collider::Sphere {
                center,
                radius: vertices
                    .iter()
                    .map(|v| v.distance(center))
                    .fold(0.0, f32::max),
            },
        }
    }

    pub fn kind(&self) -> ColliderType {
        match self {
            Collider::Box { .. } => ColliderType::Box,
            Collider::Sphere { .. } => ColliderType::Sphere,
        }
    }

    pub fn save(&self) -> Snapshot {
        match *self {
            Collider::Box { center, extents } => json!({
                "type": text::format_int(ColliderType::Box.tag()),
                "center": text::format_vec3(center),
                "extents": text::format_vec3(extents),
            }),
            Collider::Sphere { center, radius } => json!({
                "type": text::format_int(ColliderType::Sphere.tag()),
                "center": text::format_vec3(center),
                "radius": text::format_float(radius),
            }),
        }
    }

    pub fn load(snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        let center = text::vec3_field(snapshot, "center")?;
        match ColliderType::from_tag(text::int_field(snapshot, "type")?)? {
            ColliderType::Box => Ok(Collider::Box {
                center,
                extents: text::vec3_field(snapshot, "extents")?,
            }),
            ColliderType::Sphere => Ok(Collider::Sphere {
                center,
                radius: text::float_field(snapshot, "radius")?,
            }),
        }
    }
}

fn bounds(vertices: &[Vec3]) -> (Vec3, Vec3) {
    if vertices.is_empty() {
        return (Vec3::ZERO, Vec3::ZERO);
    }
    vertices.iter().fold(
        (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
        |(min, max), v| (min.min(*v), max.max(*v)),
    )
}

/// A placeable scene entity
#[derive(Debug, Clone)]
pub struct Actor {
    id: ActorId,
    pub name: String,
    pub kind: ActorType,
    pub transform: Transform,
    pub script: String,
    pub collider: Option<Collider>,
    /// Resource key (`vertexDataPath`, `textureDataPath`) to path
    pub resources: BTreeMap<String, String>,
    /// Triangle list, three vertices per triangle
    pub vertices: Vec<Vec3>,
}

impl Actor {
    pub fn new(kind: ActorType, name: impl Into<String>) -> Self {
        Self::with_id(shared::new_id(), kind, name)
    }

    fn with_id(id: ActorId, kind: ActorType, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            transform: Transform::default(),
            script: DEFAULT_SCRIPT.to_string(),
            collider: None,
            resources: BTreeMap::new(),
            vertices: Vec::new(),
        }
    }

    /// Model whose vertices come from `path` (OBJ file or cube preset)
    pub fn model_from_path(name: impl Into<String>, path: &str) -> Result<Self, mesh::MeshError> {
        let mut actor = Actor::new(ActorType::Model, name);
        actor.vertices = mesh::load_mesh(path)?;
        actor
            .resources
            .insert(VERTEX_DATA_PATH.to_string(), path.to_string());
        Ok(actor)
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Copy with a fresh id
    pub fn duplicate(&self) -> Self {
        Self {
            id: shared::new_id(),
            ..self.clone()
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn has_collider(&self) -> bool {
        self.collider.is_some()
    }

    pub fn set_collider(&mut self, kind: ColliderType) {
        self.collider = Some(Collider::from_vertices(kind, &self.vertices));
    }

    /// Textures only apply to models
    pub fn has_texture(&self) -> bool {
        self.kind == ActorType::Model && self.resources.contains_key(TEXTURE_DATA_PATH)
    }

    pub fn texture_path(&self) -> Option<&str> {
        self.resources.get(TEXTURE_DATA_PATH).map(String::as_str)
    }

    /// Attach a texture, returns `false` for non-model actors.
    pub fn set_texture(&mut self, path: &str) -> bool {
        if self.kind != ActorType::Model {
            return false;
        }
        self.resources
            .insert(TEXTURE_DATA_PATH.to_string(), path.to_string());
        true
    }

    pub fn delete_texture(&mut self) {
        self.resources.remove(TEXTURE_DATA_PATH);
    }

    /// Drop loaded resource data. Paths are kept so the actor can be restored.
    pub fn release(&mut self) {
        self.vertices.clear();
        self.vertices.shrink_to_fit();
    }

    pub fn save(&self) -> Snapshot {
        let resources: Vec<Value> = self
            .resources
            .iter()
            .map(|(key, path)| {
                let mut entry = Map::new();
                entry.insert(key.clone(), Value::String(path.clone()));
                Value::Object(entry)
            })
            .collect();

        let mut snapshot = json!({
            "id": text::format_id(self.id),
            "name": self.name,
            "type": text::format_int(self.kind.tag()),
            "position": text::format_vec3(self.transform.position),
            "scale": text::format_vec3(self.transform.scale),
            "rotation": text::format_quat(self.transform.rotation),
            "script": self.script,
            "resources": resources,
        });
        if let (Some(collider), Some(map)) = (self.collider, snapshot.as_object_mut()) {
            map.insert("collider".to_string(), collider.save());
        }
        snapshot
    }

    /// Id recorded in an actor snapshot
    pub fn snapshot_id(snapshot: &Snapshot) -> Result<ActorId, SnapshotError> {
        text::id_field(snapshot, "id")
    }

    /// Actor type recorded in an actor snapshot
    pub fn snapshot_type(snapshot: &Snapshot) -> Result<ActorType, SnapshotError> {
        ActorType::from_tag(text::int_field(snapshot, "type")?)
    }

    /// Build a new actor from a snapshot
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        let mut actor = Actor::with_id(
            Actor::snapshot_id(snapshot)?,
            Actor::snapshot_type(snapshot)?,
            "",
        );
        actor.load(snapshot)?;
        Ok(actor)
    }

    /// Overwrite this actor with the contents of `snapshot`.
    ///
    /// Vertex data is re-imported only when its path changed or nothing is
    /// loaded yet. A mesh that cannot be read is logged and its path kept.
    pub fn load(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        text::as_object(snapshot, "actor")?;
        let id = Actor::snapshot_id(snapshot)?;
        let kind = Actor::snapshot_type(snapshot)?;
        let name = text::str_field(snapshot, "name")?;
        let transform = Transform {
            position: text::vec3_field(snapshot, "position")?,
            scale: text::vec3_field(snapshot, "scale")?,
            rotation: text::quat_field(snapshot, "rotation")?,
        };
        let script = text::str_field(snapshot, "script")?;
        let collider = text::opt_object_field(snapshot, "collider")?
            .map(Collider::load)
            .transpose()?;
        let resources = load_resources(text::array_field(snapshot, "resources")?)?;

        let reimport = resources.get(VERTEX_DATA_PATH).filter(|path| {
            self.vertices.is_empty() || self.resources.get(VERTEX_DATA_PATH) != Some(*path)
        });
        if let Some(path) = reimport {
            self.vertices = match mesh::load_mesh(path) {
                Ok(vertices) => vertices,
                Err(err) => {
                    tracing::warn!("actor '{name}': cannot import mesh {path}: {err}");
                    Vec::new()
                }
            };
        }

        self.id = id;
        self.kind = kind;
        self.name = name.to_string();
        self.transform = transform;
        self.script = script.to_string();
        self.collider = collider;
        self.resources = resources;
        Ok(())
    }
}

/// Read `[{"key": "path"}, ...]` into a map
fn load_resources(entries: &[Value]) -> Result<BTreeMap<String, String>, SnapshotError> {
    let mut resources = BTreeMap::new();
    for entry in entries {
        let map = text::as_object(entry, "resources")?;
        for (key, path) in map {
            let path = path
                .as_str()
                .ok_or_else(|| SnapshotError::missing(key))?;
            resources.insert(key.clone(), path.to_string());
        }
    }
    Ok(resources)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(name: &str) -> Actor {
        Actor::model_from_path(name, &mesh::cube_preset_path(2.0)).unwrap()
    }

    #[test]
    fn test_new_actor_defaults() {
        let actor = Actor::new(ActorType::Camera, "Camera 1");
        assert_eq!(actor.transform, Transform::default());
        assert!(actor.script.contains("$collide"));
        assert!(!actor.has_collider());
        assert!(actor.resources.is_empty());
    }

    #[test]
    fn test_save_uses_string_leaves() {
        let mut actor = cube("Box");
        actor.transform.position = Vec3::new(1.0, 2.0, 3.0);
        let snapshot = actor.save();

        assert_eq!(snapshot["type"], "0");
        assert_eq!(snapshot["position"], "1.000000 2.000000 3.000000");
        assert_eq!(snapshot["scale"], "1.000000 1.000000 1.000000");
        assert_eq!(snapshot["rotation"], "0.000000 0.000000 0.000000 1.000000");
        assert_eq!(snapshot["resources"][0][VERTEX_DATA_PATH], "preset:cube:2.000000");
        assert!(snapshot.get("collider").is_none());
    }

    #[test]
    fn test_load_restores_fields() {
        let mut actor = cube("Box");
        actor.set_collider(ColliderType::Sphere);
        actor.set_texture("brick.png");
        actor.script = "void $start() {}".to_string();
        let snapshot = actor.save();

        let restored = Actor::from_snapshot(&snapshot).unwrap();
        assert_eq!(restored.id(), actor.id());
        assert_eq!(restored.name, "Box");
        assert_eq!(restored.script, actor.script);
        assert_eq!(restored.collider.map(|c| c.kind()), Some(ColliderType::Sphere));
        assert_eq!(restored.texture_path(), Some("brick.png"));
        assert_eq!(restored.triangle_count(), 12);
    }

    #[test]
    fn test_failed_load_leaves_actor_untouched() {
        let mut actor = cube("Box");
        let mut snapshot = actor.save();
        snapshot["name"] = json!("Renamed");
        snapshot["scale"] = json!("one two three");

        let err = actor.load(&snapshot).unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidValue { ref field, .. } if field == "scale"));
        assert_eq!(actor.name, "Box");
    }

    #[test]
    fn test_missing_mesh_keeps_path() {
        let mut actor = cube("Box");
        let mut snapshot = actor.save();
        snapshot["resources"] = json!([{ "vertexDataPath": "/missing/mesh.obj" }]);

        actor.load(&snapshot).unwrap();
        assert!(actor.vertices.is_empty());
        assert_eq!(
            actor.resources.get(VERTEX_DATA_PATH).map(String::as_str),
            Some("/missing/mesh.obj")
        );
    }

    #[test]
    fn test_box_collider_bounds() {
        let actor = cube("Box");
        let collider = Collider::from_vertices(ColliderType::Box, &actor.vertices);
        assert_eq!(
            collider,
            Collider::Box {
                center: Vec3::ZERO,
                extents: Vec3::ONE
            }
        );
    }

    #[test]
    fn test_camera_has_no_texture() {
        let mut camera = Actor::new(ActorType::Camera, "Camera");
        assert!(!camera.set_texture("brick.png"));
        assert!(!camera.has_texture());
    }

    #[test]
    fn test_duplicate_gets_new_id() {
        let actor = cube("Box");
        let copy = actor.duplicate();
        assert_ne!(copy.id(), actor.id());
        assert_eq!(copy.vertices.len(), actor.vertices.len());
    }

    #[test]
    fn test_rotate_euler() {
        let mut transform = Transform::default();
        transform.rotate_euler(Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
        let forward = transform.rotation * Vec3::Z;
        assert!((forward - Vec3::X).length() < 1e-5);
    }
}
