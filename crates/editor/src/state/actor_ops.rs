//! Actor operations: creation, deletion, components

use std::path::Path;

use shared::{ActorId, ActorType, ColliderType};

use super::actor::Actor;
use super::{EditorError, EditorState};
use crate::mesh;

impl EditorState {
    /// Insert `actor`, record the addition and select it
    fn add_and_record(&mut self, actor: Actor, label: &str) -> Result<ActorId, EditorError> {
        let id = actor.id();
        self.scene.insert(actor);
        self.history.add_actor(label, id, None, &self.scene)?;
        self.scene.select(id, true);
        Ok(id)
    }

    fn next_number(&self) -> usize {
        self.scene.actor_count() + 1
    }

    pub fn add_camera(&mut self) -> Result<ActorId, EditorError> {
        let actor = Actor::new(ActorType::Camera, format!("Camera {}", self.next_number()));
        self.add_and_record(actor, "Camera")
    }

    /// Add a model imported from an OBJ file
    pub fn add_model(&mut self, path: &Path) -> Result<ActorId, EditorError> {
        if !path.exists() {
            return Err(EditorError::ResourceNotFound(path.to_path_buf()));
        }
        let name = format!("Actor {}", self.next_number());
        let actor = Actor::model_from_path(name, &path.to_string_lossy())?;
        self.add_and_record(actor, "Model")
    }

    /// Add a generated cube model of edge length `size`
    pub fn add_cube(&mut self, name: Option<&str>, size: f32) -> Result<ActorId, EditorError> {
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("Cube {}", self.next_number()),
        };
        let actor = Actor::model_from_path(name, &mesh::cube_preset_path(size))?;
        self.add_and_record(actor, "Model")
    }

    /// Copy every selected actor. All copies are one undo step.
    pub fn duplicate(&mut self) -> Result<Vec<ActorId>, EditorError> {
        let group = shared::new_id();
        let mut copies = Vec::new();

        for id in self.scene.selected_ids() {
            let Some(source) = self.scene.actor(id) else {
                continue;
            };
            let copy = source.borrow().duplicate();
            let copy_id = copy.id();
            let label = copy.kind.display_name();
            self.scene.insert(copy);
            self.history.add_actor(label, copy_id, Some(group), &self.scene)?;
            copies.push(copy_id);
        }
        Ok(copies)
    }

    /// Delete every selected actor. All deletions are one undo step.
    pub fn delete_selected(&mut self) -> Result<usize, EditorError> {
        let group = shared::new_id();
        let selected = self.scene.selected_ids();
        for id in &selected {
            self.history
                .delete_actor("Actor", *id, Some(group), &mut self.scene)?;
        }
        Ok(selected.len())
    }

    pub fn select(&mut self, id: ActorId, clear_others: bool) {
        self.scene.select(id, clear_others);
    }

    pub fn select_all(&mut self) {
        self.scene.select_all();
    }

    pub fn unselect_all(&mut self) {
        self.scene.unselect_all();
    }

    /// Run `edit` on each selected actor accepted by `filter`, recording one
    /// grouped change per actor before it is edited.
    fn change_selected(
        &mut self,
        label: &str,
        filter: impl Fn(&Actor) -> bool,
        mut edit: impl FnMut(&mut Actor),
    ) -> Result<usize, EditorError> {
        let selected = self.scene.selected_ids();
        if selected.is_empty() {
            return Err(EditorError::NothingSelected);
        }

        let group = shared::new_id();
        let mut changed = 0;
        for id in selected {
            let Some(actor) = self.scene.actor(id) else {
                continue;
            };
            if !filter(&actor.borrow()) {
                continue;
            }
            self.history.change_actor(label, id, Some(group), &self.scene)?;
            edit(&mut actor.borrow_mut());
            changed += 1;
        }
        if changed > 0 {
            self.scene.mark_changed();
        }
        Ok(changed)
    }

    pub fn add_collider(&mut self, kind: ColliderType) -> Result<usize, EditorError> {
        self.change_selected("Add Collider", |_| true, |actor| actor.set_collider(kind))
    }

    pub fn delete_collider(&mut self) -> Result<usize, EditorError> {
        self.change_selected("Delete Collider", |_| true, |actor| actor.collider = None)
    }

    /// Attach the texture at `path` to the selected models
    pub fn add_texture(&mut self, path: &Path) -> Result<usize, EditorError> {
        if self.scene.selection().is_empty() {
            return Err(EditorError::NothingSelected);
        }
        if !path.exists() {
            return Err(EditorError::ResourceNotFound(path.to_path_buf()));
        }
        let path = path.to_string_lossy();
        self.change_selected(
            "Add Texture",
            |actor| actor.kind == ActorType::Model,
            |actor| {
                actor.set_texture(&path);
            },
        )
    }

    pub fn delete_texture(&mut self) -> Result<usize, EditorError> {
        self.change_selected(
            "Delete Texture",
            |actor| actor.kind == ActorType::Model,
            Actor::delete_texture,
        )
    }

    /// Replace the script of the first selected actor
    pub fn set_script(&mut self, script: &str) -> Result<ActorId, EditorError> {
        let id = self
            .scene
            .selection()
            .primary()
            .ok_or(EditorError::NothingSelected)?;
        let actor = self.scene.actor(id).ok_or(EditorError::NothingSelected)?;
        self.history.change_actor("Script Change", id, None, &self.scene)?;
        actor.borrow_mut().script = script.to_string();
        self.scene.mark_changed();
        Ok(id)
    }
}
