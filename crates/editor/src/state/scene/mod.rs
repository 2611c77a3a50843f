//! Scene state management
//!
//! This module provides the actor graph, selection, views and scene-level
//! settings. Actors are shared handles keyed by id; restoring a snapshot of a
//! live actor updates the existing handle instead of replacing it.

mod display;
mod persistence;
mod snapshot;
mod view;

pub use display::{actor_display_name, short_id};
pub use view::View;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use shared::{ActorId, ActorType, ViewType};

use super::actor::Actor;
use super::selection::Selection;

/// Shared handle to a live actor
pub type ActorRef = Rc<RefCell<Actor>>;

/// Scene-level settings, the part of the scene covered by partial snapshots
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneSettings {
    /// Viewport clear colour RGB
    pub background_color: [u8; 3],
    /// Gizmo translation snap step
    pub gizmo_snap_size: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            background_color: [0, 0, 0],
            gizmo_snap_size: 0.5,
        }
    }
}

/// Actors, selection and views of one level
#[derive(Debug)]
pub struct Scene {
    actors: BTreeMap<ActorId, ActorRef>,
    selection: Selection,
    pub settings: SceneSettings,
    pub views: [View; 4],
    pub active_view: ViewType,
    name: String,
    dirty: bool,
    /// Monotonically increasing version counter for cache invalidation
    version: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneSettings::default())
    }
}

impl Scene {
    pub fn new(settings: SceneSettings) -> Self {
        Self {
            actors: BTreeMap::new(),
            selection: Selection::default(),
            settings,
            views: View::initial_set(),
            active_view: ViewType::Perspective,
            name: "Untitled".to_string(),
            dirty: false,
            version: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Window title, `*` marks unsaved changes
    pub fn title(&self) -> String {
        if self.dirty {
            format!("{}*", self.name)
        } else {
            self.name.clone()
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Record a mutation: bump the version and mark unsaved
    pub fn mark_changed(&mut self) {
        self.version += 1;
        self.dirty = true;
    }

    // ── Actors ────────────────────────────────────────────────

    pub fn actor(&self, id: ActorId) -> Option<ActorRef> {
        self.actors.get(&id).cloned()
    }

    /// Live actors in id order
    pub fn actors(&self) -> impl Iterator<Item = &ActorRef> {
        self.actors.values()
    }

    pub fn actor_ids(&self) -> Vec<ActorId> {
        self.actors.keys().copied().collect()
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Add a new actor and return its handle
    pub fn insert(&mut self, actor: Actor) -> ActorRef {
        let id = actor.id();
        let handle = Rc::new(RefCell::new(actor));
        self.actors.insert(id, Rc::clone(&handle));
        self.mark_changed();
        handle
    }

    /// Remove an actor, releasing its resources and unselecting it
    pub fn remove(&mut self, id: ActorId) -> Option<ActorRef> {
        let actor = self.actors.remove(&id)?;
        actor.borrow_mut().release();
        self.selection.remove(id);
        self.mark_changed();
        Some(actor)
    }

    /// Remove every actor
    pub fn clear(&mut self) {
        for actor in self.actors.values() {
            actor.borrow_mut().release();
        }
        self.actors.clear();
        self.selection.clear();
    }

    // ── Selection ─────────────────────────────────────────────

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected ids, copied so callers may mutate the scene while iterating
    pub fn selected_ids(&self) -> Vec<ActorId> {
        self.selection.all().to_vec()
    }

    /// Select `id`, toggling it off if already selected.
    ///
    /// `clear_others` empties the selection first. Unknown ids are ignored.
    pub fn select(&mut self, id: ActorId, clear_others: bool) {
        if clear_others {
            self.selection.clear();
        }
        if !self.actors.contains_key(&id) {
            return;
        }
        self.selection.toggle(id);
    }

    pub fn select_all(&mut self) {
        self.selection.clear();
        for id in self.actors.keys() {
            self.selection.toggle(*id);
        }
    }

    pub fn unselect_all(&mut self) {
        self.selection.clear();
    }

    // ── Views ─────────────────────────────────────────────────

    pub fn active_view(&self) -> &View {
        &self.views[self.active_view.index()]
    }

    /// Status bar line, e.g. `"Actors:3 | Tris:24"`
    pub fn stats(&self) -> String {
        let tris: usize = self
            .actors
            .values()
            .map(|actor| actor.borrow())
            .filter(|actor| actor.kind == ActorType::Model)
            .map(|actor| actor.triangle_count())
            .sum();
        format!("Actors:{} | Tris:{}", self.actors.len(), tris)
    }
}
