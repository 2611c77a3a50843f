//! Undo/redo history
//!
//! The log records whole-actor and scene-settings snapshots rather than field
//! deltas. Snapshots live in a [`SnapshotStore`] and units only hold their
//! ids, so a state captured once is reused for every later undo or redo of the
//! same unit. Units recorded under one group id are traversed as one step.

mod potential;
mod store;
mod unit;

pub use potential::PotentialChange;
pub use store::SnapshotStore;
pub use unit::{Direction, EditingContext, UndoOp, UndoUnit};

use shared::{ActorId, GroupId, Snapshot, SnapshotError, StateId};
use thiserror::Error;

use potential::PotentialTable;

/// Default number of units kept before the oldest is evicted
pub const DEFAULT_CAPACITY: usize = 100;

/// Live scene operations the history replays against.
///
/// Restoring must update an existing actor in place when its id is already
/// live; units recorded earlier keep referring to the actor by id across any
/// number of undo/redo cycles.
pub trait Persistence {
    fn contains_actor(&self, id: ActorId) -> bool;
    /// Full snapshot of a live actor, `None` when the id is unknown
    fn save_actor(&self, id: ActorId) -> Option<Snapshot>;
    /// Update-in-place or insert, returning the restored actor's id
    fn restore_actor(&mut self, snapshot: &Snapshot) -> Result<ActorId, SnapshotError>;
    /// Remove a live actor, `false` when the id is unknown
    fn delete_actor(&mut self, id: ActorId) -> bool;
    fn select_actor(&mut self, id: ActorId, clear_others: bool);
    fn unselect_all(&mut self);
    /// Snapshot of scene-level settings only
    fn partial_save(&self) -> Snapshot;
    fn partial_load(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError>;
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("actor {0} is not in the scene")]
    ActorNotFound(ActorId),
    #[error("state {0} was never captured")]
    MissingState(StateId),
    #[error("unit has no state to redo from")]
    NoRedoState,
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Names of the units on either side of the cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryLabels {
    pub undo: Option<String>,
    pub redo: Option<String>,
}

impl HistoryLabels {
    /// Menu text, e.g. `"Undo - Add Camera\tCtrl+Z"`
    pub fn undo_text(&self) -> String {
        menu_text("Undo", self.undo.as_deref(), "Ctrl+Z")
    }

    /// Menu text, e.g. `"Redo - Move\tCtrl+Y"`
    pub fn redo_text(&self) -> String {
        menu_text("Redo", self.redo.as_deref(), "Ctrl+Y")
    }
}

fn menu_text(verb: &str, name: Option<&str>, shortcut: &str) -> String {
    match name {
        Some(name) => format!("{verb} - {name}\t{shortcut}"),
        None => format!("{verb}\t{shortcut}"),
    }
}

/// Callback receiving the labels whenever the cursor or log changes
pub type LabelListener = Box<dyn FnMut(&HistoryLabels)>;

/// Bounded undo log with a cursor separating applied and undone units
pub struct History {
    units: Vec<UndoUnit>,
    /// Units before `position` are applied, the rest were undone
    position: usize,
    capacity: usize,
    store: SnapshotStore,
    potentials: PotentialTable,
    labels: HistoryLabels,
    revision: u64,
    listener: Option<LabelListener>,
}

impl std::fmt::Debug for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("History")
            .field("units", &self.units.len())
            .field("position", &self.position)
            .field("capacity", &self.capacity)
            .field("states", &self.store.len())
            .field("labels", &self.labels)
            .finish()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            units: Vec::new(),
            position: 0,
            capacity: capacity.max(1),
            store: SnapshotStore::new(),
            potentials: PotentialTable::default(),
            labels: HistoryLabels::default(),
            revision: 0,
            listener: None,
        }
    }

    /// Register the menu-update callback. It is invoked immediately.
    pub fn set_label_listener(&mut self, listener: impl FnMut(&HistoryLabels) + 'static) {
        self.listener = Some(Box::new(listener));
        self.notify();
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn units(&self) -> &[UndoUnit] {
        &self.units
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn can_undo(&self) -> bool {
        self.position > 0
    }

    pub fn can_redo(&self) -> bool {
        self.position < self.units.len()
    }

    pub fn labels(&self) -> &HistoryLabels {
        &self.labels
    }

    /// Increments on every label notification
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    // ── Log maintenance ───────────────────────────────────────

    /// Drop every unit, pending potential change and captured state.
    pub fn reset(&mut self) {
        self.units.clear();
        self.potentials.clear();
        self.position = 0;
        self.store.reset();
        self.notify();
    }

    /// Change the capacity when shrinking.
    ///
    /// Undone units are dropped from the tail first. Only when the log is
    /// still too long are the oldest applied units evicted, so the units
    /// before the cursor always lead up to the live state.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        if self.units.len() <= self.capacity {
            return;
        }

        let redo = (self.units.len() - self.capacity).min(self.units.len() - self.position);
        self.units.truncate(self.units.len() - redo);

        let evict = self.units.len().saturating_sub(self.capacity);
        self.units.drain(..evict);
        self.position -= evict;

        tracing::debug!(
            "history shrunk to {}, dropped {redo} undone and {evict} oldest units",
            self.capacity
        );
        self.notify();
    }

    /// Append `unit`, discarding the redo tail and evicting the oldest unit at capacity.
    pub fn push(&mut self, unit: UndoUnit) {
        self.units.truncate(self.position);

        if self.units.len() >= self.capacity {
            let evicted = self.units.remove(0);
            tracing::debug!("history full, evicted '{}'", evicted.name);
        }

        tracing::debug!("record '{}' ({})", unit.name, unit.op.kind_name());
        self.units.push(unit);
        self.position = self.units.len();
        self.notify();
    }

    // ── Traversal ─────────────────────────────────────────────

    /// Undo one logical step (a whole group when the last unit is grouped).
    ///
    /// Returns `Ok(false)` when there is nothing to undo.
    pub fn undo<P: Persistence + ?Sized>(&mut self, target: &mut P) -> Result<bool, HistoryError> {
        if self.position == 0 {
            return Ok(false);
        }
        target.unselect_all();

        loop {
            let index = self.position - 1;
            let mut ctx = EditingContext {
                store: &mut self.store,
                target: &mut *target,
            };
            let state = self.units[index].op.apply(Direction::Undo, None, &mut ctx)?;
            self.units[index].state = state;
            self.position = index;
            tracing::debug!("undo '{}'", self.units[index].name);
            self.notify();

            if index == 0 || !self.units[index - 1].shares_group(&self.units[index]) {
                break;
            }
        }
        Ok(true)
    }

    /// Redo one logical step (a whole group when the next unit is grouped).
    ///
    /// Returns `Ok(false)` when there is nothing to redo.
    pub fn redo<P: Persistence + ?Sized>(&mut self, target: &mut P) -> Result<bool, HistoryError> {
        if self.position >= self.units.len() {
            return Ok(false);
        }
        target.unselect_all();

        loop {
            let index = self.position;
            let mut ctx = EditingContext {
                store: &mut self.store,
                target: &mut *target,
            };
            let state = self.units[index].state;
            self.units[index].op.apply(Direction::Redo, state, &mut ctx)?;
            self.position = index + 1;
            tracing::debug!("redo '{}'", self.units[index].name);
            self.notify();

            if self.position >= self.units.len()
                || !self.units[index].shares_group(&self.units[self.position])
            {
                break;
            }
        }
        Ok(true)
    }

    // ── Transactions ──────────────────────────────────────────

    /// Record that `actor_id` was just added to the scene.
    pub fn add_actor<P: Persistence + ?Sized>(
        &mut self,
        name: &str,
        actor_id: ActorId,
        group: Option<GroupId>,
        target: &P,
    ) -> Result<(), HistoryError> {
        if !target.contains_actor(actor_id) {
            return Err(HistoryError::ActorNotFound(actor_id));
        }
        self.push(UndoUnit::new(
            format!("Add {name}"),
            UndoOp::AddActor {
                actor_id,
                redo_state: shared::new_id(),
            },
            group,
        ));
        Ok(())
    }

    /// Capture `actor_id`, delete it from the scene and record the deletion.
    pub fn delete_actor<P: Persistence + ?Sized>(
        &mut self,
        name: &str,
        actor_id: ActorId,
        group: Option<GroupId>,
        target: &mut P,
    ) -> Result<(), HistoryError> {
        let state = shared::new_id();
        self.store.capture(state, || {
            target
                .save_actor(actor_id)
                .ok_or(HistoryError::ActorNotFound(actor_id))
        })?;
        target.delete_actor(actor_id);
        self.push(UndoUnit::new(
            format!("Delete {name}"),
            UndoOp::DeleteActor { actor_id, state },
            group,
        ));
        Ok(())
    }

    /// Capture `actor_id` before the caller modifies it.
    pub fn change_actor<P: Persistence + ?Sized>(
        &mut self,
        name: &str,
        actor_id: ActorId,
        group: Option<GroupId>,
        target: &P,
    ) -> Result<(), HistoryError> {
        let before = shared::new_id();
        self.store.capture(before, || {
            target
                .save_actor(actor_id)
                .ok_or(HistoryError::ActorNotFound(actor_id))
        })?;
        self.push(UndoUnit::new(
            name,
            UndoOp::ChangeActor {
                actor_id,
                before,
                redo_state: shared::new_id(),
            },
            group,
        ));
        Ok(())
    }

    /// Capture scene settings before the caller modifies them.
    pub fn change_scene<P: Persistence + ?Sized>(&mut self, name: &str, target: &P) -> Result<(), HistoryError> {
        let before = shared::new_id();
        self.store
            .capture(before, || Ok::<_, HistoryError>(target.partial_save()))?;
        self.push(UndoUnit::new(
            name,
            UndoOp::ChangeScene {
                before,
                redo_state: shared::new_id(),
            },
            None,
        ));
        Ok(())
    }

    /// Handle for a change that may happen many times during one gesture.
    ///
    /// Asking again with the same actor and group returns the same handle.
    pub fn potential_change_actor(
        &mut self,
        name: &str,
        actor_id: ActorId,
        group: Option<GroupId>,
    ) -> PotentialChange {
        let key = PotentialChange { actor_id, group };
        self.potentials.register(name, key);
        key
    }

    /// Record the change behind `change` if it has not been recorded yet.
    ///
    /// Returns `Ok(true)` only for the call that recorded it.
    pub fn commit<P: Persistence + ?Sized>(
        &mut self,
        change: &PotentialChange,
        target: &P,
    ) -> Result<bool, HistoryError> {
        let Some(name) = self.potentials.take(change) else {
            return Ok(false);
        };
        if let Err(err) = self.change_actor(&name, change.actor_id, change.group, target) {
            self.potentials.release(change);
            return Err(err);
        }
        Ok(true)
    }

    pub fn is_committed(&self, change: &PotentialChange) -> bool {
        self.potentials.is_committed(change)
    }

    /// Forget the potential changes of a finished gesture.
    pub fn close_group(&mut self, group: GroupId) {
        self.potentials.drop_group(group);
    }

    /// Potential changes registered by gestures still in progress
    pub fn pending_changes(&self) -> usize {
        self.potentials.len()
    }

    fn notify(&mut self) {
        self.labels = HistoryLabels {
            undo: self
                .position
                .checked_sub(1)
                .map(|i| self.units[i].name.clone()),
            redo: self.units.get(self.position).map(|u| u.name.clone()),
        };
        self.revision += 1;
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.labels);
        }
    }
}
