//! Undo units and the operations they replay

use shared::{ActorId, GroupId, StateId};

use super::store::SnapshotStore;
use super::{HistoryError, Persistence};

/// Traversal direction through the history log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Undo,
    Redo,
}

/// Everything an operation touches while it is replayed
pub struct EditingContext<'a, P: Persistence + ?Sized> {
    pub store: &'a mut SnapshotStore,
    pub target: &'a mut P,
}

/// A reversible edit and the state handles it needs.
///
/// `redo_state` ids are minted when the unit is recorded but only captured the
/// first time the unit is undone; the store keeps that capture for every
/// later traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOp {
    /// Actor was created. Undo deletes it, redo restores it.
    AddActor { actor_id: ActorId, redo_state: StateId },
    /// Actor was deleted after `state` was captured.
    DeleteActor { actor_id: ActorId, state: StateId },
    /// Actor was modified after `before` was captured.
    ChangeActor {
        actor_id: ActorId,
        before: StateId,
        redo_state: StateId,
    },
    /// Scene settings were modified after `before` was captured.
    ChangeScene { before: StateId, redo_state: StateId },
}

impl UndoOp {
    /// Actor this operation is about, if any
    pub fn actor_id(&self) -> Option<ActorId> {
        match self {
            UndoOp::AddActor { actor_id, .. }
            | UndoOp::DeleteActor { actor_id, .. }
            | UndoOp::ChangeActor { actor_id, .. } => Some(*actor_id),
            UndoOp::ChangeScene { .. } => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            UndoOp::AddActor { .. } => "add_actor",
            UndoOp::DeleteActor { .. } => "delete_actor",
            UndoOp::ChangeActor { .. } => "change_actor",
            UndoOp::ChangeScene { .. } => "change_scene",
        }
    }

    /// Replay the operation in `direction`.
    ///
    /// Undo returns the state the matching redo must consume. Redo consumes
    /// `state` and returns `None`.
    pub fn apply<P: Persistence + ?Sized>(
        &self,
        direction: Direction,
        state: Option<StateId>,
        ctx: &mut EditingContext<'_, P>,
    ) -> Result<Option<StateId>, HistoryError> {
        match direction {
            Direction::Undo => self.undo(ctx).map(Some),
            Direction::Redo => self.redo(state, ctx).map(|()| None),
        }
    }

    fn undo<P: Persistence + ?Sized>(
        &self,
        ctx: &mut EditingContext<'_, P>,
    ) -> Result<StateId, HistoryError> {
        let store = &mut *ctx.store;
        let target = &mut *ctx.target;

        match *self {
            UndoOp::AddActor {
                actor_id,
                redo_state,
            } => {
                store.capture(redo_state, || {
                    target
                        .save_actor(actor_id)
                        .ok_or(HistoryError::ActorNotFound(actor_id))
                })?;
                target.delete_actor(actor_id);
                Ok(redo_state)
            }
            UndoOp::DeleteActor { actor_id, state } => {
                let snapshot = store.get(&state).ok_or(HistoryError::MissingState(state))?;
                target.restore_actor(snapshot)?;
                target.select_actor(actor_id, true);
                Ok(state)
            }
            UndoOp::ChangeActor {
                actor_id,
                before,
                redo_state,
            } => {
                store.capture(redo_state, || {
                    target
                        .save_actor(actor_id)
                        .ok_or(HistoryError::ActorNotFound(actor_id))
                })?;
                let snapshot = store.get(&before).ok_or(HistoryError::MissingState(before))?;
                target.restore_actor(snapshot)?;
                target.select_actor(actor_id, false);
                Ok(redo_state)
            }
            UndoOp::ChangeScene { before, redo_state } => {
                store.capture(redo_state, || {
                    Ok::<_, HistoryError>(target.partial_save())
                })?;
                let snapshot = store.get(&before).ok_or(HistoryError::MissingState(before))?;
                target.partial_load(snapshot)?;
                Ok(redo_state)
            }
        }
    }

    fn redo<P: Persistence + ?Sized>(
        &self,
        state: Option<StateId>,
        ctx: &mut EditingContext<'_, P>,
    ) -> Result<(), HistoryError> {
        let store = &*ctx.store;
        let target = &mut *ctx.target;
        let stored = move |state: Option<StateId>| {
            let id = state.ok_or(HistoryError::NoRedoState)?;
            store.get(&id).ok_or(HistoryError::MissingState(id))
        };

        match *self {
            UndoOp::AddActor { actor_id, .. } => {
                target.restore_actor(stored(state)?)?;
                target.select_actor(actor_id, true);
            }
            UndoOp::DeleteActor { actor_id, .. } => {
                if !target.delete_actor(actor_id) {
                    return Err(HistoryError::ActorNotFound(actor_id));
                }
            }
            UndoOp::ChangeActor { actor_id, .. } => {
                target.restore_actor(stored(state)?)?;
                target.select_actor(actor_id, false);
            }
            UndoOp::ChangeScene { .. } => {
                target.partial_load(stored(state)?)?;
            }
        }
        Ok(())
    }
}

/// One named, reversible entry of the history log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoUnit {
    pub name: String,
    pub op: UndoOp,
    pub group: Option<GroupId>,
    /// State for the next traversal in the opposite direction
    pub state: Option<StateId>,
}

impl UndoUnit {
    pub fn new(name: impl Into<String>, op: UndoOp, group: Option<GroupId>) -> Self {
        Self {
            name: name.into(),
            op,
            group,
            state: None,
        }
    }

    /// Units chain only through an explicit, shared group id.
    pub fn shares_group(&self, other: &UndoUnit) -> bool {
        matches!((self.group, other.group), (Some(a), Some(b)) if a == b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(group: Option<GroupId>) -> UndoUnit {
        UndoUnit::new(
            "Move",
            UndoOp::ChangeActor {
                actor_id: shared::new_id(),
                before: shared::new_id(),
                redo_state: shared::new_id(),
            },
            group,
        )
    }

    #[test]
    fn test_ungrouped_units_never_share() {
        assert!(!change(None).shares_group(&change(None)));
    }

    #[test]
    fn test_grouped_units_share() {
        let group = shared::new_id();
        assert!(change(Some(group)).shares_group(&change(Some(group))));
        assert!(!change(Some(group)).shares_group(&change(Some(shared::new_id()))));
        assert!(!change(Some(group)).shares_group(&change(None)));
    }

    #[test]
    fn test_op_actor_id() {
        let id = shared::new_id();
        let op = UndoOp::AddActor {
            actor_id: id,
            redo_state: shared::new_id(),
        };
        assert_eq!(op.actor_id(), Some(id));
        assert_eq!(op.kind_name(), "add_actor");
        let scene = UndoOp::ChangeScene {
            before: shared::new_id(),
            redo_state: shared::new_id(),
        };
        assert_eq!(scene.actor_id(), None);
    }
}
