//! Write-once snapshot cache keyed by state id

use std::collections::HashMap;

use shared::{Snapshot, StateId};

/// Captured snapshots referenced by undo units.
///
/// An id is captured at most once: later requests for the same id return the
/// first snapshot, even if the live state has changed since. Entries are only
/// released all together by [`SnapshotStore::reset`].
#[derive(Debug, Default)]
pub struct SnapshotStore {
    states: HashMap<StateId, Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the snapshot cached under `id`, producing it on first request.
    pub fn capture<E>(
        &mut self,
        id: StateId,
        produce: impl FnOnce() -> Result<Snapshot, E>,
    ) -> Result<&Snapshot, E> {
        if !self.states.contains_key(&id) {
            let snapshot = produce()?;
            tracing::trace!("captured state {id}");
            self.states.insert(id, snapshot);
        }
        // Present: either cached already or inserted just above.
        Ok(&self.states[&id])
    }

    pub fn get(&self, id: &StateId) -> Option<&Snapshot> {
        self.states.get(id)
    }

    pub fn contains(&self, id: &StateId) -> bool {
        self.states.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Release every captured snapshot.
    pub fn reset(&mut self) {
        self.states.clear();
    }
}
