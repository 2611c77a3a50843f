//! At-most-once change records for continuous gestures

use std::collections::HashMap;

use shared::{ActorId, GroupId};

/// Handle to a pending change of one actor within one gesture.
///
/// Obtained from [`super::History::potential_change_actor`]; committing it
/// records a change transaction the first time only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PotentialChange {
    pub actor_id: ActorId,
    pub group: Option<GroupId>,
}

#[derive(Debug)]
struct PotentialEntry {
    name: String,
    committed: bool,
}

/// Table of potential changes, keyed by actor and group
#[derive(Debug, Default)]
pub(crate) struct PotentialTable {
    entries: HashMap<PotentialChange, PotentialEntry>,
}

impl PotentialTable {
    /// Register `key` unless already known. The first registration names it.
    pub(crate) fn register(&mut self, name: &str, key: PotentialChange) {
        self.entries.entry(key).or_insert_with(|| PotentialEntry {
            name: name.to_string(),
            committed: false,
        });
    }

    /// Mark `key` committed. Returns the recorded name on the first call only.
    pub(crate) fn take(&mut self, key: &PotentialChange) -> Option<String> {
        let entry = self.entries.get_mut(key)?;
        if entry.committed {
            return None;
        }
        entry.committed = true;
        Some(entry.name.clone())
    }

    /// Undo a `take` whose transaction failed to record.
    pub(crate) fn release(&mut self, key: &PotentialChange) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.committed = false;
        }
    }

    pub(crate) fn is_committed(&self, key: &PotentialChange) -> bool {
        self.entries.get(key).is_some_and(|e| e.committed)
    }

    /// Forget every entry recorded under `group`
    pub(crate) fn drop_group(&mut self, group: GroupId) {
        self.entries.retain(|key, _| key.group != Some(group));
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
