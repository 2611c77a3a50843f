use shared::ActorId;

/// Actor selection (supports multi-select, keeps selection order)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Vec<ActorId>,
}

impl Selection {
    /// First selected actor
    pub fn primary(&self) -> Option<ActorId> {
        self.selected.first().copied()
    }

    /// Most recently selected actor (the one the gizmo follows)
    pub fn last(&self) -> Option<ActorId> {
        self.selected.last().copied()
    }

    /// All selected actors in selection order
    pub fn all(&self) -> &[ActorId] {
        &self.selected
    }

    pub fn is_selected(&self, id: ActorId) -> bool {
        self.selected.contains(&id)
    }

    /// Toggle selection: an already selected actor is unselected.
    pub fn toggle(&mut self, id: ActorId) {
        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
    }

    /// Remove `id` if selected
    pub fn remove(&mut self, id: ActorId) {
        self.selected.retain(|s| *s != id);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
