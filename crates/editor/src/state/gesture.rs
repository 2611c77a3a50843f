//! Gizmo drag gestures
//!
//! A drag may touch the same actors on every tick. Each actor is recorded in
//! the history once per gesture through a potential change keyed by the
//! gesture's group id, so the whole drag undoes as one step.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use shared::{ActorId, GroupId};

use super::actor::Transform;
use super::{EditorError, EditorState};

/// What a drag does to the selected actors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GizmoModifier {
    #[default]
    Move,
    Rotate,
    Scale,
}

impl GizmoModifier {
    /// Undo label of changes made with this modifier
    pub fn name(self) -> &'static str {
        match self {
            GizmoModifier::Move => "Move",
            GizmoModifier::Rotate => "Rotate",
            GizmoModifier::Scale => "Scale",
        }
    }
}

/// One drag from button press to release
#[derive(Debug, Clone)]
pub struct DragGesture {
    pub modifier: GizmoModifier,
    group: GroupId,
    /// Sum of all deltas since the drag began
    accumulated: Vec3,
    /// Transform of each touched actor when the drag began
    origins: HashMap<ActorId, Transform>,
}

impl DragGesture {
    pub fn new(modifier: GizmoModifier) -> Self {
        Self {
            modifier,
            group: shared::new_id(),
            accumulated: Vec3::ZERO,
            origins: HashMap::new(),
        }
    }

    pub fn group(&self) -> GroupId {
        self.group
    }

    /// Transform `origin` by the accumulated delta. `snap` rounds translation.
    fn target(&self, origin: Transform, snap: Option<f32>) -> Transform {
        let mut next = origin;
        match self.modifier {
            GizmoModifier::Move => {
                let offset = match snap {
                    Some(step) if step > 0.0 => (self.accumulated / step).round() * step,
                    _ => self.accumulated,
                };
                next.position += offset;
            }
            GizmoModifier::Rotate => next.rotate_euler(self.accumulated),
            GizmoModifier::Scale => next.scale += self.accumulated,
        }
        next
    }
}

impl EditorState {
    /// Start a drag of the selected actors
    pub fn begin_drag(&mut self, modifier: GizmoModifier) {
        self.gesture = Some(DragGesture::new(modifier));
    }

    /// Apply one tick of a drag. Returns how many actors changed.
    pub fn drag(&mut self, delta: Vec3) -> Result<usize, EditorError> {
        let Some(gesture) = self.gesture.as_mut() else {
            tracing::warn!("drag without an active gesture ignored");
            return Ok(0);
        };
        gesture.accumulated += delta;

        let snap = self
            .settings
            .snap_to_grid
            .then_some(self.scene.settings.gizmo_snap_size);
        let mut changed = 0;

        for id in self.scene.selected_ids() {
            let Some(actor) = self.scene.actor(id) else {
                continue;
            };
            let current = actor.borrow().transform;
            let origin = *gesture.origins.entry(id).or_insert(current);
            let next = gesture.target(origin, snap);

            let change =
                self.history
                    .potential_change_actor(gesture.modifier.name(), id, Some(gesture.group));
            if next == current {
                continue;
            }
            self.history.commit(&change, &self.scene)?;
            actor.borrow_mut().transform = next;
            changed += 1;
        }

        if changed > 0 {
            self.scene.mark_changed();
        }
        Ok(changed)
    }

    /// Finish the drag. The next drag starts a new undo step.
    pub fn end_drag(&mut self) {
        if let Some(gesture) = self.gesture.take() {
            self.history.close_group(gesture.group());
        }
    }
}
