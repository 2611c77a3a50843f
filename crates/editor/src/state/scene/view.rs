//! Editor views (camera placements saved with the scene)

use glam::{Quat, Vec3};
use serde_json::json;
use shared::{text, Snapshot, SnapshotError, ViewType};

/// One editor viewpoint with an orthonormal basis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub kind: ViewType,
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Default for View {
    fn default() -> Self {
        Self {
            kind: ViewType::Perspective,
            position: Vec3::ZERO,
            forward: Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
        }
    }
}

/// Orthographic views stop walking forward once this close to the origin
const MIN_ZOOM: f32 = 0.005;

impl View {
    /// Default placement for each view kind
    pub fn initial(kind: ViewType) -> Self {
        let mut view = View {
            kind,
            ..View::default()
        };
        match kind {
            ViewType::Perspective => {
                view.fly(2.0);
                view.walk(-5.0);
            }
            ViewType::Top => {
                view.fly(12.0);
                view.pitch(std::f32::consts::FRAC_PI_2);
            }
            ViewType::Left => {
                view.yaw(std::f32::consts::FRAC_PI_2);
                view.walk(-12.0);
            }
            ViewType::Front => {
                view.yaw(std::f32::consts::PI);
                view.walk(-12.0);
            }
        }
        view
    }

    /// The four views in file order
    pub fn initial_set() -> [View; 4] {
        ViewType::ALL.map(View::initial)
    }

    /// Rotate forward and up around the view's right axis
    pub fn pitch(&mut self, angle: f32) {
        let rotation = Quat::from_axis_angle(self.right.normalize_or_zero(), angle);
        self.up = rotation * self.up;
        self.forward = rotation * self.forward;
    }

    /// Rotate right and forward around the world Y axis
    pub fn yaw(&mut self, angle: f32) {
        let rotation = Quat::from_rotation_y(angle);
        self.right = rotation * self.right;
        self.forward = rotation * self.forward;
    }

    pub fn walk(&mut self, units: f32) {
        if self.can_walk() || units < 0.0 {
            self.position += self.forward * units;
        }
    }

    pub fn strafe(&mut self, units: f32) {
        self.position += self.right * units;
    }

    pub fn fly(&mut self, units: f32) {
        self.position += self.up * units;
    }

    /// Distance of an orthographic view from the origin plane
    pub fn zoom(&self) -> f32 {
        match self.kind {
            ViewType::Top => self.position.y,
            ViewType::Left => -self.position.x,
            ViewType::Front => self.position.z,
            ViewType::Perspective => 0.0,
        }
    }

    fn can_walk(&self) -> bool {
        self.kind == ViewType::Perspective || self.zoom() > MIN_ZOOM
    }

    pub fn save(&self) -> Snapshot {
        json!({
            "position": text::format_vec3(self.position),
            "forward": text::format_vec3(self.forward),
            "right": text::format_vec3(self.right),
            "up": text::format_vec3(self.up),
        })
    }

    /// Read a saved view. The kind is implied by its slot in the scene file.
    pub fn load(kind: ViewType, snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        Ok(View {
            kind,
            position: text::vec3_field(snapshot, "position")?,
            forward: text::vec3_field(snapshot, "forward")?,
            right: text::vec3_field(snapshot, "right")?,
            up: text::vec3_field(snapshot, "up")?,
        })
    }
}
