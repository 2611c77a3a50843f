pub mod actor;
mod actor_ops;
pub mod gesture;
pub mod scene;
mod scene_ops;
pub mod selection;
pub mod settings;

use std::path::PathBuf;

use shared::SnapshotError;
use thiserror::Error;

pub use actor::{Actor, Collider, Transform, DEFAULT_SCRIPT};
pub use gesture::{DragGesture, GizmoModifier};
pub use scene::{actor_display_name, short_id, ActorRef, Scene, SceneSettings, View};
pub use selection::Selection;
pub use settings::EditorSettings;

use crate::history::{History, HistoryError};
use crate::mesh::MeshError;

/// Failure of an editor operation
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error("an actor must be selected first")]
    NothingSelected,
    #[error("resource not found: {}", .0.display())]
    ResourceNotFound(PathBuf),
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Combined editor state: the open scene, its history and the settings
#[derive(Debug)]
pub struct EditorState {
    pub scene: Scene,
    pub history: History,
    pub settings: EditorSettings,
    /// Drag in progress, if any
    gesture: Option<DragGesture>,
    /// File the scene was last loaded from or saved to
    file_path: Option<PathBuf>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::with_settings(EditorSettings::default())
    }
}

impl EditorState {
    /// Editor state with settings from the user config directory
    pub fn load() -> Self {
        Self::with_settings(EditorSettings::load())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        Self {
            scene: Scene::new(settings.new_scene),
            history: History::with_capacity(settings.history_capacity),
            settings,
            gesture: None,
            file_path: None,
        }
    }

    pub fn file_path(&self) -> Option<&std::path::Path> {
        self.file_path.as_deref()
    }

    pub fn gesture(&self) -> Option<&DragGesture> {
        self.gesture.as_ref()
    }
}
