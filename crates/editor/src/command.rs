//! JSON command protocol for headless scripting.
//!
//! Every command maps onto one editor operation, so a batch of commands
//! produces the same undo history an interactive session would.

use std::path::PathBuf;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::{text, ColliderType};

use crate::harness::TestHarness;
use crate::state::{actor_display_name, EditorError};

fn default_cube_size() -> f32 {
    1.0
}

/// A command the editor can execute headlessly.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Start an empty scene, dropping history.
    NewScene,
    /// Save the scene to a file.
    Save { path: PathBuf },
    /// Load a scene file, dropping history.
    Load { path: PathBuf },
    /// Add a camera actor.
    AddCamera,
    /// Add a model imported from an OBJ file.
    AddModel { path: PathBuf },
    /// Add a generated cube model.
    AddCube {
        #[serde(default)]
        name: Option<String>,
        #[serde(default = "default_cube_size")]
        size: f32,
    },
    /// Delete the selected actors.
    Delete,
    /// Duplicate the selected actors.
    Duplicate,
    /// Select actors by ID (replaces selection).
    Select { ids: Vec<String> },
    SelectAll,
    ClearSelection,
    /// Attach a collider to the selected actors.
    AddCollider { kind: ColliderType },
    DeleteCollider,
    /// Attach a texture to the selected models.
    AddTexture { path: PathBuf },
    DeleteTexture,
    /// Replace the script of the first selected actor.
    SetScript { script: String },
    SetBackgroundColor { rgb: [u8; 3] },
    SetSnapSize { size: f32 },
    /// Move the selected actors as one gizmo drag.
    MoveSelected { delta: [f32; 3] },
    /// Undo the last operation.
    Undo,
    /// Redo the last undone operation.
    Redo,
    /// Inspect the scene: list all actors.
    Inspect,
    /// List the undo history.
    History,
    /// Export the scene document as JSON.
    ExportScene,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

impl From<Result<serde_json::Value, EditorError>> for CommandResponse {
    fn from(result: Result<serde_json::Value, EditorError>) -> Self {
        match result {
            Ok(serde_json::Value::Null) => CommandResponse::ok(),
            Ok(data) => CommandResponse::ok_with_data(data),
            Err(err) => CommandResponse::err(err.to_string()),
        }
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: EditorCommand) -> CommandResponse {
    tracing::debug!("execute {cmd:?}");
    let state = &mut harness.state;

    let result = match cmd {
        EditorCommand::NewScene => {
            state.new_scene();
            Ok(serde_json::Value::Null)
        }

        EditorCommand::Save { path } => state.save_to(&path).map(|()| json!({ "title": state.title() })),

        EditorCommand::Load { path } => state
            .load_from(&path)
            .map(|()| json!({ "actor_count": state.scene.actor_count() })),

        EditorCommand::AddCamera => state.add_camera().map(|id| json!({ "id": text::format_id(id) })),

        EditorCommand::AddModel { path } => state
            .add_model(&path)
            .map(|id| json!({ "id": text::format_id(id) })),

        EditorCommand::AddCube { name, size } => state
            .add_cube(name.as_deref(), size)
            .map(|id| json!({ "id": text::format_id(id) })),

        EditorCommand::Delete => state
            .delete_selected()
            .map(|count| json!({ "deleted": count })),

        EditorCommand::Duplicate => state.duplicate().map(|ids| {
            let ids: Vec<String> = ids.into_iter().map(text::format_id).collect();
            json!({ "ids": ids })
        }),

        EditorCommand::Select { ids } => {
            let mut parsed = Vec::with_capacity(ids.len());
            for id in &ids {
                match text::parse_id("id", id) {
                    Ok(id) => parsed.push(id),
                    Err(err) => return CommandResponse::err(err.to_string()),
                }
            }
            harness.select_only(&parsed);
            let selected: Vec<String> = harness.selected().into_iter().map(text::format_id).collect();
            Ok(json!({ "selected": selected }))
        }

        EditorCommand::SelectAll => {
            state.select_all();
            Ok(json!({ "selected": state.scene.selection().count() }))
        }

        EditorCommand::ClearSelection => {
            state.unselect_all();
            Ok(serde_json::Value::Null)
        }

        EditorCommand::AddCollider { kind } => state
            .add_collider(kind)
            .map(|count| json!({ "changed": count })),

        EditorCommand::DeleteCollider => state
            .delete_collider()
            .map(|count| json!({ "changed": count })),

        EditorCommand::AddTexture { path } => state
            .add_texture(&path)
            .map(|count| json!({ "changed": count })),

        EditorCommand::DeleteTexture => state
            .delete_texture()
            .map(|count| json!({ "changed": count })),

        EditorCommand::SetScript { script } => state
            .set_script(&script)
            .map(|id| json!({ "id": text::format_id(id) })),

        EditorCommand::SetBackgroundColor { rgb } => {
            state.set_background_color(rgb).map(|()| serde_json::Value::Null)
        }

        EditorCommand::SetSnapSize { size } => {
            state.set_gizmo_snap_size(size).map(|()| serde_json::Value::Null)
        }

        EditorCommand::MoveSelected { delta } => harness
            .move_selected(Vec3::from_array(delta))
            .map(|count| json!({ "moved": count })),

        EditorCommand::Undo => state.undo().map(|undone| json!({ "undone": undone })),

        EditorCommand::Redo => state.redo().map(|redone| json!({ "redone": redone })),

        EditorCommand::Inspect => {
            let actors: Vec<serde_json::Value> = state
                .scene
                .actors()
                .map(|actor| {
                    let actor = actor.borrow();
                    json!({
                        "id": text::format_id(actor.id()),
                        "name": actor.name,
                        "display_name": actor_display_name(&actor),
                        "type": actor.kind,
                        "position": actor.transform.position.to_array(),
                        "collider": actor.collider.map(|c| c.kind()),
                        "texture": actor.texture_path(),
                        "triangles": actor.triangle_count(),
                        "selected": state.scene.selection().is_selected(actor.id()),
                    })
                })
                .collect();
            Ok(json!({
                "title": state.title(),
                "stats": state.stats(),
                "actor_count": actors.len(),
                "actors": actors,
            }))
        }

        EditorCommand::History => {
            let history = &state.history;
            let units: Vec<serde_json::Value> = history
                .units()
                .iter()
                .map(|unit| {
                    json!({
                        "name": unit.name,
                        "kind": unit.op.kind_name(),
                        "grouped": unit.group.is_some(),
                    })
                })
                .collect();
            Ok(json!({
                "position": history.position(),
                "pending": history.pending_changes(),
                "undo": history.labels().undo_text(),
                "redo": history.labels().redo_text(),
                "units": units,
            }))
        }

        EditorCommand::ExportScene => Ok(json!({ "scene": state.scene.save() })),
    };

    result.into()
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: EditorCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<EditorCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
