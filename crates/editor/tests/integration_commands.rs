//! Integration tests for the EditorCommand JSON protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> response.

use ultra_editor_lib::command::{execute_json, execute_json_batch};
use ultra_editor_lib::harness::TestHarness;

fn id_of(resp: &ultra_editor_lib::command::CommandResponse) -> String {
    resp.data.as_ref().unwrap()["id"].as_str().unwrap().to_string()
}

#[test]
fn test_command_add_cube() {
    let mut h = TestHarness::new();

    let json = r#"{"command": "add_cube", "name": "Box1", "size": 2.0}"#;
    let resp = execute_json(&mut h, json).unwrap();
    assert!(resp.success);

    let id = id_of(&resp);
    assert!(id.starts_with('{') && id.ends_with('}'));
    assert_eq!(h.actor_count(), 1);
}

#[test]
fn test_command_add_camera_names() {
    let mut h = TestHarness::new();
    execute_json(&mut h, r#"{"command": "add_camera"}"#).unwrap();
    execute_json(&mut h, r#"{"command": "add_camera"}"#).unwrap();

    let resp = execute_json(&mut h, r#"{"command": "inspect"}"#).unwrap();
    let data = resp.data.unwrap();
    let mut names: Vec<&str> = data["actors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Camera 1", "Camera 2"]);
    assert_eq!(data["actors"][0]["type"], "camera");
}

#[test]
fn test_command_select_and_delete() {
    let mut h = TestHarness::new();
    let a = id_of(&execute_json(&mut h, r#"{"command": "add_cube", "name": "A"}"#).unwrap());
    execute_json(&mut h, r#"{"command": "add_cube", "name": "B"}"#).unwrap();

    let select = format!(r#"{{"command": "select", "ids": ["{a}"]}}"#);
    let resp = execute_json(&mut h, &select).unwrap();
    assert_eq!(resp.data.unwrap()["selected"][0], a.as_str());

    let resp = execute_json(&mut h, r#"{"command": "delete"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["deleted"], 1);
    assert_eq!(h.actor_count(), 1);
}

#[test]
fn test_command_select_invalid_id() {
    let mut h = TestHarness::new();
    let resp = execute_json(&mut h, r#"{"command": "select", "ids": ["not-an-id"]}"#).unwrap();
    assert!(!resp.success);
    assert!(resp.error.is_some());
}

#[test]
fn test_command_delete_nothing_selected() {
    let mut h = TestHarness::new();
    let resp = execute_json(&mut h, r#"{"command": "delete"}"#).unwrap();
    assert!(!resp.success);
    assert!(resp.error.unwrap().contains("selected"));
}

#[test]
fn test_command_move_and_undo() {
    let mut h = TestHarness::new();
    let batch = r#"[
        {"command": "add_cube", "name": "Mover"},
        {"command": "move_selected", "delta": [1.0, 0.0, 0.0]},
        {"command": "undo"}
    ]"#;
    let responses = execute_json_batch(&mut h, batch).unwrap();
    assert!(responses.iter().all(|r| r.success));
    assert_eq!(responses[1].data.as_ref().unwrap()["moved"], 1);
    assert_eq!(responses[2].data.as_ref().unwrap()["undone"], true);

    let resp = execute_json(&mut h, r#"{"command": "inspect"}"#).unwrap();
    assert_eq!(
        resp.data.unwrap()["actors"][0]["position"],
        serde_json::json!([0.0, 0.0, 0.0])
    );
}

#[test]
fn test_command_history_listing() {
    let mut h = TestHarness::new();
    let batch = r#"[
        {"command": "add_camera"},
        {"command": "set_background_color", "rgb": [1, 2, 3]},
        {"command": "add_collider", "kind": "sphere"}
    ]"#;
    execute_json_batch(&mut h, batch).unwrap();

    let resp = execute_json(&mut h, r#"{"command": "history"}"#).unwrap();
    let data = resp.data.unwrap();
    assert_eq!(data["position"], 3);
    assert_eq!(data["undo"], "Undo - Add Collider\tCtrl+Z");
    assert_eq!(data["redo"], "Redo\tCtrl+Y");

    let kinds: Vec<&str> = data["units"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds.len(), 3);
    assert_eq!(data["units"][1]["name"], "Background Color");
}

#[test]
fn test_command_script_and_export() {
    let mut h = TestHarness::new();
    let batch = r#"[
        {"command": "add_camera"},
        {"command": "set_script", "script": "void $start() {}"},
        {"command": "set_snap_size", "size": 0.25},
        {"command": "export_scene"}
    ]"#;
    let responses = execute_json_batch(&mut h, batch).unwrap();
    let scene = &responses[3].data.as_ref().unwrap()["scene"];
    assert_eq!(scene["gizmo_snap_size"], "0.250000");
    assert_eq!(scene["actors"][0]["script"], "void $start() {}");
}

#[test]
fn test_command_duplicate() {
    let mut h = TestHarness::new();
    execute_json(&mut h, r#"{"command": "add_cube"}"#).unwrap();
    let resp = execute_json(&mut h, r#"{"command": "duplicate"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["ids"].as_array().unwrap().len(), 1);
    assert_eq!(h.actor_count(), 2);

    // One undo removes the whole duplicate group
    execute_json(&mut h, r#"{"command": "undo"}"#).unwrap();
    assert_eq!(h.actor_count(), 1);
}

#[test]
fn test_command_save_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cmd.ultra");
    let path = path.to_str().unwrap();

    let mut h = TestHarness::new();
    execute_json(&mut h, r#"{"command": "add_cube"}"#).unwrap();
    let save = format!(r#"{{"command": "save", "path": "{path}"}}"#);
    let resp = execute_json(&mut h, &save).unwrap();
    assert_eq!(resp.data.unwrap()["title"], "cmd");

    let mut h2 = TestHarness::new();
    let load = format!(r#"{{"command": "load", "path": "{path}"}}"#);
    let resp = execute_json(&mut h2, &load).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["actor_count"], 1);
    assert_eq!(h2.history_len(), 0);
}

#[test]
fn test_command_new_scene() {
    let mut h = TestHarness::new();
    execute_json(&mut h, r#"{"command": "add_camera"}"#).unwrap();
    let resp = execute_json(&mut h, r#"{"command": "new_scene"}"#).unwrap();
    assert!(resp.success);
    assert!(resp.data.is_none());
    assert_eq!(h.actor_count(), 0);
    assert_eq!(h.history_len(), 0);
}

#[test]
fn test_command_missing_model() {
    let mut h = TestHarness::new();
    let resp =
        execute_json(&mut h, r#"{"command": "add_model", "path": "/missing/ship.obj"}"#).unwrap();
    assert!(!resp.success);
    assert_eq!(h.actor_count(), 0);
    assert_eq!(h.history_len(), 0);
}

#[test]
fn test_command_invalid_json() {
    let mut h = TestHarness::new();
    assert!(execute_json(&mut h, r#"{"command": "fly_away"}"#).is_err());
    assert!(execute_json_batch(&mut h, "{}").is_err());
}
