//! Integration tests for the AgentCommand JSON protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> response.

use pinview_gui_lib::command::{execute_json, execute_json_batch};
use pinview_gui_lib::harness::TestHarness;

#[test]
fn test_command_place_and_drag() {
    let mut h = TestHarness::new();

    let json = r#"[
        {"command": "enable_add_mode"},
        {"command": "click", "x": 400.0, "y": 300.0},
        {"command": "pointer_down", "x": 400.0, "y": 300.0},
        {"command": "pointer_move", "x": 450.0, "y": 300.0},
        {"command": "pointer_up", "x": 450.0, "y": 300.0},
        {"command": "inspect"}
    ]"#;

    let responses = execute_json_batch(&mut h, json).unwrap();
    assert_eq!(responses.len(), 6);
    for resp in &responses {
        assert!(resp.success, "Failed: {:?}", resp.error);
    }

    let selected = &responses[2].data.as_ref().unwrap()["selected"];
    assert!(selected.as_str().unwrap().starts_with("pin-"));

    let data = responses[5].data.as_ref().unwrap();
    assert_eq!(data["marker_count"], 1);
    assert_eq!(data["state"], "idle");
    let x = data["markers"][0]["world"][0].as_f64().unwrap();
    assert!(x > 0.6 && x < 0.8, "x = {x}");
}

#[test]
fn test_command_load_issues_and_select() {
    let mut h = TestHarness::new();

    let json = r#"[
        {"command": "load_issues", "issues": [
            {"id": 1, "name": "Crack", "status": "Open"},
            {"id": "B-2", "name": "Leak", "status": "Critical"}
        ]},
        {"command": "select", "id": "issue-B-2"},
        {"command": "inspect"}
    ]"#;

    let responses = execute_json_batch(&mut h, json).unwrap();
    assert_eq!(responses[0].data.as_ref().unwrap()["markers"], 2);
    assert!(responses[1].success);

    let markers = responses[2].data.as_ref().unwrap()["markers"]
        .as_array()
        .unwrap()
        .clone();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0]["kind"], "issue");
    assert_eq!(markers[1]["selected"], true);
    assert!(markers[1]["screen"].is_array());
}

#[test]
fn test_command_remove_selected_and_clear_all() {
    let mut h = TestHarness::new();

    let json = r#"[
        {"command": "load_issues", "issues": [{"id": 1, "name": "A", "status": "Open"}]},
        {"command": "select", "id": "issue-1"},
        {"command": "remove_selected"},
        {"command": "enable_add_mode"},
        {"command": "click", "x": 400.0, "y": 300.0},
        {"command": "clear_all"},
        {"command": "clear_all"}
    ]"#;

    let responses = execute_json_batch(&mut h, json).unwrap();
    assert_eq!(responses[2].data.as_ref().unwrap()["removed"], "issue-1");
    assert_eq!(responses[5].data.as_ref().unwrap()["removed"], 1);
    assert_eq!(responses[6].data.as_ref().unwrap()["removed"], 0);
    assert_eq!(h.marker_count(), 0);
}

#[test]
fn test_command_set_camera_moves_issue_ring() {
    let mut h = TestHarness::new();
    execute_json(
        &mut h,
        r#"{"command": "load_issues", "issues": [{"id": 1, "name": "A", "status": "Open"}]}"#,
    )
    .unwrap();
    let before = h.world_of("issue-1").unwrap();

    let resp = execute_json(
        &mut h,
        r#"{"command": "set_camera", "position": [10.0, 0.0, 0.0], "target": [0.0, 0.0, 0.0]}"#,
    )
    .unwrap();
    assert!(resp.success);
    let after = h.world_of("issue-1").unwrap();
    assert_ne!(before, after);
    // ring center is 5 units in front of the camera
    assert!((after.x - 5.0).abs() < 1e-4);
}

#[test]
fn test_command_add_mode_miss() {
    let mut h = TestHarness::new();
    let responses = execute_json_batch(
        &mut h,
        r#"[{"command": "enable_add_mode"}, {"command": "click", "x": 2.0, "y": 2.0}, {"command": "inspect"}]"#,
    )
    .unwrap();
    let data = responses[2].data.as_ref().unwrap();
    assert_eq!(data["marker_count"], 0);
    assert_eq!(data["state"], "add_mode");
}

#[test]
fn test_command_invalid_json_error() {
    let mut h = TestHarness::new();
    let result = execute_json(&mut h, "not valid json");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Invalid command JSON"));
}

#[test]
fn test_command_unknown_command() {
    let mut h = TestHarness::new();
    assert!(execute_json(&mut h, r#"{"command": "fly_away"}"#).is_err());
}
