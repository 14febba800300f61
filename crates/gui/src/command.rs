//! JSON command protocol for scripted agents and tests.

use serde::{Deserialize, Serialize};
use shared::Issue;

use crate::harness::TestHarness;
use crate::state::interaction::InteractionState;
use crate::viewer::Camera;

/// A command executed against the harness
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Arm the next click for placing a pushpin
    EnableAddMode,
    Click {
        x: f32,
        y: f32,
    },
    PointerDown {
        x: f32,
        y: f32,
    },
    PointerMove {
        x: f32,
        y: f32,
    },
    PointerUp {
        x: f32,
        y: f32,
    },
    Select {
        id: String,
    },
    RemoveSelected,
    ClearAll,
    LoadIssues {
        issues: Vec<Issue>,
    },
    /// Move the camera to look at `target`
    SetCamera {
        position: [f32; 3],
        target: [f32; 3],
    },
    /// List markers and interaction state
    Inspect,
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

fn state_name(state: &InteractionState) -> &'static str {
    match state {
        InteractionState::Idle => "idle",
        InteractionState::AddMode => "add_mode",
        InteractionState::Dragging(_) => "dragging",
        InteractionState::SectionPick => "section_pick",
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::EnableAddMode => {
            let armed = harness.overlay.enable_add_mode();
            CommandResponse::ok_with_data(serde_json::json!({ "armed": armed }))
        }

        AgentCommand::Click { x, y } => {
            harness.click(x, y);
            CommandResponse::ok()
        }

        AgentCommand::PointerDown { x, y } => {
            harness.pointer_down(x, y);
            CommandResponse::ok_with_data(serde_json::json!({
                "selected": harness.overlay.selected(),
            }))
        }

        AgentCommand::PointerMove { x, y } => {
            harness.pointer_move(x, y);
            CommandResponse::ok()
        }

        AgentCommand::PointerUp { x, y } => {
            harness.pointer_up(x, y);
            CommandResponse::ok()
        }

        AgentCommand::Select { id } => {
            if harness.select(&id) {
                CommandResponse::ok_with_data(serde_json::json!({ "selected": id }))
            } else {
                CommandResponse::err(format!("Unknown marker: {id}"))
            }
        }

        AgentCommand::RemoveSelected => match harness.overlay.remove_selected() {
            Some(id) => CommandResponse::ok_with_data(serde_json::json!({ "removed": id })),
            None => CommandResponse::err("No marker selected"),
        },

        AgentCommand::ClearAll => {
            let removed = harness.clear_all();
            CommandResponse::ok_with_data(serde_json::json!({ "removed": removed }))
        }

        AgentCommand::LoadIssues { issues } => match harness.load_issues(issues) {
            Ok(created) => CommandResponse::ok_with_data(serde_json::json!({ "markers": created })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::SetCamera { position, target } => {
            let camera = Camera::looking_at(position.into(), target.into(), glam::Vec3::Y);
            harness.set_camera(camera);
            CommandResponse::ok()
        }

        AgentCommand::Inspect => {
            let markers: Vec<serde_json::Value> = harness
                .overlay
                .registry()
                .all()
                .map(|m| {
                    let world = m.world_position();
                    serde_json::json!({
                        "id": m.id,
                        "kind": if m.is_pushpin() { "pushpin" } else { "issue" },
                        "selected": m.selected,
                        "world": [world.x, world.y, world.z],
                        "screen": m.screen_position().map(|p| [p.x, p.y]),
                    })
                })
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "state": state_name(&harness.state()),
                "marker_count": markers.len(),
                "markers": markers,
            }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serde_click() {
        let json = r#"{"command": "click", "x": 10.0, "y": 20.0}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(cmd, AgentCommand::Click { x, y } if x == 10.0 && y == 20.0));
    }

    #[test]
    fn test_command_serde_load_issues() {
        let json = r#"{"command": "load_issues", "issues": [{"id": 3, "name": "Leak", "status": "Open"}]}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        match cmd {
            AgentCommand::LoadIssues { issues } => assert_eq!(issues[0].name, "Leak"),
            _ => panic!("Expected LoadIssues"),
        }
    }

    #[test]
    fn test_execute_add_mode_and_click() {
        let mut h = TestHarness::new();
        let batch = r#"[
            {"command": "enable_add_mode"},
            {"command": "click", "x": 400.0, "y": 300.0},
            {"command": "inspect"}
        ]"#;
        let responses = execute_json_batch(&mut h, batch).unwrap();
        assert!(responses.iter().all(|r| r.success));
        let data = responses[2].data.as_ref().unwrap();
        assert_eq!(data["marker_count"], 1);
        assert_eq!(data["state"], "idle");
        assert_eq!(data["markers"][0]["kind"], "pushpin");
    }

    #[test]
    fn test_execute_select_unknown() {
        let mut h = TestHarness::new();
        let resp = execute_json(&mut h, r#"{"command": "select", "id": "nope"}"#).unwrap();
        assert!(!resp.success);
    }

    #[test]
    fn test_execute_remove_selected_without_selection() {
        let mut h = TestHarness::new();
        let resp = execute_json(&mut h, r#"{"command": "remove_selected"}"#).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("No marker selected"));
    }

    #[test]
    fn test_execute_invalid_json() {
        let mut h = TestHarness::new();
        assert!(execute_json(&mut h, "not valid json").is_err());
    }
}
