//! Details window for the last clicked marker

use pinview_gui_lib::state::ClickedMarker;

pub fn show(ctx: &egui::Context, clicked: &mut Option<ClickedMarker>) {
    let Some(marker) = clicked.as_ref() else {
        return;
    };
    let mut open = true;

    egui::Window::new("Marker")
        .open(&mut open)
        .resizable(false)
        .collapsible(false)
        .default_width(260.0)
        .show(ctx, |ui| match marker {
            ClickedMarker::Issue(issue) => {
                ui.strong(&issue.name);
                egui::Grid::new("issue_fields").num_columns(2).show(ui, |ui| {
                    for (label, value) in [
                        ("Status", issue.status.as_str()),
                        ("Severity", issue.severity.as_str()),
                        ("Location", issue.location.as_str()),
                        ("Assignee", issue.assignee.as_str()),
                        ("Due", issue.due_day().unwrap_or("-")),
                    ] {
                        ui.weak(label);
                        ui.label(value);
                        ui.end_row();
                    }
                });
                if !issue.description.is_empty() {
                    ui.separator();
                    ui.label(&issue.description);
                }
            }
            ClickedMarker::Pushpin { id, position } => {
                ui.strong(id);
                ui.label(format!(
                    "x {:.2}  y {:.2}  z {:.2}",
                    position.x, position.y, position.z
                ));
            }
        });

    if !open {
        *clicked = None;
    }
}
