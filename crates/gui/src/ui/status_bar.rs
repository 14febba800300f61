use egui::Ui;

use pinview_gui_lib::state::InteractionState;
use pinview_gui_lib::AnnotationOverlay;

use crate::app::EguiHost;

pub fn show(ui: &mut Ui, overlay: &AnnotationOverlay<EguiHost>) {
    ui.horizontal(|ui| {
        let registry = overlay.registry();
        ui.weak(format!(
            "Pushpins: {}  Issues: {}",
            registry.pushpin_count(),
            registry.issue_count()
        ));

        ui.separator();

        match overlay.state() {
            InteractionState::AddMode => {
                ui.colored_label(egui::Color32::YELLOW, "Click on the model to place a pushpin");
            }
            InteractionState::SectionPick => {
                ui.colored_label(egui::Color32::YELLOW, "Click on the model to set the section center");
            }
            InteractionState::Dragging(id) => {
                ui.label(format!("Moving {id}"));
            }
            InteractionState::Idle => match overlay.selected() {
                Some(id) => {
                    ui.label(format!("Selected: {id}"));
                }
                None => {
                    ui.weak("Ready");
                }
            },
        }

        if overlay.is_loading_issues() {
            ui.separator();
            ui.colored_label(egui::Color32::from_rgb(255, 200, 100), "Loading issues...");
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format!("listeners: {}", overlay.viewer().listener_count()));
        });
    });
}
