//! Issue list panel

use egui::Ui;

use pinview_gui_lib::issues::IssueListState;
use pinview_gui_lib::state::issue_marker_id;
use pinview_gui_lib::AnnotationOverlay;

use crate::app::EguiHost;

pub fn show(ui: &mut Ui, overlay: &mut AnnotationOverlay<EguiHost>, runtime: &tokio::runtime::Handle) {
    ui.horizontal(|ui| {
        ui.heading("Issues");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .add_enabled(!overlay.is_loading_issues(), egui::Button::new("⟳"))
                .on_hover_text("Reload")
                .clicked()
            {
                overlay.begin_issue_load(runtime);
            }
        });
    });
    ui.separator();

    let list = overlay.issue_list().clone();
    match &list {
        IssueListState::Failed(message) => {
            ui.colored_label(egui::Color32::from_rgb(255, 100, 100), message);
            return;
        }
        state => {
            ui.weak(state.summary());
        }
    }

    let palette = overlay.settings().palette.clone();
    let selected = overlay.selected().cloned();
    let mut clicked = None;

    egui::ScrollArea::vertical().show(ui, |ui| {
        for issue in list.issues() {
            let marker_id = issue_marker_id(&issue.id);
            let has_marker = overlay.registry().contains(&marker_id);
            let [r, g, b] = palette.status_color(&issue.status());
            ui.horizontal(|ui| {
                ui.colored_label(egui::Color32::from_rgb(r, g, b), "●");
                let is_selected = selected.as_deref() == Some(marker_id.as_str());
                let row = ui.add_enabled(
                    has_marker,
                    egui::SelectableLabel::new(is_selected, &issue.name),
                );
                if row.clicked() {
                    clicked = Some(marker_id.clone());
                }
            });
            ui.horizontal(|ui| {
                ui.add_space(18.0);
                ui.weak(issue.status.as_str());
                if let Some(day) = issue.due_day() {
                    ui.weak(format!("due {day}"));
                }
            });
        }
        if let Some(notice) = list.overflow_notice() {
            ui.add_space(4.0);
            ui.weak(notice);
        }
    });

    if let Some(id) = clicked {
        overlay.select(&id);
    }
}
