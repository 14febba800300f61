//! Toolbar actions and UI

use egui::Ui;

use pinview_gui_lib::state::InteractionState;
use pinview_gui_lib::AnnotationOverlay;

use crate::app::EguiHost;

pub fn show(
    ui: &mut Ui,
    overlay: &mut AnnotationOverlay<EguiHost>,
    runtime: &tokio::runtime::Handle,
    show_issue_list: &mut bool,
    section_range: &mut f32,
) {
    let state = overlay.state();
    ui.horizontal(|ui| {
        if ui
            .selectable_label(state == InteractionState::AddMode, "📍 Add pushpin")
            .on_hover_text("Click the model to place a pushpin (A)")
            .clicked()
        {
            overlay.enable_add_mode();
        }

        let has_selection = overlay.selected().is_some();
        if ui
            .add_enabled(has_selection, egui::Button::new("🗑 Remove selected"))
            .on_hover_text("Delete")
            .clicked()
        {
            overlay.remove_selected();
        }

        if ui.button("Clear all").clicked() {
            let removed = overlay.clear_all();
            tracing::info!("Cleared {removed} markers");
        }

        ui.separator();

        if ui
            .add_enabled(!overlay.is_loading_issues(), egui::Button::new("⟳ Load issues"))
            .clicked()
        {
            overlay.begin_issue_load(runtime);
        }
        ui.toggle_value(show_issue_list, "Issue list");

        ui.separator();

        if ui
            .selectable_label(state == InteractionState::SectionPick, "✂ Section")
            .on_hover_text("Click the model to cut a slab around that point (S)")
            .clicked()
        {
            overlay.enable_section_pick();
        }
        if ui
            .add(egui::Slider::new(section_range, 0.5..=50.0).text("range"))
            .changed()
        {
            overlay.set_section_range(*section_range);
        }
        if ui
            .add_enabled(overlay.section().is_active(), egui::Button::new("Clear section"))
            .clicked()
        {
            overlay.clear_section();
        }
    });
}
