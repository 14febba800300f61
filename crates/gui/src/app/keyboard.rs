//! Keyboard shortcut handling

use eframe::egui;

use pinview_gui_lib::AnnotationOverlay;

use super::host::EguiHost;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, overlay: &mut AnnotationOverlay<EguiHost>) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    let (add, section, delete) = ctx.input(|i| {
        let plain = !i.modifiers.any();
        (
            plain && i.key_pressed(egui::Key::A),
            plain && i.key_pressed(egui::Key::S),
            i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
        )
    });

    if add {
        overlay.enable_add_mode();
    }
    if section {
        overlay.enable_section_pick();
    }
    if delete {
        overlay.remove_selected();
    }
}
