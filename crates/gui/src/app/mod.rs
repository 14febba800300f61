//! Demo application: an egui viewport hosting the annotation overlay

mod host;
mod keyboard;
mod orbit;
mod styles;

use std::cell::RefCell;
use std::rc::Rc;

use eframe::egui;

use pinview_gui_lib::state::{ClickedMarker, OverlaySettings};
use pinview_gui_lib::viewer::ViewerEvent;
use pinview_gui_lib::AnnotationOverlay;

use crate::ui::{issue_list, popup, status_bar, toolbar};
pub use host::EguiHost;

/// Main application
pub struct PinviewApp {
    overlay: AnnotationOverlay<EguiHost>,
    runtime: tokio::runtime::Runtime,
    /// Last marker clicked, shown in the popup window
    popup: Rc<RefCell<Option<ClickedMarker>>>,
    show_issue_list: bool,
    section_range: f32,
    /// The first issue load is started on the first frame
    initial_load: bool,
}

impl PinviewApp {
    pub fn new(cc: &eframe::CreationContext<'_>, runtime: tokio::runtime::Runtime) -> Self {
        styles::configure_styles(&cc.egui_ctx);

        let settings = OverlaySettings::load();
        let section_range = settings.section.range;
        let mut overlay = AnnotationOverlay::new(EguiHost::new(), settings);

        let popup = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&popup);
        overlay.on_marker_clicked(move |marker| {
            *sink.borrow_mut() = Some(marker.clone());
        });

        Self {
            overlay,
            runtime,
            popup,
            show_issue_list: true,
            section_range,
            initial_load: true,
        }
    }

    fn show_viewport(&mut self, ui: &mut egui::Ui) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

        let host = self.overlay.viewer_mut();
        let mut camera_moved = host.set_viewport(rect);
        if response.dragged_by(egui::PointerButton::Secondary) {
            let d = response.drag_delta();
            host.orbit.rotate(-d.x * 0.5, d.y * 0.5);
            camera_moved = true;
        }
        if response.dragged_by(egui::PointerButton::Middle) {
            let d = response.drag_delta();
            let speed = host.orbit.distance * 0.002;
            host.orbit.pan(-d.x * speed, d.y * speed);
            camera_moved = true;
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                host.orbit.zoom(scroll * 0.002);
                camera_moved = true;
            }
        }

        if camera_moved {
            self.overlay.dispatch(ViewerEvent::CameraChanged);
        }
        for event in pointer_events(ui, &response) {
            self.overlay.dispatch(event);
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(24, 24, 28));
        self.overlay.viewer().paint(&painter);
    }
}

/// Translate raw pointer input into viewer events
fn pointer_events(ui: &egui::Ui, response: &egui::Response) -> Vec<ViewerEvent> {
    let mut events = Vec::new();
    ui.input(|i| {
        let Some(pos) = i.pointer.interact_pos() else {
            return;
        };
        if i.pointer.primary_pressed() && response.hovered() {
            events.push(ViewerEvent::PointerDown(pos));
        }
        if i.pointer.is_moving() && i.pointer.primary_down() {
            events.push(ViewerEvent::PointerMove(pos));
        }
        if i.pointer.primary_released() {
            events.push(ViewerEvent::PointerUp(pos));
        }
    });
    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            events.push(ViewerEvent::Click(pos));
        }
    }
    events
}

impl eframe::App for PinviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if std::mem::take(&mut self.initial_load) {
            self.overlay.begin_issue_load(self.runtime.handle());
        }
        self.overlay.poll_issue_load();
        if self.overlay.viewer_mut().take_dirty() {
            ctx.request_repaint();
        }

        keyboard::handle_keyboard(ctx, &mut self.overlay);

        // ── Toolbar ───────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                toolbar::show(
                    ui,
                    &mut self.overlay,
                    self.runtime.handle(),
                    &mut self.show_issue_list,
                    &mut self.section_range,
                );
            });

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.overlay);
            });

        // ── Right panel: issue list ──────────────────────────
        if self.show_issue_list {
            egui::SidePanel::right("issue_list")
                .default_width(280.0)
                .width_range(200.0..=480.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)),
                )
                .show(ctx, |ui| {
                    issue_list::show(ui, &mut self.overlay, self.runtime.handle());
                });
        }

        popup::show(ctx, &mut self.popup.borrow_mut());

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.show_viewport(ui);
            });

        if self.overlay.is_loading_issues() {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.overlay.settings().save();
    }
}
