mod app;
mod ui;

use app::PinviewApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pinview_gui=info,pinview_gui_lib=info".into()),
        )
        .init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            return;
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("pinview: annotation overlay demo")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "pinview-gui",
        native_options,
        Box::new(move |cc| Ok(Box::new(PinviewApp::new(cc, runtime)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}
