mod app;
mod color;
mod data;
mod processing;
mod state;
mod ui;

use app::VizForgeApp;
use eframe::egui;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("VizForge")
            .with_inner_size([1280.0, 840.0])
            .with_min_inner_size([900.0, 600.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "VizForge",
        options,
        Box::new(|cc| Ok(Box::new(VizForgeApp::new(cc)))),
    )
}
