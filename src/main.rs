use eframe::egui;

mod app;

use app::DreamApp;

fn main() {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1080.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Reverie — Dream Visualizer",
        options,
        Box::new(|_cc| Ok(Box::new(DreamApp::default()))),
    )
    .expect("Failed to start Reverie");
}
