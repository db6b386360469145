//! Toolbar rendering for `DreamApp`.
//!
//! Draws the transcript entry field, the visualize/stop controls, and the
//! status line fed by fetch progress events.

use eframe::egui;

use super::DreamApp;

impl DreamApp {
    /// Render the top toolbar strip.
    pub fn draw_toolbar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            ui.add_space(4.0);
            ui.label("Dream:");

            let response = ui.add_sized(
                [ui.available_width() - 180.0, 24.0],
                egui::TextEdit::singleline(&mut self.transcript)
                    .hint_text("Describe your dream..."),
            );

            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.start_visualization(ctx);
            }

            let can_start = !self.loading && !self.transcript.trim().is_empty();
            if ui
                .add_enabled(can_start, egui::Button::new("Visualize"))
                .clicked()
            {
                self.start_visualization(ctx);
            }

            if ui
                .add_enabled(self.session.is_running(), egui::Button::new("Stop"))
                .clicked()
            {
                self.session.stop();
                self.status = String::from("Animation stopped.");
            }
        });

        ui.horizontal(|ui| {
            ui.add_space(4.0);
            ui.label(egui::RichText::new(&self.status).weak());
        });
    }
}
