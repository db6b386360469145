//! Canvas rendering for `DreamApp`.
//!
//! Adapts the egui painter to the animator's `Surface`, the egui context to
//! its `FrameScheduler`, tracks canvas size changes (which rebuild the pool
//! via `resize`), and overlays the scene title.

use eframe::egui;

use reverie::render::{FrameScheduler, Surface};

use super::DreamApp;

/// Idle-canvas background, the same dark tone the trail overlay fades to.
const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(21, 0, 61);

/// egui painter adapter for the animator's drawing surface.
struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    rect: egui::Rect,
}

fn rgba(color: [f32; 4]) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(
        (color[0] * 255.0) as u8,
        (color[1] * 255.0) as u8,
        (color[2] * 255.0) as u8,
        (color[3] * 255.0) as u8,
    )
}

impl Surface for PainterSurface<'_> {
    fn width(&self) -> f32 {
        self.rect.width()
    }

    fn height(&self) -> f32 {
        self.rect.height()
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
        let min = self.rect.min + egui::vec2(x, y);
        self.painter.rect_filled(
            egui::Rect::from_min_size(min, egui::vec2(w, h)),
            0.0,
            rgba(color),
        );
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: [f32; 4]) {
        self.painter
            .circle_filled(self.rect.min + egui::vec2(x, y), radius, rgba(color));
    }
}

/// egui adapter for the animator's frame scheduling.
struct RepaintScheduler<'a> {
    ctx: &'a egui::Context,
}

impl FrameScheduler for RepaintScheduler<'_> {
    fn request_frame(&mut self) {
        self.ctx.request_repaint();
    }
}

impl DreamApp {
    /// Render the main canvas area.
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::hover());
        let rect = response.rect;

        let size = (rect.width(), rect.height());
        if size != self.canvas_size {
            self.canvas_size = size;
            self.session.resize(size.0, size.1);
        }

        painter.rect_filled(rect, 0.0, BACKGROUND);

        if self.session.is_running() {
            let t_ms = self.app_start.elapsed().as_secs_f64() * 1000.0;
            let mut surface = PainterSurface {
                painter: &painter,
                rect,
            };
            let mut scheduler = RepaintScheduler { ctx };
            self.session.frame(&mut surface, &mut scheduler, t_ms);

            if let Some(scene) = self.session.scene() {
                painter.text(
                    rect.center_top() + egui::vec2(0.0, 28.0),
                    egui::Align2::CENTER_CENTER,
                    &scene.scene_title,
                    egui::FontId::proportional(20.0),
                    egui::Color32::from_rgb(244, 114, 182),
                );
            }
        } else {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                &self.status,
                egui::FontId::proportional(16.0),
                egui::Color32::from_rgb(167, 139, 250),
            );
        }
    }
}
