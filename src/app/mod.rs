//! `DreamApp` — the top-level egui application state.
//!
//! This module declares the `DreamApp` struct and its `Default` impl.
//! All methods are split across the sibling sub-modules:
//!
//! - `fetch`   — background scene-fetch lifecycle
//! - `toolbar` — transcript entry, controls, status line
//! - `content` — canvas rendering driven by the animator

pub mod content;
pub mod fetch;
pub mod toolbar;

use std::sync::mpsc;
use std::time::Instant;

use eframe::egui;

use reverie::net::fetch::FetchError;
use reverie::render::animator::AnimatorSession;
use reverie::scene::SceneDescription;

/// Message from the fetch worker back to the UI thread.
pub enum FetchUpdate {
    Status(String),
    Done(Result<SceneDescription, FetchError>),
}

pub struct DreamApp {
    pub transcript: String,
    pub status: String,
    pub loading: bool,
    pub fetch_rx: Option<mpsc::Receiver<FetchUpdate>>,
    pub session: AnimatorSession,
    /// Canvas size adopted last frame; fetch results start runs at this size.
    pub canvas_size: (f32, f32),
    pub app_start: Instant,
}

impl Default for DreamApp {
    fn default() -> Self {
        Self {
            transcript: String::new(),
            status: String::from("Describe a dream and press Visualize."),
            loading: false,
            fetch_rx: None,
            session: AnimatorSession::new(),
            canvas_size: (800.0, 600.0),
            app_start: Instant::now(),
        }
    }
}

impl eframe::App for DreamApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_fetch();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui, ctx);
        });

        let ctx_clone = ctx.clone();
        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui, &ctx_clone);
        });
    }
}
