//! Background scene-fetch lifecycle for `DreamApp`.
//!
//! The fetch — retry waits included — runs on a worker thread so the frame
//! loop renders undisturbed throughout. Progress messages and the terminal
//! result cross back over an mpsc channel polled every frame.

use std::sync::mpsc;

use eframe::egui;

use reverie::net::fetch::SceneFetcher;
use reverie::net::FetchEvents;

use super::{DreamApp, FetchUpdate};

/// Bridges fetcher notifications onto the UI channel.
struct ChannelEvents {
    tx: mpsc::Sender<FetchUpdate>,
    ctx: egui::Context,
}

impl FetchEvents for ChannelEvents {
    fn on_status(&mut self, message: &str) {
        let _ = self.tx.send(FetchUpdate::Status(message.to_string()));
        self.ctx.request_repaint();
    }
}

impl DreamApp {
    /// Kick off a background fetch for the current transcript.
    pub fn start_visualization(&mut self, ctx: &egui::Context) {
        if self.loading {
            return;
        }
        self.loading = true;
        self.status = String::from("Processing dream...");

        let (tx, rx) = mpsc::channel();
        self.fetch_rx = Some(rx);

        let transcript = self.transcript.clone();
        let ctx = ctx.clone();

        std::thread::spawn(move || {
            let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
            let mut events = ChannelEvents {
                tx: tx.clone(),
                ctx: ctx.clone(),
            };

            let result = SceneFetcher::http(api_key).fetch_scene(&transcript, &mut events);
            let _ = tx.send(FetchUpdate::Done(result));
            ctx.request_repaint();
        });
    }

    /// Poll the fetch channel and apply any result. Call every frame.
    ///
    /// A stale result from a fetch the user has moved past is still drained
    /// here; applying it is this method's decision, and it always applies
    /// the newest one.
    pub fn check_fetch(&mut self) {
        let Some(rx) = &self.fetch_rx else { return };

        let mut finished = false;
        while let Ok(update) = rx.try_recv() {
            match update {
                FetchUpdate::Status(message) => self.status = message,
                FetchUpdate::Done(Ok(scene)) => {
                    self.status = format!("Analysis complete. Mood: {}.", scene.dominant_mood);
                    let (w, h) = self.canvas_size;
                    self.session.start(scene, w, h);
                    finished = true;
                }
                FetchUpdate::Done(Err(err)) => {
                    self.status = format!("{}. Try a simpler dream.", err);
                    finished = true;
                }
            }
        }

        if finished {
            self.loading = false;
            self.fetch_rx = None;
        }
    }
}
