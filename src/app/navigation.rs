//! Background loading of article sources for `ReaderApp`.

use std::sync::mpsc;

use eframe::egui;

use reader_outline::engine::controller::TocController;
use reader_outline::engine::events::{HostEvent, ReadyState};
use reader_outline::engine::loader::load_sources;

use super::ReaderApp;

impl ReaderApp {
    /// Load `self.sources` on a worker thread.
    pub fn start_loading(&mut self, ctx: &egui::Context) {
        if self.loading {
            return;
        }
        self.loading = true;
        self.error = None;

        let (tx, rx) = mpsc::channel();
        self.load_rx = Some(rx);

        let sources = self.sources.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let result = load_sources(&sources);
            let _ = tx.send(result);
            ctx.request_repaint();
        });
    }

    /// Poll the load channel. A freshly loaded document gets a new
    /// controller, started the way a page script would be: while the
    /// document is still loading, then released by the ready event.
    pub fn check_load(&mut self, ctx: &egui::Context) {
        let Some(rx) = &self.load_rx else {
            return;
        };
        let Ok(result) = rx.try_recv() else {
            return;
        };
        self.loading = false;
        self.load_rx = None;

        match result {
            Ok(doc) => {
                log::info!("loaded \"{}\"", doc.title);
                self.doc = Some(doc);
                self.error = None;
                self.anchor_spans.clear();
                self.pending_scroll = None;
                self.pending_reveal = None;
                self.controller = TocController::default();

                if let Some(doc) = self.doc.as_mut() {
                    let effects = self.controller.start(doc, ReadyState::Loading);
                    self.apply_effects(ctx, effects);
                }
                self.dispatch(ctx, HostEvent::DomContentLoaded);
            }
            Err(e) => {
                log::error!("load failed: {}", e);
                self.error = Some(e.to_string());
                self.doc = None;
            }
        }
    }
}
