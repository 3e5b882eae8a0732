//! `ReaderApp`: the egui host for the outline controller.
//!
//! State lives here; methods are split across the sibling sub-modules:
//!
//! - `navigation`: background loading of article sources
//! - `toolbar`: status strip
//! - `content`: article painting, entry clicks, scroll sampling
//! - `toc`: the floating outline window

pub mod content;
pub mod navigation;
pub mod toc;
pub mod toolbar;

use std::collections::HashMap;
use std::sync::mpsc;
use std::time::Instant;

use eframe::egui;

use reader_outline::dom::DomTree;
use reader_outline::engine::controller::TocController;
use reader_outline::engine::events::{Effect, HostEvent};
use reader_outline::engine::loader::LoadError;
use reader_outline::engine::scroll::Span;

pub struct ReaderApp {
    pub sources: Vec<String>,
    pub doc: Option<DomTree>,
    pub controller: TocController,
    pub error: Option<String>,
    pub loading: bool,
    pub load_rx: Option<mpsc::Receiver<Result<DomTree, LoadError>>>,
    /// Anchor extents measured during the last paint.
    pub anchor_spans: HashMap<String, Span>,
    /// Anchor the article should scroll to on the next paint.
    pub pending_scroll: Option<String>,
    /// Panel entry to bring into view on the next paint.
    pub pending_reveal: Option<String>,
    pub dark_mode: bool,
}

impl ReaderApp {
    pub fn new(sources: Vec<String>, ctx: &egui::Context) -> Self {
        let mut app = Self {
            sources,
            doc: None,
            controller: TocController::default(),
            error: None,
            loading: false,
            load_rx: None,
            anchor_spans: HashMap::new(),
            pending_scroll: None,
            pending_reveal: None,
            dark_mode: false,
        };
        app.start_loading(ctx);
        app
    }

    /// Deliver one event to the controller and carry out what it asks for.
    pub fn dispatch(&mut self, ctx: &egui::Context, event: HostEvent) {
        let Some(doc) = self.doc.as_mut() else {
            return;
        };
        let effects = self.controller.handle(doc, event, Instant::now());
        self.apply_effects(ctx, effects);
    }

    pub fn apply_effects(&mut self, ctx: &egui::Context, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ScrollIntoView { anchor_id, .. } => {
                    self.pending_scroll = Some(anchor_id);
                }
                Effect::RevealInPanel { anchor_id, .. } => {
                    self.pending_reveal = Some(anchor_id);
                }
                Effect::Observe {
                    subscription,
                    anchors,
                    ..
                } => {
                    log::debug!("observing {} anchors as {:?}", anchors.len(), subscription);
                }
                Effect::Disconnect { subscription } => {
                    log::debug!("disconnected {:?}", subscription);
                }
                Effect::WakeAt(deadline) => {
                    ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
                }
            }
        }
        ctx.request_repaint();
    }
}

impl eframe::App for ReaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load(ctx);

        if let Some(doc) = self.doc.as_mut() {
            let effects = self.controller.poll(doc, Instant::now());
            if !effects.is_empty() {
                self.apply_effects(ctx, effects);
            }
        }

        if self.dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        let ctx_clone = ctx.clone();
        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_content(ui, &ctx_clone);
        });

        self.draw_toc(ctx);
    }
}
