//! Article area for `ReaderApp`.
//!
//! Paints the `#stream` container, turns entry-header clicks into the click
//! and class-mutation events a feed reader page would produce, and samples
//! anchor positions for the scroll tracker once per frame.

use std::time::Instant;

use eframe::egui;

use reader_outline::dom::shell::{expand_entry, ACTIVE_CLASS, FLUX_CLASS, FLUX_HEADER_CLASS, STREAM_ID};
use reader_outline::dom::{DomNode, DomTree, NodePath};
use reader_outline::engine::events::{HostEvent, MutationRecord};
use reader_outline::engine::scroll::Viewport;

use crate::ui::{collapse_ws, render_node, ArticleFrame};

use super::ReaderApp;

impl ReaderApp {
    pub fn draw_content(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        if let Some(error) = &self.error {
            ui.colored_label(egui::Color32::RED, format!("Error: {}", error));
            return;
        }
        let Some(doc) = self.doc.as_ref() else {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
            return;
        };

        let scroll_target = self.pending_scroll.take();
        let mut viewport = None;
        let mut clicked = None;
        self.anchor_spans.clear();

        egui::ScrollArea::vertical()
            .id_salt("article")
            .auto_shrink([false, false])
            .show_viewport(ui, |ui, visible| {
                viewport = Some(Viewport {
                    scroll_top: visible.min.y,
                    height: visible.height(),
                });
                let mut frame = ArticleFrame {
                    origin_y: ui.min_rect().top(),
                    spans: &mut self.anchor_spans,
                    scroll_target: scroll_target.as_deref(),
                    clicked: None,
                };
                ui.set_max_width(760.0);
                draw_stream(ui, doc, &mut frame);
                clicked = frame.clicked;
            });

        if let Some(target) = clicked {
            self.click_header(ctx, target);
        }
        if let Some(viewport) = viewport {
            self.sample_anchors(ctx, viewport);
        }
    }

    /// A header click expands its entry. The page reports the click first,
    /// then the resulting class changes.
    fn click_header(&mut self, ctx: &egui::Context, target: NodePath) {
        self.dispatch(ctx, HostEvent::PointerClick { target: target.clone() });

        let Some(doc) = self.doc.as_mut() else {
            return;
        };
        let Some(entry) = entry_of(doc, &target) else {
            return;
        };
        let changed = expand_entry(doc, &entry);
        if !changed.is_empty() {
            let records = changed
                .into_iter()
                .map(|path| MutationRecord::attribute(path, "class"))
                .collect();
            self.dispatch(ctx, HostEvent::Mutations(records));
        }
    }

    fn sample_anchors(&mut self, ctx: &egui::Context, viewport: Viewport) {
        let spans = &self.anchor_spans;
        let Some(tracker) = self.controller.tracker_mut() else {
            return;
        };
        let subscription = tracker.id();
        let entries = tracker.sample(viewport, &|id| spans.get(id).copied());
        if entries.is_empty() {
            return;
        }
        if let Some(doc) = self.doc.as_mut() {
            let effects = self.controller.handle(
                doc,
                HostEvent::Intersection {
                    subscription,
                    entries,
                },
                Instant::now(),
            );
            self.apply_effects(ctx, effects);
        }
    }
}

fn draw_stream(ui: &mut egui::Ui, doc: &DomTree, frame: &mut ArticleFrame) {
    let Some(stream) = doc.find_by_id(STREAM_ID) else {
        return;
    };
    let Some(stream_node) = doc.node(&stream) else {
        return;
    };

    for (i, child) in stream_node.children.iter().enumerate() {
        let path = stream.child(i);
        if child.has_class(FLUX_CLASS) {
            draw_entry(ui, child, &path, frame);
        } else {
            render_node(ui, child, &path, frame);
        }
    }
}

/// One `.flux` entry: a clickable header, plus the body when expanded.
fn draw_entry(ui: &mut egui::Ui, entry: &DomNode, path: &NodePath, frame: &mut ArticleFrame) {
    let expanded = entry.has_class(ACTIVE_CLASS);
    for (i, child) in entry.children.iter().enumerate() {
        let child_path = path.child(i);
        if child.has_class(FLUX_HEADER_CLASS) {
            let marker = if expanded { "\u{25BE}" } else { "\u{25B8}" };
            let title = format!("{} {}", marker, collapse_ws(&child.text_content()));
            let response = ui.add(
                egui::Label::new(egui::RichText::new(title).size(17.0).strong())
                    .sense(egui::Sense::click()),
            );
            if response.clicked() {
                frame.clicked = Some(child_path.child(0));
            }
            response.on_hover_cursor(egui::CursorIcon::PointingHand);
        } else if expanded {
            ui.add_space(6.0);
            render_node(ui, child, &child_path, frame);
        }
    }
    ui.separator();
}

/// The `.flux` entry containing `target`.
fn entry_of(doc: &DomTree, target: &NodePath) -> Option<NodePath> {
    let mut current = Some(target.clone());
    while let Some(path) = current {
        if doc.node(&path).is_some_and(|n| n.has_class(FLUX_CLASS)) {
            return Some(path);
        }
        current = path.parent();
    }
    None
}
