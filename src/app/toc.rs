//! Floating outline window for `ReaderApp`, painted from the panel nodes.

use eframe::egui;

use reader_outline::engine::events::HostEvent;
use reader_outline::outline::MIN_LEVEL;
use reader_outline::panel::{PanelController, PANEL_ID, TOGGLE_TOOLTIP};

use super::ReaderApp;

const INDENT_PER_LEVEL: f32 = 12.0;

impl ReaderApp {
    pub fn draw_toc(&mut self, ctx: &egui::Context) {
        let Some(doc) = self.doc.as_ref() else {
            return;
        };
        let Some(view) = PanelController::new().snapshot(doc) else {
            return;
        };
        if view.hidden {
            return;
        }

        let reveal = self.pending_reveal.take();
        let mut clicked = None;

        egui::Window::new(&view.title)
            .id(egui::Id::new(PANEL_ID))
            .anchor(egui::Align2::RIGHT_TOP, [-16.0, 48.0])
            .resizable(false)
            .collapsible(false)
            .default_width(240.0)
            .show(ctx, |ui| {
                if ui
                    .button(&view.glyph)
                    .on_hover_text(TOGGLE_TOOLTIP)
                    .clicked()
                {
                    clicked = Some(view.toggle.clone());
                }
                if view.collapsed {
                    return;
                }
                ui.separator();
                egui::ScrollArea::vertical()
                    .id_salt("toc-list")
                    .max_height(420.0)
                    .show(ui, |ui| {
                        for entry in &view.entries {
                            ui.horizontal(|ui| {
                                let depth = entry.level.saturating_sub(MIN_LEVEL);
                                ui.add_space(depth as f32 * INDENT_PER_LEVEL);
                                let response = ui.selectable_label(entry.active, &entry.label);
                                if reveal.as_deref() == Some(entry.anchor_id.as_str()) {
                                    response.scroll_to_me(None);
                                }
                                if response.clicked() {
                                    clicked = Some(entry.link.clone());
                                }
                            });
                        }
                    });
            });

        if let Some(target) = clicked {
            self.dispatch(ctx, HostEvent::PointerClick { target });
        }
    }
}
