//! Status strip for `ReaderApp`.

use eframe::egui;

use crate::ui::truncate_str;

use super::ReaderApp;

impl ReaderApp {
    pub fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(4.0);

            let title = self
                .doc
                .as_ref()
                .map(|d| d.title.as_str())
                .unwrap_or("(nothing loaded)");
            ui.strong(truncate_str(title, 60));

            ui.separator();
            let outline = self.controller.outline();
            let summary = match outline.strategy() {
                Some(strategy) => format!("{} items ({})", outline.len(), strategy.name()),
                None => "no outline".to_string(),
            };
            ui.label(summary);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let icon = if self.dark_mode { "\u{2600}" } else { "\u{263E}" };
                if ui.button(icon).clicked() {
                    self.dark_mode = !self.dark_mode;
                }
                if ui
                    .add_enabled(!self.loading, egui::Button::new("Reload"))
                    .clicked()
                {
                    let ctx = ui.ctx().clone();
                    self.start_loading(&ctx);
                }
                if self.loading {
                    ui.spinner();
                }
            });
        });
    }
}
