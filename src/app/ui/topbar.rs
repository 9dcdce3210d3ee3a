// src/app/ui/topbar.rs
use eframe::egui as eg;

impl crate::app::MetroApp {
    // ---------- NAVBAR ----------
    pub(crate) fn ui_render_topbar(&mut self, ui: &mut eg::Ui) {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.heading("What's good in Metrograph?");
            ui.separator();
            ui.label(eg::RichText::new(&self.month_label).monospace());

            ui.with_layout(eg::Layout::right_to_left(eg::Align::Center), |ui| {
                // right-to-left: button first, then the box
                let clicked = ui.button("Search").clicked();
                let resp = ui.add(
                    eg::TextEdit::singleline(&mut self.search_query)
                        .hint_text("🔍 search")
                        .desired_width(200.0),
                );
                let submitted =
                    resp.lost_focus() && ui.input(|i| i.key_pressed(eg::Key::Enter));
                if clicked || submitted {
                    self.apply_search();
                }

                if !self.search_applied.is_empty() && ui.small_button("Clear").clicked() {
                    self.search_query.clear();
                    self.apply_search();
                }

                ui.separator();
                ui.label("Poster:");
                if ui
                    .add(eg::Slider::new(&mut self.poster_width_ui, 140.0..=260.0).suffix(" px"))
                    .changed()
                {
                    self.mark_dirty();
                }

                if let Some(src) = self.list.source_label() {
                    ui.separator();
                    ui.label(eg::RichText::new(format!("feed: {src}")).weak().small());
                }
            });
        });
        ui.add_space(4.0);
    }

    pub(crate) fn apply_search(&mut self) {
        let q = self.search_query.trim().to_string();
        if q != self.search_applied {
            self.search_applied = q;
            self.mark_dirty();
        }
    }
}
