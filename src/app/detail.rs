// src/app/detail.rs
use eframe::egui as eg;

use crate::app::gfx::fit_rect;
use crate::app::list::Cta;

pub const DETAIL_PLACEHOLDER: &str = "Select a movie to see the details here.";

impl crate::app::MetroApp {
    pub(crate) fn ui_render_detail_panel(&mut self, ctx: &eg::Context) {
        // Read screen width and snap panel width to card "column steps"
        let screen_w: f32 = ctx.input(|i| i.screen_rect().width());
        let step: f32 = (self.poster_width_ui + crate::app::ui::grid::H_SPACING).max(1.0);
        let max_w: f32 = (screen_w * 0.5).clamp(360.0, 640.0);
        let snapped_max: f32 = ((max_w / step).floor() * step).max(300.0);

        let snapped_default: f32 =
            ((self.detail_panel_width / step).round() * step).clamp(300.0, snapped_max);

        let mut clear = false;
        let mut uploads_left = 1usize;

        let panel = eg::SidePanel::right("detail_panel")
            .resizable(true)
            .default_width(snapped_default)
            .min_width(300.0)
            .max_width(snapped_max)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    ui.heading("Details");
                    ui.with_layout(eg::Layout::right_to_left(eg::Align::Center), |ui| {
                        if self.selected.is_some() && ui.button("Clear").clicked() {
                            clear = true;
                        }
                    });
                });
                ui.separator();

                let Some(movie) = &self.selected else {
                    ui.label(DETAIL_PLACEHOLDER);
                    return;
                };

                eg::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        ui.heading(movie.title());
                        ui.label(eg::RichText::new(movie.duration_line()).weak());
                        ui.add_space(8.0);

                        eg::Grid::new("detail_fields")
                            .num_columns(2)
                            .spacing([12.0, 6.0])
                            .show(ui, |ui| {
                                ui.label(eg::RichText::new("Director:").strong());
                                ui.label(movie.director());
                                ui.end_row();

                                ui.label(eg::RichText::new("Description:").strong());
                                ui.add(eg::Label::new(movie.synopsis()).wrap());
                                ui.end_row();

                                ui.label(eg::RichText::new("Screen Time:").strong());
                                ui.vertical(|ui| {
                                    self.expander.ui(ui, &movie.screenings);
                                });
                                ui.end_row();
                            });

                        ui.add_space(10.0);

                        // Poster preview
                        let avail_w = ui.available_width().clamp(160.0, 520.0);
                        let poster_size = eg::vec2(avail_w, avail_w * 1.5);
                        let (rect, _resp) =
                            ui.allocate_exact_size(poster_size, eg::Sense::hover());
                        match self.posters.texture(ctx, movie.poster_url(), &mut uploads_left) {
                            Some(tex) => {
                                ui.painter().image(
                                    tex.id(),
                                    fit_rect(tex.size_vec2(), rect),
                                    eg::Rect::from_min_max(eg::pos2(0.0, 0.0), eg::pos2(1.0, 1.0)),
                                    eg::Color32::WHITE,
                                );
                            }
                            None => {
                                ui.painter().rect_filled(rect, 8.0, eg::Color32::from_gray(40));
                                ui.painter().text(
                                    rect.center(),
                                    eg::Align2::CENTER_CENTER,
                                    if movie.poster_url().is_empty() {
                                        "No poster"
                                    } else {
                                        "Poster loading…"
                                    },
                                    eg::FontId::proportional(14.0),
                                    eg::Color32::WHITE,
                                );
                            }
                        }

                        ui.add_space(8.0);
                        crate::app::ui::ui_cta(ui, Cta::for_movie(movie));
                    });
            });

        if clear {
            self.clear_selection();
        }

        // Persist the (snapped) width so it sticks between runs
        let actual_w = panel.response.rect.width();
        let snapped_new = ((actual_w / step).round() * step).clamp(300.0, snapped_max);
        if (snapped_new - self.detail_panel_width).abs() > 0.5 {
            self.detail_panel_width = snapped_new;
            self.mark_dirty();
        }
    }
}
