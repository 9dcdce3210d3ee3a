// src/app/ui/grid.rs
use eframe::egui as eg;

use crate::app::filters::filtered_indices;
use crate::app::gfx::fit_rect;
use crate::app::list::{CardModel, Cta, ListBody, NO_MOVIES_MESSAGE};
use crate::app::prefetch::MAX_UPLOADS_PER_FRAME;

pub const H_SPACING: f32 = 8.0;
pub const V_SPACING: f32 = 12.0;
const TEXT_H: f32 = 190.0;

impl crate::app::MetroApp {
    pub(crate) fn ui_render_film_list(&mut self, ui: &mut eg::Ui, ctx: &eg::Context) {
        let visible = filtered_indices(self.list.movies(), &self.search_applied);
        let idxs = match self.list.body(visible) {
            ListBody::Loading(line) => {
                super::ui_render_loading(ui, line);
                return;
            }
            ListBody::Failed(message) => {
                super::ui_render_error(ui, message);
                return;
            }
            ListBody::Empty => {
                super::ui_render_placeholder(ui, NO_MOVIES_MESSAGE);
                return;
            }
            ListBody::NoMatches => {
                super::ui_render_placeholder(
                    ui,
                    &format!("No movies match “{}”.", self.search_applied),
                );
                return;
            }
            ListBody::Cards(idxs) => idxs,
        };

        let card_w: f32 = self.poster_width_ui;
        let poster_h: f32 = card_w * 1.5;
        let card_h: f32 = poster_h + TEXT_H;

        let mut uploads_left = MAX_UPLOADS_PER_FRAME;
        let mut clicked: Option<usize> = None;

        eg::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.add_space(8.0);

                let avail = ui.available_width();
                let cols = ((avail + H_SPACING) / (card_w + H_SPACING))
                    .floor()
                    .max(1.0) as usize;

                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing = eg::vec2(H_SPACING, V_SPACING);

                    for (col, &idx) in idxs.iter().enumerate() {
                        if col > 0 && col % cols == 0 {
                            ui.end_row();
                        }
                        let Some(movie) = self.list.movies().get(idx) else {
                            continue;
                        };
                        let card = CardModel::from_movie(movie);
                        let is_selected = self.selected_idx == Some(idx);
                        let tex = self.posters.texture(ctx, card.poster_url, &mut uploads_left);

                        ui.allocate_ui_with_layout(
                            eg::vec2(card_w, card_h),
                            eg::Layout::top_down(eg::Align::Min),
                            |ui| {
                                ui.set_min_size(eg::vec2(card_w, card_h));
                                // text must not eat clicks meant for the card
                                ui.style_mut().interaction.selectable_labels = false;
                                let rect = ui.max_rect();

                                // selection; the ticket button is added later so it sits on top
                                let id = eg::Id::new(("film_card", idx));
                                let card_resp = ui
                                    .interact(rect, id, eg::Sense::click())
                                    .on_hover_cursor(eg::CursorIcon::PointingHand);
                                if card_resp.clicked() {
                                    clicked = Some(idx);
                                }

                                ui.painter()
                                    .rect_filled(rect, 6.0, ui.visuals().faint_bg_color);

                                let poster_rect = eg::Rect::from_min_size(
                                    rect.min,
                                    eg::vec2(card_w, poster_h),
                                );
                                match &tex {
                                    Some(tex) => {
                                        ui.painter().image(
                                            tex.id(),
                                            fit_rect(tex.size_vec2(), poster_rect),
                                            eg::Rect::from_min_max(
                                                eg::pos2(0.0, 0.0),
                                                eg::pos2(1.0, 1.0),
                                            ),
                                            eg::Color32::WHITE,
                                        );
                                    }
                                    None => {
                                        ui.painter().rect_filled(
                                            poster_rect,
                                            6.0,
                                            eg::Color32::from_gray(40),
                                        );
                                    }
                                }

                                let text_rect = eg::Rect::from_min_max(
                                    eg::pos2(rect.min.x + 6.0, poster_rect.max.y + 6.0),
                                    eg::pos2(rect.max.x - 6.0, rect.max.y - 6.0),
                                );
                                let ticket_clicked = ui.allocate_ui_at_rect(text_rect, |ui| {
                                    ui.set_clip_rect(text_rect.intersect(ui.clip_rect()));
                                    ui.add(
                                        eg::Label::new(
                                            eg::RichText::new(card.title).strong().size(15.0),
                                        )
                                        .truncate(),
                                    );
                                    ui.label(eg::RichText::new(&card.screen_time).size(13.0));
                                    ui.add(
                                        eg::Label::new(eg::RichText::new(&card.director_line).weak())
                                            .truncate(),
                                    );
                                    ui.label(eg::RichText::new(&card.duration).weak());
                                    ui.add(
                                        eg::Label::new(eg::RichText::new(&card.description).small())
                                            .wrap(),
                                    );
                                    ui.add_space(4.0);
                                    let cta = super::ui_cta(ui, card.cta);
                                    // Sold Out stays inert; Buy Ticket also selects
                                    matches!(card.cta, Cta::BuyTicket(_)) && cta.clicked()
                                }).inner;
                                if ticket_clicked {
                                    clicked = Some(idx);
                                }

                                if is_selected {
                                    ui.painter().rect_stroke(
                                        rect.shrink(1.0),
                                        6.0,
                                        eg::Stroke::new(2.0, eg::Color32::YELLOW),
                                    );
                                }
                            },
                        );
                    }

                    ui.end_row();
                });
            });

        if let Some(idx) = clicked {
            let mut picked = None;
            self.list.select(idx, |movie| picked = Some(movie.clone()));
            if let Some(movie) = picked {
                self.select_movie(idx, movie);
            }
        }
    }
}
