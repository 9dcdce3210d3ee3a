// src/app/expander.rs
use eframe::egui as eg;

use super::data::Screening;
use super::screenings::first_screening_time;

pub const NO_SCREENINGS: &str = "No screenings available";

/// Collapsed summary line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpanderHeader {
    pub text: String,
    pub sold_out: bool,
}

impl ExpanderHeader {
    pub fn for_screenings(screenings: &[Screening]) -> Self {
        if screenings.is_empty() {
            return Self {
                text: NO_SCREENINGS.to_string(),
                sold_out: false,
            };
        }
        let sold_out = screenings[0]
            .showtimes
            .first()
            .is_some_and(|s| s.is_sold_out());
        Self {
            text: first_screening_time(screenings),
            sold_out,
        }
    }
}

/// Per-date showtime listing with a local open/closed toggle.
/// A fresh instance is created for every newly selected movie.
#[derive(Debug, Default)]
pub struct ShowtimeExpander {
    open: bool,
}

impl ShowtimeExpander {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn ui(&mut self, ui: &mut eg::Ui, screenings: &[Screening]) {
        let header = ExpanderHeader::for_screenings(screenings);
        let arrow = if self.open { "▲" } else { "▼" };

        let resp = ui
            .horizontal(|ui| {
                let text = eg::RichText::new(&header.text).strong();
                let text = if header.sold_out { text.weak() } else { text };
                ui.label(text);
                if header.sold_out {
                    sold_out_badge(ui);
                }
                ui.label(arrow);
            })
            .response
            .interact(eg::Sense::click())
            .on_hover_cursor(eg::CursorIcon::PointingHand);
        if resp.clicked() {
            self.toggle();
        }

        if !self.open || screenings.is_empty() {
            return;
        }

        ui.add_space(4.0);
        ui.indent("showtimes", |ui| {
            for screening in screenings {
                ui.label(eg::RichText::new(screening.date()).strong());
                for show in &screening.showtimes {
                    ui.horizontal(|ui| {
                        if show.is_sold_out() {
                            ui.label(eg::RichText::new(show.time()).strikethrough().weak());
                            sold_out_badge(ui);
                        } else {
                            ui.label(show.time());
                            ui.label(eg::RichText::new(show.status()).weak());
                        }
                    });
                }
                ui.add_space(4.0);
            }
        });
    }
}

fn sold_out_badge(ui: &mut eg::Ui) {
    ui.label(
        eg::RichText::new("Sold Out")
            .small()
            .color(eg::Color32::from_rgb(220, 90, 90)),
    );
}
