// src/app/ui/mod.rs
pub mod grid;
pub mod topbar;

use eframe::egui as eg;

use crate::app::list::Cta;

pub(crate) fn ui_render_loading(ui: &mut eg::Ui, line: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(28.0);
        ui.add(eg::Spinner::new().size(18.0));
        ui.add_space(6.0);
        ui.label(line);
    });
}

pub(crate) fn ui_render_error(ui: &mut eg::Ui, message: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(28.0);
        ui.label(
            eg::RichText::new(message)
                .color(ui.visuals().error_fg_color)
                .size(16.0),
        );
    });
}

pub(crate) fn ui_render_placeholder(ui: &mut eg::Ui, message: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(28.0);
        ui.label(eg::RichText::new(message).weak().size(16.0));
    });
}

/// "Buy Ticket" opens the link in the browser; "Sold Out" swallows the click.
pub(crate) fn ui_cta(ui: &mut eg::Ui, cta: Cta<'_>) -> eg::Response {
    match cta {
        Cta::SoldOut => ui
            .add(
                eg::Button::new(eg::RichText::new(cta.label()).color(eg::Color32::GRAY))
                    .fill(ui.visuals().extreme_bg_color)
                    .sense(eg::Sense::click()),
            )
            .on_hover_text("Every showtime is sold out"),
        Cta::BuyTicket(url) => {
            let resp = ui.button(cta.label());
            if resp.clicked() {
                if let Some(target) = cta.target() {
                    ui.ctx().open_url(eg::OpenUrl::new_tab(target));
                }
            }
            if url.is_empty() {
                resp
            } else {
                resp.on_hover_text(url)
            }
        }
    }
}
