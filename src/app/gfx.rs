// src/app/gfx.rs
use std::path::Path;

use eframe::egui::{self as eg, ColorImage, TextureHandle};

/// Upload an RGBA image to a GPU texture. (UI thread only)
pub fn upload_rgba(
    ctx: &eg::Context,
    w: u32,
    h: u32,
    bytes: &[u8],
    name: &str,
) -> TextureHandle {
    let img = ColorImage::from_rgba_unmultiplied([w as usize, h as usize], bytes);
    ctx.load_texture(name.to_string(), img, eg::TextureOptions::LINEAR)
}

/// Load a texture from a cached poster file. (UI thread only)
pub fn load_texture_from_path(
    ctx: &eg::Context,
    path: &Path,
    cache_name: &str,
) -> Result<TextureHandle, String> {
    let (w, h, bytes) = crate::app::cache::load_rgba(path)?;
    if w == 0 || h == 0 {
        return Err(format!("empty image {}", path.display()));
    }
    Ok(upload_rgba(ctx, w, h, &bytes, cache_name))
}

/// Largest rect with the image's aspect that fits centred inside `bounds`.
/// Metrograph artwork is a mix of portrait posters and landscape stills.
pub fn fit_rect(image_size: eg::Vec2, bounds: eg::Rect) -> eg::Rect {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return bounds;
    }
    let scale = (bounds.width() / image_size.x).min(bounds.height() / image_size.y);
    eg::Rect::from_center_size(bounds.center(), image_size * scale)
}
