// src/main.rs
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn pick_renderer() -> eframe::Renderer {
    match env::var("METRO_RENDERER").as_deref() {
        Ok("glow") => eframe::Renderer::Glow,
        Ok("wgpu") => eframe::Renderer::Wgpu,
        _ => {
            // Default: Windows = WGPU (DX12), Others = Glow (GL)
            #[cfg(target_os = "windows")]
            { eframe::Renderer::Wgpu }
            #[cfg(not(target_os = "windows"))]
            { eframe::Renderer::Glow }
        }
    }
}

fn main() -> eframe::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let cfg = metrolist::config::load_config();
    info!(
        "feed sources: {} | {} | {} | {}",
        cfg.feed.local.display(),
        cfg.feed.absolute.display(),
        cfg.feed.backup.display(),
        cfg.feed.remote
    );

    let options = eframe::NativeOptions {
        renderer: pick_renderer(),
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Metrograph Listings")
            .with_inner_size([1280.0, 820.0]),
        ..Default::default()
    };

    match eframe::run_native(
        "Metrograph Listings",
        options,
        Box::new(move |_cc| Ok(Box::new(metrolist::app::MetroApp::new(cfg)))),
    ) {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("eframe failed to start: {e:?}");
            error!("Hint: try METRO_RENDERER=wgpu or METRO_RENDERER=glow.");
            Err(e)
        }
    }
}
