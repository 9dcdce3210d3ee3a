// src/app/types.rs
use eframe::egui::TextureHandle;
use std::path::PathBuf;

// ---- cross-thread messages ----
/// (url, cache key) handed to a poster worker.
pub type WorkItem = (String, String);

pub struct PrefetchDone {
    pub url: String,
    pub result: Result<PathBuf, String>,
}

// ---- per-poster state ----
pub enum PosterState {
    Pending,          // queued or downloading
    Cached(PathBuf),  // file present on disk (ready to upload)
    Ready(TextureHandle),
    Failed,           // permanent failure this session
}

impl PosterState {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready(_) | Self::Failed)
    }
}
