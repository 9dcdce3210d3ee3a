// src/app/prefetch.rs
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use eframe::egui as eg;
use tracing::{debug, warn};

use super::cache::{download_and_store_resized, find_any_by_key, poster_cache_dir, url_to_cache_key};
use super::gfx::load_texture_from_path;
use super::types::{PosterState, PrefetchDone, WorkItem};

// ---- Tunables ----
pub const WORKER_COUNT: usize = 6;
const RESIZE_MAX_W: u32 = 360;
const RESIZE_QUALITY: u8 = 80;
const MAX_DONE_PER_FRAME: usize = 12;
pub const MAX_UPLOADS_PER_FRAME: usize = 4;

/// Poster artwork keyed by URL: disk cache lookup, background download, lazy texture upload.
pub struct PosterCache {
    entries: HashMap<String, PosterState>,
    enabled: bool,
    workers: usize,
    work_tx: Option<Sender<WorkItem>>,
    done_rx: Option<Receiver<PrefetchDone>>,
    completed: usize,
    failed: usize,
}

impl PosterCache {
    pub fn new(workers: usize) -> Self {
        // Allow opting out instead of opting in.
        let enabled = std::env::var_os("METRO_DISABLE_POSTERS").is_none();
        if !enabled {
            debug!("poster downloads disabled via METRO_DISABLE_POSTERS");
        }
        Self {
            entries: HashMap::new(),
            enabled,
            workers: workers.clamp(1, 32),
            work_tx: None,
            done_rx: None,
            completed: 0,
            failed: 0,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(1)
        }
    }

    pub fn progress(&self) -> (usize, usize, usize) {
        (self.completed, self.failed, self.entries.len())
    }

    /// Make sure `url` is known: reuse a cached file or queue a download.
    pub fn request(&mut self, url: &str) {
        if url.is_empty() || !self.enabled || self.entries.contains_key(url) {
            return;
        }
        let key = url_to_cache_key(url);
        if let Some(path) = find_any_by_key(&key) {
            self.entries.insert(url.to_string(), PosterState::Cached(path));
            return;
        }
        let Some(tx) = self.ensure_workers() else {
            self.entries.insert(url.to_string(), PosterState::Failed);
            return;
        };
        if tx.send((url.to_string(), key)).is_ok() {
            self.entries.insert(url.to_string(), PosterState::Pending);
        } else {
            self.entries.insert(url.to_string(), PosterState::Failed);
        }
    }

    /// Texture for `url`, uploading a cached file if the per-frame budget allows.
    pub fn texture(
        &mut self,
        ctx: &eg::Context,
        url: &str,
        uploads_left: &mut usize,
    ) -> Option<eg::TextureHandle> {
        self.request(url);
        let state = self.entries.get_mut(url)?;
        if let PosterState::Cached(path) = &*state {
            if *uploads_left == 0 {
                return None;
            }
            *uploads_left -= 1;
            let path = path.clone();
            *state = match load_texture_from_path(ctx, &path, &url_to_cache_key(url)) {
                Ok(tex) => PosterState::Ready(tex),
                Err(e) => {
                    warn!("poster upload failed for {url}: {e}");
                    PosterState::Failed
                }
            };
        }
        match state {
            PosterState::Ready(tex) => Some(tex.clone()),
            _ => None,
        }
    }

    /// Drain finished downloads. Returns true if anything changed.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = &self.done_rx else {
            return false;
        };
        let mut drained = 0usize;
        while drained < MAX_DONE_PER_FRAME {
            match rx.try_recv() {
                Ok(PrefetchDone { url, result }) => {
                    drained += 1;
                    let next = match result {
                        Ok(path) => {
                            self.completed += 1;
                            PosterState::Cached(path) // uploaded lazily during paint
                        }
                        Err(e) => {
                            self.failed += 1;
                            debug!("poster download failed: {e}");
                            PosterState::Failed
                        }
                    };
                    self.entries.insert(url, next);
                }
                Err(mpsc::TryRecvError::Empty) | Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }
        drained > 0
    }

    pub fn has_pending(&self) -> bool {
        self.entries.values().any(|s| !s.is_settled())
    }

    fn ensure_workers(&mut self) -> Option<Sender<WorkItem>> {
        if let Some(tx) = &self.work_tx {
            return Some(tx.clone());
        }

        // One shared HTTP client.
        let client = match reqwest::blocking::Client::builder()
            .user_agent("metrolist/posters")
            .timeout(Duration::from_secs(20))
            .pool_max_idle_per_host(self.workers)
            .default_headers({
                use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
                let mut h = HeaderMap::new();
                h.insert(
                    ACCEPT,
                    HeaderValue::from_static("image/avif,image/webp,image/*;q=0.8,*/*;q=0.5"),
                );
                h
            })
            .build()
        {
            Ok(c) => Arc::new(c),
            Err(e) => {
                warn!("poster http client build failed: {e}");
                self.enabled = false;
                return None;
            }
        };

        let (work_tx, work_rx) = mpsc::channel::<WorkItem>();
        let (done_tx, done_rx) = mpsc::channel::<PrefetchDone>();
        let work_rx = Arc::new(Mutex::new(work_rx));
        let dir: PathBuf = poster_cache_dir();

        for _ in 0..self.workers {
            let work_rx = Arc::clone(&work_rx);
            let done_tx = done_tx.clone();
            let client = Arc::clone(&client);
            let dir = dir.clone();

            std::thread::spawn(move || loop {
                let job = match work_rx.lock() {
                    Ok(rx) => rx.recv(),
                    Err(_) => break,
                };
                let Ok((url, key)) = job else {
                    break;
                };
                let result = download_and_store_resized(
                    &client,
                    &dir,
                    &url,
                    &key,
                    RESIZE_MAX_W,
                    RESIZE_QUALITY,
                );
                if done_tx.send(PrefetchDone { url, result }).is_err() {
                    break;
                }
            });
        }

        self.work_tx = Some(work_tx.clone());
        self.done_rx = Some(done_rx);
        Some(work_tx)
    }
}
