// src/app/prefs.rs
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use std::fs;

use tracing::warn;

/// Persisted UI state. Plain `key=value` lines; unknown keys are ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct UiPrefs {
    pub search: String,
    pub poster_w: f32,
    pub detail_w: f32,
}

impl Default for UiPrefs {
    fn default() -> Self {
        Self {
            search: String::new(),
            poster_w: 180.0,
            detail_w: 420.0,
        }
    }
}

impl UiPrefs {
    pub fn parse(txt: &str) -> Self {
        let mut prefs = Self::default();
        for line in txt.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((k, v)) = line.split_once('=') else {
                continue;
            };
            let v = v.trim();
            match k.trim() {
                "search" => prefs.search = v.to_string(),
                "poster_w" => {
                    if let Ok(n) = v.parse::<f32>() {
                        prefs.poster_w = n.clamp(140.0, 260.0);
                    }
                }
                "detail_w" => {
                    if let Ok(n) = v.parse::<f32>() {
                        prefs.detail_w = n.clamp(300.0, 640.0);
                    }
                }
                _ => {}
            }
        }
        prefs
    }

    pub fn render(&self) -> String {
        format!(
            "# metrolist ui prefs\n\
             search={}\n\
             poster_w={:.1}\n\
             detail_w={:.1}\n",
            self.search.replace(['\n', '\r'], " "),
            self.poster_w,
            self.detail_w,
        )
    }

    pub fn load(path: &Path) -> Self {
        fs::read_to_string(path)
            .map(|txt| Self::parse(&txt))
            .unwrap_or_default()
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render())
    }
}

pub fn prefs_path() -> PathBuf {
    crate::app::cache::cache_dir().join("ui_prefs.txt")
}

impl crate::app::MetroApp {
    pub(crate) fn mark_dirty(&mut self) {
        self.prefs_dirty = true;
    }

    pub(crate) fn maybe_save_prefs(&mut self) {
        // debounce a bit to avoid writing every frame
        if self.prefs_dirty && self.prefs_last_write.elapsed() >= Duration::from_millis(300) {
            self.save_prefs();
            self.prefs_dirty = false;
            self.prefs_last_write = Instant::now();
        }
    }

    pub(crate) fn current_prefs(&self) -> UiPrefs {
        UiPrefs {
            search: self.search_applied.clone(),
            poster_w: self.poster_width_ui,
            detail_w: self.detail_panel_width,
        }
    }

    pub(crate) fn save_prefs(&self) {
        let Some(path) = &self.prefs_path else {
            return;
        };
        if let Err(e) = self.current_prefs().save(path) {
            warn!("failed to save prefs {}: {e}", path.display());
        }
    }
}
