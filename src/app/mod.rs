// src/app/mod.rs: feed fetch with fallback + poster cache + list/detail layout

// ---- Standard lib imports ----
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

// ---- Crates ----
use eframe::egui as eg;
use tracing::debug;

// ---- Local modules ----
pub mod cache;
pub mod data;
pub mod detail;
pub mod expander;
pub mod filters;
pub mod gfx;
pub mod layout;
pub mod list;
pub mod loader;
pub mod prefetch;
pub mod prefs;
pub mod screenings;
pub mod types;
pub mod ui;
pub(crate) mod utils;

pub use data::{Movie, Screening, Showtime};

use crate::config::AppConfig;
use expander::ShowtimeExpander;
use layout::{LayoutMode, Subscription, ViewportSignal};
use list::FilmList;
use prefetch::PosterCache;
use prefs::UiPrefs;

// ---- Tunables ----
const LOADING_REPAINT_MS: u64 = 100;

pub struct MetroApp {
    // data
    list: FilmList,
    selected_idx: Option<usize>,
    selected: Option<Movie>,
    expander: ShowtimeExpander,
    posters: PosterCache,

    // layout
    viewport: ViewportSignal,
    layout_mode: Rc<Cell<LayoutMode>>,
    _layout_sub: Subscription,

    // navbar
    month_label: String,
    search_query: String,
    search_applied: String,

    // sizes
    poster_width_ui: f32,
    detail_panel_width: f32,

    // prefs
    prefs_path: Option<PathBuf>,
    prefs_dirty: bool,
    prefs_last_write: Instant,
}

impl MetroApp {
    /// Fetch the feed through the configured fallback chain.
    pub fn new(cfg: AppConfig) -> Self {
        Self::mount(
            &cfg,
            None,
            PosterCache::new(prefetch::WORKER_COUNT),
            Some(prefs::prefs_path()),
        )
    }

    /// Show an already loaded list; no fetch happens.
    pub fn with_movies(cfg: AppConfig, movies: Vec<Movie>) -> Self {
        Self::mount(
            &cfg,
            Some(movies),
            PosterCache::new(prefetch::WORKER_COUNT),
            Some(prefs::prefs_path()),
        )
    }

    fn mount(
        cfg: &AppConfig,
        preloaded: Option<Vec<Movie>>,
        posters: PosterCache,
        prefs_path: Option<PathBuf>,
    ) -> Self {
        let stored = prefs_path
            .as_deref()
            .map(UiPrefs::load)
            .unwrap_or_default();

        let mut viewport = ViewportSignal::new(cfg.mobile_breakpoint);
        let layout_mode = Rc::new(Cell::new(viewport.mode()));
        let sink = Rc::clone(&layout_mode);
        let layout_sub = viewport.subscribe(move |mode| {
            debug!("layout mode now {mode:?}");
            sink.set(mode);
        });

        Self {
            list: FilmList::mount(preloaded, cfg),
            selected_idx: None,
            selected: None,
            expander: ShowtimeExpander::default(),
            posters,

            viewport,
            layout_mode,
            _layout_sub: layout_sub,

            month_label: utils::current_month_label(),
            search_query: stored.search.clone(),
            search_applied: stored.search,

            poster_width_ui: stored.poster_w,
            detail_panel_width: stored.detail_w,

            prefs_path,
            prefs_dirty: false,
            prefs_last_write: Instant::now(),
        }
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.layout_mode.get()
    }

    pub fn selected(&self) -> Option<&Movie> {
        self.selected.as_ref()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_idx
    }

    /// Switch the detail pane to the card at `idx`. Another card gets a fresh,
    /// collapsed expander even when its record equals the current one.
    pub fn select_movie(&mut self, idx: usize, movie: Movie) {
        if self.selected_idx != Some(idx) {
            debug!("selected #{idx} {}", movie.title());
            self.expander = ShowtimeExpander::default();
            self.selected_idx = Some(idx);
        }
        self.selected = Some(movie);
    }

    pub fn clear_selection(&mut self) {
        self.selected_idx = None;
        self.selected = None;
    }
}

// ========== App impl ==========
impl eframe::App for MetroApp {
    fn update(&mut self, ctx: &eg::Context, _frame: &mut eframe::Frame) {
        if self.list.poll() {
            ctx.request_repaint();
        }
        if self.posters.poll() {
            ctx.request_repaint();
        }

        let width = ctx.input(|i| i.screen_rect().width());
        self.viewport.resize(width);

        eg::TopBottomPanel::top("navbar").show(ctx, |ui| self.ui_render_topbar(ui));

        if self.layout_mode() == LayoutMode::Desktop {
            self.ui_render_detail_panel(ctx);
        }

        eg::CentralPanel::default().show(ctx, |ui| self.ui_render_film_list(ui, ctx));

        self.maybe_save_prefs();

        if self.list.is_fetching() || self.posters.has_pending() {
            ctx.request_repaint_after(Duration::from_millis(LOADING_REPAINT_MS));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if self.prefs_dirty {
            self.save_prefs();
        }
    }
}

/// No poster downloads, no prefs file.
#[cfg(test)]
pub(crate) fn headless(movies: Vec<Movie>) -> MetroApp {
    MetroApp::mount(&AppConfig::default(), Some(movies), PosterCache::disabled(), None)
}
