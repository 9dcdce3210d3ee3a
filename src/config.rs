use std::{fs, path::Path, path::PathBuf};

use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::{info, warn};

pub const CONFIG_FILE: &str = "config.json";
pub const LOCAL_FEED_FILE: &str = "./data/films.json";
pub const ROOT_FEED_FILE: &str = "data/films.json";
pub const BACKUP_FEED_FILE: &str = "./scraper/metrograph_movies.json";
pub const REMOTE_FEED_URL: &str = "https://movieserver-g46f.onrender.com";
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_MOBILE_BREAKPOINT: f32 = 1000.0;

/// Directory holding the running executable; falls back to the working directory.
static APP_ROOT: Lazy<PathBuf> = Lazy::new(|| {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
});

pub fn app_root() -> &'static Path {
    APP_ROOT.as_path()
}

/// Resolve `rel` against the executable's directory (absolute paths pass through).
pub fn resolve_relative_path(rel: &str) -> PathBuf {
    let p = PathBuf::from(rel);
    if p.is_absolute() {
        p
    } else {
        app_root().join(p)
    }
}

/// The four places the feed is looked for, in the order they are tried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedLocations {
    pub local: PathBuf,
    pub absolute: PathBuf,
    pub backup: PathBuf,
    pub remote: String,
}

impl Default for FeedLocations {
    fn default() -> Self {
        Self {
            local: PathBuf::from(LOCAL_FEED_FILE),
            absolute: resolve_relative_path(ROOT_FEED_FILE),
            backup: PathBuf::from(BACKUP_FEED_FILE),
            remote: REMOTE_FEED_URL.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub cache_dir: Option<String>,
    pub feed: FeedLocations,
    pub remote_timeout_secs: u64,
    pub deploy_hook: Option<String>,
    pub deploy_feed_path: PathBuf,
    pub mobile_breakpoint: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            feed: FeedLocations::default(),
            remote_timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
            deploy_hook: None,
            deploy_feed_path: PathBuf::from(BACKUP_FEED_FILE),
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    cache_dir: Option<String>,
    feed_local_path: Option<String>,
    feed_absolute_path: Option<String>,
    feed_backup_path: Option<String>,
    #[serde(alias = "remote_url")]
    feed_remote_url: Option<String>,
    remote_timeout_secs: Option<u64>,
    #[serde(alias = "render_deploy_hook")]
    deploy_hook: Option<String>,
    deploy_feed_path: Option<String>,
    mobile_breakpoint: Option<f32>,
}

pub fn load_config() -> AppConfig {
    load_config_from(Path::new(CONFIG_FILE))
}

pub fn load_config_from(cfg_path: &Path) -> AppConfig {
    match fs::read_to_string(cfg_path) {
        Ok(raw) => match serde_json::from_str::<RawConfig>(&raw) {
            Ok(parsed) => {
                info!("Loaded config from {}", cfg_path.display());
                merge_config(parsed, &raw)
            }
            Err(err) => {
                warn!("Failed to parse {} ({}). Using defaults.", cfg_path.display(), err);
                AppConfig::default()
            }
        },
        Err(_) => {
            info!("No {} found; using defaults", cfg_path.display());
            AppConfig::default()
        }
    }
}

fn merge_config(parsed: RawConfig, raw: &str) -> AppConfig {
    let mut cfg = AppConfig::default();

    if parsed.cache_dir.is_some() {
        cfg.cache_dir = parsed.cache_dir;
    }
    if let Some(p) = non_empty(parsed.feed_local_path) {
        cfg.feed.local = PathBuf::from(p);
    }
    if let Some(p) = non_empty(parsed.feed_absolute_path) {
        cfg.feed.absolute = resolve_relative_path(&p);
    }
    if let Some(p) = non_empty(parsed.feed_backup_path) {
        cfg.feed.backup = PathBuf::from(p);
    }
    if let Some(url) = non_empty(parsed.feed_remote_url) {
        if url.starts_with("http://") || url.starts_with("https://") {
            cfg.feed.remote = url;
            if raw.contains("\"remote_url\"") {
                warn!("`remote_url` is deprecated; rename it to `feed_remote_url` in config.json.");
            }
        } else {
            warn!("Ignoring feed_remote_url `{url}` in config.json: not an http(s) URL.");
        }
    }
    if let Some(secs) = parsed.remote_timeout_secs {
        cfg.remote_timeout_secs = secs.clamp(1, 300);
    }
    if let Some(hook) = non_empty(parsed.deploy_hook) {
        cfg.deploy_hook = Some(hook);
    }
    if let Some(p) = non_empty(parsed.deploy_feed_path) {
        cfg.deploy_feed_path = PathBuf::from(p);
    }
    if let Some(bp) = parsed.mobile_breakpoint {
        if bp.is_finite() && bp > 0.0 {
            cfg.mobile_breakpoint = bp;
        } else {
            warn!("Invalid mobile_breakpoint {bp} in config.json; keeping {DEFAULT_MOBILE_BREAKPOINT}.");
        }
    }

    cfg
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
