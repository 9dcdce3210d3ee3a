use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use image::{imageops::FilterType, DynamicImage, GenericImageView};
use reqwest::blocking::Client;
use tracing::warn;

use crate::config::{load_config, resolve_relative_path};

// Chosen once on first call
use std::sync::{Once, OnceLock};
static CACHE_DIR_ONCE: OnceLock<PathBuf> = OnceLock::new();
static POSTER_DIR_ONCE: OnceLock<PathBuf> = OnceLock::new();
static POSTER_PRUNE_ONCE: Once = Once::new();

const POSTER_RETENTION_DAYS: u64 = 14;
const POSTER_RETENTION_SECS: u64 = POSTER_RETENTION_DAYS * 24 * 60 * 60;
const POSTER_EXTS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

pub fn cache_dir() -> PathBuf {
    CACHE_DIR_ONCE
        .get_or_init(|| {
            let cfg = load_config();
            let mut path = cfg
                .cache_dir
                .map(PathBuf::from)
                .unwrap_or_else(|| resolve_relative_path(".metrolist_cache"));

            if let Err(e) = fs::create_dir_all(&path) {
                warn!("failed to create cache dir {}: {e}", path.display());
                path = PathBuf::from(".metrolist_cache");
                let _ = fs::create_dir_all(&path);
            }
            path
        })
        .clone()
}

pub fn poster_cache_dir() -> PathBuf {
    let dir = POSTER_DIR_ONCE.get_or_init(|| {
        let mut path = cache_dir().join("posters");
        if let Err(e) = fs::create_dir_all(&path) {
            warn!("failed to create poster cache dir {}: {e}", path.display());
            path = cache_dir();
        }
        path
    });

    POSTER_PRUNE_ONCE.call_once({
        let path = dir.clone();
        move || {
            if let Err(err) = prune_poster_cache_in_dir(&path, SystemTime::now()) {
                warn!("poster cache prune failed: {err}");
            }
        }
    });

    dir.clone()
}

/// Remove poster files last modified before `now - 14 days`. Returns how many went.
pub fn prune_poster_cache_in_dir(dir: &Path, now: SystemTime) -> std::io::Result<usize> {
    let cutoff = now
        .checked_sub(Duration::from_secs(POSTER_RETENTION_SECS))
        .unwrap_or(SystemTime::UNIX_EPOCH);
    let mut removed = 0usize;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let is_poster = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .is_some_and(|e| POSTER_EXTS.contains(&e.as_str()) || e == "part");
        if !is_poster {
            continue;
        }
        let modified = entry.metadata()?.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        if modified < cutoff && remove_stale(&path) {
            removed += 1;
        }
    }
    Ok(removed)
}

/// True only when the file was actually deleted.
fn remove_stale(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            warn!("could not remove stale poster {}: {e}", path.display());
            false
        }
    }
}

pub fn url_to_cache_key(url: &str) -> String {
    format!("{:x}", md5::compute(url.as_bytes()))
}

/// Return (width, height, RGBA8 bytes) for a cached poster file.
pub fn load_rgba(path: &Path) -> Result<(u32, u32, Vec<u8>), String> {
    if !path.exists() {
        return Err("not found".into());
    }
    let img = image::ImageReader::open(path)
        .map_err(|e| format!("open image {}: {e}", path.display()))?
        .with_guessed_format()
        .map_err(|e| format!("guess format {}: {e}", path.display()))?
        .decode()
        .map_err(|e| format!("decode {}: {e}", path.display()))?;
    let (w, h) = img.dimensions();
    Ok((w, h, img.to_rgba8().to_vec()))
}

pub fn find_any_by_key(key: &str) -> Option<PathBuf> {
    find_in_dir(&poster_cache_dir(), key)
}

pub fn find_in_dir(dir: &Path, key: &str) -> Option<PathBuf> {
    POSTER_EXTS
        .iter()
        .map(|ext| dir.join(format!("{key}.{ext}")))
        .find(|p| p.is_file() && fs::metadata(p).map(|m| m.len() > 0).unwrap_or(false))
}

/// Shrink to `max_width` keeping aspect; smaller images pass through.
pub fn resize_to_width(img: DynamicImage, max_width: u32) -> DynamicImage {
    let (w, h) = img.dimensions();
    if w <= max_width {
        return img;
    }
    let new_h = ((h as f32) * (max_width as f32 / w as f32))
        .round()
        .max(1.0) as u32;
    img.resize_exact(max_width, new_h, FilterType::CatmullRom)
}

/// Download a poster, resize to `max_width` and store as JPEG under `dir/<key>.jpg`.
/// Reuses the caller's client for connection pooling.
pub fn download_and_store_resized(
    client: &Client,
    dir: &Path,
    url: &str,
    key: &str,
    max_width: u32,
    quality: u8,
) -> Result<PathBuf, String> {
    let dest = dir.join(format!("{key}.jpg"));
    if dest.exists() {
        return Ok(dest);
    }

    let bytes = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.bytes())
        .map_err(|e| format!("download {url}: {e}"))?;

    let img = image::load_from_memory(&bytes).map_err(|e| format!("decode {url}: {e}"))?;
    let out = resize_to_width(img, max_width);

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(out.to_rgb8());
    let mut jpeg_bytes: Vec<u8> = Vec::new();
    {
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg_bytes, quality);
        encoder
            .encode_image(&rgb)
            .map_err(|e| format!("jpeg encode: {e}"))?;
    }

    if let Some(parent) = dest.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let tmp = dest.with_extension("jpg.part");
    {
        let mut f = fs::File::create(&tmp).map_err(|e| format!("create tmp: {e}"))?;
        f.write_all(&jpeg_bytes)
            .map_err(|e| format!("write: {e}"))?;
    }
    fs::rename(&tmp, &dest).map_err(|e| format!("rename: {e}"))?;
    Ok(dest)
}
