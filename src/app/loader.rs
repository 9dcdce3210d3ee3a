// src/app/loader.rs
//! Sequential fallback fetch of the movie feed.
//!
//! Sources are tried strictly in order on one background thread; the first one
//! that answers successfully *and* parses wins. Results reach the UI through an
//! mpsc channel that the list view drains once per frame.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Duration;
use std::{fs, io};

use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use super::data::{parse_feed, Movie};
use crate::config::FeedLocations;

pub const LOAD_FAILED_MESSAGE: &str = "Unable to load movie data, please try again later.";

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("GET {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("all {attempts} feed sources failed")]
    Exhausted { attempts: usize },
    #[error("feed load cancelled")]
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedSource {
    File(PathBuf),
    Remote(String),
}

impl FeedSource {
    pub fn label(&self) -> String {
        match self {
            Self::File(p) => p.display().to_string(),
            Self::Remote(url) => url.clone(),
        }
    }

    fn fetch(&self, client: &mut LazyClient) -> Result<Vec<u8>, FeedError> {
        match self {
            Self::File(path) => fs::read(path).map_err(|source| FeedError::Io {
                path: path.clone(),
                source,
            }),
            Self::Remote(url) => {
                let http = |source| FeedError::Http {
                    url: url.clone(),
                    source,
                };
                let resp = client.get()?.get(url).send().map_err(http)?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(FeedError::Status {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                Ok(resp.bytes().map_err(http)?.to_vec())
            }
        }
    }
}

/// Relative, absolute, backup, then remote.
pub fn default_sources(feed: &FeedLocations) -> Vec<FeedSource> {
    vec![
        FeedSource::File(feed.local.clone()),
        FeedSource::File(feed.absolute.clone()),
        FeedSource::File(feed.backup.clone()),
        FeedSource::Remote(feed.remote.clone()),
    ]
}

/// HTTP client built on first use, so file-only chains never touch TLS setup.
struct LazyClient {
    timeout: Duration,
    client: Option<Client>,
}

impl LazyClient {
    fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: None,
        }
    }

    fn get(&mut self) -> Result<&Client, FeedError> {
        let client = match self.client.take() {
            Some(c) => c,
            None => Client::builder()
                .user_agent("metrolist/feed")
                .timeout(self.timeout)
                .build()
                .map_err(|source| FeedError::Http {
                    url: String::from("<client>"),
                    source,
                })?,
        };
        Ok(self.client.insert(client))
    }
}

#[derive(Debug)]
pub struct LoadedFeed {
    pub movies: Vec<Movie>,
    pub source_index: usize,
    pub source_label: String,
}

/// Walk `sources` in order and return the first one that fetches and parses.
///
/// `cancel` is checked before every attempt; `on_info` receives progress lines.
pub fn load_first_available<F>(
    sources: &[FeedSource],
    timeout: Duration,
    cancel: &AtomicBool,
    mut on_info: F,
) -> Result<LoadedFeed, FeedError>
where
    F: FnMut(String),
{
    let mut client = LazyClient::new(timeout);

    for (idx, source) in sources.iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            return Err(FeedError::Cancelled);
        }
        let label = source.label();
        on_info(format!("Loading movies from {label}…"));

        let attempt = source.fetch(&mut client).and_then(|bytes| {
            parse_feed(&bytes).map_err(|source| FeedError::Parse {
                origin: label.clone(),
                source,
            })
        });

        match attempt {
            Ok(movies) => {
                info!("loaded {} movies from {label}", movies.len());
                return Ok(LoadedFeed {
                    movies,
                    source_index: idx,
                    source_label: label,
                });
            }
            Err(e) => {
                warn!("feed source {} of {} failed: {e}", idx + 1, sources.len());
            }
        }
    }

    Err(FeedError::Exhausted {
        attempts: sources.len(),
    })
}

pub enum LoadMsg {
    Info(String),
    Done(LoadedFeed),
    Error(String),
}

/// Handle to a running background load. Dropping it cancels the chain and
/// disconnects the channel so a late result is never delivered.
pub struct FeedLoader {
    rx: Receiver<LoadMsg>,
    cancel: Arc<AtomicBool>,
}

impl FeedLoader {
    pub fn spawn(sources: Vec<FeedSource>, timeout: Duration) -> Self {
        let (tx, rx) = mpsc::channel::<LoadMsg>();
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);

        std::thread::spawn(move || {
            let result = load_first_available(&sources, timeout, &flag, |line| {
                let _ = tx.send(LoadMsg::Info(line));
            });
            let msg = match result {
                Ok(feed) => LoadMsg::Done(feed),
                Err(FeedError::Cancelled) => {
                    debug!("feed load cancelled before completion");
                    return;
                }
                Err(e) => {
                    warn!("movie feed unavailable: {e}");
                    LoadMsg::Error(LOAD_FAILED_MESSAGE.to_string())
                }
            };
            if tx.send(msg).is_err() {
                debug!("feed result dropped; list view already gone");
            }
        });

        Self { rx, cancel }
    }

    /// Next pending message, if any. A vanished worker reports as an error.
    pub fn try_recv(&self) -> Option<LoadMsg> {
        match self.rx.try_recv() {
            Ok(msg) => Some(msg),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(LoadMsg::Error(LOAD_FAILED_MESSAGE.to_string())),
        }
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

impl Drop for FeedLoader {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_http::serve_once;

    const FEED: &str = r#"[{"id": "1", "title": "Stalker", "screenings": []}]"#;

    fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let p = dir.path().join(name);
        fs::write(&p, body).unwrap();
        p
    }

    fn run(sources: &[FeedSource]) -> Result<LoadedFeed, FeedError> {
        let cancel = AtomicBool::new(false);
        load_first_available(sources, Duration::from_secs(2), &cancel, |_| {})
    }

    #[test]
    fn first_readable_source_wins() {
        let dir = tempfile::tempdir().unwrap();
        let backup = write(&dir, "backup.json", FEED);
        let sources = vec![
            FeedSource::File(dir.path().join("missing.json")),
            FeedSource::File(dir.path().join("also_missing.json")),
            FeedSource::File(backup),
            FeedSource::Remote("http://127.0.0.1:9/never-reached".into()),
        ];
        let feed = run(&sources).unwrap();
        assert_eq!(feed.source_index, 2);
        assert_eq!(feed.movies[0].title(), "Stalker");
    }

    #[test]
    fn unparseable_source_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let broken = write(&dir, "broken.json", "<!doctype html>");
        let good = write(&dir, "good.json", FEED);
        let feed = run(&[FeedSource::File(broken), FeedSource::File(good)]).unwrap();
        assert_eq!(feed.source_index, 1);
    }

    #[test]
    fn short_circuits_on_first_success() {
        let dir = tempfile::tempdir().unwrap();
        let first = write(&dir, "first.json", "[]");
        let second = write(&dir, "second.json", FEED);
        let mut seen = Vec::new();
        let cancel = AtomicBool::new(false);
        let feed = load_first_available(
            &[FeedSource::File(first), FeedSource::File(second)],
            Duration::from_secs(1),
            &cancel,
            |line| seen.push(line),
        )
        .unwrap();
        assert!(feed.movies.is_empty());
        assert_eq!(feed.source_index, 0);
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn exhaustion_reports_attempt_count() {
        let dir = tempfile::tempdir().unwrap();
        let sources = vec![
            FeedSource::File(dir.path().join("a.json")),
            FeedSource::File(dir.path().join("b.json")),
            FeedSource::File(dir.path().join("c.json")),
            FeedSource::Remote("http://127.0.0.1:9/films".into()),
        ];
        match run(&sources) {
            Err(FeedError::Exhausted { attempts }) => assert_eq!(attempts, 4),
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn cancelled_before_first_attempt() {
        let cancel = AtomicBool::new(true);
        let res = load_first_available(
            &[FeedSource::File(PathBuf::from("unused.json"))],
            Duration::from_secs(1),
            &cancel,
            |_| {},
        );
        assert!(matches!(res, Err(FeedError::Cancelled)));
    }

    #[test]
    fn default_order_is_local_absolute_backup_remote() {
        let feed = FeedLocations::default();
        let sources = default_sources(&feed);
        assert_eq!(sources.len(), 4);
        assert_eq!(sources[0], FeedSource::File(feed.local.clone()));
        assert_eq!(sources[1], FeedSource::File(feed.absolute.clone()));
        assert_eq!(sources[2], FeedSource::File(feed.backup.clone()));
        assert_eq!(sources[3], FeedSource::Remote(feed.remote.clone()));
    }

    #[test]
    fn remote_wins_after_file_misses() {
        let dir = tempfile::tempdir().unwrap();
        let base = serve_once("200 OK", FEED);
        let sources = vec![
            FeedSource::File(dir.path().join("films.json")),
            FeedSource::Remote(format!("{base}/")),
        ];
        let feed = run(&sources).unwrap();
        assert_eq!(feed.source_index, 1);
        assert_eq!(feed.source_label, format!("{base}/"));
        assert_eq!(feed.movies[0].title(), "Stalker");
    }

    #[test]
    fn remote_server_error_is_a_status_failure() {
        let base = serve_once("500 Internal Server Error", "boom");
        let mut client = LazyClient::new(Duration::from_secs(2));
        match FeedSource::Remote(format!("{base}/")).fetch(&mut client) {
            Err(FeedError::Status { status, .. }) => assert_eq!(status, 500),
            other => panic!("expected a status error, got {other:?}"),
        }

        let base = serve_once("500 Internal Server Error", FEED);
        match run(&[FeedSource::Remote(format!("{base}/"))]) {
            Err(FeedError::Exhausted { attempts }) => assert_eq!(attempts, 1),
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn remote_html_body_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let base = serve_once("200 OK", "<!doctype html><title>Render</title>");
        let backup = write(&dir, "metrograph_movies.json", FEED);
        let feed = run(&[
            FeedSource::Remote(format!("{base}/")),
            FeedSource::File(backup),
        ])
        .unwrap();
        assert_eq!(feed.source_index, 1);
    }

    #[test]
    fn background_loader_delivers_result() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(&dir, "films.json", FEED);
        let loader = FeedLoader::spawn(vec![FeedSource::File(good)], Duration::from_secs(1));
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        loop {
            match loader.try_recv() {
                Some(LoadMsg::Done(feed)) => {
                    assert_eq!(feed.movies.len(), 1);
                    break;
                }
                Some(LoadMsg::Error(e)) => panic!("unexpected error: {e}"),
                Some(LoadMsg::Info(_)) | None => {
                    assert!(std::time::Instant::now() < deadline, "loader timed out");
                    std::thread::sleep(Duration::from_millis(10));
                }
            }
        }
    }
}
