//! Deploy helpers behind the `deploy_hook` binary.
//!
//! `--render` POSTs to a Render.com deploy hook so the hosted feed is rebuilt;
//! `--custom` only validates the scraped feed file and reports its size.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::app::data::parse_feed;
use crate::config::AppConfig;

pub const DEPLOY_HOOK_ENV: &str = "RENDER_DEPLOY_HOOK";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeployTarget {
    Render,
    Custom,
}

impl DeployTarget {
    /// `--render` wins when both flags are present.
    pub fn from_args<I, S>(args: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut custom = false;
        for arg in args {
            match arg.as_ref() {
                "--render" => return Some(Self::Render),
                "--custom" => custom = true,
                _ => {}
            }
        }
        custom.then_some(Self::Custom)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("feed file not found: {}", .0.display())]
    MissingFeed(PathBuf),
    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no deploy hook configured; set RENDER_DEPLOY_HOOK or `deploy_hook` in config.json")]
    NoHook,
    #[error("POST {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("deploy hook answered HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

pub fn usage() -> &'static str {
    "Choose a deploy target:\n  \
     --render   trigger the Render.com deploy hook\n  \
     --custom   validate the feed for upload to your own server\n\n\
     e.g. deploy_hook --render"
}

/// Env var beats config; blank values count as unset.
pub fn resolve_hook(env_value: Option<String>, cfg: &AppConfig) -> Result<String, DeployError> {
    env_value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| cfg.deploy_hook.clone())
        .ok_or(DeployError::NoHook)
}

/// Hook URLs carry their secret in the query string; keep it out of logs.
pub fn redact_hook(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => format!("{base}?…"),
        None => url.to_string(),
    }
}

pub fn ensure_feed(path: &Path) -> Result<(), DeployError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(DeployError::MissingFeed(path.to_path_buf()))
    }
}

/// Number of movies in the feed file.
pub fn summarize_feed(path: &Path) -> Result<usize, DeployError> {
    ensure_feed(path)?;
    let bytes = fs::read(path).map_err(|source| DeployError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let movies = parse_feed(&bytes).map_err(|source| DeployError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(movies.len())
}

pub fn build_client(timeout: Duration) -> Result<Client, DeployError> {
    Client::builder()
        .user_agent("metrolist/deploy")
        .timeout(timeout)
        .build()
        .map_err(|source| DeployError::Http {
            url: String::from("<client>"),
            source,
        })
}

/// POST to the hook. Any 2xx is success; otherwise the body comes back in the error.
pub fn trigger_deploy_hook(client: &Client, url: &str) -> Result<u16, DeployError> {
    let http = |source| DeployError::Http {
        url: redact_hook(url),
        source,
    };
    let resp = client.post(url).send().map_err(http)?;
    let status = resp.status();
    debug!("deploy hook status {status}");
    if status.is_success() {
        return Ok(status.as_u16());
    }
    let body = resp.text().unwrap_or_default();
    Err(DeployError::Rejected {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_http::serve_once;

    fn hook_url(status_line: &'static str, body: &'static str) -> String {
        format!("{}/deploy/srv-test?key=secret", serve_once(status_line, body))
    }

    #[test]
    fn parses_mode_flags() {
        assert_eq!(DeployTarget::from_args(["--render"]), Some(DeployTarget::Render));
        assert_eq!(DeployTarget::from_args(["x", "--custom"]), Some(DeployTarget::Custom));
        assert_eq!(
            DeployTarget::from_args(["--custom", "--render"]),
            Some(DeployTarget::Render)
        );
        assert_eq!(DeployTarget::from_args(Vec::<String>::new()), None);
        assert_eq!(DeployTarget::from_args(["--verbose"]), None);
    }

    #[test]
    fn env_hook_overrides_config() {
        let cfg = AppConfig {
            deploy_hook: Some("https://api.render.com/deploy/srv-cfg?key=a".into()),
            ..AppConfig::default()
        };
        assert_eq!(
            resolve_hook(Some("https://api.render.com/deploy/srv-env?key=b".into()), &cfg).unwrap(),
            "https://api.render.com/deploy/srv-env?key=b"
        );
        assert_eq!(
            resolve_hook(Some("  ".into()), &cfg).unwrap(),
            "https://api.render.com/deploy/srv-cfg?key=a"
        );
    }

    #[test]
    fn missing_hook_is_an_error() {
        let err = resolve_hook(Some(String::new()), &AppConfig::default()).unwrap_err();
        assert!(matches!(err, DeployError::NoHook));
        assert!(err.to_string().contains("RENDER_DEPLOY_HOOK"));
        assert!(matches!(resolve_hook(None, &AppConfig::default()), Err(DeployError::NoHook)));
    }

    #[test]
    fn redacts_hook_secret() {
        assert_eq!(
            redact_hook("https://api.render.com/deploy/srv-1?key=abc"),
            "https://api.render.com/deploy/srv-1?…"
        );
        assert_eq!(redact_hook("https://hooks.example/x"), "https://hooks.example/x");
    }

    #[test]
    fn summarizes_feed_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("metrograph_movies.json");
        assert!(matches!(summarize_feed(&p), Err(DeployError::MissingFeed(_))));

        fs::write(&p, r#"[{"title": "A"}, {"title": "B"}]"#).unwrap();
        assert_eq!(summarize_feed(&p).unwrap(), 2);

        fs::write(&p, "not json").unwrap();
        assert!(matches!(summarize_feed(&p), Err(DeployError::Parse { .. })));
    }

    #[test]
    fn hook_success_on_2xx() {
        let url = hook_url("202 Accepted", "");
        let client = build_client(Duration::from_secs(5)).unwrap();
        assert_eq!(trigger_deploy_hook(&client, &url).unwrap(), 202);
    }

    #[test]
    fn hook_failure_carries_body() {
        let url = hook_url("401 Unauthorized", "bad key");
        let client = build_client(Duration::from_secs(5)).unwrap();
        match trigger_deploy_hook(&client, &url) {
            Err(DeployError::Rejected { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad key");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }
}
