use std::env;
use std::process::ExitCode;
use std::time::Duration;

use metrolist::config::load_config;
use metrolist::deploy::{
    build_client, ensure_feed, redact_hook, resolve_hook, summarize_feed, trigger_deploy_hook,
    usage, DeployTarget, DEPLOY_HOOK_ENV,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    info!("===== Metrograph feed deploy tool =====");

    let cfg = load_config();
    let feed_path = cfg.deploy_feed_path.clone();

    if let Err(e) = ensure_feed(&feed_path) {
        error!("{e}");
        error!("Run the scraper first to produce the feed JSON.");
        return ExitCode::FAILURE;
    }

    match DeployTarget::from_args(env::args().skip(1)) {
        Some(DeployTarget::Render) => {
            let hook = match resolve_hook(env::var(DEPLOY_HOOK_ENV).ok(), &cfg) {
                Ok(hook) => hook,
                Err(e) => {
                    error!("{e}");
                    return ExitCode::FAILURE;
                }
            };
            info!("Triggering deploy via {}", redact_hook(&hook));
            let client = match build_client(Duration::from_secs(cfg.remote_timeout_secs)) {
                Ok(c) => c,
                Err(e) => {
                    error!("{e}");
                    return ExitCode::FAILURE;
                }
            };
            match trigger_deploy_hook(&client, &hook) {
                Ok(status) => {
                    info!("Deploy triggered (HTTP {status}); the rebuild may take a few minutes.");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!("Deploy failed: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Some(DeployTarget::Custom) => match summarize_feed(&feed_path) {
            Ok(count) => {
                info!("Read {count} movies from {}", feed_path.display());
                info!("No upload target is wired up; copy the file to your server (scp, S3, or an API POST).");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Reading or parsing the feed failed: {e}");
                ExitCode::FAILURE
            }
        },
        None => {
            println!("{}", usage());
            ExitCode::SUCCESS
        }
    }
}
