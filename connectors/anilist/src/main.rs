//! AniList connector - main entrypoint
//!
//! Reads JSON requests line by line from stdin and answers on stdout.
//! Logs go to stderr.

#![forbid(unsafe_code)]

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anilist::{AniListConfig, AniListConnector, host};
use anyhow::{Context, Result, bail};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(config_path()?)?;
    tracing::info!(endpoint = %config.endpoint, "AniList connector starting");

    run_loop(config)
}

/// Path given with `--config <path>`, if any.
fn config_path() -> Result<Option<PathBuf>> {
    let mut args = std::env::args().skip(1);
    let mut path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args.next().context("--config needs a path")?;
                path = Some(PathBuf::from(value));
            }
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(path)
}

fn load_config(path: Option<PathBuf>) -> Result<AniListConfig> {
    let Some(path) = path else {
        return Ok(AniListConfig::default());
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn run_loop(config: AniListConfig) -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let connector = AniListConnector::new(config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = runtime.block_on(host::handle_message(&connector, &line));

        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }

    tracing::info!("stdin closed; shutting down");
    Ok(())
}
