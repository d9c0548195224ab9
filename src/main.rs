//! Entry point for the RSVP reader.
//!
//! Parses arguments, loads `conf/config.toml`, picks a word source and
//! drives one reader session on a single-threaded runtime until the reader
//! quits.

mod cli;
mod config;
mod terminal;

use crate::cli::Args;
use crate::config::{AUTH_TOKEN_ENV, AppConfig, load_config, serialize_config};
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use rsvp_core::source::{HttpWordSource, TextFileWordSource};
use rsvp_core::{
    DocumentWordSource, PlaybackSnapshot, PlaybackStatus, ReaderSession, SessionCommand,
    SessionOptions,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(&args.config);
    set_log_level(reload_handle, config.log_level.as_filter_str());
    apply_cli_overrides(&mut config, &args);
    if args.print_config {
        let text = serialize_config(&config).context("Failed to serialize configuration")?;
        print!("{text}");
        return Ok(());
    }
    let document = args
        .document
        .clone()
        .ok_or_else(|| anyhow!("Usage: rsvp-reader <document>"))?;
    info!(
        document = %document,
        local_file = args.file,
        wpm = config.initial_rate().wpm(),
        level = %config.log_level,
        "Starting RSVP reader"
    );

    // The blocking HTTP client must be built and dropped outside the runtime.
    let source: Arc<dyn DocumentWordSource> = if args.file {
        Arc::new(TextFileWordSource::new())
    } else {
        info!(api_url = %config.api_url, "Using document back end");
        if config.auth_token.is_none() {
            warn!("No auth token configured; set [backend] auth_token or {AUTH_TOKEN_ENV}");
        }
        Arc::new(
            HttpWordSource::new(
                &config.api_url,
                config.auth_token.clone(),
                config.request_timeout(),
            )
            .context("Failed to configure the document back end")?,
        )
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start the async runtime")?;
    let outcome = runtime.block_on(read_document(
        Arc::clone(&source),
        &config,
        &document,
        args.json,
    ));
    runtime.shutdown_timeout(Duration::from_secs(1));
    drop(source);

    let last = outcome?;
    info!(
        cursor = last.cursor,
        total = last.total,
        status = %last.status,
        "Reader closed"
    );
    if last.status == PlaybackStatus::Error {
        let message = last
            .error
            .map(|failure| failure.message)
            .unwrap_or_else(|| "unknown failure".to_string());
        return Err(anyhow!("Could not read {document}: {message}"));
    }
    Ok(())
}

fn apply_cli_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(api_url) = &args.api_url {
        config.api_url = api_url.clone();
    }
    if let Some(wpm) = args.wpm {
        config.initial_wpm = wpm;
    }
    config.autoplay |= args.autoplay;
}

async fn read_document(
    source: Arc<dyn DocumentWordSource>,
    config: &AppConfig,
    document: &str,
    json: bool,
) -> Result<PlaybackSnapshot> {
    let session = ReaderSession::new(
        source,
        Box::new(terminal::TerminalNavigation),
        SessionOptions {
            initial_rate: config.initial_rate(),
            pacing: config.pacing(),
            autoplay: config.autoplay,
        },
    );
    let snapshots = session.subscribe();
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let ctrlc_tx = command_tx.clone();
    ctrlc::set_handler(move || {
        let _ = ctrlc_tx.send(SessionCommand::Back);
    })
    .context("Failed to install the Ctrl-C handler")?;

    command_tx
        .send(SessionCommand::Load {
            document_id: document.to_string(),
        })
        .map_err(|_| anyhow!("Reader session closed before the document was requested"))?;
    terminal::spawn_stdin_reader(command_tx)?;
    eprintln!("{}", terminal::HELP);

    let renderer = tokio::spawn(terminal::render_snapshots(snapshots, json));
    let last = session.run(command_rx).await;
    match renderer.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!("Snapshot renderer stopped: {err:?}"),
        Err(err) => warn!("Snapshot renderer task failed: {err}"),
    }
    Ok(last)
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    warn!("Logging initialized; override level with config.log_level or RUST_LOG");
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
