//! zdetach binary entrypoint kept minimal. The full runtime lives in `app`.

mod app;
mod channel;
mod config;
mod detach;
mod diag;
mod events;
mod logic;
mod reconcile;
mod runner;
mod search;
mod state;
mod theme;
mod ui;
mod util;

use std::sync::{Arc, OnceLock};
use std::{fmt, time::SystemTime};

use clap::Parser;

use crate::diag::DiagnosticSink;

struct ZdetachTimer;

impl tracing_subscriber::fmt::time::FormatTime for ZdetachTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        let secs = match SystemTime::now().duration_since(std::time::UNIX_EPOCH) {
            Ok(d) => d.as_secs() as i64,
            Err(_) => 0,
        };
        w.write_str(&crate::util::epoch_to_datetime(secs))
    }
}

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Review and edit the zygisk-detach package list.
#[derive(Debug, Parser)]
#[command(name = "zdetach", version, about)]
struct Args {
    /// Show the commit command instead of executing it
    #[arg(long)]
    dry_run: bool,
    /// Alternate settings file
    #[arg(long, value_name = "PATH")]
    config: Option<std::path::PathBuf>,
    /// Override the durable diagnostic log destination
    #[arg(long, value_name = "PATH")]
    log_file: Option<std::path::PathBuf>,
    /// Override the detach helper binary path
    #[arg(long, value_name = "PATH")]
    detach_bin: Option<String>,
}

fn init_logging() {
    let mut log_path = config::logs_dir();
    log_path.push("zdetach.log");
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_timer(ZdetachTimer)
                .init();
            let _ = LOG_GUARD.set(guard);
            tracing::info!(path = %log_path.display(), "logging initialized");
        }
        Err(e) => {
            // Fallback: stderr logger so startup is never blocked on a path
            let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(true)
                .with_timer(ZdetachTimer)
                .init();
            tracing::warn!(error = %e, "failed to open log file; using stderr");
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging();

    let (mut settings, config_warn) = config::load(args.config.as_deref());
    if let Some(w) = config_warn {
        tracing::warn!("{w}");
    }
    if let Some(bin) = args.detach_bin {
        settings.detach_bin = bin;
    }
    if let Some(path) = args.log_file {
        settings.diag_log = path;
    }
    let dry_run = args.dry_run || settings.dry_run_default;

    let chan = match channel::ShellChannel::new() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "cannot construct command channel");
            eprintln!("zdetach: {e}");
            std::process::exit(1);
        }
    };
    let diag: Arc<dyn DiagnosticSink> =
        Arc::new(diag::FileDiagnostics::new(settings.diag_log.clone()));

    tracing::info!(dry_run, "zdetach starting");
    if let Err(err) = app::run(Arc::new(chan), diag, settings, dry_run).await {
        tracing::error!(error = ?err, "Application error");
    }
    tracing::info!("zdetach exited");
}
