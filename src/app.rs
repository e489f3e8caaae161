//! zdetach application runtime (terminal lifecycle, workers, event loop).
//!
//! One logical thread of control: the `select!` loop is the only place that
//! mutates [`AppState`]. External round trips (load, commit) run as spawned
//! tasks and report back over channels, so reconciliation and selection
//! logic never observe a half-finished operation. Only one commit can be in
//! flight because the `Committing` state refuses the next one until the
//! first resolves.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::{
    event::{self, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::{
    select,
    sync::mpsc,
    time::{Duration, interval},
};

use crate::channel::CommandChannel;
use crate::config::Settings;
use crate::detach::{self, CommitOutcome, Commands};
use crate::diag::DiagnosticSink;
use crate::events::{self, Action};
use crate::logic;
use crate::reconcile::{orphan_count, reconcile};
use crate::search::spawn_filter_worker;
use crate::state::{AppState, DisplayEntry, LoadingState, NoticeLevel};
use crate::ui::ui;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Result of one successful load pass.
#[derive(Clone, Debug)]
pub struct LoadOutcome {
    /// Reconciled rows for the session.
    pub entries: Vec<DisplayEntry>,
    /// Non-fatal warnings to surface (degraded snapshot, orphans).
    pub warnings: Vec<String>,
}

/// Message type carrying a finished load back to the loop.
pub type LoadResult = std::result::Result<LoadOutcome, Vec<String>>;

/// Run the whole load pipeline: enumerate, read the snapshot, reconcile.
///
/// The two reads are issued concurrently; their results are independent.
/// An enumerator failure is fatal and discards whatever the snapshot call
/// returned. A snapshot failure degrades to an empty snapshot with a
/// warning the operator must see, because committing while unaware would
/// silently clear every detached package.
pub async fn load_model<C: CommandChannel>(
    chan: &C,
    diag: &dyn DiagnosticSink,
    cmds: &Commands,
) -> LoadResult {
    let (pkgs, snap) = tokio::join!(
        detach::installed_packages(chan, diag, cmds),
        detach::detached_snapshot(chan, diag, cmds)
    );
    let installed = match pkgs {
        Ok(list) => list,
        Err(e) => return Err(vec![e.notice(), "Failed to list packages.".to_string()]),
    };
    if installed.is_empty() {
        // a real device always has packages; blank output means the helper
        // or the channel is broken, not that nothing is installed
        return Err(vec!["No packages found.".to_string()]);
    }
    let (snapshot, mut warnings) = match snap {
        Ok(list) => (list, Vec::new()),
        Err(e) => {
            tracing::warn!(error = %e, "detached snapshot unavailable");
            (
                Vec::new(),
                vec![
                    "Warning: Could not get detached list. Proceeding as if none are detached."
                        .to_string(),
                ],
            )
        }
    };
    let entries = reconcile(&installed, &snapshot);
    let orphans = orphan_count(&entries);
    if orphans > 0 {
        warnings.push(format!(
            "Warning: {orphans} app(s) in detach list but not installed. They will be kept in the list."
        ));
    }
    Ok(LoadOutcome { entries, warnings })
}

fn setup_terminal() -> Result<()> {
    enable_raw_mode()?;
    execute!(std::io::stdout(), EnterAlternateScreen)?;
    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(std::io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Dedicated thread pumping crossterm events into the async loop.
fn spawn_event_thread(tx: mpsc::UnboundedSender<CEvent>, cancelled: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        while !cancelled.load(Ordering::Relaxed) {
            match event::poll(std::time::Duration::from_millis(100)) {
                Ok(true) => {
                    let Ok(ev) = event::read() else { break };
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
                Ok(false) => {}
                Err(_) => break,
            }
        }
    });
}

fn begin_load<C: CommandChannel + 'static>(
    app: &mut AppState,
    chan: &Arc<C>,
    diag: &Arc<dyn DiagnosticSink>,
    cmds: &Commands,
    load_tx: &mpsc::UnboundedSender<LoadResult>,
) {
    if !matches!(app.loading, LoadingState::Idle | LoadingState::Ready) {
        return;
    }
    app.loading = LoadingState::Loading;
    let chan = Arc::clone(chan);
    let diag = Arc::clone(diag);
    let cmds = cmds.clone();
    let tx = load_tx.clone();
    tokio::spawn(async move {
        let outcome = load_model(&*chan, &*diag, &cmds).await;
        let _ = tx.send(outcome);
    });
}

fn begin_commit<C: CommandChannel + 'static>(
    app: &mut AppState,
    chan: &Arc<C>,
    diag: &Arc<dyn DiagnosticSink>,
    cmds: &Commands,
    commit_tx: &mpsc::UnboundedSender<std::result::Result<CommitOutcome, String>>,
) {
    if app.loading != LoadingState::Ready {
        return;
    }
    app.loading = LoadingState::Committing;
    let ids = app.selection.snapshot();
    let dry_run = app.dry_run;
    let chan = Arc::clone(chan);
    let diag = Arc::clone(diag);
    let cmds = cmds.clone();
    let tx = commit_tx.clone();
    tokio::spawn(async move {
        let outcome = detach::commit_selection(&*chan, &*diag, &cmds, &ids, dry_run).await;
        let _ = tx.send(outcome);
    });
}

/// Start the TUI runtime and run the main event loop until quit.
pub async fn run<C>(
    chan: Arc<C>,
    diag: Arc<dyn DiagnosticSink>,
    settings: Settings,
    dry_run: bool,
) -> Result<()>
where
    C: CommandChannel + 'static,
{
    setup_terminal()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;
    let result = event_loop(&mut terminal, chan, diag, settings, dry_run).await;
    restore_terminal()?;
    result
}

async fn event_loop<C: CommandChannel + 'static>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    chan: Arc<C>,
    diag: Arc<dyn DiagnosticSink>,
    settings: Settings,
    dry_run: bool,
) -> Result<()> {
    let cmds = Commands::from_settings(&settings);
    let mut app = AppState {
        dry_run,
        ..Default::default()
    };
    if !std::path::Path::new(&cmds.detach_bin).exists() {
        app.push_notice(
            NoticeLevel::Warn,
            format!("Warning: detach helper not found at {}.", cmds.detach_bin),
        );
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let cancelled = Arc::new(AtomicBool::new(false));
    spawn_event_thread(event_tx, Arc::clone(&cancelled));

    let (query_tx, query_rx) = mpsc::unbounded_channel();
    let (apply_tx, mut apply_rx) = mpsc::unbounded_channel();
    spawn_filter_worker(
        query_rx,
        apply_tx,
        Duration::from_millis(settings.debounce_ms),
    );

    let (load_tx, mut load_rx) = mpsc::unbounded_channel::<LoadResult>();
    let (commit_tx, mut commit_rx) =
        mpsc::unbounded_channel::<std::result::Result<CommitOutcome, String>>();

    begin_load(&mut app, &chan, &diag, &cmds, &load_tx);

    let mut ticker = interval(Duration::from_millis(150));
    loop {
        terminal.draw(|f| ui(f, &mut app))?;
        select! {
            maybe = event_rx.recv() => {
                let Some(ev) = maybe else { break };
                match events::handle_event(&mut app, &ev, &query_tx) {
                    Action::Quit => break,
                    Action::Reload => begin_load(&mut app, &chan, &diag, &cmds, &load_tx),
                    Action::Commit => begin_commit(&mut app, &chan, &diag, &cmds, &commit_tx),
                    Action::None => {}
                }
            }
            Some(q) = apply_rx.recv() => logic::apply_filter(&mut app, &q),
            Some(outcome) = load_rx.recv() => logic::apply_load_outcome(&mut app, outcome),
            Some(outcome) = commit_rx.recv() => logic::apply_commit_outcome(&mut app, outcome),
            _ = ticker.tick() => {
                if app.loading.busy() {
                    app.spinner_frame = app.spinner_frame.wrapping_add(1);
                }
            }
        }
    }
    cancelled.store(true, Ordering::Relaxed);
    Ok(())
}
