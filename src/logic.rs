//! Synchronous interaction logic: filtering, ordering, toggles, and the
//! loading-state transitions driven by load/commit outcomes.
//!
//! Everything here mutates [`AppState`] in place and performs no I/O; the
//! runtime owns the external round trips and feeds their results back in
//! through [`apply_load_outcome`] and [`apply_commit_outcome`]. Failures
//! never touch the entry collection or the selection: a failed commit
//! leaves both exactly as they were.
use crate::app::LoadOutcome;
use crate::detach::CommitOutcome;
use crate::state::{AppState, LoadingState, NoticeLevel, SelectionState};

/// Normalize raw input into the applied query form.
pub fn normalized_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Recompute the visible rows from the display order and the applied query.
///
/// Case-insensitive substring match; hiding is a view concern only, the
/// entry collection and selection are untouched. Sets the no-match flag
/// that drives the placeholder row.
pub fn rebuild_view(app: &mut AppState) {
    if app.query.is_empty() {
        app.view = app.order.clone();
    } else {
        app.view = app
            .order
            .iter()
            .copied()
            .filter(|&i| app.entries[i].name.to_lowercase().contains(&app.query))
            .collect();
    }
    app.no_match = !app.query.is_empty() && app.view.is_empty();
    clamp_cursor(app);
}

/// Keep the cursor inside the visible rows after a view change.
fn clamp_cursor(app: &mut AppState) {
    if app.view.is_empty() {
        app.list_state.select(None);
    } else {
        let row = app
            .list_state
            .selected()
            .unwrap_or(0)
            .min(app.view.len() - 1);
        app.list_state.select(Some(row));
    }
}

/// Re-sort the display order: selected entries first, then the rest, each
/// group alphabetical ignoring case. Purely presentational; identity,
/// selection, and commit input are unaffected.
pub fn sort_order(app: &mut AppState) {
    let entries = &app.entries;
    let selection = &app.selection;
    app.order.sort_by(|&a, &b| {
        let sa = selection.is_selected(&entries[a].name);
        let sb = selection.is_selected(&entries[b].name);
        sb.cmp(&sa).then_with(|| {
            entries[a]
                .name
                .to_lowercase()
                .cmp(&entries[b].name.to_lowercase())
        })
    });
    rebuild_view(app);
}

/// Apply a debounced query value.
///
/// An emptied query also re-sorts, so clearing a search restores the
/// selected-first ordering in one step.
pub fn apply_filter(app: &mut AppState, raw_query: &str) {
    app.query = normalized_query(raw_query);
    if app.query.is_empty() {
        sort_order(app);
    } else {
        rebuild_view(app);
    }
}

/// Move the list cursor by `delta` within the visible rows.
pub fn move_cursor(app: &mut AppState, delta: isize) {
    if app.view.is_empty() {
        app.list_state.select(None);
        return;
    }
    let len = app.view.len() as isize;
    let cur = app.list_state.selected().unwrap_or(0) as isize;
    let next = (cur + delta).clamp(0, len - 1);
    app.list_state.select(Some(next as usize));
}

/// Toggle the checkbox under the cursor and re-sort, keeping the cursor on
/// the toggled entry.
pub fn toggle_current(app: &mut AppState) {
    let Some(idx) = app.current_entry() else {
        return;
    };
    let name = app.entries[idx].name.clone();
    let include = !app.selection.is_selected(&name);
    if !app.selection.toggle(&name, include) {
        return;
    }
    sort_order(app);
    if let Some(row) = app.view.iter().position(|&i| i == idx) {
        app.list_state.select(Some(row));
    }
}

/// Fold a finished load into the session.
///
/// Success replaces the entry collection, reseeds the selection from the
/// initially-detached rows, surfaces any warnings, and opens the session
/// (`Ready`). Failure is terminal: no entries exist and the state machine
/// parks in `Error` until a full restart.
pub fn apply_load_outcome(app: &mut AppState, outcome: Result<LoadOutcome, Vec<String>>) {
    match outcome {
        Ok(loaded) => {
            app.selection = SelectionState::seed(&loaded.entries);
            app.entries = loaded.entries;
            app.order = (0..app.entries.len()).collect();
            app.input.clear();
            app.query.clear();
            app.no_match = false;
            for w in loaded.warnings {
                app.push_notice(NoticeLevel::Warn, w);
            }
            app.loading = LoadingState::Ready;
            sort_order(app);
            app.list_state
                .select(if app.view.is_empty() { None } else { Some(0) });
        }
        Err(messages) => {
            app.entries.clear();
            app.order.clear();
            app.view.clear();
            app.selection = SelectionState::default();
            app.list_state.select(None);
            for m in messages {
                app.push_notice(NoticeLevel::Error, m);
            }
            app.loading = LoadingState::Error;
        }
    }
}

/// Fold a finished commit into the session.
///
/// Control always returns to the operator: success and failure both land
/// in `Ready`, a failed commit just adds a visible error. The selection is
/// never modified here.
pub fn apply_commit_outcome(app: &mut AppState, outcome: Result<CommitOutcome, String>) {
    app.loading = LoadingState::Ready;
    match outcome {
        Ok(CommitOutcome::Reset) => app.push_notice(NoticeLevel::Info, "Detach list reset."),
        Ok(CommitOutcome::Applied(_)) => {
            app.push_notice(NoticeLevel::Info, "Detach list updated.");
        }
        Ok(CommitOutcome::DryRun(cmd)) => {
            app.push_notice(NoticeLevel::Info, format!("DRY RUN: {cmd}"));
        }
        Err(notice) => app.push_notice(NoticeLevel::Error, notice),
    }
}
