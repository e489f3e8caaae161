//! Core application state for the zdetach TUI.
//!
//! This module defines the data structures shared by the event, logic, and
//! UI layers: the reconciled package rows, the operator's pending selection,
//! the loading state machine that gates interaction, and the central
//! [`AppState`] container mutated by the single-threaded control flow.
use std::collections::{BTreeSet, HashSet, VecDeque};

use ratatui::widgets::ListState;

/// Upper bound on retained notices; older ones fall off the front.
const NOTICE_CAP: usize = 8;

/// One row of the reconciled package view.
///
/// Exactly one entry exists per distinct package identifier across the
/// installed list and the detached snapshot. Entries are fixed at
/// reconciliation time; only the [`SelectionState`] changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayEntry {
    /// Package identifier (trimmed, non-empty).
    pub name: String,
    /// Whether the helper reported this package detached at load time.
    pub initially_detached: bool,
    /// Detached per the snapshot but no longer installed.
    pub orphaned: bool,
}

/// The operator's pending target membership for the detach list.
///
/// Owned by the session and mutated only through [`SelectionState::toggle`];
/// ids outside the current entry collection are rejected, so the selection
/// is always a subset of the known rows. Membership is kept in a `BTreeSet`
/// so [`SelectionState::snapshot`] is lexicographic and deterministic.
#[derive(Clone, Debug, Default)]
pub struct SelectionState {
    known: HashSet<String>,
    selected: BTreeSet<String>,
}

impl SelectionState {
    /// Build a selection seeded with every initially-detached entry.
    pub fn seed(entries: &[DisplayEntry]) -> Self {
        let mut s = Self {
            known: entries.iter().map(|e| e.name.clone()).collect(),
            selected: BTreeSet::new(),
        };
        for e in entries {
            if e.initially_detached {
                s.selected.insert(e.name.clone());
            }
        }
        s
    }

    /// Set or clear membership for `id`.
    ///
    /// Returns `false` (and changes nothing) when `id` is not part of the
    /// current entry collection; a stale toggle racing a reload lands here.
    pub fn toggle(&mut self, id: &str, included: bool) -> bool {
        if !self.known.contains(id) {
            return false;
        }
        if included {
            self.selected.insert(id.to_string());
        } else {
            self.selected.remove(id);
        }
        true
    }

    /// Whether `id` is currently part of the pending membership.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Current membership, lexicographically ordered.
    pub fn snapshot(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Session lifecycle gate for interactive controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadingState {
    /// Before the first load begins.
    Idle,
    /// Enumerating packages and reading the snapshot.
    Loading,
    /// Interactive; toggles, search, reload, and commit are available.
    Ready,
    /// A commit is in flight; controls are disabled until it resolves.
    Committing,
    /// Fatal load failure; terminal for this session.
    Error,
}

impl LoadingState {
    /// Whether operator input besides quitting is accepted.
    pub fn interactive(self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Whether an external round trip is in flight.
    pub fn busy(self) -> bool {
        matches!(self, Self::Loading | Self::Committing)
    }
}

/// Severity of an operator-facing notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Routine confirmation.
    Info,
    /// Degraded but continuing.
    Warn,
    /// Operation failed.
    Error,
}

/// A short transient message shown in the footer, the toast equivalent.
#[derive(Clone, Debug)]
pub struct Notice {
    /// Message text.
    pub text: String,
    /// Severity, which drives the footer color.
    pub level: NoticeLevel,
}

/// Central mutable state for one session.
#[derive(Debug, Default)]
pub struct AppState {
    /// Raw search input as typed (pre-debounce).
    pub input: String,
    /// Last query actually applied to the view (normalized).
    pub query: String,
    /// Reconciled rows, fixed for the session; index is row identity.
    pub entries: Vec<DisplayEntry>,
    /// Display order over all entries (indices into `entries`).
    pub order: Vec<usize>,
    /// Visible subset of `order` after the query filter.
    pub view: Vec<usize>,
    /// Pending target membership.
    pub selection: SelectionState,
    /// Lifecycle gate.
    pub loading: LoadingState,
    /// Cursor state for the package list widget.
    pub list_state: ListState,
    /// Recent notices, newest at the back.
    pub notices: VecDeque<Notice>,
    /// A non-empty query currently matches zero entries.
    pub no_match: bool,
    /// Show commit commands instead of executing them.
    pub dry_run: bool,
    /// Monotonic frame counter driving the busy spinner.
    pub spinner_frame: usize,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self::Idle
    }
}

impl AppState {
    /// Append a notice, dropping the oldest past the retention cap.
    pub fn push_notice(&mut self, level: NoticeLevel, text: impl Into<String>) {
        let text = text.into();
        match level {
            NoticeLevel::Info => tracing::info!("{text}"),
            NoticeLevel::Warn => tracing::warn!("{text}"),
            NoticeLevel::Error => tracing::error!("{text}"),
        }
        self.notices.push_back(Notice { text, level });
        while self.notices.len() > NOTICE_CAP {
            self.notices.pop_front();
        }
    }

    /// Most recent notice, if any.
    pub fn latest_notice(&self) -> Option<&Notice> {
        self.notices.back()
    }

    /// Entry index under the cursor, honoring the filtered view.
    pub fn current_entry(&self) -> Option<usize> {
        self.list_state
            .selected()
            .and_then(|row| self.view.get(row).copied())
    }
}
