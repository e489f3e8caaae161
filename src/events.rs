//! Keyboard handling for the zdetach TUI.
//!
//! Converts raw `crossterm` key events into [`AppState`] mutations and
//! returns an [`Action`] when the runtime needs to do asynchronous work
//! (reload, commit) or exit. All handling is synchronous; keystrokes feed
//! the search worker through `query_tx` and the debounced value comes back
//! to the runtime on its own channel.
//!
//! Gating follows the loading state machine: while Loading or Committing
//! every key except Ctrl+C is ignored, and after a fatal load error only
//! the quit keys work; the session is over and a restart is the only way
//! forward.
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use crate::logic::{move_cursor, toggle_current};
use crate::state::{AppState, LoadingState};

/// Asynchronous work requested by a keystroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Nothing for the runtime to do.
    None,
    /// Exit the program.
    Quit,
    /// Re-run the load pipeline.
    Reload,
    /// Commit the pending selection.
    Commit,
}

/// Handle one terminal event.
pub fn handle_event(
    app: &mut AppState,
    ev: &CEvent,
    query_tx: &mpsc::UnboundedSender<String>,
) -> Action {
    match ev {
        CEvent::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key, query_tx),
        _ => Action::None,
    }
}

fn handle_key(
    app: &mut AppState,
    key: &KeyEvent,
    query_tx: &mpsc::UnboundedSender<String>,
) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match app.loading {
        LoadingState::Ready => {}
        LoadingState::Error => {
            // terminal for this session; only leaving remains
            return match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Action::Quit,
                _ => Action::None,
            };
        }
        _ => return Action::None,
    }

    if ctrl {
        return match key.code {
            KeyCode::Char('s') => Action::Commit,
            KeyCode::Char('r') => Action::Reload,
            KeyCode::Char('p') => {
                move_cursor(app, -1);
                Action::None
            }
            KeyCode::Char('n') => {
                move_cursor(app, 1);
                Action::None
            }
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Esc => {
            if app.input.is_empty() {
                Action::Quit
            } else {
                app.input.clear();
                send_query(app, query_tx);
                Action::None
            }
        }
        KeyCode::Up => {
            move_cursor(app, -1);
            Action::None
        }
        KeyCode::Down => {
            move_cursor(app, 1);
            Action::None
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            toggle_current(app);
            Action::None
        }
        KeyCode::Backspace => {
            app.input.pop();
            send_query(app, query_tx);
            Action::None
        }
        KeyCode::Char(c) if !c.is_control() => {
            app.input.push(c);
            send_query(app, query_tx);
            Action::None
        }
        _ => Action::None,
    }
}

/// Feed the current raw input to the debounce worker.
fn send_query(app: &AppState, query_tx: &mpsc::UnboundedSender<String>) {
    let _ = query_tx.send(app.input.clone());
}
