//! Debounced search worker.
//!
//! Keystrokes stream in on one channel; the applied query value comes out
//! the other after a quiet interval. The worker holds a single pending
//! value: each newer keystroke supersedes the older one before the timer
//! fires, so exactly one filter application happens per burst, carrying
//! the final text (trailing debounce). When the input side closes, the
//! last pending value is flushed and the worker exits.
use tokio::{
    select,
    sync::mpsc,
    time::{Duration, sleep},
};

/// Spawn the debounce worker.
///
/// Reads raw query text from `query_rx`, emits the settled value on
/// `apply_tx` after `quiet` with no newer input.
pub fn spawn_filter_worker(
    mut query_rx: mpsc::UnboundedReceiver<String>,
    apply_tx: mpsc::UnboundedSender<String>,
    quiet: Duration,
) {
    tokio::spawn(async move {
        loop {
            let Some(mut latest) = query_rx.recv().await else {
                break;
            };
            loop {
                select! {
                    more = query_rx.recv() => match more {
                        Some(newer) => latest = newer,
                        None => {
                            let _ = apply_tx.send(latest);
                            return;
                        }
                    },
                    () = sleep(quiet) => break,
                }
            }
            let _ = apply_tx.send(latest);
        }
    });
}
