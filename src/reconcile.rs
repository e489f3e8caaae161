//! Reconciliation of the installed-package list with the detached snapshot.
//!
//! Produces the single row collection the rest of the session works from:
//! one [`DisplayEntry`] per distinct identifier across both inputs.
//! Installed packages come first, in enumeration order; identifiers that
//! appear only in the snapshot are appended after, in snapshot order, and
//! flagged orphaned so the operator can see stale detach entries instead of
//! having them silently dropped on the next commit.
//!
//! Pure and deterministic: identical inputs (duplicates included) always
//! yield the identical ordered output. No I/O happens here; callers convert
//! channel failures into typed outcomes before this point.
use std::collections::HashSet;

use crate::state::DisplayEntry;

/// Merge `installed` and `detached` into the ordered entry collection.
///
/// Duplicates within and across the two inputs collapse to the first
/// occurrence. `orphaned` is set exactly when an id is detached but absent
/// from `installed`.
pub fn reconcile(installed: &[String], detached: &[String]) -> Vec<DisplayEntry> {
    let detached_set: HashSet<&str> = detached.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(installed.len());
    let mut entries = Vec::with_capacity(installed.len());

    for id in installed {
        if seen.insert(id) {
            entries.push(DisplayEntry {
                name: id.clone(),
                initially_detached: detached_set.contains(id.as_str()),
                orphaned: false,
            });
        }
    }
    for id in detached {
        if seen.insert(id) {
            entries.push(DisplayEntry {
                name: id.clone(),
                initially_detached: true,
                orphaned: true,
            });
        }
    }
    entries
}

/// Count of detached-but-uninstalled entries.
pub fn orphan_count(entries: &[DisplayEntry]) -> usize {
    entries.iter().filter(|e| e.orphaned).count()
}
