//! Durable diagnostic records for failed helper commands.
//!
//! The footer notice only carries the first stderr line; the full command
//! text and both output streams go to an append-only sink the operator can
//! inspect later. The sink is a capability, not a fixed path: the runtime
//! hands whatever implementation it wants to the command runner.
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Everything worth keeping about one failed command.
#[derive(Clone, Copy, Debug)]
pub struct DiagRecord<'a> {
    /// The exact command text that was executed.
    pub cmd: &'a str,
    /// Full captured stdout.
    pub stdout: &'a str,
    /// Full captured stderr.
    pub stderr: &'a str,
}

/// Append-one-record capability.
pub trait DiagnosticSink: Send + Sync {
    /// Persist `record`. Must not fail the caller; sinks swallow their own
    /// errors.
    fn append(&self, record: &DiagRecord<'_>);
}

/// File-backed sink writing human-readable blocks.
#[derive(Clone, Debug)]
pub struct FileDiagnostics {
    path: PathBuf,
}

impl FileDiagnostics {
    /// Sink appending to `path`, creating it on first use.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl DiagnosticSink for FileDiagnostics {
    fn append(&self, record: &DiagRecord<'_>) {
        let block = format!(
            "CMD: {}\n\nSTDERR:\n{}\n\nSTDOUT:\n{}\n\n",
            record.cmd, record.stderr, record.stdout
        );
        let res = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut f| f.write_all(block.as_bytes()));
        if let Err(e) = res {
            // The record is already in the tracing log; losing the file copy
            // must not take the session down.
            tracing::warn!(path = %self.path.display(), error = %e, "failed to append diagnostic record");
        }
    }
}
