//! Typed outcomes for helper commands.
//!
//! Every external call funnels through [`run_logged`], which collapses the
//! raw round trip into one of three shapes before any core logic sees it:
//! trimmed stdout on success, [`CmdError::Failed`] for a non-zero exit
//! code, or [`CmdError::Transport`] when the call could not be dispatched
//! at all. Failed commands leave a full record in the diagnostic sink.
//! Nothing is retried here; every retry is operator-initiated.
use std::fmt;

use crate::channel::CommandChannel;
use crate::diag::{DiagRecord, DiagnosticSink};
use crate::util::first_line;

/// Why a helper command produced no usable output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CmdError {
    /// The channel call itself failed; the command never ran.
    Transport(String),
    /// The command ran and exited non-zero.
    Failed {
        /// Exit code reported by the helper.
        code: i32,
        /// First stderr line, for the short operator-facing message.
        brief: String,
    },
}

impl CmdError {
    /// Short operator-facing message for this failure.
    pub fn notice(&self) -> String {
        match self {
            Self::Transport(_) => "Critical error executing command.".to_string(),
            Self::Failed { brief, .. } => format!("Error: {brief} (see log)"),
        }
    }
}

impl fmt::Display for CmdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport failure: {e}"),
            Self::Failed { code, brief } => write!(f, "command failed ({code}): {brief}"),
        }
    }
}

impl std::error::Error for CmdError {}

/// Execute `cmd` over `chan` and reduce the result to a typed outcome.
///
/// On success the trimmed stdout is returned (blank output is legitimate
/// here; callers decide what empty means for their operation). On logical
/// failure the full stdout/stderr is appended to `diag` and only the first
/// stderr line travels upward.
pub async fn run_logged<C: CommandChannel>(
    chan: &C,
    diag: &dyn DiagnosticSink,
    cmd: &str,
) -> Result<String, CmdError> {
    match chan.execute(cmd.to_string()).await {
        Ok(out) if out.success() => Ok(out.stdout.trim().to_string()),
        Ok(out) => {
            let brief = first_line(&out.stderr).unwrap_or("Command failed").to_string();
            tracing::error!(cmd, code = out.code, stderr = %out.stderr, "command failed");
            diag.append(&DiagRecord {
                cmd,
                stdout: &out.stdout,
                stderr: &out.stderr,
            });
            Err(CmdError::Failed {
                code: out.code,
                brief,
            })
        }
        Err(e) => {
            tracing::error!(cmd, error = %e, "could not dispatch command");
            Err(CmdError::Transport(e.to_string()))
        }
    }
}
