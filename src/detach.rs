//! Adapters for the zygisk-detach helper and the package manager.
//!
//! Three operations exist, each one external round trip:
//!
//! - enumerate installed packages (`pm list packages`, one record per line,
//!   optionally prefixed with `package:`)
//! - read the detached snapshot (`detach list`, one id per line; blank
//!   stdout means nothing is detached)
//! - commit the pending membership, either `detach reset` when the
//!   selection is empty or a single `detach detachall` carrying every
//!   selected id, so the helper applies the whole new set in one step
//!
//! Identifiers headed into a command line are single-quoted and rejected
//! when they contain control characters; the helper's list must never be
//! corruptible by a package name.
use crate::channel::CommandChannel;
use crate::diag::DiagnosticSink;
use crate::runner::{CmdError, run_logged};
use crate::util::shell_single_quote;

/// Literal prefix the package manager puts before each identifier.
const PM_PREFIX: &str = "package:";

/// Command texts for one session, derived from settings.
#[derive(Clone, Debug)]
pub struct Commands {
    /// Enumeration command (stdout: one package record per line).
    pub pm_list: String,
    /// Path of the detach helper binary.
    pub detach_bin: String,
}

impl Commands {
    /// Build from loaded settings.
    pub fn from_settings(settings: &crate::config::Settings) -> Self {
        Self {
            pm_list: settings.pm_list_cmd.clone(),
            detach_bin: settings.detach_bin.clone(),
        }
    }

    fn list_cmd(&self) -> String {
        format!("{} list", self.detach_bin)
    }

    fn reset_cmd(&self) -> String {
        format!("{} reset", self.detach_bin)
    }
}

/// Parse enumerator stdout into identifiers, stripping the `package:`
/// prefix and dropping blank records.
pub fn parse_package_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(|line| line.strip_prefix(PM_PREFIX).unwrap_or(line).trim())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse snapshot stdout into identifiers, dropping blank lines.
pub fn parse_snapshot_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Enumerate currently installed packages.
pub async fn installed_packages<C: CommandChannel>(
    chan: &C,
    diag: &dyn DiagnosticSink,
    cmds: &Commands,
) -> Result<Vec<String>, CmdError> {
    let stdout = run_logged(chan, diag, &cmds.pm_list).await?;
    Ok(parse_package_lines(&stdout))
}

/// Read the helper's current detached set. Blank output is a legitimate
/// empty snapshot, not an error.
pub async fn detached_snapshot<C: CommandChannel>(
    chan: &C,
    diag: &dyn DiagnosticSink,
    cmds: &Commands,
) -> Result<Vec<String>, CmdError> {
    let stdout = run_logged(chan, diag, &cmds.list_cmd()).await?;
    Ok(parse_snapshot_lines(&stdout))
}

/// What a successful commit did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The detach list was cleared.
    Reset,
    /// The detach list was replaced with this many ids.
    Applied(usize),
    /// Dry-run mode: the command that would have run.
    DryRun(String),
}

/// Build the single commit invocation for `ids`.
///
/// Returns the command text plus the outcome it will produce on success.
/// Ids containing control characters are refused before any command text
/// exists; everything else is single-quoted into one argument per id.
pub fn build_commit_command(
    cmds: &Commands,
    ids: &[String],
) -> Result<(String, CommitOutcome), String> {
    if ids.is_empty() {
        return Ok((cmds.reset_cmd(), CommitOutcome::Reset));
    }
    if let Some(bad) = ids.iter().find(|id| id.chars().any(char::is_control)) {
        return Err(format!(
            "Error: refusing to commit package id with control characters: {:?}",
            bad
        ));
    }
    let args: Vec<String> = ids.iter().map(|id| shell_single_quote(id)).collect();
    let cmd = format!("{} detachall {}", cmds.detach_bin, args.join(" "));
    Ok((cmd, CommitOutcome::Applied(ids.len())))
}

/// Commit `ids` as the new detach-list membership in one invocation.
///
/// Empty `ids` clears the list. In dry-run mode the command is returned
/// unexecuted. The error is the ready-to-show operator notice; the full
/// diagnostics are already persisted by the runner when applicable.
pub async fn commit_selection<C: CommandChannel>(
    chan: &C,
    diag: &dyn DiagnosticSink,
    cmds: &Commands,
    ids: &[String],
    dry_run: bool,
) -> Result<CommitOutcome, String> {
    let (cmd, outcome) = build_commit_command(cmds, ids)?;
    if dry_run {
        tracing::info!(%cmd, "dry run, commit not executed");
        return Ok(CommitOutcome::DryRun(cmd));
    }
    match run_logged(chan, diag, &cmd).await {
        Ok(_) => Ok(outcome),
        Err(e) => Err(e.notice()),
    }
}
