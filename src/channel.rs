//! The single opaque command channel to the device shell.
//!
//! Everything this program learns or changes goes through one round trip
//! shape: a shell command string in, exit code plus both output streams
//! back. [`CommandChannel`] is the seam the rest of the code is written
//! against; [`ShellChannel`] is the real implementation, which runs
//! `sh -c <cmd>` as a blocking process off the async loop. Transport
//! failures (the process could not be dispatched at all) surface as
//! `io::Error` and are distinct from a non-zero exit code, which is a
//! logical failure reported inside [`CommandOutput`].
use std::future::Future;
use std::io;
use std::path::PathBuf;

/// Exit status and captured output of one completed command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOutput {
    /// Process exit code; `-1` when terminated by a signal.
    pub code: i32,
    /// Captured stdout, lossily decoded.
    pub stdout: String,
    /// Captured stderr, lossily decoded.
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the command reported success.
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// One asynchronous command round trip.
///
/// Implementations must not interpret the command text; it is opaque here
/// and serialized defensively by the caller.
pub trait CommandChannel: Send + Sync {
    /// Execute `cmd` and resolve with its exit status and output streams.
    ///
    /// `Err` means the command could not be dispatched at all; a command
    /// that ran and failed resolves `Ok` with a non-zero `code`.
    fn execute(&self, cmd: String) -> impl Future<Output = io::Result<CommandOutput>> + Send;
}

/// Real channel: runs commands through the system shell.
#[derive(Clone, Debug)]
pub struct ShellChannel {
    shell: PathBuf,
}

impl ShellChannel {
    /// Resolve the shell binary on `PATH`.
    ///
    /// Failing to find one is fatal for the whole program: without a shell
    /// there is no transport to the helper.
    pub fn new() -> io::Result<Self> {
        let shell = which::which("sh").map_err(|e| {
            io::Error::new(io::ErrorKind::NotFound, format!("no usable shell: {e}"))
        })?;
        Ok(Self { shell })
    }
}

impl CommandChannel for ShellChannel {
    fn execute(&self, cmd: String) -> impl Future<Output = io::Result<CommandOutput>> + Send {
        let shell = self.shell.clone();
        async move {
            let joined = tokio::task::spawn_blocking(move || {
                std::process::Command::new(&shell)
                    .arg("-c")
                    .arg(&cmd)
                    .output()
            })
            .await
            .map_err(io::Error::other)?;
            let out = joined?;
            Ok(CommandOutput {
                code: out.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            })
        }
    }
}
