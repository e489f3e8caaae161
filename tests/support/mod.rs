//! Shared test doubles: a scripted command channel and a capturing
//! diagnostic sink.
#![allow(dead_code)]

use std::io;
use std::sync::Mutex;

use zdetach::channel::{CommandChannel, CommandOutput};
use zdetach::detach::Commands;
use zdetach::diag::{DiagRecord, DiagnosticSink};

/// Stock helper path used by the command-text assertions.
pub const DETACH_BIN: &str = "/data/adb/modules/zygisk-detach/detach";

/// Default command set mirroring a stock device.
pub fn cmds() -> Commands {
    Commands {
        pm_list: "pm list packages".to_string(),
        detach_bin: DETACH_BIN.to_string(),
    }
}

/// What a matched rule answers with.
pub enum Reply {
    /// A completed command with this exit code and output streams.
    Done {
        code: i32,
        stdout: String,
        stderr: String,
    },
    /// The dispatch itself fails.
    Transport(String),
}

impl Reply {
    pub fn ok(stdout: &str) -> Self {
        Reply::Done {
            code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub fn fail(code: i32, stderr: &str) -> Self {
        Reply::Done {
            code,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    pub fn transport(msg: &str) -> Self {
        Reply::Transport(msg.to_string())
    }
}

/// Prefix-scripted channel recording every command it is asked to run.
pub struct MockChannel {
    rules: Vec<(String, Reply)>,
    calls: Mutex<Vec<String>>,
}

impl MockChannel {
    pub fn new(rules: Vec<(&str, Reply)>) -> Self {
        Self {
            rules: rules
                .into_iter()
                .map(|(prefix, reply)| (prefix.to_string(), reply))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Commands executed so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl CommandChannel for MockChannel {
    async fn execute(&self, cmd: String) -> io::Result<CommandOutput> {
        self.calls.lock().expect("calls lock").push(cmd.clone());
        for (prefix, reply) in &self.rules {
            if cmd.starts_with(prefix.as_str()) {
                return match reply {
                    Reply::Done {
                        code,
                        stdout,
                        stderr,
                    } => Ok(CommandOutput {
                        code: *code,
                        stdout: stdout.clone(),
                        stderr: stderr.clone(),
                    }),
                    Reply::Transport(msg) => Err(io::Error::other(msg.clone())),
                };
            }
        }
        Ok(CommandOutput {
            code: 0,
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

/// One captured diagnostic record.
#[derive(Clone, Debug)]
pub struct CapturedRecord {
    pub cmd: String,
    pub stdout: String,
    pub stderr: String,
}

/// In-memory sink for asserting on diagnostic records.
#[derive(Default)]
pub struct MemSink {
    records: Mutex<Vec<CapturedRecord>>,
}

impl MemSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records.lock().expect("records lock").clone()
    }
}

impl DiagnosticSink for MemSink {
    fn append(&self, record: &DiagRecord<'_>) {
        self.records.lock().expect("records lock").push(CapturedRecord {
            cmd: record.cmd.to_string(),
            stdout: record.stdout.to_string(),
            stderr: record.stderr.to_string(),
        });
    }
}
