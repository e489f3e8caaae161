//! Settings loading for zdetach.
//!
//! Configuration lives in a small TOML file under the user's config
//! directory. Every field has a default matching the stock zygisk-detach
//! install, so the program runs with no file at all; a malformed file
//! degrades to defaults with a warning rather than refusing to start.
use std::path::{Path, PathBuf};

/// Runtime settings, fully defaulted.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Command whose stdout enumerates installed packages.
    pub pm_list_cmd: String,
    /// Path of the detach helper binary.
    pub detach_bin: String,
    /// Destination for durable diagnostic records.
    pub diag_log: PathBuf,
    /// Quiet interval for the search debounce, in milliseconds.
    pub debounce_ms: u64,
    /// Session default for dry-run mode (`--dry-run` overrides).
    pub dry_run_default: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pm_list_cmd: "pm list packages".to_string(),
            detach_bin: "/data/adb/modules/zygisk-detach/detach".to_string(),
            diag_log: PathBuf::from("/sdcard/zygisk-detach.log"),
            debounce_ms: 300,
            dry_run_default: false,
        }
    }
}

/// Per-user config directory (`$HOME/.config/zdetach`), created on demand.
pub fn config_dir() -> PathBuf {
    let base = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let dir = base.join(".config").join("zdetach");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Log directory under the config directory, created on demand.
pub fn logs_dir() -> PathBuf {
    let dir = config_dir().join("logs");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Default settings file path.
pub fn default_path() -> PathBuf {
    config_dir().join("zdetach.toml")
}

/// Load settings from `path` (or the default location).
///
/// Returns the settings plus an optional warning describing why the file
/// was ignored. A missing file is normal and produces no warning.
pub fn load(path: Option<&Path>) -> (Settings, Option<String>) {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_path);
    let text = match std::fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return (Settings::default(), None);
        }
        Err(e) => {
            return (
                Settings::default(),
                Some(format!("could not read {}: {e}", path.display())),
            );
        }
    };
    match toml::from_str::<Settings>(&text) {
        Ok(s) => (s, None),
        Err(e) => (
            Settings::default(),
            Some(format!("ignoring malformed {}: {e}", path.display())),
        ),
    }
}
