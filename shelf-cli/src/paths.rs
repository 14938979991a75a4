//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "shelf";
const APPLICATION: &str = "shelf";

const LATEST_LOG: &str = "latest.log";

/// Old log files kept next to `latest.log`.
const MAX_OLD_LOGS: usize = 10;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Directory for the session database.
///
/// - Linux: `$XDG_DATA_HOME/shelf` or `~/.local/share/shelf`
/// - macOS: `~/Library/Application Support/dev.shelf.shelf`
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Directory for log files.
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

pub fn session_db() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("session.db"))
}

pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Archives `latest.log` under a timestamped name and prunes old logs.
///
/// Call at startup, before the logger opens the new file.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    rotate_in(&cache, chrono::Local::now());
}

fn rotate_in(dir: &Path, now: chrono::DateTime<chrono::Local>) {
    let latest = dir.join(LATEST_LOG);
    if latest.exists() {
        let archived = dir.join(format!("{}.log", now.format("%Y%m%d_%H%M%S")));
        let _ = fs::rename(&latest, &archived);
    }
    prune_logs(dir, MAX_OLD_LOGS);
}

fn prune_logs(dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .map(|e| e.path())
        .collect();

    // Archive names sort chronologically.
    logs.sort();
    if logs.len() > keep {
        for path in &logs[..logs.len() - keep] {
            let _ = fs::remove_file(path);
        }
    }
}
