//! Persisted record of executed moves.
//!
//! A log is a pretty-printed JSON array of `{"src", "dst"}` objects written
//! once per apply run to `organize_moves_<timestamp>.json` in the organized
//! root. The file is reserved before the first move and filled in when the
//! run ends. It is never modified afterwards; undo only reads it.

use crate::error::{OrganizeError, OrganizeResult};
use crate::file_category::MOVE_LOG_PREFIX;
use crate::file_organizer::{Move, next_available_path};
use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Timestamp layout embedded in log names; colons are not filesystem safe.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

/// Reads and writes move logs.
pub struct MoveLog;

impl MoveLog {
    /// File name for a log created at `at`.
    ///
    /// ```
    /// use chrono::{Local, TimeZone};
    /// use tidyws::move_log::MoveLog;
    ///
    /// let at = Local.with_ymd_and_hms(2025, 8, 31, 12, 0, 0).unwrap();
    /// assert_eq!(MoveLog::file_name(&at), "organize_moves_2025-08-31T12-00-00.json");
    /// ```
    pub fn file_name(at: &DateTime<Local>) -> String {
        format!("{}{}.json", MOVE_LOG_PREFIX, at.format(TIMESTAMP_FORMAT))
    }

    /// Writes `executed` to a new log file in `root` and returns its path.
    pub fn write(executed: &[Move], root: &Path) -> OrganizeResult<PathBuf> {
        Self::write_at(executed, root, &Local::now())
    }

    /// Writes a log stamped with `at`. An existing log with the same stamp
    /// is left alone and the new one gets a ` (n)` suffix.
    pub fn write_at(
        executed: &[Move],
        root: &Path,
        at: &DateTime<Local>,
    ) -> OrganizeResult<PathBuf> {
        Self::create_at(executed, root, at)?.commit(executed)
    }

    /// Reserves a log file in `root` for a run about to execute `plan`.
    ///
    /// Fails if any planned path cannot be recorded, so nothing should be
    /// moved unless this succeeds.
    pub fn create(plan: &[Move], root: &Path) -> OrganizeResult<PendingLog> {
        Self::create_at(plan, root, &Local::now())
    }

    /// Same as [`MoveLog::create`] with an explicit timestamp.
    pub fn create_at(
        plan: &[Move],
        root: &Path,
        at: &DateTime<Local>,
    ) -> OrganizeResult<PendingLog> {
        let base = root.join(Self::file_name(at));
        serialize(plan, &base)?;

        let mut path = next_available_path(&base);
        let file = loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    path = next_available_path(&base);
                }
                Err(e) => return Err(OrganizeError::LogWriteFailed { path, source: e }),
            }
        };

        log::debug!("Reserved move log {}", path.display());
        Ok(PendingLog { path, file })
    }

    /// Reads the moves recorded in `log_path`, in execution order.
    pub fn read(log_path: &Path) -> OrganizeResult<Vec<Move>> {
        if !log_path.is_file() {
            return Err(OrganizeError::UndoLogNotFound {
                path: log_path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(log_path).map_err(|e| OrganizeError::LogReadFailed {
            path: log_path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| OrganizeError::InvalidLogFormat {
            path: log_path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// A log file created before any move runs and filled in afterwards.
#[derive(Debug)]
pub struct PendingLog {
    path: PathBuf,
    file: File,
}

impl PendingLog {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `executed` into the reserved file and returns its path.
    pub fn commit(mut self, executed: &[Move]) -> OrganizeResult<PathBuf> {
        let json = serialize(executed, &self.path)?;
        self.file
            .write_all(json.as_bytes())
            .and_then(|_| self.file.write_all(b"\n"))
            .map_err(|e| OrganizeError::LogWriteFailed {
                path: self.path.clone(),
                source: e,
            })?;

        log::info!(
            "Wrote move log with {} entries to {}",
            executed.len(),
            self.path.display()
        );
        Ok(self.path)
    }

    /// Removes the reserved file; used when nothing was moved.
    pub fn discard(self) -> OrganizeResult<()> {
        drop(self.file);
        fs::remove_file(&self.path).map_err(|e| OrganizeError::LogWriteFailed {
            path: self.path,
            source: e,
        })
    }
}

fn serialize(moves: &[Move], path: &Path) -> OrganizeResult<String> {
    serde_json::to_string_pretty(moves).map_err(|e| OrganizeError::LogWriteFailed {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, e),
    })
}
