/// Undo functionality for reverting an apply run.
///
/// Replays a move log backwards, moving each file from its logged destination
/// toward its original location. The same ` (n)` disambiguation used by apply
/// protects whatever now occupies the original slot, so a restored file can
/// land beside its original path rather than on it.
use crate::error::OrganizeResult;
use crate::file_organizer::{FileOrganizer, Move};
use crate::move_log::MoveLog;
use std::path::{Path, PathBuf};

/// Represents the result of an undo operation.
#[derive(Debug, Default)]
pub struct UndoReport {
    /// Moves performed, from the logged destination to the restored path.
    pub restored: Vec<Move>,
    /// Entries whose file was no longer at its logged destination.
    pub skipped: Vec<(PathBuf, String)>,
    /// Entries that could not be moved back.
    pub failed: Vec<(PathBuf, String)>,
}

impl UndoReport {
    /// Returns the total number of log entries processed.
    pub fn total_processed(&self) -> usize {
        self.restored.len() + self.skipped.len() + self.failed.len()
    }

    /// Returns true if every entry was restored.
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Manages undo operations.
pub struct UndoManager;

impl UndoManager {
    /// Reverses the moves recorded in `log_path`, last executed first.
    ///
    /// A missing or unreadable log is an error. Individual entries never
    /// abort the batch: a file missing from its logged destination is
    /// skipped, and a failed move back is recorded in the report.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tidyws::undo::UndoManager;
    /// use std::path::Path;
    ///
    /// let report = UndoManager::undo(Path::new("organize_moves_2025-08-31T12-00-00.json"))?;
    /// println!("Restored {} files", report.restored.len());
    /// # Ok::<(), tidyws::OrganizeError>(())
    /// ```
    pub fn undo(log_path: &Path) -> OrganizeResult<UndoReport> {
        let entries = MoveLog::read(log_path)?;
        log::debug!(
            "Undoing {} entries from {}",
            entries.len(),
            log_path.display()
        );
        Ok(Self::undo_moves(&entries))
    }

    /// Reverses `entries` without reading a log file.
    pub fn undo_moves(entries: &[Move]) -> UndoReport {
        let mut report = UndoReport::default();

        for entry in entries.iter().rev() {
            if entry.dst.symlink_metadata().is_err() {
                log::warn!(
                    "Skipping {}: not found at logged destination",
                    entry.dst.display()
                );
                report.skipped.push((
                    entry.dst.clone(),
                    "File not found at logged destination".to_string(),
                ));
                continue;
            }

            match FileOrganizer::relocate(&entry.dst, &entry.src) {
                Ok(restored_to) => {
                    if restored_to != entry.src {
                        log::warn!(
                            "{} is occupied, restored to {}",
                            entry.src.display(),
                            restored_to.display()
                        );
                    }
                    report.restored.push(Move::new(entry.dst.clone(), restored_to));
                }
                Err(e) => {
                    log::error!("{}", e);
                    report.failed.push((entry.dst.clone(), e.to_string()));
                }
            }
        }

        report
    }
}
