/// Collision-safe relocation of planned moves.
///
/// This module creates destination directories and moves files into them,
/// never overwriting an existing file: a taken destination gets a ` (n)`
/// disambiguator before its extension.
use crate::error::{OrganizeError, OrganizeResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A single relocation, from `src` to `dst`.
///
/// In a plan `dst` is the intended destination. In a log it is the final
/// path on disk after collision resolution. The serialized form is exactly
/// `{"src": ..., "dst": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub src: PathBuf,
    pub dst: PathBuf,
}

impl Move {
    pub fn new(src: impl Into<PathBuf>, dst: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
        }
    }
}

/// What an apply run did.
///
/// When `failure` is set the batch stopped at that move; `executed` still
/// lists everything that completed before it so it can be logged.
#[derive(Debug, Default)]
pub struct ApplyOutcome {
    pub executed: Vec<Move>,
    /// Sources that had vanished by the time their move came up.
    pub skipped: Vec<PathBuf>,
    pub failure: Option<OrganizeError>,
}

/// Returns `target` if it is free, otherwise the first free
/// `stem (n).ext` sibling, counting from 1.
///
/// ```no_run
/// use tidyws::file_organizer::next_available_path;
/// use std::path::Path;
///
/// // With tests/data/test.json already present:
/// let free = next_available_path(Path::new("tests/data/test.json"));
/// assert_eq!(free, Path::new("tests/data/test (1).json"));
/// ```
pub fn next_available_path(target: &Path) -> PathBuf {
    if !occupied(target) {
        return target.to_path_buf();
    }

    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = target
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut i = 1usize;
    loop {
        let candidate = target.with_file_name(format!("{stem} ({i}){ext}"));
        if !occupied(&candidate) {
            return candidate;
        }
        i += 1;
    }
}

/// Dangling symlinks still occupy a name.
fn occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Executes move plans.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Creates every distinct destination directory referenced by `plan`.
    ///
    /// Directories that already exist are not an error.
    pub fn ensure_dirs(plan: &[Move]) -> OrganizeResult<()> {
        let mut created: HashSet<&Path> = HashSet::new();
        for mv in plan {
            let Some(dir) = mv.dst.parent() else {
                continue;
            };
            if created.insert(dir) {
                fs::create_dir_all(dir).map_err(|e| OrganizeError::DirectoryCreationFailed {
                    path: dir.to_path_buf(),
                    source: e,
                })?;
            }
        }
        Ok(())
    }

    /// Applies `plan` in order.
    ///
    /// Sources that no longer exist are skipped. The first relocation error
    /// stops the batch and is returned in [`ApplyOutcome::failure`] alongside
    /// the moves that already completed.
    pub fn apply_moves(plan: &[Move]) -> ApplyOutcome {
        Self::apply_moves_with_progress(plan, |_| {})
    }

    /// Same as [`FileOrganizer::apply_moves`], calling `on_step` once per
    /// planned move after it has been executed or skipped.
    pub fn apply_moves_with_progress<F>(plan: &[Move], mut on_step: F) -> ApplyOutcome
    where
        F: FnMut(&Move),
    {
        let mut outcome = ApplyOutcome::default();

        if let Err(e) = Self::ensure_dirs(plan) {
            outcome.failure = Some(e);
            return outcome;
        }

        for planned in plan {
            if !occupied(&planned.src) {
                log::warn!("Skipping {}: source no longer exists", planned.src.display());
                outcome.skipped.push(planned.src.clone());
                on_step(planned);
                continue;
            }

            match Self::relocate(&planned.src, &planned.dst) {
                Ok(final_dst) => {
                    log::info!("Moved {} -> {}", planned.src.display(), final_dst.display());
                    outcome.executed.push(Move::new(planned.src.clone(), final_dst));
                    on_step(planned);
                }
                Err(e) => {
                    log::error!("{}", e);
                    outcome.failure = Some(e);
                    break;
                }
            }
        }

        outcome
    }

    /// Moves `src` to the first free path at or beside `dst` and returns it.
    ///
    /// Missing parent directories are created. A rename across filesystems
    /// falls back to copy-then-remove.
    pub fn relocate(src: &Path, dst: &Path) -> OrganizeResult<PathBuf> {
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent).map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let final_dst = next_available_path(dst);
        if final_dst != dst {
            log::debug!(
                "{} is taken, using {}",
                dst.display(),
                final_dst.display()
            );
        }

        Self::rename_or_copy(src, &final_dst).map_err(|e| OrganizeError::FileMoveFailure {
            from: src.to_path_buf(),
            to: final_dst.clone(),
            source: e,
        })?;

        Ok(final_dst)
    }

    fn rename_or_copy(src: &Path, dst: &Path) -> io::Result<()> {
        match fs::rename(src, dst) {
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                log::debug!(
                    "Rename across devices failed, copying {} instead",
                    src.display()
                );
                fs::copy(src, dst)?;
                fs::remove_file(src)
            }
            other => other,
        }
    }
}
