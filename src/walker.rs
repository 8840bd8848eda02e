//! Pre-order traversal that builds a move plan.
//!
//! Each directory's children are read, sorted by name, and decided one by
//! one: ignored and hidden directories are never entered, hidden files are
//! never classified, and everything else is offered to the classifier.

use crate::config::CompiledConfig;
use crate::error::{OrganizeError, OrganizeResult};
use crate::file_category::Category;
use crate::file_organizer::Move;
use std::fs;
use std::path::Path;

/// Directory names that are never entered. `tests` and `docs` are the
/// destination roots, so organized files are not classified again.
pub const IGNORE_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "venv",
    ".venv",
    "__pycache__",
    ".vscode",
    ".idea",
    "dist",
    "build",
    "out",
    "tests",
    "docs",
];

/// Dot-names that are not treated as hidden.
pub const ALLOWED_HIDDEN: &[&str] = &[".gitignore", ".gitattributes"];

/// True for dot-names other than the allowed repository metadata files.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.') && !ALLOWED_HIDDEN.contains(&name)
}

/// True if a directory with this name must not be entered.
pub fn should_skip_dir(name: &str, config: &CompiledConfig) -> bool {
    IGNORE_DIRS.contains(&name) || is_hidden(name) || config.ignores_dir(name)
}

/// A planned move together with the category that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub category: Category,
    pub mv: Move,
}

/// Walks `root` and plans a move for every classified file.
///
/// Destinations are `root/<category dir>/<file name>`. An unreadable root is
/// an error; an unreadable subdirectory is logged and skipped.
pub fn plan_moves(root: &Path, config: &CompiledConfig) -> OrganizeResult<Vec<PlannedMove>> {
    let mut plan = Vec::new();
    walk_dir(root, root, config, &mut plan).map_err(|e| OrganizeError::WalkFailed {
        path: root.to_path_buf(),
        source: e,
    })?;
    log::debug!("Planned {} move(s) under {}", plan.len(), root.display());
    Ok(plan)
}

fn walk_dir(
    root: &Path,
    dir: &Path,
    config: &CompiledConfig,
    plan: &mut Vec<PlannedMove>,
) -> std::io::Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                None
            }
        })
        .collect();
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        if file_type.is_dir() {
            if should_skip_dir(&name, config) {
                log::debug!("Pruning {}", path.display());
                continue;
            }
            if let Err(e) = walk_dir(root, &path, config, plan) {
                log::warn!("Skipping unreadable directory {}: {}", path.display(), e);
            }
            continue;
        }

        if is_hidden(&name) {
            log::trace!("Skipping hidden file {}", path.display());
            continue;
        }

        // Move logs store paths as JSON strings.
        if path.to_str().is_none() {
            log::warn!("Skipping {}: path is not valid UTF-8", path.display());
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(&path);
        if config.is_excluded(relative) {
            log::debug!("Excluded by configuration: {}", relative.display());
            continue;
        }

        let Some(category) = config.classifier.classify(&path) else {
            continue;
        };
        let dst = root.join(category.dest_dir()).join(entry.file_name());
        log::trace!("{} -> {} ({})", path.display(), dst.display(), category);
        plan.push(PlannedMove {
            category,
            mv: Move::new(path, dst),
        });
    }

    Ok(())
}
