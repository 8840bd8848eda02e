//! Command-line interface module for tidyws.
//!
//! This module handles:
//! - Option parsing (clap)
//! - Resolving the root and configuration
//! - Sequencing plan, apply, log and undo
//! - Printing plans and results

use crate::config::{CompiledConfig, Config};
use crate::error::{OrganizeError, OrganizeResult};
use crate::file_organizer::{FileOrganizer, Move};
use crate::move_log::MoveLog;
use crate::output::{OutputFormatter, relative_display};
use crate::report::summarize;
use crate::undo::{UndoManager, UndoReport};
use crate::walker::{PlannedMove, plan_moves};
use clap::{ArgAction, Parser};
use std::fs;
use std::path::{Path, PathBuf};

/// Organize stray test assets and documentation into tests/ and docs/.
#[derive(Debug, Parser)]
#[command(name = "tidyws", version, about)]
pub struct Cli {
    /// Directory to organize (default: current working directory)
    #[arg(long, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Perform the planned moves (default is a dry run)
    #[arg(long, conflicts_with = "dry_run")]
    pub apply: bool,

    /// Only print the plan; this is the default
    #[arg(long)]
    pub dry_run: bool,

    /// Undo moves recorded in a prior log file (organize_moves_*.json)
    #[arg(long, value_name = "LOG")]
    pub undo: Option<PathBuf>,

    /// Include documentation moves even with --only-tests
    #[arg(long)]
    pub include_docs: bool,

    /// Accepted for compatibility; test and demo assets are always included
    #[arg(long)]
    pub include_demos: bool,

    /// Only organize test-related files; skip docs
    #[arg(long)]
    pub only_tests: bool,

    /// Configuration file (default: <root>/.tidyws.toml, then ~/.config/tidyws/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable logging
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// The command these flags describe. `--undo` wins over everything else.
    pub fn command(&self) -> OrganizeCommand {
        match &self.undo {
            Some(log_path) => OrganizeCommand::Undo {
                log_path: log_path.clone(),
            },
            None => OrganizeCommand::Organize {
                apply: self.apply,
                include_docs: self.include_docs || !self.only_tests,
            },
        }
    }

    /// The root to organize, defaulting to the working directory.
    pub fn root_path(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizeCommand {
    /// Plan moves and, with `apply`, execute them.
    Organize {
        apply: bool,
        /// When false, moves into docs/ are dropped from the plan.
        include_docs: bool,
    },
    /// Reverse the moves recorded in a log.
    Undo { log_path: PathBuf },
}

/// What a successful run did.
#[derive(Debug)]
pub enum RunOutcome {
    /// Dry run, or nothing to do.
    Planned { moves: Vec<Move> },
    /// Moves were applied; `log_path` is set when anything moved.
    Applied {
        executed: Vec<Move>,
        skipped: Vec<PathBuf>,
        log_path: Option<PathBuf>,
    },
    Undone(UndoReport),
}

/// Runs a command against `root` with the default configuration lookup.
pub fn run_cli(command: &OrganizeCommand, root: &Path) -> OrganizeResult<RunOutcome> {
    run_cli_with_config(command, root, None)
}

/// Runs a command against `root`, loading configuration from `config_path`
/// when given.
///
/// A missing root or undo log fails before anything on disk is touched.
pub fn run_cli_with_config(
    command: &OrganizeCommand,
    root: &Path,
    config_path: Option<&Path>,
) -> OrganizeResult<RunOutcome> {
    let root = resolve_root(root)?;

    match command {
        OrganizeCommand::Undo { log_path } => undo_from_log(log_path),
        OrganizeCommand::Organize {
            apply,
            include_docs,
        } => {
            let config = Config::load(config_path, &root)?.compile()?;
            let plan = plan_workspace(&root, *include_docs, &config)?;
            if *apply {
                apply_plan(&root, plan)
            } else {
                print_dry_run(&root, plan)
            }
        }
    }
}

/// Plans moves under `root`, dropping documentation moves unless
/// `include_docs` is set.
pub fn plan_workspace(
    root: &Path,
    include_docs: bool,
    config: &CompiledConfig,
) -> OrganizeResult<Vec<Move>> {
    let planned = plan_moves(root, config)?;
    Ok(planned
        .into_iter()
        .filter(|p| include_docs || !p.category.is_doc())
        .map(|PlannedMove { mv, .. }| mv)
        .collect())
}

fn resolve_root(root: &Path) -> OrganizeResult<PathBuf> {
    if !root.is_dir() {
        return Err(OrganizeError::RootNotFound {
            path: root.to_path_buf(),
        });
    }
    fs::canonicalize(root).map_err(|_| OrganizeError::RootNotFound {
        path: root.to_path_buf(),
    })
}

/// Prints the plan and its summary. Returns true if there was anything to print.
fn print_plan(root: &Path, plan: &[Move]) -> bool {
    if plan.is_empty() {
        OutputFormatter::success("No files to move. Your workspace already looks organized!");
        return false;
    }

    OutputFormatter::info(&format!("Planned moves under {}:", root.display()));
    for mv in plan {
        OutputFormatter::planned_move(root, &mv.src, &mv.dst);
    }
    OutputFormatter::summary_table(&summarize(plan), plan.len());
    true
}

fn print_dry_run(root: &Path, plan: Vec<Move>) -> OrganizeResult<RunOutcome> {
    if print_plan(root, &plan) {
        println!();
        OutputFormatter::dry_run_notice(
            "No files were moved. Re-run with --apply to perform these moves.",
        );
    }
    Ok(RunOutcome::Planned { moves: plan })
}

fn apply_plan(root: &Path, plan: Vec<Move>) -> OrganizeResult<RunOutcome> {
    if !print_plan(root, &plan) {
        return Ok(RunOutcome::Planned { moves: plan });
    }
    execute_plan(root, plan)
}

/// Executes `plan` under `root` and records what moved.
///
/// The log file is reserved before the first move. If a relocation fails,
/// the moves completed before it are still logged and the failure comes back
/// as [`OrganizeError::PartialApply`].
pub fn execute_plan(root: &Path, plan: Vec<Move>) -> OrganizeResult<RunOutcome> {
    let pending = MoveLog::create(&plan, root)?;

    let pb = OutputFormatter::create_progress_bar(plan.len() as u64);
    let outcome = FileOrganizer::apply_moves_with_progress(&plan, |mv| {
        pb.set_message(relative_display(root, &mv.src));
        pb.inc(1);
    });
    pb.finish_and_clear();

    let log_path = if outcome.executed.is_empty() {
        if let Err(e) = pending.discard() {
            log::warn!("{}", e);
        }
        None
    } else {
        match pending.commit(&outcome.executed) {
            Ok(path) => Some(path),
            Err(e) if outcome.failure.is_some() => {
                OutputFormatter::error(&e.to_string());
                None
            }
            Err(e) => return Err(e),
        }
    };

    if let Some(failure) = outcome.failure {
        return Err(OrganizeError::PartialApply {
            completed: outcome.executed.len(),
            log_path,
            source: Box::new(failure),
        });
    }

    println!();
    for src in &outcome.skipped {
        OutputFormatter::warning(&format!(
            "Skipped {}: no longer exists",
            relative_display(root, src)
        ));
    }
    match &log_path {
        Some(path) => OutputFormatter::success(&format!(
            "Applied {} moves. Log written to: {}",
            outcome.executed.len(),
            path.display()
        )),
        None => OutputFormatter::success("Applied 0 moves."),
    }

    Ok(RunOutcome::Applied {
        executed: outcome.executed,
        skipped: outcome.skipped,
        log_path,
    })
}

fn undo_from_log(log_path: &Path) -> OrganizeResult<RunOutcome> {
    if !log_path.is_file() {
        return Err(OrganizeError::UndoLogNotFound {
            path: log_path.to_path_buf(),
        });
    }

    let report = UndoManager::undo(log_path)?;

    for (path, reason) in &report.skipped {
        OutputFormatter::warning(&format!("Skipped {}: {}", path.display(), reason));
    }
    for (path, reason) in &report.failed {
        OutputFormatter::error(&format!("Failed {}: {}", path.display(), reason));
    }
    OutputFormatter::success(&format!(
        "Undo completed. {} files moved back, {} skipped.",
        report.restored.len(),
        report.skipped.len()
    ));
    if !report.failed.is_empty() {
        OutputFormatter::warning(&format!(
            "{} file(s) could not be restored.",
            report.failed.len()
        ));
    }

    Ok(RunOutcome::Undone(report))
}
