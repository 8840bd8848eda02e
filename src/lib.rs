//! tidyws - move stray test assets and documentation into place
//!
//! This library scans a workspace, classifies files by name and extension,
//! and relocates them into `tests/*` and `docs/*`. Moves never overwrite:
//! collisions get a ` (n)` suffix. Every apply run writes a JSON move log
//! that undo replays in reverse.

pub mod cli;
pub mod config;
pub mod error;
pub mod file_category;
pub mod file_organizer;
pub mod move_log;
pub mod output;
pub mod report;
pub mod undo;
pub mod walker;

pub use config::{CompiledConfig, Config, ConfigError};
pub use error::{OrganizeError, OrganizeResult};
pub use file_category::{Category, Classifier};
pub use file_organizer::{ApplyOutcome, FileOrganizer, Move};
pub use move_log::{MoveLog, PendingLog};
pub use report::summarize;
pub use undo::{UndoManager, UndoReport};
pub use walker::{PlannedMove, plan_moves};

pub use cli::{OrganizeCommand, RunOutcome, execute_plan, run_cli, run_cli_with_config};
