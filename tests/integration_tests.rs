use tidyws::cli::{OrganizeCommand, RunOutcome, run_cli, run_cli_with_config};
use tidyws::{MoveLog, OrganizeError};
/// Integration tests for tidyws
///
/// These tests build small workspaces in temporary directories and drive the
/// library entry point end to end.
///
/// Test categories:
/// 1. Dry-run planning
/// 2. Apply and move logs
/// 3. Undo
/// 4. Flags and configuration
/// 5. Error scenarios
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A temporary workspace.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file (and its parent directories) at a relative path.
    fn create_text_file(&self, rel_path: &str, content: &str) {
        let path = self.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write file content");
    }

    fn create_files(&self, rel_paths: &[&str]) {
        for rel_path in rel_paths {
            self.create_text_file(rel_path, rel_path);
        }
    }

    fn read(&self, rel_path: &str) -> String {
        fs::read_to_string(self.path().join(rel_path)).expect("Failed to read file")
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    /// Move logs written into the root.
    fn move_logs(&self) -> Vec<PathBuf> {
        let mut logs: Vec<_> = fs::read_dir(self.path())
            .expect("Failed to read directory")
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().starts_with("organize_moves_"))
                    .unwrap_or(false)
            })
            .collect();
        logs.sort();
        logs
    }

    /// Files below the root as sorted forward-slash relative paths.
    fn list_files_recursive(&self) -> Vec<String> {
        let mut files = Vec::new();
        Self::walk_dir(self.path(), self.path(), &mut files);
        files.sort();
        files
    }

    fn walk_dir(root: &Path, dir: &Path, files: &mut Vec<String>) {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_file() {
                    let rel = path.strip_prefix(root).unwrap();
                    files.push(rel.to_string_lossy().replace('\\', "/"));
                } else if path.is_dir() {
                    Self::walk_dir(root, &path, files);
                }
            }
        }
    }

    fn dry_run(&self) -> Vec<String> {
        self.plan(true)
    }

    fn plan(&self, include_docs: bool) -> Vec<String> {
        let outcome = run_cli(
            &OrganizeCommand::Organize {
                apply: false,
                include_docs,
            },
            self.path(),
        )
        .expect("Dry run failed");
        let RunOutcome::Planned { moves } = outcome else {
            panic!("Dry run should only plan");
        };
        let root = fs::canonicalize(self.path()).unwrap();
        moves
            .iter()
            .map(|m| {
                m.dst
                    .strip_prefix(&root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    fn apply(&self) -> RunOutcome {
        run_cli(
            &OrganizeCommand::Organize {
                apply: true,
                include_docs: true,
            },
            self.path(),
        )
        .expect("Apply failed")
    }

    fn undo(&self, log_path: &Path) -> tidyws::UndoReport {
        match run_cli(
            &OrganizeCommand::Undo {
                log_path: log_path.to_path_buf(),
            },
            self.path(),
        )
        .expect("Undo failed")
        {
            RunOutcome::Undone(report) => report,
            other => panic!("Expected an undo report, got {:?}", other),
        }
    }
}

const SCENARIO: &[&str] = &["run_test.sh", "README.md", "coverage-report.json", "notes.md"];

// ============================================================================
// Test Suite 1: Dry-Run Planning
// ============================================================================

#[test]
fn test_scenario_dry_run_plan() {
    let fixture = TestFixture::new();
    fixture.create_files(SCENARIO);

    let mut planned = fixture.dry_run();
    planned.sort();

    assert_eq!(
        planned,
        vec![
            "docs/guides/README.md",
            "docs/misc/notes.md",
            "tests/results/logs/coverage-report.json",
            "tests/scripts/run_test.sh",
        ]
    );
}

#[test]
fn test_dry_run_doesnt_touch_files() {
    let fixture = TestFixture::new();
    fixture.create_files(SCENARIO);

    fixture.dry_run();

    let mut expected: Vec<String> = SCENARIO.iter().map(|s| s.to_string()).collect();
    expected.sort();
    assert_eq!(fixture.list_files_recursive(), expected);
    assert!(fixture.move_logs().is_empty());
}

#[test]
fn test_empty_workspace_has_nothing_to_do() {
    let fixture = TestFixture::new();
    fixture.create_files(&["app.js", "index.html", "styles.css"]);

    assert!(fixture.dry_run().is_empty());

    let RunOutcome::Planned { moves } = fixture.apply() else {
        panic!("Nothing to apply should stay a plan");
    };
    assert!(moves.is_empty());
    assert!(fixture.move_logs().is_empty());
}

#[test]
fn test_token_boundaries() {
    let fixture = TestFixture::new();
    fixture.create_files(&["login_test.py", "testing.py", "contest.js", "spec-runner.ts"]);

    let mut planned = fixture.dry_run();
    planned.sort();

    assert_eq!(
        planned,
        vec!["tests/scripts/login_test.py", "tests/scripts/spec-runner.ts"]
    );
}

#[test]
fn test_organized_workspace_replans_nothing() {
    let fixture = TestFixture::new();
    fixture.create_files(SCENARIO);
    fixture.create_files(&["src/widget_test.js", "pages/demo.html", "data/sample.csv"]);

    fixture.apply();

    assert!(fixture.dry_run().is_empty());
}

#[test]
fn test_nested_and_pruned_directories() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        "src/components/button.spec.ts",
        "node_modules/lib/mock.js",
        ".github/workflow_test.sh",
        "venv/lib/stub.py",
        "tests/legacy/old_test.py",
    ]);

    assert_eq!(fixture.dry_run(), vec!["tests/scripts/button.spec.ts"]);
}

// ============================================================================
// Test Suite 2: Apply and Move Logs
// ============================================================================

#[test]
fn test_scenario_apply_moves_files_and_writes_log() {
    let fixture = TestFixture::new();
    fixture.create_files(SCENARIO);

    let RunOutcome::Applied {
        executed, log_path, ..
    } = fixture.apply()
    else {
        panic!("Expected an apply outcome");
    };

    assert_eq!(executed.len(), 4);
    fixture.assert_file_exists("tests/scripts/run_test.sh");
    fixture.assert_file_exists("docs/guides/README.md");
    fixture.assert_file_exists("tests/results/logs/coverage-report.json");
    fixture.assert_file_exists("docs/misc/notes.md");
    for name in SCENARIO {
        fixture.assert_file_not_exists(name);
    }
    assert_eq!(fixture.read("tests/scripts/run_test.sh"), "run_test.sh");

    let log_path = log_path.expect("A log should be written");
    assert_eq!(fixture.move_logs().len(), 1);
    assert_eq!(MoveLog::read(&log_path).unwrap(), executed);
}

#[test]
fn test_apply_resolves_collisions_without_data_loss() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a/test.json", "from a");
    fixture.create_text_file("b/test.json", "from b");

    fixture.apply();

    assert_eq!(fixture.read("tests/data/test.json"), "from a");
    assert_eq!(fixture.read("tests/data/test (1).json"), "from b");
    fixture.assert_file_not_exists("a/test.json");
    fixture.assert_file_not_exists("b/test.json");
}

#[test]
fn test_apply_never_overwrites_existing_destination() {
    let fixture = TestFixture::new();
    fixture.create_text_file("tests/scripts/run_test.sh", "already organized");
    fixture.create_text_file("run_test.sh", "stray copy");

    fixture.apply();

    assert_eq!(fixture.read("tests/scripts/run_test.sh"), "already organized");
    assert_eq!(fixture.read("tests/scripts/run_test (1).sh"), "stray copy");
}

#[test]
fn test_second_apply_writes_no_new_log_and_keeps_old_one() {
    let fixture = TestFixture::new();
    fixture.create_files(SCENARIO);

    fixture.apply();
    let logs = fixture.move_logs();
    fixture.apply();

    assert_eq!(fixture.move_logs(), logs);
}

#[cfg(unix)]
#[test]
fn test_apply_leaves_non_utf8_paths_alone_and_logs_the_rest() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fixture = TestFixture::new();
    let odd_dir = fixture.path().join(OsStr::from_bytes(b"dir\xff"));
    fs::create_dir(&odd_dir).unwrap();
    fs::write(odd_dir.join("login_test.py"), "odd").unwrap();
    fixture.create_files(&["run_test.sh"]);

    let RunOutcome::Applied {
        executed, log_path, ..
    } = fixture.apply()
    else {
        panic!("Expected an apply outcome");
    };

    assert!(odd_dir.join("login_test.py").exists());
    fixture.assert_file_not_exists("tests/scripts/login_test.py");
    assert_eq!(executed.len(), 1);
    let log_path = log_path.expect("A log should be written");
    assert_eq!(MoveLog::read(&log_path).unwrap(), executed);
}

// ============================================================================
// Test Suite 3: Undo
// ============================================================================

#[test]
fn test_scenario_undo_restores_everything() {
    let fixture = TestFixture::new();
    fixture.create_files(SCENARIO);
    let before = fixture.list_files_recursive();

    let RunOutcome::Applied { log_path, .. } = fixture.apply() else {
        panic!("Expected an apply outcome");
    };
    let log_path = log_path.unwrap();

    let report = fixture.undo(&log_path);

    assert_eq!(report.restored.len(), 4);
    assert!(report.skipped.is_empty());
    assert!(report.failed.is_empty());
    for name in SCENARIO {
        fixture.assert_file_exists(name);
        assert_eq!(fixture.read(name), *name);
    }

    let log_name = log_path.file_name().unwrap().to_string_lossy().to_string();
    let after: Vec<String> = fixture
        .list_files_recursive()
        .into_iter()
        .filter(|f| *f != log_name)
        .collect();
    assert_eq!(after, before);
}

#[test]
fn test_undo_round_trip_with_collisions() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a/test.json", "from a");
    fixture.create_text_file("b/test.json", "from b");

    let RunOutcome::Applied { log_path, .. } = fixture.apply() else {
        panic!("Expected an apply outcome");
    };
    let report = fixture.undo(&log_path.unwrap());

    assert!(report.is_complete_success());
    assert_eq!(fixture.read("a/test.json"), "from a");
    assert_eq!(fixture.read("b/test.json"), "from b");
}

#[test]
fn test_undo_skips_files_moved_since_apply() {
    let fixture = TestFixture::new();
    fixture.create_files(SCENARIO);

    let RunOutcome::Applied { log_path, .. } = fixture.apply() else {
        panic!("Expected an apply outcome");
    };
    fs::remove_file(fixture.path().join("docs/misc/notes.md")).unwrap();

    let report = fixture.undo(&log_path.unwrap());

    assert_eq!(report.restored.len(), 3);
    assert_eq!(report.skipped.len(), 1);
    fixture.assert_file_exists("run_test.sh");
    fixture.assert_file_not_exists("notes.md");
}

#[test]
fn test_undo_keeps_newcomer_at_original_slot() {
    let fixture = TestFixture::new();
    fixture.create_text_file("server.log", "logged");

    let RunOutcome::Applied { log_path, .. } = fixture.apply() else {
        panic!("Expected an apply outcome");
    };
    fixture.create_text_file("server.log", "newcomer");

    fixture.undo(&log_path.unwrap());

    assert_eq!(fixture.read("server.log"), "newcomer");
    assert_eq!(fixture.read("server (1).log"), "logged");
}

// ============================================================================
// Test Suite 4: Flags and Configuration
// ============================================================================

#[test]
fn test_only_tests_excludes_docs() {
    let fixture = TestFixture::new();
    fixture.create_files(SCENARIO);
    fixture.create_files(&["analysis-summary.md", "guides/HOWTO.rst"]);

    let planned = fixture.plan(false);

    assert!(!planned.is_empty());
    assert!(planned.iter().all(|p| !p.starts_with("docs/")));
}

#[test]
fn test_local_config_is_applied() {
    let fixture = TestFixture::new();
    fixture.create_files(&["keep_test.py", "move_test.py", "vendor/lib_test.py", "particles.toml"]);
    fixture.create_text_file(
        ".tidyws.toml",
        "[walk]\nignore_dirs = [\"vendor\"]\n\n[exclude]\nfilenames = [\"keep_test.py\"]\n\n[overrides]\n\"particles.toml\" = \"test_data\"\n",
    );

    let mut planned = fixture.dry_run();
    planned.sort();

    assert_eq!(
        planned,
        vec!["tests/data/particles.toml", "tests/scripts/move_test.py"]
    );
}

#[test]
fn test_explicit_config_must_exist() {
    let fixture = TestFixture::new();
    let missing = fixture.path().join("missing.toml");

    let result = run_cli_with_config(
        &OrganizeCommand::Organize {
            apply: false,
            include_docs: true,
        },
        fixture.path(),
        Some(&missing),
    );

    let err = result.expect_err("Missing config should fail");
    assert!(matches!(err, OrganizeError::Config(_)));
    assert_eq!(err.exit_code(), 1);
}

// ============================================================================
// Test Suite 5: Error Scenarios
// ============================================================================

#[test]
fn test_missing_root_exits_with_two() {
    let fixture = TestFixture::new();
    let result = run_cli(
        &OrganizeCommand::Organize {
            apply: true,
            include_docs: true,
        },
        &fixture.path().join("nope"),
    );

    let err = result.expect_err("Missing root should fail");
    assert!(matches!(err, OrganizeError::RootNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_missing_undo_log_exits_with_two() {
    let fixture = TestFixture::new();
    fixture.create_files(SCENARIO);

    let result = run_cli(
        &OrganizeCommand::Undo {
            log_path: fixture.path().join("organize_moves_missing.json"),
        },
        fixture.path(),
    );

    let err = result.expect_err("Missing log should fail");
    assert!(matches!(err, OrganizeError::UndoLogNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
    // Nothing was touched.
    fixture.assert_file_exists("run_test.sh");
}
