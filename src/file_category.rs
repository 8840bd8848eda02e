//! File classification rules.
//!
//! Maps a file name to one of the eight canonical categories, or to nothing
//! when the file should stay where it is. The extension sets, token patterns
//! and literal-name tables are plain data so each can be checked on its own.
//!
//! # Examples
//!
//! ```
//! use tidyws::file_category::{Category, Classifier};
//!
//! let classifier = Classifier::default();
//! assert_eq!(classifier.classify_name("login_test.py"), Some(Category::TestScript));
//! assert_eq!(classifier.classify_name("testing.py"), None);
//! assert_eq!(classifier.classify_name("README.md"), Some(Category::DocGuides));
//! ```

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Extensions treated as runnable test scripts.
pub const SCRIPT_EXTS: &[&str] = &["js", "ts", "py", "ps1", "sh", "bat"];
/// Extensions treated as pages.
pub const PAGE_EXTS: &[&str] = &["html", "htm"];
/// Extensions treated as stylesheets.
pub const STYLE_EXTS: &[&str] = &["css", "scss", "sass"];
/// Extensions treated as data or configuration.
pub const DATA_EXTS: &[&str] = &["json", "csv", "tsv", "ndjson", "txt", "yml", "yaml"];
/// Extensions treated as logs.
pub const LOG_EXTS: &[&str] = &["log"];
/// Structured formats that count as test results when the name says so.
pub const RESULT_EXTS: &[&str] = &["json", "xml", "junit"];
/// Documentation extensions.
pub const DOC_EXTS: &[&str] = &["md", "rst"];

/// Whole-word markers that flag a file as a test or demo asset.
pub const TEST_TOKEN_PATTERN: &str =
    r"(?:^|[\W_])(test|spec|demo|example|fixture|sample|mock|stub)(?:$|[\W_])";
/// Substrings that mark a data file as test data even without a test token.
pub const DATA_NAME_PATTERN: &str = r"data|config|dataset|fixtures?";
/// Substrings that mark a structured file as a test result.
pub const RESULT_NAME_PATTERN: &str = r"result|report|junit|coverage";
/// Documentation names that are reports.
pub const REPORT_DOC_PATTERN: &str = r"report|summary|diagnostic|analysis|compliance|results?";
/// Documentation names that are guides.
pub const GUIDE_DOC_PATTERN: &str = r"guide|readme|documentation|how[-_ ]?to|manual|tutorial";

/// File names that are never moved, such as a site's entry page.
pub const EXCLUDED_NAMES: &[&str] = &["index.html"];

/// Repository-specific literal names, matched case-insensitively.
pub const LITERAL_OVERRIDES: &[(&str, Category)] =
    &[("particlesjs-config.json", Category::TestData)];

/// Prefix of the move log files written by an apply run.
pub const MOVE_LOG_PREFIX: &str = "organize_moves_";

/// The closed set of destinations a file can be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TestScript,
    TestPage,
    TestStyle,
    TestData,
    TestResultsLogs,
    DocReports,
    DocGuides,
    DocMisc,
}

impl Category {
    /// Every category, in reporting order.
    pub const ALL: [Category; 8] = [
        Category::TestScript,
        Category::TestPage,
        Category::TestStyle,
        Category::TestData,
        Category::TestResultsLogs,
        Category::DocReports,
        Category::DocGuides,
        Category::DocMisc,
    ];

    /// Returns the destination directory for this category, relative to the root.
    ///
    /// ```
    /// use tidyws::file_category::Category;
    ///
    /// assert_eq!(Category::TestScript.dir_name(), "tests/scripts");
    /// assert_eq!(Category::TestResultsLogs.dir_name(), "tests/results/logs");
    /// assert_eq!(Category::DocMisc.dir_name(), "docs/misc");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::TestScript => "tests/scripts",
            Category::TestPage => "tests/pages",
            Category::TestStyle => "tests/styles",
            Category::TestData => "tests/data",
            Category::TestResultsLogs => "tests/results/logs",
            Category::DocReports => "docs/reports",
            Category::DocGuides => "docs/guides",
            Category::DocMisc => "docs/misc",
        }
    }

    /// The destination directory as a relative path.
    pub fn dest_dir(&self) -> PathBuf {
        self.dir_name().split('/').collect()
    }

    /// Stable snake_case label used in summaries and config files.
    pub fn label(&self) -> &'static str {
        match self {
            Category::TestScript => "test_script",
            Category::TestPage => "test_page",
            Category::TestStyle => "test_style",
            Category::TestData => "test_data",
            Category::TestResultsLogs => "test_results_logs",
            Category::DocReports => "doc_reports",
            Category::DocGuides => "doc_guides",
            Category::DocMisc => "doc_misc",
        }
    }

    /// True for the three categories under `docs/`.
    pub fn is_doc(&self) -> bool {
        matches!(
            self,
            Category::DocReports | Category::DocGuides | Category::DocMisc
        )
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Applies the classification rules to file names.
///
/// Rules are evaluated in a fixed order and the first match wins:
/// exclusions, test pages, test scripts, test styles, test data, results and
/// logs, documentation, then literal overrides.
#[derive(Debug, Clone)]
pub struct Classifier {
    test_token: Regex,
    data_name: Regex,
    result_name: Regex,
    report_doc: Regex,
    guide_doc: Regex,
    excluded_names: HashSet<String>,
    overrides: HashMap<String, Category>,
}

impl Classifier {
    /// Creates a classifier with the built-in tables only.
    pub fn new() -> Self {
        Self {
            test_token: case_insensitive(TEST_TOKEN_PATTERN),
            data_name: case_insensitive(DATA_NAME_PATTERN),
            result_name: case_insensitive(RESULT_NAME_PATTERN),
            report_doc: case_insensitive(REPORT_DOC_PATTERN),
            guide_doc: case_insensitive(GUIDE_DOC_PATTERN),
            excluded_names: EXCLUDED_NAMES.iter().map(|n| n.to_string()).collect(),
            overrides: LITERAL_OVERRIDES
                .iter()
                .map(|(name, category)| (name.to_lowercase(), *category))
                .collect(),
        }
    }

    /// Adds file names that must never be moved.
    pub fn with_exclusions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_names
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Adds literal file name overrides on top of the built-in table.
    pub fn with_overrides<I, S>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (S, Category)>,
        S: AsRef<str>,
    {
        for (name, category) in overrides {
            self.overrides.insert(name.as_ref().to_lowercase(), category);
        }
        self
    }

    /// Classifies a path on disk. Anything that is not a regular file stays put.
    pub fn classify(&self, path: &Path) -> Option<Category> {
        if !path.is_file() {
            return None;
        }
        let name = path.file_name()?.to_str()?;
        self.classify_name(name)
    }

    /// Classifies a bare file name without touching the filesystem.
    pub fn classify_name(&self, name: &str) -> Option<Category> {
        if self.is_excluded(name) {
            return None;
        }

        let lower = name.to_lowercase();
        let ext = extension_of(&lower);
        let has_token = self.test_token.is_match(&lower);

        if has_token && PAGE_EXTS.contains(&ext) {
            return Some(Category::TestPage);
        }
        if has_token && SCRIPT_EXTS.contains(&ext) {
            return Some(Category::TestScript);
        }
        if has_token && STYLE_EXTS.contains(&ext) {
            return Some(Category::TestStyle);
        }
        if DATA_EXTS.contains(&ext) && (has_token || self.data_name.is_match(&lower)) {
            return Some(Category::TestData);
        }
        if LOG_EXTS.contains(&ext)
            || (RESULT_EXTS.contains(&ext) && self.result_name.is_match(&lower))
        {
            return Some(Category::TestResultsLogs);
        }
        if DOC_EXTS.contains(&ext) {
            if self.report_doc.is_match(name) {
                return Some(Category::DocReports);
            }
            if self.guide_doc.is_match(name) {
                return Some(Category::DocGuides);
            }
            return Some(Category::DocMisc);
        }

        self.overrides.get(&lower).copied()
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.excluded_names.contains(name) || is_move_log_name(name)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

/// True for file names produced by [`crate::move_log::MoveLog::write`].
pub fn is_move_log_name(name: &str) -> bool {
    name.starts_with(MOVE_LOG_PREFIX) && name.ends_with(".json")
}

fn case_insensitive(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("built-in classification pattern is valid")
}

/// Extension without the dot, following `Path::extension` rules: a leading
/// dot alone (".gitignore") is not an extension.
fn extension_of(name: &str) -> &str {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
}
