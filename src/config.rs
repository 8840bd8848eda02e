//! Optional TOML configuration.
//!
//! Every section extends the built-in tables, it never replaces them:
//!
//! ```toml
//! [walk]
//! ignore_dirs = ["target", "coverage"]
//!
//! [exclude]
//! filenames = ["main.html"]
//! patterns = ["legacy/**"]
//! regex = ['^draft_']
//!
//! [overrides]
//! "particles-demo.json" = "test_data"
//! ```
//!
//! Glob patterns are matched against the path relative to the organized
//! root; regexes are matched against the file name.

use crate::file_category::{Category, Classifier};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the organized root.
pub const LOCAL_CONFIG_NAME: &str = ".tidyws.toml";

/// Errors that can occur during configuration loading and compilation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidGlobPattern { pattern: String, reason: String },
    /// Invalid regex pattern provided.
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },
    /// IO error while reading configuration.
    #[error("IO error reading configuration: {0}")]
    IoError(String),
}

/// Deserialized configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub walk: WalkRules,
    pub exclude: ExcludeRules,
    /// Literal file names mapped straight to a category.
    pub overrides: BTreeMap<String, Category>,
}

/// Traversal settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkRules {
    /// Directory names pruned in addition to the built-in ignore set.
    pub ignore_dirs: Vec<String>,
}

/// Files that must never be moved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcludeRules {
    /// Exact file names.
    pub filenames: Vec<String>,
    /// Glob patterns on the root-relative path.
    pub patterns: Vec<String>,
    /// Regex patterns on the file name.
    pub regex: Vec<String>,
}

impl Config {
    /// Load configuration, falling back to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, if given (must exist)
    /// 2. `.tidyws.toml` in the organized root
    /// 3. `~/.config/tidyws/config.toml`
    /// 4. built-in defaults
    pub fn load(config_path: Option<&Path>, root: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = root.join(LOCAL_CONFIG_NAME);
        if local_config.is_file() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("tidyws")
                .join("config.toml");
            if home_config.is_file() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }
        log::debug!("Loading configuration from {}", path.display());

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Validate patterns and build the classifier and path filters.
    pub fn compile(self) -> Result<CompiledConfig, ConfigError> {
        let exclude_patterns = self
            .exclude
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|e| ConfigError::InvalidGlobPattern {
                    pattern: pattern.clone(),
                    reason: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let exclude_regexes = self
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let classifier = Classifier::new()
            .with_exclusions(self.exclude.filenames)
            .with_overrides(self.overrides);

        Ok(CompiledConfig {
            classifier,
            extra_ignore_dirs: self.walk.ignore_dirs.into_iter().collect(),
            exclude_patterns,
            exclude_regexes,
        })
    }
}

/// Configuration with every pattern compiled, ready for a walk.
#[derive(Debug, Clone)]
pub struct CompiledConfig {
    pub classifier: Classifier,
    extra_ignore_dirs: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
}

impl CompiledConfig {
    /// True if a directory name was added to the ignore set by configuration.
    pub fn ignores_dir(&self, name: &str) -> bool {
        self.extra_ignore_dirs.contains(name)
    }

    /// True if a file is excluded by a glob or regex rule.
    ///
    /// `relative_path` is the path below the organized root.
    pub fn is_excluded(&self, relative_path: &Path) -> bool {
        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative_path))
        {
            return true;
        }

        let file_name = relative_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        self.exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
    }
}

impl Default for CompiledConfig {
    fn default() -> Self {
        Self {
            classifier: Classifier::new(),
            extra_ignore_dirs: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
        }
    }
}
