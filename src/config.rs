//! Sorter configuration.
//!
//! Configuration is read from a TOML file and covers where to sort, where
//! the rule record lives, and which directory entries to leave alone:
//!
//! ```toml
//! [paths]
//! target_dir = "/home/me/Downloads"
//! rules_file = "/home/me/.local/share/rulesort/rules.json"
//!
//! [filters]
//! enable_hidden_files = false
//!
//! [filters.exclude]
//! filenames = ["desktop.ini"]
//! patterns = ["*.part", "*.crdownload"]
//! ```
//!
//! Every key is optional.

use crate::error::ConfigError;
use crate::store::RULES_FILE_NAME;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_NAME: &str = ".rulesortrc.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SorterConfig {
    #[serde(default)]
    pub paths: PathSettings,
    #[serde(default)]
    pub filters: EntryFilters,
}

/// Locations of the sorted directory and the rule record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathSettings {
    /// Directory to sort. Defaults to the platform download directory.
    #[serde(default)]
    pub target_dir: Option<PathBuf>,

    /// Rule record. Defaults to `rules.json` beside the executable.
    #[serde(default)]
    pub rules_file: Option<PathBuf>,
}

/// Which directory entries take part in sorting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryFilters {
    /// Sort dot-files too. Off by default.
    #[serde(default)]
    pub enable_hidden_files: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,
}

/// Entries never moved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact file names.
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the file name.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl SorterConfig {
    /// Loads configuration, falling back to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, if given
    /// 2. `.rulesortrc.toml` in the current directory
    /// 3. `<config dir>/rulesort/config.toml`
    /// 4. built-in defaults
    ///
    /// # Errors
    ///
    /// Returns an error if `config_path` does not exist, or if the file that
    /// was found cannot be read or parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_NAME);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("rulesort").join("config.toml");
            if user_config.exists() {
                return Self::load_from_file(&user_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = toml::from_str(&content).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Directory to sort: the configured one, else the platform download dir.
    pub fn target_dir(&self) -> Result<PathBuf, ConfigError> {
        self.paths
            .target_dir
            .clone()
            .or_else(dirs::download_dir)
            .ok_or(ConfigError::NoTargetDir)
    }

    /// Rule record path: the configured one, else `rules.json` beside the
    /// running executable, else `rules.json` in the current directory.
    pub fn rules_file(&self) -> PathBuf {
        if let Some(path) = &self.paths.rules_file {
            return path.clone();
        }

        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(RULES_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(RULES_FILE_NAME))
    }

    /// Compiles the entry filters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidGlobPattern` for a pattern that does not parse.
    pub fn entry_filter(&self) -> Result<EntryFilter, ConfigError> {
        EntryFilter::new(&self.filters)
    }
}

/// Compiled form of [`EntryFilters`].
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
}

impl EntryFilter {
    fn new(filters: &EntryFilters) -> Result<Self, ConfigError> {
        let exclude_patterns = filters
            .exclude
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|source| ConfigError::InvalidGlobPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: filters.enable_hidden_files,
            exclude_filenames: filters.exclude.filenames.iter().cloned().collect(),
            exclude_patterns,
        })
    }

    /// Whether the entry named `file_name` should be sorted.
    pub fn accepts(&self, file_name: &str) -> bool {
        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name) {
            return false;
        }

        !self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches(file_name))
    }
}
