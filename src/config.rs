//! Configuration file loading and the resolved run configuration.
//!
//! The config file is TOML with two sections. Each list may be written as a
//! comma separated string or as an array of strings:
//!
//! ```toml
//! [exclude]
//! formats = "tmp, bak"
//!
//! [exclude_folders]
//! names = ["node_modules", ".git"]
//! ```
//!
//! A missing or malformed file never stops a run; it is logged and treated as
//! an empty configuration.

use crate::file_organizer::OrganizeOptions;
use crate::filters::FilterSet;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the default configuration, placed next to the executable.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors that can occur while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("IO error reading configuration: {0}")]
    IoError(#[from] std::io::Error),
}

/// A list written either as `"a, b"` or as `["a", "b"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ListValue {
    Csv(String),
    Items(Vec<String>),
}

impl Default for ListValue {
    fn default() -> Self {
        ListValue::Items(Vec::new())
    }
}

impl ListValue {
    /// Trimmed, non-empty entries in file order.
    pub fn entries(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            ListValue::Csv(text) => text.split(',').collect(),
            ListValue::Items(items) => items.iter().map(String::as_str).collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeSection {
    #[serde(default)]
    pub formats: ListValue,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeFoldersSection {
    #[serde(default)]
    pub names: ListValue,
}

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub exclude: ExcludeSection,
    #[serde(default)]
    pub exclude_folders: ExcludeFoldersSection,
}

impl FileConfig {
    /// Loads `path`, falling back to an empty configuration on any error.
    pub fn load(path: &Path) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => {
                tracing::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(ConfigError::ConfigNotFound(_)) => {
                tracing::info!(
                    "No configuration file at {}, using defaults",
                    path.display()
                );
                Self::default()
            }
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if the file does not exist,
    /// `ConfigError::ConfigInvalid` if TOML parsing fails and
    /// `ConfigError::IoError` if the file cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Excluded extension tokens, uppercased.
    pub fn exclude_formats(&self) -> Vec<String> {
        self.exclude
            .formats
            .entries()
            .into_iter()
            .map(|format| format.to_uppercase())
            .collect()
    }

    /// Excluded folder names, case preserved.
    pub fn exclude_folders(&self) -> Vec<String> {
        self.exclude_folders.names.entries()
    }
}

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub root: PathBuf,
    pub filters: FilterSet,
    pub options: OrganizeOptions,
    pub verbose: bool,
}

impl RunConfig {
    /// Merges command-line lists with the config file. Command-line values come
    /// first; both only ever widen the filters.
    pub fn resolve(
        root: PathBuf,
        cli_exclude: &[String],
        cli_include: &[String],
        file_config: &FileConfig,
        options: OrganizeOptions,
        verbose: bool,
    ) -> Self {
        let exclude_formats = cli_exclude
            .iter()
            .cloned()
            .chain(file_config.exclude_formats());
        let filters = FilterSet::new(exclude_formats, file_config.exclude_folders(), cli_include);

        Self {
            root,
            filters,
            options,
            verbose,
        }
    }
}

/// Directory holding the executable, or the current directory as a fallback.
pub fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    install_dir().join(CONFIG_FILE_NAME)
}
