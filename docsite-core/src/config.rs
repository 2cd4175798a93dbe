//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name looked up by the CLI
pub const CONFIG_FILE_NAME: &str = "docsite.yml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Main configuration struct matching the docsite.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub header: HeaderConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub title: String,

    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_source")]
    pub source: PathBuf,

    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Copied verbatim into the output root when it exists
    #[serde(rename = "static", default = "default_static")]
    pub static_dir: PathBuf,
}

fn default_source() -> PathBuf {
    PathBuf::from("src")
}

fn default_output() -> PathBuf {
    PathBuf::from("dist")
}

fn default_static() -> PathBuf {
    PathBuf::from("static")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            output: default_output(),
            static_dir: default_static(),
        }
    }
}

/// Links shown in the page header
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeaderConfig {
    #[serde(default)]
    pub github_link: Option<String>,

    #[serde(default)]
    pub github_contribution_link: Option<String>,

    #[serde(default)]
    pub internals: Vec<HeaderLink>,

    #[serde(default)]
    pub externals: Vec<HeaderLink>,

    #[serde(default)]
    pub dropdowns: Vec<Dropdown>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderLink {
    pub header: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dropdown {
    pub title: String,

    #[serde(default)]
    pub items: Vec<DropdownItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownItem {
    pub title: String,
    pub link: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig {
                title: String::from("Documentation"),
                description: String::new(),
            },
            paths: PathsConfig::default(),
            header: HeaderConfig::default(),
            config_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Parse configuration from YAML text; paths stay relative to the
    /// working directory
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)?;
        if config.site.title.trim().is_empty() {
            return Err(ConfigError::MissingField("site.title".to_string()));
        }
        Ok(config)
    }

    /// Default configuration whose relative paths resolve next to `path`,
    /// used when the config file does not exist
    pub fn default_at<P: AsRef<Path>>(path: P) -> Self {
        Self {
            config_path: Some(path.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    /// Directory that relative paths resolve against
    pub fn base_dir(&self) -> PathBuf {
        self.resolve_path(Path::new("."))
    }

    /// Get the markdown source directory, resolved relative to config file
    pub fn source_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.source)
    }

    /// Get the output directory, resolved relative to config file
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.output)
    }

    /// Get the static assets directory, resolved relative to config file
    pub fn static_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.static_dir)
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(config_path) = &self.config_path {
            if let Some(parent) = config_path.parent() {
                parent.join(path)
            } else {
                path.to_path_buf()
            }
        } else {
            path.to_path_buf()
        }
    }
}
