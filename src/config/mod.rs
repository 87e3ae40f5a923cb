//! Tool configuration
//!
//! Parses `.license-tools.toml`. Every key is optional; a missing file
//! yields the built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default configuration file, relative to the project root
pub const DEFAULT_CONFIG_PATH: &str = ".license-tools.toml";

/// Static configuration for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LicenseToolsConfig {
    /// Hand-maintained license manifest (default: "licenses.yml")
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Project graph exported by the build (default: "build/dependency-graph.json")
    #[serde(default = "default_dependency_graph")]
    pub dependency_graph: PathBuf,

    /// Dependency groups excluded from resolution
    #[serde(default)]
    pub ignored_groups: Vec<String>,

    /// Subprojects neither reported nor traversed
    #[serde(default)]
    pub ignored_projects: Vec<String>,

    /// Local Maven-layout repositories searched for POM metadata, in order
    #[serde(default = "default_pom_repositories")]
    pub pom_repositories: Vec<String>,

    /// Report output directory (default: "build/licenses")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// HTML report file name (default: "licenses.html")
    #[serde(default = "default_html_filename")]
    pub html_filename: String,

    /// JSON report file name (default: "licenses.json")
    #[serde(default = "default_json_filename")]
    pub json_filename: String,
}

fn default_manifest() -> PathBuf {
    PathBuf::from("licenses.yml")
}

fn default_dependency_graph() -> PathBuf {
    PathBuf::from("build/dependency-graph.json")
}

fn default_pom_repositories() -> Vec<String> {
    vec!["~/.m2/repository".to_string()]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("build/licenses")
}

fn default_html_filename() -> String {
    "licenses.html".to_string()
}

fn default_json_filename() -> String {
    "licenses.json".to_string()
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl Default for LicenseToolsConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            dependency_graph: default_dependency_graph(),
            ignored_groups: Vec::new(),
            ignored_projects: Vec::new(),
            pom_repositories: default_pom_repositories(),
            output_dir: default_output_dir(),
            html_filename: default_html_filename(),
            json_filename: default_json_filename(),
        }
    }
}

impl LicenseToolsConfig {
    /// Load configuration from `path`, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: LicenseToolsConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("html_filename", &self.html_filename),
            ("json_filename", &self.json_filename),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "file name cannot be empty".to_string(),
                });
            }
            if value.contains('/') || value.contains('\\') {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "file name must not contain a path separator".to_string(),
                });
            }
        }

        if self.manifest.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "manifest".to_string(),
                reason: "manifest path cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Repository paths with a leading `~/` resolved against `HOME`
    pub fn expanded_pom_repositories(&self) -> Vec<PathBuf> {
        self.pom_repositories
            .iter()
            .map(|p| {
                if let Some(rest) = p.strip_prefix("~/") {
                    if let Ok(home) = std::env::var("HOME") {
                        return PathBuf::from(home).join(rest);
                    }
                }
                PathBuf::from(p)
            })
            .collect()
    }

    pub fn html_path(&self) -> PathBuf {
        self.output_dir.join(&self.html_filename)
    }

    pub fn json_path(&self) -> PathBuf {
        self.output_dir.join(&self.json_filename)
    }
}
