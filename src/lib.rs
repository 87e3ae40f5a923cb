//! License Tools - third-party license manifest checker and report generator
//!
//! Reconciles a project's resolved dependencies against a hand-maintained
//! license manifest, rewrites the manifest when the two drift apart, and
//! renders HTML and JSON license reports from the merged records.

pub mod config;
pub mod error;
pub mod manifest;
pub mod metadata;
pub mod report;
pub mod resolver;
pub mod tasks;

pub use config::{ConfigError, LicenseToolsConfig};
pub use error::{ExitCode, ToolError};
pub use manifest::{ManifestStore, YamlManifestStore};
pub use metadata::{ArtifactMetadata, MetadataFetcher, PomMetadataFetcher};
pub use report::{FsReportWriter, ReportWriter};
pub use resolver::{DependencyResolver, GraphFileResolver, ResolvedArtifact};
pub use tasks::{CheckOutcome, Tasks};
