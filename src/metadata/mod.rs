//! Per-artifact license metadata lookup

mod pom;

pub use pom::{parse_pom, PomDocument, PomMetadataFetcher};

use std::path::PathBuf;

use license_core::ArtifactId;
use serde::{Deserialize, Serialize};

/// Descriptive metadata published with an artifact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub library_name: Option<String>,
    pub url: Option<String>,
    pub license: Option<String>,
    pub license_url: Option<String>,
}

/// Errors from a single metadata lookup; never fatal for the run
#[derive(Debug, thiserror::Error)]
pub enum MetadataFetchError {
    #[error("No metadata found for {0}")]
    NotFound(ArtifactId),

    #[error("Failed to read metadata {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed metadata for {id}: {reason}")]
    Malformed { id: ArtifactId, reason: String },
}

/// Looks up descriptive metadata for one artifact
pub trait MetadataFetcher {
    fn fetch(&self, id: &ArtifactId) -> Result<ArtifactMetadata, MetadataFetchError>;
}
