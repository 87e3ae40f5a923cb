//! Tool-level errors and stable exit codes

use license_core::CoreError;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::manifest::ManifestError;
use crate::report::ReportError;
use crate::resolver::ResolveError;

/// Stable process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ExitCode {
    /// Manifest and build agree; reports written
    Success = 0,
    /// Manifest did not match the resolved dependencies
    ManifestMismatch = 1,
    /// Some records lack license or copyright information
    NotEnoughInformation = 2,
    /// Configuration, I/O or malformed input
    Fatal = 3,
}

impl ExitCode {
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }
}

/// Errors surfaced by the tasks
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Dependency resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Report output failed: {0}")]
    Report(#[from] ReportError),

    /// Manifest was out of date; it has been rewritten and needs review
    #[error(
        "license manifest {manifest} was out of date ({undocumented} undocumented, {stale} stale); \
         it has been rewritten, review it and fill in any placeholders"
    )]
    ManifestMismatch {
        manifest: String,
        undocumented: usize,
        stale: usize,
    },
}

impl ToolError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            ToolError::ManifestMismatch { .. } => ExitCode::ManifestMismatch,
            ToolError::Core(CoreError::Insufficient(_))
            | ToolError::Core(CoreError::NotEnoughInformation(_)) => ExitCode::NotEnoughInformation,
            _ => ExitCode::Fatal,
        }
    }
}
