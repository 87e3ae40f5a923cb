//! License report rendering and output
//!
//! Two independent artifacts are produced from the same payloads: an HTML
//! page for humans and a JSON list for tooling.

pub mod html;
pub mod json;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use license_core::LicenseEntry;

/// Errors that can occur when writing reports
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to write report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Serializes report payloads
pub trait ReportWriter {
    /// Write the HTML page, returning its path
    fn write_html(&self, entries: &[LicenseEntry]) -> Result<PathBuf, ReportError>;

    /// Write the JSON list, returning its path
    fn write_json(&self, entries: &[LicenseEntry]) -> Result<PathBuf, ReportError>;
}

/// Writes reports into an output directory
#[derive(Debug, Clone)]
pub struct FsReportWriter {
    output_dir: PathBuf,
    html_filename: String,
    json_filename: String,
}

impl FsReportWriter {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        html_filename: impl Into<String>,
        json_filename: impl Into<String>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            html_filename: html_filename.into(),
            json_filename: json_filename.into(),
        }
    }

    fn write(&self, filename: &str, content: &str) -> Result<PathBuf, ReportError> {
        let path = self.output_dir.join(filename);
        let io_err = |source| ReportError::Io {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(&self.output_dir).map_err(io_err)?;
        fs::write(&path, content).map_err(io_err)?;
        tracing::info!("Wrote {}", path.display());
        Ok(path)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl ReportWriter for FsReportWriter {
    fn write_html(&self, entries: &[LicenseEntry]) -> Result<PathBuf, ReportError> {
        let page = html::render(entries, Utc::now());
        self.write(&self.html_filename, &page)
    }

    fn write_json(&self, entries: &[LicenseEntry]) -> Result<PathBuf, ReportError> {
        let text = json::render(entries)?;
        self.write(&self.json_filename, &text)
    }
}
