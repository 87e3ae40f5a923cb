//! Core error types.

use std::fmt;

use crate::record::{LibraryRecord, MissingField};

/// Errors raised by the reconciliation and merge engine.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Descriptor did not split into `group:name:version`.
    #[error("malformed artifact descriptor '{0}': expected group:name:version")]
    MalformedIdentity(String),

    /// A single record lacks the metadata required for reporting.
    #[error("not enough information for {}", .0.artifact_id)]
    NotEnoughInformation(Box<LibraryRecord>),

    /// One or more records failed the sufficiency check.
    #[error("{0}")]
    Insufficient(InsufficientRecords),
}

/// Every record that failed the sufficiency check during one report run.
#[derive(Debug, Clone, PartialEq)]
pub struct InsufficientRecords {
    pub records: Vec<LibraryRecord>,
}

impl InsufficientRecords {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl fmt::Display for InsufficientRecords {
    /// Renders one manifest-shaped block per record, with a placeholder for
    /// each missing field, so the text can be pasted into the manifest.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "not enough license information for {} librar{}; fill in the following manifest fields:",
            self.records.len(),
            if self.records.len() == 1 { "y" } else { "ies" }
        )?;
        for record in &self.records {
            writeln!(f, "- artifact: {}", record.artifact_id.with_wildcard_version())?;
            for field in record.missing_fields() {
                writeln!(f, "  {}: {}", field.key(), field.placeholder())?;
            }
        }
        Ok(())
    }
}

impl MissingField {
    /// Manifest key for this field.
    pub fn key(&self) -> &'static str {
        match self {
            MissingField::License => "license",
            MissingField::CopyrightHolder => "copyrightHolder",
            MissingField::Year => "year",
        }
    }
}
