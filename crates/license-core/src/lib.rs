//! Reconciliation and merge engine for third-party license manifests.
//!
//! Two sets of library records are compared by artifact identity: the
//! hand-maintained manifest and the set resolved from the current build.
//! The engine diffs them, rewrites the manifest when they drift apart, and
//! merges both sides into validated report payloads.

mod error;
mod identity;
mod merge;
mod reconcile;
mod record;
mod record_set;
mod report;

pub use error::{CoreError, InsufficientRecords};
pub use identity::{ArtifactId, MatchMode, WILDCARD_VERSION};
pub use merge::{merge, merge_all};
pub use reconcile::{ManifestEntry, Reconciler, Reconciliation};
pub use record::{
    escape_html, is_placeholder, normalize_license, LibraryRecord, MissingField,
    PLACEHOLDER_COPYRIGHT_HOLDER, PLACEHOLDER_LICENSE, PLACEHOLDER_LICENSE_URL, PLACEHOLDER_NAME,
    PLACEHOLDER_URL, PLACEHOLDER_YEAR,
};
pub use record_set::RecordSet;
pub use report::{assemble, ArtifactPayload, LicenseEntry};
