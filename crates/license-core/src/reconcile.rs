//! Manifest reconciliation: diff the manifest against the resolved set and
//! rebuild the manifest when they disagree.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::identity::{ArtifactId, MatchMode};
use crate::record::{
    LibraryRecord, PLACEHOLDER_COPYRIGHT_HOLDER, PLACEHOLDER_LICENSE, PLACEHOLDER_LICENSE_URL,
    PLACEHOLDER_NAME, PLACEHOLDER_URL, PLACEHOLDER_YEAR,
};
use crate::record_set::RecordSet;

/// One manifest entry in its persisted shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub artifact: ArtifactId,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar")]
    pub copyright_holder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar")]
    pub year: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar")]
    pub license: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar")]
    pub license_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar")]
    pub notice: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub skip: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Accept strings and bare numbers (`year: 2015`) alike.
fn scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
        Flag(bool),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|s| match s {
        Scalar::Text(t) => t,
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Flag(b) => b.to_string(),
    }))
}

impl ManifestEntry {
    /// Entry re-emitting a known record, artifact in wildcard form.
    pub fn from_record(record: &LibraryRecord) -> Self {
        Self {
            artifact: record.artifact_id.with_wildcard_version(),
            name: record.library_name.clone(),
            copyright_holder: record.copyright_holder.clone(),
            year: record.year.clone(),
            license: record.license.clone(),
            license_url: record.license_url.clone(),
            url: record.url.clone(),
            notice: record.notice.clone(),
            skip: record.skip,
        }
    }

    /// Entry for a newly discovered dependency; every field resolution left
    /// empty gets its placeholder token.
    pub fn with_placeholders(record: &LibraryRecord) -> Self {
        fn or_token(value: Option<&str>, token: &str) -> Option<String> {
            Some(value.unwrap_or(token).to_string())
        }

        let name = record.library_name.as_deref().map(str::trim).filter(|n| !n.is_empty());
        Self {
            artifact: record.artifact_id.with_wildcard_version(),
            name: or_token(name, PLACEHOLDER_NAME),
            copyright_holder: or_token(record.copyright_holder_value(), PLACEHOLDER_COPYRIGHT_HOLDER),
            year: or_token(record.year_value(), PLACEHOLDER_YEAR),
            license: or_token(record.license_value(), PLACEHOLDER_LICENSE),
            license_url: or_token(record.license_url_value(), PLACEHOLDER_LICENSE_URL),
            url: or_token(record.url_value(), PLACEHOLDER_URL),
            notice: record.notice_value().map(str::to_string),
            skip: record.skip,
        }
    }

    pub fn into_record(self) -> LibraryRecord {
        LibraryRecord {
            artifact_id: self.artifact,
            library_name: self.name,
            copyright_holder: self.copyright_holder,
            year: self.year,
            license: self.license,
            license_url: self.license_url,
            url: self.url,
            notice: self.notice,
            skip: self.skip,
            filename: None,
        }
    }
}

/// Two-way diff between the manifest and the resolved set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reconciliation {
    /// Resolved dependencies the manifest does not list
    pub undocumented: Vec<LibraryRecord>,
    /// Manifest entries no longer resolved
    pub stale: Vec<LibraryRecord>,
}

impl Reconciliation {
    pub fn is_ok(&self) -> bool {
        self.undocumented.is_empty() && self.stale.is_empty()
    }
}

/// Diffs a manifest against a resolved set and rebuilds the manifest.
pub struct Reconciler<'a> {
    manifest: &'a RecordSet,
    resolved: &'a RecordSet,
}

impl<'a> Reconciler<'a> {
    pub fn new(manifest: &'a RecordSet, resolved: &'a RecordSet) -> Self {
        Self { manifest, resolved }
    }

    pub fn diff(&self) -> Reconciliation {
        Reconciliation {
            undocumented: self.resolved.not_listed_in(self.manifest, MatchMode::Declared),
            stale: self.manifest.not_listed_in(self.resolved, MatchMode::Declared),
        }
    }

    /// Rebuilt manifest, or `None` when nothing changed.
    ///
    /// Retained entries keep their manifest order; undocumented ones follow
    /// in resolved order. Entries collapsing onto the same wildcard identity
    /// are written once.
    pub fn rewrite(&self, diff: &Reconciliation) -> Option<Vec<ManifestEntry>> {
        if diff.is_ok() {
            return None;
        }

        let stale: HashSet<&ArtifactId> = diff.stale.iter().map(|r| &r.artifact_id).collect();
        let mut written = HashSet::new();
        let mut entries = Vec::with_capacity(self.manifest.len() + diff.undocumented.len());

        for record in self.manifest.iter().filter(|r| !stale.contains(&r.artifact_id)) {
            if written.insert(record.artifact_id.with_wildcard_version()) {
                entries.push(ManifestEntry::from_record(record));
            }
        }
        for record in &diff.undocumented {
            if written.insert(record.artifact_id.with_wildcard_version()) {
                entries.push(ManifestEntry::with_placeholders(record));
            }
        }

        Some(entries)
    }
}
