//! Report payloads built from merged, validated records.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::merge::merge_all;
use crate::record::LibraryRecord;
use crate::record_set::RecordSet;

/// Identity block of a report entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPayload {
    pub name: String,
    pub group: String,
    pub version: String,
}

/// One library as it appears in the HTML and JSON reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseEntry {
    pub notice: Option<String>,
    pub copyright_holder: Option<String>,
    pub copyright_statement: Option<String>,
    pub license: Option<String>,
    pub license_url: Option<String>,
    pub normalized_license: Option<String>,
    pub year: Option<String>,
    pub url: Option<String>,
    pub library_name: String,
    pub artifact_id: ArtifactPayload,
}

impl From<&LibraryRecord> for LicenseEntry {
    fn from(record: &LibraryRecord) -> Self {
        let owned = |v: Option<&str>| v.map(str::to_string);
        Self {
            notice: owned(record.notice_value()),
            copyright_holder: owned(record.copyright_holder_value()),
            copyright_statement: record.copyright_statement(),
            license: owned(record.license_value()),
            license_url: owned(record.license_url_value()),
            normalized_license: record.normalized_license(),
            year: owned(record.year_value()),
            url: owned(record.url_value()),
            library_name: record.display_name().to_string(),
            artifact_id: ArtifactPayload {
                name: record.artifact_id.name.clone(),
                group: record.artifact_id.group.clone(),
                version: record.artifact_id.version.clone(),
            },
        }
    }
}

/// Merge and validate every reportable manifest record and turn the result
/// into payloads in manifest order.
///
/// Nothing is returned unless every record is sufficient, so callers
/// cannot write a partial report.
pub fn assemble(manifest: &RecordSet, resolved: &RecordSet) -> Result<Vec<LicenseEntry>, CoreError> {
    let merged = merge_all(manifest, resolved)?;
    Ok(merged.iter().map(LicenseEntry::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::ArtifactId;

    fn record(descriptor: &str, license: &str) -> LibraryRecord {
        let mut r = LibraryRecord::new(ArtifactId::parse(descriptor).unwrap());
        r.license = Some(license.to_string());
        r.copyright_holder = Some("Acme".to_string());
        r.year = Some("2021".to_string());
        r
    }

    #[test]
    fn test_payload_fields() {
        let manifest: RecordSet = vec![record("com.a:lib:+", "MIT")].into_iter().collect();
        let resolved: RecordSet = vec![LibraryRecord::new(ArtifactId::parse("com.a:lib:1.2.0").unwrap())]
            .into_iter()
            .collect();

        let entries = assemble(&manifest, &resolved).unwrap();
        assert_eq!(entries.len(), 1);

        let json = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(json["artifactId"]["version"], "1.2.0");
        assert_eq!(json["artifactId"]["group"], "com.a");
        assert_eq!(json["license"], "MIT");
        assert_eq!(json["normalizedLicense"], "mit");
        assert_eq!(json["libraryName"], "lib");
        assert_eq!(json["copyrightStatement"], "Copyright © 2021 Acme. All rights reserved.");
        assert!(json["notice"].is_null());
    }

    #[test]
    fn test_payload_order_follows_manifest() {
        let manifest: RecordSet = vec![
            record("z:zeta:+", "MIT"),
            record("a:alpha:+", "ISC"),
        ]
        .into_iter()
        .collect();

        let entries = assemble(&manifest, &RecordSet::new()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.library_name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_no_payloads_on_failure() {
        let mut bad = record("b:bad:+", "MIT");
        bad.license = None;
        let manifest: RecordSet = vec![record("a:good:+", "MIT"), bad].into_iter().collect();

        assert!(matches!(
            assemble(&manifest, &RecordSet::new()),
            Err(CoreError::Insufficient(list)) if list.len() == 1
        ));
    }
}
