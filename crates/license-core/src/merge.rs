//! Report-time merge of manifest records with their resolved counterparts.

use crate::error::{CoreError, InsufficientRecords};
use crate::record::LibraryRecord;
use crate::record_set::RecordSet;

/// Merge a manifest record with its resolved counterpart, if any.
///
/// Precedence:
///
/// | field       | rule                                   |
/// |-------------|----------------------------------------|
/// | license     | manifest value, resolved fills a gap   |
/// | url         | manifest value, resolved fills a gap   |
/// | artifact_id | always the exact resolved identity     |
/// | filename    | always the resolved file               |
///
/// Every other field comes from the manifest. The manifest record itself is
/// never modified.
pub fn merge(manifest_record: &LibraryRecord, resolved: &RecordSet) -> LibraryRecord {
    let mut merged = manifest_record.clone();
    let Some(found) = resolved.find_declared(&manifest_record.artifact_id) else {
        return merged;
    };

    if merged.license_value().is_none() {
        merged.license = found.license.clone();
    }
    if merged.url_value().is_none() {
        merged.url = found.url.clone();
    }
    merged.artifact_id = found.artifact_id.clone();
    merged.filename = found.filename.clone();
    merged
}

/// Merge every non-skipped manifest record, in manifest order.
///
/// Insufficient records do not stop the run; they are collected and
/// reported together once all records have been merged.
pub fn merge_all(
    manifest: &RecordSet,
    resolved: &RecordSet,
) -> Result<Vec<LibraryRecord>, CoreError> {
    let mut merged = Vec::with_capacity(manifest.len());
    let mut insufficient = Vec::new();

    for record in manifest.iter().filter(|r| !r.skip) {
        let candidate = merge(record, resolved);
        match assert_sufficient(candidate) {
            Ok(ok) => merged.push(ok),
            Err(CoreError::NotEnoughInformation(bad)) => insufficient.push(*bad),
            Err(other) => return Err(other),
        }
    }

    if insufficient.is_empty() {
        Ok(merged)
    } else {
        Err(CoreError::Insufficient(InsufficientRecords {
            records: insufficient,
        }))
    }
}

fn assert_sufficient(record: LibraryRecord) -> Result<LibraryRecord, CoreError> {
    if record.is_sufficient() {
        Ok(record)
    } else {
        Err(CoreError::NotEnoughInformation(Box::new(record)))
    }
}
