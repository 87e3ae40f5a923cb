//! Insertion-ordered collection of library records keyed by identity.

use std::collections::HashMap;

use crate::identity::{ArtifactId, MatchMode};
use crate::record::LibraryRecord;

/// Records keyed by exact artifact identity, iterated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    records: Vec<LibraryRecord>,
    index: HashMap<ArtifactId, usize>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record`, overwriting any record with the same identity in place.
    pub fn add(&mut self, record: LibraryRecord) {
        match self.index.get(&record.artifact_id) {
            Some(&pos) => self.records[pos] = record,
            None => {
                self.index.insert(record.artifact_id.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Exact-match lookup.
    pub fn find(&self, id: &ArtifactId) -> Option<&LibraryRecord> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    /// First record matching `id` with wildcard-aware comparison.
    pub fn find_declared(&self, id: &ArtifactId) -> Option<&LibraryRecord> {
        self.find(id).or_else(|| {
            self.records
                .iter()
                .find(|r| r.artifact_id.matches(id, MatchMode::Declared))
        })
    }

    pub fn contains(&self, id: &ArtifactId, mode: MatchMode) -> bool {
        match mode {
            MatchMode::Exact => self.index.contains_key(id),
            MatchMode::Declared => self.find_declared(id).is_some(),
        }
    }

    /// Records of `self` with no match in `other`, in `self`'s order.
    ///
    /// Asymmetric: call it twice with the sets swapped to get both sides
    /// of a diff.
    pub fn not_listed_in(&self, other: &RecordSet, mode: MatchMode) -> Vec<LibraryRecord> {
        self.records
            .iter()
            .filter(|r| !other.contains(&r.artifact_id, mode))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LibraryRecord> {
        self.records.iter()
    }
}

impl FromIterator<LibraryRecord> for RecordSet {
    fn from_iter<I: IntoIterator<Item = LibraryRecord>>(iter: I) -> Self {
        let mut set = RecordSet::new();
        for record in iter {
            set.add(record);
        }
        set
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a LibraryRecord;
    type IntoIter = std::slice::Iter<'a, LibraryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl IntoIterator for RecordSet {
    type Item = LibraryRecord;
    type IntoIter = std::vec::IntoIter<LibraryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
