//! Task orchestration
//!
//! Wires the collaborators together for the three tasks:
//! - `check-licenses`: reconcile the manifest with the build, rewriting it once on drift
//! - `generate-license-page`: check, then merge and write the HTML page
//! - `generate-license-json`: check, then merge and write the JSON list

use std::path::PathBuf;

use license_core::{assemble, LibraryRecord, Reconciler, Reconciliation, RecordSet};
use serde::Serialize;

use crate::config::LicenseToolsConfig;
use crate::error::ToolError;
use crate::manifest::ManifestStore;
use crate::metadata::MetadataFetcher;
use crate::report::ReportWriter;
use crate::resolver::DependencyResolver;

/// Both record sets of one run
#[derive(Debug, Clone)]
pub struct Inputs {
    pub manifest: RecordSet,
    pub resolved: RecordSet,
}

/// Result of reconciling the manifest with the build
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub reconciliation: Reconciliation,
    pub manifest_rewritten: bool,
}

impl CheckOutcome {
    pub fn is_ok(&self) -> bool {
        self.reconciliation.is_ok()
    }
}

/// Output format of a report task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Html,
    Json,
}

/// Collaborators and configuration for one invocation
pub struct Tasks<'a> {
    pub config: &'a LicenseToolsConfig,
    pub project: &'a str,
    pub store: &'a dyn ManifestStore,
    pub resolver: &'a dyn DependencyResolver,
    pub fetcher: &'a dyn MetadataFetcher,
}

impl<'a> Tasks<'a> {
    /// Resolve the build's dependencies and attach per-artifact metadata.
    ///
    /// A failed metadata lookup leaves that record's license fields empty.
    pub fn collect_resolved(&self) -> Result<RecordSet, ToolError> {
        let artifacts = self.resolver.resolve(
            self.project,
            &self.config.ignored_groups,
            &self.config.ignored_projects,
        )?;

        let mut resolved = RecordSet::new();
        for artifact in artifacts {
            let mut record = LibraryRecord::new(artifact.id);
            record.filename = artifact.file;

            match self.fetcher.fetch(&record.artifact_id) {
                Ok(metadata) => {
                    record.library_name = metadata.library_name;
                    record.url = metadata.url;
                    record.license = metadata.license;
                    record.license_url = metadata.license_url;
                }
                Err(e) => {
                    tracing::warn!("License metadata unavailable for {}: {}", record.artifact_id, e);
                }
            }
            resolved.add(record);
        }

        tracing::info!("Resolved {} dependencies", resolved.len());
        Ok(resolved)
    }

    /// Load the manifest and the resolved set
    pub fn load_inputs(&self) -> Result<Inputs, ToolError> {
        let manifest = self.store.load()?;
        tracing::info!("Manifest lists {} libraries", manifest.len());
        let resolved = self.collect_resolved()?;
        Ok(Inputs { manifest, resolved })
    }

    /// Diff the manifest against the build and rewrite it if they differ
    pub fn reconcile(&self, inputs: &Inputs) -> Result<CheckOutcome, ToolError> {
        let reconciler = Reconciler::new(&inputs.manifest, &inputs.resolved);
        let reconciliation = reconciler.diff();

        for record in &reconciliation.undocumented {
            tracing::warn!("Not documented in the manifest: {}", record.artifact_id);
        }
        for record in &reconciliation.stale {
            tracing::warn!("No longer a dependency: {}", record.artifact_id);
        }

        let manifest_rewritten = match reconciler.rewrite(&reconciliation) {
            Some(entries) => {
                self.store.save(&entries)?;
                true
            }
            None => false,
        };

        Ok(CheckOutcome {
            reconciliation,
            manifest_rewritten,
        })
    }

    /// `check-licenses`: fails with [`ToolError::ManifestMismatch`] on drift
    pub fn check_licenses(&self) -> Result<Inputs, ToolError> {
        let inputs = self.load_inputs()?;
        let outcome = self.reconcile(&inputs)?;
        ensure_reconciled(self.config, &outcome)?;
        tracing::info!("License manifest is up to date");
        Ok(inputs)
    }

    /// `generate-license-page`
    pub fn generate_license_page(&self, writer: &dyn ReportWriter) -> Result<PathBuf, ToolError> {
        self.generate(ReportKind::Html, writer)
    }

    /// `generate-license-json`
    pub fn generate_license_json(&self, writer: &dyn ReportWriter) -> Result<PathBuf, ToolError> {
        self.generate(ReportKind::Json, writer)
    }

    fn generate(&self, kind: ReportKind, writer: &dyn ReportWriter) -> Result<PathBuf, ToolError> {
        let inputs = self.check_licenses()?;
        let entries = assemble(&inputs.manifest, &inputs.resolved)?;
        tracing::debug!("Assembled {} report entries", entries.len());

        let path = match kind {
            ReportKind::Html => writer.write_html(&entries)?,
            ReportKind::Json => writer.write_json(&entries)?,
        };
        Ok(path)
    }
}

/// Turn a non-ok reconciliation into an error
pub fn ensure_reconciled(
    config: &LicenseToolsConfig,
    outcome: &CheckOutcome,
) -> Result<(), ToolError> {
    if outcome.is_ok() {
        return Ok(());
    }
    Err(ToolError::ManifestMismatch {
        manifest: config.manifest.display().to_string(),
        undocumented: outcome.reconciliation.undocumented.len(),
        stale: outcome.reconciliation.stale.len(),
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::manifest::ManifestError;
    use crate::metadata::{ArtifactMetadata, MetadataFetchError};
    use crate::resolver::{ResolveError, ResolvedArtifact};
    use license_core::{ArtifactId, CoreError, ManifestEntry};

    struct MemoryStore {
        records: RecordSet,
        saved: RefCell<Option<Vec<ManifestEntry>>>,
    }

    impl ManifestStore for MemoryStore {
        fn load(&self) -> Result<RecordSet, ManifestError> {
            Ok(self.records.clone())
        }

        fn save(&self, entries: &[ManifestEntry]) -> Result<(), ManifestError> {
            *self.saved.borrow_mut() = Some(entries.to_vec());
            Ok(())
        }
    }

    struct FixedResolver(Vec<&'static str>);

    impl DependencyResolver for FixedResolver {
        fn resolve(
            &self,
            _project: &str,
            ignored_groups: &[String],
            _ignored_projects: &[String],
        ) -> Result<Vec<ResolvedArtifact>, ResolveError> {
            let mut out = Vec::new();
            for d in &self.0 {
                let id = ArtifactId::parse(d)?;
                if !ignored_groups.contains(&id.group) {
                    out.push(ResolvedArtifact { id, file: None });
                }
            }
            Ok(out)
        }
    }

    struct MapFetcher(HashMap<&'static str, &'static str>);

    impl MetadataFetcher for MapFetcher {
        fn fetch(&self, id: &ArtifactId) -> Result<ArtifactMetadata, MetadataFetchError> {
            match self.0.get(id.to_string().as_str()) {
                Some(license) => Ok(ArtifactMetadata {
                    license: Some(license.to_string()),
                    ..ArtifactMetadata::default()
                }),
                None => Err(MetadataFetchError::NotFound(id.clone())),
            }
        }
    }

    struct NullWriter;

    impl ReportWriter for NullWriter {
        fn write_html(&self, _: &[license_core::LicenseEntry]) -> Result<PathBuf, crate::report::ReportError> {
            Ok(PathBuf::from("out.html"))
        }

        fn write_json(&self, _: &[license_core::LicenseEntry]) -> Result<PathBuf, crate::report::ReportError> {
            Ok(PathBuf::from("out.json"))
        }
    }

    fn manifest_record(descriptor: &str, license: &str) -> LibraryRecord {
        let mut r = LibraryRecord::new(ArtifactId::parse(descriptor).unwrap());
        r.license = Some(license.to_string());
        r.copyright_holder = Some("Acme".to_string());
        r
    }

    fn store(records: Vec<LibraryRecord>) -> MemoryStore {
        MemoryStore {
            records: records.into_iter().collect(),
            saved: RefCell::new(None),
        }
    }

    #[test]
    fn test_fetch_failure_degrades_record() {
        let config = LicenseToolsConfig::default();
        let store = store(vec![]);
        let resolver = FixedResolver(vec!["com.a:lib:1.0", "com.b:other:2.0"]);
        let fetcher = MapFetcher(HashMap::from([("com.a:lib:1.0", "MIT")]));
        let tasks = Tasks { config: &config, project: "app", store: &store, resolver: &resolver, fetcher: &fetcher };

        let resolved = tasks.collect_resolved().unwrap();
        assert_eq!(resolved.len(), 2);
        let other = resolved.find(&ArtifactId::new("com.b", "other", "2.0")).unwrap();
        assert_eq!(other.license, None);
        let lib = resolved.find(&ArtifactId::new("com.a", "lib", "1.0")).unwrap();
        assert_eq!(lib.license.as_deref(), Some("MIT"));
    }

    #[test]
    fn test_check_rewrites_once_and_fails() {
        let config = LicenseToolsConfig::default();
        let store = store(vec![manifest_record("com.a:lib:+", "MIT")]);
        let resolver = FixedResolver(vec!["com.a:lib:1.2.0", "com.b:other:2.0.0"]);
        let fetcher = MapFetcher(HashMap::new());
        let tasks = Tasks { config: &config, project: "app", store: &store, resolver: &resolver, fetcher: &fetcher };

        let err = tasks.check_licenses().unwrap_err();
        assert!(matches!(err, ToolError::ManifestMismatch { undocumented: 1, stale: 0, .. }));

        let saved = store.saved.borrow();
        let saved = saved.as_ref().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[1].artifact.to_string(), "com.b:other:+");
    }

    #[test]
    fn test_check_ok_writes_nothing() {
        let config = LicenseToolsConfig::default();
        let store = store(vec![manifest_record("com.a:lib:+", "MIT")]);
        let resolver = FixedResolver(vec!["com.a:lib:1.2.0"]);
        let fetcher = MapFetcher(HashMap::new());
        let tasks = Tasks { config: &config, project: "app", store: &store, resolver: &resolver, fetcher: &fetcher };

        tasks.check_licenses().unwrap();
        assert!(store.saved.borrow().is_none());
    }

    #[test]
    fn test_generate_reports_insufficient_records() {
        let config = LicenseToolsConfig::default();
        let mut no_holder = manifest_record("com.a:lib:+", "MIT");
        no_holder.copyright_holder = None;
        let store = store(vec![no_holder]);
        let resolver = FixedResolver(vec!["com.a:lib:1.2.0"]);
        let fetcher = MapFetcher(HashMap::new());
        let tasks = Tasks { config: &config, project: "app", store: &store, resolver: &resolver, fetcher: &fetcher };

        let err = tasks.generate_license_json(&NullWriter).unwrap_err();
        assert!(matches!(err, ToolError::Core(CoreError::Insufficient(ref list)) if list.len() == 1));
    }

    #[test]
    fn test_generate_after_successful_check() {
        let config = LicenseToolsConfig::default();
        let store = store(vec![manifest_record("com.a:lib:+", "MIT")]);
        let resolver = FixedResolver(vec!["com.a:lib:1.2.0"]);
        let fetcher = MapFetcher(HashMap::new());
        let tasks = Tasks { config: &config, project: "app", store: &store, resolver: &resolver, fetcher: &fetcher };

        assert_eq!(tasks.generate_license_page(&NullWriter).unwrap(), PathBuf::from("out.html"));
    }
}
