//! License manifest persistence
//!
//! The manifest is a YAML sequence of entries, one per library:
//!
//! ```yaml
//! - artifact: com.squareup.okhttp3:okhttp:+
//!   name: OkHttp
//!   copyrightHolder: Square, Inc.
//!   year: 2016
//!   license: The Apache Software License, Version 2.0
//!   licenseUrl: https://www.apache.org/licenses/LICENSE-2.0.txt
//!   url: https://github.com/square/okhttp
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use license_core::{ManifestEntry, RecordSet};

/// Errors that can occur when loading or saving the manifest
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to access manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Source and sink of manifest records
pub trait ManifestStore {
    /// Load all entries in file order
    fn load(&self) -> Result<RecordSet, ManifestError>;

    /// Replace the manifest with `entries`
    fn save(&self, entries: &[ManifestEntry]) -> Result<(), ManifestError>;
}

/// Manifest stored as a YAML file
#[derive(Debug, Clone)]
pub struct YamlManifestStore {
    path: PathBuf,
}

impl YamlManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> ManifestError {
        ManifestError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn yaml_error(&self, source: serde_yaml::Error) -> ManifestError {
        ManifestError::Yaml {
            path: self.path.clone(),
            source,
        }
    }
}

/// Parse manifest text into records, preserving entry order
pub fn parse_manifest(content: &str) -> Result<RecordSet, serde_yaml::Error> {
    let has_entries = content.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    });
    if !has_entries {
        return Ok(RecordSet::new());
    }
    let entries: Vec<ManifestEntry> = serde_yaml::from_str(content)?;
    Ok(entries
        .into_iter()
        .map(ManifestEntry::into_record)
        .collect())
}

/// Render entries as manifest text
pub fn render_manifest(entries: &[ManifestEntry]) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(entries)
}

impl ManifestStore for YamlManifestStore {
    fn load(&self) -> Result<RecordSet, ManifestError> {
        if !self.path.exists() {
            tracing::warn!(
                "Manifest {} does not exist; treating it as empty",
                self.path.display()
            );
            return Ok(RecordSet::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let records = parse_manifest(&content).map_err(|e| self.yaml_error(e))?;
        tracing::debug!("Loaded {} manifest entries from {}", records.len(), self.path.display());
        Ok(records)
    }

    fn save(&self, entries: &[ManifestEntry]) -> Result<(), ManifestError> {
        let yaml = render_manifest(entries).map_err(|e| self.yaml_error(e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        // Write to temp file first, then rename over the manifest
        let temp_path = self.path.with_extension("yml.tmp");
        fs::write(&temp_path, yaml).map_err(|e| self.io_error(e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(e))?;

        tracing::info!("Rewrote manifest {} ({} entries)", self.path.display(), entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use license_core::{ArtifactId, LibraryRecord, PLACEHOLDER_LICENSE};
    use tempfile::TempDir;

    #[test]
    fn test_parse_manifest_entries() {
        let content = r#"
- artifact: com.a:lib:+
  name: Lib
  copyrightHolder: Acme
  year: 2015
  license: MIT
  licenseUrl: https://opensource.org/licenses/MIT
  url: https://example.com/lib
- artifact: com.b:internal:+
  skip: true
"#;

        let records = parse_manifest(content).unwrap();
        assert_eq!(records.len(), 2);

        let lib = records.find(&ArtifactId::new("com.a", "lib", "+")).unwrap();
        assert_eq!(lib.library_name.as_deref(), Some("Lib"));
        assert_eq!(lib.year.as_deref(), Some("2015"));
        assert_eq!(lib.license.as_deref(), Some("MIT"));
        assert!(!lib.skip);

        let internal = records.find(&ArtifactId::new("com.b", "internal", "+")).unwrap();
        assert!(internal.skip);
        assert_eq!(internal.license, None);
    }

    #[test]
    fn test_parse_empty_manifest() {
        assert!(parse_manifest("").unwrap().is_empty());
        assert!(parse_manifest("# nothing yet\n").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_artifact_is_an_error() {
        assert!(parse_manifest("- artifact: not-a-descriptor\n").is_err());
    }

    #[test]
    fn test_save_then_load_keeps_placeholders() {
        let dir = TempDir::new().unwrap();
        let store = YamlManifestStore::new(dir.path().join("licenses.yml"));

        let mut record = LibraryRecord::new(ArtifactId::new("com.b", "other", "2.0.0"));
        record.library_name = Some("Other".to_string());
        let entries = vec![ManifestEntry::with_placeholders(&record)];
        store.save(&entries).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("com.b:other:+"));
        assert!(text.contains("#LICENSE#"));
        assert!(!text.contains("skip"));
        assert!(!dir.path().join("licenses.yml.tmp").exists());

        let loaded = store.load().unwrap();
        let other = loaded.find(&ArtifactId::new("com.b", "other", "+")).unwrap();
        assert_eq!(other.license.as_deref(), Some(PLACEHOLDER_LICENSE));
        assert_eq!(other.library_name.as_deref(), Some("Other"));
    }

    #[test]
    fn test_missing_manifest_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = YamlManifestStore::new(dir.path().join("absent.yml"));
        assert!(store.load().unwrap().is_empty());
    }
}
