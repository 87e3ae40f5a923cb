//! POM metadata from local Maven-layout repositories

use std::collections::HashSet;
use std::path::PathBuf;

use license_core::ArtifactId;
use regex_lite::Regex;

use super::{ArtifactMetadata, MetadataFetchError, MetadataFetcher};

/// Parent POMs followed when a POM declares no license
const MAX_PARENT_DEPTH: usize = 5;

/// Blocks whose `<name>`/`<url>` children must not be taken for the project's own
const NESTED_BLOCKS: &[&str] = &[
    "parent",
    "licenses",
    "organization",
    "developers",
    "contributors",
    "scm",
    "issueManagement",
    "ciManagement",
    "mailingLists",
    "distributionManagement",
    "dependencyManagement",
    "dependencies",
    "repositories",
    "pluginRepositories",
    "build",
    "reporting",
    "profiles",
];

/// The parts of a POM this tool reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomDocument {
    pub name: Option<String>,
    pub url: Option<String>,
    pub license_name: Option<String>,
    pub license_url: Option<String>,
    pub parent: Option<ArtifactId>,
}

/// Extract name, url, first license and parent coordinates from POM text
pub fn parse_pom(xml: &str) -> PomDocument {
    let comments = Regex::new(r"(?s)<!--.*?-->").expect("static regex");
    let xml = comments.replace_all(xml, "");

    let license = extract_block(&xml, "licenses")
        .and_then(|licenses| extract_block(licenses, "license"))
        .map(|license| {
            (
                extract_xml_tag(license, "name"),
                extract_xml_tag(license, "url"),
            )
        });

    let parent = extract_block(&xml, "parent").and_then(|p| {
        match (
            extract_xml_tag(p, "groupId"),
            extract_xml_tag(p, "artifactId"),
            extract_xml_tag(p, "version"),
        ) {
            (Some(g), Some(a), Some(v)) => Some(ArtifactId::new(g, a, v)),
            _ => None,
        }
    });

    let mut top_level = xml.into_owned();
    for block in NESTED_BLOCKS {
        top_level = strip_block(&top_level, block);
    }

    let (license_name, license_url) = license.unwrap_or((None, None));
    PomDocument {
        name: extract_xml_tag(&top_level, "name"),
        url: extract_xml_tag(&top_level, "url"),
        license_name,
        license_url,
        parent,
    }
}

/// Reads `<name>-<version>.pom` files from local repositories
#[derive(Debug, Clone)]
pub struct PomMetadataFetcher {
    repositories: Vec<PathBuf>,
}

impl PomMetadataFetcher {
    pub fn new(repositories: Vec<PathBuf>) -> Self {
        Self { repositories }
    }

    /// Relative location of an artifact's POM in a Maven-layout repository
    pub fn pom_path(id: &ArtifactId) -> PathBuf {
        let mut path: PathBuf = id.group.split('.').collect();
        path.push(&id.name);
        path.push(&id.version);
        path.push(format!("{}-{}.pom", id.name, id.version));
        path
    }

    fn read_pom(&self, id: &ArtifactId) -> Result<PomDocument, MetadataFetchError> {
        let relative = Self::pom_path(id);
        let Some(path) = self
            .repositories
            .iter()
            .map(|repo| repo.join(&relative))
            .find(|candidate| candidate.is_file())
        else {
            return Err(MetadataFetchError::NotFound(id.clone()));
        };

        tracing::debug!("Reading POM {}", path.display());
        let content = std::fs::read_to_string(&path)
            .map_err(|source| MetadataFetchError::Io { path, source })?;
        if !content.contains("<project") {
            return Err(MetadataFetchError::Malformed {
                id: id.clone(),
                reason: "missing <project> element".to_string(),
            });
        }
        Ok(parse_pom(&content))
    }
}

impl MetadataFetcher for PomMetadataFetcher {
    fn fetch(&self, id: &ArtifactId) -> Result<ArtifactMetadata, MetadataFetchError> {
        let pom = self.read_pom(id)?;
        let mut metadata = ArtifactMetadata {
            library_name: pom.name,
            url: pom.url,
            license: pom.license_name,
            license_url: pom.license_url,
        };

        let mut visited = HashSet::from([id.clone()]);
        let mut parent = pom.parent;
        let mut depth = 0;

        while metadata.license.is_none() && depth < MAX_PARENT_DEPTH {
            let Some(parent_id) = parent.take() else { break };
            if !visited.insert(parent_id.clone()) {
                break;
            }
            depth += 1;

            let parent_pom = match self.read_pom(&parent_id) {
                Ok(p) => p,
                Err(e) => {
                    tracing::debug!("Parent POM of {} unavailable: {}", id, e);
                    break;
                }
            };
            metadata.license = parent_pom.license_name;
            metadata.license_url = metadata.license_url.or(parent_pom.license_url);
            metadata.url = metadata.url.or(parent_pom.url);
            parent = parent_pom.parent;
        }

        Ok(metadata)
    }
}

fn extract_block<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)?;
    Some(&xml[start..start + end])
}

fn extract_xml_tag(xml: &str, tag: &str) -> Option<String> {
    extract_block(xml, tag)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn strip_block(xml: &str, tag: &str) -> String {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;
    while let Some(start) = rest.find(&open) {
        out.push_str(&rest[..start]);
        match rest[start..].find(&close) {
            Some(end) => rest = &rest[start + end + close.len()..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}
