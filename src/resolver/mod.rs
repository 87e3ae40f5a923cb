//! Dependency resolution
//!
//! Collects the exact-version artifacts a project uses at compile and run
//! time by walking the project graph exported by the build.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use license_core::{ArtifactId, CoreError};
use serde::{Deserialize, Serialize};

/// An artifact pulled in by the build, with its local file if known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub id: ArtifactId,
    pub file: Option<PathBuf>,
}

/// Errors that can occur while resolving dependencies
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Failed to read dependency graph {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse dependency graph: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Project '{0}' is referenced but not defined in the dependency graph")]
    UnknownProject(String),

    #[error("Project '{0}' is defined more than once in the dependency graph")]
    DuplicateProject(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Produces the resolved artifact set of a project
pub trait DependencyResolver {
    /// Artifacts used by `project` and the subprojects it depends on,
    /// deduplicated by exact identity in first-seen order.
    fn resolve(
        &self,
        project: &str,
        ignored_groups: &[String],
        ignored_projects: &[String],
    ) -> Result<Vec<ResolvedArtifact>, ResolveError>;
}

/// Project graph export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectGraph {
    /// Project to start resolution from
    pub root: String,

    #[serde(default)]
    pub projects: Vec<ProjectNode>,
}

/// One (sub)project of the build
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectNode {
    pub name: String,

    /// External artifacts, as `group:name:version` descriptors
    #[serde(default)]
    pub dependencies: Vec<DependencyRef>,

    /// Names of subprojects this project depends on
    #[serde(default)]
    pub project_dependencies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyRef {
    pub artifact: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Resolver backed by a project graph file
#[derive(Debug, Clone)]
pub struct GraphFileResolver {
    graph: ProjectGraph,
}

impl GraphFileResolver {
    pub fn new(graph: ProjectGraph) -> Self {
        Self { graph }
    }

    /// Load the graph from a JSON file
    pub fn load(path: &Path) -> Result<Self, ResolveError> {
        let content = std::fs::read_to_string(path).map_err(|source| ResolveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ResolveError> {
        let graph: ProjectGraph = serde_json::from_str(content)?;
        Ok(Self::new(graph))
    }

    /// Root project named by the graph
    pub fn root(&self) -> &str {
        &self.graph.root
    }

    fn index(&self) -> Result<HashMap<&str, &ProjectNode>, ResolveError> {
        let mut index = HashMap::with_capacity(self.graph.projects.len());
        for node in &self.graph.projects {
            if index.insert(node.name.as_str(), node).is_some() {
                return Err(ResolveError::DuplicateProject(node.name.clone()));
            }
        }
        Ok(index)
    }
}

impl DependencyResolver for GraphFileResolver {
    fn resolve(
        &self,
        project: &str,
        ignored_groups: &[String],
        ignored_projects: &[String],
    ) -> Result<Vec<ResolvedArtifact>, ResolveError> {
        let index = self.index()?;
        let mut visited: HashSet<&str> = HashSet::new();
        let mut seen: HashSet<ArtifactId> = HashSet::new();
        let mut artifacts = Vec::new();
        let mut stack = vec![project];

        while let Some(name) = stack.pop() {
            if ignored_projects.iter().any(|p| p == name) {
                tracing::debug!("Skipping ignored project {}", name);
                continue;
            }
            if !visited.insert(name) {
                continue;
            }

            let node = index
                .get(name)
                .ok_or_else(|| ResolveError::UnknownProject(name.to_string()))?;

            for dep in &node.dependencies {
                let id = ArtifactId::parse(&dep.artifact)?;
                if ignored_groups.iter().any(|g| *g == id.group) {
                    continue;
                }
                if seen.insert(id.clone()) {
                    artifacts.push(ResolvedArtifact {
                        id,
                        file: dep.file.clone(),
                    });
                }
            }

            // reversed so subprojects are visited in declaration order
            stack.extend(node.project_dependencies.iter().rev().map(String::as_str));
        }

        tracing::debug!("Resolved {} artifacts from project {}", artifacts.len(), project);
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAPH: &str = r#"{
        "root": "app",
        "projects": [
            {
                "name": "app",
                "dependencies": [
                    { "artifact": "com.a:lib:1.2.0", "file": "/m2/lib-1.2.0.jar" },
                    { "artifact": "com.internal:tools:1.0" }
                ],
                "projectDependencies": ["core", "sample"]
            },
            {
                "name": "core",
                "dependencies": [
                    { "artifact": "com.b:other:2.0.0" },
                    { "artifact": "com.a:lib:1.2.0" }
                ],
                "projectDependencies": ["app"]
            },
            {
                "name": "sample",
                "dependencies": [{ "artifact": "com.c:demo:0.1" }]
            }
        ]
    }"#;

    fn descriptors(artifacts: &[ResolvedArtifact]) -> Vec<String> {
        artifacts.iter().map(|a| a.id.to_string()).collect()
    }

    #[test]
    fn test_resolve_follows_subprojects_and_dedups() {
        let resolver = GraphFileResolver::parse(GRAPH).unwrap();
        let artifacts = resolver.resolve(resolver.root(), &[], &[]).unwrap();

        assert_eq!(
            descriptors(&artifacts),
            vec!["com.a:lib:1.2.0", "com.internal:tools:1.0", "com.b:other:2.0.0", "com.c:demo:0.1"]
        );
        assert_eq!(artifacts[0].file, Some(PathBuf::from("/m2/lib-1.2.0.jar")));
    }

    #[test]
    fn test_ignored_groups_and_projects() {
        let resolver = GraphFileResolver::parse(GRAPH).unwrap();
        let artifacts = resolver
            .resolve(
                "app",
                &["com.internal".to_string()],
                &["sample".to_string()],
            )
            .unwrap();

        assert_eq!(descriptors(&artifacts), vec!["com.a:lib:1.2.0", "com.b:other:2.0.0"]);
    }

    #[test]
    fn test_unknown_project_is_fatal() {
        let resolver = GraphFileResolver::parse(
            r#"{ "root": "app", "projects": [{ "name": "app", "projectDependencies": ["missing"] }] }"#,
        )
        .unwrap();

        assert!(matches!(
            resolver.resolve("app", &[], &[]),
            Err(ResolveError::UnknownProject(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_malformed_descriptor_is_fatal() {
        let resolver = GraphFileResolver::parse(
            r#"{ "root": "app", "projects": [{ "name": "app", "dependencies": [{ "artifact": "broken" }] }] }"#,
        )
        .unwrap();

        assert!(matches!(
            resolver.resolve("app", &[], &[]),
            Err(ResolveError::Core(CoreError::MalformedIdentity(_)))
        ));
    }

    #[test]
    fn test_duplicate_project_rejected() {
        let resolver = GraphFileResolver::parse(
            r#"{ "root": "app", "projects": [{ "name": "app" }, { "name": "app" }] }"#,
        )
        .unwrap();

        assert!(matches!(
            resolver.resolve("app", &[], &[]),
            Err(ResolveError::DuplicateProject(_))
        ));
    }
}
