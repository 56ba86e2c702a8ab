//! The dependency graph: every known `(library, version) -> (dependency, version)` fact.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use semver::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conflict::{ConflictReport, Violation};
use crate::constraints::Configuration;
use crate::resolver::{ResolutionError, Resolver};
use crate::version::VersionSet;

/// Name of a library, the unit of resolution.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryName(String);

impl LibraryName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LibraryName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LibraryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LibraryName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for LibraryName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&LibraryName> for LibraryName {
    fn from(name: &LibraryName) -> Self {
        name.clone()
    }
}

impl fmt::Display for LibraryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One exact variant of a library.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UniqueLibrary {
    pub name: LibraryName,
    pub version: Version,
}

impl UniqueLibrary {
    pub fn new(name: impl Into<LibraryName>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

impl fmt::Display for UniqueLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// Failure to parse a `name@version` string.
#[derive(Debug, Error)]
pub enum ParseLibraryError {
    #[error("expected `name@version`, found `{0}`")]
    MissingVersion(String),
    #[error("library name is empty in `{0}`")]
    EmptyName(String),
    #[error("invalid version in `{input}`: {source}")]
    InvalidVersion {
        input: String,
        #[source]
        source: semver::Error,
    },
}

impl FromStr for UniqueLibrary {
    type Err = ParseLibraryError;

    /// Parses `name@version`. The last `@` separates the version, so scoped
    /// names such as `@scope/pkg@1.0.0` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, version) = s
            .rsplit_once('@')
            .ok_or_else(|| ParseLibraryError::MissingVersion(s.to_string()))?;
        if name.is_empty() {
            return Err(ParseLibraryError::EmptyName(s.to_string()));
        }
        let version = Version::parse(version).map_err(|source| {
            ParseLibraryError::InvalidVersion {
                input: s.to_string(),
                source,
            }
        })?;
        Ok(Self::new(name, version))
    }
}

/// A recorded fact: `from` requires `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyEdge<'a> {
    pub from: &'a UniqueLibrary,
    pub to: &'a UniqueLibrary,
}

/// All known dependency facts, backed by petgraph.
///
/// Nodes are distinct `(library, version)` pairs; every `add_edge` call adds
/// one graph edge, so repeated facts are kept side by side.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<UniqueLibrary, ()>,
    /// Lookup from library name and version to node index.
    index: HashMap<LibraryName, HashMap<Version, NodeIndex>>,
    /// Versions each library is known to exist in.
    versions: BTreeMap<LibraryName, VersionSet>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, name: LibraryName, version: Version) -> NodeIndex {
        if let Some(&idx) = self.index.get(&name).and_then(|vs| vs.get(&version)) {
            return idx;
        }
        let idx = self
            .graph
            .add_node(UniqueLibrary::new(name.clone(), version.clone()));
        self.index.entry(name).or_default().insert(version, idx);
        idx
    }

    fn find(&self, library: &str, version: &Version) -> Option<NodeIndex> {
        self.index.get(library)?.get(version).copied()
    }

    /// Record that `library@library_version` accepts `dependency@dependency_version`.
    pub fn add_edge(
        &mut self,
        library: impl Into<LibraryName>,
        library_version: Version,
        dependency: impl Into<LibraryName>,
        dependency_version: Version,
    ) {
        let library = library.into();
        self.versions
            .entry(library.clone())
            .or_default()
            .add(library_version.clone());
        let from = self.node(library, library_version);
        let to = self.node(dependency.into(), dependency_version);
        self.graph.add_edge(from, to, ());
    }

    /// Register a version that has no dependencies of its own.
    pub fn add_version(&mut self, library: impl Into<LibraryName>, version: Version) {
        let library = library.into();
        self.versions
            .entry(library.clone())
            .or_default()
            .add(version.clone());
        self.node(library, version);
    }

    /// Every version of `library` that is the source of an edge or was
    /// registered with [`add_version`](Self::add_version).
    pub fn versions_of(&self, library: &str) -> VersionSet {
        self.versions.get(library).cloned().unwrap_or_default()
    }

    /// What `library@version` requires, grouped by dependency name.
    ///
    /// Each dependency maps to the union of the versions accepted across all
    /// matching edges.
    pub fn dependencies_of(
        &self,
        library: &str,
        version: &Version,
    ) -> BTreeMap<LibraryName, VersionSet> {
        let mut deps: BTreeMap<LibraryName, VersionSet> = BTreeMap::new();
        let Some(idx) = self.find(library, version) else {
            return deps;
        };
        for edge in self.graph.edges(idx) {
            let target = &self.graph[edge.target()];
            deps.entry(target.name.clone())
                .or_default()
                .add(target.version.clone());
        }
        deps
    }

    /// Names of every library with at least one known version.
    pub fn libraries(&self) -> impl Iterator<Item = &LibraryName> + '_ {
        self.versions.keys()
    }

    /// All recorded edges, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = DependencyEdge<'_>> + '_ {
        self.graph.edge_references().map(|e| DependencyEdge {
            from: &self.graph[e.source()],
            to: &self.graph[e.target()],
        })
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of distinct `(library, version)` pairs mentioned.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Resolve `names` with the default resolver configuration.
    pub fn resolve<I>(&self, names: I) -> Result<Configuration, ResolutionError>
    where
        I: IntoIterator,
        I::Item: Into<LibraryName>,
    {
        Resolver::new(self).resolve(names)
    }

    /// Check an assignment against every requirement of the versions it chose.
    pub fn verify(&self, config: &Configuration) -> ConflictReport {
        let mut report = ConflictReport::new();
        for (library, version) in config.iter() {
            for (dependency, permitted) in self.dependencies_of(library.as_str(), version) {
                let chosen = config.get(dependency.as_str()).cloned();
                match chosen {
                    Some(ref c) if permitted.contains(c) => {}
                    _ => report.add(Violation {
                        library: UniqueLibrary::new(library, version.clone()),
                        dependency,
                        permitted,
                        chosen,
                    }),
                }
            }
        }
        report
    }

    /// Render the chosen versions as a tree rooted at `roots`.
    ///
    /// Libraries reached twice along one path are printed but not expanded.
    pub fn print_tree<S: AsRef<str>>(&self, config: &Configuration, roots: &[S]) -> String {
        let mut output = String::new();
        let mut visited = HashSet::new();
        for root in roots {
            let Some(version) = config.get(root.as_ref()) else {
                continue;
            };
            let node = UniqueLibrary::new(root.as_ref(), version.clone());
            output.push_str(&format!("{node}\n"));
            visited.insert(node.name.clone());
            let children = self.chosen_children(config, &node);
            let count = children.len();
            for (i, child) in children.into_iter().enumerate() {
                self.print_subtree(&mut output, config, child, "", i == count - 1, &mut visited);
            }
            visited.remove(&node.name);
        }
        output
    }

    fn chosen_children(&self, config: &Configuration, node: &UniqueLibrary) -> Vec<UniqueLibrary> {
        self.dependencies_of(node.name.as_str(), &node.version)
            .into_keys()
            .filter_map(|dep| {
                let version = config.get(dep.as_str())?.clone();
                Some(UniqueLibrary::new(dep, version))
            })
            .collect()
    }

    fn print_subtree(
        &self,
        output: &mut String,
        config: &Configuration,
        node: UniqueLibrary,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<LibraryName>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{prefix}{connector}{node}\n"));

        if !visited.insert(node.name.clone()) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let children = self.chosen_children(config, &node);
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.print_subtree(output, config, child, &child_prefix, i == count - 1, visited);
        }

        visited.remove(&node.name);
    }
}
