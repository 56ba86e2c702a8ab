//! Search state: the constraint store and the (partial) assignment.
//!
//! Both are cloned at every branch point of the search. They are backed by
//! persistent maps, so a clone is constant time and a branch only copies the
//! path it changes. Version sets are shared behind `Rc`.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use im::OrdMap;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::graph::LibraryName;
use crate::version::VersionSet;

/// Versions still permitted for each constrained library.
///
/// A library without an entry is unconstrained: every version the graph
/// knows is still possible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Available {
    sets: OrdMap<LibraryName, Rc<VersionSet>>,
}

impl Available {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, library: &str) -> Option<&VersionSet> {
        self.sets.get(library).map(Rc::as_ref)
    }

    pub fn insert(&mut self, library: impl Into<LibraryName>, versions: VersionSet) {
        self.sets.insert(library.into(), Rc::new(versions));
    }

    pub fn remove(&mut self, library: &str) -> Option<Rc<VersionSet>> {
        self.sets.remove(library)
    }

    pub fn contains(&self, library: &str) -> bool {
        self.sets.contains_key(library)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LibraryName, &VersionSet)> + '_ {
        self.sets.iter().map(|(k, v)| (k, v.as_ref()))
    }

    /// Combine with newly discovered requirements.
    ///
    /// Every name from either side is kept. Names present on both sides end
    /// up with the intersection of their sets.
    pub fn merge(&self, incoming: &BTreeMap<LibraryName, VersionSet>) -> Available {
        let mut merged = self.clone();
        for (name, versions) in incoming {
            let narrowed = match self.sets.get(name) {
                Some(existing) => existing.intersection(versions),
                None => versions.clone(),
            };
            merged.sets.insert(name.clone(), Rc::new(narrowed));
        }
        merged
    }

    /// Libraries left with no permitted version.
    pub fn starved(&self) -> Vec<LibraryName> {
        self.sets
            .iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(k, _)| k.clone())
            .collect()
    }
}

impl fmt::Display for Available {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (name, versions)) in self.sets.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {versions}")?;
        }
        f.write_str("]")
    }
}

/// One chosen version per library.
///
/// Serializes as a flat table (`name = "version"`), sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    chosen: OrdMap<LibraryName, Version>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, library: &str) -> Option<&Version> {
        self.chosen.get(library)
    }

    /// Fix `library` at `version`, returning the previous choice if any.
    pub fn insert(&mut self, library: impl Into<LibraryName>, version: Version) -> Option<Version> {
        self.chosen.insert(library.into(), version)
    }

    pub fn contains(&self, library: &str) -> bool {
        self.chosen.contains_key(library)
    }

    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LibraryName, &Version)> + '_ {
        self.chosen.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &LibraryName> + '_ {
        self.chosen.keys()
    }
}

impl IntoIterator for Configuration {
    type Item = (LibraryName, Version);
    type IntoIter = <OrdMap<LibraryName, Version> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.chosen.into_iter()
    }
}

impl FromIterator<(LibraryName, Version)> for Configuration {
    fn from_iter<I: IntoIterator<Item = (LibraryName, Version)>>(iter: I) -> Self {
        Self {
            chosen: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, version)) in self.chosen.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {version}")?;
        }
        f.write_str("}")
    }
}
