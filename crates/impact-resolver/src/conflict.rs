//! Reporting requirements that an assignment fails to honour.

use std::fmt;

use semver::Version;

use crate::graph::{LibraryName, UniqueLibrary};
use crate::version::VersionSet;

/// Every violated requirement found by [`DependencyGraph::verify`](crate::graph::DependencyGraph::verify).
#[derive(Debug, Default)]
pub struct ConflictReport {
    pub violations: Vec<Violation>,
}

/// A chosen library whose requirement on `dependency` is not met.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub library: UniqueLibrary,
    pub dependency: LibraryName,
    pub permitted: VersionSet,
    /// `None` when the dependency was left out of the assignment.
    pub chosen: Option<Version>,
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            return write!(f, "No version conflicts.");
        }
        writeln!(f, "Version conflicts ({}):", self.violations.len())?;
        for v in &self.violations {
            writeln!(f, "  {v}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.chosen {
            Some(chosen) => write!(
                f,
                "{} requires {} in {} but {} was chosen",
                self.library, self.dependency, self.permitted, chosen
            ),
            None => write!(
                f,
                "{} requires {} in {} but it was not chosen",
                self.library, self.dependency, self.permitted
            ),
        }
    }
}
