//! Ordered, duplicate-free version collections.
//!
//! A [`VersionSet`] holds semantic versions ordered by semver precedence
//! (pre-releases sort before their release). Two versions are the same member
//! when they are equal by value, so parsing `1.0.0` twice never yields two
//! entries.

use std::collections::BTreeSet;
use std::fmt;

use semver::Version;

/// A set of versions with the algebra the resolver needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VersionSet {
    versions: BTreeSet<Version>,
}

impl VersionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a version. Returns `false` if an equal version was already present.
    pub fn add(&mut self, version: Version) -> bool {
        self.versions.insert(version)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn contains(&self, version: &Version) -> bool {
        self.versions.contains(version)
    }

    /// Versions present in both sets.
    pub fn intersection(&self, other: &VersionSet) -> VersionSet {
        self.versions
            .intersection(&other.versions)
            .cloned()
            .collect()
    }

    /// Versions present in either set.
    pub fn union(&self, other: &VersionSet) -> VersionSet {
        self.versions.union(&other.versions).cloned().collect()
    }

    /// Iterate newest first.
    pub fn descending(&self) -> impl Iterator<Item = &Version> + '_ {
        self.versions.iter().rev()
    }

    /// Iterate oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Version> + '_ {
        self.versions.iter()
    }

    pub fn newest(&self) -> Option<&Version> {
        self.versions.last()
    }
}

impl FromIterator<Version> for VersionSet {
    fn from_iter<I: IntoIterator<Item = Version>>(iter: I) -> Self {
        Self {
            versions: iter.into_iter().collect(),
        }
    }
}

impl Extend<Version> for VersionSet {
    fn extend<I: IntoIterator<Item = Version>>(&mut self, iter: I) {
        self.versions.extend(iter);
    }
}

impl IntoIterator for VersionSet {
    type Item = Version;
    type IntoIter = std::collections::btree_set::IntoIter<Version>;

    fn into_iter(self) -> Self::IntoIter {
        self.versions.into_iter()
    }
}

impl fmt::Display for VersionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, v) in self.versions.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("}")
    }
}
