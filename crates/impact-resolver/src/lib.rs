//! Dependency resolution core: version sets, the dependency graph of known
//! `(library, version)` requirements, constraint propagation, and a
//! backtracking search that picks one version per library.

pub mod config;
pub mod conflict;
pub mod constraints;
pub mod graph;
pub mod resolver;
pub mod version;

pub use config::{CancelFlag, ResolverConfig};
pub use constraints::{Available, Configuration};
pub use graph::{DependencyGraph, LibraryName, UniqueLibrary};
pub use resolver::{ResolutionError, Resolver};
pub use version::VersionSet;
