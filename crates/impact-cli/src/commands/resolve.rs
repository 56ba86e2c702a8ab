//! Handler for `impact resolve`.

use impact_resolver::{ResolutionError, Resolver, ResolverConfig};
use impact_util::errors::{ImpactError, ImpactResult};

use crate::cli::Facts;

pub fn exec(libraries: &[String], facts: &Facts, tree: bool, settings: ResolverConfig) -> ImpactResult<()> {
    let graph = super::build_graph(facts)?;

    let resolved = Resolver::new(&graph)
        .with_config(settings)
        .resolve(libraries.iter().map(String::as_str))
        .map_err(|e| ImpactError::Resolution {
            message: describe(&e),
        })?;

    if tree {
        print!("{}", graph.print_tree(&resolved, libraries));
    } else {
        let table = toml::to_string(&resolved).map_err(|e| ImpactError::Generic {
            message: format!("Failed to render resolution: {e}"),
        })?;
        print!("{table}");
    }
    Ok(())
}

/// The top-level failure followed by the innermost one, when they differ.
fn describe(err: &ResolutionError) -> String {
    let root = err.root_cause();
    if std::ptr::eq(root, err) {
        err.to_string()
    } else {
        format!("{err}; {root}")
    }
}
