//! Command dispatch and handler modules.

mod resolve;
mod verify;

use impact_resolver::graph::UniqueLibrary;
use impact_resolver::{DependencyGraph, ResolverConfig};
use impact_util::errors::{ImpactError, ImpactResult};

use crate::cli::{Cli, Command, Facts};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> ImpactResult<()> {
    match cli.command {
        Command::Resolve {
            libraries,
            facts,
            tree,
            config,
            timeout_ms,
            max_attempts,
        } => {
            let settings = resolver_config(config.as_deref(), timeout_ms, max_attempts)?;
            resolve::exec(&libraries, &facts, tree, settings)
        }
        Command::Verify { choices, facts } => verify::exec(&choices, &facts),
    }
}

/// Inline TOML first, then individual flags on top.
fn resolver_config(
    text: Option<&str>,
    timeout_ms: Option<u64>,
    max_attempts: Option<usize>,
) -> ImpactResult<ResolverConfig> {
    let mut settings = match text {
        Some(text) => ResolverConfig::from_toml_str(text).map_err(|e| ImpactError::Config {
            message: e.message().to_string(),
        })?,
        None => ResolverConfig::default(),
    };
    if timeout_ms.is_some() {
        settings.timeout_ms = timeout_ms;
    }
    if max_attempts.is_some() {
        settings.max_attempts = max_attempts;
    }
    Ok(settings)
}

fn parse_library(value: &str) -> ImpactResult<UniqueLibrary> {
    value.parse::<UniqueLibrary>().map_err(|e| {
        ImpactError::InvalidArgument {
            value: value.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Build the graph from `--edge` and `--known` arguments.
fn build_graph(facts: &Facts) -> ImpactResult<DependencyGraph> {
    let mut graph = DependencyGraph::new();
    for known in &facts.known {
        let lib = parse_library(known)?;
        graph.add_version(lib.name, lib.version);
    }
    for edge in &facts.edges {
        let (from, to) = edge
            .split_once('=')
            .ok_or_else(|| ImpactError::InvalidArgument {
                value: edge.clone(),
                message: "expected `name@version=dependency@version`".to_string(),
            })?;
        let from = parse_library(from)?;
        let to = parse_library(to)?;
        graph.add_edge(from.name, from.version, to.name, to.version);
    }
    tracing::debug!(
        "Built graph with {} nodes and {} edges",
        graph.len(),
        graph.edge_count()
    );
    Ok(graph)
}
