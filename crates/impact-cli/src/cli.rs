//! CLI argument definitions for impact.
//!
//! Every dependency fact is passed as an argument; nothing is read from disk.

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "impact",
    version,
    about = "Resolve a consistent set of library versions",
    long_about = "impact picks one version of every requested library and everything it \
                  transitively requires, preferring the newest versions that fit together."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Trace every step of the search
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// The dependency facts shared by every command.
#[derive(Args, Debug)]
pub struct Facts {
    /// Dependency fact: `name@version=dependency@version` (repeatable)
    #[arg(short, long = "edge", value_name = "FROM=TO")]
    pub edges: Vec<String>,

    /// Known version without dependencies: `name@version` (repeatable)
    #[arg(short, long = "known", value_name = "NAME@VERSION")]
    pub known: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve libraries against the given facts
    Resolve {
        /// Libraries to resolve
        #[arg(required = true)]
        libraries: Vec<String>,

        #[command(flatten)]
        facts: Facts,

        /// Print the result as a dependency tree
        #[arg(long)]
        tree: bool,

        /// Resolver settings as TOML, e.g. `max-attempts = 1000`
        #[arg(long, env = "IMPACT_RESOLVER_CONFIG")]
        config: Option<String>,

        /// Give up after this many milliseconds
        #[arg(long, env = "IMPACT_TIMEOUT_MS")]
        timeout_ms: Option<u64>,

        /// Give up after trying this many candidate versions
        #[arg(long, env = "IMPACT_MAX_ATTEMPTS")]
        max_attempts: Option<usize>,
    },

    /// Check a proposed set of versions against the given facts
    Verify {
        /// Chosen versions: `name@version`
        #[arg(required = true)]
        choices: Vec<String>,

        #[command(flatten)]
        facts: Facts,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
