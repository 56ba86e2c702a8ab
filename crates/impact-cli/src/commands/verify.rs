//! Handler for `impact verify`.

use impact_resolver::Configuration;
use impact_util::errors::{ImpactError, ImpactResult};

use crate::cli::Facts;

pub fn exec(choices: &[String], facts: &Facts) -> ImpactResult<()> {
    let graph = super::build_graph(facts)?;

    let mut config = Configuration::new();
    for choice in choices {
        let lib = super::parse_library(choice)?;
        if let Some(previous) = config.insert(lib.name.clone(), lib.version) {
            return Err(ImpactError::InvalidArgument {
                value: choice.clone(),
                message: format!("`{}` was already chosen at {previous}", lib.name),
            }
            .into());
        }
    }

    let report = graph.verify(&config);
    if report.is_empty() {
        println!("{report}");
        Ok(())
    } else {
        print!("{report}");
        Err(ImpactError::Generic {
            message: format!("{} requirement(s) not met", report.len()),
        }
        .into())
    }
}
