//! Randomised checks of the resolver against a brute-force search.

use std::collections::BTreeSet;

use impact_resolver::{Configuration, DependencyGraph};
use proptest::collection::{btree_set, vec};
use proptest::prelude::*;
use semver::Version;

const LIBRARIES: [&str; 4] = ["a", "b", "c", "d"];
const MAJORS: u64 = 3;

type Edge = (usize, u64, usize, u64);

fn edges() -> impl Strategy<Value = Vec<Edge>> {
    vec(
        (0..LIBRARIES.len(), 1..=MAJORS, 0..LIBRARIES.len(), 1..=MAJORS),
        0..14,
    )
}

fn roots() -> impl Strategy<Value = BTreeSet<usize>> {
    btree_set(0..LIBRARIES.len(), 1..=3)
}

/// Every library exists in versions 1.0.0 ..= MAJORS.0.0; edges come on top.
fn build_graph(edges: &[Edge]) -> DependencyGraph {
    let mut g = DependencyGraph::new();
    for lib in LIBRARIES {
        for major in 1..=MAJORS {
            g.add_version(lib, Version::new(major, 0, 0));
        }
    }
    for &(from, from_major, to, to_major) in edges {
        g.add_edge(
            LIBRARIES[from],
            Version::new(from_major, 0, 0),
            LIBRARIES[to],
            Version::new(to_major, 0, 0),
        );
    }
    g
}

fn is_valid(g: &DependencyGraph, config: &Configuration, roots: &BTreeSet<usize>) -> bool {
    roots.iter().all(|&r| config.contains(LIBRARIES[r])) && g.verify(config).is_empty()
}

/// Try every way of leaving each library out or picking one of its versions.
fn brute_force(g: &DependencyGraph, roots: &BTreeSet<usize>) -> Option<Configuration> {
    let choices = MAJORS + 1;
    let total = choices.pow(LIBRARIES.len() as u32);
    (0..total).find_map(|mut code| {
        let mut config = Configuration::new();
        for lib in LIBRARIES {
            let pick = code % choices;
            code /= choices;
            if pick > 0 {
                config.insert(lib, Version::new(pick, 0, 0));
            }
        }
        is_valid(g, &config, roots).then_some(config)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_successful_resolution_honours_every_edge(edges in edges(), roots in roots()) {
        let g = build_graph(&edges);
        let names: Vec<&str> = roots.iter().map(|&r| LIBRARIES[r]).collect();
        if let Ok(config) = g.resolve(names) {
            let report = g.verify(&config);
            prop_assert!(report.is_empty(), "{}", report);
            for &r in &roots {
                prop_assert!(config.contains(LIBRARIES[r]));
            }
        }
    }

    #[test]
    fn test_resolution_succeeds_whenever_a_solution_exists(edges in edges(), roots in roots()) {
        let g = build_graph(&edges);
        let names: Vec<&str> = roots.iter().map(|&r| LIBRARIES[r]).collect();
        let resolved = g.resolve(names);
        let exists = brute_force(&g, &roots);
        prop_assert_eq!(
            resolved.is_ok(),
            exists.is_some(),
            "resolver: {:?}, brute force: {:?}",
            resolved,
            exists
        );
    }

    #[test]
    fn test_failures_are_never_aborts(edges in edges(), roots in roots()) {
        let g = build_graph(&edges);
        let names: Vec<&str> = roots.iter().map(|&r| LIBRARIES[r]).collect();
        if let Err(e) = g.resolve(names) {
            prop_assert!(!e.is_abort());
        }
    }
}
