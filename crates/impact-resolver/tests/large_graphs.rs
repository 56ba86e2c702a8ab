use impact_resolver::{DependencyGraph, ResolutionError};
use semver::Version;

fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
}

/// `l0@1.0.0 -> l1@1.0.0 -> ... -> l{len}@1.0.0`.
fn chain(len: usize) -> DependencyGraph {
    let mut g = DependencyGraph::new();
    for i in 0..len {
        g.add_edge(format!("l{i}"), v("1.0.0"), format!("l{}", i + 1), v("1.0.0"));
    }
    g
}

#[test]
fn test_long_chain_resolves() {
    let g = chain(5000);
    let resolved = g.resolve(["l0"]).unwrap();
    assert_eq!(resolved.len(), 5001);
    assert_eq!(resolved.get("l5000"), Some(&v("1.0.0")));
    assert!(g.verify(&resolved).is_empty());
}

#[test]
fn test_wide_dependency_list_resolves() {
    let mut g = DependencyGraph::new();
    for i in 0..5000 {
        g.add_edge("app", v("1.0.0"), format!("leaf{i}"), v("1.0.0"));
    }
    let resolved = g.resolve(["app"]).unwrap();
    assert_eq!(resolved.len(), 5001);
    assert!(g.verify(&resolved).is_empty());
}

#[test]
fn test_conflict_at_bottom_of_long_chain_backtracks_to_root() {
    // l0@2.0.0 pins base at 1.0.0, but the far end of its chain wants 2.0.0.
    let mut g = chain(2000);
    g.add_edge("l0", v("2.0.0"), "l1", v("1.0.0"));
    g.add_edge("l0", v("2.0.0"), "base", v("1.0.0"));
    g.add_edge("l2000", v("1.0.0"), "base", v("2.0.0"));

    let resolved = g.resolve(["l0"]).unwrap();
    assert_eq!(resolved.get("l0"), Some(&v("1.0.0")));
    assert_eq!(resolved.get("base"), Some(&v("2.0.0")));
    assert_eq!(resolved.len(), 2002);
    assert!(g.verify(&resolved).is_empty());
}

#[test]
fn test_unsatisfiable_long_chain_reports_root_cause() {
    let mut g = chain(1000);
    g.add_edge("l0", v("1.0.0"), "base", v("1.0.0"));
    g.add_edge("l1000", v("1.0.0"), "base", v("2.0.0"));

    let err = g.resolve(["l0"]).unwrap_err();
    assert!(
        matches!(err, ResolutionError::ExhaustedCandidates { ref library_name, .. } if library_name.as_str() == "l0"),
        "got: {err}"
    );
    assert!(matches!(
        err.root_cause(),
        ResolutionError::IncompatibleWithChosen { dependency_name, .. } if dependency_name.as_str() == "base"
    ));
}
