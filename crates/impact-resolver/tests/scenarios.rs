use impact_resolver::{Configuration, DependencyGraph, LibraryName, ResolutionError};
use semver::Version;

fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
}

fn chosen(config: &Configuration, name: &str) -> String {
    config
        .get(name)
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<none>".to_string())
}

#[test]
fn test_library_without_edges_selects_newest() {
    let mut g = DependencyGraph::new();
    g.add_version("x", v("1.0.0"));
    g.add_version("x", v("2.0.0"));

    let resolved = g.resolve(["x"]).unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(chosen(&resolved, "x"), "2.0.0");
}

#[test]
fn test_unlisted_dependency_version_is_rejected() {
    let mut g = DependencyGraph::new();
    g.add_edge("x", v("1.0.0"), "y", v("1.0.0"));
    g.add_version("y", v("1.0.0"));
    g.add_version("y", v("2.0.0"));

    for roots in [["x", "y"], ["y", "x"]] {
        let resolved = g.resolve(roots).unwrap();
        assert_eq!(chosen(&resolved, "x"), "1.0.0", "roots {roots:?}");
        assert_eq!(chosen(&resolved, "y"), "1.0.0", "roots {roots:?}");
        assert!(g.verify(&resolved).is_empty());
    }
}

#[test]
fn test_conflicting_requirements_fail() {
    let mut g = DependencyGraph::new();
    g.add_edge("a", v("1.0.0"), "c", v("1.0.0"));
    g.add_edge("b", v("1.0.0"), "c", v("2.0.0"));

    let err = g.resolve(["a", "b"]).unwrap_err();
    assert!(
        matches!(
            err.root_cause(),
            ResolutionError::IncompatibleWithChosen { .. } | ResolutionError::Starved { .. }
        ),
        "got: {err:?}"
    );
}

#[test]
fn test_unknown_library_fails() {
    let mut g = DependencyGraph::new();
    g.add_version("known", v("1.0.0"));
    let err = g.resolve(["known", "unknown"]).unwrap_err();
    assert!(
        matches!(err.root_cause(), ResolutionError::NoVersionsAvailable { library_name } if library_name.as_str() == "unknown"),
        "got: {err:?}"
    );
}

#[test]
fn test_graph_is_reusable_across_resolutions() {
    let mut g = DependencyGraph::new();
    g.add_edge("web", v("2.0.0"), "json", v("1.1.0"));
    g.add_edge("cli", v("0.3.0"), "json", v("1.0.0"));
    g.add_edge("cli", v("0.3.0"), "json", v("1.1.0"));

    let web = g.resolve(["web"]).unwrap();
    let cli = g.resolve(["cli"]).unwrap();
    let both = g.resolve(["cli", "web"]).unwrap();

    assert_eq!(chosen(&web, "json"), "1.1.0");
    assert_eq!(chosen(&cli, "json"), "1.1.0");
    assert_eq!(both.len(), 3);
    let names: Vec<&str> = both.names().map(LibraryName::as_str).collect();
    assert_eq!(names, ["cli", "json", "web"]);
}

#[test]
fn test_diamond_settles_on_shared_version() {
    let mut g = DependencyGraph::new();
    for (lib, log) in [("left", ["1.0.0", "1.1.0"]), ("right", ["1.1.0", "1.2.0"])] {
        for lv in log {
            g.add_edge(lib, v("1.0.0"), "log", v(lv));
        }
    }
    g.add_edge("app", v("1.0.0"), "left", v("1.0.0"));
    g.add_edge("app", v("1.0.0"), "right", v("1.0.0"));

    let resolved = g.resolve(["app"]).unwrap();
    assert_eq!(chosen(&resolved, "log"), "1.1.0");
    assert!(g.verify(&resolved).is_empty());
}

#[test]
fn test_tree_of_resolution() {
    let mut g = DependencyGraph::new();
    g.add_edge("app", v("1.0.0"), "left", v("1.0.0"));
    g.add_edge("app", v("1.0.0"), "right", v("1.0.0"));
    g.add_edge("left", v("1.0.0"), "log", v("1.1.0"));
    g.add_edge("right", v("1.0.0"), "log", v("1.1.0"));

    let resolved = g.resolve(["app"]).unwrap();
    let tree = g.print_tree(&resolved, &["app"]);
    assert_eq!(
        tree,
        "app@1.0.0\n\
         ├── left@1.0.0\n\
         │   └── log@1.1.0\n\
         └── right@1.0.0\n    \
             └── log@1.1.0\n"
    );
}

#[test]
fn test_tracing_does_not_change_results() {
    let mut g = DependencyGraph::new();
    g.add_edge("x", v("1.0.0"), "y", v("1.0.0"));
    g.add_version("y", v("1.0.0"));
    g.add_version("y", v("2.0.0"));

    let quiet = g.resolve(["y", "x"]).unwrap();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();
    let traced = tracing::subscriber::with_default(subscriber, || g.resolve(["y", "x"]).unwrap());

    assert_eq!(quiet, traced);
}
