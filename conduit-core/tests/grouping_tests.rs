//! Partition and ordering properties of target grouping and presentation.
//!
//! Each `#[case]` builds its own project; no shared state.

use conduit_core::{
    group_targets, present, DisplayTree, GroupKey, NodeHeading, Project, TargetDefinition,
};
use rstest::rstest;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `(name, group)` pairs → project.
fn project(layout: &[(&str, Option<&str>)]) -> Project {
    let targets = layout
        .iter()
        .map(|(name, group)| match group {
            Some(label) => TargetDefinition::new(*name).with_group(*label),
            None => TargetDefinition::new(*name),
        })
        .collect();
    Project::new("shop", "apps/shop", targets).expect("project")
}

fn position(project: &Project, name: &str) -> usize {
    project
        .target_names()
        .position(|t| t.0 == name)
        .expect("target in project")
}

// ---------------------------------------------------------------------------
// Partition invariant + order preservation
// ---------------------------------------------------------------------------

#[rstest]
#[case::empty(&[])]
#[case::all_ungrouped(&[("build", None), ("test", None)])]
#[case::all_grouped(&[("build", Some("a")), ("test", Some("b")), ("lint", Some("a"))])]
#[case::mixed(&[("e2e", Some("qa")), ("build", None), ("unit", Some("qa")), ("serve", None)])]
#[case::blank_label(&[("build", Some("")), ("test", Some("ci"))])]
#[case::others_literal(&[("x", Some("Others")), ("y", None)])]
fn every_target_is_placed_exactly_once_in_order(#[case] layout: &[(&str, Option<&str>)]) {
    let p = project(layout);
    let result = group_targets(&p);

    assert_eq!(result.len(), p.targets().len(), "placed count");
    for name in p.target_names() {
        let hits = result
            .iter()
            .filter(|(_, list)| list.iter().any(|t| t == name))
            .count();
        assert_eq!(hits, 1, "{name} must appear exactly once");
    }
    for (_, list) in result.iter() {
        let positions: Vec<usize> = list.iter().map(|t| position(&p, &t.0)).collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted, "declaration order lost");
    }
}

#[test]
fn build_test_lint_example() {
    let p = project(&[("build", Some("build")), ("test", None), ("lint", Some("build"))]);
    let result = group_targets(&p);
    let build: Vec<&str> = result
        .group("build")
        .expect("build group")
        .iter()
        .map(|t| t.0.as_str())
        .collect();
    assert_eq!(build, vec!["build", "lint"]);
    let rest: Vec<&str> = result.ungrouped().iter().map(|t| t.0.as_str()).collect();
    assert_eq!(rest, vec!["test"]);
    assert_eq!(result.locate("lint"), Some(GroupKey::Named("build")));
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

#[rstest]
#[case(&[("build", None), ("test", None)])]
#[case(&[])]
fn no_groups_presents_flat_residual(#[case] layout: &[(&str, Option<&str>)]) {
    let p = project(layout);
    let result = group_targets(&p);
    let tree = present(&p, &result);
    assert!(matches!(tree, DisplayTree::Flat(_)));
    let expected: Vec<&str> = result.ungrouped().iter().map(|t| t.0.as_str()).collect();
    assert_eq!(tree.target_names(), expected);
}

#[rstest]
#[case(&[("build", Some("compile"))], 0)]
#[case(&[("build", Some("compile")), ("test", None)], 1)]
fn grouped_tree_ends_with_others(
    #[case] layout: &[(&str, Option<&str>)],
    #[case] others_count: usize,
) {
    let p = project(layout);
    let tree = present(&p, &group_targets(&p));
    let DisplayTree::Grouped(nodes) = &tree else {
        panic!("expected grouped tree");
    };
    let last = nodes.last().expect("others node");
    assert_eq!(last.heading, NodeHeading::Others);
    assert_eq!(last.heading.label(), "Others");
    assert_eq!(last.count, others_count);
    assert_eq!(
        nodes.iter().filter(|n| n.heading == NodeHeading::Others).count(),
        1
    );
}

#[test]
fn grouped_tree_keeps_group_order_and_counts() {
    let p = project(&[
        ("e2e", Some("qa")),
        ("build", Some("compile")),
        ("unit", Some("qa")),
        ("serve", None),
    ]);
    let tree = present(&p, &group_targets(&p));
    assert_eq!(tree.target_names(), vec!["e2e", "unit", "build", "serve"]);
    let DisplayTree::Grouped(nodes) = tree else {
        panic!("expected grouped tree");
    };
    let summary: Vec<(String, usize)> = nodes
        .iter()
        .map(|n| (n.heading.to_string(), n.count))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("qa".to_string(), 2),
            ("compile".to_string(), 1),
            ("Others".to_string(), 1),
        ]
    );
}
