//! Integration tests for render models: child-to-parent mapping, active links,
//! layout estimation and terminal rendering of simulation results on disk.

use std::collections::HashSet;
use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use treejack::application::services::{
    DocumentService, ExampleCatalog, RenderOptions, RenderService,
};
use treejack::domain::{
    active_link_pairs, DecisionTree, RenderModel, RenderTreeBuilder, TreeNode, DEFAULT_MAX_DEPTH,
    NO_CONDITION,
};
use treejack::infrastructure::traits::RealFileSystem;
use treejack::util::testing;

fn path(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

fn three_levels() -> TreeNode {
    TreeNode::new("root", "Start").with_children(vec![
        TreeNode::new("a", "A")
            .with_condition("input.x > 5")
            .with_children(vec![TreeNode::new("b", "B"), TreeNode::new("c", "C")]),
        TreeNode::new("d", "D").with_condition("input.x <= 5"),
    ])
}

#[test]
fn given_three_level_tree_when_building_then_every_child_maps_to_parent() {
    testing::init_test_setup();
    let root = three_levels();

    let rendered = RenderTreeBuilder::new(DEFAULT_MAX_DEPTH).build(&root);

    assert_eq!(rendered.parents.len(), root.node_count() - 1);
    assert_eq!(rendered.parents["b"], "a");
    assert_eq!(rendered.parents["d"], "root");
    assert!(!rendered.parents.contains_key("root"));
    assert_eq!(rendered.root.children[0].children[0].attributes.condition, NO_CONDITION);
}

#[test]
fn given_path_with_missing_node_when_mapping_then_skips_that_step() {
    let rendered = RenderTreeBuilder::new(DEFAULT_MAX_DEPTH).build(&three_levels());

    let full = active_link_pairs(&path(&["root", "a", "b"]), &rendered.parents);
    assert_eq!(full.len(), 2);
    assert_eq!((full[0].source.as_str(), full[0].target.as_str()), ("root", "a"));
    assert_eq!((full[1].source.as_str(), full[1].target.as_str()), ("a", "b"));

    let partial = active_link_pairs(&path(&["root", "a", "gone"]), &rendered.parents);
    assert_eq!(partial.len(), 1);
}

#[test]
fn given_structurally_identical_trees_when_estimating_then_layouts_are_bit_identical() {
    let first = DecisionTree::new(three_levels());
    let second = DecisionTree::new(three_levels());

    let a = RenderModel::build(&first, &[], DEFAULT_MAX_DEPTH).unwrap();
    let b = RenderModel::build(&second, &path(&["root", "d"]), DEFAULT_MAX_DEPTH).unwrap();

    assert_eq!(a.layout.node_width.to_bits(), b.layout.node_width.to_bits());
    assert_eq!(a.layout.node_height.to_bits(), b.layout.node_height.to_bits());
    assert_eq!(
        a.layout.sibling_separation.to_bits(),
        b.layout.sibling_separation.to_bits()
    );
}

#[test]
fn given_rootless_tree_when_building_model_then_nothing_to_render() {
    assert!(RenderModel::build(&DecisionTree::default(), &path(&["x"]), DEFAULT_MAX_DEPTH).is_none());
}

#[test]
fn given_simulation_file_when_rendering_complex_loan_then_highlights_path() {
    testing::init_test_setup();
    let dir = TempDir::new().unwrap();
    let result_path = dir.path().join("sim.json");
    fs::write(
        &result_path,
        r#"{
  "path": ["start", "initial_screening", "under_age"],
  "final_node": {"node_id": "under_age", "text": "Rejected - Below Minimum Age"}
}"#,
    )
    .unwrap();

    let catalog = ExampleCatalog::bundled().unwrap();
    let documents = DocumentService::new(Arc::new(RealFileSystem));
    let tree = documents.load_tree("example:complex_loan", &catalog).unwrap();
    let result = documents.load_simulation(&result_path).unwrap();
    let service = RenderService::new(DEFAULT_MAX_DEPTH);

    let model = service.model(&tree, Some(&result)).unwrap();

    assert_eq!(model.active_links.len(), 2);
    assert!(model.is_active_link("under_age", "initial_screening"));
    assert!(!model.is_active_link("initial_screening", "age_verification"));
    assert!(!model.is_active_link("start", "previous_applicant"));

    let text = service
        .to_tree(
            &model,
            &RenderOptions {
                color: false,
                unreachable: HashSet::from(["restart_application".to_string()]),
            },
        )
        .to_string();
    let marked: Vec<&str> = text
        .lines()
        .filter(|l| l.starts_with("* ") || l.contains("── * "))
        .collect();
    assert_eq!(marked.len(), 3, "{text}");
    assert!(text.contains("[restart_application] (unreachable)"));
}

#[test]
fn given_render_model_when_serializing_then_uses_surface_field_names() {
    let model = RenderModel::build(
        &DecisionTree::new(three_levels()),
        &path(&["root", "a"]),
        DEFAULT_MAX_DEPTH,
    )
    .unwrap();

    let json = serde_json::to_value(&model).unwrap();

    assert_eq!(json["root"]["label"], "Start");
    assert_eq!(json["root"]["displayProps"]["isActive"], true);
    assert_eq!(json["root"]["children"][1]["displayProps"]["isActive"], false);
    assert_eq!(json["activeLinks"][0]["source"], "root");
    assert!(json["layout"]["nonSiblingSeparation"].is_number());
}
