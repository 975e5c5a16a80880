//! Render model service
//!
//! Builds render models from trees and traversal results, and turns them into
//! terminal trees.

use std::collections::HashSet;

use colored::Colorize;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::error_ext::JsonResultExt;
use crate::application::ApplicationResult;
use crate::domain::{DecisionTree, LayoutParameters, RenderModel, RenderNode, SimulationResult};

/// Terminal presentation options.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub color: bool,
    /// Node ids reported unreachable by the evaluation service
    pub unreachable: HashSet<String>,
}

pub struct RenderService {
    max_depth: usize,
}

impl RenderService {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Render model for `tree`, highlighting the path of `result` if given.
    #[instrument(level = "debug", skip_all)]
    pub fn model(&self, tree: &DecisionTree, result: Option<&SimulationResult>) -> Option<RenderModel> {
        let path = result.map(|r| r.path.as_slice()).unwrap_or_default();
        let model = RenderModel::build(tree, path, self.max_depth)?;
        debug!(
            "render model: {} active links for a path of {}",
            model.active_links.len(),
            path.len()
        );
        Some(model)
    }

    pub fn to_json(&self, model: &RenderModel) -> ApplicationResult<String> {
        serde_json::to_string_pretty(model).as_document("render model", "output")
    }

    /// Indented tree, one line per node.
    pub fn to_tree(&self, model: &RenderModel, options: &RenderOptions) -> Tree<String> {
        self.node_tree(model, &model.root, None, options)
    }

    fn node_tree(
        &self,
        model: &RenderModel,
        node: &RenderNode,
        parent: Option<&str>,
        options: &RenderOptions,
    ) -> Tree<String> {
        let leaves: Vec<_> = node
            .children
            .iter()
            .map(|child| self.node_tree(model, child, Some(node.id()), options))
            .collect();
        Tree::new(self.node_line(model, node, parent, options)).with_leaves(leaves)
    }

    fn node_line(
        &self,
        model: &RenderModel,
        node: &RenderNode,
        parent: Option<&str>,
        options: &RenderOptions,
    ) -> String {
        let on_link = parent.is_some_and(|p| model.is_active_link(p, node.id()));
        let marker = if on_link || (parent.is_none() && node.display_props.is_active) {
            "* "
        } else {
            ""
        };

        let mut line = format!("{}{} [{}]", marker, node.label, node.id());
        if node.has_condition() {
            line.push_str(&format!(" if {}", node.attributes.condition));
        }
        if options.unreachable.contains(node.id()) {
            line.push_str(" (unreachable)");
        }

        if !options.color {
            return line;
        }
        if node.display_props.is_active {
            line.green().bold().to_string()
        } else if options.unreachable.contains(node.id()) {
            line.red().to_string()
        } else {
            line
        }
    }

    /// One-line summary of layout parameters.
    pub fn layout_summary(&self, layout: &LayoutParameters) -> String {
        format!(
            "node size {:.1} x {:.1}, separation {:.2} (siblings) / {:.2} (non-siblings)",
            layout.node_width,
            layout.node_height,
            layout.sibling_separation,
            layout.non_sibling_separation
        )
    }
}
