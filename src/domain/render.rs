//! Renderable view of a decision tree.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::domain::active_path::{active_link_pairs, ActiveLinkPair};
use crate::domain::entities::{DecisionTree, TreeNode};
use crate::domain::layout::LayoutParameters;

/// Shown in place of a missing condition.
pub const NO_CONDITION: &str = "No condition";

/// Child `node_id` to parent `node_id`, as discovered while building.
pub type ChildToParentMap = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeAttributes {
    pub id: String,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayProps {
    pub is_active: bool,
    /// Longest of label and condition, in characters; used for sizing only
    pub content_weight: usize,
}

/// Node of the generic tree handed to a rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub label: String,
    pub attributes: NodeAttributes,
    pub display_props: DisplayProps,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    pub fn id(&self) -> &str {
        &self.attributes.id
    }

    pub fn has_condition(&self) -> bool {
        self.attributes.condition != NO_CONDITION
    }
}

/// Output of one builder pass: the render tree and its parent links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTree {
    pub root: RenderNode,
    pub parents: ChildToParentMap,
}

/// Converts domain trees into render trees.
#[derive(Debug, Clone)]
pub struct RenderTreeBuilder<'a> {
    active: HashSet<&'a str>,
    max_depth: usize,
}

impl<'a> RenderTreeBuilder<'a> {
    pub fn new(max_depth: usize) -> Self {
        Self {
            active: HashSet::new(),
            max_depth,
        }
    }

    /// Mark these node ids as active.
    pub fn with_active<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.active.extend(ids);
        self
    }

    /// Build the render tree for `node` and its descendants.
    ///
    /// Every child is recorded in the returned map under its parent before
    /// the child itself is expanded. Subtrees beyond the depth limit are
    /// dropped with a warning.
    pub fn build(&self, node: &TreeNode) -> RenderTree {
        let mut parents = ChildToParentMap::new();
        let root = self.build_node(node, 0, &mut parents);
        RenderTree { root, parents }
    }

    fn build_node(&self, node: &TreeNode, depth: usize, parents: &mut ChildToParentMap) -> RenderNode {
        let condition = node.condition.as_deref().unwrap_or("");
        let content_weight = node.text.chars().count().max(condition.chars().count());

        let children = if depth >= self.max_depth && !node.children.is_empty() {
            warn!(
                "node {} at depth {} exceeds the depth limit, {} children dropped",
                node.node_id,
                depth,
                node.children.len()
            );
            Vec::new()
        } else {
            node.children
                .iter()
                .map(|child| {
                    parents.insert(child.node_id.clone(), node.node_id.clone());
                    self.build_node(child, depth + 1, parents)
                })
                .collect()
        };

        RenderNode {
            label: node.text.clone(),
            attributes: NodeAttributes {
                id: node.node_id.clone(),
                condition: node
                    .condition
                    .clone()
                    .unwrap_or_else(|| NO_CONDITION.to_string()),
            },
            display_props: DisplayProps {
                is_active: self.active.contains(node.node_id.as_str()),
                content_weight,
            },
            children,
        }
    }
}

/// Everything a rendering surface needs for one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderModel {
    pub root: RenderNode,
    pub layout: LayoutParameters,
    pub active_links: Vec<ActiveLinkPair>,
}

impl RenderModel {
    /// Build the render tree, layout and active links for `tree`.
    ///
    /// `active_path` is a traversal result in root-to-leaf order; it may be
    /// empty or refer to nodes that no longer exist. An absent root yields
    /// `None`.
    #[instrument(level = "debug", skip(tree))]
    pub fn build(tree: &DecisionTree, active_path: &[String], max_depth: usize) -> Option<Self> {
        let Some(root) = tree.root.as_ref() else {
            debug!("no root, nothing to render");
            return None;
        };

        let RenderTree { root, parents } = RenderTreeBuilder::new(max_depth)
            .with_active(active_path.iter().map(String::as_str))
            .build(root);
        let layout = LayoutParameters::estimate(&root);
        let active_links = active_link_pairs(active_path, &parents);

        Some(Self {
            root,
            layout,
            active_links,
        })
    }

    /// Whether the edge between `a` and `b` lies on the active path.
    pub fn is_active_link(&self, a: &str, b: &str) -> bool {
        self.active_links.iter().any(|pair| pair.connects(a, b))
    }
}
