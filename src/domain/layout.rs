//! Adaptive node sizing and spacing for a render tree.

use serde::Serialize;

use crate::domain::render::RenderNode;

const BASE_NODE_WIDTH: f64 = 250.0;
const BASE_NODE_HEIGHT: f64 = 80.0;
const WEIGHT_PER_WIDTH_UNIT: f64 = 20.0;
const NODES_PER_LEVEL: f64 = 4.0;
const MIN_SIBLING_SEPARATION: f64 = 1.5;
const MAX_SIBLING_SEPARATION: f64 = 2.2;
const NON_SIBLING_FACTOR: f64 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutParameters {
    pub node_width: f64,
    pub node_height: f64,
    pub sibling_separation: f64,
    pub non_sibling_separation: f64,
}

/// Shape figures gathered in one pass over a render tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeMetrics {
    pub max_content_weight: usize,
    /// Root is depth 0
    pub max_depth: usize,
    pub total_nodes: usize,
}

impl TreeMetrics {
    pub fn collect(root: &RenderNode) -> Self {
        let mut metrics = Self::default();
        let mut stack = vec![(root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            metrics.total_nodes += 1;
            metrics.max_depth = metrics.max_depth.max(depth);
            metrics.max_content_weight = metrics
                .max_content_weight
                .max(node.display_props.content_weight);
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        metrics
    }
}

impl LayoutParameters {
    /// Size nodes by their longest content and space them by tree shape.
    ///
    /// A single-node tree counts as depth 1 for the height ratio.
    pub fn estimate(root: &RenderNode) -> Self {
        Self::from_metrics(TreeMetrics::collect(root))
    }

    pub fn from_metrics(metrics: TreeMetrics) -> Self {
        let max_weight = metrics.max_content_weight as f64;
        let depth = metrics.max_depth as f64;
        let levels = metrics.max_depth.max(1) as f64;
        let nodes = metrics.total_nodes as f64;

        let node_width = BASE_NODE_WIDTH * (max_weight / WEIGHT_PER_WIDTH_UNIT).max(1.0);
        let node_height = BASE_NODE_HEIGHT * (nodes / (levels * NODES_PER_LEVEL)).max(1.0);
        let sibling_separation = (MAX_SIBLING_SEPARATION - depth / 10.0).max(MIN_SIBLING_SEPARATION);

        Self {
            node_width,
            node_height,
            sibling_separation,
            non_sibling_separation: sibling_separation * NON_SIBLING_FACTOR,
        }
    }
}
