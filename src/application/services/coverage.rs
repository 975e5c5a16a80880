//! Coverage probing service
//!
//! Seeds input assignments from a tree and prepares the request bodies the
//! external evaluation service expects.

use tracing::{debug, info};

use crate::application::error_ext::JsonResultExt;
use crate::application::ApplicationResult;
use crate::domain::{
    coverage_samples, derive_default_inputs, generate_variations, DecisionTree, InputAssignment,
    SimulationRequest, UnreachableRequest,
};

/// Derives default inputs, variations and service payloads for a tree.
pub struct CoverageService {
    max_depth: usize,
}

impl CoverageService {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// One representative value per variable; empty for a rootless tree.
    pub fn default_inputs(&self, tree: &DecisionTree) -> InputAssignment {
        match &tree.root {
            Some(root) => derive_default_inputs(root, self.max_depth),
            None => InputAssignment::new(),
        }
    }

    pub fn variations(&self, base: &InputAssignment) -> Vec<InputAssignment> {
        generate_variations(base)
    }

    /// `base` (or the derived defaults when absent) followed by its variations.
    pub fn samples(&self, tree: &DecisionTree, base: Option<InputAssignment>) -> Vec<InputAssignment> {
        let base = base.unwrap_or_else(|| self.default_inputs(tree));
        let samples = coverage_samples(&base);
        info!("prepared {} coverage samples", samples.len());
        samples
    }

    /// Body for the simulation endpoint: `{tree, input_values}`.
    pub fn simulation_payload(&self, tree: &DecisionTree, inputs: &InputAssignment) -> ApplicationResult<String> {
        let request = SimulationRequest {
            tree,
            input_values: inputs,
        };
        serde_json::to_string_pretty(&request).as_document("simulation request", "payload")
    }

    /// Body for unreachable-node detection: `{tree, sample_inputs}`.
    pub fn unreachable_payload(&self, tree: &DecisionTree, samples: &[InputAssignment]) -> ApplicationResult<String> {
        debug!("unreachable payload with {} samples", samples.len());
        let request = UnreachableRequest {
            tree,
            sample_inputs: samples,
        };
        serde_json::to_string_pretty(&request).as_document("unreachable request", "payload")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InputValue, TreeNode, DEFAULT_MAX_DEPTH};

    fn approval_tree() -> DecisionTree {
        DecisionTree::new(TreeNode::new("root", "Start").with_children(vec![
            TreeNode::new("L", "Approve").with_condition("input.age>=18"),
        ]))
    }

    #[test]
    fn given_approval_tree_when_probing_then_defaults_and_variations_match() {
        let service = CoverageService::new(DEFAULT_MAX_DEPTH);

        let defaults = service.default_inputs(&approval_tree());
        assert_eq!(defaults.get("age"), Some(&InputValue::Integer(19)));

        let variations = service.variations(&defaults);
        assert_eq!(variations.len(), 2);
        assert_eq!(variations[0]["age"], InputValue::Integer(29));
        assert_eq!(variations[1]["age"], InputValue::Integer(9));
    }

    #[test]
    fn given_no_base_when_building_samples_then_seeds_from_defaults() {
        let service = CoverageService::new(DEFAULT_MAX_DEPTH);
        let samples = service.samples(&approval_tree(), None);
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0]["age"], InputValue::Integer(19));
    }

    #[test]
    fn given_rootless_tree_when_probing_then_returns_empty_base() {
        let service = CoverageService::new(DEFAULT_MAX_DEPTH);
        let tree = DecisionTree::default();
        assert!(service.default_inputs(&tree).is_empty());
        assert_eq!(service.samples(&tree, None), vec![InputAssignment::new()]);
    }

    #[test]
    fn given_tree_when_building_payloads_then_shapes_match_service() {
        let service = CoverageService::new(DEFAULT_MAX_DEPTH);
        let tree = approval_tree();
        let inputs = service.default_inputs(&tree);

        let sim: serde_json::Value =
            serde_json::from_str(&service.simulation_payload(&tree, &inputs).unwrap()).unwrap();
        assert_eq!(sim["tree"]["root"]["node_id"], "root");
        assert_eq!(sim["input_values"]["age"], 19);

        let samples = service.samples(&tree, Some(inputs));
        let unreachable: serde_json::Value =
            serde_json::from_str(&service.unreachable_payload(&tree, &samples).unwrap()).unwrap();
        assert_eq!(unreachable["sample_inputs"].as_array().unwrap().len(), 3);
        assert_eq!(unreachable["sample_inputs"][1]["age"], 29);
    }
}
