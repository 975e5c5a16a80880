//! Domain entities: decision trees, input assignments, and service documents

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Default cap on tree depth for every recursive walk.
///
/// Trees usually arrive as user-edited JSON, so traversal never trusts the
/// input to be shallow.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// A question or outcome in a decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Identifier, unique across the whole tree
    pub node_id: String,
    /// Display label
    pub text: String,
    /// Guard expression, e.g. `input.age >= 18`
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(node_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            text: text.into(),
            condition: None,
            children: Vec::new(),
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    /// A node with neither condition nor children.
    pub fn is_leaf(&self) -> bool {
        self.condition.is_none() && self.children.is_empty()
    }

    /// Number of levels below and including this node.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(TreeNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Total number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Find a node by id (pre-order, first match).
    pub fn find(&self, node_id: &str) -> Option<&TreeNode> {
        if self.node_id == node_id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(node_id))
    }

    /// Visit every node in pre-order, stopping descent below `max_depth`.
    ///
    /// The root is at depth 0. Returns `false` if some subtree was cut off.
    pub fn walk_preorder<F>(&self, max_depth: usize, visit: &mut F) -> bool
    where
        F: FnMut(&TreeNode, usize),
    {
        self.walk_at(0, max_depth, visit)
    }

    fn walk_at<F>(&self, depth: usize, max_depth: usize, visit: &mut F) -> bool
    where
        F: FnMut(&TreeNode, usize),
    {
        visit(self, depth);
        if self.children.is_empty() {
            return true;
        }
        if depth >= max_depth {
            return false;
        }
        let mut complete = true;
        for child in &self.children {
            complete &= child.walk_at(depth + 1, max_depth, visit);
        }
        complete
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.text, self.node_id)
    }
}

/// A whole decision tree as exchanged with editors and the evaluation service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<TreeNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sample_inputs: Vec<SampleInput>,
}

impl DecisionTree {
    pub fn new(root: TreeNode) -> Self {
        Self {
            root: Some(root),
            sample_inputs: Vec::new(),
        }
    }

    pub fn with_samples(mut self, sample_inputs: Vec<SampleInput>) -> Self {
        self.sample_inputs = sample_inputs;
        self
    }

    /// Check the structural invariants of the tree.
    ///
    /// Core operations do not require a valid tree; this is for reporting.
    pub fn validate(&self, max_depth: usize) -> Result<(), DomainError> {
        let root = self.root.as_ref().ok_or(DomainError::MissingRoot)?;

        let mut seen: HashSet<&str> = HashSet::new();
        let mut duplicate: Option<String> = None;
        let complete = walk_refs(root, 0, max_depth, &mut |node| {
            if !seen.insert(node.node_id.as_str()) && duplicate.is_none() {
                duplicate = Some(node.node_id.clone());
            }
        });

        if let Some(node_id) = duplicate {
            return Err(DomainError::DuplicateNodeId(node_id));
        }
        if !complete {
            return Err(DomainError::DepthExceeded { limit: max_depth });
        }
        Ok(())
    }
}

// Borrowing walk used by validation; closure gets references tied to the tree.
fn walk_refs<'a, F>(node: &'a TreeNode, depth: usize, max_depth: usize, visit: &mut F) -> bool
where
    F: FnMut(&'a TreeNode),
{
    visit(node);
    if node.children.is_empty() {
        return true;
    }
    if depth >= max_depth {
        return false;
    }
    let mut complete = true;
    for child in &node.children {
        complete &= walk_refs(child, depth + 1, max_depth, visit);
    }
    complete
}

/// Scalar value bound to an input variable.
///
/// Deserialization tries the variants in order, so `19` is an integer and
/// `19.5` a float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl InputValue {
    pub fn is_numeric(&self) -> bool {
        matches!(self, InputValue::Integer(_) | InputValue::Float(_))
    }
}

impl From<i64> for InputValue {
    fn from(v: i64) -> Self {
        InputValue::Integer(v)
    }
}

impl From<f64> for InputValue {
    fn from(v: f64) -> Self {
        InputValue::Float(v)
    }
}

impl From<&str> for InputValue {
    fn from(v: &str) -> Self {
        InputValue::Text(v.to_string())
    }
}

impl From<String> for InputValue {
    fn from(v: String) -> Self {
        InputValue::Text(v)
    }
}

impl From<bool> for InputValue {
    fn from(v: bool) -> Self {
        InputValue::Bool(v)
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputValue::Bool(b) => write!(f, "{b}"),
            InputValue::Integer(i) => write!(f, "{i}"),
            InputValue::Float(x) => write!(f, "{x}"),
            InputValue::Text(s) => write!(f, "{s:?}"),
            InputValue::Other(v) => write!(f, "{v}"),
        }
    }
}

/// Variable name to value; iteration follows key order.
pub type InputAssignment = BTreeMap<String, InputValue>;

/// A named set of input values shipped with an example tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub input_values: InputAssignment,
}

impl SampleInput {
    /// Name shown in listings; unnamed samples are numbered from 1.
    pub fn display_name(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Sample {}", index + 1))
    }
}

/// Response of the external simulation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Visited node ids, root first
    pub path: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visited_nodes: Option<Vec<TreeNode>>,
    pub final_node: TreeNode,
}

/// Response of the external unreachable-node detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnreachableReport {
    pub unreachable_nodes: Vec<String>,
}

/// Request body for the simulation service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRequest<'a> {
    pub tree: &'a DecisionTree,
    pub input_values: &'a InputAssignment,
}

/// Request body for unreachable-node detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnreachableRequest<'a> {
    pub tree: &'a DecisionTree,
    pub sample_inputs: &'a [InputAssignment],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> TreeNode {
        TreeNode::new("root", "Start").with_children(vec![
            TreeNode::new("a", "A")
                .with_condition("input.x > 5")
                .with_children(vec![TreeNode::new("b", "B")]),
            TreeNode::new("c", "C").with_condition("input.x <= 5"),
        ])
    }

    #[test]
    fn given_tree_when_counting_then_reports_nodes_and_depth() {
        let tree = sample_tree();
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.find("b").map(|n| n.text.as_str()), Some("B"));
        assert!(tree.find("missing").is_none());
    }

    #[test]
    fn given_leaf_definition_when_checking_then_requires_no_condition_and_no_children() {
        let tree = sample_tree();
        assert!(!tree.is_leaf());
        assert!(tree.find("b").unwrap().is_leaf());
        // has a condition, so not a terminal in the strict sense
        assert!(!tree.find("c").unwrap().is_leaf());
    }

    #[test]
    fn given_json_without_optional_fields_when_parsing_then_defaults_apply() {
        let json = r#"{"root": {"node_id": "start", "text": "Start"}}"#;
        let tree: DecisionTree = serde_json::from_str(json).unwrap();
        let root = tree.root.unwrap();
        assert_eq!(root.condition, None);
        assert!(root.children.is_empty());
        assert!(tree.sample_inputs.is_empty());
    }

    #[test]
    fn given_json_without_root_when_parsing_then_root_is_absent() {
        let tree: DecisionTree = serde_json::from_str("{}").unwrap();
        assert!(tree.root.is_none());
        assert!(matches!(tree.validate(8), Err(DomainError::MissingRoot)));
    }

    #[test]
    fn given_mixed_values_when_parsing_then_variants_are_typed() {
        let json = r#"{"a": 19, "b": 0.25, "c": "red", "d": false, "e": null}"#;
        let values: InputAssignment = serde_json::from_str(json).unwrap();
        assert_eq!(values["a"], InputValue::Integer(19));
        assert_eq!(values["b"], InputValue::Float(0.25));
        assert_eq!(values["c"], InputValue::Text("red".into()));
        assert_eq!(values["d"], InputValue::Bool(false));
        assert_eq!(values["e"], InputValue::Other(serde_json::Value::Null));
    }

    #[test]
    fn given_duplicate_ids_when_validating_then_reports_first_duplicate() {
        let root = TreeNode::new("root", "Start").with_children(vec![
            TreeNode::new("x", "One"),
            TreeNode::new("x", "Two"),
        ]);
        let err = DecisionTree::new(root).validate(DEFAULT_MAX_DEPTH).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateNodeId(id) if id == "x"));
    }

    #[test]
    fn given_tree_deeper_than_limit_when_validating_then_reports_depth() {
        let tree = DecisionTree::new(sample_tree());
        assert!(tree.validate(2).is_ok());
        assert!(matches!(
            tree.validate(1),
            Err(DomainError::DepthExceeded { limit: 1 })
        ));
    }

    #[test]
    fn given_depth_limit_when_walking_then_stops_descent() {
        let tree = sample_tree();
        let mut seen = Vec::new();
        let complete = tree.walk_preorder(1, &mut |node, _| seen.push(node.node_id.clone()));
        assert!(!complete);
        assert_eq!(seen, vec!["root", "a", "c"]);
    }

    #[test]
    fn given_unnamed_sample_when_displaying_then_numbers_from_one() {
        let sample = SampleInput {
            name: None,
            input_values: InputAssignment::new(),
        };
        assert_eq!(sample.display_name(0), "Sample 1");
    }
}
