//! Seed input assignment derived from a tree's conditions.

use tracing::{debug, warn};

use crate::domain::condition::{parse_condition, Bound};
use crate::domain::entities::{InputAssignment, TreeNode};

/// Derive one representative value for every variable referenced in the tree.
///
/// Nodes are visited in pre-order and the first comparison seen for a
/// variable decides its value:
/// - `>`/`>=`: numeric literal + 1
/// - `<`/`<=`: numeric literal - 1
/// - anything else: the literal itself
///
/// String literals are never shifted. The result satisfies the first
/// comparison for each variable in isolation; it is a seed, not a solution
/// for the whole tree.
pub fn derive_default_inputs(root: &TreeNode, max_depth: usize) -> InputAssignment {
    let mut inputs = InputAssignment::new();

    let complete = root.walk_preorder(max_depth, &mut |node, _depth| {
        for triple in parse_condition(node.condition.as_deref()) {
            if inputs.contains_key(&triple.variable) {
                continue;
            }
            let value = match triple.operator.bound() {
                Bound::Above => triple.literal.offset(1),
                Bound::Below => triple.literal.offset(-1),
                Bound::Exact => (&triple.literal).into(),
            };
            inputs.insert(triple.variable, value);
        }
    });
    if !complete {
        warn!("tree deeper than {} levels, deeper conditions ignored", max_depth);
    }

    debug!("derived {} default inputs", inputs.len());
    inputs
}
