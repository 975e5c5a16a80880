//! Links to emphasize for a traversal result.

use serde::{Deserialize, Serialize};

use crate::domain::render::ChildToParentMap;

/// Parent-child edge on the active path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveLinkPair {
    pub source: String,
    pub target: String,
}

impl ActiveLinkPair {
    /// True if this pair joins `a` and `b`, in either orientation.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// One pair per step of `active_path` whose node has a known parent.
///
/// Steps whose node is missing from `parents` (stale path, edited tree) are
/// skipped.
pub fn active_link_pairs(active_path: &[String], parents: &ChildToParentMap) -> Vec<ActiveLinkPair> {
    active_path
        .iter()
        .skip(1)
        .filter_map(|child| {
            parents.get(child).map(|parent| ActiveLinkPair {
                source: parent.clone(),
                target: child.clone(),
            })
        })
        .collect()
}
