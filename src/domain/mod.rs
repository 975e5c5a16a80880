//! Domain layer: decision tree entities and coverage analysis
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod active_path;
pub mod condition;
pub mod defaults;
pub mod entities;
pub mod error;
pub mod layout;
pub mod render;
pub mod variations;

pub use active_path::{active_link_pairs, ActiveLinkPair};
pub use condition::{parse_condition, Bound, ConditionTriple, Literal, Operator};
pub use defaults::derive_default_inputs;
pub use entities::*;
pub use error::DomainError;
pub use layout::{LayoutParameters, TreeMetrics};
pub use render::{ChildToParentMap, RenderModel, RenderNode, RenderTree, RenderTreeBuilder, NO_CONDITION};
pub use variations::{coverage_samples, generate_variations};
