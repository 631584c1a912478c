//! Domain entities: rendering vocabulary shared by the arena, builder and display

use serde::{Deserialize, Serialize};

/// Tokens used when rendering a component tree as text.
///
/// A composite renders as `<branch>(<child><separator><child>...)`,
/// a leaf renders as `<leaf>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Labels {
    /// Token produced by every leaf
    pub leaf: String,
    /// Token opening every composite
    pub branch: String,
    /// Placed between consecutive child results, never after the last
    pub separator: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            leaf: "Leaf".into(),
            branch: "Branch".into(),
            separator: "+".into(),
        }
    }
}

/// Kind of a component node.
///
/// Every node is exactly one of the two variants; compositeness is a
/// property of the variant, so there is no default a new variant could
/// silently inherit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentKind {
    Leaf,
    Composite { children: Vec<crate::domain::NodeId> },
}

impl ComponentKind {
    pub fn is_composite(&self) -> bool {
        match self {
            ComponentKind::Leaf => false,
            ComponentKind::Composite { .. } => true,
        }
    }

    /// Child handles in insertion order; always empty for leaves.
    pub fn children(&self) -> &[crate::domain::NodeId] {
        match self {
            ComponentKind::Leaf => &[],
            ComponentKind::Composite { children } => children,
        }
    }
}
