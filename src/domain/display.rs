//! Terminal tree rendering via `termtree`

use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{ComponentArena, NodeId};
use crate::domain::entities::{ComponentKind, Labels};
use crate::domain::error::DomainResult;

pub trait ToTermTree {
    fn to_term_tree(&self, root: NodeId, labels: &Labels) -> DomainResult<Tree<String>>;
}

impl ToTermTree for ComponentArena {
    #[instrument(level = "debug", skip(self, labels))]
    fn to_term_tree(&self, root: NodeId, labels: &Labels) -> DomainResult<Tree<String>> {
        match &self.get_node(root)?.kind {
            ComponentKind::Leaf => Ok(Tree::new(labels.leaf.clone())),
            ComponentKind::Composite { children } => {
                let leaves = children
                    .iter()
                    .map(|&child| self.to_term_tree(child, labels))
                    .collect::<DomainResult<Vec<_>>>()?;
                Ok(Tree::new(labels.branch.clone()).with_leaves(leaves))
            }
        }
    }
}
