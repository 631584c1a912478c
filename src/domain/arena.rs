use std::collections::HashSet;
use std::fmt;

use generational_arena::{Arena, Index};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::entities::{ComponentKind, Labels};
use crate::domain::error::{DomainError, DomainResult};

/// Handle to any component node in a [`ComponentArena`].
///
/// Backed by a generational index: a handle to a released node never
/// resolves to a node inserted later into the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "#{}.{}", slot, generation)
    }
}

/// Handle to a node known to be a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeafId(NodeId);

/// Handle to a node known to be a composite. Child management is only
/// reachable through this handle in the typed API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompositeId(NodeId);

impl LeafId {
    pub fn id(self) -> NodeId {
        self.0
    }
}

impl CompositeId {
    pub fn id(self) -> NodeId {
        self.0
    }
}

impl From<LeafId> for NodeId {
    fn from(leaf: LeafId) -> Self {
        leaf.0
    }
}

impl From<CompositeId> for NodeId {
    fn from(composite: CompositeId) -> Self {
        composite.0
    }
}

/// Node stored in the arena.
#[derive(Debug)]
pub struct ComponentNode {
    /// Leaf or composite (with its ordered child handles)
    pub kind: ComponentKind,
    /// Number of child slots, across all composites, that point at this node
    owners: usize,
}

impl ComponentNode {
    pub fn owners(&self) -> usize {
        self.owners
    }
}

/// Arena-backed component tree.
///
/// Nodes are addressed by [`NodeId`]; composites hold child handles in
/// insertion order. A node may be the child of several composites (or of
/// the same composite more than once), but `add` rejects any edge that
/// would close a cycle, so traversal always terminates.
#[derive(Debug)]
pub struct ComponentArena {
    arena: Arena<ComponentNode>,
}

impl Default for ComponentArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn new_leaf(&mut self) -> LeafId {
        LeafId(self.insert(ComponentKind::Leaf))
    }

    #[instrument(level = "trace", skip(self))]
    pub fn new_composite(&mut self) -> CompositeId {
        CompositeId(self.insert(ComponentKind::Composite {
            children: Vec::new(),
        }))
    }

    fn insert(&mut self, kind: ComponentKind) -> NodeId {
        NodeId(self.arena.insert(ComponentNode { kind, owners: 0 }))
    }

    pub fn get_node(&self, id: NodeId) -> DomainResult<&ComponentNode> {
        self.arena.get(id.0).ok_or(DomainError::NodeNotFound(id))
    }

    fn get_node_mut(&mut self, id: NodeId) -> DomainResult<&mut ComponentNode> {
        self.arena.get_mut(id.0).ok_or(DomainError::NodeNotFound(id))
    }

    pub fn is_composite(&self, id: NodeId) -> DomainResult<bool> {
        Ok(self.get_node(id)?.kind.is_composite())
    }

    /// Typed view of `id` if it is a live composite.
    pub fn as_composite(&self, id: NodeId) -> Option<CompositeId> {
        self.arena
            .get(id.0)
            .filter(|node| node.kind.is_composite())
            .map(|_| CompositeId(id))
    }

    /// Typed view of `id` if it is a live leaf.
    pub fn as_leaf(&self, id: NodeId) -> Option<LeafId> {
        self.arena
            .get(id.0)
            .filter(|node| !node.kind.is_composite())
            .map(|_| LeafId(id))
    }

    pub fn children(&self, id: NodeId) -> DomainResult<&[NodeId]> {
        Ok(self.get_node(id)?.kind.children())
    }

    /// Text of the subtree rooted at `id` with the default labels.
    pub fn operation(&self, id: impl Into<NodeId>) -> DomainResult<String> {
        self.render(id.into(), &Labels::default())
    }

    /// Text of the subtree rooted at `id`: leaves yield `labels.leaf`,
    /// composites wrap their children's text, depth-first in insertion order.
    #[instrument(level = "trace", skip(self, labels))]
    pub fn render(&self, id: NodeId, labels: &Labels) -> DomainResult<String> {
        match &self.get_node(id)?.kind {
            ComponentKind::Leaf => Ok(labels.leaf.clone()),
            ComponentKind::Composite { children } => {
                let inner = itertools::process_results(
                    children.iter().map(|&child| self.render(child, labels)),
                    |mut parts| parts.join(&labels.separator),
                )?;
                Ok(format!("{}({})", labels.branch, inner))
            }
        }
    }

    /// Append `child` to `parent`.
    pub fn add(&mut self, parent: CompositeId, child: impl Into<NodeId>) -> DomainResult<()> {
        self.add_node(parent.0, child.into())
    }

    /// Remove the first occurrence of `child` from `parent`.
    /// Returns `false` if `child` was not among the children.
    pub fn remove(&mut self, parent: CompositeId, child: impl Into<NodeId>) -> DomainResult<bool> {
        self.remove_node(parent.0, child.into())
    }

    /// Like [`add`](Self::add) for callers holding an untyped handle.
    /// Fails with `UnsupportedOperation` if `node` is a leaf.
    pub fn try_add(&mut self, node: NodeId, child: impl Into<NodeId>) -> DomainResult<()> {
        self.add_node(node, child.into())
    }

    /// Like [`remove`](Self::remove) for callers holding an untyped handle.
    /// Fails with `UnsupportedOperation` if `node` is a leaf.
    pub fn try_remove(&mut self, node: NodeId, child: impl Into<NodeId>) -> DomainResult<bool> {
        self.remove_node(node, child.into())
    }

    #[instrument(level = "debug", skip(self))]
    fn add_node(&mut self, parent: NodeId, child: NodeId) -> DomainResult<()> {
        if !self.get_node(parent)?.kind.is_composite() {
            return Err(DomainError::UnsupportedOperation {
                operation: "add",
                node: parent,
            });
        }
        self.get_node(child)?;
        if self.reaches(child, parent) {
            return Err(DomainError::CycleDetected { parent, child });
        }

        if let ComponentKind::Composite { children } = &mut self.get_node_mut(parent)?.kind {
            children.push(child);
        }
        self.get_node_mut(child)?.owners += 1;
        debug!("attached {} to {}", child, parent);
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn remove_node(&mut self, parent: NodeId, child: NodeId) -> DomainResult<bool> {
        let removed = match &mut self.get_node_mut(parent)?.kind {
            ComponentKind::Leaf => {
                return Err(DomainError::UnsupportedOperation {
                    operation: "remove",
                    node: parent,
                })
            }
            ComponentKind::Composite { children } => {
                match children.iter().position(|&c| c == child) {
                    Some(pos) => {
                        children.remove(pos);
                        true
                    }
                    None => false,
                }
            }
        };

        if removed {
            if let Some(node) = self.arena.get_mut(child.0) {
                node.owners = node.owners.saturating_sub(1);
            }
            debug!("detached {} from {}", child, parent);
        }
        Ok(removed)
    }

    /// True if `target` is `from` or one of its descendants.
    fn reaches(&self, from: NodeId, target: NodeId) -> bool {
        let mut seen = HashSet::new();
        let mut stack = vec![from];
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(node) = self.arena.get(current.0) {
                stack.extend(node.kind.children().iter().copied());
            }
        }
        false
    }

    /// Drop `id` from the arena.
    ///
    /// Only nodes no composite refers to can be released. Children whose
    /// last owner was a released node are released with it; children still
    /// owned elsewhere survive.
    #[instrument(level = "debug", skip(self))]
    pub fn release(&mut self, id: impl Into<NodeId> + fmt::Debug) -> DomainResult<()> {
        let id = id.into();
        let owners = self.get_node(id)?.owners;
        if owners > 0 {
            return Err(DomainError::StillReferenced { node: id, owners });
        }

        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let Some(node) = self.arena.remove(current.0) else {
                continue;
            };
            for &child in node.kind.children() {
                if let Some(child_node) = self.arena.get_mut(child.0) {
                    child_node.owners = child_node.owners.saturating_sub(1);
                    if child_node.owners == 0 {
                        pending.push(child);
                    }
                }
            }
            debug!("released {}", current);
        }
        Ok(())
    }

    /// Pre-order, left-to-right traversal of the subtree rooted at `root`.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self, root: NodeId) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, root)
    }

    /// Post-order traversal: children before their composite.
    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self, root: NodeId) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, root)
    }

    /// Number of levels in the subtree; a lone leaf or empty composite is 1.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self, root: NodeId) -> DomainResult<usize> {
        self.get_node(root)?;
        Ok(self.calculate_depth(root))
    }

    fn calculate_depth(&self, node_idx: NodeId) -> usize {
        if let Some(node) = self.arena.get(node_idx.0) {
            1 + node
                .kind
                .children()
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Number of leaf positions in the subtree. A shared leaf is counted
    /// once per position, matching how often it appears in the rendered text.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_count(&self, root: NodeId) -> DomainResult<usize> {
        self.get_node(root)?;
        Ok(self
            .iter(root)
            .filter(|(_, node)| !node.kind.is_composite())
            .count())
    }
}

pub struct PreOrderIterator<'a> {
    arena: &'a ComponentArena,
    stack: Vec<NodeId>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(arena: &'a ComponentArena, root: NodeId) -> Self {
        Self {
            arena,
            stack: vec![root],
        }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (NodeId, &'a ComponentNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.arena.arena.get(current.0) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.kind.children().iter().rev().copied());
                return Some((current, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a ComponentArena,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a ComponentArena, root: NodeId) -> Self {
        Self {
            arena,
            stack: vec![(root, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (NodeId, &'a ComponentNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.arena.get(current.0) {
                if visited {
                    return Some((current, node));
                }
                self.stack.push((current, true));
                for &child in node.kind.children().iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_display_shows_slot_and_generation() {
        let mut arena = ComponentArena::new();
        let leaf = arena.new_leaf();
        assert_eq!(leaf.id().to_string(), "#0.0");
    }

    #[test]
    fn released_slot_is_not_aliased_by_new_node() {
        let mut arena = ComponentArena::new();
        let old = arena.new_leaf();
        arena.release(old).unwrap();
        let new = arena.new_leaf();

        assert_ne!(old.id(), new.id());
        assert!(!arena.contains(old.id()));
        assert_eq!(
            arena.operation(old),
            Err(DomainError::NodeNotFound(old.id()))
        );
    }

    #[test]
    fn reaches_follows_shared_children_once() {
        let mut arena = ComponentArena::new();
        let root = arena.new_composite();
        let shared = arena.new_composite();
        let leaf = arena.new_leaf();
        arena.add(shared, leaf).unwrap();
        arena.add(root, shared).unwrap();
        arena.add(root, shared).unwrap();

        assert!(arena.reaches(root.id(), leaf.id()));
        assert!(!arena.reaches(leaf.id(), root.id()));
    }

    #[test]
    fn owners_track_every_child_slot() {
        let mut arena = ComponentArena::new();
        let root = arena.new_composite();
        let leaf = arena.new_leaf();
        arena.add(root, leaf).unwrap();
        arena.add(root, leaf).unwrap();
        assert_eq!(arena.get_node(leaf.id()).unwrap().owners(), 2);

        assert!(arena.remove(root, leaf).unwrap());
        assert_eq!(arena.get_node(leaf.id()).unwrap().owners(), 1);
    }
}
