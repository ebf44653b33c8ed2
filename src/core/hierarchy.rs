// Scene hierarchy with typed components and upward lookups

use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Index of a node inside a [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Errors raised when editing the hierarchy
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("Unknown scene node: {0:?}")]
    UnknownNode(NodeId),

    #[error("Parenting {child:?} under {parent:?} would create a cycle")]
    Cycle { child: NodeId, parent: NodeId },
}

#[derive(Default)]
struct Node {
    parent: Option<NodeId>,
    components: HashMap<TypeId, Box<dyn Any>>,
}

/// Arena-backed scene graph
///
/// Nodes only know their parent; lookups walk parent links upward.
/// Each node holds at most one component per type.
#[derive(Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    /// Create an empty scene graph
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Add a node, optionally attached under `parent`
    /// An unknown parent is logged and the node becomes a root
    pub fn spawn(&mut self, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = match parent {
            Some(p) if !self.contains(p) => {
                log::warn!("Spawning {:?} as a root: parent {:?} does not exist", id, p);
                None
            }
            other => other,
        };
        self.nodes.push(Node {
            parent,
            components: HashMap::new(),
        });
        id
    }

    /// Check if a node belongs to this graph
    pub fn contains(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    /// Number of nodes in the graph
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the parent of a node (None for roots and unknown nodes)
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    /// Re-parent a node, or detach it with `None`
    pub fn set_parent(
        &mut self,
        node: NodeId,
        parent: Option<NodeId>,
    ) -> Result<(), HierarchyError> {
        if !self.contains(node) {
            return Err(HierarchyError::UnknownNode(node));
        }

        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(HierarchyError::UnknownNode(parent));
            }

            // The new parent must not be the node itself or one of its descendants
            let mut current = Some(parent);
            while let Some(ancestor) = current {
                if ancestor == node {
                    return Err(HierarchyError::Cycle {
                        child: node,
                        parent,
                    });
                }
                current = self.parent(ancestor);
            }
        }

        self.nodes[node.0].parent = parent;
        Ok(())
    }

    /// Attach a component to a node, replacing any previous one of the same type
    /// Returns false if the node does not exist
    pub fn insert_component<T: Any>(&mut self, node: NodeId, component: T) -> bool {
        match self.nodes.get_mut(node.0) {
            Some(n) => {
                n.components.insert(TypeId::of::<T>(), Box::new(component));
                true
            }
            None => false,
        }
    }

    /// Get a component attached directly to a node
    pub fn get_component<T: Any>(&self, node: NodeId) -> Option<&T> {
        self.nodes
            .get(node.0)?
            .components
            .get(&TypeId::of::<T>())?
            .downcast_ref::<T>()
    }

    /// Get a mutable component attached directly to a node
    pub fn get_component_mut<T: Any>(&mut self, node: NodeId) -> Option<&mut T> {
        self.nodes
            .get_mut(node.0)?
            .components
            .get_mut(&TypeId::of::<T>())?
            .downcast_mut::<T>()
    }

    /// Iterate over the strict ancestors of a node, nearest first
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors {
            graph: self,
            next: self.parent(node),
        }
    }

    /// Find the nearest strict ancestor that carries a `T` component
    ///
    /// The starting node itself is never inspected.
    pub fn find_ancestor_with<T: Any>(&self, node: NodeId) -> Option<NodeId> {
        self.ancestors(node)
            .find(|ancestor| self.get_component::<T>(*ancestor).is_some())
    }

    /// Find a `T` component on the nearest strict ancestor that has one
    pub fn find_component_in_parent<T: Any>(&self, node: NodeId) -> Option<&T> {
        self.ancestors(node)
            .find_map(|ancestor| self.get_component::<T>(ancestor))
    }
}

/// Iterator over parent links, see [`SceneGraph::ancestors`]
pub struct Ancestors<'a> {
    graph: &'a SceneGraph,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.graph.parent(current);
        Some(current)
    }
}
