use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::index::ResourceIndex;

// ============================================================================
// Identity
// ============================================================================

/// The `{type, id}` pair that identifies a resource across a document.
///
/// Serializes as JSON:API resource linkage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceIdentity {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
}

impl ResourceIdentity {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Canonical `type_id` key
    pub fn key(&self) -> String {
        format!("{}_{}", self.resource_type, self.id)
    }

    /// `{"type": .., "id": ..}` linkage object
    pub fn to_linkage(&self) -> Value {
        serde_json::json!({ "type": self.resource_type, "id": self.id })
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.resource_type, self.id)
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// Handle to a node inside a [`Graph`].
///
/// Two relationships that reach the same `{type, id}` hold equal handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Resolved state of one relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipSlot {
    /// Linkage was `null` or absent.
    Empty,
    Single(NodeId),
    /// Targets in original linkage order.
    Many(Vec<NodeId>),
}

impl RelationshipSlot {
    /// Target handles in stored order; empty for [`RelationshipSlot::Empty`].
    pub fn targets(&self) -> &[NodeId] {
        match self {
            RelationshipSlot::Empty => &[],
            RelationshipSlot::Single(target) => std::slice::from_ref(target),
            RelationshipSlot::Many(targets) => targets,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.targets().is_empty()
    }

    pub fn is_to_many(&self) -> bool {
        matches!(self, RelationshipSlot::Many(_))
    }
}

/// A named relationship on a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub name: String,
    pub slot: RelationshipSlot,
}

/// A materialized resource.
///
/// Attribute keys and relationship names are fixed when the node is
/// populated and keep the order they had in the source resource object.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    identity: ResourceIdentity,
    attributes: Map<String, Value>,
    relationships: Vec<Relationship>,
    meta: Option<Value>,
    links: Option<Value>,
}

impl Node {
    pub(crate) fn stub(identity: ResourceIdentity) -> Self {
        Self {
            identity,
            attributes: Map::new(),
            relationships: Vec::new(),
            meta: None,
            links: None,
        }
    }

    pub(crate) fn populate(
        &mut self,
        attributes: Map<String, Value>,
        relationships: Vec<Relationship>,
        meta: Option<Value>,
        links: Option<Value>,
    ) {
        self.attributes = attributes;
        self.relationships = relationships;
        self.meta = meta;
        self.links = links;
    }

    pub fn identity(&self) -> &ResourceIdentity {
        &self.identity
    }

    pub fn resource_type(&self) -> &str {
        &self.identity.resource_type
    }

    pub fn id(&self) -> &str {
        &self.identity.id
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn attribute_keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Relationships in declaration order
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn relationship(&self, name: &str) -> Option<&RelationshipSlot> {
        self.relationships
            .iter()
            .find(|rel| rel.name == name)
            .map(|rel| &rel.slot)
    }

    pub fn meta(&self) -> Option<&Value> {
        self.meta.as_ref()
    }

    pub fn links(&self) -> Option<&Value> {
        self.links.as_ref()
    }
}

// ============================================================================
// Graph
// ============================================================================

/// Arena of nodes plus the index that deduplicates them.
///
/// A graph is created per input document; nodes are never removed except
/// when a failed build pass is rolled back.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    index: ResourceIndex,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow a node.
    ///
    /// # Panics
    ///
    /// If `id` was not issued by this graph.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Like [`Graph::node`], but `None` for a handle this graph does not
    /// hold, such as one from a larger graph or from before a rollback.
    pub fn try_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn lookup(&self, identity: &ResourceIdentity) -> Option<NodeId> {
        self.index.get(identity)
    }

    /// Shorthand for [`Graph::lookup`] with a borrowed type and id.
    pub fn get(&self, resource_type: &str, id: &str) -> Option<NodeId> {
        self.lookup(&ResourceIdentity::new(resource_type, id))
    }

    pub fn index(&self) -> &ResourceIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes with their handles, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Register an identity-only node. Callers must check the index first.
    pub(crate) fn insert_stub(&mut self, identity: ResourceIdentity) -> NodeId {
        let id = NodeId(self.nodes.len());
        let inserted = self.index.insert(identity.clone(), id);
        debug_assert!(inserted, "identity {identity} registered twice");
        self.nodes.push(Node::stub(identity));
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Drop every node created at or after `mark`, unregistering them.
    pub(crate) fn truncate(&mut self, mark: usize) {
        for node in self.nodes.drain(mark..) {
            self.index.remove(&node.identity);
        }
    }
}
