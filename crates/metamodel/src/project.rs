//! Read-only projections of a built [`Graph`].

use serde::Serialize;
use serde_json::{Map, Value};

use crate::graph::{Graph, Node, NodeId, RelationshipSlot, ResourceIdentity};
use crate::include::InclusionTree;

type Exclusion<'g> = dyn Fn(&str, &Node) -> bool + 'g;

/// Projects nodes of a graph into attribute maps, relationship linkage, and
/// a lazy stream of related resources to include.
///
/// An optional exclusion predicate `(key, node) -> bool` hides attributes
/// and relationships per node. It is consulted once per key per projection.
pub struct Projector<'g> {
    graph: &'g Graph,
    exclusion: Option<Box<Exclusion<'g>>>,
}

/// Relationship linkage derived from a slot, borrowing identities from the
/// graph. Serializes as the JSON:API `data` member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Linkage<'g> {
    Null,
    One(&'g ResourceIdentity),
    Many(Vec<&'g ResourceIdentity>),
}

/// One related resource reachable under an [`InclusionTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludedEntry<'g, 't> {
    /// Relationship the target was reached through
    pub relationship: &'g str,
    pub target: NodeId,
    /// Tree to apply when walking beneath `target`
    pub tree: &'t InclusionTree,
}

impl<'g> Projector<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            exclusion: None,
        }
    }

    /// Install the exclusion predicate; `true` omits the key.
    pub fn with_exclusion(mut self, predicate: impl Fn(&str, &Node) -> bool + 'g) -> Self {
        self.exclusion = Some(Box::new(predicate));
        self
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    fn is_excluded(&self, key: &str, node: &Node) -> bool {
        self.exclusion
            .as_ref()
            .is_some_and(|predicate| predicate(key, node))
    }

    /// Attributes of `node`, restricted to `requested` when given.
    ///
    /// Keys the node lacks are ignored. The result is a fresh map in the
    /// node's attribute order.
    pub fn attributes(&self, node: NodeId, requested: Option<&[&str]>) -> Map<String, Value> {
        let owner = self.graph.node(node);
        let mut projected = Map::new();
        for (key, value) in owner.attributes() {
            if self.is_excluded(key, owner) {
                continue;
            }
            if requested.is_some_and(|keys| !keys.contains(&key.as_str())) {
                continue;
            }
            projected.insert(key.clone(), value.clone());
        }
        projected
    }

    /// Linkage for every non-excluded relationship, in declaration order.
    pub fn linkage(&self, node: NodeId) -> Vec<(&'g str, Linkage<'g>)> {
        let owner = self.graph.node(node);
        owner
            .relationships()
            .iter()
            .filter(|rel| !self.is_excluded(&rel.name, owner))
            .map(|rel| {
                let linkage = match &rel.slot {
                    RelationshipSlot::Empty => Linkage::Null,
                    RelationshipSlot::Single(target) => {
                        Linkage::One(self.graph.node(*target).identity())
                    }
                    RelationshipSlot::Many(targets) => Linkage::Many(
                        targets
                            .iter()
                            .map(|&t| self.graph.node(t).identity())
                            .collect(),
                    ),
                };
                (rel.name.as_str(), linkage)
            })
            .collect()
    }

    /// Lazily yield every target of every relationship of `node` selected
    /// by `tree`, in relationship declaration order and stored target order.
    ///
    /// The iterator is single-pass; call again to re-traverse. Recursing into
    /// nested inclusion is up to the caller, using each entry's `tree`.
    pub fn included<'t>(
        &self,
        node: NodeId,
        tree: &'t InclusionTree,
    ) -> impl Iterator<Item = IncludedEntry<'g, 't>> {
        let owner = self.graph.node(node);
        owner
            .relationships()
            .iter()
            .filter(move |rel| !self.is_excluded(&rel.name, owner))
            .filter_map(move |rel| tree.child(&rel.name).map(|nested| (rel, nested)))
            .flat_map(|(rel, nested)| {
                rel.slot.targets().iter().map(move |&target| IncludedEntry {
                    relationship: rel.name.as_str(),
                    target,
                    tree: nested,
                })
            })
    }
}
