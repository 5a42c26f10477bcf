//! Materialize a [`Document`] into a [`Graph`].

use serde_json::Value;
use tracing::{debug, trace};

use crate::document::{Document, ResourceObject};
use crate::error::{GraphError, Result};
use crate::graph::{Graph, NodeId, Relationship, RelationshipSlot, ResourceIdentity};

/// Builds resource graphs from JSON:API documents.
///
/// Construction is two-phase. Every resource object the document supplies
/// (primary first, then `included` in order) is registered as an
/// identity-only node before any node is populated, so relationship
/// resolution always finds sideloaded resources regardless of their
/// position and cycles resolve to the nodes already registered. Targets
/// the document never supplies become identity-only nodes, registered so
/// that every reference to them shares one handle.
///
/// The first writer of an identity wins: a primary resource repeated in
/// `included`, or an `included` entry listed twice, is populated once from
/// its first occurrence.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    max_resources: Option<usize>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`GraphError::ResourceLimit`] if one pass would create more
    /// than `limit` nodes.
    pub fn max_resources(mut self, limit: usize) -> Self {
        self.max_resources = Some(limit);
        self
    }

    /// Build a fresh graph, returning it with the primary resource's handle.
    pub fn build(&self, document: &Document) -> Result<(Graph, NodeId)> {
        let mut graph = Graph::new();
        let root = self.build_into(&mut graph, document)?;
        Ok((graph, root))
    }

    /// Parse `json` and build a fresh graph from it.
    pub fn build_json(&self, json: &str) -> Result<(Graph, NodeId)> {
        let document = Document::from_json(json)?;
        self.build(&document)
    }

    /// Build `document` into an existing graph, reusing any node already
    /// indexed under the same identity.
    ///
    /// On error the graph is restored to its state before the call.
    pub fn build_into(&self, graph: &mut Graph, document: &Document) -> Result<NodeId> {
        let mark = graph.len();
        self.run(graph, mark, document).inspect_err(|_| graph.truncate(mark))
    }

    fn run(&self, graph: &mut Graph, mark: usize, document: &Document) -> Result<NodeId> {
        let mut pending: Vec<(NodeId, &ResourceObject)> =
            Vec::with_capacity(1 + document.included.len());

        let primary = document.data.identity();
        let root = match graph.lookup(&primary) {
            Some(existing) => {
                debug!(resource = %primary, "primary resource already indexed");
                existing
            }
            None => {
                let id = self.register(graph, mark, primary)?;
                pending.push((id, &document.data));
                id
            }
        };

        for resource in &document.included {
            let identity = resource.identity();
            if graph.lookup(&identity).is_some() {
                debug!(resource = %identity, "skipping duplicate resource");
                continue;
            }
            let id = self.register(graph, mark, identity)?;
            pending.push((id, resource));
        }

        for (id, resource) in pending {
            let mut relationships = Vec::with_capacity(resource.relationships.len());
            for (name, value) in &resource.relationships {
                let slot = self.resolve_slot(graph, mark, name, value)?;
                relationships.push(Relationship {
                    name: name.clone(),
                    slot,
                });
            }
            graph.node_mut(id).populate(
                resource.attributes.clone(),
                relationships,
                resource.meta.clone(),
                resource.links.clone(),
            );
        }

        debug!(
            root = %graph.node(root).identity(),
            created = graph.len() - mark,
            total = graph.len(),
            "built resource graph"
        );
        Ok(root)
    }

    fn register(&self, graph: &mut Graph, mark: usize, identity: ResourceIdentity) -> Result<NodeId> {
        if let Some(limit) = self.max_resources
            && graph.len() - mark >= limit
        {
            return Err(GraphError::ResourceLimit { limit });
        }
        Ok(graph.insert_stub(identity))
    }

    fn resolve_slot(
        &self,
        graph: &mut Graph,
        mark: usize,
        relationship: &str,
        value: &Value,
    ) -> Result<RelationshipSlot> {
        let data = match value {
            Value::Object(object) => object.get("data"),
            Value::Null => None,
            _ => {
                return Err(GraphError::malformed(
                    relationship,
                    "relationship is not an object",
                ));
            }
        };

        match data {
            None | Some(Value::Null) => Ok(RelationshipSlot::Empty),
            Some(Value::Array(entries)) => {
                let mut targets = Vec::with_capacity(entries.len());
                for entry in entries {
                    targets.push(self.resolve_target(graph, mark, relationship, entry)?);
                }
                Ok(RelationshipSlot::Many(targets))
            }
            Some(entry) => Ok(RelationshipSlot::Single(
                self.resolve_target(graph, mark, relationship, entry)?,
            )),
        }
    }

    fn resolve_target(
        &self,
        graph: &mut Graph,
        mark: usize,
        relationship: &str,
        linkage: &Value,
    ) -> Result<NodeId> {
        let identity = parse_linkage(relationship, linkage)?;
        match graph.lookup(&identity) {
            Some(existing) => Ok(existing),
            None => {
                trace!(resource = %identity, relationship, "creating minimal node");
                self.register(graph, mark, identity)
            }
        }
    }
}

/// Build a fresh graph with default options.
pub fn build(document: &Document) -> Result<(Graph, NodeId)> {
    GraphBuilder::new().build(document)
}

fn parse_linkage(relationship: &str, linkage: &Value) -> Result<ResourceIdentity> {
    let object = linkage
        .as_object()
        .ok_or_else(|| GraphError::malformed(relationship, "linkage entry is not an object"))?;

    let field = |name: &str| match object.get(name) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(GraphError::malformed(
            relationship,
            format!("`{name}` is not a string"),
        )),
        None => Err(GraphError::malformed(relationship, format!("missing `{name}`"))),
    };

    Ok(ResourceIdentity::new(field("type")?, field("id")?))
}
