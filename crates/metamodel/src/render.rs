//! Assemble a JSON:API [`Document`] from a graph.
//!
//! The primary resource carries linkage for every visible relationship;
//! `included` holds the resources selected by [`RenderOptions::include`],
//! each at most once and never the primary itself.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use crate::document::{Document, ResourceObject, linkage_object};
use crate::graph::{NodeId, ResourceIdentity};
use crate::include::InclusionTree;
use crate::naming::TypeNaming;
use crate::project::{Linkage, Projector};

/// Options controlling how a graph is rendered back into a document.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Sparse fieldsets: resource type → attribute and relationship names to
    /// keep. Types without an entry keep everything.
    pub fields: HashMap<String, Vec<String>>,
    /// Relationships to expand into `included`.
    pub include: InclusionTree,
    pub naming: TypeNaming,
    /// Stop collecting `included` resources after this many.
    pub max_included: Option<usize>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields<I, S>(mut self, resource_type: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.insert(
            resource_type.into(),
            fields.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn with_include(mut self, include: InclusionTree) -> Self {
        self.include = include;
        self
    }

    pub fn with_naming(mut self, naming: TypeNaming) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_max_included(mut self, limit: usize) -> Self {
        self.max_included = Some(limit);
        self
    }
}

/// Render `root` and its selected related resources as a document.
///
/// Document-level `meta` and `links` are left empty for the caller to fill.
pub fn render(projector: &Projector<'_>, root: NodeId, options: &RenderOptions) -> Document {
    Document {
        data: resource_object(projector, root, options),
        included: collect_included(projector, root, options),
        meta: None,
        links: None,
    }
}

/// Depth-first walk over the inclusion tree using an explicit stack of
/// pending [`Projector::included`] streams, so arbitrarily long relationship
/// chains never grow the call stack.
///
/// `(node, subtree)` pairs are expanded at most once, which bounds `**` over
/// cycles while still re-expanding a node reached under a different subtree.
fn collect_included(projector: &Projector<'_>, root: NodeId, options: &RenderOptions) -> Vec<ResourceObject> {
    let mut included = Vec::new();
    let mut emitted = HashSet::from([root]);
    let mut visited: HashSet<(NodeId, *const InclusionTree)> = HashSet::new();
    let mut expand = |node: NodeId, tree: &InclusionTree| {
        !tree.is_empty() && visited.insert((node, std::ptr::from_ref(tree)))
    };

    if !expand(root, &options.include) {
        return included;
    }
    let mut stack = vec![projector.included(root, &options.include)];
    while let Some(frame) = stack.last_mut() {
        let Some(entry) = frame.next() else {
            stack.pop();
            continue;
        };
        if emitted.insert(entry.target) {
            if options.max_included.is_some_and(|cap| included.len() >= cap) {
                break;
            }
            included.push(resource_object(projector, entry.target, options));
        }
        if expand(entry.target, entry.tree) {
            stack.push(projector.included(entry.target, entry.tree));
        }
    }
    included
}

fn resource_object(projector: &Projector<'_>, node: NodeId, options: &RenderOptions) -> ResourceObject {
    let owner = projector.graph().node(node);
    let fieldset: Option<Vec<&str>> = options
        .fields
        .get(owner.resource_type())
        .map(|names| names.iter().map(String::as_str).collect());

    let attributes = projector.attributes(node, fieldset.as_deref());
    let relationships: Map<String, Value> = projector
        .linkage(node)
        .into_iter()
        .filter(|(name, _)| fieldset.as_ref().is_none_or(|keep| keep.contains(name)))
        .map(|(name, linkage)| {
            let data = linkage_value(&linkage, options.naming);
            (name.to_string(), linkage_object(data))
        })
        .collect();

    ResourceObject {
        resource_type: options.naming.apply(owner.resource_type()).into_owned(),
        id: owner.id().to_string(),
        attributes,
        relationships,
        meta: owner.meta().cloned(),
        links: owner.links().cloned(),
    }
}

fn linkage_value(linkage: &Linkage<'_>, naming: TypeNaming) -> Value {
    let named = |identity: &ResourceIdentity| {
        ResourceIdentity::new(naming.apply(&identity.resource_type), identity.id.as_str())
            .to_linkage()
    };
    match linkage {
        Linkage::Null => Value::Null,
        Linkage::One(identity) => named(identity),
        Linkage::Many(identities) => Value::Array(identities.iter().map(|i| named(i)).collect()),
    }
}
