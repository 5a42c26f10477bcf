#![doc = include_str!("../README.md")]

mod builder;
mod document;
mod error;
mod graph;
mod include;
mod index;
mod naming;
mod project;
mod render;

pub mod v1 {
    //! Versioned public API for building and projecting resource graphs.
    //!
    //! Everything you need is re-exported from this module. Types are organized
    //! into four groups:
    //!
    //! # Documents
    //!
    //! The JSON:API wire shapes you parse and emit:
    //!
    //! - [`Document`] — primary `data` plus sideloaded `included` resources
    //! - [`ResourceObject`] — one resource: type, id, attributes, relationships
    //!
    //! # Graph
    //!
    //! The materialized, deduplicated form of a document:
    //!
    //! - [`GraphBuilder`] / [`build`] — turn a [`Document`] into a [`Graph`]
    //! - [`Graph`] — node arena plus its [`ResourceIndex`]
    //! - [`Node`], [`NodeId`] — a resource and the handle that identifies it
    //! - [`ResourceIdentity`] — the `{type, id}` deduplication key
    //! - [`Relationship`], [`RelationshipSlot`] — resolved relationship targets
    //!
    //! # Projection
    //!
    //! Reading a graph back out:
    //!
    //! - [`Projector`] — attributes, linkage, and lazy [`IncludedEntry`] streams
    //! - [`InclusionTree`] — which relationships to expand, with nesting
    //! - [`render`] with [`RenderOptions`] and [`TypeNaming`] — assemble a
    //!   [`Document`] again
    //!
    //! # Errors
    //!
    //! - [`GraphError`], [`Result`]
    //!
    //! # Example — build, inspect, and project a post with its author
    //!
    //! ```
    //! use metamodel::v1::*;
    //! use serde_json::json;
    //!
    //! let doc = Document::from_json(r#"{
    //!     "data": {"type": "post", "id": "1",
    //!              "attributes": {"title": "Hi"},
    //!              "relationships": {"author": {"data": {"type": "user", "id": "9"}}}},
    //!     "included": [{"type": "user", "id": "9", "attributes": {"name": "Ann"}}]
    //! }"#).unwrap();
    //!
    //! let (graph, root) = build(&doc).unwrap();
    //! assert_eq!(graph.node(root).attribute("title"), Some(&json!("Hi")));
    //!
    //! let ann = graph.get("user", "9").unwrap();
    //! assert_eq!(graph.node(root).relationship("author"), Some(&RelationshipSlot::Single(ann)));
    //!
    //! let tree = InclusionTree::from_paths("author");
    //! let projector = Projector::new(&graph);
    //! let entries: Vec<IncludedEntry> = projector.included(root, &tree).collect();
    //! assert_eq!(entries.len(), 1);
    //! assert_eq!(entries[0].relationship, "author");
    //! assert_eq!(entries[0].target, ann);
    //! assert!(entries[0].tree.is_empty());
    //! ```
    //!
    //! # Example — reshape a document
    //!
    //! ```
    //! use metamodel::v1::*;
    //!
    //! let doc = Document::new(
    //!     ResourceObject::new("post", "1")
    //!         .with_attribute("title", "Hi")
    //!         .with_attribute("body", "Hello")
    //!         .with_to_one("author", Some(ResourceIdentity::new("user", "9"))),
    //! )
    //! .with_included(ResourceObject::new("user", "9").with_attribute("name", "Ann"));
    //!
    //! let (graph, root) = build(&doc).unwrap();
    //! let options = RenderOptions::new()
    //!     .with_fields("post", ["title", "author"])
    //!     .with_include(InclusionTree::from_paths("author"))
    //!     .with_naming(TypeNaming::Plural);
    //!
    //! let out = render(&Projector::new(&graph), root, &options);
    //! assert_eq!(out.data.resource_type, "posts");
    //! assert!(out.data.attributes.contains_key("title"));
    //! assert!(!out.data.attributes.contains_key("body"));
    //! assert_eq!(out.included.len(), 1);
    //! assert_eq!(out.included[0].resource_type, "users");
    //! ```

    pub use crate::builder::{GraphBuilder, build};
    pub use crate::document::{Document, ResourceObject};
    pub use crate::error::{GraphError, Result};
    pub use crate::graph::{Graph, Node, NodeId, Relationship, RelationshipSlot, ResourceIdentity};
    pub use crate::include::InclusionTree;
    pub use crate::index::ResourceIndex;
    pub use crate::naming::{TypeNaming, pluralize};
    pub use crate::project::{IncludedEntry, Linkage, Projector};
    pub use crate::render::{RenderOptions, render};
}
