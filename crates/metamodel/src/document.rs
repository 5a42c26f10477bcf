use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::graph::ResourceIdentity;

/// A JSON:API document: one primary resource plus optional sideloaded
/// resources.
///
/// Only the parts the resource graph needs are modelled. `meta` and `links`
/// are carried through untouched.
///
/// # JSON shape
///
/// ```json
/// {
///   "data": {
///     "type": "post", "id": "1",
///     "attributes": { "title": "Hi" },
///     "relationships": { "author": { "data": { "type": "user", "id": "9" } } }
///   },
///   "included": [
///     { "type": "user", "id": "9", "attributes": { "name": "Ann" } }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub data: ResourceObject,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<ResourceObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Value>,
}

/// A single resource object, either primary `data` or an `included` entry.
///
/// Relationship objects are kept as raw JSON so that malformed linkage is
/// reported by the graph builder with the relationship name attached,
/// instead of as an anonymous deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub relationships: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Value>,
}

// ============================================================================
// Convenience methods
// ============================================================================

impl Document {
    /// Create a document around a primary resource
    pub fn new(data: ResourceObject) -> Self {
        Self {
            data,
            included: Vec::new(),
            meta: None,
            links: None,
        }
    }

    /// Append a sideloaded resource
    pub fn with_included(mut self, resource: ResourceObject) -> Self {
        self.included.push(resource);
        self
    }

    /// Parse a JSON:API document from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl ResourceObject {
    /// Create a resource object with no attributes or relationships
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
            attributes: Map::new(),
            relationships: Map::new(),
            meta: None,
            links: None,
        }
    }

    /// The `{type, id}` pair identifying this resource
    pub fn identity(&self) -> ResourceIdentity {
        ResourceIdentity::new(self.resource_type.as_str(), self.id.as_str())
    }

    /// Set an attribute value
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Add a to-one relationship. `None` produces `"data": null`.
    pub fn with_to_one(mut self, name: impl Into<String>, target: Option<ResourceIdentity>) -> Self {
        let data = match target {
            Some(identity) => identity.to_linkage(),
            None => Value::Null,
        };
        self.relationships.insert(name.into(), linkage_object(data));
        self
    }

    /// Add a to-many relationship, preserving target order
    pub fn with_to_many<I>(mut self, name: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = ResourceIdentity>,
    {
        let data = targets
            .into_iter()
            .map(|identity| identity.to_linkage())
            .collect();
        self.relationships
            .insert(name.into(), linkage_object(Value::Array(data)));
        self
    }
}

pub(crate) fn linkage_object(data: Value) -> Value {
    let mut object = Map::new();
    object.insert("data".to_string(), data);
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_minimal_document() {
        let doc = Document::from_json(r#"{"data":{"type":"post","id":"1"}}"#).unwrap();
        assert_eq!(doc.data.resource_type, "post");
        assert_eq!(doc.data.id, "1");
        assert!(doc.data.attributes.is_empty());
        assert!(doc.included.is_empty());
    }

    #[test]
    fn test_parse_preserves_declaration_order() {
        let json = r#"{"data":{"type":"post","id":"1",
            "attributes":{"zeta":1,"alpha":2,"mid":3},
            "relationships":{"tags":{"data":[]},"author":{"data":null}}}}"#;
        let doc = Document::from_json(json).unwrap();
        let keys: Vec<&str> = doc.data.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        let rels: Vec<&str> = doc.data.relationships.keys().map(String::as_str).collect();
        assert_eq!(rels, vec!["tags", "author"]);
    }

    #[test]
    fn test_parse_rejects_missing_id() {
        assert!(Document::from_json(r#"{"data":{"type":"post"}}"#).is_err());
    }

    #[test]
    fn test_parse_rejects_non_string_id() {
        assert!(Document::from_json(r#"{"data":{"type":"post","id":1}}"#).is_err());
    }

    #[test]
    fn test_parse_from_json_invalid() {
        assert!(Document::from_json("not json").is_err());
    }

    // ── Builders ───────────────────────────────────────────────────────

    #[test]
    fn test_resource_builders() {
        let post = ResourceObject::new("post", "1")
            .with_attribute("title", "Hi")
            .with_to_one("author", Some(ResourceIdentity::new("user", "9")))
            .with_to_one("editor", None)
            .with_to_many(
                "tags",
                vec![
                    ResourceIdentity::new("tag", "a"),
                    ResourceIdentity::new("tag", "b"),
                ],
            );

        assert_eq!(post.attributes["title"], json!("Hi"));
        assert_eq!(
            post.relationships["author"],
            json!({"data": {"type": "user", "id": "9"}})
        );
        assert_eq!(post.relationships["editor"], json!({"data": null}));
        assert_eq!(
            post.relationships["tags"],
            json!({"data": [{"type": "tag", "id": "a"}, {"type": "tag", "id": "b"}]})
        );
    }

    #[test]
    fn test_document_skips_empty_sections() {
        let doc = Document::new(ResourceObject::new("post", "1"));
        let json = doc.to_json().unwrap();
        assert_eq!(json, r#"{"data":{"type":"post","id":"1"}}"#);
    }

    #[test]
    fn test_meta_and_links_pass_through() {
        let json = r#"{"data":{"type":"post","id":"1","links":{"self":"/posts/1"}},
            "meta":{"total":1},"links":{"self":"/posts"}}"#;
        let doc = Document::from_json(json).unwrap();
        assert_eq!(doc.meta, Some(json!({"total": 1})));
        assert_eq!(doc.links, Some(json!({"self": "/posts"})));
        assert_eq!(doc.data.links, Some(json!({"self": "/posts/1"})));

        let out = doc.to_json_pretty().unwrap();
        assert!(out.contains("\"total\""));
        assert!(out.contains("/posts/1"));
    }

    #[test]
    fn test_identity_of_resource() {
        let res = ResourceObject::new("user", "9");
        assert_eq!(res.identity(), ResourceIdentity::new("user", "9"));
    }
}
