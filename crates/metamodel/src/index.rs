use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::graph::{NodeId, ResourceIdentity};

/// Identity → node lookup shared by one graph-construction pass.
///
/// Insertion is first-writer-wins: once an identity is present it is never
/// overwritten or removed (short of a failed pass being rolled back by the
/// owning [`Graph`](crate::graph::Graph)).
///
/// Entries are keyed by the full `{type, id}` pair rather than the flattened
/// [`ResourceIdentity::key`] string, so `("a_b", "c")` and `("a", "b_c")`
/// stay distinct.
#[derive(Debug, Clone, Default)]
pub struct ResourceIndex {
    entries: HashMap<ResourceIdentity, NodeId>,
}

impl ResourceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a node. A miss is a normal outcome, not an error.
    pub fn get(&self, identity: &ResourceIdentity) -> Option<NodeId> {
        self.entries.get(identity).copied()
    }

    pub fn contains(&self, identity: &ResourceIdentity) -> bool {
        self.entries.contains_key(identity)
    }

    /// Register `node` under `identity`. Returns `false` and leaves the
    /// existing entry untouched if the identity is already present.
    pub fn insert(&mut self, identity: ResourceIdentity, node: NodeId) -> bool {
        match self.entries.entry(identity) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(node);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All registered identities, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &ResourceIdentity> {
        self.entries.keys()
    }

    pub(crate) fn remove(&mut self, identity: &ResourceIdentity) {
        self.entries.remove(identity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_first_writer_wins() {
        let mut index = ResourceIndex::new();
        let user = ResourceIdentity::new("user", "9");

        assert!(index.insert(user.clone(), NodeId(0)));
        assert!(!index.insert(user.clone(), NodeId(1)));
        assert_eq!(index.get(&user), Some(NodeId(0)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_get_miss_is_none() {
        let index = ResourceIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.get(&ResourceIdentity::new("user", "1")), None);
        assert!(!index.contains(&ResourceIdentity::new("user", "1")));
    }

    #[test]
    fn test_keys_with_underscores_do_not_collide() {
        let mut index = ResourceIndex::new();
        let left = ResourceIdentity::new("a_b", "c");
        let right = ResourceIdentity::new("a", "b_c");
        assert_eq!(left.key(), right.key());

        assert!(index.insert(left.clone(), NodeId(0)));
        assert!(index.insert(right.clone(), NodeId(1)));
        assert_eq!(index.get(&left), Some(NodeId(0)));
        assert_eq!(index.get(&right), Some(NodeId(1)));
    }

    #[test]
    fn test_keys_lists_everything() {
        let mut index = ResourceIndex::new();
        index.insert(ResourceIdentity::new("user", "1"), NodeId(0));
        index.insert(ResourceIdentity::new("post", "1"), NodeId(1));
        let mut keys: Vec<String> = index.keys().map(|i| i.key()).collect();
        keys.sort();
        assert_eq!(keys, vec!["post_1", "user_1"]);
    }
}
