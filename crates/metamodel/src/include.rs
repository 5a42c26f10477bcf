use std::collections::BTreeMap;

/// Which relationships to expand into `included`, with nesting.
///
/// An empty tree expands nothing. A key mapped to an empty tree expands
/// that relationship's targets but nothing beneath them.
///
/// Besides explicit keys a level may carry a wildcard: `*` matches every
/// relationship at that level, `**` matches every relationship at every
/// level below.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InclusionTree {
    children: BTreeMap<String, InclusionTree>,
    any: Option<Box<InclusionTree>>,
    recursive: bool,
}

impl InclusionTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a relationship key with its nested tree
    pub fn with(mut self, key: impl Into<String>, nested: InclusionTree) -> Self {
        self.children.insert(key.into(), nested);
        self
    }

    /// Parse comma-separated dotted include paths, e.g.
    /// `"author,comments.author"`. Blank paths and segments are ignored.
    pub fn from_paths(paths: &str) -> Self {
        let mut tree = Self::new();
        for path in paths.split(',') {
            let segments: Vec<&str> = path
                .split('.')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            tree.insert_path(&segments);
        }
        tree
    }

    fn insert_path(&mut self, segments: &[&str]) {
        let Some((first, rest)) = segments.split_first() else {
            return;
        };
        match *first {
            "**" => self.recursive = true,
            "*" => self
                .any
                .get_or_insert_with(Box::default)
                .insert_path(rest),
            key => self
                .children
                .entry(key.to_string())
                .or_default()
                .insert_path(rest),
        }
    }

    /// The nested tree to apply beneath `key`, or `None` if `key` is not
    /// selected at this level.
    pub fn child(&self, key: &str) -> Option<&InclusionTree> {
        if self.recursive {
            return Some(self);
        }
        self.children.get(key).or(self.any.as_deref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.child(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.any.is_none() && !self.recursive
    }

    /// Explicitly named keys at this level, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let tree = InclusionTree::default();
        assert!(tree.is_empty());
        assert!(!tree.contains("author"));
    }

    #[test]
    fn test_builder_nesting() {
        let tree = InclusionTree::new()
            .with("author", InclusionTree::new())
            .with("comments", InclusionTree::new().with("author", InclusionTree::new()));

        assert!(tree.contains("author"));
        assert!(tree.child("author").unwrap().is_empty());
        assert!(tree.child("comments").unwrap().contains("author"));
        assert!(!tree.contains("tags"));
    }

    #[test]
    fn test_from_paths() {
        let tree = InclusionTree::from_paths("author,comments.author, comments.post");
        assert_eq!(tree.keys().collect::<Vec<_>>(), vec!["author", "comments"]);
        let comments = tree.child("comments").unwrap();
        assert_eq!(comments.keys().collect::<Vec<_>>(), vec!["author", "post"]);
        assert!(tree.child("author").unwrap().is_empty());
    }

    #[test]
    fn test_from_paths_matches_builder() {
        let parsed = InclusionTree::from_paths("a,c");
        let built = InclusionTree::new()
            .with("a", InclusionTree::new())
            .with("c", InclusionTree::new());
        assert_eq!(parsed, built);
    }

    #[test]
    fn test_from_paths_ignores_blanks() {
        assert!(InclusionTree::from_paths("").is_empty());
        assert!(InclusionTree::from_paths(" , ,").is_empty());
        let tree = InclusionTree::from_paths("author..posts,");
        assert!(tree.child("author").unwrap().contains("posts"));
    }

    // ── Wildcards ──────────────────────────────────────────────────────

    #[test]
    fn test_single_wildcard() {
        let tree = InclusionTree::from_paths("*,comments.author");
        assert!(tree.contains("anything"));
        assert!(tree.child("anything").unwrap().is_empty());
        assert!(tree.child("comments").unwrap().contains("author"));
    }

    #[test]
    fn test_nested_wildcard() {
        let tree = InclusionTree::from_paths("comments.*");
        let comments = tree.child("comments").unwrap();
        assert!(comments.contains("author"));
        assert!(comments.contains("post"));
        assert!(!tree.contains("author"));
    }

    #[test]
    fn test_recursive_wildcard() {
        let tree = InclusionTree::from_paths("**");
        assert!(!tree.is_empty());
        let deep = tree.child("a").unwrap().child("b").unwrap().child("c").unwrap();
        assert!(deep.contains("d"));
    }
}
