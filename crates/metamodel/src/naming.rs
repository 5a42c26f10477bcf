use std::borrow::Cow;

/// How resource `type` strings are written when a graph is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeNaming {
    /// Emit types exactly as they were read.
    #[default]
    Verbatim,
    /// Emit the plural form (`post` → `posts`, `category` → `categories`).
    Plural,
}

impl TypeNaming {
    pub fn apply<'a>(&self, resource_type: &'a str) -> Cow<'a, str> {
        match self {
            TypeNaming::Verbatim => Cow::Borrowed(resource_type),
            TypeNaming::Plural => Cow::Owned(pluralize(resource_type)),
        }
    }
}

/// Regular English plural of a singular word.
///
/// Irregular nouns are not handled, and a word already ending in `s` is
/// still treated as singular (`bus` → `buses`).
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let lower = word.to_ascii_lowercase();
    if lower.ends_with(['s', 'x', 'z']) || lower.ends_with("ch") || lower.ends_with("sh") {
        return format!("{word}es");
    }
    if let Some(stem) = word.strip_suffix(['y', 'Y']) {
        let before = stem.chars().last().map(|c| c.to_ascii_lowercase());
        if before.is_some_and(|c| !"aeiou".contains(c)) {
            return format!("{stem}ies");
        }
    }
    format!("{word}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize_regular() {
        assert_eq!(pluralize("post"), "posts");
        assert_eq!(pluralize("user"), "users");
        assert_eq!(pluralize("comment"), "comments");
    }

    #[test]
    fn test_pluralize_sibilants() {
        assert_eq!(pluralize("class"), "classes");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("batch"), "batches");
        assert_eq!(pluralize("wish"), "wishes");
        assert_eq!(pluralize("quiz"), "quizes");
        assert_eq!(pluralize("bus"), "buses");
        assert_eq!(pluralize("Status"), "Statuses");
    }

    #[test]
    fn test_pluralize_consonant_y() {
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("y"), "ys");
    }

    #[test]
    fn test_pluralize_empty() {
        assert_eq!(pluralize(""), "");
    }

    #[test]
    fn test_naming_apply() {
        assert_eq!(TypeNaming::Verbatim.apply("post"), "post");
        assert_eq!(TypeNaming::Plural.apply("post"), "posts");
        assert_eq!(TypeNaming::default(), TypeNaming::Verbatim);
    }
}
