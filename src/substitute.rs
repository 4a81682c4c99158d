use crate::tree::{COMMENT_KEY, Node, is_attr_key};

/// One field edit: every literal occurrence of `old` becomes `new`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Replacement {
    pub field: String,
    pub old: String,
    pub new: String,
}

impl Replacement {
    pub fn new(field: impl Into<String>, old: impl Into<String>, new: impl Into<String>) -> Self {
        Replacement {
            field: field.into(),
            old: old.into(),
            new: new.into(),
        }
    }

    fn is_effective(&self) -> bool {
        !self.old.is_empty() && self.old != self.new
    }
}

/// Applies `replacements` in order, each one against the tree as the previous
/// ones left it, so a later edit can match text an earlier edit produced.
/// Attribute fields are never visited. Returns how many text leaves changed.
pub fn substitute(tree: &mut Node, replacements: &[Replacement]) -> usize {
    let mut total = 0;
    for replacement in replacements.iter().filter(|r| r.is_effective()) {
        let rewritten = replace_text(tree, &replacement.old, &replacement.new);
        log::debug!(
            "field '{}': rewrote {rewritten} text node(s)",
            replacement.field
        );
        total += rewritten;
    }
    total
}

/// Replaces `old` with `new` in every content string below `node`.
/// Matching is literal, left to right and non-overlapping. Comments are
/// not content.
pub fn replace_text(node: &mut Node, old: &str, new: &str) -> usize {
    match node {
        Node::Text(text) => {
            if old.is_empty() || !text.contains(old) {
                return 0;
            }
            *text = text.replace(old, new);
            1
        }
        Node::Attr(_) => 0,
        Node::List(items) => items
            .iter_mut()
            .map(|item| replace_text(item, old, new))
            .sum(),
        Node::Object(obj) => obj
            .fields_mut()
            .filter(|(key, _)| !is_attr_key(key) && *key != COMMENT_KEY)
            .map(|(_, child)| replace_text(child, old, new))
            .sum(),
    }
}
