//! In-memory markup tree.
//!
//! Every element becomes an [`Object`]: an ordered multi-map of field name to
//! [`Node`]. Attribute fields carry the [`ATTR_PREFIX`], character data lives
//! under [`TEXT_KEY`], and repeated sibling elements may be folded into a
//! [`Node::List`]. Accessors that take an element name always flatten lists,
//! so callers never branch on "one child or many".

pub const ATTR_PREFIX: &str = "@_";
pub const TEXT_KEY: &str = "#text";
pub const COMMENT_KEY: &str = "#comment";

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Text(String),
    Attr(String),
    Object(Object),
    List(Vec<Node>),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Object {
    fields: Vec<(String, Node)>,
}

pub fn is_attr_key(key: &str) -> bool {
    key.starts_with(ATTR_PREFIX)
}

impl Node {
    /// String payload of a text leaf or attribute value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Text(s) | Node::Attr(s) => Some(s),
            Node::Object(_) | Node::List(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Node::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Node::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn fields_mut(&mut self) -> impl Iterator<Item = (&str, &mut Node)> {
        self.fields.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Appends a field. A sibling with the same name as the last field is
    /// folded into a list so contiguous runs of elements stay together.
    pub fn push(&mut self, key: impl Into<String>, node: Node) {
        let key = key.into();
        if !is_attr_key(&key)
            && !key.starts_with('#')
            && let Some((last_key, last)) = self.fields.last_mut()
            && *last_key == key
        {
            match last {
                Node::List(items) => items.push(node),
                other => {
                    let first = std::mem::replace(other, Node::List(Vec::new()));
                    *other = Node::List(vec![first, node]);
                }
            }
            return;
        }
        self.fields.push((key, node));
    }

    /// First field stored under `key`, as written.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// All element nodes named `key`, in document order, with lists flattened.
    pub fn children<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.fields
            .iter()
            .filter(move |(k, _)| k == key)
            .flat_map(|(_, node)| match node {
                Node::List(items) => items.as_slice(),
                other => std::slice::from_ref(other),
            })
    }

    pub fn children_mut<'a>(&'a mut self, key: &'a str) -> impl Iterator<Item = &'a mut Node> + 'a {
        self.fields
            .iter_mut()
            .filter(move |(k, _)| k == key)
            .flat_map(|(_, node)| match node {
                Node::List(items) => items.as_mut_slice(),
                other => std::slice::from_mut(other),
            })
    }

    pub fn objects<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Object> + 'a {
        self.children(key).filter_map(Node::as_object)
    }

    pub fn objects_mut<'a>(&'a mut self, key: &'a str) -> impl Iterator<Item = &'a mut Object> + 'a {
        self.children_mut(key).filter_map(Node::as_object_mut)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.strip_prefix(ATTR_PREFIX) == Some(name))
            .and_then(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = Node::Attr(value.into());
        match self
            .fields
            .iter_mut()
            .find(|(k, _)| k.strip_prefix(ATTR_PREFIX) == Some(name))
        {
            Some((_, slot)) => *slot = value,
            None => {
                let at = self.fields.iter().take_while(|(k, _)| is_attr_key(k)).count();
                self.fields.insert(at, (format!("{ATTR_PREFIX}{name}"), value));
            }
        }
    }

    /// Replaces every element named `key` with `nodes`, placed where the
    /// first of the old elements was (or appended when there was none).
    pub fn replace_children(&mut self, key: &str, mut nodes: Vec<Node>) {
        let at = self
            .fields
            .iter()
            .position(|(k, _)| k == key)
            .unwrap_or(self.fields.len());
        // Everything before `at` is some other field, so `at` stays valid.
        self.fields.retain(|(k, _)| k != key);
        let node = match nodes.len() {
            0 => return,
            1 => nodes.remove(0),
            _ => Node::List(nodes),
        };
        self.fields.insert(at, (key.to_string(), node));
    }
}
