//! Markup codec: section XML text to [`Node`] tree and back.

use roxmltree::NodeType;

use crate::error::Error;
use crate::tree::{ATTR_PREFIX, COMMENT_KEY, Node, Object, TEXT_KEY, is_attr_key};

pub const DEFAULT_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>"#;

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// A parsed markup document. `root` is an object holding the top-level
/// nodes (normally just the root element).
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub declaration: Option<String>,
    pub root: Node,
}

pub fn parse(text: &str) -> Result<Document, Error> {
    let declaration = leading_declaration(text).map(str::to_string);
    let xml = roxmltree::Document::parse(text)?;

    let mut top = Object::new();
    for child in xml.root().children() {
        push_node(&mut top, child);
    }

    Ok(Document {
        declaration,
        root: Node::Object(top),
    })
}

pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();
    match &doc.root {
        Node::Object(top) => {
            for (key, node) in top.fields() {
                write_field(&mut out, key, node);
            }
        }
        other => write_field(&mut out, TEXT_KEY, other),
    }

    if out.trim_start().starts_with("<?xml") {
        return out;
    }
    let declaration = doc.declaration.as_deref().unwrap_or(DEFAULT_DECLARATION);
    format!("{declaration}\r\n{out}")
}

fn leading_declaration(text: &str) -> Option<&str> {
    let text = text.trim_start_matches('\u{feff}');
    let rest = text.strip_prefix("<?xml")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    text.find("?>").map(|end| &text[..end + 2])
}

fn push_node(parent: &mut Object, node: roxmltree::Node) {
    match node.node_type() {
        NodeType::Element => parent.push(qualified_name(node), build_element(node)),
        NodeType::Text => {
            let text = node.text().unwrap_or_default();
            parent.push(TEXT_KEY, Node::Text(text.to_string()));
        }
        NodeType::Comment => {
            let text = node.text().unwrap_or_default();
            parent.push(COMMENT_KEY, Node::Text(text.to_string()));
        }
        NodeType::Root | NodeType::PI => {}
    }
}

fn build_element(node: roxmltree::Node) -> Node {
    let mut obj = Object::new();

    for (prefix, uri) in declared_namespaces(node) {
        let name = match prefix {
            Some(prefix) => format!("{ATTR_PREFIX}xmlns:{prefix}"),
            None => format!("{ATTR_PREFIX}xmlns"),
        };
        obj.push(name, Node::Attr(uri));
    }

    for attr in node.attributes() {
        let prefix = match attr.namespace() {
            Some(XML_NS) => Some("xml"),
            Some(ns) => node.lookup_prefix(ns),
            None => None,
        };
        let name = match prefix {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", attr.name()),
            _ => attr.name().to_string(),
        };
        obj.push(format!("{ATTR_PREFIX}{name}"), Node::Attr(attr.value().to_string()));
    }

    for child in node.children() {
        push_node(&mut obj, child);
    }

    // <a>text</a> without attributes reads as a plain text leaf.
    let collapsed = {
        let mut fields = obj.fields();
        match (fields.next(), fields.next()) {
            (Some((TEXT_KEY, Node::Text(text))), None) => Some(text.clone()),
            _ => None,
        }
    };
    match collapsed {
        Some(text) => Node::Text(text),
        None => Node::Object(obj),
    }
}

fn qualified_name(node: roxmltree::Node) -> String {
    let tag = node.tag_name();
    match tag.namespace().and_then(|ns| node.lookup_prefix(ns)) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", tag.name()),
        _ => tag.name().to_string(),
    }
}

type NamespaceDecl = (Option<String>, String);

fn namespaces_in_scope(node: roxmltree::Node) -> Vec<NamespaceDecl> {
    node.namespaces()
        .filter(|ns| ns.name() != Some("xml"))
        .map(|ns| (ns.name().map(str::to_string), ns.uri().to_string()))
        .collect()
}

/// Namespace bindings introduced by this element rather than inherited.
fn declared_namespaces(node: roxmltree::Node) -> Vec<NamespaceDecl> {
    let inherited = node
        .parent_element()
        .map(namespaces_in_scope)
        .unwrap_or_default();
    let mut declared: Vec<_> = namespaces_in_scope(node)
        .into_iter()
        .filter(|ns| !inherited.contains(ns))
        .collect();
    declared.sort();
    declared
}

fn write_field(out: &mut String, key: &str, node: &Node) {
    if is_attr_key(key) {
        return;
    }
    match node {
        Node::List(items) => {
            for item in items {
                write_field(out, key, item);
            }
        }
        Node::Text(text) if key == TEXT_KEY => escape_into(out, text, false),
        Node::Text(text) if key == COMMENT_KEY => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        Node::Text(text) | Node::Attr(text) => {
            out.push('<');
            out.push_str(key);
            out.push('>');
            escape_into(out, text, false);
            out.push_str("</");
            out.push_str(key);
            out.push('>');
        }
        Node::Object(obj) => write_element(out, key, obj),
    }
}

fn write_element(out: &mut String, name: &str, obj: &Object) {
    out.push('<');
    out.push_str(name);
    for (key, value) in obj.fields() {
        if let Some(attr) = key.strip_prefix(ATTR_PREFIX)
            && let Some(value) = value.as_str()
        {
            out.push(' ');
            out.push_str(attr);
            out.push_str("=\"");
            escape_into(out, value, true);
            out.push('"');
        }
    }

    let mut content = obj.fields().filter(|(key, _)| !is_attr_key(key)).peekable();
    if content.peek().is_none() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for (key, node) in content {
        write_field(out, key, node);
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\t' if attribute => out.push_str("&#9;"),
            _ => out.push(c),
        }
    }
}
