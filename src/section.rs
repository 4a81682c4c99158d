//! Reads `hs:sec` paragraphs out of the markup tree into [`model`] values,
//! runs the reflow pass and writes changed line segments back.
//!
//! [`model`]: crate::model

use crate::layout::LayoutConstants;
use crate::model::{LineSegment, LineSegmentArray, Paragraph, Run};
use crate::reflow::reflow;
use crate::tree::{ATTR_PREFIX, COMMENT_KEY, Node, Object, TEXT_KEY, is_attr_key};

pub const SECTION: &str = "hs:sec";
pub const PARAGRAPH: &str = "hp:p";
pub const RUN: &str = "hp:run";
pub const TEXT: &str = "hp:t";
pub const LINESEG_ARRAY: &str = "hp:linesegarray";
pub const LINESEG: &str = "hp:lineseg";

const TYPED_SEGMENT_ATTRS: [&str; 5] = ["textpos", "vertpos", "horzpos", "horzsize", "flags"];

/// Reflows every section found anywhere below `tree`. Returns how many
/// sections had an address paragraph.
pub fn reflow_sections(tree: &mut Node, constants: &LayoutConstants) -> usize {
    match tree {
        Node::Object(obj) => obj
            .fields_mut()
            .map(|(key, child)| {
                if key == SECTION {
                    reflow_section_node(child, constants)
                } else {
                    reflow_sections(child, constants)
                }
            })
            .sum(),
        Node::List(items) => items
            .iter_mut()
            .map(|item| reflow_sections(item, constants))
            .sum(),
        Node::Text(_) | Node::Attr(_) => 0,
    }
}

fn reflow_section_node(node: &mut Node, constants: &LayoutConstants) -> usize {
    match node {
        Node::Object(sec) => usize::from(reflow_section(sec, constants)),
        Node::List(items) => items
            .iter_mut()
            .map(|item| reflow_section_node(item, constants))
            .sum(),
        Node::Text(_) | Node::Attr(_) => 0,
    }
}

pub fn reflow_section(sec: &mut Object, constants: &LayoutConstants) -> bool {
    let before = paragraphs(sec, constants);
    let mut after = before.clone();
    let Some(report) = reflow(&mut after, constants) else {
        log::debug!("section has no address paragraph, left as is");
        return false;
    };
    log::info!(
        "address paragraph {} wrapped to {} line(s), {} paragraph(s) shifted",
        report.address_index,
        report.line_count,
        report.shifted_paragraphs
    );

    let changed = sec.objects_mut(PARAGRAPH).zip(&before).zip(&after).enumerate();
    for (index, ((element, old), new)) in changed {
        if old == new {
            continue;
        }
        if index == report.address_index {
            write_line_segments(element, new);
        } else {
            write_vertpos(element, new);
        }
    }
    true
}

pub fn paragraphs(sec: &Object, constants: &LayoutConstants) -> Vec<Paragraph> {
    sec.objects(PARAGRAPH)
        .map(|p| read_paragraph(p, constants))
        .collect()
}

pub fn read_paragraph(p: &Object, constants: &LayoutConstants) -> Paragraph {
    let runs = p.objects(RUN).map(read_run).collect();
    let line_segments = p.objects(LINESEG_ARRAY).next().map(|array| LineSegmentArray {
        segments: array
            .objects(LINESEG)
            .map(|seg| read_segment(seg, constants))
            .collect(),
        declared_size: array.attr("size").and_then(|v| v.trim().parse().ok()),
    });
    Paragraph {
        runs,
        line_segments,
    }
}

fn read_run(run: &Object) -> Run {
    let texts: Vec<String> = run.children(TEXT).filter_map(text_content).collect();
    Run {
        text: (!texts.is_empty()).then(|| texts.concat()),
    }
}

/// Character content of one `hp:t`. Inline controls like `hp:tab` take one
/// character position each, matching how `textpos` counts.
fn text_content(node: &Node) -> Option<String> {
    let obj = match node {
        Node::Text(text) => return Some(text.clone()),
        Node::Object(obj) => obj,
        Node::Attr(_) | Node::List(_) => return None,
    };
    let mut text = String::new();
    for (key, child) in obj.fields() {
        match key {
            TEXT_KEY => text.extend(child.as_str()),
            COMMENT_KEY => {}
            _ if is_attr_key(key) => {}
            _ => {
                let count = match child {
                    Node::List(items) => items.len(),
                    _ => 1,
                };
                text.extend(std::iter::repeat_n(inline_char(key), count));
            }
        }
    }
    Some(text)
}

fn inline_char(name: &str) -> char {
    match name {
        "hp:tab" => '\t',
        "hp:lineBreak" => '\n',
        "hp:nbSpace" => '\u{a0}',
        "hp:fwSpace" => '\u{3000}',
        "hp:hyphen" => '-',
        _ => '\u{fffc}',
    }
}

fn read_segment(seg: &Object, constants: &LayoutConstants) -> LineSegment {
    let int = |name: &str, default: i64| {
        seg.attr(name)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(default)
    };
    let extra = seg
        .fields()
        .filter_map(|(key, value)| {
            let name = key.strip_prefix(ATTR_PREFIX)?;
            if TYPED_SEGMENT_ATTRS.contains(&name) {
                return None;
            }
            Some((name.to_string(), value.as_str()?.to_string()))
        })
        .collect();

    LineSegment {
        textpos: int("textpos", 0),
        vertpos: int("vertpos", 0),
        horzpos: int("horzpos", constants.default_horzpos),
        horzsize: int("horzsize", constants.default_horzsize),
        flags: seg.attr("flags").map(str::to_string),
        extra,
    }
}

fn write_segment(seg: &LineSegment) -> Node {
    // Hancom order: textpos vertpos vertsize textheight baseline spacing horzpos horzsize flags
    let mut obj = Object::new();
    obj.set_attr("textpos", seg.textpos.to_string());
    obj.set_attr("vertpos", seg.vertpos.to_string());
    for (name, value) in &seg.extra {
        obj.set_attr(name, value.as_str());
    }
    obj.set_attr("horzpos", seg.horzpos.to_string());
    obj.set_attr("horzsize", seg.horzsize.to_string());
    if let Some(flags) = &seg.flags {
        obj.set_attr("flags", flags.as_str());
    }
    Node::Object(obj)
}

/// Paragraphs below the address only move: each existing `hp:lineseg` gets
/// its new `vertpos` and keeps every other attribute as written.
fn write_vertpos(p: &mut Object, para: &Paragraph) {
    let Some(array) = p.objects_mut(LINESEG_ARRAY).next() else {
        return;
    };
    for (element, seg) in array.objects_mut(LINESEG).zip(para.segments()) {
        element.set_attr("vertpos", seg.vertpos.to_string());
    }
}

fn write_line_segments(p: &mut Object, para: &Paragraph) {
    let Some(array) = &para.line_segments else {
        return;
    };
    let Some(target) = p.objects_mut(LINESEG_ARRAY).next() else {
        return;
    };
    if let Some(size) = array.declared_size {
        target.set_attr("size", size.to_string());
    }
    target.replace_children(LINESEG, array.segments.iter().map(write_segment).collect());
}
