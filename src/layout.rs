//! Layout constants and the weighted line-wrap algorithm.
//!
//! Positions are in HWPUNIT (1/7200 inch). Text widths are estimated with a
//! per-character "visual weight" instead of real font metrics: a Hangul
//! syllable or jamo counts 2.0, anything else 1.1.

/// Everything the reflow pass needs to know about the page. Built once and
/// shared by reference.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConstants {
    /// Visual weight that fits on one full line.
    pub weight_per_line: f64,
    /// Weight of the fixed label at the start of the first line.
    pub label_weight: f64,
    /// Vertical advance between wrapped lines.
    pub line_height: i64,
    /// Vertical extent of one line segment, used for paragraph footprints.
    pub line_extent: i64,
    /// Gap between a paragraph's bottom and the next paragraph's top.
    pub paragraph_clearance: i64,
    pub default_horzpos: i64,
    pub default_horzsize: i64,
    /// How far back from the raw cut to look for a nicer break character.
    pub break_lookback: usize,
    /// Run text that marks the address paragraph.
    pub address_label: String,
}

impl Default for LayoutConstants {
    fn default() -> Self {
        LayoutConstants {
            weight_per_line: 100.0,
            label_weight: 20.0,
            line_height: 2240,
            line_extent: 1400,
            paragraph_clearance: 2240,
            default_horzpos: 750,
            default_horzsize: 44606,
            break_lookback: 20,
            address_label: "주   소   지".to_string(),
        }
    }
}

impl LayoutConstants {
    /// Extra left offset for continuation lines, so they start under the
    /// address text rather than under the label.
    pub fn hanging_indent(&self, base_horzsize: i64) -> i64 {
        (self.label_weight / self.weight_per_line * base_horzsize as f64).floor() as i64
    }
}

pub fn char_weight(c: char) -> f64 {
    match c as u32 {
        0xAC00..=0xD7AF | 0x1100..=0x11FF => 2.0,
        _ => 1.1,
    }
}

pub fn text_weight(text: &str) -> f64 {
    text.chars().map(char_weight).sum()
}

fn is_break_char(c: char) -> bool {
    matches!(c, ' ' | '(' | ',' | '[')
}

/// Character offset where the line starting at `start` should end.
///
/// Line 0 shares its budget with the label; later lines sit to the right of
/// the hanging indent and get the budget minus the label width.
pub fn next_break(text: &[char], start: usize, constants: &LayoutConstants) -> usize {
    let (mut weight, limit) = if start == 0 {
        (constants.label_weight, constants.weight_per_line)
    } else {
        (0.0, constants.weight_per_line - constants.label_weight)
    };

    let mut pos = start;
    while pos < text.len() && weight < limit {
        weight += char_weight(text[pos]);
        pos += 1;
    }

    if pos < text.len() {
        let floor = start.max(pos.saturating_sub(constants.break_lookback));
        if let Some(k) = (floor + 1..=pos).rev().find(|&k| is_break_char(text[k])) {
            pos = if text[k] == ' ' { k + 1 } else { k };
        }
    }

    while pos < text.len() && text[pos] == ' ' {
        pos += 1;
    }
    pos
}

/// Start offsets of every visual line of `text`. Always begins with 0.
///
/// Stops as soon as a line would reach the end of the text or fails to
/// advance, so adversarial input or degenerate constants cannot loop.
pub fn wrap_points(text: &str, constants: &LayoutConstants) -> Vec<usize> {
    let chars: Vec<char> = text.chars().collect();
    let mut points = vec![0];
    let mut pos = 0;
    while pos < chars.len() {
        let next = next_break(&chars, pos, constants);
        if next >= chars.len() || next <= pos {
            break;
        }
        points.push(next);
        pos = next;
    }
    points
}
