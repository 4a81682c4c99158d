//! Address paragraph reflow and the downstream vertical cascade.

use crate::layout::{LayoutConstants, wrap_points};
use crate::model::{LineSegment, Paragraph};

/// `flags` value Hancom writes on a line that continues the previous one.
pub const CONTINUATION_FLAGS: &str = "393216";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReflowReport {
    pub address_index: usize,
    pub line_count: usize,
    pub shifted_paragraphs: usize,
}

/// Rewraps the first paragraph carrying the address label, then pushes every
/// later paragraph down just far enough that nothing overlaps.
///
/// Returns `None` (and touches nothing) when no paragraph has the label.
pub fn reflow(paragraphs: &mut [Paragraph], constants: &LayoutConstants) -> Option<ReflowReport> {
    let label = constants.address_label.as_str();
    let index = paragraphs
        .iter()
        .position(|para| para.run_containing(label).is_some())?;

    let address = &mut paragraphs[index];
    if let Some(text) = address.run_containing(label).map(str::to_string)
        && let Some(array) = address.line_segments.as_mut()
        && let Some(base) = array.segments.first().cloned()
    {
        let segments = wrap_segments(&text, &base, constants);
        array.declared_size = Some(segments.len());
        array.segments = segments;
    }
    let line_count = address.segments().len();
    let address_bottom = address.footprint(constants.line_extent).unwrap_or(0);
    log::debug!("address paragraph #{index}: {line_count} line(s), bottom at {address_bottom}");

    let shifted_paragraphs = cascade(
        &mut paragraphs[index + 1..],
        address_bottom.saturating_add(constants.paragraph_clearance),
        constants,
    );

    Some(ReflowReport {
        address_index: index,
        line_count,
        shifted_paragraphs,
    })
}

/// Line segments for `text`, using `base` as the geometry of the first line.
/// Continuation lines get the hanging indent and the continuation flags.
pub fn wrap_segments(text: &str, base: &LineSegment, constants: &LayoutConstants) -> Vec<LineSegment> {
    let indent = constants.hanging_indent(base.horzsize);
    let mut segments = vec![LineSegment {
        textpos: 0,
        ..base.clone()
    }];

    for cut in wrap_points(text, constants).into_iter().skip(1) {
        let previous = segments.last().map_or(base.vertpos, |seg| seg.vertpos);
        segments.push(LineSegment {
            textpos: cut as i64,
            vertpos: previous.saturating_add(constants.line_height),
            horzpos: base.horzpos.saturating_add(indent),
            horzsize: base.horzsize.saturating_sub(indent),
            flags: Some(CONTINUATION_FLAGS.to_string()),
            extra: base.extra.clone(),
        });
    }
    segments
}

/// Moves each paragraph down as a block when it starts above `next_start`,
/// carrying the running bottom edge forward. Positions saturate at the
/// `i64` bounds instead of wrapping. Paragraphs without line
/// segments are skipped and leave `next_start` as it was.
fn cascade(paragraphs: &mut [Paragraph], mut next_start: i64, constants: &LayoutConstants) -> usize {
    let mut shifted = 0;
    for para in paragraphs.iter_mut() {
        let Some(top) = para.min_vertpos() else {
            continue;
        };
        if top < next_start
            && let Some(array) = para.line_segments.as_mut()
        {
            let shift = next_start.saturating_sub(top);
            for seg in &mut array.segments {
                seg.vertpos = seg.vertpos.saturating_add(shift);
            }
            shifted += 1;
        }
        if let Some(bottom) = para.footprint(constants.line_extent) {
            next_start = bottom.saturating_add(constants.paragraph_clearance);
        }
    }
    if shifted > 0 {
        log::debug!("shifted {shifted} paragraph(s) below the address");
    }
    shifted
}
