#[derive(Clone, Debug, Default, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub line_segments: Option<LineSegmentArray>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Run {
    pub text: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineSegmentArray {
    pub segments: Vec<LineSegment>,
    pub declared_size: Option<usize>, // the `size` attribute, if present or rewritten
}

/// One visual line. `textpos` is a character offset; the rest are HWPUNIT.
#[derive(Clone, Debug, PartialEq)]
pub struct LineSegment {
    pub textpos: i64,
    pub vertpos: i64,
    pub horzpos: i64,
    pub horzsize: i64,
    pub flags: Option<String>,
    pub extra: Vec<(String, String)>, // vertsize, textheight, baseline, spacing, ...
}

impl Paragraph {
    /// Text of the first run containing `label`.
    pub fn run_containing(&self, label: &str) -> Option<&str> {
        self.runs
            .iter()
            .filter_map(|run| run.text.as_deref())
            .find(|text| text.contains(label))
    }

    pub fn segments(&self) -> &[LineSegment] {
        match &self.line_segments {
            Some(array) => &array.segments,
            None => &[],
        }
    }

    pub fn min_vertpos(&self) -> Option<i64> {
        self.segments().iter().map(|seg| seg.vertpos).min()
    }

    /// Bottom edge of the paragraph's lowest line.
    pub fn footprint(&self, line_extent: i64) -> Option<i64> {
        self.segments()
            .iter()
            .map(|seg| seg.vertpos.saturating_add(line_extent))
            .max()
    }
}
