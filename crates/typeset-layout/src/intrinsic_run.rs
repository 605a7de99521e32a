//! Shaped runs covering the text
//!
//! An [`IntrinsicRun`] is the output of one shaping call: a code unit range
//! homogeneous in script, shaping style and bidi level, together with its
//! glyphs and addressing tables. The typesetter keeps them in a vector
//! sorted by start offset and shares them with every line built on top.

use std::ops::Range;
use std::sync::Arc;

use typeset_core::{
    types::{GlyphId, Point, Tag, WritingDirection},
    Typeface,
};

use crate::text_run::{self, TextRun};

/// A shaped, immutable run of text
#[derive(Debug, Clone)]
pub struct IntrinsicRun {
    pub code_unit_range: Range<usize>,
    /// Glyphs of later code units come first
    pub is_backward: bool,
    pub bidi_level: u8,
    /// Direction the shaping engine was asked to shape in
    pub writing_direction: WritingDirection,
    pub script: Tag,
    pub typeface: Arc<dyn Typeface>,
    pub type_size: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub obliqueness: f32,
    pub ascent: f32,
    pub descent: f32,
    pub leading: f32,
    pub glyph_ids: Vec<GlyphId>,
    pub glyph_offsets: Vec<Point>,
    pub glyph_advances: Vec<f32>,
    pub cluster_map: Vec<usize>,
    pub caret_stops: Option<Vec<bool>>,
    pub caret_edges: Vec<f32>,
}

impl IntrinsicRun {
    pub fn glyph_count(&self) -> usize {
        self.glyph_ids.len()
    }

    /// Sum of all glyph advances
    pub fn width(&self) -> f32 {
        self.glyph_advances.iter().sum()
    }

    /// Typographic extent of the code units in `range`
    pub fn measure_characters(&self, range: Range<usize>) -> f32 {
        text_run::measure_characters(self, range)
    }
}

impl TextRun for IntrinsicRun {
    fn intrinsic(&self) -> &IntrinsicRun {
        self
    }

    fn glyph_advances(&self) -> &[f32] {
        &self.glyph_advances
    }

    fn caret_edges(&self) -> &[f32] {
        &self.caret_edges
    }
}

/// Index of the run containing `code_unit`
///
/// `runs` must be sorted and gap-free. Positions past the end map to the
/// last run.
pub(crate) fn run_index_at(runs: &[Arc<IntrinsicRun>], code_unit: usize) -> usize {
    let index = runs.partition_point(|run| run.code_unit_range.end <= code_unit);
    index.min(runs.len().saturating_sub(1))
}

/// Typographic extent of `range` across consecutive runs
pub(crate) fn measure_range(runs: &[Arc<IntrinsicRun>], range: Range<usize>) -> f32 {
    if range.is_empty() || runs.is_empty() {
        return 0.0;
    }

    let mut extent = 0.0;
    let mut position = range.start;
    let mut index = run_index_at(runs, position);
    while position < range.end && index < runs.len() {
        let run = &runs[index];
        let end = run.code_unit_range.end.min(range.end);
        extent += run.measure_characters(position..end);
        position = end;
        index += 1;
    }
    extent
}
