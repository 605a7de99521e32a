//! The three kinds of run a glyph run can look into
//!
//! Lines mostly show slices of [`IntrinsicRun`]s. Justification needs the
//! same glyphs with wider spaces, which a [`JustifiedRun`] provides without
//! touching the shared run. Truncation splices in glyphs shaped from a
//! different text, wrapped as a [`TokenRun`] so they can be told apart from
//! text the line actually covers.
//!
//! Caret and measurement algorithms are free functions over [`TextRun`], so
//! every kind gets them without a type hierarchy.

use std::ops::Range;
use std::sync::Arc;

use typeset_core::types::{GlyphId, Point};

use crate::caret::{self, CaretEdgesBuilder};
use crate::intrinsic_run::IntrinsicRun;

/// Read access shared by every kind of shaped run
///
/// Indices taken by the free functions in this module are absolute code
/// unit offsets into the run's text.
pub trait TextRun {
    /// The shaped run this one is derived from
    fn intrinsic(&self) -> &IntrinsicRun;

    fn glyph_advances(&self) -> &[f32];

    fn caret_edges(&self) -> &[f32];

    fn code_unit_range(&self) -> Range<usize> {
        self.intrinsic().code_unit_range.clone()
    }

    fn is_backward(&self) -> bool {
        self.intrinsic().is_backward
    }

    fn bidi_level(&self) -> u8 {
        self.intrinsic().bidi_level
    }

    fn glyph_ids(&self) -> &[GlyphId] {
        &self.intrinsic().glyph_ids
    }

    fn glyph_offsets(&self) -> &[Point] {
        &self.intrinsic().glyph_offsets
    }

    fn cluster_map(&self) -> &[usize] {
        &self.intrinsic().cluster_map
    }

    fn caret_stops(&self) -> Option<&[bool]> {
        self.intrinsic().caret_stops.as_deref()
    }
}

/// An intrinsic run with extra advance added to some glyphs
#[derive(Debug, Clone)]
pub struct JustifiedRun {
    base: Arc<IntrinsicRun>,
    glyph_advances: Vec<f32>,
    caret_edges: Vec<f32>,
}

impl JustifiedRun {
    /// Add `extra_advance[i]` to glyph `i` of `base`
    pub fn new(base: Arc<IntrinsicRun>, extra_advances: &[f32]) -> Self {
        assert_eq!(
            extra_advances.len(),
            base.glyph_count(),
            "one extra advance per glyph"
        );
        let glyph_advances: Vec<f32> = base
            .glyph_advances
            .iter()
            .zip(extra_advances)
            .map(|(advance, extra)| advance + extra)
            .collect();
        let caret_edges = CaretEdgesBuilder::new(&base.cluster_map, &glyph_advances, base.is_backward)
            .caret_stops(base.caret_stops.as_deref())
            .build();

        Self {
            base,
            glyph_advances,
            caret_edges,
        }
    }

    pub fn base(&self) -> &Arc<IntrinsicRun> {
        &self.base
    }
}

impl TextRun for JustifiedRun {
    fn intrinsic(&self) -> &IntrinsicRun {
        &self.base
    }

    fn glyph_advances(&self) -> &[f32] {
        &self.glyph_advances
    }

    fn caret_edges(&self) -> &[f32] {
        &self.caret_edges
    }
}

/// Glyphs of a truncation token standing in for excised text
///
/// The wrapped run addresses the token's own text; `offset` is where in the
/// line's text the token was inserted.
#[derive(Debug, Clone)]
pub struct TokenRun {
    inner: RunSource,
    offset: usize,
}

impl TokenRun {
    pub fn new(inner: RunSource, offset: usize) -> Self {
        Self { inner, offset }
    }

    pub fn inner(&self) -> &RunSource {
        &self.inner
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl TextRun for TokenRun {
    fn intrinsic(&self) -> &IntrinsicRun {
        self.inner.intrinsic()
    }

    fn glyph_advances(&self) -> &[f32] {
        self.inner.glyph_advances()
    }

    fn caret_edges(&self) -> &[f32] {
        self.inner.caret_edges()
    }
}

/// Shared handle to any kind of run
#[derive(Debug, Clone)]
pub enum RunSource {
    Intrinsic(Arc<IntrinsicRun>),
    Justified(Arc<JustifiedRun>),
    Token(Arc<TokenRun>),
}

impl RunSource {
    pub fn is_token(&self) -> bool {
        matches!(self, RunSource::Token(_))
    }

    /// Wrap as a token inserted at `offset`
    pub fn into_token(self, offset: usize) -> RunSource {
        RunSource::Token(Arc::new(TokenRun::new(self, offset)))
    }
}

impl TextRun for RunSource {
    fn intrinsic(&self) -> &IntrinsicRun {
        match self {
            RunSource::Intrinsic(run) => run,
            RunSource::Justified(run) => run.intrinsic(),
            RunSource::Token(run) => run.intrinsic(),
        }
    }

    fn glyph_advances(&self) -> &[f32] {
        match self {
            RunSource::Intrinsic(run) => run.glyph_advances(),
            RunSource::Justified(run) => run.glyph_advances(),
            RunSource::Token(run) => run.glyph_advances(),
        }
    }

    fn caret_edges(&self) -> &[f32] {
        match self {
            RunSource::Intrinsic(run) => run.caret_edges(),
            RunSource::Justified(run) => run.caret_edges(),
            RunSource::Token(run) => run.caret_edges(),
        }
    }
}

fn check_range<R: TextRun + ?Sized>(run: &R, range: &Range<usize>) {
    let bounds = run.code_unit_range();
    assert!(
        range.start <= range.end && range.start >= bounds.start && range.end <= bounds.end,
        "code unit range {}..{} out of bounds for run {}..{}",
        range.start,
        range.end,
        bounds.start,
        bounds.end
    );
}

/// Caret edge before `index`, measured from the run's left edge
pub fn caret_edge<R: TextRun + ?Sized>(run: &R, index: usize) -> f32 {
    check_range(run, &(index..index));
    run.caret_edges()[index - run.code_unit_range().start]
}

/// Typographic extent of the code units in `range`
pub fn measure_characters<R: TextRun + ?Sized>(run: &R, range: Range<usize>) -> f32 {
    check_range(run, &range);
    let start = run.code_unit_range().start;
    let edges = run.caret_edges();
    (edges[range.end - start] - edges[range.start - start]).abs()
}

/// `range` widened to whole clusters
pub fn cluster_bounds<R: TextRun + ?Sized>(run: &R, range: Range<usize>) -> Range<usize> {
    check_range(run, &range);
    if range.is_empty() {
        return range;
    }
    let base = run.code_unit_range().start;
    let map = run.cluster_map();
    let start = caret::cluster_start(map, range.start - base);
    let end = caret::cluster_end(map, range.end - 1 - base);
    base + start..base + end
}

/// Glyph indices drawing the clusters that `range` touches
pub fn glyph_range_for<R: TextRun + ?Sized>(run: &R, range: Range<usize>) -> Range<usize> {
    let clusters = cluster_bounds(run, range);
    let base = run.code_unit_range().start;
    caret::glyph_range(
        run.cluster_map(),
        run.glyph_ids().len(),
        run.is_backward(),
        clusters.start - base,
        clusters.end - base,
    )
}

/// Caret position in `range` closest to `distance`
///
/// `distance` is measured like the caret edges, from the run's left edge.
/// Only allowed caret stops and `range.end` are candidates.
pub fn index_at_distance<R: TextRun + ?Sized>(run: &R, range: Range<usize>, distance: f32) -> usize {
    check_range(run, &range);
    let base = run.code_unit_range().start;
    let edges = run.caret_edges();
    let stops = run.caret_stops();

    let mut best = range.start;
    let mut best_gap = f32::INFINITY;
    for index in range.start..=range.end {
        let local = index - base;
        let is_stop = index == range.end || stops.map_or(true, |mask| mask[local]);
        if !is_stop {
            continue;
        }
        let gap = (edges[local] - distance).abs();
        if gap < best_gap {
            best = index;
            best_gap = gap;
        }
    }
    best
}
