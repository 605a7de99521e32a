//! Slices of shaped runs placed on a line

use std::ops::Range;

use typeset_core::{
    error::Result,
    types::{Color, GlyphId, Point, Rect},
    GlyphPaint, Renderer,
};

use crate::collection::Collection;
use crate::intrinsic_run::IntrinsicRun;
use crate::text_run::{self, RunSource, TextRun};

/// A view over part of one run, positioned inside a line
///
/// The glyph arrays are borrowed from the source run. When the slice ends
/// inside a cluster, the whole cluster's glyphs are kept and the part that
/// lies outside the slice is clipped when drawing; `start_extra_length` and
/// `end_extra_length` count the code units of those clipped parts.
#[derive(Debug, Clone)]
pub struct GlyphRun {
    source: RunSource,
    range: Range<usize>,
    glyph_range: Range<usize>,
    start_extra_length: usize,
    end_extra_length: usize,
    /// Distance from the left edge of the first kept glyph to the visible start
    glyph_shift: f32,
    width: f32,
    color: Color,
    origin: Point,
}

impl GlyphRun {
    /// View of `range`, which must lie inside `source`
    pub fn new(source: RunSource, range: Range<usize>, color: Color) -> Self {
        let base = source.code_unit_range().start;
        let clusters = text_run::cluster_bounds(&source, range.clone());
        let glyph_range = text_run::glyph_range_for(&source, range.clone());

        let edges = source.caret_edges();
        let visible_left = edges[range.start - base].min(edges[range.end - base]);
        let full_left = edges[clusters.start - base].min(edges[clusters.end - base]);
        let width = text_run::measure_characters(&source, range.clone());

        Self {
            start_extra_length: range.start - clusters.start,
            end_extra_length: clusters.end - range.end,
            glyph_shift: visible_left - full_left,
            source,
            range,
            glyph_range,
            width,
            color,
            origin: Point::zero(),
        }
    }

    /// The same glyphs shown as a token inserted at `offset`
    pub(crate) fn to_token(&self, offset: usize) -> Self {
        Self {
            source: self.source.clone().into_token(offset),
            ..self.clone()
        }
    }

    pub fn source(&self) -> &RunSource {
        &self.source
    }

    pub fn intrinsic(&self) -> &IntrinsicRun {
        self.source.intrinsic()
    }

    pub fn is_token(&self) -> bool {
        self.source.is_token()
    }

    /// Code units of the line's text this run shows
    ///
    /// Token runs show none and report an empty range at their insertion
    /// point.
    pub fn code_unit_range(&self) -> Range<usize> {
        match &self.source {
            RunSource::Token(token) => token.offset()..token.offset(),
            _ => self.range.clone(),
        }
    }

    pub fn is_backward(&self) -> bool {
        self.source.is_backward()
    }

    pub fn bidi_level(&self) -> u8 {
        self.source.bidi_level()
    }

    pub fn start_extra_length(&self) -> usize {
        self.start_extra_length
    }

    pub fn end_extra_length(&self) -> usize {
        self.end_extra_length
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Pen position of the run's left edge, relative to the line origin
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub(crate) fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn ascent(&self) -> f32 {
        self.intrinsic().ascent
    }

    pub fn descent(&self) -> f32 {
        self.intrinsic().descent
    }

    pub fn leading(&self) -> f32 {
        self.intrinsic().leading
    }

    pub fn glyph_ids(&self) -> &[GlyphId] {
        &self.source.glyph_ids()[self.glyph_range.clone()]
    }

    pub fn glyph_offsets(&self) -> &[Point] {
        &self.source.glyph_offsets()[self.glyph_range.clone()]
    }

    pub fn glyph_advances(&self) -> &[f32] {
        &self.source.glyph_advances()[self.glyph_range.clone()]
    }

    /// Glyph index, relative to [`glyph_ids`](Self::glyph_ids), of each code unit
    pub fn cluster_map(&self) -> impl Collection<Item = usize> + '_ {
        let base = self.source.code_unit_range().start;
        let first_glyph = self.glyph_range.start;
        self.source
            .cluster_map()
            .window(self.range.start - base..self.range.end - base)
            .mapped(move |glyph| glyph.saturating_sub(first_glyph))
    }

    /// Caret edges of the shown code units, measured from the run's left edge
    pub fn caret_edges(&self) -> impl Collection<Item = f32> + '_ {
        let base = self.source.code_unit_range().start;
        let edges = self.source.caret_edges();
        let left = edges[self.range.start - base].min(edges[self.range.end - base]);
        edges
            .window(self.range.start - base..self.range.end - base + 1)
            .mapped(move |edge| edge - left)
    }

    /// Distance of the caret before `index` from the run's left edge
    ///
    /// Token runs answer for their insertion offset with their leading edge.
    pub fn distance_for_code_unit(&self, index: usize) -> f32 {
        if let RunSource::Token(token) = &self.source {
            assert_eq!(index, token.offset(), "token runs only cover their insertion offset");
            return if self.is_backward() { self.width } else { 0.0 };
        }
        assert!(
            index >= self.range.start && index <= self.range.end,
            "code unit {index} out of bounds for glyph run {}..{}",
            self.range.start,
            self.range.end
        );
        self.caret_edges().item(index - self.range.start)
    }

    /// Code unit whose caret is closest to `distance` from the run's left edge
    pub fn index_of_code_unit_at(&self, distance: f32) -> usize {
        if let RunSource::Token(token) = &self.source {
            return token.offset();
        }
        let base = self.source.code_unit_range().start;
        let edges = self.source.caret_edges();
        let left = edges[self.range.start - base].min(edges[self.range.end - base]);
        text_run::index_at_distance(&self.source, self.range.clone(), distance + left)
    }

    fn paint(&self, origin: Point, clip: Option<Rect>) -> GlyphPaint<'_> {
        let run = self.intrinsic();
        GlyphPaint {
            typeface: run.typeface.as_ref(),
            type_size: run.type_size,
            scale_x: run.scale_x,
            scale_y: run.scale_y,
            obliqueness: run.obliqueness,
            color: self.color,
            glyph_ids: self.glyph_ids(),
            glyph_offsets: self.glyph_offsets(),
            glyph_advances: self.glyph_advances(),
            origin,
            clip,
        }
    }

    fn is_clipped(&self) -> bool {
        self.start_extra_length > 0 || self.end_extra_length > 0
    }

    /// Clip rectangle for a run whose left edge sits at `left` on `baseline`
    fn clip_at(&self, left: f32, baseline: f32) -> Option<Rect> {
        self.is_clipped().then(|| {
            let top = baseline - self.ascent();
            Rect::new(left, top, self.width, self.ascent() + self.descent())
        })
    }

    /// Ink bounds with the run's left edge at the baseline origin
    pub fn compute_bounding_box(&self, renderer: &dyn Renderer) -> Rect {
        let paint = self.paint(Point::new(-self.glyph_shift, 0.0), self.clip_at(0.0, 0.0));
        renderer.compute_bounding_box(&paint)
    }

    /// Draw with the line origin at `at`
    pub fn draw(&self, renderer: &mut dyn Renderer, at: Point) -> Result<()> {
        let left = at.x + self.origin.x;
        let baseline = at.y + self.origin.y;
        let paint = self.paint(
            Point::new(left - self.glyph_shift, baseline),
            self.clip_at(left, baseline),
        );
        renderer.draw_glyphs(&paint)
    }
}
