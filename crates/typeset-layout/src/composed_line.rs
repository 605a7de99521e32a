//! A finished line of glyph runs in visual order

use std::ops::Range;

use typeset_core::{
    error::Result,
    types::{Point, Rect},
    Renderer,
};

use crate::glyph_run::GlyphRun;

/// One line of text, ready to be placed and drawn
///
/// Runs are stored left to right and touch each other: every run starts
/// where the previous one ends. Run origins are relative to the line origin,
/// which sits on the baseline at the line's left edge.
#[derive(Debug, Clone)]
pub struct ComposedLine {
    range: Range<usize>,
    paragraph_level: u8,
    ascent: f32,
    descent: f32,
    leading: f32,
    width: f32,
    trailing_whitespace_extent: f32,
    origin: Point,
    runs: Vec<GlyphRun>,
}

impl ComposedLine {
    /// Lay `runs` out left to right
    pub(crate) fn new(
        range: Range<usize>,
        paragraph_level: u8,
        mut runs: Vec<GlyphRun>,
        trailing_whitespace_extent: f32,
    ) -> Self {
        let mut x = 0.0;
        let mut ascent: f32 = 0.0;
        let mut descent: f32 = 0.0;
        let mut leading: f32 = 0.0;
        for run in &mut runs {
            run.set_origin(Point::new(x, 0.0));
            x += run.width();
            ascent = ascent.max(run.ascent());
            descent = descent.max(run.descent());
            leading = leading.max(run.leading());
        }

        Self {
            range,
            paragraph_level,
            ascent,
            descent,
            leading,
            width: x,
            trailing_whitespace_extent,
            origin: Point::zero(),
            runs,
        }
    }

    /// A line with no runs covering nothing at `offset`
    pub(crate) fn empty(offset: usize, paragraph_level: u8) -> Self {
        Self::new(offset..offset, paragraph_level, Vec::new(), 0.0)
    }

    pub fn code_unit_range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn paragraph_level(&self) -> u8 {
        self.paragraph_level
    }

    pub fn is_rtl(&self) -> bool {
        self.paragraph_level & 1 == 1
    }

    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    pub fn descent(&self) -> f32 {
        self.descent
    }

    pub fn leading(&self) -> f32 {
        self.leading
    }

    pub fn height(&self) -> f32 {
        self.ascent + self.descent + self.leading
    }

    /// Sum of the run widths, trailing whitespace included
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn trailing_whitespace_extent(&self) -> f32 {
        self.trailing_whitespace_extent
    }

    /// Baseline-left position inside the frame
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub(crate) fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub(crate) fn set_vertical_metrics(&mut self, ascent: f32, descent: f32) {
        self.ascent = ascent;
        self.descent = descent;
    }

    /// Glyph runs, left to right
    pub fn runs(&self) -> &[GlyphRun] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Horizontal pen position that aligns the line within `extent`
    ///
    /// `flush_factor` 0 aligns the visible text left, 1 right, 0.5 centers
    /// it. Trailing whitespace hangs outside the extent: after the text in
    /// left-to-right lines, before it in right-to-left ones.
    pub fn pen_offset(&self, flush_factor: f32, extent: f32) -> f32 {
        let visible = self.width - self.trailing_whitespace_extent;
        let pen = (extent - visible) * flush_factor;
        if self.is_rtl() {
            pen - self.trailing_whitespace_extent
        } else {
            pen
        }
    }

    /// Distance of the caret before `index` from the line's left edge
    ///
    /// Indices excised by truncation resolve to the truncation token.
    pub fn distance_for_code_unit(&self, index: usize) -> f32 {
        self.check_index(index);

        let containing = self
            .runs
            .iter()
            .find(|run| run.code_unit_range().contains(&index))
            .or_else(|| {
                self.runs
                    .iter()
                    .find(|run| !run.is_token() && run.code_unit_range().end == index)
            });
        if let Some(run) = containing {
            return run.origin().x + run.distance_for_code_unit(index);
        }

        match self.runs.iter().find(|run| run.is_token()) {
            Some(token) => token.origin().x,
            None if self.is_rtl() => self.width,
            None => 0.0,
        }
    }

    /// Code unit whose caret is closest to `distance` from the left edge
    pub fn index_of_code_unit_at(&self, distance: f32) -> usize {
        let Some(last) = self.runs.last() else {
            return self.range.start;
        };
        let run = self
            .runs
            .iter()
            .find(|run| distance < run.origin().x + run.width())
            .unwrap_or(last);
        run.index_of_code_unit_at(distance - run.origin().x)
    }

    /// Left and right edges of the parts of `range` shown on this line
    ///
    /// Spans are returned left to right; touching spans are merged.
    pub fn compute_visual_edges(&self, range: Range<usize>) -> Vec<(f32, f32)> {
        let mut edges: Vec<(f32, f32)> = Vec::new();
        for run in self.runs.iter().filter(|run| !run.is_token()) {
            let run_range = run.code_unit_range();
            let start = range.start.max(run_range.start);
            let end = range.end.min(run_range.end);
            if start >= end {
                continue;
            }

            let a = run.origin().x + run.distance_for_code_unit(start);
            let b = run.origin().x + run.distance_for_code_unit(end);
            let (left, right) = if a <= b { (a, b) } else { (b, a) };
            match edges.last_mut() {
                Some(last) if (last.1 - left).abs() < f32::EPSILON => last.1 = right,
                _ => edges.push((left, right)),
            }
        }
        edges
    }

    /// Ink bounds relative to the line origin
    pub fn compute_bounding_box(&self, renderer: &dyn Renderer) -> Rect {
        self.runs.iter().fold(Rect::default(), |bounds, run| {
            let run_box = run.compute_bounding_box(renderer).offset(run.origin().x, 0.0);
            bounds.union(&run_box)
        })
    }

    /// Draw with the line origin at `at`
    pub fn draw(&self, renderer: &mut dyn Renderer, at: Point) -> Result<()> {
        for run in &self.runs {
            run.draw(renderer, at)?;
        }
        Ok(())
    }

    fn check_index(&self, index: usize) {
        assert!(
            index >= self.range.start && index <= self.range.end,
            "code unit {index} out of bounds for line {}..{}",
            self.range.start,
            self.range.end
        );
    }
}
