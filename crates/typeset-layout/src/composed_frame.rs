//! A block of composed lines

use std::ops::Range;

use typeset_core::{
    error::Result,
    types::{Point, Rect},
    Renderer,
};

use crate::composed_line::ComposedLine;

/// Lines filling a frame, in the order they were composed
///
/// Line origins are relative to the frame's top-left corner. The frame's
/// code unit range ends where composition stopped, which is short of the
/// requested range when the lines ran out of room.
#[derive(Debug, Clone, Default)]
pub struct ComposedFrame {
    range: Range<usize>,
    origin: Point,
    width: f32,
    height: f32,
    lines: Vec<ComposedLine>,
}

impl ComposedFrame {
    pub(crate) fn new(range: Range<usize>, origin: Point, width: f32, height: f32, lines: Vec<ComposedLine>) -> Self {
        Self {
            range,
            origin,
            width,
            height,
            lines,
        }
    }

    pub fn code_unit_range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Top-left corner of the frame bounds it was composed for
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn lines(&self) -> &[ComposedLine] {
        &self.lines
    }

    /// Line showing `index`; the frame's end offset maps to the last line
    pub fn line_index_for_code_unit(&self, index: usize) -> Option<usize> {
        if index == self.range.end && !self.lines.is_empty() {
            return Some(self.lines.len() - 1);
        }
        self.lines
            .iter()
            .position(|line| line.code_unit_range().contains(&index))
    }

    /// Line at vertical position `y`, clamped to the first and last lines
    pub fn line_index_at(&self, y: f32) -> Option<usize> {
        if self.lines.is_empty() {
            return None;
        }
        let index = self
            .lines
            .iter()
            .position(|line| y < line.origin().y + line.descent() + line.leading())
            .unwrap_or(self.lines.len() - 1);
        Some(index)
    }

    /// Code unit whose caret is closest to `point`
    pub fn index_of_code_unit_at(&self, point: Point) -> usize {
        match self.line_index_at(point.y) {
            Some(index) => {
                let line = &self.lines[index];
                line.index_of_code_unit_at(point.x - line.origin().x)
            }
            None => self.range.start,
        }
    }

    /// Rectangles highlighting `range`
    ///
    /// A selection that continues onto the next line extends to the frame
    /// edge on the trailing side of the line; one that started on a previous
    /// line extends to the frame edge on the leading side.
    pub fn selection_path(&self, range: Range<usize>) -> Vec<Rect> {
        let mut rects = Vec::new();
        for line in &self.lines {
            let line_range = line.code_unit_range();
            let start = range.start.max(line_range.start);
            let end = range.end.min(line_range.end);
            if start >= end {
                continue;
            }

            let top = line.origin().y - line.ascent();
            let height = line.ascent() + line.descent();
            let edges = line.compute_visual_edges(start..end);
            for &(left, right) in &edges {
                let x = line.origin().x + left;
                rects.push(Rect::new(x, top, right - left, height));
            }

            let Some(min_left) = edges.first().map(|edge| line.origin().x + edge.0) else {
                continue;
            };
            let max_right = edges.last().map_or(min_left, |edge| line.origin().x + edge.1);
            let continues = range.end > line_range.end;
            let started_before = range.start < line_range.start;
            let (extend_right, extend_left) = if line.is_rtl() {
                (started_before, continues)
            } else {
                (continues, started_before)
            };
            if extend_right && max_right < self.width {
                rects.push(Rect::new(max_right, top, self.width - max_right, height));
            }
            if extend_left && min_left > 0.0 {
                rects.push(Rect::new(0.0, top, min_left, height));
            }
        }
        rects
    }

    /// Ink bounds relative to the frame's top-left corner
    pub fn compute_bounding_box(&self, renderer: &dyn Renderer) -> Rect {
        self.lines.iter().fold(Rect::default(), |bounds, line| {
            let origin = line.origin();
            bounds.union(&line.compute_bounding_box(renderer).offset(origin.x, origin.y))
        })
    }

    /// Draw with the frame's top-left corner at `at`
    pub fn draw(&self, renderer: &mut dyn Renderer, at: Point) -> Result<()> {
        log::debug!("Drawing {} line(s) with {}", self.lines.len(), renderer.name());
        for line in &self.lines {
            let origin = line.origin();
            line.draw(renderer, Point::new(at.x + origin.x, at.y + origin.y))?;
        }
        Ok(())
    }
}
