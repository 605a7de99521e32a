//! Filling a rectangle with lines
//!
//! Composition runs in two passes. The first walks paragraphs and breaks
//! lines against each line's extent, stacking them from the top until the
//! frame is full. The second places the lines horizontally (and the block
//! vertically) once the final frame size is known, so that frames sized to
//! their content align against the content width.

use std::ops::Range;

use typeset_core::types::{Point, Rect};
use typeset_unicode::LineBreak;

use crate::attributes::{ParagraphStyle, TextAlignment};
use crate::break_resolver::BreakMode;
use crate::composed_frame::ComposedFrame;
use crate::composed_line::ComposedLine;
use crate::line_resolver::TruncationPlace;
use crate::typesetter::{Typesetter, DEFAULT_TRUNCATION_TOKEN};

/// Placement of the lines inside a frame taller than they are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl VerticalAlignment {
    fn factor(self) -> f32 {
        match self {
            VerticalAlignment::Top => 0.0,
            VerticalAlignment::Middle => 0.5,
            VerticalAlignment::Bottom => 1.0,
        }
    }
}

/// Horizontal constraints a line was broken against
#[derive(Debug, Clone, Copy)]
struct Placement {
    head_indent: f32,
    tail_indent: f32,
    flush_factor: f32,
    extent: f32,
}

/// Composes frames over a typesetter's text
///
/// ```
/// # use std::sync::Arc;
/// # use typeset_core::types::Rect;
/// # use typeset_layout::{FrameResolver, TextAlignment, Typesetter};
/// # fn frame(typesetter: &Typesetter) {
/// let frame = typesetter
///     .frame_resolver()
///     .frame_bounds(Rect::new(0.0, 0.0, 320.0, 200.0))
///     .text_alignment(TextAlignment::Center)
///     .max_lines(3)
///     .make_frame(0..typesetter.text().len());
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FrameResolver<'t> {
    typesetter: &'t Typesetter,
    frame_bounds: Rect,
    fits_horizontally: bool,
    fits_vertically: bool,
    text_alignment: TextAlignment,
    vertical_alignment: VerticalAlignment,
    truncation_place: Option<TruncationPlace>,
    truncation_token: Option<String>,
    max_lines: usize,
    line_height_multiplier: f32,
    extra_line_spacing: f32,
    justification_enabled: bool,
    justification_level: f32,
}

impl<'t> FrameResolver<'t> {
    pub fn new(typesetter: &'t Typesetter) -> Self {
        Self {
            typesetter,
            frame_bounds: Rect::new(0.0, 0.0, f32::INFINITY, f32::INFINITY),
            fits_horizontally: false,
            fits_vertically: false,
            text_alignment: TextAlignment::default(),
            vertical_alignment: VerticalAlignment::default(),
            truncation_place: None,
            truncation_token: None,
            max_lines: 0,
            line_height_multiplier: 1.0,
            extra_line_spacing: 0.0,
            justification_enabled: false,
            justification_level: 1.0,
        }
    }

    /// Area to fill; infinite sizes grow with the content
    pub fn frame_bounds(mut self, bounds: Rect) -> Self {
        self.frame_bounds = bounds;
        self
    }

    /// Shrink the frame width to the widest line
    pub fn fits_horizontally(mut self, fits: bool) -> Self {
        self.fits_horizontally = fits;
        self
    }

    /// Shrink the frame height to the lines it holds
    pub fn fits_vertically(mut self, fits: bool) -> Self {
        self.fits_vertically = fits;
        self
    }

    /// Alignment for paragraphs that do not set their own
    pub fn text_alignment(mut self, alignment: TextAlignment) -> Self {
        self.text_alignment = alignment;
        self
    }

    pub fn vertical_alignment(mut self, alignment: VerticalAlignment) -> Self {
        self.vertical_alignment = alignment;
        self
    }

    /// Truncate the last line when text is left over
    pub fn truncation_place(mut self, place: impl Into<Option<TruncationPlace>>) -> Self {
        self.truncation_place = place.into();
        self
    }

    /// Text standing in for truncated text, "…" unless set
    pub fn truncation_token(mut self, token: impl Into<String>) -> Self {
        self.truncation_token = Some(token.into());
        self
    }

    /// Stop after this many lines; 0 means no limit
    pub fn max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }

    pub fn line_height_multiplier(mut self, multiplier: f32) -> Self {
        self.line_height_multiplier = multiplier;
        self
    }

    pub fn extra_line_spacing(mut self, spacing: f32) -> Self {
        self.extra_line_spacing = spacing;
        self
    }

    /// Justify every line that does not end its paragraph
    pub fn justification_enabled(mut self, enabled: bool) -> Self {
        self.justification_enabled = enabled;
        self
    }

    /// Fraction of the free space justification distributes
    pub fn justification_level(mut self, level: f32) -> Self {
        self.justification_level = level;
        self
    }

    /// Compose as many lines of `range` as the frame holds
    pub fn make_frame(&self, range: Range<usize>) -> ComposedFrame {
        let text = self.typesetter.text();
        text.check_range(&range);

        let analysis = self.typesetter.analysis();
        let breaks = self.typesetter.break_resolver();
        let lines_resolver = self.typesetter.line_resolver();
        let bounds = self.frame_bounds;

        let mut lines: Vec<ComposedLine> = Vec::new();
        let mut placements: Vec<Placement> = Vec::new();
        let mut position = range.start;
        let mut y = 0.0;
        let mut previous_spacing = 0.0;
        let mut filled = false;

        'paragraphs: while position < range.end {
            let Some(paragraph) = analysis.bidi.paragraph_at(position) else {
                break;
            };
            let paragraph_range = paragraph.code_unit_range.clone();
            let paragraph_end = paragraph_range.end.min(range.end);
            let style = self.typesetter.style_at(paragraph_range.start).paragraph.clone();
            let flush_factor = style
                .alignment
                .unwrap_or(self.text_alignment)
                .flush_factor(paragraph.direction());
            let mut first_in_paragraph = true;

            while position < paragraph_end {
                let head_indent = if position == paragraph_range.start {
                    style.first_line_head_indent
                } else {
                    style.head_indent
                };
                let extent = (bounds.width - head_indent - style.tail_indent).max(0.0);
                let end = breaks.suggest_forward_break(position..paragraph_end, extent, BreakMode::Line);

                let justify = self.justification_enabled
                    && extent.is_finite()
                    && end < paragraph_end
                    && analysis.breaks.line_break_at(end) != LineBreak::Mandatory;
                let mut line = if justify {
                    lines_resolver.make_justified_line(position..end, self.justification_level, extent)
                } else {
                    lines_resolver.make_simple_line(position..end)
                };
                self.adjust_line_height(&mut line, &style);

                let gap = if lines.is_empty() {
                    0.0
                } else if first_in_paragraph {
                    previous_spacing + style.paragraph_spacing_before
                } else {
                    style.line_spacing
                };
                let top = y + gap;
                if top + line.height() > bounds.height && !lines.is_empty() {
                    filled = true;
                    break 'paragraphs;
                }

                line.set_origin(Point::new(0.0, top + line.ascent()));
                y = top + line.height();
                lines.push(line);
                placements.push(Placement {
                    head_indent,
                    tail_indent: style.tail_indent,
                    flush_factor,
                    extent,
                });
                position = end;
                first_in_paragraph = false;

                if self.max_lines > 0 && lines.len() >= self.max_lines {
                    filled = true;
                    break 'paragraphs;
                }
            }
            previous_spacing = style.paragraph_spacing;
        }

        if filled && position < range.end {
            if let Some(place) = self.truncation_place {
                if let Some(end) = self.truncate_last_line(&mut lines, &placements, range.end, place) {
                    position = end;
                }
            }
        }

        let frame = self.place_lines(range.start..position, lines, &placements, y);
        log::debug!(
            "Composed frame {}..{}: {} line(s), {}x{}",
            frame.code_unit_range().start,
            frame.code_unit_range().end,
            frame.lines().len(),
            frame.width(),
            frame.height()
        );
        frame
    }

    /// Rebuild the last line as a truncated line over the rest of its
    /// paragraph; returns the new end of the composed range
    ///
    /// The token is shown even when the rest of the paragraph fits, since
    /// later text is cut off either way.
    fn truncate_last_line(
        &self,
        lines: &mut [ComposedLine],
        placements: &[Placement],
        limit: usize,
        place: TruncationPlace,
    ) -> Option<usize> {
        let (last, placement) = (lines.last_mut()?, placements.last()?);

        let start = last.code_unit_range().start;
        let analysis = self.typesetter.analysis();
        let end = analysis
            .bidi
            .paragraph_at(start)
            .map_or(limit, |paragraph| paragraph.code_unit_range.end)
            .min(limit);
        let range = start..end;

        let token_text = self.truncation_token.as_deref().unwrap_or(DEFAULT_TRUNCATION_TOKEN);
        let token_style = self.typesetter.truncation_style(range.clone(), place);
        let token = match self.typesetter.make_token_line(token_text, token_style) {
            Ok(token) => token,
            Err(error) => {
                log::warn!("Truncation token {token_text:?} could not be shaped: {error}");
                ComposedLine::empty(0, 0)
            }
        };

        let mut truncated = self.typesetter.line_resolver().make_elided_line(
            range,
            placement.extent,
            BreakMode::Line,
            place,
            &token,
        );
        let style = &self.typesetter.style_at(start).paragraph;
        self.adjust_line_height(&mut truncated, style);
        let top = last.origin().y - last.ascent();
        truncated.set_origin(Point::new(0.0, top + truncated.ascent()));
        *last = truncated;

        log::trace!("Truncated last line to {}..{} at {:?}", start, end, place);
        Some(end)
    }

    /// Scale the line height and re-center ascent and descent around the
    /// baseline
    fn adjust_line_height(&self, line: &mut ComposedLine, style: &ParagraphStyle) {
        let natural = line.height();
        let multiple = if style.line_height_multiple > 0.0 {
            style.line_height_multiple
        } else {
            1.0
        };

        let mut target = natural * self.line_height_multiplier * multiple;
        if style.minimum_line_height > 0.0 {
            target = target.max(style.minimum_line_height);
        }
        if style.maximum_line_height > 0.0 {
            target = target.min(style.maximum_line_height);
        }
        target += self.extra_line_spacing;

        let delta = target - natural;
        if delta != 0.0 {
            line.set_vertical_metrics(line.ascent() + delta / 2.0, line.descent() + delta / 2.0);
        }
    }

    fn place_lines(
        &self,
        range: Range<usize>,
        mut lines: Vec<ComposedLine>,
        placements: &[Placement],
        content_height: f32,
    ) -> ComposedFrame {
        let bounds = self.frame_bounds;

        let content_width = lines
            .iter()
            .zip(placements)
            .map(|(line, placement)| {
                placement.head_indent + placement.tail_indent + line.width()
                    - line.trailing_whitespace_extent()
            })
            .fold(0.0, f32::max);
        let width = if self.fits_horizontally || !bounds.width.is_finite() {
            content_width
        } else {
            bounds.width
        };

        for (line, placement) in lines.iter_mut().zip(placements) {
            let extent = (width - placement.head_indent - placement.tail_indent).max(0.0);
            let left_indent = if line.is_rtl() {
                placement.tail_indent
            } else {
                placement.head_indent
            };
            let x = left_indent + line.pen_offset(placement.flush_factor, extent);
            line.set_origin(Point::new(x, line.origin().y));
        }

        let height = if self.fits_vertically || !bounds.height.is_finite() {
            content_height
        } else {
            bounds.height
        };
        if !self.fits_vertically && bounds.height.is_finite() {
            let shift = (height - content_height) * self.vertical_alignment.factor();
            if shift != 0.0 {
                for line in &mut lines {
                    let origin = line.origin();
                    line.set_origin(Point::new(origin.x, origin.y + shift));
                }
            }
        }

        ComposedFrame::new(range, Point::new(bounds.x, bounds.y), width, height, lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttributeSpan, TextAttribute};
    use crate::test_support::{typesetter, typesetter_with};
    use crate::typesetter::TypesetterOptions;

    fn bounds(width: f32, height: f32) -> Rect {
        Rect::new(0.0, 0.0, width, height)
    }

    fn ranges(frame: &ComposedFrame) -> Vec<Range<usize>> {
        frame.lines().iter().map(|line| line.code_unit_range()).collect()
    }

    #[test]
    fn test_single_line_in_infinite_frame() {
        let typesetter = typesetter("Hello World");
        let frame = typesetter.frame_resolver().make_frame(0..11);
        assert_eq!(ranges(&frame), vec![0..11]);
        assert_eq!(frame.width(), 110.0);
        assert_eq!(frame.height(), 20.0);
        assert_eq!(frame.lines()[0].origin(), Point::new(0.0, 16.0));
    }

    #[test]
    fn test_wrapping() {
        let typesetter = typesetter("Hello World");
        let frame = typesetter
            .frame_resolver()
            .frame_bounds(bounds(70.0, f32::INFINITY))
            .make_frame(0..11);
        assert_eq!(ranges(&frame), vec![0..6, 6..11]);
        assert_eq!(frame.width(), 70.0);
        assert_eq!(frame.height(), 40.0);
        assert_eq!(frame.lines()[1].origin().y, 36.0);
    }

    #[test]
    fn test_undersized_frame_keeps_one_line() {
        let typesetter = typesetter("Hello World");
        let frame = typesetter
            .frame_resolver()
            .frame_bounds(bounds(70.0, 5.0))
            .make_frame(0..11);
        assert_eq!(ranges(&frame), vec![0..6]);
        assert_eq!(frame.code_unit_range(), 0..6);
    }

    #[test]
    fn test_max_lines_with_truncation() {
        let typesetter = typesetter("Hello World");
        let frame = typesetter
            .frame_resolver()
            .frame_bounds(bounds(70.0, f32::INFINITY))
            .max_lines(1)
            .truncation_place(TruncationPlace::End)
            .make_frame(0..11);
        assert_eq!(frame.code_unit_range(), 0..11);
        let line = &frame.lines()[0];
        assert_eq!(line.code_unit_range(), 0..11);
        assert!(line.runs().last().is_some_and(|run| run.is_token()));
        assert!(line.width() <= 70.0);
    }

    #[test]
    fn test_truncation_at_paragraph_boundary_shows_token() {
        let typesetter = typesetter("ab\ncd");
        let by_count = typesetter
            .frame_resolver()
            .max_lines(1)
            .truncation_place(TruncationPlace::End);
        let by_height = typesetter
            .frame_resolver()
            .frame_bounds(bounds(100.0, 25.0))
            .truncation_place(TruncationPlace::End);

        for frame in [by_count.make_frame(0..5), by_height.make_frame(0..5)] {
            assert_eq!(ranges(&frame), vec![0..3]);
            let line = &frame.lines()[0];
            let runs: Vec<Range<usize>> = line.runs().iter().map(|run| run.code_unit_range()).collect();
            assert_eq!(runs, vec![0..2, 2..2]);
            assert!(line.runs()[1].is_token());
            assert_eq!(line.width(), 30.0);
        }
    }

    #[test]
    fn test_max_lines_without_truncation() {
        let typesetter = typesetter("Hello World");
        let frame = typesetter
            .frame_resolver()
            .frame_bounds(bounds(70.0, f32::INFINITY))
            .max_lines(1)
            .make_frame(0..11);
        assert_eq!(frame.code_unit_range(), 0..6);
    }

    #[test]
    fn test_center_alignment() {
        let typesetter = typesetter("Hello");
        let frame = typesetter
            .frame_resolver()
            .frame_bounds(bounds(200.0, f32::INFINITY))
            .text_alignment(TextAlignment::Center)
            .make_frame(0..5);
        assert_eq!(frame.lines()[0].origin().x, 75.0);
    }

    #[test]
    fn test_rtl_leading_alignment_is_right() {
        let typesetter = typesetter("שלום");
        let frame = typesetter
            .frame_resolver()
            .frame_bounds(bounds(100.0, f32::INFINITY))
            .make_frame(0..4);
        assert_eq!(frame.lines()[0].origin().x, 60.0);
    }

    #[test]
    fn test_fits_horizontally_aligns_against_content() {
        let typesetter = typesetter("Hello World");
        let frame = typesetter
            .frame_resolver()
            .frame_bounds(bounds(80.0, f32::INFINITY))
            .fits_horizontally(true)
            .text_alignment(TextAlignment::Right)
            .make_frame(0..11);
        // Widest visible line is "Hello" at 50
        assert_eq!(frame.width(), 50.0);
        assert_eq!(frame.lines()[0].origin().x, 0.0);
        assert_eq!(frame.lines()[1].origin().x, 0.0);
    }

    #[test]
    fn test_paragraph_and_line_spacing() {
        let spans = [
            AttributeSpan::new(0..14, TextAttribute::ParagraphSpacing(5.0)),
            AttributeSpan::new(0..14, TextAttribute::LineSpacing(3.0)),
        ];
        let typesetter = typesetter_with("ab\nHello World", &spans, TypesetterOptions::default());
        let frame = typesetter
            .frame_resolver()
            .frame_bounds(bounds(70.0, f32::INFINITY))
            .make_frame(0..14);
        assert_eq!(ranges(&frame), vec![0..3, 3..9, 9..14]);
        let baselines: Vec<f32> = frame.lines().iter().map(|line| line.origin().y).collect();
        assert_eq!(baselines, vec![16.0, 41.0, 64.0]);
        assert_eq!(frame.height(), 68.0);
    }

    #[test]
    fn test_line_height_multiplier_recenters() {
        let typesetter = typesetter("Hello");
        let frame = typesetter
            .frame_resolver()
            .line_height_multiplier(2.0)
            .make_frame(0..5);
        let line = &frame.lines()[0];
        assert_eq!(line.height(), 40.0);
        assert_eq!(line.ascent(), 26.0);
        assert_eq!(line.descent(), 14.0);
    }

    #[test]
    fn test_minimum_line_height() {
        let spans = [AttributeSpan::new(0..5, TextAttribute::MinimumLineHeight(30.0))];
        let typesetter = typesetter_with("Hello", &spans, TypesetterOptions::default());
        let frame = typesetter
            .frame_resolver()
            .extra_line_spacing(2.0)
            .make_frame(0..5);
        assert_eq!(frame.lines()[0].height(), 32.0);
    }

    #[test]
    fn test_vertical_alignment_bottom() {
        let typesetter = typesetter("Hello");
        let frame = typesetter
            .frame_resolver()
            .frame_bounds(bounds(100.0, 100.0))
            .vertical_alignment(VerticalAlignment::Bottom)
            .make_frame(0..5);
        assert_eq!(frame.height(), 100.0);
        assert_eq!(frame.lines()[0].origin().y, 96.0);
    }

    #[test]
    fn test_justification_skips_paragraph_end() {
        let typesetter = typesetter("aa bb cc");
        let frame = typesetter
            .frame_resolver()
            .frame_bounds(bounds(60.0, f32::INFINITY))
            .justification_enabled(true)
            .make_frame(0..8);
        assert_eq!(ranges(&frame), vec![0..6, 6..8]);
        let first = &frame.lines()[0];
        assert_eq!(first.width() - first.trailing_whitespace_extent(), 60.0);
        assert_eq!(frame.lines()[1].width(), 20.0);
    }

    #[test]
    fn test_first_line_head_indent() {
        let spans = [
            AttributeSpan::new(0..11, TextAttribute::FirstLineHeadIndent(10.0)),
            AttributeSpan::new(0..11, TextAttribute::HeadIndent(5.0)),
        ];
        let typesetter = typesetter_with("Hello World", &spans, TypesetterOptions::default());
        let frame = typesetter
            .frame_resolver()
            .frame_bounds(bounds(75.0, f32::INFINITY))
            .make_frame(0..11);
        assert_eq!(frame.lines()[0].origin().x, 10.0);
        assert_eq!(frame.lines()[1].origin().x, 5.0);
    }

    #[test]
    fn test_empty_text_gives_empty_frame() {
        let typesetter = typesetter("");
        let frame = typesetter.frame_resolver().make_frame(0..0);
        assert!(frame.lines().is_empty());
        assert_eq!(frame.height(), 0.0);
    }

    #[test]
    fn test_frame_queries() {
        let typesetter = typesetter("Hello World");
        let frame = typesetter
            .frame_resolver()
            .frame_bounds(bounds(70.0, f32::INFINITY))
            .make_frame(0..11);

        assert_eq!(frame.line_index_for_code_unit(3), Some(0));
        assert_eq!(frame.line_index_for_code_unit(6), Some(1));
        assert_eq!(frame.line_index_for_code_unit(11), Some(1));
        assert_eq!(frame.line_index_at(-10.0), Some(0));
        assert_eq!(frame.line_index_at(30.0), Some(1));
        assert_eq!(frame.index_of_code_unit_at(Point::new(24.0, 30.0)), 8);

        let path = frame.selection_path(3..8);
        assert_eq!(
            path,
            vec![
                Rect::new(30.0, 0.0, 30.0, 20.0),
                Rect::new(60.0, 0.0, 10.0, 20.0),
                Rect::new(0.0, 20.0, 20.0, 20.0),
            ]
        );
    }
}
