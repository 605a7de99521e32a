//! Styling attached to ranges of text
//!
//! Callers describe styling as [`AttributeSpan`]s over code unit ranges on
//! top of a default [`TextStyle`]. The spans are flattened once into
//! [`StyleRuns`]: a sorted, gap-free list of ranges each carrying a fully
//! resolved style.

use std::ops::Range;
use std::sync::Arc;

use typeset_core::{
    traits::same_typeface,
    types::{Color, WritingDirection},
    Typeface,
};

/// Horizontal placement of lines inside their frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    /// Start edge of the paragraph direction
    #[default]
    Leading,
    /// End edge of the paragraph direction
    Trailing,
    Left,
    Right,
    Center,
}

impl TextAlignment {
    /// Fraction of the free space placed before the line
    ///
    /// 0 puts the line against the left edge, 1 against the right edge.
    pub fn flush_factor(self, direction: WritingDirection) -> f32 {
        match (self, direction) {
            (TextAlignment::Leading, WritingDirection::LeftToRight)
            | (TextAlignment::Trailing, WritingDirection::RightToLeft)
            | (TextAlignment::Left, _) => 0.0,
            (TextAlignment::Leading, WritingDirection::RightToLeft)
            | (TextAlignment::Trailing, WritingDirection::LeftToRight)
            | (TextAlignment::Right, _) => 1.0,
            (TextAlignment::Center, _) => 0.5,
        }
    }
}

/// One recognized style attribute
#[derive(Debug, Clone)]
pub enum TextAttribute {
    Typeface(Arc<dyn Typeface>),
    TypeSize(f32),
    ScaleX(f32),
    ScaleY(f32),
    BaselineOffset(f32),
    Obliqueness(f32),
    ForegroundColor(Color),
    Alignment(TextAlignment),
    FirstLineHeadIndent(f32),
    HeadIndent(f32),
    TailIndent(f32),
    LineSpacing(f32),
    ParagraphSpacing(f32),
    ParagraphSpacingBefore(f32),
    MinimumLineHeight(f32),
    MaximumLineHeight(f32),
    LineHeightMultiple(f32),
}

/// An attribute applied to a code unit range
#[derive(Debug, Clone)]
pub struct AttributeSpan {
    pub range: Range<usize>,
    pub attribute: TextAttribute,
}

impl AttributeSpan {
    pub fn new(range: Range<usize>, attribute: TextAttribute) -> Self {
        Self { range, attribute }
    }
}

/// Paragraph-level settings, read from the style at a paragraph's start
///
/// Zero means "not set" for the line height limits and the multiple.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphStyle {
    /// Overrides the frame's alignment when set
    pub alignment: Option<TextAlignment>,
    pub first_line_head_indent: f32,
    pub head_indent: f32,
    pub tail_indent: f32,
    pub line_spacing: f32,
    pub paragraph_spacing: f32,
    pub paragraph_spacing_before: f32,
    pub minimum_line_height: f32,
    pub maximum_line_height: f32,
    pub line_height_multiple: f32,
}

/// Fully resolved character style
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub typeface: Option<Arc<dyn Typeface>>,
    pub type_size: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub baseline_offset: f32,
    pub obliqueness: f32,
    pub foreground_color: Color,
    pub paragraph: ParagraphStyle,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            typeface: None,
            type_size: 16.0,
            scale_x: 1.0,
            scale_y: 1.0,
            baseline_offset: 0.0,
            obliqueness: 0.0,
            foreground_color: Color::black(),
            paragraph: ParagraphStyle::default(),
        }
    }
}

impl TextStyle {
    /// Default style drawn with `typeface` at `type_size`
    pub fn new(typeface: Arc<dyn Typeface>, type_size: f32) -> Self {
        Self {
            typeface: Some(typeface),
            type_size,
            ..Default::default()
        }
    }

    pub fn typeface(mut self, typeface: Arc<dyn Typeface>) -> Self {
        self.typeface = Some(typeface);
        self
    }

    pub fn type_size(mut self, type_size: f32) -> Self {
        self.type_size = type_size;
        self
    }

    pub fn foreground_color(mut self, color: Color) -> Self {
        self.foreground_color = color;
        self
    }

    pub fn paragraph(mut self, paragraph: ParagraphStyle) -> Self {
        self.paragraph = paragraph;
        self
    }

    /// Overwrite the field `attribute` names
    pub fn apply(&mut self, attribute: &TextAttribute) {
        let paragraph = &mut self.paragraph;
        match attribute {
            TextAttribute::Typeface(typeface) => self.typeface = Some(typeface.clone()),
            TextAttribute::TypeSize(v) => self.type_size = *v,
            TextAttribute::ScaleX(v) => self.scale_x = *v,
            TextAttribute::ScaleY(v) => self.scale_y = *v,
            TextAttribute::BaselineOffset(v) => self.baseline_offset = *v,
            TextAttribute::Obliqueness(v) => self.obliqueness = *v,
            TextAttribute::ForegroundColor(c) => self.foreground_color = *c,
            TextAttribute::Alignment(a) => paragraph.alignment = Some(*a),
            TextAttribute::FirstLineHeadIndent(v) => paragraph.first_line_head_indent = *v,
            TextAttribute::HeadIndent(v) => paragraph.head_indent = *v,
            TextAttribute::TailIndent(v) => paragraph.tail_indent = *v,
            TextAttribute::LineSpacing(v) => paragraph.line_spacing = *v,
            TextAttribute::ParagraphSpacing(v) => paragraph.paragraph_spacing = *v,
            TextAttribute::ParagraphSpacingBefore(v) => paragraph.paragraph_spacing_before = *v,
            TextAttribute::MinimumLineHeight(v) => paragraph.minimum_line_height = *v,
            TextAttribute::MaximumLineHeight(v) => paragraph.maximum_line_height = *v,
            TextAttribute::LineHeightMultiple(v) => paragraph.line_height_multiple = *v,
        }
    }

    /// Whether text in both styles can be shaped as one run
    ///
    /// Only the fields a shaping engine sees are compared; typefaces are
    /// compared by identity.
    pub fn shapes_like(&self, other: &TextStyle) -> bool {
        let same_face = match (&self.typeface, &other.typeface) {
            (Some(a), Some(b)) => same_typeface(a, b),
            (None, None) => true,
            _ => false,
        };
        same_face
            && self.type_size == other.type_size
            && self.baseline_offset == other.baseline_offset
            && self.obliqueness == other.obliqueness
            && self.scale_x == other.scale_x
            && self.scale_y == other.scale_y
    }
}

/// A range with its resolved style
#[derive(Debug, Clone)]
pub struct StyleRun {
    pub range: Range<usize>,
    pub style: TextStyle,
}

/// Gap-free, sorted style runs covering a whole text
#[derive(Debug, Clone, Default)]
pub struct StyleRuns {
    runs: Vec<StyleRun>,
}

impl StyleRuns {
    /// Flatten `spans` over `default` for a text of `len` code units
    ///
    /// Later spans win where spans overlap. Span ranges must lie inside
    /// the text.
    pub fn resolve(len: usize, default: &TextStyle, spans: &[AttributeSpan]) -> Self {
        if len == 0 {
            return Self::default();
        }

        let mut boundaries = vec![0, len];
        for span in spans {
            boundaries.push(span.range.start);
            boundaries.push(span.range.end);
        }
        boundaries.sort_unstable();
        boundaries.dedup();

        let mut runs: Vec<StyleRun> = Vec::with_capacity(boundaries.len());
        for pair in boundaries.windows(2) {
            let range = pair[0]..pair[1];
            let mut style = default.clone();
            for span in spans {
                if span.range.start <= range.start && span.range.end >= range.end {
                    style.apply(&span.attribute);
                }
            }
            runs.push(StyleRun { range, style });
        }

        Self { runs }
    }

    pub fn runs(&self) -> &[StyleRun] {
        &self.runs
    }

    /// Index of the run containing `index`
    pub fn run_index_at(&self, index: usize) -> usize {
        let position = self.runs.partition_point(|run| run.range.end <= index);
        position.min(self.runs.len().saturating_sub(1))
    }

    /// Style of the code unit at `index`
    pub fn style_at(&self, index: usize) -> &TextStyle {
        &self.runs[self.run_index_at(index)].style
    }

    /// Runs overlapping `range`, clipped to it
    pub fn runs_in(&self, range: Range<usize>) -> impl Iterator<Item = (Range<usize>, &TextStyle)> + '_ {
        let first = if range.is_empty() {
            self.runs.len()
        } else {
            self.run_index_at(range.start)
        };
        self.runs[first..]
            .iter()
            .take_while(move |run| run.range.start < range.end)
            .map(move |run| {
                let start = run.range.start.max(range.start);
                let end = run.range.end.min(range.end);
                (start..end, &run.style)
            })
    }
}
