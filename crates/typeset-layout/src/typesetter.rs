//! The entry point of the layout core
//!
//! A [`Typesetter`] owns a text, its resolved styles, its Unicode analysis
//! and the intrinsic runs shaped from them. Everything else borrows from
//! it: resolvers are cheap views created on demand, and the lines they
//! compose share the intrinsic runs through reference counting.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use typeset_core::{types::Tag, Result, Shaper, Text, TypesetError};
use typeset_unicode::{BaseDirection, BidiParagraph, TextAnalysis};

use crate::attributes::{AttributeSpan, StyleRuns, TextStyle};
use crate::break_resolver::{BreakMode, BreakResolver};
use crate::composed_line::ComposedLine;
use crate::frame_resolver::FrameResolver;
use crate::intrinsic_run::IntrinsicRun;
use crate::line_resolver::{LineResolver, TruncationPlace};
use crate::shape_resolver::ShapeResolver;

/// Stand-in for text dropped by truncation when no token is given
pub const DEFAULT_TRUNCATION_TOKEN: &str = "\u{2026}";

/// Settings that apply to the whole text
#[derive(Debug, Clone, Default)]
pub struct TypesetterOptions {
    pub base_direction: BaseDirection,
    /// BCP 47 language tag for the shaping engine
    pub language: Option<String>,
    /// OpenType features and their values
    pub features: Vec<(Tag, u32)>,
}

impl TypesetterOptions {
    pub fn base_direction(mut self, direction: BaseDirection) -> Self {
        self.base_direction = direction;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Add one feature setting, e.g. `liga` = 0
    pub fn feature(mut self, tag: Tag, value: u32) -> Self {
        self.features.push((tag, value));
        self
    }

    pub fn features(mut self, features: Vec<(Tag, u32)>) -> Self {
        self.features = features;
        self
    }
}

/// A shaped text ready for line and frame composition
pub struct Typesetter {
    shaper: Arc<dyn Shaper>,
    text: Text,
    default_style: TextStyle,
    styles: StyleRuns,
    options: TypesetterOptions,
    analysis: TextAnalysis,
    runs: Vec<Arc<IntrinsicRun>>,
}

impl Typesetter {
    /// Shape `text` in a single style
    pub fn new(shaper: Arc<dyn Shaper>, text: impl Into<Text>, style: TextStyle) -> Result<Self> {
        Self::with_attributes(shaper, text, style, &[], TypesetterOptions::default())
    }

    /// Shape `text` with `spans` layered over `style`
    ///
    /// Fails when a span lies outside the text, when some code unit ends up
    /// without a typeface or with a non-positive type size, and when the
    /// shaping engine fails or returns malformed output.
    pub fn with_attributes(
        shaper: Arc<dyn Shaper>,
        text: impl Into<Text>,
        style: TextStyle,
        spans: &[AttributeSpan],
        options: TypesetterOptions,
    ) -> Result<Self> {
        let text = text.into();
        if let Some(span) = spans
            .iter()
            .find(|span| span.range.start > span.range.end || span.range.end > text.len())
        {
            return Err(TypesetError::ConfigError(format!(
                "attribute span {}..{} is outside a text of {} code units",
                span.range.start,
                span.range.end,
                text.len()
            )));
        }

        let styles = StyleRuns::resolve(text.len(), &style, spans);
        let analysis = TextAnalysis::new(&text, options.base_direction);
        let runs = ShapeResolver::new(&text, &analysis, &styles, shaper.as_ref())
            .language(options.language.clone())
            .features(options.features.clone())
            .make_runs()?;

        log::debug!(
            "Typesetter ready: {} code units, {} paragraph(s), {} style run(s), {} intrinsic run(s)",
            text.len(),
            analysis.bidi.paragraphs().len(),
            styles.runs().len(),
            runs.len()
        );

        Ok(Self {
            shaper,
            text,
            default_style: style,
            styles,
            options,
            analysis,
            runs,
        })
    }

    pub fn text(&self) -> &Text {
        &self.text
    }

    pub fn options(&self) -> &TypesetterOptions {
        &self.options
    }

    pub fn analysis(&self) -> &TextAnalysis {
        &self.analysis
    }

    pub fn paragraphs(&self) -> &[BidiParagraph] {
        self.analysis.bidi.paragraphs()
    }

    /// Shaped runs tiling the text, sorted by start offset
    pub fn intrinsic_runs(&self) -> &[Arc<IntrinsicRun>] {
        &self.runs
    }

    pub fn style_runs(&self) -> &StyleRuns {
        &self.styles
    }

    /// Style of the code unit at `index`
    pub fn style_at(&self, index: usize) -> &TextStyle {
        if self.styles.runs().is_empty() {
            &self.default_style
        } else {
            self.styles.style_at(index)
        }
    }

    pub fn line_resolver(&self) -> LineResolver<'_> {
        LineResolver::new(&self.text, &self.analysis, &self.runs, &self.styles)
    }

    pub fn break_resolver(&self) -> BreakResolver<'_> {
        BreakResolver::new(&self.text, &self.analysis, &self.runs)
    }

    pub fn frame_resolver(&self) -> FrameResolver<'_> {
        FrameResolver::new(self)
    }

    /// See [`LineResolver::make_simple_line`]
    pub fn make_simple_line(&self, range: Range<usize>) -> ComposedLine {
        self.line_resolver().make_simple_line(range)
    }

    /// See [`LineResolver::make_justified_line`]
    pub fn make_justified_line(&self, range: Range<usize>, factor: f32, extent: f32) -> ComposedLine {
        self.line_resolver().make_justified_line(range, factor, extent)
    }

    /// See [`LineResolver::make_compact_line`]
    pub fn make_compact_line(
        &self,
        range: Range<usize>,
        extent: f32,
        mode: BreakMode,
        place: TruncationPlace,
        token: &ComposedLine,
    ) -> ComposedLine {
        self.line_resolver()
            .make_compact_line(range, extent, mode, place, token)
    }

    /// A line showing `range` shortened to `extent` with `token` standing in
    /// for the dropped text
    ///
    /// Without a token, an ellipsis is shaped in the style found at the
    /// truncation point.
    pub fn make_truncated_line(
        &self,
        range: Range<usize>,
        extent: f32,
        mode: BreakMode,
        place: TruncationPlace,
        token: Option<&str>,
    ) -> Result<ComposedLine> {
        if range.is_empty() {
            return Ok(self.make_simple_line(range));
        }

        let style = self.truncation_style(range.clone(), place);
        let token = self.make_token_line(token.unwrap_or(DEFAULT_TRUNCATION_TOKEN), style)?;
        Ok(self.make_compact_line(range, extent, mode, place, &token))
    }

    /// `token` shaped on its own line in `style`
    pub fn make_token_line(&self, token: &str, style: &TextStyle) -> Result<ComposedLine> {
        let typesetter = Typesetter::with_attributes(
            self.shaper.clone(),
            token,
            style.clone(),
            &[],
            self.options.clone(),
        )?;
        Ok(typesetter.make_simple_line(0..typesetter.text.len()))
    }

    pub fn suggest_forward_break(&self, range: Range<usize>, extent: f32, mode: BreakMode) -> usize {
        self.break_resolver().suggest_forward_break(range, extent, mode)
    }

    pub fn suggest_backward_break(&self, range: Range<usize>, extent: f32, mode: BreakMode) -> usize {
        self.break_resolver().suggest_backward_break(range, extent, mode)
    }

    /// Style the truncation token of `range` is drawn in
    pub(crate) fn truncation_style(&self, range: Range<usize>, place: TruncationPlace) -> &TextStyle {
        let index = match place {
            TruncationPlace::Start => range.start,
            TruncationPlace::Middle => range.start + range.len() / 2,
            TruncationPlace::End => range.end.saturating_sub(1).max(range.start),
        };
        self.style_at(index)
    }
}

impl fmt::Debug for Typesetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typesetter")
            .field("shaper", &self.shaper.name())
            .field("text", &self.text.as_str())
            .field("options", &self.options)
            .field("runs", &self.runs.len())
            .finish_non_exhaustive()
    }
}
