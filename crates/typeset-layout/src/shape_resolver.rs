//! Turning a styled text into intrinsic runs
//!
//! The text is cut along three independent segmentations, nested in this
//! order: bidi level runs inside each paragraph, script runs inside each
//! level run, and shaping-style runs inside each script run. Every
//! resulting piece is shaped once and becomes one [`IntrinsicRun`].

use std::borrow::Cow;
use std::ops::Range;
use std::sync::Arc;

use typeset_core::{
    error::{Result, ShapingError},
    types::{ShapingOrder, ShapingResult, Tag, WritingDirection},
    Shaper, ShapingParams, Text, TypesetError,
};
use typeset_unicode::{script_direction, Script, ScriptRun, TextAnalysis};

use crate::attributes::{StyleRuns, TextStyle};
use crate::caret::CaretEdgesBuilder;
use crate::intrinsic_run::IntrinsicRun;

/// Yields maximal ranges whose styles shape alike
///
/// Neighbouring style runs that differ only in attributes the shaping
/// engine never sees (color, paragraph settings) are merged.
struct ShapingRunLocator<'a> {
    styles: &'a StyleRuns,
    range: Range<usize>,
}

impl<'a> ShapingRunLocator<'a> {
    fn new(styles: &'a StyleRuns) -> Self {
        Self { styles, range: 0..0 }
    }

    fn reset(&mut self, range: Range<usize>) {
        self.range = range;
    }
}

impl<'a> Iterator for ShapingRunLocator<'a> {
    type Item = (Range<usize>, &'a TextStyle);

    fn next(&mut self) -> Option<Self::Item> {
        if self.range.is_empty() {
            return None;
        }

        let runs = self.styles.runs();
        let start = self.range.start;
        let mut index = self.styles.run_index_at(start);
        let style = &runs[index].style;
        let mut end = runs[index].range.end.min(self.range.end);
        index += 1;
        while end < self.range.end && index < runs.len() && runs[index].style.shapes_like(style) {
            end = runs[index].range.end.min(self.range.end);
            index += 1;
        }

        self.range.start = end;
        Some((start..end, style))
    }
}

/// Builds the intrinsic runs of a text
pub struct ShapeResolver<'a> {
    text: &'a Text,
    analysis: &'a TextAnalysis,
    styles: &'a StyleRuns,
    shaper: &'a dyn Shaper,
    language: Option<String>,
    features: Vec<(Tag, u32)>,
}

impl<'a> ShapeResolver<'a> {
    pub fn new(
        text: &'a Text,
        analysis: &'a TextAnalysis,
        styles: &'a StyleRuns,
        shaper: &'a dyn Shaper,
    ) -> Self {
        Self {
            text,
            analysis,
            styles,
            shaper,
            language: None,
            features: Vec::new(),
        }
    }

    /// BCP 47 language passed to the shaping engine
    pub fn language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    /// OpenType features passed to the shaping engine
    pub fn features(mut self, features: Vec<(Tag, u32)>) -> Self {
        self.features = features;
        self
    }

    /// Shape the whole text
    ///
    /// The runs are sorted by start offset and tile the text exactly.
    pub fn make_runs(&self) -> Result<Vec<Arc<IntrinsicRun>>> {
        let mut runs = Vec::new();
        let mut locator = ShapingRunLocator::new(self.styles);

        for paragraph in self.analysis.bidi.paragraphs() {
            for bidi_run in self.analysis.bidi.logical_runs(paragraph.code_unit_range.clone()) {
                for script_run in self.analysis.scripts.runs(bidi_run.code_unit_range.clone()) {
                    locator.reset(script_run.code_unit_range.clone());
                    for (range, style) in &mut locator {
                        let run = self.shape_run(range, bidi_run.embedding_level, &script_run, style)?;
                        runs.push(Arc::new(run));
                    }
                }
            }
        }

        log::debug!(
            "{}: shaped {} code units into {} intrinsic run(s)",
            self.shaper.name(),
            self.text.len(),
            runs.len()
        );
        Ok(runs)
    }

    fn shape_run(
        &self,
        range: Range<usize>,
        bidi_level: u8,
        script_run: &ScriptRun,
        style: &TextStyle,
    ) -> Result<IntrinsicRun> {
        let typeface = style.typeface.clone().ok_or(TypesetError::MissingTypeface {
            start: range.start,
            end: range.end,
        })?;
        if !(style.type_size.is_finite() && style.type_size > 0.0) {
            return Err(TypesetError::InvalidTypeSize {
                size: style.type_size,
                start: range.start,
                end: range.end,
            });
        }

        let bidi_direction = WritingDirection::from_level(bidi_level);
        let writing_direction = match script_run.script {
            Script::Common | Script::Inherited | Script::Unknown => bidi_direction,
            script => script_direction(script),
        };
        let order = if writing_direction == bidi_direction {
            ShapingOrder::Forward
        } else {
            ShapingOrder::Backward
        };

        let params = ShapingParams {
            size: style.type_size,
            script: script_run.tag,
            language: self.language.clone(),
            direction: writing_direction,
            order,
            features: self.features.clone(),
        };

        // An engine shaping left to right does not mirror on its own.
        let text = if bidi_level & 1 == 1 && !writing_direction.is_rtl() {
            self.mirrored_text(range.clone())
        } else {
            Cow::Borrowed(self.text)
        };

        log::trace!(
            "Shaping {}..{} script={} level={} direction={:?} order={:?}",
            range.start,
            range.end,
            script_run.tag,
            bidi_level,
            writing_direction,
            order
        );

        let shaped = self
            .shaper
            .shape(&text, range.clone(), typeface.as_ref(), &params)?;
        validate(&shaped, range.len())?;

        let ShapingResult {
            glyph_ids,
            glyph_offsets,
            glyph_advances,
            cluster_map,
            is_backward,
        } = shaped;

        let glyph_advances: Vec<f32> = glyph_advances
            .into_iter()
            .map(|advance| advance * style.scale_x)
            .collect();
        let glyph_offsets = glyph_offsets
            .into_iter()
            .map(|mut offset| {
                offset.x *= style.scale_x;
                offset.y = offset.y * style.scale_y + style.baseline_offset;
                offset
            })
            .collect();

        let caret_stops = self.analysis.breaks.caret_stops(range.clone());
        let caret_stops = if caret_stops.iter().all(|&stop| stop) {
            None
        } else {
            Some(caret_stops)
        };
        let caret_edges = CaretEdgesBuilder::new(&cluster_map, &glyph_advances, is_backward)
            .caret_stops(caret_stops.as_deref())
            .build();

        let metric_scale = style.type_size / typeface.units_per_em() as f32 * style.scale_y;

        Ok(IntrinsicRun {
            code_unit_range: range,
            is_backward,
            bidi_level,
            writing_direction,
            script: script_run.tag,
            type_size: style.type_size,
            scale_x: style.scale_x,
            scale_y: style.scale_y,
            obliqueness: style.obliqueness,
            ascent: typeface.ascent() * metric_scale,
            descent: typeface.descent() * metric_scale,
            leading: typeface.leading() * metric_scale,
            typeface,
            glyph_ids,
            glyph_offsets,
            glyph_advances,
            cluster_map,
            caret_stops,
            caret_edges,
        })
    }

    /// The text with mirrored characters substituted inside `range`
    fn mirrored_text(&self, range: Range<usize>) -> Cow<'a, Text> {
        let pairs = self.analysis.bidi.mirroring_pairs(self.text, range);
        if pairs.is_empty() {
            return Cow::Borrowed(self.text);
        }

        let mut pairs = pairs.into_iter().peekable();
        let mut string = String::with_capacity(self.text.as_str().len());
        for (unit, ch) in self.text.chars(0..self.text.len()) {
            match pairs.peek() {
                Some(pair) if pair.code_unit_index == unit => {
                    string.push(pair.mirror);
                    pairs.next();
                }
                _ => string.push(ch),
            }
        }
        Cow::Owned(Text::new(string))
    }
}

/// Reject shaping output that does not fit the run it was asked for
fn validate(shaped: &ShapingResult, code_unit_count: usize) -> Result<()> {
    if shaped.cluster_map.len() != code_unit_count {
        return Err(ShapingError::ClusterMapMismatch {
            expected: code_unit_count,
            actual: shaped.cluster_map.len(),
        }
        .into());
    }

    let glyph_count = shaped.glyph_ids.len();
    if shaped.glyph_offsets.len() != glyph_count || shaped.glyph_advances.len() != glyph_count {
        return Err(ShapingError::GlyphArrayMismatch {
            ids: glyph_count,
            offsets: shaped.glyph_offsets.len(),
            advances: shaped.glyph_advances.len(),
        }
        .into());
    }

    if let Some(&glyph) = shaped
        .cluster_map
        .iter()
        .find(|&&glyph| glyph >= glyph_count && !(glyph == 0 && glyph_count == 0))
    {
        return Err(ShapingError::BackendError(format!(
            "cluster map points at glyph {glyph} of {glyph_count}"
        ))
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttributeSpan, TextAttribute};
    use crate::test_support::{mock_typeface, MockShaper};
    use typeset_core::types::Color;
    use typeset_shape_none::NoneShaper;
    use typeset_unicode::BaseDirection;

    fn shape(text: &str, spans: &[AttributeSpan]) -> Result<Vec<Arc<IntrinsicRun>>> {
        shape_with(&NoneShaper::new(), text, spans)
    }

    fn shape_with(
        shaper: &dyn Shaper,
        text: &str,
        spans: &[AttributeSpan],
    ) -> Result<Vec<Arc<IntrinsicRun>>> {
        let text = Text::new(text);
        let analysis = TextAnalysis::new(&text, BaseDirection::Auto);
        let style = TextStyle::new(mock_typeface(), 20.0);
        let styles = StyleRuns::resolve(text.len(), &style, spans);
        ShapeResolver::new(&text, &analysis, &styles, shaper).make_runs()
    }

    #[test]
    fn test_single_run() {
        let runs = shape("Hello", &[]).unwrap();
        assert_eq!(runs.len(), 1);
        let run = &runs[0];
        assert_eq!(run.code_unit_range, 0..5);
        assert_eq!(run.glyph_count(), 5);
        assert_eq!(run.width(), 50.0);
        assert_eq!(run.ascent, 16.0);
        assert_eq!(run.descent, 4.0);
        assert_eq!(run.caret_edges, vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
        assert!(run.caret_stops.is_none());
    }

    #[test]
    fn test_empty_text_has_no_runs() {
        assert!(shape("", &[]).unwrap().is_empty());
    }

    #[test]
    fn test_color_does_not_split_runs() {
        let spans = [AttributeSpan::new(
            1..3,
            TextAttribute::ForegroundColor(Color::white()),
        )];
        assert_eq!(shape("Hello", &spans).unwrap().len(), 1);
    }

    #[test]
    fn test_size_splits_runs() {
        let spans = [AttributeSpan::new(2..5, TextAttribute::TypeSize(40.0))];
        let runs = shape("Hello", &spans).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].code_unit_range, 0..2);
        assert_eq!(runs[1].code_unit_range, 2..5);
        assert_eq!(runs[1].width(), 60.0);
    }

    #[test]
    fn test_scale_and_baseline_offset() {
        let spans = [
            AttributeSpan::new(0..2, TextAttribute::ScaleX(2.0)),
            AttributeSpan::new(0..2, TextAttribute::BaselineOffset(3.0)),
        ];
        let runs = shape("ab", &spans).unwrap();
        assert_eq!(runs[0].glyph_advances, vec![20.0, 20.0]);
        assert_eq!(runs[0].glyph_offsets[0].y, 3.0);
    }

    #[test]
    fn test_mixed_bidi_runs() {
        let runs = shape("abc שלום xyz", &[]).unwrap();
        let ranges: Vec<Range<usize>> = runs.iter().map(|r| r.code_unit_range.clone()).collect();
        // The space after the Hebrew word keeps the Hebrew script but sits
        // at the paragraph level.
        assert_eq!(ranges, vec![0..4, 4..8, 8..9, 9..12]);
        assert!(!runs[0].is_backward);
        assert!(!runs[2].is_backward);
        assert_eq!(runs[2].bidi_level, 0);
        assert!(runs[1].is_backward);
        assert_eq!(runs[1].bidi_level, 1);
        assert_eq!(runs[1].writing_direction, WritingDirection::RightToLeft);
        // Glyphs of the Hebrew run are in visual order
        assert_eq!(runs[1].glyph_ids[0], 'ם' as u32);
        assert_eq!(runs[1].caret_edges[0], 40.0);
        assert_eq!(runs[1].caret_edges[4], 0.0);
    }

    #[test]
    fn test_grapheme_caret_stops() {
        let runs = shape("e\u{301}x", &[]).unwrap();
        assert_eq!(runs[0].caret_stops, Some(vec![true, false, true]));
    }

    #[test]
    fn test_missing_typeface_is_an_error() {
        let text = Text::new("abc");
        let analysis = TextAnalysis::new(&text, BaseDirection::Auto);
        let styles = StyleRuns::resolve(text.len(), &TextStyle::default(), &[]);
        let shaper = NoneShaper::new();
        let result = ShapeResolver::new(&text, &analysis, &styles, &shaper).make_runs();
        assert!(matches!(
            result,
            Err(TypesetError::MissingTypeface { start: 0, end: 3 })
        ));
    }

    #[test]
    fn test_invalid_size_is_an_error() {
        let spans = [AttributeSpan::new(1..2, TextAttribute::TypeSize(0.0))];
        assert!(matches!(
            shape("abc", &spans),
            Err(TypesetError::InvalidTypeSize { start: 1, end: 2, .. })
        ));
    }

    #[test]
    fn test_malformed_cluster_map_is_rejected() {
        let result = shape_with(&MockShaper::short_cluster_map(), "abc", &[]);
        assert!(matches!(
            result,
            Err(TypesetError::ShapingFailed(ShapingError::ClusterMapMismatch {
                expected: 3,
                actual: 2
            }))
        ));
    }

    #[test]
    fn test_locator_merges_shaping_equivalent_styles() {
        let spans = [
            AttributeSpan::new(0..2, TextAttribute::ForegroundColor(Color::white())),
            AttributeSpan::new(4..6, TextAttribute::TypeSize(30.0)),
        ];
        let style = TextStyle::new(mock_typeface(), 20.0);
        let styles = StyleRuns::resolve(6, &style, &spans);
        let mut locator = ShapingRunLocator::new(&styles);
        locator.reset(1..6);
        let ranges: Vec<Range<usize>> = locator.map(|(range, _)| range).collect();
        assert_eq!(ranges, vec![1..4, 4..6]);
    }
}
