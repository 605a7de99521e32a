//! Fixtures shared by the unit tests
//!
//! The mock typeface maps every character to a glyph with its own code
//! point as id. At size 20 every glyph is 10 units wide, ascent is 16 and
//! descent is 4.

use std::ops::Range;
use std::sync::Arc;

use typeset_core::{
    error::Result,
    types::{GlyphId, Point, ShapingResult, Tag, WritingDirection},
    PatternCache, Shaper, ShapingParams, Text, Typeface,
};
use typeset_shape_none::{nominal_glyphs, NoneShaper};

use crate::attributes::{AttributeSpan, TextStyle};
use crate::caret::CaretEdgesBuilder;
use crate::intrinsic_run::IntrinsicRun;
use crate::typesetter::{Typesetter, TypesetterOptions};

#[derive(Default)]
struct MockTypeface {
    patterns: PatternCache,
}

impl Typeface for MockTypeface {
    fn data(&self) -> &[u8] {
        &[]
    }

    fn units_per_em(&self) -> u16 {
        1000
    }

    fn ascent(&self) -> f32 {
        800.0
    }

    fn descent(&self) -> f32 {
        200.0
    }

    fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        Some(ch as GlyphId)
    }

    fn advance_width(&self, _glyph_id: GlyphId) -> f32 {
        500.0
    }

    fn pattern_cache(&self) -> &PatternCache {
        &self.patterns
    }
}

pub(crate) fn mock_typeface() -> Arc<dyn Typeface> {
    Arc::new(MockTypeface::default())
}

/// Shaper whose output breaks the shaping contract
pub(crate) struct MockShaper {
    missing_clusters: usize,
}

impl MockShaper {
    /// Returns one cluster map entry fewer than asked for
    pub(crate) fn short_cluster_map() -> Self {
        Self { missing_clusters: 1 }
    }
}

impl Shaper for MockShaper {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn shape(
        &self,
        text: &Text,
        range: Range<usize>,
        typeface: &dyn Typeface,
        params: &ShapingParams,
    ) -> Result<ShapingResult> {
        let glyphs = nominal_glyphs(text, range.clone(), typeface, params);
        let mut result = ShapingResult::from_glyphs(glyphs, range.len(), false);
        let len = result.cluster_map.len().saturating_sub(self.missing_clusters);
        result.cluster_map.truncate(len);
        Ok(result)
    }
}

/// A run with hand-written glyph data; glyph ids count up from 'a'
pub(crate) fn intrinsic_run(
    range: Range<usize>,
    cluster_map: Vec<usize>,
    glyph_advances: Vec<f32>,
    is_backward: bool,
) -> IntrinsicRun {
    let glyph_count = glyph_advances.len();
    let caret_edges = CaretEdgesBuilder::new(&cluster_map, &glyph_advances, is_backward).build();
    let bidi_level = u8::from(is_backward);

    IntrinsicRun {
        code_unit_range: range,
        is_backward,
        bidi_level,
        writing_direction: WritingDirection::from_level(bidi_level),
        script: Tag::new(b"Zyyy"),
        typeface: mock_typeface(),
        type_size: 20.0,
        scale_x: 1.0,
        scale_y: 1.0,
        obliqueness: 0.0,
        ascent: 16.0,
        descent: 4.0,
        leading: 0.0,
        glyph_ids: (0..glyph_count as GlyphId).map(|i| 'a' as GlyphId + i).collect(),
        glyph_offsets: vec![Point::zero(); glyph_count],
        glyph_advances,
        cluster_map,
        caret_stops: None,
        caret_edges,
    }
}

pub(crate) fn typesetter(text: &str) -> Typesetter {
    typesetter_with(text, &[], TypesetterOptions::default())
}

pub(crate) fn typesetter_with(
    text: &str,
    spans: &[AttributeSpan],
    options: TypesetterOptions,
) -> Typesetter {
    Typesetter::with_attributes(
        Arc::new(NoneShaper::new()),
        text,
        TextStyle::new(mock_typeface(), 20.0),
        spans,
        options,
    )
    .expect("fixture text shapes")
}
