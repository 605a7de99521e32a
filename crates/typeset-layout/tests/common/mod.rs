//! Shared fixtures for the layout integration tests

#![allow(dead_code)]

use std::sync::Arc;

use typeset_core::{types::GlyphId, PatternCache, Typeface};
use typeset_layout::{AttributeSpan, TextStyle, Typesetter, TypesetterOptions};
use typeset_shape_none::NoneShaper;

/// Every glyph is half an em wide: 10 units at size 20
#[derive(Default)]
pub struct MockTypeface {
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

pub fn style() -> TextStyle {
    TextStyle::new(Arc::new(MockTypeface::default()), 20.0)
}

pub fn typesetter(text: &str) -> Typesetter {
    typesetter_with(text, &[], TypesetterOptions::default())
}

pub fn typesetter_with(text: &str, spans: &[AttributeSpan], options: TypesetterOptions) -> Typesetter {
    let _ = env_logger::builder().is_test(true).try_init();
    Typesetter::with_attributes(Arc::new(NoneShaper::new()), text, style(), spans, options)
        .expect("Typesetting should succeed")
}
