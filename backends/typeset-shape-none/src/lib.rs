//! None Shaper - One glyph per character, advances straight from the typeface
//!
//! This is the most basic shaper: no ligatures, no kerning, no marks. It
//! still honours the contract every shaper must keep, so the layout core
//! can run on top of it without a shaping engine. Right-to-left runs come
//! out in visual order with mirrored brackets, just as a real engine would
//! produce them.

use std::ops::Range;

use typeset_core::{
    error::Result,
    traits::{Shaper, Typeface},
    types::{PositionedGlyph, ShapingResult},
    ShapingParams, Text,
};
use typeset_unicode::mirrored;

/// A minimal shaper that maps each character to its nominal glyph
pub struct NoneShaper;

impl NoneShaper {
    /// Create a new NoneShaper
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoneShaper {
    fn default() -> Self {
        Self::new()
    }
}

/// Nominal glyphs for `range`, one per character, in logical order
///
/// Cluster values are relative to `range.start`. Shapers that cannot use
/// the font data fall back to this.
pub fn nominal_glyphs(
    text: &Text,
    range: Range<usize>,
    typeface: &dyn Typeface,
    params: &ShapingParams,
) -> Vec<PositionedGlyph> {
    let scale = params.size / typeface.units_per_em() as f32;
    let mirror = params.direction.is_rtl();

    text.chars(range.clone())
        .map(|(unit, ch)| {
            let ch = if mirror { mirrored(ch).unwrap_or(ch) } else { ch };
            // Use .notdef (0) if not found
            let id = typeface.glyph_id(ch).unwrap_or(0);
            PositionedGlyph {
                id,
                x: 0.0,
                y: 0.0,
                advance: typeface.advance_width(id) * scale,
                cluster: unit - range.start,
            }
        })
        .collect()
}

impl Shaper for NoneShaper {
    fn name(&self) -> &'static str {
        "none"
    }

    fn shape(
        &self,
        text: &Text,
        range: Range<usize>,
        typeface: &dyn Typeface,
        params: &ShapingParams,
    ) -> Result<ShapingResult> {
        log::debug!(
            "NoneShaper: Shaping code units {}..{}",
            range.start,
            range.end
        );

        let mut glyphs = nominal_glyphs(text, range.clone(), typeface, params);
        if params.is_backward() {
            glyphs.reverse();
        }

        Ok(ShapingResult::from_glyphs(
            glyphs,
            range.len(),
            params.is_backward(),
        ))
    }
}
