//! The contracts that bind the layout core to its collaborators
//!
//! Three traits, each one a seam where an external component plugs in.
//!
//! ## The Players
//!
//! - [`Typeface`] - Font metrics, glyph lookup and the shaping-pattern cache slot
//! - [`Shaper`] - Where characters become glyphs
//! - [`Renderer`] - Where glyph runs get drawn

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::{
    error::Result,
    pattern_cache::PatternCache,
    types::{Color, GlyphId, Point, Rect, ShapingResult},
    ShapingParams, Text,
};

/// Your key to unlocking font secrets
///
/// The layout core never parses font files. Whoever owns the font data
/// implements this trait and hands it over behind an `Arc`.
///
/// ```ignore
/// struct MyTypeface {
///     data: Vec<u8>,
///     patterns: PatternCache,
/// }
///
/// impl Typeface for MyTypeface {
///     fn data(&self) -> &[u8] {
///         &self.data
///     }
///
///     fn units_per_em(&self) -> u16 {
///         2048
///     }
///
///     fn ascent(&self) -> f32 {
///         1900.0
///     }
///
///     fn descent(&self) -> f32 {
///         500.0
///     }
///
///     fn glyph_id(&self, ch: char) -> Option<GlyphId> {
///         Some(42)
///     }
///
///     fn advance_width(&self, glyph_id: GlyphId) -> f32 {
///         1200.0
///     }
///
///     fn pattern_cache(&self) -> &PatternCache {
///         &self.patterns
///     }
/// }
/// ```
pub trait Typeface: Send + Sync {
    /// Raw font bytes as they live in the file (may be empty)
    fn data(&self) -> &[u8];

    /// The font's internal coordinate system scale
    fn units_per_em(&self) -> u16;

    /// Distance from baseline to the top of the line, in font units
    fn ascent(&self) -> f32;

    /// Distance from baseline to the bottom of the line, in font units (positive)
    fn descent(&self) -> f32;

    /// Extra gap between lines, in font units
    fn leading(&self) -> f32 {
        0.0
    }

    /// Find the glyph that represents this character
    fn glyph_id(&self, ch: char) -> Option<GlyphId>;

    /// How wide this glyph stands in font units
    fn advance_width(&self, glyph_id: GlyphId) -> f32;

    /// Ink bounds of a glyph in font units (y grows upward), when known
    fn glyph_bounds(&self, _glyph_id: GlyphId) -> Option<Rect> {
        None
    }

    /// Shaping patterns memoized for this typeface
    fn pattern_cache(&self) -> &PatternCache;
}

impl fmt::Debug for dyn Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typeface")
            .field("units_per_em", &self.units_per_em())
            .field("ascent", &self.ascent())
            .field("descent", &self.descent())
            .finish_non_exhaustive()
    }
}

/// Whether two handles point at the same typeface instance
pub fn same_typeface(a: &Arc<dyn Typeface>, b: &Arc<dyn Typeface>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Where characters learn their positions
///
/// A shaper receives one run that is homogeneous in script, typeface,
/// size and direction. It returns glyphs in visual order together with a
/// cluster map covering every code unit of `range`.
pub trait Shaper: Send + Sync {
    /// Identify yourself in logs and error messages
    fn name(&self) -> &'static str;

    /// Transform the code units in `range` into positioned glyphs
    ///
    /// Offsets and advances are in layout units for `params.size`; the
    /// caller applies style scaling afterwards.
    fn shape(
        &self,
        text: &Text,
        range: Range<usize>,
        typeface: &dyn Typeface,
        params: &ShapingParams,
    ) -> Result<ShapingResult>;
}

/// Everything a renderer needs to paint one glyph run
pub struct GlyphPaint<'a> {
    pub typeface: &'a dyn Typeface,
    pub type_size: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub obliqueness: f32,
    pub color: Color,
    pub glyph_ids: &'a [GlyphId],
    pub glyph_offsets: &'a [Point],
    pub glyph_advances: &'a [f32],
    /// Pen position of the first glyph, on the baseline
    pub origin: Point,
    /// Visible area when the run shows only part of its edge clusters
    pub clip: Option<Rect>,
}

/// Where glyph runs become visible
///
/// The layout core never rasterizes. It tells a renderer which glyphs go
/// where and asks it how much ink they cover.
pub trait Renderer {
    /// Your renderer's signature
    fn name(&self) -> &'static str;

    /// Paint the glyphs described by `paint`
    fn draw_glyphs(&mut self, paint: &GlyphPaint<'_>) -> Result<()>;

    /// Bounding box of the glyphs when drawn at `paint.origin`
    fn compute_bounding_box(&self, paint: &GlyphPaint<'_>) -> Rect;
}
