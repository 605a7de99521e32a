//! Typeset Core: the vocabulary every layout stage speaks
//!
//! Text enters as a Unicode string, leaves as positioned glyph runs. The
//! layout core in `typeset-layout` does the heavy lifting; this crate holds
//! the pieces that every other crate needs to agree on.
//!
//! ## What Lives Here
//!
//! - [`Text`] - A string addressed by UTF-16 code units
//! - [`Typeface`] - Your window into font metrics and glyph lookup
//! - [`Shaper`] - Where characters become glyphs
//! - [`Renderer`] - Where glyph runs get drawn
//! - [`PatternCache`] - Memoized shaping patterns owned by a typeface
//!
//! Shaping requests and results travel in [`ShapingParams`] and
//! [`types::ShapingResult`].
//!
//! ## Plug In a Shaper
//!
//! ```rust
//! use typeset_core::{
//!     error::Result,
//!     traits::{Shaper, Typeface},
//!     types::{PositionedGlyph, ShapingResult},
//!     ShapingParams, Text,
//! };
//! use std::ops::Range;
//!
//! struct OneGlyphPerUnit;
//!
//! impl Shaper for OneGlyphPerUnit {
//!     fn name(&self) -> &'static str {
//!         "one-per-unit"
//!     }
//!
//!     fn shape(
//!         &self,
//!         _text: &Text,
//!         range: Range<usize>,
//!         _typeface: &dyn Typeface,
//!         params: &ShapingParams,
//!     ) -> Result<ShapingResult> {
//!         let glyphs = (0..range.len())
//!             .map(|cluster| PositionedGlyph {
//!                 id: 1,
//!                 x: 0.0,
//!                 y: 0.0,
//!                 advance: params.size / 2.0,
//!                 cluster,
//!             })
//!             .collect();
//!         Ok(ShapingResult::from_glyphs(glyphs, range.len(), false))
//!     }
//! }
//! ```

pub mod cache_config;
pub mod error;
pub mod pattern_cache;
pub mod text;
pub mod traits;

pub use error::{Result, TypesetError};
pub use pattern_cache::{PatternCache, PatternKey};
pub use text::Text;
pub use traits::{GlyphPaint, Renderer, Shaper, Typeface};

/// The data structures that travel between stages
pub mod types {
    use std::fmt;
    use std::str::FromStr;

    /// Unique identifier for a glyph within a typeface
    pub type GlyphId = u32;

    /// Which way a script reads
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum WritingDirection {
        LeftToRight,
        RightToLeft,
    }

    impl WritingDirection {
        /// Direction implied by a bidi embedding level
        pub fn from_level(level: u8) -> Self {
            if level & 1 == 1 {
                Self::RightToLeft
            } else {
                Self::LeftToRight
            }
        }

        pub fn is_rtl(self) -> bool {
            self == Self::RightToLeft
        }
    }

    /// Order in which a shaping engine consumes the code units of a run
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum ShapingOrder {
        Forward,
        Backward,
    }

    /// Four-byte OpenType tag (script, language system or feature)
    #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Tag(pub [u8; 4]);

    impl Tag {
        pub const fn new(bytes: &[u8; 4]) -> Self {
            Self(*bytes)
        }

        pub fn as_bytes(&self) -> &[u8; 4] {
            &self.0
        }
    }

    impl FromStr for Tag {
        type Err = String;

        fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
            let bytes = s.as_bytes();
            if bytes.len() == 4 && bytes.iter().all(u8::is_ascii) {
                Ok(Self([bytes[0], bytes[1], bytes[2], bytes[3]]))
            } else {
                Err(format!("tag must be four ASCII bytes: {s:?}"))
            }
        }
    }

    impl fmt::Display for Tag {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            for &b in &self.0 {
                write!(f, "{}", b as char)?;
            }
            Ok(())
        }
    }

    impl fmt::Debug for Tag {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Tag({self})")
        }
    }

    /// A position in layout space (y grows downward)
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct Point {
        pub x: f32,
        pub y: f32,
    }

    impl Point {
        pub const fn new(x: f32, y: f32) -> Self {
            Self { x, y }
        }

        pub const fn zero() -> Self {
            Self::new(0.0, 0.0)
        }
    }

    /// An axis-aligned rectangle in layout space
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct Rect {
        pub x: f32,
        pub y: f32,
        pub width: f32,
        pub height: f32,
    }

    impl Rect {
        pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
            Self {
                x,
                y,
                width,
                height,
            }
        }

        pub fn min_x(&self) -> f32 {
            self.x
        }

        pub fn max_x(&self) -> f32 {
            self.x + self.width
        }

        pub fn min_y(&self) -> f32 {
            self.y
        }

        pub fn max_y(&self) -> f32 {
            self.y + self.height
        }

        pub fn is_empty(&self) -> bool {
            !(self.width > 0.0 && self.height > 0.0)
        }

        pub fn offset(&self, dx: f32, dy: f32) -> Self {
            Self::new(self.x + dx, self.y + dy, self.width, self.height)
        }

        /// Smallest rectangle containing both; empty rectangles are ignored
        pub fn union(&self, other: &Rect) -> Self {
            if self.is_empty() {
                return *other;
            }
            if other.is_empty() {
                return *self;
            }
            let x = self.min_x().min(other.min_x());
            let y = self.min_y().min(other.min_y());
            let max_x = self.max_x().max(other.max_x());
            let max_y = self.max_y().max(other.max_y());
            Self::new(x, y, max_x - x, max_y - y)
        }
    }

    /// Simple RGBA color that works everywhere
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Color {
        pub r: u8,
        pub g: u8,
        pub b: u8,
        pub a: u8,
    }

    impl Color {
        pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
            Self { r, g, b, a }
        }

        pub const fn black() -> Self {
            Self::rgba(0, 0, 0, 255)
        }

        pub const fn white() -> Self {
            Self::rgba(255, 255, 255, 255)
        }
    }

    impl Default for Color {
        fn default() -> Self {
            Self::black()
        }
    }

    /// A glyph as a shaping engine emits it
    ///
    /// `x`/`y` are offsets from the pen position, `cluster` is the code unit
    /// offset (relative to the shaped range) of the cluster the glyph belongs to.
    #[derive(Debug, Clone, PartialEq)]
    pub struct PositionedGlyph {
        pub id: GlyphId,
        pub x: f32,
        pub y: f32,
        pub advance: f32,
        pub cluster: usize,
    }

    /// What emerges after shaping one homogeneous run
    ///
    /// Glyphs are stored in visual (left-to-right) order. `cluster_map` has one
    /// entry per code unit of the shaped range and holds the smallest glyph
    /// index of the cluster that code unit belongs to. When `is_backward` is set
    /// the glyphs of later clusters sit at lower indices.
    #[derive(Debug, Clone, Default)]
    pub struct ShapingResult {
        pub glyph_ids: Vec<GlyphId>,
        pub glyph_offsets: Vec<Point>,
        pub glyph_advances: Vec<f32>,
        pub cluster_map: Vec<usize>,
        pub is_backward: bool,
    }

    impl ShapingResult {
        /// Assemble a result from glyphs carrying cluster offsets
        ///
        /// Code units that start no cluster of their own inherit the cluster
        /// that precedes them.
        pub fn from_glyphs(
            glyphs: Vec<PositionedGlyph>,
            code_unit_count: usize,
            is_backward: bool,
        ) -> Self {
            // Smallest glyph index for every cluster start, sorted by cluster.
            let mut starts: Vec<(usize, usize)> = Vec::with_capacity(glyphs.len());
            for (index, glyph) in glyphs.iter().enumerate() {
                let cluster = glyph.cluster.min(code_unit_count.saturating_sub(1));
                starts.push((cluster, index));
            }
            starts.sort_unstable();
            starts.dedup_by_key(|entry| entry.0);

            let mut cluster_map = Vec::with_capacity(code_unit_count);
            let mut cursor = 0;
            for unit in 0..code_unit_count {
                while cursor + 1 < starts.len() && starts[cursor + 1].0 <= unit {
                    cursor += 1;
                }
                cluster_map.push(starts.get(cursor).map_or(0, |entry| entry.1));
            }

            let mut glyph_ids = Vec::with_capacity(glyphs.len());
            let mut glyph_offsets = Vec::with_capacity(glyphs.len());
            let mut glyph_advances = Vec::with_capacity(glyphs.len());
            for glyph in glyphs {
                glyph_ids.push(glyph.id);
                glyph_offsets.push(Point::new(glyph.x, glyph.y));
                glyph_advances.push(glyph.advance);
            }

            Self {
                glyph_ids,
                glyph_offsets,
                glyph_advances,
                cluster_map,
                is_backward,
            }
        }

        pub fn glyph_count(&self) -> usize {
            self.glyph_ids.len()
        }

        /// Sum of all glyph advances
        pub fn advance_width(&self) -> f32 {
            self.glyph_advances.iter().sum()
        }
    }
}

/// How shaping should behave for one run
#[derive(Debug, Clone)]
pub struct ShapingParams {
    pub size: f32,
    pub script: types::Tag,
    pub language: Option<String>,
    pub direction: types::WritingDirection,
    pub order: types::ShapingOrder,
    pub features: Vec<(types::Tag, u32)>,
}

impl Default for ShapingParams {
    fn default() -> Self {
        Self {
            size: 16.0,
            script: types::Tag::new(b"Zyyy"),
            language: None,
            direction: types::WritingDirection::LeftToRight,
            order: types::ShapingOrder::Forward,
            features: Vec::new(),
        }
    }
}

impl ShapingParams {
    /// Whether glyphs come out in reverse logical order
    pub fn is_backward(&self) -> bool {
        self.direction.is_rtl() != (self.order == types::ShapingOrder::Backward)
    }
}
