//! Typeset - text layout from styled strings to positioned glyph runs
//!
//! Typeset composes Unicode text into lines and frames:
//! 1. Unicode analysis (bidi paragraphs and levels, scripts, break opportunities)
//! 2. Shaping of homogeneous runs into glyphs
//! 3. Line breaking, justification and truncation
//! 4. Frame filling with alignment and spacing
//! 5. Hit testing, selection and drawing through a pluggable renderer
//!
//! # Example
//!
//! ```ignore
//! use typeset::prelude::*;
//!
//! let typesetter = Typesetter::new(default_shaper(), "Hello World", TextStyle::new(typeface, 16.0))?;
//! let frame = typesetter
//!     .frame_resolver()
//!     .frame_bounds(Rect::new(0.0, 0.0, 240.0, 120.0))
//!     .max_lines(2)
//!     .truncation_place(TruncationPlace::End)
//!     .make_frame(0..typesetter.text().len());
//! ```
//!
//! # Feature Flags
//!
//! - `shaping-none`: One glyph per character, no font data needed (default)
//! - `shaping-hr`: OpenType shaping through harfrust
//! - `render-json`: Renderer that records draw calls as JSON
//! - `full`: All of the above

pub use typeset_core::{cache_config, error, traits, types, PatternCache, Shaper, Text, Typeface};
pub use typeset_layout as layout;
pub use typeset_unicode as unicode;

#[cfg(feature = "render-json")]
pub use typeset_render_json as render_json;

#[cfg(feature = "shaping-hr")]
pub use typeset_shape_hr as shape_hr;

#[cfg(feature = "shaping-none")]
pub use typeset_shape_none as shape_none;

/// The most capable shaper compiled in
///
/// Prefers OpenType shaping when `shaping-hr` is enabled, falling back to
/// one glyph per character.
#[cfg(any(feature = "shaping-hr", feature = "shaping-none"))]
pub fn default_shaper() -> std::sync::Arc<dyn Shaper> {
    use std::sync::Arc;

    #[cfg(feature = "shaping-hr")]
    let shaper: Arc<dyn Shaper> = Arc::new(typeset_shape_hr::HarfrustShaper::new());
    #[cfg(not(feature = "shaping-hr"))]
    let shaper: Arc<dyn Shaper> = Arc::new(typeset_shape_none::NoneShaper::new());

    log::debug!("Default shaper: {}", shaper.name());
    shaper
}

/// Common imports for typical usage
pub mod prelude {
    #[cfg(any(feature = "shaping-hr", feature = "shaping-none"))]
    pub use crate::default_shaper;
    pub use typeset_core::{
        error::{Result, TypesetError},
        traits::{Renderer, Shaper, Typeface},
        types::{Color, Point, Rect},
        Text,
    };
    pub use typeset_layout::{
        AttributeSpan, BreakMode, ComposedFrame, ComposedLine, FrameResolver, GlyphRun,
        ParagraphStyle, TextAlignment, TextAttribute, TextStyle, TruncationPlace, Typesetter,
        TypesetterOptions, VerticalAlignment,
    };
    pub use typeset_unicode::BaseDirection;
}
