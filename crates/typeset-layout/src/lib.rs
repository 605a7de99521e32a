// this_file: crates/typeset-layout/src/lib.rs

//! Typeset Layout: from styled text to positioned lines
//!
//! The pipeline runs in stages, each one feeding the next:
//!
//! 1. [`ShapeResolver`] cuts the text into runs homogeneous in bidi level,
//!    script and shaping style, and shapes each into an [`IntrinsicRun`]
//! 2. [`BreakResolver`] measures those runs to find where lines end
//! 3. [`LineResolver`] slices the runs into [`GlyphRun`]s and orders them
//!    visually as a [`ComposedLine`]: plain, justified or truncated
//! 4. [`FrameResolver`] stacks lines into a rectangle as a [`ComposedFrame`]
//!
//! [`Typesetter`] owns the shaped text and hands out the resolvers.
//!
//! ```
//! use std::sync::Arc;
//! use typeset_core::{Shaper, Typeface};
//! use typeset_layout::{BreakMode, TextStyle, Typesetter};
//!
//! fn first_line(shaper: Arc<dyn Shaper>, typeface: Arc<dyn Typeface>) -> typeset_core::Result<()> {
//!     let typesetter = Typesetter::new(shaper, "Hello World", TextStyle::new(typeface, 16.0))?;
//!     let end = typesetter.suggest_forward_break(0..11, 60.0, BreakMode::Line);
//!     let line = typesetter.make_simple_line(0..end);
//!     assert!(line.width() > 0.0);
//!     Ok(())
//! }
//! ```
//!
//! All ranges and indices are UTF-16 code units of the typesetter's text.

pub mod attributes;
pub mod break_resolver;
pub mod caret;
pub mod collection;
pub mod composed_frame;
pub mod composed_line;
pub mod frame_resolver;
pub mod glyph_run;
pub mod intrinsic_run;
pub mod line_resolver;
pub mod shape_resolver;
pub mod text_run;
pub mod typesetter;

#[cfg(test)]
mod test_support;

pub use attributes::{AttributeSpan, ParagraphStyle, StyleRun, StyleRuns, TextAlignment, TextAttribute, TextStyle};
pub use break_resolver::{BreakMode, BreakResolver};
pub use caret::CaretEdgesBuilder;
pub use collection::Collection;
pub use composed_frame::ComposedFrame;
pub use composed_line::ComposedLine;
pub use frame_resolver::{FrameResolver, VerticalAlignment};
pub use glyph_run::GlyphRun;
pub use intrinsic_run::IntrinsicRun;
pub use line_resolver::{LineResolver, TruncationPlace};
pub use shape_resolver::ShapeResolver;
pub use text_run::{JustifiedRun, RunSource, TextRun, TokenRun};
pub use typesetter::{Typesetter, TypesetterOptions, DEFAULT_TRUNCATION_TOKEN};
