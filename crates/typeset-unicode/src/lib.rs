// this_file: crates/typeset-unicode/src/lib.rs

//! Unicode analysis for the layout core.
//!
//! Everything here speaks UTF-16 code units, the unit all layout ranges
//! are expressed in. The classifiers read the text once at construction
//! and answer range queries afterwards.

pub mod bidi;
pub mod breaks;
pub mod mirror;
pub mod script;

pub use bidi::{BaseDirection, BidiClassifier, BidiParagraph, BidiRun, MirroringPair};
pub use breaks::{BreakClassifier, LineBreak};
pub use icu_properties::props::Script;
pub use mirror::mirrored;
pub use script::{script_direction, script_tag, ScriptClassifier, ScriptRun};

use typeset_core::Text;

/// The three classifiers a layout needs, resolved together.
#[derive(Debug, Clone)]
pub struct TextAnalysis {
    pub bidi: BidiClassifier,
    pub scripts: ScriptClassifier,
    pub breaks: BreakClassifier,
}

impl TextAnalysis {
    pub fn new(text: &Text, base: BaseDirection) -> Self {
        log::debug!(
            "Analyzing {} code units with base direction {:?}",
            text.len(),
            base
        );
        Self {
            bidi: BidiClassifier::new(text, base),
            scripts: ScriptClassifier::new(text),
            breaks: BreakClassifier::new(text),
        }
    }
}


#[cfg(test)]
mod proptests;
