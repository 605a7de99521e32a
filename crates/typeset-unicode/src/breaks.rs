// this_file: crates/typeset-unicode/src/breaks.rs

//! Line break opportunities (UAX #14) and grapheme cluster boundaries
//! (UAX #29), both indexed by UTF-16 code unit.

use std::ops::Range;

use icu_segmenter::GraphemeClusterSegmenter;
use typeset_core::Text;
use unicode_linebreak::{linebreaks, BreakOpportunity};

/// Kind of line break allowed before a code unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineBreak {
    #[default]
    Prohibited,
    Allowed,
    Mandatory,
}

/// Break data for a whole text.
///
/// Both tables have one entry per code unit boundary, so index `i` talks
/// about the position just before code unit `i` and index `len` about the
/// end of the text.
#[derive(Debug, Clone)]
pub struct BreakClassifier {
    line_breaks: Vec<LineBreak>,
    grapheme_boundaries: Vec<bool>,
}

impl BreakClassifier {
    pub fn new(text: &Text) -> Self {
        let len = text.len();
        let mut line_breaks = vec![LineBreak::Prohibited; len + 1];
        let mut grapheme_boundaries = vec![false; len + 1];
        grapheme_boundaries[0] = true;
        grapheme_boundaries[len] = true;

        if len == 0 {
            return Self {
                line_breaks,
                grapheme_boundaries,
            };
        }

        for (byte, opportunity) in linebreaks(text.as_str()) {
            let unit = text.unit_offset(byte);
            line_breaks[unit] = match opportunity {
                BreakOpportunity::Mandatory => LineBreak::Mandatory,
                BreakOpportunity::Allowed => LineBreak::Allowed,
            };
        }

        for byte in GraphemeClusterSegmenter::new().segment_str(text.as_str()) {
            grapheme_boundaries[text.unit_offset(byte)] = true;
        }

        Self {
            line_breaks,
            grapheme_boundaries,
        }
    }

    /// Number of code units covered.
    pub fn len(&self) -> usize {
        self.line_breaks.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Break allowed just before code unit `index`.
    pub fn line_break_at(&self, index: usize) -> LineBreak {
        self.line_breaks[index]
    }

    pub fn is_grapheme_boundary(&self, index: usize) -> bool {
        self.grapheme_boundaries[index]
    }

    /// First grapheme boundary after `index`, or the text length.
    pub fn next_grapheme_boundary(&self, index: usize) -> usize {
        ((index + 1)..=self.len())
            .find(|&i| self.grapheme_boundaries[i])
            .unwrap_or(self.len())
    }

    /// Last grapheme boundary before `index`, or zero.
    pub fn previous_grapheme_boundary(&self, index: usize) -> usize {
        (0..index)
            .rev()
            .find(|&i| self.grapheme_boundaries[i])
            .unwrap_or(0)
    }

    /// Whether a caret may rest before each code unit of `range`.
    pub fn caret_stops(&self, range: Range<usize>) -> Vec<bool> {
        self.grapheme_boundaries[range].to_vec()
    }
}
