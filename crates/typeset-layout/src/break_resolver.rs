//! Finding where a line of a given extent ends
//!
//! Forward searches grow a line from the start of a range; backward
//! searches grow it from the end. Widths come from the intrinsic runs'
//! caret edges, so partial clusters measure the same way lines draw them.

use std::ops::Range;
use std::sync::Arc;

use typeset_core::Text;
use typeset_unicode::{LineBreak, TextAnalysis};

use crate::intrinsic_run::{measure_range, IntrinsicRun};

/// Granularity of break opportunities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BreakMode {
    /// Between grapheme clusters
    Character,
    /// At Unicode line break opportunities, falling back to graphemes
    #[default]
    Line,
}

/// Suggests line breaks over the shaped runs of a text
pub struct BreakResolver<'a> {
    text: &'a Text,
    analysis: &'a TextAnalysis,
    runs: &'a [Arc<IntrinsicRun>],
}

impl<'a> BreakResolver<'a> {
    pub fn new(text: &'a Text, analysis: &'a TextAnalysis, runs: &'a [Arc<IntrinsicRun>]) -> Self {
        Self {
            text,
            analysis,
            runs,
        }
    }

    /// End of the longest prefix of `range` that fits `extent`
    ///
    /// At least one grapheme is consumed when `range` is not empty, even if
    /// it alone is wider than `extent`. Trailing whitespace never counts
    /// against the extent and stays on the line.
    pub fn suggest_forward_break(&self, range: Range<usize>, extent: f32, mode: BreakMode) -> usize {
        self.forward_break(range, extent, mode, true)
    }

    /// Start of the longest suffix of `range` that fits `extent`
    ///
    /// Whitespace at the end of `range` does not count against the extent.
    pub fn suggest_backward_break(&self, range: Range<usize>, extent: f32, mode: BreakMode) -> usize {
        self.backward_break(range, extent, mode, true)
    }

    /// `range` cut back to the paragraph containing its start
    fn clamp_forward(&self, range: Range<usize>) -> Range<usize> {
        self.text.check_range(&range);
        match self.analysis.bidi.paragraph_at(range.start) {
            Some(paragraph) => range.start..range.end.min(paragraph.code_unit_range.end),
            None => range.start..range.start,
        }
    }

    /// `range` cut back to the paragraph containing its end
    fn clamp_backward(&self, range: Range<usize>) -> Range<usize> {
        self.text.check_range(&range);
        if range.is_empty() {
            return range;
        }
        match self.analysis.bidi.paragraph_at(range.end - 1) {
            Some(paragraph) => range.start.max(paragraph.code_unit_range.start)..range.end,
            None => range.end..range.end,
        }
    }

    fn measure(&self, range: Range<usize>) -> f32 {
        measure_range(self.runs, range)
    }

    pub(crate) fn forward_break(&self, range: Range<usize>, extent: f32, mode: BreakMode, force: bool) -> usize {
        let range = self.clamp_forward(range);
        if range.is_empty() {
            return range.start;
        }

        match mode {
            BreakMode::Character => self.forward_character_break(range, extent, force),
            BreakMode::Line => {
                let end = self.forward_line_break(range.clone(), extent);
                if end == range.start {
                    self.forward_character_break(range, extent, force)
                } else {
                    end
                }
            }
        }
    }

    pub(crate) fn backward_break(&self, range: Range<usize>, extent: f32, mode: BreakMode, force: bool) -> usize {
        let range = self.clamp_backward(range);
        if range.is_empty() {
            return range.end;
        }

        let limit = self.text.trailing_whitespace_start(range.clone());
        if limit == range.start {
            return range.start;
        }

        match mode {
            BreakMode::Character => self.backward_character_break(range, limit, extent, force),
            BreakMode::Line => {
                let start = self.backward_line_break(range.clone(), limit, extent);
                if start == limit {
                    self.backward_character_break(range, limit, extent, force)
                } else {
                    start
                }
            }
        }
    }

    fn forward_line_break(&self, range: Range<usize>, extent: f32) -> usize {
        let breaks = &self.analysis.breaks;
        let mut end = range.start;
        let mut width = 0.0;
        let mut segment_start = range.start;

        for position in range.start + 1..=range.end {
            let opportunity = breaks.line_break_at(position);
            if position < range.end && opportunity == LineBreak::Prohibited {
                continue;
            }

            let segment_width = self.measure(segment_start..position);
            if width + segment_width <= extent {
                width += segment_width;
                end = position;
            } else {
                // Whitespace ending the segment hangs past the extent.
                let visible_end = self.text.trailing_whitespace_start(segment_start..position);
                if width + self.measure(segment_start..visible_end) <= extent {
                    end = position;
                }
                break;
            }

            if opportunity == LineBreak::Mandatory {
                break;
            }
            segment_start = position;
        }

        end
    }

    fn forward_character_break(&self, range: Range<usize>, extent: f32, force: bool) -> usize {
        let breaks = &self.analysis.breaks;
        let mut end = range.start;
        let mut width = 0.0;
        let mut hanging = false;
        let mut position = range.start;

        while position < range.end {
            let next = breaks.next_grapheme_boundary(position).min(range.end);
            let is_whitespace = self.text.is_whitespace_at(position);

            if hanging {
                if !is_whitespace {
                    break;
                }
                end = next;
            } else {
                let grapheme_width = self.measure(position..next);
                if width + grapheme_width <= extent {
                    width += grapheme_width;
                    end = next;
                } else if is_whitespace {
                    hanging = true;
                    end = next;
                } else {
                    if force && end == range.start {
                        end = next;
                    }
                    break;
                }
            }
            position = next;
        }

        end
    }

    fn backward_line_break(&self, range: Range<usize>, limit: usize, extent: f32) -> usize {
        let breaks = &self.analysis.breaks;
        let mut start = limit;
        let mut width = 0.0;
        let mut segment_end = limit;

        for position in (range.start..limit).rev() {
            let opportunity = breaks.line_break_at(position);
            if position > range.start && opportunity == LineBreak::Prohibited {
                continue;
            }

            let segment_width = self.measure(position..segment_end);
            if width + segment_width > extent {
                break;
            }
            width += segment_width;
            start = position;

            if opportunity == LineBreak::Mandatory {
                break;
            }
            segment_end = position;
        }

        start
    }

    fn backward_character_break(&self, range: Range<usize>, limit: usize, extent: f32, force: bool) -> usize {
        let breaks = &self.analysis.breaks;
        let mut start = limit;
        let mut width = 0.0;
        let mut position = limit;

        while position > range.start {
            let previous = breaks.previous_grapheme_boundary(position).max(range.start);
            let grapheme_width = self.measure(previous..position);
            if width + grapheme_width <= extent {
                width += grapheme_width;
                start = previous;
            } else {
                if force && start == limit {
                    start = previous;
                }
                break;
            }
            position = previous;
        }

        start
    }
}
