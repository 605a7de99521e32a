//! Composing lines out of intrinsic runs
//!
//! A line is assembled by walking its bidi line runs in visual order and
//! slicing the intrinsic runs they cover. Slices of a left-to-right line
//! run are appended one after the other; slices of a right-to-left line run
//! are all inserted at the same position, so the later ones land in front
//! of the earlier ones. That insertion cursor is all it takes to turn
//! logical iteration order into visual order.

use std::ops::Range;
use std::sync::Arc;

use typeset_core::Text;
use typeset_unicode::{BidiParagraph, TextAnalysis};

use crate::attributes::StyleRuns;
use crate::break_resolver::{BreakMode, BreakResolver};
use crate::caret;
use crate::composed_line::ComposedLine;
use crate::glyph_run::GlyphRun;
use crate::intrinsic_run::{measure_range, run_index_at, IntrinsicRun};
use crate::text_run::{JustifiedRun, RunSource};

/// Where a truncated line drops its text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TruncationPlace {
    /// Keep the end of the text
    Start,
    /// Keep both ends
    Middle,
    /// Keep the start of the text
    #[default]
    End,
}

/// Builds composed lines over the runs of one text
pub struct LineResolver<'a> {
    text: &'a Text,
    analysis: &'a TextAnalysis,
    runs: &'a [Arc<IntrinsicRun>],
    styles: &'a StyleRuns,
}

impl<'a> LineResolver<'a> {
    pub fn new(
        text: &'a Text,
        analysis: &'a TextAnalysis,
        runs: &'a [Arc<IntrinsicRun>],
        styles: &'a StyleRuns,
    ) -> Self {
        Self {
            text,
            analysis,
            runs,
            styles,
        }
    }

    fn paragraph_for(&self, range: &Range<usize>) -> Option<&'a BidiParagraph> {
        self.text.check_range(range);
        if range.is_empty() {
            return None;
        }
        self.analysis.bidi.paragraph_at(range.start)
    }

    /// A line showing exactly `range`
    ///
    /// `range` must not cross a paragraph boundary.
    pub fn make_simple_line(&self, range: Range<usize>) -> ComposedLine {
        let Some(paragraph) = self.paragraph_for(&range) else {
            return ComposedLine::empty(range.start, self.level_near(range.start));
        };

        let runs = self.visual_runs(paragraph, range.clone(), &|index: usize| {
            RunSource::Intrinsic(self.runs[index].clone())
        });
        let line = ComposedLine::new(
            range.clone(),
            paragraph.base_level,
            runs,
            self.trailing_whitespace_extent(range.clone()),
        );

        log::trace!(
            "Composed line {}..{}: {} run(s), width {}",
            range.start,
            range.end,
            line.runs().len(),
            line.width()
        );
        line
    }

    /// A line showing `range` stretched or squeezed toward `extent`
    ///
    /// The difference between `extent` and the visible width, scaled by
    /// `factor`, is spread evenly over the whitespace code units between
    /// the first and last visible characters. Lines without such whitespace
    /// come back unchanged.
    pub fn make_justified_line(&self, range: Range<usize>, factor: f32, extent: f32) -> ComposedLine {
        let line = self.make_simple_line(range.clone());
        let Some(paragraph) = self.paragraph_for(&range) else {
            return line;
        };

        let gap_start = self.text.leading_whitespace_end(range.clone());
        let gap_end = self.text.trailing_whitespace_start(gap_start..range.end);
        let gaps: Vec<usize> = (gap_start..gap_end)
            .filter(|&index| self.text.is_whitespace_at(index))
            .collect();

        let extra = (extent - (line.width() - line.trailing_whitespace_extent())) * factor;
        if gaps.is_empty() || extra == 0.0 || !extra.is_finite() {
            return line;
        }
        let share = extra / gaps.len() as f32;

        let mut touched: Vec<usize> = gaps.iter().map(|&index| run_index_at(self.runs, index)).collect();
        touched.dedup();

        let sources: Vec<(usize, RunSource)> = touched
            .into_iter()
            .map(|run_index| {
                let run = &self.runs[run_index];
                let mut extras = vec![0.0; run.glyph_count()];
                for &index in gaps.iter().filter(|&&i| run.code_unit_range.contains(&i)) {
                    let glyph = caret::trailing_glyph_index(
                        &run.cluster_map,
                        run.glyph_count(),
                        run.is_backward,
                        index - run.code_unit_range.start,
                    );
                    if let Some(slot) = extras.get_mut(glyph) {
                        *slot += share;
                    }
                }
                let justified = JustifiedRun::new(run.clone(), &extras);
                (run_index, RunSource::Justified(Arc::new(justified)))
            })
            .collect();

        let source_for = |index: usize| {
            sources
                .iter()
                .find(|(run_index, _)| *run_index == index)
                .map(|(_, source)| source.clone())
                .unwrap_or_else(|| RunSource::Intrinsic(self.runs[index].clone()))
        };
        let runs = self.visual_runs(paragraph, range.clone(), &source_for);

        log::trace!(
            "Justified line {}..{}: {} added over {} gap(s)",
            range.start,
            range.end,
            extra,
            gaps.len()
        );
        ComposedLine::new(
            range,
            paragraph.base_level,
            runs,
            line.trailing_whitespace_extent(),
        )
    }

    /// A line showing as much of `range` as fits `extent` with `token` in
    /// place of the rest
    ///
    /// Lines that already fit come back unchanged. A token wider than
    /// `extent` is left out so the line never exceeds it. The result reports
    /// the whole of `range` as its code unit range.
    pub fn make_compact_line(
        &self,
        range: Range<usize>,
        extent: f32,
        mode: BreakMode,
        place: TruncationPlace,
        token: &ComposedLine,
    ) -> ComposedLine {
        self.compose_compact_line(range, extent, mode, place, token, false)
    }

    /// Like [`make_compact_line`](Self::make_compact_line) for text that
    /// continues past `range`: the token is shown even when `range` fits
    pub(crate) fn make_elided_line(
        &self,
        range: Range<usize>,
        extent: f32,
        mode: BreakMode,
        place: TruncationPlace,
        token: &ComposedLine,
    ) -> ComposedLine {
        self.compose_compact_line(range, extent, mode, place, token, true)
    }

    fn compose_compact_line(
        &self,
        range: Range<usize>,
        extent: f32,
        mode: BreakMode,
        place: TruncationPlace,
        token: &ComposedLine,
        elided: bool,
    ) -> ComposedLine {
        let line = self.make_simple_line(range.clone());
        let Some(paragraph) = self.paragraph_for(&range) else {
            return line;
        };
        if !elided && line.width() - line.trailing_whitespace_extent() <= extent {
            return line;
        }

        let breaks = BreakResolver::new(self.text, self.analysis, self.runs);
        let token_fits = token.width() <= extent;
        if !token_fits {
            log::debug!(
                "Truncation token of width {} dropped for extent {}",
                token.width(),
                extent
            );
        }
        let available = if token_fits { extent - token.width() } else { extent.max(0.0) };

        let (head, tail) = match place {
            TruncationPlace::End => {
                let end = breaks.forward_break(range.clone(), available, mode, false);
                (range.start..self.text.trailing_whitespace_start(range.start..end), range.end..range.end)
            }
            TruncationPlace::Start => {
                let start = breaks.backward_break(range.clone(), available, mode, false);
                (range.start..range.start, self.text.leading_whitespace_end(start..range.end)..range.end)
            }
            TruncationPlace::Middle => {
                let end = breaks.forward_break(range.clone(), available / 2.0, mode, false);
                let head = range.start..self.text.trailing_whitespace_start(range.start..end);
                let remaining = (available - measure_range(self.runs, head.clone())).max(0.0);
                let start = breaks.backward_break(end..range.end, remaining, mode, false);
                (head, self.text.leading_whitespace_end(start..range.end)..range.end)
            }
        };

        let intrinsic = |index: usize| RunSource::Intrinsic(self.runs[index].clone());
        let head_runs = self.visual_runs(paragraph, head.clone(), &intrinsic);
        let tail_runs = self.visual_runs(paragraph, tail.clone(), &intrinsic);
        let token_runs: Vec<GlyphRun> = if token_fits {
            token.runs().iter().map(|run| run.to_token(head.end)).collect()
        } else {
            Vec::new()
        };

        let mut runs = Vec::with_capacity(head_runs.len() + token_runs.len() + tail_runs.len());
        if paragraph.is_rtl() {
            runs.extend(tail_runs);
            runs.extend(token_runs);
            runs.extend(head_runs);
        } else {
            runs.extend(head_runs);
            runs.extend(token_runs);
            runs.extend(tail_runs);
        }

        let trailing_whitespace_extent = if tail.is_empty() {
            0.0
        } else {
            self.trailing_whitespace_extent(tail.clone())
        };

        log::trace!(
            "Truncated line {}..{} at {:?}: kept {}..{} and {}..{}",
            range.start,
            range.end,
            place,
            head.start,
            head.end,
            tail.start,
            tail.end
        );
        ComposedLine::new(range, paragraph.base_level, runs, trailing_whitespace_extent)
    }

    /// Glyph runs of `range` in visual order
    fn visual_runs(
        &self,
        paragraph: &BidiParagraph,
        range: Range<usize>,
        source_for: &dyn Fn(usize) -> RunSource,
    ) -> Vec<GlyphRun> {
        let mut glyph_runs: Vec<GlyphRun> = Vec::new();
        if range.is_empty() {
            return glyph_runs;
        }

        for line_run in self.analysis.bidi.line_runs(paragraph, range) {
            let forward = line_run.embedding_level & 1 == 0;
            let mut insert_at = glyph_runs.len();
            let mut position = line_run.code_unit_range.start;

            while position < line_run.code_unit_range.end {
                let run_index = run_index_at(self.runs, position);
                let end = self.runs[run_index]
                    .code_unit_range
                    .end
                    .min(line_run.code_unit_range.end);
                let source = source_for(run_index);

                for (span, style) in self.styles.runs_in(position..end) {
                    let glyph_run = GlyphRun::new(source.clone(), span, style.foreground_color);
                    glyph_runs.insert(insert_at, glyph_run);
                    if forward {
                        insert_at += 1;
                    }
                }
                position = end;
            }
        }

        glyph_runs
    }

    fn trailing_whitespace_extent(&self, range: Range<usize>) -> f32 {
        let start = self.text.trailing_whitespace_start(range.clone());
        measure_range(self.runs, start..range.end)
    }

    fn level_near(&self, index: usize) -> u8 {
        let paragraph = self
            .analysis
            .bidi
            .paragraph_at(index)
            .or_else(|| self.analysis.bidi.paragraphs().last());
        paragraph.map_or(0, |paragraph| paragraph.base_level)
    }
}
