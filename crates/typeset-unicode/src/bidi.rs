// this_file: crates/typeset-unicode/src/bidi.rs

//! Bidi classification over UTF-16 code units.
//!
//! Paragraph boundaries and embedding levels come from `unicode-bidi`
//! (UAX #9). Line-level work (rule L1 whitespace reset and rule L2 run
//! reordering) happens here on the stored levels, so a line can be
//! reordered without re-running the whole algorithm.

use std::ops::Range;

use typeset_core::{types::WritingDirection, Text};
use unicode_bidi::{BidiClass, BidiInfo, Level, LTR_LEVEL, RTL_LEVEL};

use crate::mirror::mirrored;

/// Base direction hint for paragraph analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseDirection {
    /// Detect paragraph base direction from the first strong character.
    #[default]
    Auto,
    /// Force a left-to-right base level.
    LeftToRight,
    /// Force a right-to-left base level.
    RightToLeft,
}

impl BaseDirection {
    fn to_level(self) -> Option<Level> {
        match self {
            BaseDirection::Auto => None,
            BaseDirection::LeftToRight => Some(LTR_LEVEL),
            BaseDirection::RightToLeft => Some(RTL_LEVEL),
        }
    }
}

/// A maximal run of text governed by one base level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidiParagraph {
    pub code_unit_range: Range<usize>,
    pub base_level: u8,
}

impl BidiParagraph {
    pub fn is_rtl(&self) -> bool {
        self.base_level & 1 == 1
    }

    pub fn direction(&self) -> WritingDirection {
        WritingDirection::from_level(self.base_level)
    }
}

/// A level-homogeneous run of code units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidiRun {
    pub code_unit_range: Range<usize>,
    pub embedding_level: u8,
}

impl BidiRun {
    pub fn is_rtl(&self) -> bool {
        self.embedding_level & 1 == 1
    }
}

/// A code unit whose glyph must show its mirrored counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirroringPair {
    pub code_unit_index: usize,
    pub source: char,
    pub mirror: char,
}

/// Resolved bidi data for a whole text.
#[derive(Debug, Clone, Default)]
pub struct BidiClassifier {
    paragraphs: Vec<BidiParagraph>,
    levels: Vec<u8>,
    classes: Vec<BidiClass>,
}

impl BidiClassifier {
    /// Resolve paragraphs and embedding levels for `text`.
    pub fn new(text: &Text, base: BaseDirection) -> Self {
        if text.is_empty() {
            return Self::default();
        }

        let info = BidiInfo::new(text.as_str(), base.to_level());
        let mut levels = Vec::with_capacity(text.len());
        let mut classes = Vec::with_capacity(text.len());
        for (byte, ch) in text.as_str().char_indices() {
            for _ in 0..ch.len_utf16() {
                levels.push(info.levels[byte].number());
                classes.push(info.original_classes[byte]);
            }
        }

        let paragraphs = info
            .paragraphs
            .iter()
            .map(|paragraph| BidiParagraph {
                code_unit_range: text.unit_offset(paragraph.range.start)
                    ..text.unit_offset(paragraph.range.end),
                base_level: paragraph.level.number(),
            })
            .collect::<Vec<_>>();

        log::trace!(
            "Resolved {} bidi paragraph(s) over {} code units",
            paragraphs.len(),
            levels.len()
        );

        Self {
            paragraphs,
            levels,
            classes,
        }
    }

    pub fn paragraphs(&self) -> &[BidiParagraph] {
        &self.paragraphs
    }

    /// Index of the paragraph containing `code_unit`.
    pub fn paragraph_index(&self, code_unit: usize) -> Option<usize> {
        let index = self
            .paragraphs
            .partition_point(|p| p.code_unit_range.end <= code_unit);
        (index < self.paragraphs.len()).then_some(index)
    }

    /// The paragraph containing `code_unit`.
    pub fn paragraph_at(&self, code_unit: usize) -> Option<&BidiParagraph> {
        self.paragraph_index(code_unit).map(|i| &self.paragraphs[i])
    }

    /// Embedding level of every code unit.
    pub fn levels(&self) -> &[u8] {
        &self.levels
    }

    pub fn level_at(&self, code_unit: usize) -> u8 {
        self.levels[code_unit]
    }

    /// Level-homogeneous runs of `range` in logical order.
    pub fn logical_runs(&self, range: Range<usize>) -> Vec<BidiRun> {
        group_levels(&self.levels[range.clone()], range.start)
    }

    /// Level-homogeneous runs of one line in visual order.
    ///
    /// `range` must lie inside `paragraph`.
    pub fn line_runs(&self, paragraph: &BidiParagraph, range: Range<usize>) -> Vec<BidiRun> {
        assert!(
            range.start >= paragraph.code_unit_range.start
                && range.end <= paragraph.code_unit_range.end,
            "line range {}..{} escapes paragraph {}..{}",
            range.start,
            range.end,
            paragraph.code_unit_range.start,
            paragraph.code_unit_range.end
        );
        if range.is_empty() {
            return Vec::new();
        }

        let mut levels = self.levels[range.clone()].to_vec();
        reset_line_levels(
            &mut levels,
            &self.classes[range.clone()],
            paragraph.base_level,
        );

        let mut runs = group_levels(&levels, range.start);
        reorder_runs(&mut runs);
        runs
    }

    /// Code units in `range` that display mirrored glyphs.
    pub fn mirroring_pairs(&self, text: &Text, range: Range<usize>) -> Vec<MirroringPair> {
        text.chars(range)
            .filter(|&(unit, _)| self.levels[unit] & 1 == 1)
            .filter_map(|(unit, ch)| {
                mirrored(ch).map(|mirror| MirroringPair {
                    code_unit_index: unit,
                    source: ch,
                    mirror,
                })
            })
            .collect()
    }
}

/// Rule L1: separators, and whitespace before them or at the end of the
/// line, fall back to the paragraph level.
fn reset_line_levels(levels: &mut [u8], classes: &[BidiClass], paragraph_level: u8) {
    let mut trailing = true;
    for index in (0..levels.len()).rev() {
        match classes[index] {
            BidiClass::S | BidiClass::B => {
                levels[index] = paragraph_level;
                trailing = true;
            }
            BidiClass::WS
            | BidiClass::FSI
            | BidiClass::LRI
            | BidiClass::RLI
            | BidiClass::PDI
            | BidiClass::BN
            | BidiClass::LRE
            | BidiClass::RLE
            | BidiClass::LRO
            | BidiClass::RLO
            | BidiClass::PDF => {
                if trailing {
                    levels[index] = paragraph_level;
                }
            }
            _ => trailing = false,
        }
    }
}

fn group_levels(levels: &[u8], offset: usize) -> Vec<BidiRun> {
    let mut runs: Vec<BidiRun> = Vec::new();
    for (index, &level) in levels.iter().enumerate() {
        let unit = offset + index;
        match runs.last_mut() {
            Some(run) if run.embedding_level == level => run.code_unit_range.end = unit + 1,
            _ => runs.push(BidiRun {
                code_unit_range: unit..unit + 1,
                embedding_level: level,
            }),
        }
    }
    runs
}

/// Rule L2 applied to whole runs: from the highest level down to the
/// lowest odd level, reverse every maximal sequence at or above it.
fn reorder_runs(runs: &mut [BidiRun]) {
    let Some(max_level) = runs.iter().map(|r| r.embedding_level).max() else {
        return;
    };
    let Some(min_odd) = runs
        .iter()
        .map(|r| r.embedding_level)
        .filter(|level| level & 1 == 1)
        .min()
    else {
        return;
    };

    for level in (min_odd..=max_level).rev() {
        let mut index = 0;
        while index < runs.len() {
            if runs[index].embedding_level < level {
                index += 1;
                continue;
            }
            let start = index;
            while index < runs.len() && runs[index].embedding_level >= level {
                index += 1;
            }
            runs[start..index].reverse();
        }
    }
}
