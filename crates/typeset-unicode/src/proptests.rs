// this_file: crates/typeset-unicode/src/proptests.rs

use super::*;
use proptest::prelude::*;

// Property: line runs tile the line range exactly once
proptest! {
    #[test]
    fn prop_line_runs_cover_line(s in "[a-z אבגד()0-9]{1,40}") {
        let text = Text::new(s);
        let analysis = TextAnalysis::new(&text, BaseDirection::Auto);
        for paragraph in analysis.bidi.paragraphs() {
            let runs = analysis.bidi.line_runs(paragraph, paragraph.code_unit_range.clone());
            let mut covered: Vec<usize> = runs
                .iter()
                .flat_map(|run| run.code_unit_range.clone())
                .collect();
            covered.sort_unstable();
            let expected: Vec<usize> = paragraph.code_unit_range.clone().collect();
            prop_assert_eq!(covered, expected);
        }
    }
}

// Property: paragraphs are contiguous and cover the text
proptest! {
    #[test]
    fn prop_paragraphs_contiguous(s in "[a-zא-ת \n]{0,40}") {
        let text = Text::new(s);
        let bidi = BidiClassifier::new(&text, BaseDirection::Auto);
        let mut cursor = 0;
        for paragraph in bidi.paragraphs() {
            prop_assert_eq!(paragraph.code_unit_range.start, cursor);
            cursor = paragraph.code_unit_range.end;
        }
        prop_assert_eq!(cursor, text.len());
    }
}

// Property: grapheme navigation moves strictly and lands on boundaries
proptest! {
    #[test]
    fn prop_grapheme_navigation(s in "\\PC{1,20}") {
        let text = Text::new(s);
        let breaks = BreakClassifier::new(&text);
        let mut index = 0;
        while index < text.len() {
            let next = breaks.next_grapheme_boundary(index);
            prop_assert!(next > index);
            prop_assert!(breaks.is_grapheme_boundary(next));
            prop_assert_eq!(breaks.previous_grapheme_boundary(next), index);
            index = next;
        }
    }
}

// Property: script runs never contain a surrogate split
proptest! {
    #[test]
    fn prop_script_runs_on_char_boundaries(s in "\\PC{0,30}") {
        let text = Text::new(s);
        let scripts = ScriptClassifier::new(&text);
        for run in scripts.runs(0..text.len()) {
            let start = run.code_unit_range.start;
            prop_assert_eq!(text.unit_offset(text.byte_offset(start)), start);
        }
    }
}
