//! End-to-end layout scenarios

mod common;

use std::ops::Range;

use common::{typesetter, typesetter_with};
use typeset_core::types::{Point, Rect};
use typeset_layout::{
    AttributeSpan, BreakMode, ComposedLine, TextAlignment, TextAttribute, TruncationPlace,
    TypesetterOptions, VerticalAlignment,
};
use typeset_render_json::JsonRenderer;
use typeset_unicode::BaseDirection;

fn run_ranges(line: &ComposedLine) -> Vec<Range<usize>> {
    line.runs().iter().map(|run| run.code_unit_range()).collect()
}

#[test]
fn test_simple_ltr() {
    let typesetter = typesetter("Hello World");
    let frame = typesetter.frame_resolver().make_frame(0..11);

    assert_eq!(frame.lines().len(), 1);
    let line = &frame.lines()[0];
    assert_eq!(line.code_unit_range(), 0..11);
    assert_eq!(line.runs().len(), 1);
    assert!(line.width() > 0.0);
}

#[test]
fn test_mixed_bidi() {
    let typesetter = typesetter("abc שלום xyz");
    assert_eq!(typesetter.paragraphs().len(), 1);
    assert_eq!(typesetter.paragraphs()[0].base_level % 2, 0);

    let levels: Vec<u8> = typesetter
        .analysis()
        .bidi
        .logical_runs(0..12)
        .iter()
        .map(|run| run.embedding_level)
        .collect();
    assert_eq!(levels, vec![0, 1, 0]);

    let line = typesetter.make_simple_line(0..12);
    let hebrew = line
        .runs()
        .iter()
        .find(|run| run.is_backward())
        .expect("Hebrew run");
    let latin: Vec<f32> = line
        .runs()
        .iter()
        .filter(|run| !run.is_backward())
        .map(|run| run.origin().x)
        .collect();
    assert!(latin.first().is_some_and(|&x| x < hebrew.origin().x));
    assert!(latin.last().is_some_and(|&x| x > hebrew.origin().x));

    // Code unit 4 is drawn by the rightmost glyph of the run
    let cluster_map = hebrew.intrinsic().cluster_map.clone();
    assert_eq!(cluster_map, vec![3, 2, 1, 0]);
}

#[test]
fn test_forced_single_grapheme() {
    let typesetter = typesetter("AB");
    assert_eq!(typesetter.suggest_forward_break(0..2, 0.1, BreakMode::Character), 1);
}

#[test]
fn test_justification() {
    let typesetter = typesetter("a b");
    let simple = typesetter.make_simple_line(0..3);
    let justified = typesetter.make_justified_line(0..3, 1.0, simple.width() + 10.0);

    assert_eq!(justified.width(), simple.width() + 10.0);
    assert_eq!(justified.distance_for_code_unit(0), simple.distance_for_code_unit(0));
    assert_eq!(justified.distance_for_code_unit(2), simple.distance_for_code_unit(2) + 10.0);
}

#[test]
fn test_rtl_frame_truncation() {
    let options = TypesetterOptions::default().base_direction(BaseDirection::RightToLeft);
    let typesetter = typesetter_with("אבג דהו זחט", &[], options);
    let frame = typesetter
        .frame_resolver()
        .frame_bounds(Rect::new(0.0, 0.0, 60.0, f32::INFINITY))
        .max_lines(1)
        .truncation_place(TruncationPlace::End)
        .make_frame(0..11);

    assert_eq!(frame.code_unit_range(), 0..11);
    let line = &frame.lines()[0];
    assert!(line.is_rtl());
    // Token on the left, kept start on the right
    assert!(line.runs()[0].is_token());
    assert_eq!(run_ranges(line).last(), Some(&(0..3)));
    assert!(line.width() - line.trailing_whitespace_extent() <= 60.0);
}

#[test]
fn test_multi_paragraph_frame() {
    let spans = [
        AttributeSpan::new(0..6, TextAttribute::Alignment(TextAlignment::Center)),
        AttributeSpan::new(0..6, TextAttribute::ParagraphSpacing(10.0)),
    ];
    let typesetter = typesetter_with("Title\nBody text", &spans, TypesetterOptions::default());
    let frame = typesetter
        .frame_resolver()
        .frame_bounds(Rect::new(0.0, 0.0, 100.0, 200.0))
        .vertical_alignment(VerticalAlignment::Top)
        .make_frame(0..15);

    let lines = frame.lines();
    assert_eq!(lines.len(), 2);
    // "Title" is 50 wide; the newline hangs
    assert_eq!(lines[0].origin().x, 25.0);
    assert_eq!(lines[1].origin().x, 0.0);
    assert_eq!(lines[1].origin().y, 20.0 + 10.0 + 16.0);
    assert_eq!(frame.height(), 200.0);
}

#[test]
fn test_frame_hit_testing_and_selection() {
    let typesetter = typesetter("Hello World");
    let frame = typesetter
        .frame_resolver()
        .frame_bounds(Rect::new(0.0, 0.0, 70.0, f32::INFINITY))
        .make_frame(0..11);

    assert_eq!(frame.index_of_code_unit_at(Point::new(31.0, 5.0)), 3);
    assert_eq!(frame.index_of_code_unit_at(Point::new(1000.0, 1000.0)), 11);
    assert_eq!(frame.selection_path(0..0), Vec::<Rect>::new());
    assert_eq!(frame.selection_path(0..2), vec![Rect::new(0.0, 0.0, 20.0, 20.0)]);
}

#[test]
fn test_frame_draws_every_run() {
    let typesetter = typesetter("Hello World");
    let frame = typesetter
        .frame_resolver()
        .frame_bounds(Rect::new(0.0, 0.0, 70.0, f32::INFINITY))
        .make_frame(0..11);

    let mut renderer = JsonRenderer::new();
    frame
        .draw(&mut renderer, Point::new(5.0, 5.0))
        .expect("Drawing should succeed");

    let runs = renderer.runs();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].origin, [5.0, 21.0]);
    assert_eq!(runs[1].origin, [5.0, 41.0]);
    assert_eq!(runs[0].glyphs.len(), 6);
    assert!(renderer.to_json().is_ok());
}
