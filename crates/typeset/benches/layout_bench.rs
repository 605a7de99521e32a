//! Layout performance - measure every stage from shaping to frames
//!
//! Each group isolates one stage of the layout core so regressions can be
//! traced to the resolver that caused them. Texts range from a short label
//! to a few paragraphs of mixed-direction prose.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use typeset_core::{types::Rect, PatternCache, Typeface};
use typeset_layout::{BreakMode, TextStyle, TruncationPlace, Typesetter};
use typeset_shape_none::NoneShaper;

/// Consistent test typeface for all benchmarks
#[derive(Default)]
struct BenchTypeface {
    patterns: PatternCache,
}

impl Typeface for BenchTypeface {
    fn data(&self) -> &[u8] {
        &[] // No actual font data needed for benchmarking
    }
    fn units_per_em(&self) -> u16 {
        1000
    }
    fn ascent(&self) -> f32 {
        800.0
    }
    fn descent(&self) -> f32 {
        200.0
    }
    fn glyph_id(&self, ch: char) -> Option<u32> {
        Some(ch as u32)
    }
    fn advance_width(&self, _: u32) -> f32 {
        500.0
    }
    fn pattern_cache(&self) -> &PatternCache {
        &self.patterns
    }
}

fn style() -> TextStyle {
    TextStyle::new(Arc::new(BenchTypeface::default()), 16.0)
}

fn long_text() -> String {
    "The quick brown fox jumps over the lazy dog. שלום עולם, מה שלומך? ".repeat(20)
}

/// Typesetter construction: analysis plus shaping of every run
fn bench_typesetter(c: &mut Criterion) {
    let shaper = Arc::new(NoneShaper::new());

    c.bench_function("typesetter_short_text", |b| {
        b.iter(|| Typesetter::new(shaper.clone(), black_box("Hello World"), style()))
    });

    let text = long_text();
    c.bench_function("typesetter_mixed_bidi", |b| {
        b.iter(|| Typesetter::new(shaper.clone(), black_box(text.as_str()), style()))
    });
}

/// Line composition over already shaped text
fn bench_lines(c: &mut Criterion) {
    let text = long_text();
    let Ok(typesetter) = Typesetter::new(Arc::new(NoneShaper::new()), text.as_str(), style()) else {
        return;
    };
    let len = typesetter.text().len();

    c.bench_function("suggest_forward_break", |b| {
        b.iter(|| typesetter.suggest_forward_break(black_box(0..len), 400.0, BreakMode::Line))
    });

    c.bench_function("make_simple_line", |b| {
        b.iter(|| typesetter.make_simple_line(black_box(0..200)))
    });

    c.bench_function("make_justified_line", |b| {
        b.iter(|| typesetter.make_justified_line(black_box(0..200), 1.0, 1800.0))
    });

    c.bench_function("make_truncated_line", |b| {
        b.iter(|| typesetter.make_truncated_line(black_box(0..len), 400.0, BreakMode::Line, TruncationPlace::Middle, None))
    });
}

/// Frame filling with wrapping and justification
fn bench_frames(c: &mut Criterion) {
    let text = long_text();
    let Ok(typesetter) = Typesetter::new(Arc::new(NoneShaper::new()), text.as_str(), style()) else {
        return;
    };
    let len = typesetter.text().len();

    c.bench_function("make_frame_wrapped", |b| {
        b.iter(|| {
            typesetter
                .frame_resolver()
                .frame_bounds(Rect::new(0.0, 0.0, 320.0, f32::INFINITY))
                .make_frame(black_box(0..len))
        })
    });

    c.bench_function("make_frame_justified_truncated", |b| {
        b.iter(|| {
            typesetter
                .frame_resolver()
                .frame_bounds(Rect::new(0.0, 0.0, 320.0, 200.0))
                .justification_enabled(true)
                .truncation_place(TruncationPlace::End)
                .make_frame(black_box(0..len))
        })
    });
}

criterion_group!(benches, bench_typesetter, bench_lines, bench_frames);
criterion_main!(benches);
