//! JSON Renderer - When you need to see what the layout really drew
//!
//! Sometimes pixels aren't enough; you need the raw glyph data. This
//! renderer records every glyph run the layout core asks it to draw and
//! serializes the recording as JSON, which makes it the renderer of choice
//! for tests and for debugging line and frame composition.

use serde::{Deserialize, Serialize};
use typeset_core::{
    error::{RenderError, Result, TypesetError},
    traits::{GlyphPaint, Renderer},
    types::{Color, Rect},
};

/// Schema version for JSON output format
pub const JSON_SCHEMA_VERSION: &str = "1.0";

/// One glyph as drawn, in absolute layout coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphRecord {
    pub g: u32,  // Glyph identifier in the typeface
    pub x: f32,  // Pen position plus horizontal offset
    pub y: f32,  // Baseline position plus vertical offset
    pub ax: f32, // Horizontal advance
}

/// Everything captured from one `draw_glyphs` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub type_size: f32,
    pub color: [u8; 4],
    pub origin: [f32; 2],
    /// `[x, y, width, height]` when the run is clipped
    pub clip: Option<[f32; 4]>,
    pub glyphs: Vec<GlyphRecord>,
}

/// The whole recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Schema version for forward compatibility
    pub schema_version: String,
    pub runs: Vec<RunRecord>,
}

/// Renderer that turns draw calls into structured data
///
/// Unlike bitmap renderers, this doesn't create pixels; it creates insight.
#[derive(Debug, Default)]
pub struct JsonRenderer {
    runs: Vec<RunRecord>,
}

impl JsonRenderer {
    /// Creates a renderer that speaks JSON instead of pixels
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs recorded so far, in drawing order
    pub fn runs(&self) -> &[RunRecord] {
        &self.runs
    }

    /// Forget everything recorded so far
    pub fn clear(&mut self) {
        self.runs.clear();
    }

    /// Snapshot of the recording
    pub fn output(&self) -> JsonOutput {
        JsonOutput {
            schema_version: JSON_SCHEMA_VERSION.to_string(),
            runs: self.runs.clone(),
        }
    }

    /// Serialize the recording as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.output()).map_err(|e| {
            TypesetError::RenderingFailed(RenderError::BackendError(e.to_string()))
        })
    }
}

fn color_array(color: Color) -> [u8; 4] {
    [color.r, color.g, color.b, color.a]
}

impl Renderer for JsonRenderer {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn draw_glyphs(&mut self, paint: &GlyphPaint<'_>) -> Result<()> {
        if paint.glyph_ids.len() != paint.glyph_offsets.len()
            || paint.glyph_ids.len() != paint.glyph_advances.len()
        {
            return Err(RenderError::BackendError(format!(
                "glyph arrays disagree: {} ids, {} offsets, {} advances",
                paint.glyph_ids.len(),
                paint.glyph_offsets.len(),
                paint.glyph_advances.len()
            ))
            .into());
        }

        let mut pen = paint.origin.x;
        let glyphs = paint
            .glyph_ids
            .iter()
            .zip(paint.glyph_offsets)
            .zip(paint.glyph_advances)
            .map(|((&g, offset), &ax)| {
                let record = GlyphRecord {
                    g,
                    x: pen + offset.x,
                    y: paint.origin.y - offset.y,
                    ax,
                };
                pen += ax;
                record
            })
            .collect::<Vec<_>>();

        log::trace!(
            "JSON renderer recorded {} glyph(s) at ({}, {})",
            glyphs.len(),
            paint.origin.x,
            paint.origin.y
        );

        self.runs.push(RunRecord {
            type_size: paint.type_size,
            color: color_array(paint.color),
            origin: [paint.origin.x, paint.origin.y],
            clip: paint.clip.map(|r| [r.x, r.y, r.width, r.height]),
            glyphs,
        });
        Ok(())
    }

    fn compute_bounding_box(&self, paint: &GlyphPaint<'_>) -> Rect {
        let upem = paint.typeface.units_per_em() as f32;
        let scale = paint.type_size / upem * paint.scale_y;
        let ascent = paint.typeface.ascent() * scale;
        let descent = paint.typeface.descent() * scale;
        let width: f32 = paint.glyph_advances.iter().sum();

        let bounds = Rect::new(
            paint.origin.x,
            paint.origin.y - ascent,
            width,
            ascent + descent,
        );
        match paint.clip {
            Some(clip) => {
                let x = bounds.min_x().max(clip.min_x());
                let max_x = bounds.max_x().min(clip.max_x());
                Rect::new(x, bounds.y, (max_x - x).max(0.0), bounds.height)
            }
            None => bounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typeset_core::{
        types::{GlyphId, Point},
        PatternCache, Typeface,
    };

    #[derive(Default)]
    struct MockTypeface {
        patterns: PatternCache,
    }

    impl Typeface for MockTypeface {
        fn data(&self) -> &[u8] {
            &[]
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
        fn glyph_id(&self, _ch: char) -> Option<GlyphId> {
            Some(1)
        }
        fn advance_width(&self, _glyph_id: GlyphId) -> f32 {
            500.0
        }
        fn pattern_cache(&self) -> &PatternCache {
            &self.patterns
        }
    }

    fn paint<'a>(
        typeface: &'a MockTypeface,
        ids: &'a [GlyphId],
        offsets: &'a [Point],
        advances: &'a [f32],
    ) -> GlyphPaint<'a> {
        GlyphPaint {
            typeface,
            type_size: 20.0,
            scale_x: 1.0,
            scale_y: 1.0,
            obliqueness: 0.0,
            color: Color::black(),
            glyph_ids: ids,
            glyph_offsets: offsets,
            glyph_advances: advances,
            origin: Point::new(5.0, 16.0),
            clip: None,
        }
    }

    #[test]
    fn test_json_renderer_records_runs() {
        let _ = env_logger::builder().is_test(true).try_init();
        let typeface = MockTypeface::default();
        let offsets = [Point::zero(), Point::new(1.0, 2.0)];
        let mut renderer = JsonRenderer::new();
        assert_eq!(Renderer::name(&renderer), "JSON");

        renderer
            .draw_glyphs(&paint(&typeface, &[65, 66], &offsets, &[10.0, 10.0]))
            .unwrap();

        let run = &renderer.runs()[0];
        assert_eq!(run.glyphs.len(), 2);
        assert_eq!(run.glyphs[0].x, 5.0);
        assert_eq!(run.glyphs[1].x, 16.0);
        assert_eq!(run.glyphs[1].y, 14.0);

        let json = renderer.to_json().unwrap();
        assert!(json.contains("\"schema_version\""));
        assert!(json.contains("\"g\": 65"));
        let parsed: JsonOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.runs, renderer.runs());
    }

    #[test]
    fn test_mismatched_arrays_rejected() {
        let typeface = MockTypeface::default();
        let mut renderer = JsonRenderer::new();
        let result = renderer.draw_glyphs(&paint(&typeface, &[1, 2], &[Point::zero()], &[1.0, 1.0]));
        assert!(result.is_err());
        assert!(renderer.runs().is_empty());
    }

    #[test]
    fn test_bounding_box_from_metrics() {
        let typeface = MockTypeface::default();
        let renderer = JsonRenderer::new();
        let offsets = [Point::zero(); 3];
        let bounds =
            renderer.compute_bounding_box(&paint(&typeface, &[1, 1, 1], &offsets, &[10.0; 3]));
        assert_eq!(bounds, Rect::new(5.0, 0.0, 30.0, 20.0));
    }

    #[test]
    fn test_bounding_box_respects_clip() {
        let typeface = MockTypeface::default();
        let renderer = JsonRenderer::new();
        let offsets = [Point::zero(); 3];
        let mut clipped = paint(&typeface, &[1, 1, 1], &offsets, &[10.0; 3]);
        clipped.clip = Some(Rect::new(10.0, 0.0, 10.0, 20.0));
        let bounds = renderer.compute_bounding_box(&clipped);
        assert_eq!(bounds.x, 10.0);
        assert_eq!(bounds.width, 10.0);
    }

    #[test]
    fn test_clear() {
        let typeface = MockTypeface::default();
        let mut renderer = JsonRenderer::new();
        renderer
            .draw_glyphs(&paint(&typeface, &[1], &[Point::zero()], &[10.0]))
            .unwrap();
        renderer.clear();
        assert!(renderer.output().runs.is_empty());
    }
}
