//! Pure Rust text shaping backend using harfrust
//!
//! Harfrust is a pure Rust port of HarfBuzz, providing text shaping without
//! any C dependencies. Compiled shape plans are memoized in the typeface's
//! pattern cache, keyed by direction, script, language and features, so runs
//! that share a typeface and settings skip plan compilation.
//!
//! Cluster values coming out of harfrust are UTF-8 byte offsets into the
//! shaped slice; they are translated back to UTF-16 code units before the
//! cluster map is built.

use std::ops::Range;
use std::str::FromStr;

use harfrust::{
    script, Direction as HrDirection, Feature, FontRef as HrFontRef, GlyphBuffer, Language,
    Script, ShapePlan, ShaperData, Tag as HrTag, UnicodeBuffer,
};

use typeset_core::{
    error::Result,
    traits::{Shaper, Typeface},
    types::{GlyphId, PositionedGlyph, ShapingOrder, ShapingResult, Tag, WritingDirection},
    PatternKey, ShapingParams, Text,
};
use typeset_shape_none::nominal_glyphs;

/// Engine name used in pattern cache keys
const ENGINE: &str = "harfrust";

/// One glyph as harfrust reports it, before scaling
#[derive(Debug, Clone, Copy, PartialEq)]
struct RawGlyph {
    id: GlyphId,
    /// UTF-8 byte offset into the shaped slice
    cluster: u32,
    x_offset: i32,
    y_offset: i32,
    x_advance: i32,
}

fn to_hr_tag(tag: Tag) -> HrTag {
    HrTag::new(tag.as_bytes())
}

fn from_hr_tag(tag: HrTag) -> Tag {
    Tag::new(&tag.to_be_bytes())
}

/// Script requested by the caller, `None` for the shared pseudo-scripts
fn requested_script(tag: Tag) -> Option<Script> {
    if matches!(tag.as_bytes(), b"Zyyy" | b"Zinh" | b"Zzzz") {
        None
    } else {
        Script::from_iso15924_tag(to_hr_tag(tag))
    }
}

fn hr_language(params: &ShapingParams) -> Option<Language> {
    params
        .language
        .as_deref()
        .and_then(|lang| Language::from_str(lang).ok())
}

/// Convert OpenType features (liga, kern, etc.) to harfrust format
fn hr_features(params: &ShapingParams) -> Vec<Feature> {
    params
        .features
        .iter()
        .map(|&(tag, value)| Feature {
            tag: to_hr_tag(tag),
            value,
            start: 0,
            end: u32::MAX,
        })
        .collect()
}

/// Translates our direction enum to harfrust's format
fn to_hr_direction(direction: WritingDirection) -> HrDirection {
    match direction {
        WritingDirection::LeftToRight => HrDirection::LeftToRight,
        WritingDirection::RightToLeft => HrDirection::RightToLeft,
    }
}

/// Code unit offset, relative to `range`, of a cluster given in UTF-8 bytes
/// relative to the start of `range`
fn cluster_unit(text: &Text, range: &Range<usize>, byte_cluster: u32) -> usize {
    let base_byte = text.byte_offset(range.start);
    text.unit_offset(base_byte + byte_cluster as usize) - range.start
}

/// Scale raw glyphs, translate their clusters and put them in the order the
/// run was requested in
///
/// Harfrust emits glyphs in the visual order of the buffer direction. A run
/// shaped against its engine order is flipped back afterwards.
fn positioned_glyphs(
    raw: impl IntoIterator<Item = RawGlyph>,
    text: &Text,
    range: &Range<usize>,
    scale: f32,
    order: ShapingOrder,
) -> Vec<PositionedGlyph> {
    let mut glyphs: Vec<PositionedGlyph> = raw
        .into_iter()
        .map(|glyph| PositionedGlyph {
            id: glyph.id,
            x: glyph.x_offset as f32 * scale,
            y: glyph.y_offset as f32 * scale,
            advance: glyph.x_advance as f32 * scale,
            cluster: cluster_unit(text, range, glyph.cluster),
        })
        .collect();
    if order == ShapingOrder::Backward {
        glyphs.reverse();
    }
    glyphs
}

fn raw_glyphs(buffer: &GlyphBuffer) -> impl Iterator<Item = RawGlyph> + '_ {
    buffer
        .glyph_infos()
        .iter()
        .zip(buffer.glyph_positions())
        .map(|(info, pos)| RawGlyph {
            id: info.glyph_id,
            cluster: info.cluster,
            x_offset: pos.x_offset,
            y_offset: pos.y_offset,
            x_advance: pos.x_advance,
        })
}

/// Pure Rust text shaping powered by harfrust
#[derive(Debug, Default)]
pub struct HarfrustShaper;

impl HarfrustShaper {
    /// Creates a new harfrust shaper ready to handle any script
    pub fn new() -> Self {
        Self
    }

    /// Perform basic fallback shaping when font data is unavailable
    fn fallback_shape(
        text: &Text,
        range: Range<usize>,
        typeface: &dyn Typeface,
        params: &ShapingParams,
    ) -> ShapingResult {
        let mut glyphs = nominal_glyphs(text, range.clone(), typeface, params);
        if params.is_backward() {
            glyphs.reverse();
        }
        ShapingResult::from_glyphs(glyphs, range.len(), params.is_backward())
    }
}

impl Shaper for HarfrustShaper {
    fn name(&self) -> &'static str {
        "Harfrust"
    }

    fn shape(
        &self,
        text: &Text,
        range: Range<usize>,
        typeface: &dyn Typeface,
        params: &ShapingParams,
    ) -> Result<ShapingResult> {
        if range.is_empty() {
            return Ok(ShapingResult {
                is_backward: params.is_backward(),
                ..Default::default()
            });
        }

        let font_data = typeface.data();
        if font_data.is_empty() {
            // No font data? Fall back to basic shaping
            return Ok(Self::fallback_shape(text, range, typeface, params));
        }

        // Create harfrust FontRef from font data
        let hr_font = match HrFontRef::new(font_data) {
            Ok(font) => font,
            Err(err) => {
                log::warn!("Harfrust could not parse font data ({err:?}), using nominal glyphs");
                return Ok(Self::fallback_shape(text, range, typeface, params));
            }
        };

        let shaper_data = ShaperData::new(&hr_font);
        let shaper = shaper_data
            .shaper(&hr_font)
            .point_size(Some(params.size))
            .build();

        let direction = to_hr_direction(params.direction);
        let language = hr_language(params);
        let features = hr_features(params);

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text.slice(range.clone()));
        buffer.set_direction(direction);
        if let Some(language) = language.clone() {
            buffer.set_language(language);
        }
        match requested_script(params.script) {
            Some(script) => buffer.set_script(script),
            None => buffer.guess_segment_properties(),
        }
        // The plan must agree with the buffer, so key it on the script the
        // buffer ended up with.
        let buffer_script = buffer.script();
        let plan_script = (buffer_script != script::UNKNOWN).then_some(buffer_script);

        let key = PatternKey::new(
            ENGINE,
            params.direction,
            from_hr_tag(buffer_script.tag()),
            params.language.clone(),
            params.features.clone(),
        );
        let plan = typeface.pattern_cache().get_or_insert_with(&key, || {
            log::debug!(
                "Compiling harfrust plan for script {} with {} feature(s)",
                key.script,
                features.len()
            );
            ShapePlan::new(&shaper, direction, plan_script, language.as_ref(), &features)
        });

        let output = shaper.shape_with_plan(&plan, buffer, &features);

        let scale = params.size / typeface.units_per_em() as f32;
        let glyphs = positioned_glyphs(raw_glyphs(&output), text, &range, scale, params.order);

        log::trace!(
            "Harfrust shaped {} code units into {} glyphs",
            range.len(),
            glyphs.len()
        );

        Ok(ShapingResult::from_glyphs(
            glyphs,
            range.len(),
            params.is_backward(),
        ))
    }
}
