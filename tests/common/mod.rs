//! Shared integration test helpers for glyphstring.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::{FixedAdvanceProvider, RecordingSink, renderer};
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a subset
//! of helpers is used per file.

#![allow(dead_code)]

use std::ops::Range;

use glyphstring::{
    Config, Direction, DrawSink, FontId, FontStyle, GlyphHandle, GlyphProvider, ProviderError,
    ShapedGlyph, ShapedRun, SolidQuad, StringRenderer, TextureId, TexturedQuad,
};

/// Font used for Hebrew text; fonts 0-3 are the styled fonts by `FontStyle::index`.
pub const HEBREW_FONT: FontId = FontId(4);

/// Glyph height in layout units.
pub const GLYPH_HEIGHT: i32 = 16;

/// Glyph top relative to the baseline in layout units.
pub const GLYPH_TOP: f32 = -14.0;

pub fn is_hebrew(c: char) -> bool {
    ('\u{0590}'..='\u{05FF}').contains(&c)
}

/// Characters no font can render.
pub fn is_unsupported(c: char) -> bool {
    ('\u{E000}'..='\u{F8FF}').contains(&c)
}

/// Advance of `c` in layout units.
pub fn advance_of(c: char) -> i32 {
    match c {
        'i' => 4,
        'W' => 14,
        _ => 10,
    }
}

/// Image width of `c` in layout units.
pub fn width_of(c: char) -> i32 {
    match c {
        '1' => 4,
        _ => advance_of(c) - 2,
    }
}

/// One recorded `shape` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeCall {
    pub font: FontId,
    pub text: String,
    pub direction: Direction,
}

/// A provider with fixed per-character metrics.
///
/// Glyph codes are the character's scalar value, and `u1` of every handle
/// repeats it so quads can be traced back to characters. Uppercase letters
/// live on a different texture from everything else.
#[derive(Debug, Default)]
pub struct FixedAdvanceProvider {
    pub shape_calls: Vec<ShapeCall>,
    pub rasterize_calls: usize,
    /// Shaping a range containing this character fails
    pub fail_on: Option<char>,
    /// Left bearing of the first glyph of every run, e.g. negative for an
    /// overhanging `j`
    pub first_bearing: f32,
}

impl FixedAdvanceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_font(font: FontId) -> Result<(), ProviderError> {
        if font.0 > HEBREW_FONT.0 {
            return Err(ProviderError::UnknownFont(font));
        }
        Ok(())
    }

    fn supports(font: FontId, c: char) -> bool {
        if is_unsupported(c) {
            return false;
        }
        (font == HEBREW_FONT) == is_hebrew(c)
    }
}

/// Texture holding glyph `c` of `font`.
pub fn texture_of(font: FontId, c: char) -> TextureId {
    let upper = u32::from(c.is_ascii_uppercase());
    TextureId(font.0 as u32 * 2 + 1 + upper)
}

impl GlyphProvider for FixedAdvanceProvider {
    fn resolve_font(
        &mut self,
        text: &[char],
        range: Range<usize>,
        style: FontStyle,
    ) -> Result<FontId, ProviderError> {
        if is_hebrew(text[range.start]) {
            Ok(HEBREW_FONT)
        } else {
            Ok(FontId(style.index()))
        }
    }

    fn unsupported_prefix_end(
        &self,
        font: FontId,
        text: &[char],
        range: Range<usize>,
    ) -> Option<usize> {
        range.clone().find(|&i| !Self::supports(font, text[i]))
    }

    fn ensure_rasterized(
        &mut self,
        font: FontId,
        _text: &[char],
        _range: Range<usize>,
        _direction: Direction,
    ) -> Result<(), ProviderError> {
        Self::check_font(font)?;
        self.rasterize_calls += 1;
        Ok(())
    }

    fn shape(
        &mut self,
        font: FontId,
        text: &[char],
        range: Range<usize>,
        direction: Direction,
    ) -> Result<ShapedRun, ProviderError> {
        Self::check_font(font)?;
        let chars = &text[range.clone()];
        if let Some(bad) = self.fail_on
            && chars.contains(&bad)
        {
            return Err(ProviderError::Shaping {
                font,
                reason: format!("refusing to shape {bad:?}"),
            });
        }
        self.shape_calls.push(ShapeCall {
            font,
            text: chars.iter().collect(),
            direction,
        });

        let mut order: Vec<usize> = (0..chars.len()).collect();
        if direction.is_rtl() {
            order.reverse();
        }

        let mut pen = 0.0;
        let mut glyphs = Vec::with_capacity(chars.len());
        for char_index in order {
            let c = chars[char_index];
            glyphs.push(ShapedGlyph {
                char_index,
                glyph_code: c as u32,
                origin: pen,
                x: pen + if glyphs.is_empty() { self.first_bearing } else { 0.0 },
                y: GLYPH_TOP,
            });
            pen += advance_of(c) as f32;
        }
        Ok(ShapedRun {
            glyphs,
            advance: pen,
        })
    }

    fn lookup_glyph(&mut self, font: FontId, glyph_code: u32) -> Result<GlyphHandle, ProviderError> {
        Self::check_font(font)?;
        let c = char::from_u32(glyph_code).unwrap_or('\u{FFFD}');
        Ok(GlyphHandle {
            texture: texture_of(font, c),
            width: width_of(c),
            height: GLYPH_HEIGHT,
            u1: glyph_code as f32,
            v1: 0.0,
            u2: glyph_code as f32 + 1.0,
            v2: 1.0,
        })
    }
}

/// Every call a [`RecordingSink`] received.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    BeginBatch,
    Color([u8; 4]),
    Bind(Option<TextureId>),
    Textured(TexturedQuad),
    Solid(SolidQuad),
    Flush,
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn textured_quads(&self) -> Vec<TexturedQuad> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Textured(q) => Some(*q),
                _ => None,
            })
            .collect()
    }

    pub fn solid_quads(&self) -> Vec<SolidQuad> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Solid(q) => Some(*q),
                _ => None,
            })
            .collect()
    }

    pub fn binds(&self) -> Vec<Option<TextureId>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Bind(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    pub fn colors(&self) -> Vec<[u8; 4]> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Color(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    /// The glyph character drawn by each textured quad.
    pub fn drawn_chars(&self) -> String {
        self.textured_quads()
            .iter()
            .filter_map(|q| char::from_u32(q.u1 as u32))
            .collect()
    }
}

impl DrawSink for RecordingSink {
    fn begin_batch(&mut self) {
        self.events.push(SinkEvent::BeginBatch);
    }

    fn set_color(&mut self, rgba: [u8; 4]) {
        self.events.push(SinkEvent::Color(rgba));
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.events.push(SinkEvent::Bind(texture));
    }

    fn add_textured_quad(&mut self, quad: TexturedQuad) {
        self.events.push(SinkEvent::Textured(quad));
    }

    fn add_solid_quad(&mut self, quad: SolidQuad) {
        self.events.push(SinkEvent::Solid(quad));
    }

    fn flush(&mut self) {
        self.events.push(SinkEvent::Flush);
    }
}

/// A renderer over [`FixedAdvanceProvider`] with the default configuration.
pub fn renderer() -> StringRenderer<FixedAdvanceProvider> {
    StringRenderer::with_defaults(FixedAdvanceProvider::new()).expect("renderer setup")
}

/// A renderer whose recent-string set holds a single string.
pub fn renderer_retaining_one() -> StringRenderer<FixedAdvanceProvider> {
    let config = Config::default().with_retained_strings(1);
    StringRenderer::new(FixedAdvanceProvider::new(), &config).expect("renderer setup")
}
