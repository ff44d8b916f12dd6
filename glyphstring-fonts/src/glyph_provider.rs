//! [`GlyphProvider`] implementation backed by system fonts.
//!
//! Combines the [`FontManager`] fallback chain, the rustybuzz [`TextShaper`]
//! and the swash [`GlyphAtlas`]. All positions are reported at the doubled
//! layout resolution: glyphs are shaped and rasterized at twice the configured
//! font size.

use std::ops::Range;

use glyphstring_config::Config;

use crate::atlas::GlyphAtlas;
use crate::font_manager::{FontData, FontManager};
use crate::provider::{
    Direction, FontId, FontStyle, GlyphHandle, GlyphProvider, ProviderError, ShapedGlyph,
    ShapedRun,
};
use crate::text_shaper::TextShaper;

/// A run shaped by `ensure_rasterized`, handed out by the `shape` call that
/// follows it.
struct PreparedRun {
    font: FontId,
    direction: Direction,
    text: Vec<char>,
    run: ShapedRun,
}

/// Glyph provider over real fonts.
pub struct FontGlyphProvider {
    fonts: FontManager,
    shaper: TextShaper,
    atlas: GlyphAtlas,
    pixel_size: f32,
    prepared: Option<PreparedRun>,
    runs_shaped: u64,
}

impl FontGlyphProvider {
    /// Create a provider rendering at `pixel_size` layout pixels per em.
    pub fn new(fonts: FontManager, pixel_size: f32, atlas_page_size: u32, antialias: bool) -> Self {
        Self {
            fonts,
            shaper: TextShaper::new(),
            atlas: GlyphAtlas::new(atlas_page_size, antialias),
            pixel_size,
            prepared: None,
            runs_shaped: 0,
        }
    }

    /// Load the configured font families from the system and build a provider.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let fonts = FontManager::new(
            config.font_family.as_deref(),
            config.bold_font_family.as_deref(),
            config.italic_font_family.as_deref(),
            config.bold_italic_font_family.as_deref(),
        )?;
        log::info!(
            "Font provider ready: {} fonts at {}pt",
            fonts.font_count(),
            config.font_size
        );
        Ok(Self::new(
            fonts,
            config.font_size * 2.0,
            config.atlas_page_size,
            config.antialias,
        ))
    }

    pub fn font_manager(&self) -> &FontManager {
        &self.fonts
    }

    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    /// Mutable atlas access, used to clear dirty flags after uploading pages.
    pub fn atlas_mut(&mut self) -> &mut GlyphAtlas {
        &mut self.atlas
    }

    pub fn pixel_size(&self) -> f32 {
        self.pixel_size
    }

    /// Number of runs passed through the shaping engine.
    pub fn runs_shaped(&self) -> u64 {
        self.runs_shaped
    }

    /// Shape `text[range]` with rustybuzz and rasterize every glyph it places.
    fn shape_run(
        &mut self,
        font: FontId,
        text: &[char],
        range: Range<usize>,
        direction: Direction,
    ) -> Result<ShapedRun, ProviderError> {
        self.runs_shaped += 1;
        let data = font_data(&self.fonts, font)?;
        let shaped = self
            .shaper
            .shape(
                &text[range],
                data.data.as_slice(),
                data.face_index,
                self.pixel_size,
                direction,
            )
            .ok_or_else(|| ProviderError::Shaping {
                font,
                reason: "font data is not a valid face".to_string(),
            })?;

        let mut pen = 0.0;
        let mut glyphs = Vec::with_capacity(shaped.glyphs.len());
        for position in &shaped.glyphs {
            let entry = self
                .atlas
                .get_or_insert(
                    data.font_ref(),
                    font.0,
                    glyph_id(font, position.glyph_id)?,
                    self.pixel_size,
                )
                .map_err(|e| ProviderError::Rasterization {
                    font,
                    glyph: position.glyph_id,
                    reason: e.to_string(),
                })?;

            glyphs.push(ShapedGlyph {
                char_index: position.char_index,
                glyph_code: position.glyph_id,
                origin: pen,
                x: pen + position.x_offset + entry.bearing_x,
                y: -position.y_offset - entry.bearing_y,
            });
            pen += position.x_advance;
        }

        Ok(ShapedRun {
            glyphs,
            advance: pen,
        })
    }
}

fn font_data(fonts: &FontManager, font: FontId) -> Result<&FontData, ProviderError> {
    fonts.font_data(font.0).ok_or(ProviderError::UnknownFont(font))
}

fn glyph_id(font: FontId, glyph_code: u32) -> Result<u16, ProviderError> {
    u16::try_from(glyph_code).map_err(|_| ProviderError::Rasterization {
        font,
        glyph: glyph_code,
        reason: "glyph code out of range".to_string(),
    })
}

impl GlyphProvider for FontGlyphProvider {
    fn resolve_font(
        &mut self,
        text: &[char],
        range: Range<usize>,
        style: FontStyle,
    ) -> Result<FontId, ProviderError> {
        Ok(FontId(self.fonts.lookup_font(text, range.start, style)))
    }

    fn unsupported_prefix_end(
        &self,
        font: FontId,
        text: &[char],
        range: Range<usize>,
    ) -> Option<usize> {
        self.fonts.can_display_up_to(font.0, text, range)
    }

    fn ensure_rasterized(
        &mut self,
        font: FontId,
        text: &[char],
        range: Range<usize>,
        direction: Direction,
    ) -> Result<(), ProviderError> {
        // Shaping rasterizes every glyph it places; keep the run for the
        // `shape` call that follows
        let run = self.shape_run(font, text, range.clone(), direction)?;
        self.prepared = Some(PreparedRun {
            font,
            direction,
            text: text[range].to_vec(),
            run,
        });
        Ok(())
    }

    fn shape(
        &mut self,
        font: FontId,
        text: &[char],
        range: Range<usize>,
        direction: Direction,
    ) -> Result<ShapedRun, ProviderError> {
        let prepared = self.prepared.take().filter(|p| {
            p.font == font && p.direction == direction && p.text == text[range.clone()]
        });
        match prepared {
            Some(prepared) => Ok(prepared.run),
            None => self.shape_run(font, text, range, direction),
        }
    }

    fn lookup_glyph(&mut self, font: FontId, glyph_code: u32) -> Result<GlyphHandle, ProviderError> {
        let id = glyph_id(font, glyph_code)?;
        if let Some(entry) = self.atlas.get(font.0, id) {
            return Ok(entry.handle);
        }

        let data = font_data(&self.fonts, font)?;
        self.atlas
            .get_or_insert(data.font_ref(), font.0, id, self.pixel_size)
            .map(|entry| entry.handle)
            .map_err(|e| ProviderError::Rasterization {
                font,
                glyph: glyph_code,
                reason: e.to_string(),
            })
    }
}
