//! Typed error types for glyphstring-fonts.

use thiserror::Error;

/// Errors raised while loading fonts, shaping, or filling the glyph atlas.
#[derive(Debug, Error)]
pub enum FontError {
    /// Neither the configured families nor any fallback family could be loaded.
    #[error("No usable font found (tried {tried} families)")]
    NoFontsAvailable { tried: usize },

    /// A font index outside the loaded font list.
    #[error("Font index {0} is not loaded")]
    UnknownFont(usize),

    /// The font data could not be parsed as a shaping face.
    #[error("Font index {0} could not be parsed for shaping")]
    InvalidFace(usize),

    /// A rasterized glyph does not fit on an empty atlas page.
    #[error("Glyph {glyph_id} ({width}x{height}) does not fit an atlas page of {page_size}x{page_size}")]
    GlyphTooLarge {
        glyph_id: u16,
        width: u32,
        height: u32,
        page_size: u32,
    },
}
