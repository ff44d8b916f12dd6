//! Font loading, shaping and glyph rasterization for glyphstring.
//!
//! This crate provides:
//! - The [`GlyphProvider`] contract consumed by the layout engine
//! - Font loading with system font discovery and a fallback chain
//! - HarfBuzz-based text shaping via rustybuzz
//! - A swash-rasterized glyph atlas split into RGBA texture pages
//!
//! # Architecture
//!
//! [`FontGlyphProvider`] ties the pieces together: the [`FontManager`] picks
//! a font for each run (styled variant first, then fallbacks), the
//! [`TextShaper`] positions glyphs, and the [`GlyphAtlas`] rasterizes them on
//! first use.

pub mod atlas;
pub mod error;
pub mod font_manager;
pub mod glyph_provider;
pub mod provider;
pub mod text_shaper;

// Re-export main types for convenience
pub use atlas::{AtlasEntry, AtlasPage, GlyphAtlas};
pub use error::FontError;
pub use font_manager::{FALLBACK_FAMILIES, FontData, FontManager};
pub use glyph_provider::FontGlyphProvider;
pub use provider::{
    Direction, FontId, FontStyle, GlyphHandle, GlyphProvider, ProviderError, ShapedGlyph,
    ShapedRun, TextureId,
};
pub use text_shaper::{GlyphPosition, ShapedText, ShapingOptions, TextShaper};
