//! The glyph provider contract consumed by the string layout engine.
//!
//! A provider answers font fallback queries, shapes runs of text, and owns
//! the rasterized glyph images. The layout engine never touches fonts
//! directly; it only sees [`FontId`]s and [`GlyphHandle`]s.
//!
//! Text is passed as a slice of `char`s plus a character range so that all
//! indices exchanged across this boundary are character indices.

use std::ops::Range;

use thiserror::Error;

/// Opaque identifier of a physical font inside a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(pub usize);

/// Opaque identifier of a texture holding rasterized glyph images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Font-specific style flags that select a physical font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
}

impl FontStyle {
    pub const PLAIN: FontStyle = FontStyle {
        bold: false,
        italic: false,
    };
    pub const BOLD: FontStyle = FontStyle {
        bold: true,
        italic: false,
    };
    pub const ITALIC: FontStyle = FontStyle {
        bold: false,
        italic: true,
    };
    pub const BOLD_ITALIC: FontStyle = FontStyle {
        bold: true,
        italic: true,
    };

    /// All four combinations, ordered by [`FontStyle::index`].
    pub const ALL: [FontStyle; 4] = [
        FontStyle::PLAIN,
        FontStyle::BOLD,
        FontStyle::ITALIC,
        FontStyle::BOLD_ITALIC,
    ];

    /// Dense index in `0..4`: bold is bit 0, italic is bit 1.
    pub fn index(self) -> usize {
        self.bold as usize | (self.italic as usize) << 1
    }
}

/// Layout direction of a homogeneous run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl Direction {
    pub fn is_rtl(self) -> bool {
        self == Direction::RightToLeft
    }
}

/// Location and size of one rasterized glyph image inside a texture.
///
/// Coordinates `u1/v1` (top-left) and `u2/v2` (bottom-right) are normalized
/// to the texture size; `width`/`height` are in layout pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphHandle {
    pub texture: TextureId,
    pub width: i32,
    pub height: i32,
    pub u1: f32,
    pub v1: f32,
    pub u2: f32,
    pub v2: f32,
}

/// One glyph of a shaped run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    /// Index of the source character, relative to the start of the shaped range
    pub char_index: usize,
    /// Font-specific glyph code, resolved with [`GlyphProvider::lookup_glyph`]
    pub glyph_code: u32,
    /// Pen position where this glyph's advance begins, relative to the start
    /// of the run
    pub origin: f32,
    /// Left edge of the glyph image relative to the start of the run; differs
    /// from `origin` by the glyph's offset and left bearing
    pub x: f32,
    /// Top edge of the glyph image relative to the baseline (negative is above)
    pub y: f32,
}

/// Output of [`GlyphProvider::shape`]: glyphs in visual order plus the final pen position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedRun {
    pub glyphs: Vec<ShapedGlyph>,
    pub advance: f32,
}

/// Failures reported by a glyph provider.
///
/// These are not recoverable by the layout engine; they abort the layout of
/// the string being built and propagate to the caller.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A font id that the provider never handed out.
    #[error("Unknown font {0:?}")]
    UnknownFont(FontId),

    /// No font at all is available to render text.
    #[error("No font available for style {0:?}")]
    NoFont(FontStyle),

    /// The shaping engine rejected the run.
    #[error("Shaping failed for font {font:?}: {reason}")]
    Shaping { font: FontId, reason: String },

    /// A glyph could not be rasterized or stored.
    #[error("Rasterization failed for glyph {glyph} in font {font:?}: {reason}")]
    Rasterization {
        font: FontId,
        glyph: u32,
        reason: String,
    },
}

/// The narrow capability interface the layout engine needs from a font backend.
pub trait GlyphProvider {
    /// Pick the font that should render `text[range]` starting at `range.start`.
    fn resolve_font(
        &mut self,
        text: &[char],
        range: Range<usize>,
        style: FontStyle,
    ) -> Result<FontId, ProviderError>;

    /// Index of the first character in `range` the font cannot render, or
    /// `None` if it can render the whole range.
    fn unsupported_prefix_end(
        &self,
        font: FontId,
        text: &[char],
        range: Range<usize>,
    ) -> Option<usize>;

    /// Make sure every glyph needed to draw `text[range]` has been rasterized.
    fn ensure_rasterized(
        &mut self,
        font: FontId,
        text: &[char],
        range: Range<usize>,
        direction: Direction,
    ) -> Result<(), ProviderError>;

    /// Shape `text[range]` into positioned glyphs, in visual order.
    fn shape(
        &mut self,
        font: FontId,
        text: &[char],
        range: Range<usize>,
        direction: Direction,
    ) -> Result<ShapedRun, ProviderError>;

    /// Resolve a glyph code returned by [`GlyphProvider::shape`] to its image.
    fn lookup_glyph(&mut self, font: FontId, glyph_code: u32)
    -> Result<GlyphHandle, ProviderError>;
}
