//! Cached string layout and glyph rendering with inline style codes.
//!
//! Strings may contain two-character escape codes (`§` followed by a color
//! or style character). A [`StringRenderer`] strips the codes, lays the text
//! out once with bidi reordering, style runs and font fallback, caches the
//! result, and then measures, trims and draws it through a [`DrawSink`].
//!
//! Layouts are keyed by the string with every ASCII digit replaced by `0`, so
//! rapidly changing numbers (scores, coordinates, timers) reuse one layout and
//! only swap digit glyphs at draw time.
//!
//! # Example
//!
//! ```no_run
//! use glyphstring::{Config, QuadBatcher, StringRenderer};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut renderer = StringRenderer::from_config(&Config::load()?)?;
//! let mut batcher = QuadBatcher::new();
//! let width = renderer.draw("§cHealth: §f20", 4.0, 4.0, 0xffff_ffff, false, &mut batcher)?;
//! # let _ = width;
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod cache;
mod digits;
pub mod error;
pub mod escape_codes;
mod extractor;
pub mod identity;
pub mod layout;
pub mod palette;
pub mod renderer;
pub mod segmenter;

pub use batch::{DrawCall, QuadBatcher, TextVertex};
pub use cache::{CacheStats, LayoutCache};
pub use error::LayoutError;
pub use escape_codes::{MARKER, RenderStyle, StyleChange, StrippedText, strip_codes};
pub use identity::{StringIdentity, TextHandle, normalize_digits};
pub use layout::{LayoutEntry, PositionedGlyph};
pub use palette::Palette;
pub use renderer::{DrawSink, SolidQuad, StringRenderer, TexturedQuad};

pub use glyphstring_config::{Config, ConfigError, DecorationConfig};
pub use glyphstring_fonts::{
    Direction, FontGlyphProvider, FontId, FontStyle, GlyphHandle, GlyphProvider, ProviderError,
    ShapedGlyph, ShapedRun, TextureId,
};
