//! Typed error types for glyphstring.
//!
//! Layout and rendering only fail when the glyph provider fails or when the
//! renderer cannot be set up. Empty input, unsupported characters and
//! unrecognized style codes are handled locally and never surface here.

use glyphstring_config::ConfigError;
use glyphstring_fonts::{FontStyle, ProviderError};
use thiserror::Error;

/// Top-level error type for the layout engine.
#[derive(Debug, Error)]
pub enum LayoutError {
    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------
    /// The glyph provider failed while shaping or rasterizing a string.
    ///
    /// The string being laid out is not cached; the next request retries.
    #[error("Glyph provider failed: {0}")]
    Provider(#[from] ProviderError),

    // -----------------------------------------------------------------------
    // Renderer setup
    // -----------------------------------------------------------------------
    /// Laying out the digit strings did not produce a glyph for every digit.
    #[error("Digit bootstrap produced no glyph for '{digit}' in style {style:?}")]
    DigitBootstrap {
        /// Font style of the bootstrap string.
        style: FontStyle,
        /// The digit without a glyph.
        digit: char,
    },

    /// The configuration handed to the renderer is invalid.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
