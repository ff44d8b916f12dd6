//! Per-style glyphs for the ASCII digits.
//!
//! Strings are laid out with every digit shaped as `0`, so one layout serves
//! all strings that differ only in their digits. The real digit glyphs are
//! looked up here at draw time.

use glyphstring_fonts::{FontStyle, GlyphHandle};

use crate::error::LayoutError;
use crate::escape_codes::MARKER;
use crate::layout::LayoutEntry;

/// The strings laid out once, without digit substitution, to collect digit
/// glyphs for each font style.
pub(crate) fn bootstrap_strings() -> [(FontStyle, String); 4] {
    let digits = "0123456789";
    [
        (FontStyle::PLAIN, digits.to_string()),
        (FontStyle::BOLD, format!("{MARKER}l{digits}")),
        (FontStyle::ITALIC, format!("{MARKER}o{digits}")),
        (FontStyle::BOLD_ITALIC, format!("{MARKER}l{MARKER}o{digits}")),
    ]
}

#[derive(Debug, Clone, Default)]
pub(crate) struct DigitGlyphs {
    handles: [[Option<GlyphHandle>; 10]; 4],
}

impl DigitGlyphs {
    /// Record the digit glyphs of a bootstrap layout of `text`.
    pub(crate) fn collect(
        &mut self,
        style: FontStyle,
        text: &str,
        entry: &LayoutEntry,
    ) -> Result<(), LayoutError> {
        let chars: Vec<char> = text.chars().collect();
        let slots = &mut self.handles[style.index()];
        for glyph in entry.glyphs() {
            if let Some(digit) = chars.get(glyph.original_index).and_then(|c| c.to_digit(10)) {
                slots[digit as usize].get_or_insert(glyph.handle);
            }
        }

        match slots.iter().position(Option::is_none) {
            Some(missing) => Err(LayoutError::DigitBootstrap {
                style,
                digit: char::from(b'0' + missing as u8),
            }),
            None => Ok(()),
        }
    }

    /// The glyph for ASCII digit `c` in `style`.
    pub(crate) fn get(&self, style: FontStyle, c: char) -> Option<GlyphHandle> {
        let digit = c.to_digit(10)?;
        self.handles[style.index()][digit as usize]
    }
}
