//! Inline style escape codes.
//!
//! A code is the marker `§` followed by one case-insensitive character from
//! `0123456789abcdefklmnor`. Hex digits select one of 16 colors, `l`/`m`/`n`/`o`
//! turn on bold/strikethrough/underline/italic, `r` resets everything and `k`
//! is accepted but has no effect.
//!
//! Codes are removed before layout so that contextual shaping (for example
//! Arabic joining forms) sees the text as one run. Each recognized code is
//! recorded as a [`StyleChange`] carrying the complete style in effect from
//! that point on.

use glyphstring_fonts::FontStyle;

/// The escape marker character (U+00A7 SECTION SIGN).
pub const MARKER: char = '\u{00A7}';

const CODES: &str = "0123456789abcdefklmnor";

/// Underline and strikethrough flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RenderStyle {
    pub underline: bool,
    pub strikethrough: bool,
}

impl RenderStyle {
    pub fn is_decorated(self) -> bool {
        self.underline || self.strikethrough
    }
}

/// Style in effect from one code position onwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleChange {
    /// Position of the marker in the original string
    pub original_index: usize,
    /// Position in the stripped string where the style starts to apply
    pub stripped_index: usize,
    /// Palette color 0-15, or `None` for the caller's color
    pub color: Option<u8>,
    pub font_style: FontStyle,
    pub render_style: RenderStyle,
}

/// Result of removing every escape code from a string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrippedText {
    pub text: Vec<char>,
    pub style_changes: Vec<StyleChange>,
    /// Original index of every removed two-character pair, ascending
    pub removed: Vec<usize>,
    /// Set when an underline or strikethrough code appears anywhere
    pub has_decorations: bool,
}

/// Current style while scanning a string.
#[derive(Debug, Clone, Copy, Default)]
struct StyleState {
    color: Option<u8>,
    font_style: FontStyle,
    render_style: RenderStyle,
}

impl StyleState {
    /// Apply one code; returns false if `code` is not part of the alphabet.
    fn apply(&mut self, code: char) -> bool {
        let Some(index) = CODES.find(code.to_ascii_lowercase()) else {
            return false;
        };
        match index {
            0..=15 => {
                // A color code also resets style flags
                *self = StyleState {
                    color: Some(index as u8),
                    ..StyleState::default()
                };
            }
            16 => {}
            17 => self.font_style.bold = true,
            18 => self.render_style.strikethrough = true,
            19 => self.render_style.underline = true,
            20 => self.font_style.italic = true,
            _ => *self = StyleState::default(),
        }
        true
    }
}

/// Remove every escape code from `original`.
///
/// A marker at the very end of the string is not a code and is kept. A marker
/// followed by a character outside the code alphabet is removed together with
/// that character but produces no style change.
pub fn strip_codes(original: &[char]) -> StrippedText {
    let mut stripped = StrippedText {
        text: Vec::with_capacity(original.len()),
        ..StrippedText::default()
    };
    let mut state = StyleState::default();

    let mut i = 0;
    while i < original.len() {
        let c = original[i];
        if c != MARKER || i + 1 >= original.len() {
            stripped.text.push(c);
            i += 1;
            continue;
        }

        stripped.removed.push(i);
        if state.apply(original[i + 1]) {
            stripped.has_decorations |= state.render_style.is_decorated();
            stripped.style_changes.push(StyleChange {
                original_index: i,
                stripped_index: stripped.text.len(),
                color: state.color,
                font_style: state.font_style,
                render_style: state.render_style,
            });
        }
        i += 2;
    }

    stripped
}
