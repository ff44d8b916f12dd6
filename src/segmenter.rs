//! Splits stripped text into runs that can each be shaped in one call.
//!
//! Three nested passes:
//! 1. direction: Unicode bidi runs, laid out in visual order
//! 2. style: bold/italic changes from the escape codes
//! 3. font: fallback fonts for characters the styled font cannot render
//!
//! Every run shares one cumulative advance, so each starts where the previous
//! visual run ended.

use std::ops::Range;

use glyphstring_fonts::{Direction, FontStyle, GlyphProvider};
use unicode_bidi::{BidiClass, BidiInfo, bidi_class};

use crate::error::LayoutError;
use crate::escape_codes::StyleChange;
use crate::extractor::extract_glyphs;
use crate::layout::PositionedGlyph;

/// Whether any character needs the full bidirectional algorithm.
pub fn requires_bidi(text: &[char]) -> bool {
    text.iter().any(|&c| {
        matches!(
            bidi_class(c),
            BidiClass::R
                | BidiClass::AL
                | BidiClass::AN
                | BidiClass::RLE
                | BidiClass::RLO
                | BidiClass::RLI
                | BidiClass::LRE
                | BidiClass::LRO
                | BidiClass::LRI
                | BidiClass::FSI
                | BidiClass::PDF
                | BidiClass::PDI
        )
    })
}

/// Runs of `text` in left-to-right visual order, with their direction.
///
/// Ranges are character ranges into `text`.
pub fn visual_runs(text: &[char]) -> Vec<(Range<usize>, Direction)> {
    if !requires_bidi(text) {
        return vec![(0..text.len(), Direction::LeftToRight)];
    }

    let s: String = text.iter().collect();
    let mut byte_to_char = vec![text.len(); s.len() + 1];
    for (char_index, (byte_index, c)) in s.char_indices().enumerate() {
        byte_to_char[byte_index..byte_index + c.len_utf8()].fill(char_index);
    }

    let info = BidiInfo::new(&s, None);
    if info.levels.iter().all(|level| level.is_rtl()) {
        return vec![(0..text.len(), Direction::RightToLeft)];
    }

    let mut runs = Vec::new();
    for paragraph in &info.paragraphs {
        let (levels, level_runs) = info.visual_runs(paragraph, paragraph.range.clone());
        for run in level_runs {
            let direction = if levels[run.start].is_rtl() {
                Direction::RightToLeft
            } else {
                Direction::LeftToRight
            };
            runs.push((byte_to_char[run.start]..byte_to_char[run.end], direction));
        }
    }
    runs
}

/// Lays out a stripped string through the three passes.
pub(crate) struct Segmenter<'a, P: GlyphProvider + ?Sized> {
    provider: &'a mut P,
    style_changes: &'a [StyleChange],
    glyphs: Vec<PositionedGlyph>,
}

impl<'a, P: GlyphProvider + ?Sized> Segmenter<'a, P> {
    pub(crate) fn new(provider: &'a mut P, style_changes: &'a [StyleChange]) -> Self {
        Self {
            provider,
            style_changes,
            glyphs: Vec::new(),
        }
    }

    /// Lay out the whole of `text`, returning the total advance and the glyphs
    /// in visual order.
    ///
    /// With `substitute_digits`, every ASCII digit is shaped as `'0'` so that
    /// all digits share one advance and can be swapped when drawing.
    pub(crate) fn layout(
        mut self,
        text: &[char],
        substitute_digits: bool,
    ) -> Result<(i32, Vec<PositionedGlyph>), LayoutError> {
        let substituted: Vec<char>;
        let text = if substitute_digits && text.iter().any(char::is_ascii_digit) {
            substituted = text
                .iter()
                .map(|&c| if c.is_ascii_digit() { '0' } else { c })
                .collect();
            &substituted[..]
        } else {
            text
        };

        let mut advance = 0;
        for (range, direction) in visual_runs(text) {
            advance = self.layout_style(text, range, direction, advance)?;
        }
        Ok((advance, self.glyphs))
    }

    /// Split one direction run wherever the bold/italic combination changes.
    fn layout_style(
        &mut self,
        text: &[char],
        range: Range<usize>,
        direction: Direction,
        mut advance: i32,
    ) -> Result<i32, LayoutError> {
        let changes = self.style_changes;
        let limit = range.end;

        // Style in effect at the run start is the last change at or before it
        let mut cursor = changes.partition_point(|c| c.stripped_index <= range.start);
        let mut style = cursor
            .checked_sub(1)
            .map_or(FontStyle::PLAIN, |i| changes[i].font_style);

        let mut start = range.start;
        while cursor < changes.len() && changes[cursor].stripped_index < limit {
            let at = changes[cursor].stripped_index;
            // Among changes sharing a stripped index, the last one wins
            while cursor + 1 < changes.len() && changes[cursor + 1].stripped_index == at {
                cursor += 1;
            }

            let next_style = changes[cursor].font_style;
            if next_style != style {
                if at > start {
                    advance = self.layout_fonts(text, start..at, direction, style, advance)?;
                }
                start = at;
                style = next_style;
            }
            cursor += 1;
        }

        if start < limit {
            advance = self.layout_fonts(text, start..limit, direction, style, advance)?;
        }
        Ok(advance)
    }

    /// Split one styled segment into runs that a single font can render.
    fn layout_fonts(
        &mut self,
        text: &[char],
        range: Range<usize>,
        direction: Direction,
        style: FontStyle,
        mut advance: i32,
    ) -> Result<i32, LayoutError> {
        let limit = range.end;
        let mut start = range.start;
        while start < limit {
            let font = self.provider.resolve_font(text, start..limit, style)?;
            let mut next = self
                .provider
                .unsupported_prefix_end(font, text, start..limit)
                .unwrap_or(limit);

            // Nothing renders the first character: draw it alone with the
            // font's missing glyph and retry from the next one
            if next == start {
                next += 1;
            }

            log::trace!("Segment {}..{} uses {:?} ({:?})", start, next, font, style);
            advance = extract_glyphs(
                self.provider,
                text,
                start..next,
                font,
                direction,
                advance,
                &mut self.glyphs,
            )?;
            start = next;
        }
        Ok(advance)
    }
}
