//! Converts shaped runs into positioned glyphs.

use std::ops::Range;

use glyphstring_fonts::{Direction, FontId, GlyphProvider};

use crate::error::LayoutError;
use crate::layout::PositionedGlyph;

/// Shape `text[range]` with `font` and append its glyphs to `glyphs`.
///
/// `advance` is the pen position where this run starts; the pen position
/// after the run is returned. Glyph indices are stripped-text indices.
pub(crate) fn extract_glyphs<P: GlyphProvider + ?Sized>(
    provider: &mut P,
    text: &[char],
    range: Range<usize>,
    font: FontId,
    direction: Direction,
    advance: i32,
    glyphs: &mut Vec<PositionedGlyph>,
) -> Result<i32, LayoutError> {
    provider.ensure_rasterized(font, text, range.clone(), direction)?;
    let run = provider.shape(font, text, range.clone(), direction)?;

    // Advances run pen to pen, so a glyph's bearing never changes the width
    // of the run
    let first = glyphs.len();
    let mut previous_origin = 0;
    for shaped in &run.glyphs {
        let handle = provider.lookup_glyph(font, shaped.glyph_code)?;
        let origin = advance + shaped.origin.round() as i32;

        if let Some(previous) = glyphs[first..].last_mut() {
            previous.advance = origin - previous_origin;
        }
        previous_origin = origin;

        glyphs.push(PositionedGlyph {
            original_index: range.start + shaped.char_index,
            handle,
            x: advance + shaped.x.round() as i32,
            y: shaped.y.round() as i32,
            advance: 0,
        });
    }

    let end = advance + run.advance.round() as i32;
    if let Some(last) = glyphs[first..].last_mut() {
        last.advance = end - previous_origin;
    }

    log::trace!(
        "Extracted {} glyphs for {:?} with {:?} ({:?})",
        run.glyphs.len(),
        range,
        font,
        direction
    );
    Ok(end)
}
