//! Laid-out strings.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glyphstring_fonts::{GlyphHandle, GlyphProvider};

use crate::error::LayoutError;
use crate::escape_codes::{StyleChange, strip_codes};
use crate::identity::StringIdentity;
use crate::segmenter::Segmenter;

/// One glyph of a laid-out string.
///
/// Positions and advances are in layout units, twice the drawing resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedGlyph {
    /// Character index of the glyph's source in the original string
    pub original_index: usize,
    pub handle: GlyphHandle,
    /// Left edge of the glyph image from the start of the string
    pub x: i32,
    /// Top edge of the glyph image from the baseline
    pub y: i32,
    /// Pen distance to the next glyph in visual order; the advances of a
    /// string sum to its total advance
    pub advance: i32,
}

/// Cached layout of one string, shared by every string with the same
/// digit-normalized form.
#[derive(Debug)]
pub struct LayoutEntry {
    advance: i32,
    glyphs: Vec<PositionedGlyph>,
    style_changes: Vec<StyleChange>,
    has_decorations: bool,
    identity: RefCell<Weak<StringIdentity>>,
}

impl LayoutEntry {
    /// Total advance of the string in layout units.
    pub fn advance(&self) -> i32 {
        self.advance
    }

    /// Glyphs sorted by `original_index`.
    pub fn glyphs(&self) -> &[PositionedGlyph] {
        &self.glyphs
    }

    pub fn style_changes(&self) -> &[StyleChange] {
        &self.style_changes
    }

    /// Whether the string contains underline or strikethrough codes.
    pub fn has_decorations(&self) -> bool {
        self.has_decorations
    }

    /// The identity keeping this entry alive, if it is still reachable.
    pub fn identity(&self) -> Option<Rc<StringIdentity>> {
        self.identity.borrow().upgrade()
    }

    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        LayoutEntry {
            advance: 0,
            glyphs: Vec::new(),
            style_changes: Vec::new(),
            has_decorations: false,
            identity: RefCell::new(Weak::new()),
        }
    }

    pub(crate) fn set_identity(&self, identity: &Rc<StringIdentity>) {
        *self.identity.borrow_mut() = Rc::downgrade(identity);
    }
}

/// Lay out `s` from scratch.
///
/// Codes are stripped, the remaining text is segmented and shaped, and glyph
/// indices are mapped back onto `s`. The returned entry has no identity yet.
pub(crate) fn build_layout<P: GlyphProvider + ?Sized>(
    provider: &mut P,
    s: &str,
    substitute_digits: bool,
) -> Result<LayoutEntry, LayoutError> {
    let original: Vec<char> = s.chars().collect();
    let stripped = strip_codes(&original);

    let (advance, mut glyphs) = Segmenter::new(provider, &stripped.style_changes)
        .layout(&stripped.text, substitute_digits)?;

    // Logical order, so glyphs can be walked alongside the style changes
    glyphs.sort_by_key(|g| g.original_index);

    // Every removed pair at or before a glyph's position shifts it by two.
    // Consecutive pairs with nothing between them are crossed in one go.
    let mut removed = stripped.removed.iter().peekable();
    let mut shift = 0;
    for glyph in &mut glyphs {
        while removed.next_if(|&&at| glyph.original_index + shift >= at).is_some() {
            shift += 2;
        }
        glyph.original_index += shift;
    }

    Ok(LayoutEntry {
        advance,
        glyphs,
        style_changes: stripped.style_changes,
        has_decorations: stripped.has_decorations,
        identity: RefCell::new(Weak::new()),
    })
}
