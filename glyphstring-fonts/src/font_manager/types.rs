//! Font data types for font management.

use std::sync::Arc;
use swash::{CacheKey, FontRef};

/// Stores font data together with the location of one face inside it.
///
/// The raw bytes are shared, so cloning is cheap. A `FontRef` is rebuilt on
/// demand from the stored offset and cache key instead of being kept with an
/// extended lifetime.
#[derive(Clone)]
pub struct FontData {
    /// Raw font data bytes (TTF/OTF/TTC)
    pub data: Arc<Vec<u8>>,
    /// Face index within the font data (0 for single-face fonts)
    pub face_index: u32,
    offset: u32,
    key: CacheKey,
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("data_len", &self.data.len())
            .field("face_index", &self.face_index)
            .finish()
    }
}

impl FontData {
    /// Create a new FontData from bytes using face index 0.
    ///
    /// # Returns
    /// `Some(FontData)` if the font data is valid, `None` otherwise.
    pub fn new(data: Vec<u8>) -> Option<Self> {
        Self::new_with_index(data, 0)
    }

    /// Create a new FontData from bytes with a specific face index.
    ///
    /// This is needed for TrueType Collection (.ttc) files where multiple
    /// font faces share the same data but have different face indices.
    pub fn new_with_index(data: Vec<u8>, face_index: usize) -> Option<Self> {
        let (offset, key) = {
            let font = FontRef::from_index(&data, face_index)?;
            (font.offset, font.key)
        };

        Some(FontData {
            data: Arc::new(data),
            face_index: face_index as u32,
            offset,
            key,
        })
    }

    /// Borrow a swash font reference for glyph operations.
    pub fn font_ref(&self) -> FontRef<'_> {
        FontRef {
            data: self.data.as_slice(),
            offset: self.offset,
            key: self.key,
        }
    }

    /// Whether the font's character map covers `character`.
    pub fn has_glyph(&self, character: char) -> bool {
        self.font_ref().charmap().map(character) != 0
    }
}
