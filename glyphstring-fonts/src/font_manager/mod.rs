//! Font management with a fallback chain for Unicode coverage.
//!
//! This module provides font loading and fallback lookup. It supports:
//! - Primary font with bold/italic/bold-italic variants
//! - Automatic fallback chain for characters the styled font lacks
//! - Coverage queries over whole character ranges

mod fallbacks;
mod loader;
mod types;

use std::ops::Range;

use anyhow::Result;
use fontdb::Database;
use swash::FontRef;

use crate::error::FontError;
use crate::provider::FontStyle;

pub use fallbacks::FALLBACK_FAMILIES;
pub use types::FontData;

/// Number of font slots reserved for the styled variants.
pub const STYLED_FONT_SLOTS: usize = 4;

/// Manages multiple fonts with fallback chain.
///
/// Font indices are assigned as follows:
/// - 0: Primary/regular font
/// - 1: Bold font (if available)
/// - 2: Italic font (if available)
/// - 3: Bold-italic font (if available)
/// - 4..: Fallback fonts
pub struct FontManager {
    /// Primary font (regular weight)
    primary: FontData,

    /// Bold font (optional, falls back to primary if not loaded)
    bold: Option<FontData>,

    /// Italic font (optional, falls back to primary if not loaded)
    italic: Option<FontData>,

    /// Bold italic font (optional, falls back to primary if not loaded)
    bold_italic: Option<FontData>,

    /// Fallback fonts in priority order
    fallbacks: Vec<FontData>,
}

impl FontManager {
    /// Create a new FontManager with primary font and system fallbacks.
    ///
    /// # Arguments
    /// * `primary_family` - Regular/normal weight font family name
    /// * `bold_family` - Bold font family name (defaults to the primary family)
    /// * `italic_family` - Italic font family name (defaults to the primary family)
    /// * `bold_italic_family` - Bold italic font family name (defaults to the primary family)
    pub fn new(
        primary_family: Option<&str>,
        bold_family: Option<&str>,
        italic_family: Option<&str>,
        bold_italic_family: Option<&str>,
    ) -> Result<Self> {
        let mut font_db = Database::new();
        font_db.load_system_fonts();
        log::info!("Loaded {} system fonts", font_db.len());

        let fallbacks = Self::build_fallback_chain(&font_db);
        log::info!("Loaded {} fallback fonts", fallbacks.len());

        let primary = Self::load_primary_font(&font_db, primary_family)?;

        // Styled variants default to the primary family at the matching weight/style
        let bold = Self::load_styled_font(
            &font_db,
            bold_family.or(primary_family),
            "bold",
            fontdb::Weight::BOLD,
            None,
        );
        let italic = Self::load_styled_font(
            &font_db,
            italic_family.or(primary_family),
            "italic",
            fontdb::Weight::NORMAL,
            Some(fontdb::Style::Italic),
        );
        let bold_italic = Self::load_styled_font(
            &font_db,
            bold_italic_family.or(primary_family),
            "bold italic",
            fontdb::Weight::BOLD,
            Some(fontdb::Style::Italic),
        );

        Ok(FontManager {
            primary,
            bold,
            italic,
            bold_italic,
            fallbacks,
        })
    }

    /// Build a manager from already loaded fonts, without styled variants.
    pub fn from_fonts(primary: FontData, fallbacks: Vec<FontData>) -> Self {
        FontManager {
            primary,
            bold: None,
            italic: None,
            bold_italic: None,
            fallbacks,
        }
    }

    /// Load the primary font, trying the configured family, then the fallback
    /// chain, then the database's generic sans-serif face.
    fn load_primary_font(font_db: &Database, family: Option<&str>) -> Result<FontData> {
        if let Some(family_name) = family {
            log::info!("Attempting to load primary font: {}", family_name);
            if let Some(font_data) = loader::load_font_from_db(font_db, family_name) {
                log::info!("Successfully loaded primary font: {}", family_name);
                return Ok(font_data);
            }
            log::warn!("Primary font '{}' not found, trying fallback families", family_name);
        }

        for family_name in FALLBACK_FAMILIES {
            if let Some(font_data) = loader::load_font_from_db(font_db, family_name) {
                log::info!("Using '{}' as primary font", family_name);
                return Ok(font_data);
            }
        }

        if let Some(font_data) = loader::load_sans_serif_from_db(font_db) {
            log::info!("Using generic sans-serif face as primary font");
            return Ok(font_data);
        }

        Err(FontError::NoFontsAvailable {
            tried: FALLBACK_FAMILIES.len() + family.is_some() as usize + 1,
        }
        .into())
    }

    /// Build the fallback font chain from available system fonts.
    fn build_fallback_chain(font_db: &Database) -> Vec<FontData> {
        let mut fallbacks = Vec::new();
        for family_name in FALLBACK_FAMILIES {
            if let Some(font_data) = loader::load_font_from_db(font_db, family_name) {
                log::debug!("Added fallback font: {}", family_name);
                fallbacks.push(font_data);
            }
        }
        fallbacks
    }

    /// Load a styled font variant (bold, italic, or bold-italic).
    fn load_styled_font(
        font_db: &Database,
        family: Option<&str>,
        style_name: &str,
        weight: fontdb::Weight,
        style: Option<fontdb::Style>,
    ) -> Option<FontData> {
        let family_name = family?;
        let font_data = loader::load_font_from_db_with_style(
            font_db,
            fontdb::Family::Name(family_name),
            Some(weight),
            style,
        );
        if font_data.is_some() {
            log::info!("Loaded {} font: {}", style_name, family_name);
        } else {
            log::warn!(
                "No {} face for '{}', will use primary font",
                style_name,
                family_name
            );
        }
        font_data
    }

    /// Index of the font that renders `style`, falling back to the primary font
    /// when the variant is not loaded.
    pub fn styled_font_index(&self, style: FontStyle) -> usize {
        match (style.bold, style.italic) {
            (true, true) if self.bold_italic.is_some() => 3,
            (true, false) if self.bold.is_some() => 1,
            (false, true) if self.italic.is_some() => 2,
            _ => 0,
        }
    }

    /// Pick the font that should render text starting at `start`.
    ///
    /// The styled font wins if it covers the first character; otherwise the
    /// first fallback that covers it. If nothing covers it, the styled font is
    /// returned so its missing-glyph representation is drawn.
    pub fn lookup_font(&self, text: &[char], start: usize, style: FontStyle) -> usize {
        let styled = self.styled_font_index(style);
        let Some(&first) = text.get(start) else {
            return styled;
        };

        if self.font_data(styled).is_some_and(|f| f.has_glyph(first)) {
            return styled;
        }

        for (offset, fallback) in self.fallbacks.iter().enumerate() {
            if fallback.has_glyph(first) {
                log::debug!(
                    "Character '{}' (U+{:04X}) found in fallback font index {}",
                    first,
                    first as u32,
                    STYLED_FONT_SLOTS + offset
                );
                return STYLED_FONT_SLOTS + offset;
            }
        }

        log::debug!(
            "Character '{}' (U+{:04X}) not found in any font ({} total fonts)",
            first,
            first as u32,
            self.font_count()
        );
        styled
    }

    /// Index of the first character in `range` that `font_index` cannot render.
    pub fn can_display_up_to(
        &self,
        font_index: usize,
        text: &[char],
        range: Range<usize>,
    ) -> Option<usize> {
        let Some(font) = self.font_data(font_index) else {
            return Some(range.start);
        };
        range.clone().find(|&i| !font.has_glyph(text[i]))
    }

    /// Get loaded font data by index.
    pub fn font_data(&self, font_index: usize) -> Option<&FontData> {
        match font_index {
            0 => Some(&self.primary),
            1 => self.bold.as_ref(),
            2 => self.italic.as_ref(),
            3 => self.bold_italic.as_ref(),
            idx => self.fallbacks.get(idx - STYLED_FONT_SLOTS),
        }
    }

    /// Get font reference by index.
    pub fn get_font(&self, font_index: usize) -> Option<FontRef<'_>> {
        self.font_data(font_index).map(FontData::font_ref)
    }

    /// Get number of fonts loaded (primary + styled + fallbacks).
    pub fn font_count(&self) -> usize {
        let styled_count = 1
            + self.bold.is_some() as usize
            + self.italic.is_some() as usize
            + self.bold_italic.is_some() as usize;
        styled_count + self.fallbacks.len()
    }
}
