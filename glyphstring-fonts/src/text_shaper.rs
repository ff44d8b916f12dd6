//! Text shaping using HarfBuzz via rustybuzz.
//!
//! Shapes one directional run of characters with a single font and returns
//! glyph positions in pixels, in visual order. Cluster values reported by
//! rustybuzz are byte offsets into the shaped string; they are mapped back to
//! character indices relative to the start of the run.

use std::str::FromStr;

use rustybuzz::{Face, Feature, GlyphBuffer, UnicodeBuffer};

use crate::provider::Direction;

/// A single shaped glyph with positioning information, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPosition {
    /// Glyph ID from the font
    pub glyph_id: u32,

    /// Index of the first source character of this glyph's cluster
    pub char_index: usize,

    /// Horizontal advance width
    pub x_advance: f32,

    /// Horizontal offset from the current pen position
    pub x_offset: f32,

    /// Vertical offset from the baseline (positive is up)
    pub y_offset: f32,
}

/// Result of shaping one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedText {
    /// Glyphs in visual order
    pub glyphs: Vec<GlyphPosition>,

    /// Sum of all advances
    pub total_advance: f32,
}

/// Options for text shaping
#[derive(Debug, Clone)]
pub struct ShapingOptions {
    /// Enable standard and contextual ligatures
    pub enable_ligatures: bool,

    /// Enable kerning adjustments
    pub enable_kerning: bool,

    /// Enable contextual alternates
    pub enable_contextual_alternates: bool,
}

impl Default for ShapingOptions {
    fn default() -> Self {
        Self {
            enable_ligatures: true,
            enable_kerning: true,
            enable_contextual_alternates: true,
        }
    }
}

/// Text shaper using HarfBuzz via rustybuzz
#[derive(Debug)]
pub struct TextShaper {
    options: ShapingOptions,
    features: Vec<Feature>,
}

impl TextShaper {
    /// Create a new text shaper with default options
    pub fn new() -> Self {
        Self::with_options(ShapingOptions::default())
    }

    /// Create a text shaper with specific OpenType feature options
    pub fn with_options(options: ShapingOptions) -> Self {
        let features = Self::build_features(&options);
        Self { options, features }
    }

    pub fn options(&self) -> &ShapingOptions {
        &self.options
    }

    fn build_features(options: &ShapingOptions) -> Vec<Feature> {
        let mut names = Vec::new();
        if options.enable_ligatures {
            names.extend(["liga", "clig"]);
        }
        if options.enable_kerning {
            names.push("kern");
        }
        if options.enable_contextual_alternates {
            names.push("calt");
        }
        // Composition and localized forms are always needed for complex scripts
        names.extend(["ccmp", "locl"]);

        names
            .into_iter()
            .filter_map(|name| Feature::from_str(name).ok())
            .collect()
    }

    /// Shape `chars` with the face found at `face_index` inside `font_data`.
    ///
    /// # Arguments
    /// * `chars` - The run to shape
    /// * `font_data` - The font data (TrueType/OpenType/collection)
    /// * `face_index` - Face index inside a collection
    /// * `pixel_size` - Em size to scale font units to
    /// * `direction` - Run direction
    ///
    /// # Returns
    /// `None` if the font data cannot be parsed as a face.
    pub fn shape(
        &self,
        chars: &[char],
        font_data: &[u8],
        face_index: u32,
        pixel_size: f32,
        direction: Direction,
    ) -> Option<ShapedText> {
        let face = Face::from_slice(font_data, face_index)?;
        let units_per_em = face.units_per_em() as f32;
        let scale = if units_per_em > 0.0 {
            pixel_size / units_per_em
        } else {
            1.0
        };

        let mut text = String::with_capacity(chars.len());
        let mut byte_to_char = Vec::with_capacity(chars.len());
        for (char_index, &c) in chars.iter().enumerate() {
            byte_to_char.push((text.len(), char_index));
            text.push(c);
        }

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(&text);
        buffer.set_direction(match direction {
            Direction::LeftToRight => rustybuzz::Direction::LeftToRight,
            Direction::RightToLeft => rustybuzz::Direction::RightToLeft,
        });

        let glyph_buffer = rustybuzz::shape(&face, &self.features, buffer);
        let glyphs = Self::extract_glyphs(&glyph_buffer, &byte_to_char, scale);
        let total_advance = glyphs.iter().map(|g| g.x_advance).sum();

        Some(ShapedText {
            glyphs,
            total_advance,
        })
    }

    fn extract_glyphs(
        buffer: &GlyphBuffer,
        byte_to_char: &[(usize, usize)],
        scale: f32,
    ) -> Vec<GlyphPosition> {
        buffer
            .glyph_infos()
            .iter()
            .zip(buffer.glyph_positions())
            .map(|(info, pos)| GlyphPosition {
                glyph_id: info.glyph_id,
                char_index: cluster_to_char(byte_to_char, info.cluster as usize),
                x_advance: pos.x_advance as f32 * scale,
                x_offset: pos.x_offset as f32 * scale,
                y_offset: pos.y_offset as f32 * scale,
            })
            .collect()
    }
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a byte offset cluster to the character that starts at or before it.
fn cluster_to_char(byte_to_char: &[(usize, usize)], cluster: usize) -> usize {
    match byte_to_char.binary_search_by_key(&cluster, |&(byte, _)| byte) {
        Ok(i) => byte_to_char[i].1,
        Err(0) => 0,
        Err(i) => byte_to_char[i - 1].1,
    }
}
