//! Glyph atlas: rasterizes glyphs with swash and packs them into RGBA pages.
//!
//! Pages are square, allocated on demand, and never evicted. Each page carries
//! a dirty flag so the embedder can upload only pages that changed since the
//! last frame. Glyphs are packed in shelves (rows) with a small padding.

use std::collections::HashMap;

use swash::FontRef;
use swash::scale::image::{Content, Image};
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::Format;

use crate::error::FontError;
use crate::provider::{GlyphHandle, TextureId};

const PADDING: u32 = 2;

/// One RGBA texture page of the atlas.
#[derive(Debug)]
pub struct AtlasPage {
    pub texture: TextureId,
    pub size: u32,
    /// Row-major RGBA8 pixels, `size * size * 4` bytes
    pub pixels: Vec<u8>,
    dirty: bool,
    next_x: u32,
    next_y: u32,
    row_height: u32,
}

impl AtlasPage {
    fn new(texture: TextureId, size: u32) -> Self {
        Self {
            texture,
            size,
            pixels: vec![0; (size * size * 4) as usize],
            dirty: false,
            next_x: 0,
            next_y: 0,
            row_height: 0,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Reserve a `width` x `height` rectangle on this page.
    fn allocate(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        if self.next_x + width + PADDING > self.size {
            self.next_x = 0;
            self.next_y += self.row_height + PADDING;
            self.row_height = 0;
        }
        if self.next_y + height + PADDING > self.size || width + PADDING > self.size {
            return None;
        }

        let origin = (self.next_x, self.next_y);
        self.next_x += width + PADDING;
        self.row_height = self.row_height.max(height);
        Some(origin)
    }

    fn blit(&mut self, x: u32, y: u32, raster: &RasterizedGlyph) {
        let row_bytes = (raster.width * 4) as usize;
        for row in 0..raster.height {
            let src = (row * raster.width * 4) as usize;
            let dst = (((y + row) * self.size + x) * 4) as usize;
            self.pixels[dst..dst + row_bytes].copy_from_slice(&raster.pixels[src..src + row_bytes]);
        }
        self.dirty = true;
    }
}

/// Cached atlas location plus placement metrics of one glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasEntry {
    pub handle: GlyphHandle,
    /// Offset from the pen position to the left edge of the image
    pub bearing_x: f32,
    /// Offset from the baseline up to the top edge of the image
    pub bearing_y: f32,
}

pub(crate) struct RasterizedGlyph {
    pub width: u32,
    pub height: u32,
    pub bearing_x: f32,
    pub bearing_y: f32,
    pub pixels: Vec<u8>,
}

/// Rasterizes glyphs on demand and stores them in texture pages.
pub struct GlyphAtlas {
    page_size: u32,
    antialias: bool,
    pages: Vec<AtlasPage>,
    entries: HashMap<(usize, u16), AtlasEntry>,
    context: ScaleContext,
}

impl GlyphAtlas {
    pub fn new(page_size: u32, antialias: bool) -> Self {
        Self {
            page_size,
            antialias,
            pages: Vec::new(),
            entries: HashMap::new(),
            context: ScaleContext::new(),
        }
    }

    pub fn pages(&self) -> &[AtlasPage] {
        &self.pages
    }

    /// Clear the dirty flag of every page after the embedder uploaded them.
    pub fn mark_clean(&mut self) {
        for page in &mut self.pages {
            page.dirty = false;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, font_index: usize, glyph_id: u16) -> Option<&AtlasEntry> {
        self.entries.get(&(font_index, glyph_id))
    }

    /// Return the cached entry for a glyph, rasterizing and packing it first if needed.
    pub fn get_or_insert(
        &mut self,
        font: FontRef<'_>,
        font_index: usize,
        glyph_id: u16,
        pixel_size: f32,
    ) -> Result<AtlasEntry, FontError> {
        if let Some(entry) = self.entries.get(&(font_index, glyph_id)) {
            return Ok(*entry);
        }

        let raster = self.rasterize(font, glyph_id, pixel_size);
        let entry = self.insert(glyph_id, &raster)?;
        self.entries.insert((font_index, glyph_id), entry);
        log::trace!(
            "Rasterized glyph {} of font {} ({}x{})",
            glyph_id,
            font_index,
            raster.width,
            raster.height
        );
        Ok(entry)
    }

    fn rasterize(&mut self, font: FontRef<'_>, glyph_id: u16, pixel_size: f32) -> RasterizedGlyph {
        let mut scaler = self.context.builder(font).size(pixel_size).hint(true).build();

        // Color sources first so emoji fonts render as colored bitmaps; regular
        // text fonts fall through to Outline.
        let image = Render::new(&[
            Source::ColorBitmap(StrikeWith::BestFit),
            Source::ColorOutline(0),
            Source::Outline,
        ])
        .format(Format::Alpha)
        .render(&mut scaler, glyph_id);

        match image {
            Some(image) => RasterizedGlyph {
                width: image.placement.width,
                height: image.placement.height,
                bearing_x: image.placement.left as f32,
                bearing_y: image.placement.top as f32,
                pixels: self.to_rgba(&image),
            },
            // Whitespace and other outline-less glyphs
            None => RasterizedGlyph {
                width: 0,
                height: 0,
                bearing_x: 0.0,
                bearing_y: 0.0,
                pixels: Vec::new(),
            },
        }
    }

    fn to_rgba(&self, image: &Image) -> Vec<u8> {
        match image.content {
            Content::Color => image.data.clone(),
            Content::Mask => {
                let mut pixels = Vec::with_capacity(image.data.len() * 4);
                for &mask in &image.data {
                    // Without anti-aliasing, threshold the alpha to create crisp edges
                    let alpha = if !self.antialias {
                        if mask > 127 { 255 } else { 0 }
                    } else {
                        mask
                    };
                    pixels.extend_from_slice(&[255, 255, 255, alpha]);
                }
                pixels
            }
            Content::SubpixelMask => {
                let count = (image.placement.width * image.placement.height) as usize;
                let stride = if count > 0 { image.data.len() / count } else { 0 };
                let mut pixels = Vec::with_capacity(count * 4);
                if stride >= 3 {
                    for chunk in image.data.chunks_exact(stride) {
                        let alpha = ((chunk[0] as u32 * 299 + chunk[1] as u32 * 587 + chunk[2] as u32 * 114)
                            / 1000) as u8;
                        pixels.extend_from_slice(&[255, 255, 255, alpha]);
                    }
                } else {
                    pixels.resize(count * 4, 255);
                }
                pixels
            }
        }
    }

    fn insert(&mut self, glyph_id: u16, raster: &RasterizedGlyph) -> Result<AtlasEntry, FontError> {
        if raster.width + PADDING > self.page_size || raster.height + PADDING > self.page_size {
            return Err(FontError::GlyphTooLarge {
                glyph_id,
                width: raster.width,
                height: raster.height,
                page_size: self.page_size,
            });
        }

        if self.pages.is_empty() {
            self.push_page();
        }

        let empty = raster.width == 0 || raster.height == 0;
        let (page_index, x, y) = if empty {
            (self.pages.len() - 1, 0, 0)
        } else {
            let last = self.pages.len() - 1;
            match self.pages[last].allocate(raster.width, raster.height) {
                Some((x, y)) => (last, x, y),
                None => {
                    self.push_page();
                    let last = self.pages.len() - 1;
                    let (x, y) = self.pages[last]
                        .allocate(raster.width, raster.height)
                        .ok_or(FontError::GlyphTooLarge {
                            glyph_id,
                            width: raster.width,
                            height: raster.height,
                            page_size: self.page_size,
                        })?;
                    (last, x, y)
                }
            }
        };

        let page = &mut self.pages[page_index];
        if !empty {
            page.blit(x, y, raster);
        }

        let size = page.size as f32;
        Ok(AtlasEntry {
            handle: GlyphHandle {
                texture: page.texture,
                width: raster.width as i32,
                height: raster.height as i32,
                u1: x as f32 / size,
                v1: y as f32 / size,
                u2: (x + raster.width) as f32 / size,
                v2: (y + raster.height) as f32 / size,
            },
            bearing_x: raster.bearing_x,
            bearing_y: raster.bearing_y,
        })
    }

    fn push_page(&mut self) {
        // Texture ids start at 1; 0 is never handed out
        let texture = TextureId(self.pages.len() as u32 + 1);
        log::debug!("Allocating atlas page {:?} ({}x{})", texture, self.page_size, self.page_size);
        self.pages.push(AtlasPage::new(texture, self.page_size));
    }
}
