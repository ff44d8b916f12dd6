//! String measuring and drawing on top of the layout cache.
//!
//! Coordinates passed in and returned are in caller units. Layouts are built
//! at twice that resolution, so every layout position is halved on the way
//! out.

use std::rc::Rc;

use glyphstring_config::{Config, DecorationConfig};
use glyphstring_fonts::{FontGlyphProvider, FontStyle, GlyphProvider, TextureId};

use crate::cache::LayoutCache;
use crate::digits::{DigitGlyphs, bootstrap_strings};
use crate::error::LayoutError;
use crate::escape_codes::RenderStyle;
use crate::identity::{StringIdentity, TextHandle};
use crate::layout::{LayoutEntry, build_layout};
use crate::palette::{Palette, rgba};

/// A textured glyph quad in caller coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexturedQuad {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub u1: f32,
    pub v1: f32,
    pub u2: f32,
    pub v2: f32,
}

/// An untextured quad (underline or strikethrough bar).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidQuad {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// Receives the quads produced by [`StringRenderer::draw`].
///
/// Quads take the most recent color and texture. A batch is started with
/// `begin_batch` and submitted with `flush`; textures only change between
/// batches.
pub trait DrawSink {
    fn begin_batch(&mut self);

    /// Color for subsequent quads, `[r, g, b, a]`
    fn set_color(&mut self, rgba: [u8; 4]);

    /// Texture for the next batch; `None` draws untextured quads
    fn bind_texture(&mut self, texture: Option<TextureId>);

    fn add_textured_quad(&mut self, quad: TexturedQuad);

    fn add_solid_quad(&mut self, quad: SolidQuad);

    fn flush(&mut self);
}

/// Measures, trims and draws strings with inline style codes.
pub struct StringRenderer<P: GlyphProvider> {
    provider: P,
    cache: LayoutCache,
    digits: DigitGlyphs,
    substitute_digits: bool,
    palette: Palette,
    decorations: DecorationConfig,
    /// Keeps the digit bootstrap layouts alive
    pinned: Vec<TextHandle>,
}

impl StringRenderer<FontGlyphProvider> {
    /// Load system fonts as configured and build a renderer over them.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = FontGlyphProvider::from_config(config)?;
        Ok(Self::new(provider, config)?)
    }
}

impl<P: GlyphProvider> StringRenderer<P> {
    /// Create a renderer and lay out the digit glyphs for every font style.
    pub fn new(provider: P, config: &Config) -> Result<Self, LayoutError> {
        config.validate()?;
        let mut renderer = Self {
            provider,
            cache: LayoutCache::new(config.retained_strings, config.sweep_interval),
            digits: DigitGlyphs::default(),
            substitute_digits: false,
            palette: Palette::from_colors(&config.palette)?,
            decorations: config.decorations,
            pinned: Vec::new(),
        };
        renderer.bootstrap_digits()?;
        Ok(renderer)
    }

    /// Create a renderer with the default configuration.
    pub fn with_defaults(provider: P) -> Result<Self, LayoutError> {
        Self::new(provider, &Config::default())
    }

    fn bootstrap_digits(&mut self) -> Result<(), LayoutError> {
        for (style, text) in bootstrap_strings() {
            let (entry, identity) = self.resolve(&text)?;
            self.digits.collect(style, &text, &entry)?;
            self.pinned.push(TextHandle::new(identity));
        }
        self.substitute_digits = true;
        log::info!("Digit glyphs ready for {} font styles", self.pinned.len());
        Ok(())
    }

    fn resolve(&mut self, s: &str) -> Result<(Rc<LayoutEntry>, Rc<StringIdentity>), LayoutError> {
        let provider = &mut self.provider;
        let substitute_digits = self.substitute_digits;
        self.cache
            .resolve(s, || build_layout(provider, s, substitute_digits))
    }

    /// The cached layout of `s`, building it if needed.
    pub fn get_or_layout(&mut self, s: &str) -> Result<Rc<LayoutEntry>, LayoutError> {
        self.resolve(s).map(|(entry, _)| entry)
    }

    /// Keep the layout of `s` cached for as long as the returned handle lives.
    pub fn retain(&mut self, s: &str) -> Result<TextHandle, LayoutError> {
        self.resolve(s).map(|(_, identity)| TextHandle::new(identity))
    }

    /// Width of `s` in caller units.
    pub fn measure(&mut self, s: &str) -> Result<i32, LayoutError> {
        if s.is_empty() {
            return Ok(0);
        }
        Ok(self.get_or_layout(s)?.advance() / 2)
    }

    /// Number of characters of `s` that fit in `max_width`.
    ///
    /// Glyph advances are summed in logical string order, not visual order.
    /// The result counts characters of the original string, escape codes
    /// included.
    pub fn fit_width(&mut self, s: &str, max_width: i32) -> Result<usize, LayoutError> {
        if s.is_empty() {
            return Ok(0);
        }
        let entry = self.get_or_layout(s)?;

        let mut advance = 0;
        for glyph in entry.glyphs() {
            let next = advance + glyph.advance;
            if next / 2 > max_width {
                return Ok(glyph.original_index);
            }
            advance = next;
        }
        Ok(s.chars().count())
    }

    /// The longest prefix of `s` that fits in `max_width`, optionally reversed.
    pub fn trim(&mut self, s: &str, max_width: i32, reversed: bool) -> Result<String, LayoutError> {
        let count = self.fit_width(s, max_width)?;
        let prefix = s.chars().take(count);
        Ok(if reversed {
            prefix.collect::<Vec<_>>().into_iter().rev().collect()
        } else {
            prefix.collect()
        })
    }

    /// Draw `s` with its top-left corner at `(x, y)`.
    ///
    /// `color` is `0xAARRGGBB`; color codes replace its RGB part. With
    /// `shadow`, codes select the darker shadow colors. Returns the advance
    /// in caller units.
    pub fn draw(
        &mut self,
        s: &str,
        x: f32,
        y: f32,
        color: u32,
        shadow: bool,
        sink: &mut dyn DrawSink,
    ) -> Result<i32, LayoutError> {
        if s.is_empty() {
            return Ok(0);
        }
        // The identity keeps the entry cached while it is being drawn
        let (entry, _identity) = self.resolve(s)?;
        let y = y + self.decorations.baseline_offset;

        self.draw_glyphs(&entry, s, x, y, color, shadow, sink);
        if entry.has_decorations() {
            self.draw_decorations(&entry, x, y, color, shadow, sink);
        }
        Ok(entry.advance() / 2)
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_glyphs(
        &self,
        entry: &LayoutEntry,
        s: &str,
        x: f32,
        y: f32,
        initial: u32,
        shadow: bool,
        sink: &mut dyn DrawSink,
    ) {
        let changes = entry.style_changes();
        let mut next_change = 0;
        let mut font_style = FontStyle::PLAIN;
        let mut bound: Option<TextureId> = None;
        let mut color = initial;
        let mut chars = CharCursor::new(s);

        sink.begin_batch();
        sink.set_color(rgba(color));

        for glyph in entry.glyphs() {
            // Multiple codes at one position: the last one wins
            let mut color_changed = false;
            while next_change < changes.len()
                && glyph.original_index >= changes[next_change].original_index
            {
                let change = &changes[next_change];
                color = self.palette.apply(change.color, initial, shadow);
                font_style = change.font_style;
                color_changed = true;
                next_change += 1;
            }
            if color_changed {
                sink.set_color(rgba(color));
            }

            let mut handle = glyph.handle;
            let mut glyph_x = glyph.x;
            if self.substitute_digits
                && let Some(c) = chars.char_at(glyph.original_index)
                && let Some(digit) = self.digits.get(font_style, c)
            {
                // Center the real digit over the placeholder
                glyph_x += (handle.width - digit.width) >> 1;
                handle = digit;
            }

            if bound != Some(handle.texture) {
                sink.flush();
                sink.bind_texture(Some(handle.texture));
                sink.begin_batch();
                sink.set_color(rgba(color));
                bound = Some(handle.texture);
            }

            sink.add_textured_quad(TexturedQuad {
                x1: x + glyph_x as f32 / 2.0,
                y1: y + glyph.y as f32 / 2.0,
                x2: x + (glyph_x + handle.width) as f32 / 2.0,
                y2: y + (glyph.y + handle.height) as f32 / 2.0,
                u1: handle.u1,
                v1: handle.v1,
                u2: handle.u2,
                v2: handle.v2,
            });
        }

        sink.flush();
    }

    /// Draw underline and strikethrough bars.
    ///
    /// Each glyph contributes a span from the end of the previous glyph to its
    /// own advance. Overlapping spans of one decoration kind merge into a
    /// single bar until the color or the decoration changes.
    fn draw_decorations(
        &self,
        entry: &LayoutEntry,
        x: f32,
        y: f32,
        initial: u32,
        shadow: bool,
        sink: &mut dyn DrawSink,
    ) {
        let changes = entry.style_changes();
        let mut next_change = 0;
        let mut render_style = RenderStyle::default();
        let mut color = initial;

        let decorations = &self.decorations;
        let underline_y = (
            y + decorations.underline_offset as f32 / 2.0,
            y + (decorations.underline_offset + decorations.underline_thickness) as f32 / 2.0,
        );
        let strikethrough_y = (
            y + decorations.strikethrough_offset as f32 / 2.0,
            y + (decorations.strikethrough_offset + decorations.strikethrough_thickness) as f32
                / 2.0,
        );
        let mut underline = None;
        let mut strikethrough = None;

        sink.bind_texture(None);
        sink.begin_batch();
        sink.set_color(rgba(color));

        for glyph in entry.glyphs() {
            let previous_color = color;
            let mut color_changed = false;
            while next_change < changes.len()
                && glyph.original_index >= changes[next_change].original_index
            {
                let change = &changes[next_change];
                color = self.palette.apply(change.color, initial, shadow);
                render_style = change.render_style;
                color_changed = true;
                next_change += 1;
            }
            if color_changed {
                // Pending bars keep the color they were started with
                if color != previous_color {
                    emit_bar(sink, underline.take(), underline_y);
                    emit_bar(sink, strikethrough.take(), strikethrough_y);
                }
                sink.set_color(rgba(color));
            }

            let gap = glyph.advance - glyph.handle.width;
            let span = (
                x + (glyph.x - gap) as f32 / 2.0,
                x + (glyph.x + glyph.advance) as f32 / 2.0,
            );
            extend_bar(sink, &mut underline, render_style.underline, span, underline_y);
            extend_bar(
                sink,
                &mut strikethrough,
                render_style.strikethrough,
                span,
                strikethrough_y,
            );
        }

        emit_bar(sink, underline, underline_y);
        emit_bar(sink, strikethrough, strikethrough_y);
        sink.flush();
    }

    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    /// Mutable cache access, for explicit sweeps.
    pub fn cache_mut(&mut self) -> &mut LayoutCache {
        &mut self.cache
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

/// Grow the pending bar by `span` if the two touch; otherwise draw the
/// pending bar and start a new one when `active`.
fn extend_bar(
    sink: &mut dyn DrawSink,
    bar: &mut Option<(f32, f32)>,
    active: bool,
    span: (f32, f32),
    y: (f32, f32),
) {
    if active
        && let Some(pending) = bar.as_mut()
        && span.0 <= pending.1
        && span.1 >= pending.0
    {
        pending.0 = pending.0.min(span.0);
        pending.1 = pending.1.max(span.1);
        return;
    }
    emit_bar(sink, bar.take(), y);
    if active {
        *bar = Some(span);
    }
}

fn emit_bar(sink: &mut dyn DrawSink, bar: Option<(f32, f32)>, (y1, y2): (f32, f32)) {
    if let Some((x1, x2)) = bar {
        sink.add_solid_quad(SolidQuad { x1, y1, x2, y2 });
    }
}

/// Character lookup for non-decreasing indices without collecting the string.
struct CharCursor<'a> {
    source: &'a str,
    chars: std::str::Chars<'a>,
    consumed: usize,
    current: Option<char>,
}

impl<'a> CharCursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars(),
            consumed: 0,
            current: None,
        }
    }

    fn char_at(&mut self, index: usize) -> Option<char> {
        if index + 1 < self.consumed {
            // Indices went backwards; restart from the beginning
            return self.source.chars().nth(index);
        }
        while self.consumed <= index {
            self.current = self.chars.next();
            self.consumed += 1;
        }
        self.current
    }
}
