//! Default values for font and rasterization settings.

pub fn font_size() -> f32 {
    9.0 // Caller units; glyphs are rasterized at twice this size
}

pub fn antialias() -> bool {
    true
}

pub fn atlas_page_size() -> u32 {
    256
}
