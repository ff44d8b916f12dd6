//! Default value functions for configuration.
//!
//! Each sub-module groups related free functions used as
//! `#[serde(default = "crate::defaults::...")]` attributes on `Config` fields.

mod cache;
mod colors;
mod font;
mod render;

// ── Font ───────────────────────────────────────────────────────────────────
pub use font::{antialias, atlas_page_size, font_size};

// ── Colors ─────────────────────────────────────────────────────────────────
pub use colors::palette;

// ── Layout cache ───────────────────────────────────────────────────────────
pub use cache::{retained_strings, sweep_interval};

// ── Decorations ────────────────────────────────────────────────────────────
pub use render::{
    baseline_offset, strikethrough_offset, strikethrough_thickness, underline_offset,
    underline_thickness,
};
