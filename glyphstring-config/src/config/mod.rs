//! String renderer configuration.
//!
//! - [`persistence`]: `impl Config` methods for load/save and path resolution

pub mod persistence;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::DecorationConfig;

/// Configuration for the string renderer and its glyph provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // ========================================================================
    // Fonts
    // ========================================================================
    /// Primary font family; `None` selects the first available fallback family
    #[serde(default)]
    pub font_family: Option<String>,

    /// Bold font family (falls back to the primary font when absent)
    #[serde(default)]
    pub bold_font_family: Option<String>,

    /// Italic font family (falls back to the primary font when absent)
    #[serde(default)]
    pub italic_font_family: Option<String>,

    /// Bold italic font family (falls back to the primary font when absent)
    #[serde(default)]
    pub bold_italic_font_family: Option<String>,

    /// Font size in caller units
    #[serde(default = "crate::defaults::font_size")]
    pub font_size: f32,

    /// Anti-aliased glyph rasterization
    #[serde(default = "crate::defaults::antialias")]
    pub antialias: bool,

    /// Width and height of each glyph atlas page in pixels
    #[serde(default = "crate::defaults::atlas_page_size")]
    pub atlas_page_size: u32,

    // ========================================================================
    // Colors
    // ========================================================================
    /// 16 text colors followed by 16 shadow colors, each `0xRRGGBB`
    #[serde(default = "crate::defaults::palette")]
    pub palette: Vec<u32>,

    // ========================================================================
    // Layout cache
    // ========================================================================
    /// How many recently queried strings keep their layout alive without a handle
    #[serde(default = "crate::defaults::retained_strings")]
    pub retained_strings: usize,

    /// Number of cache misses between sweeps of unreachable layouts
    #[serde(default = "crate::defaults::sweep_interval")]
    pub sweep_interval: usize,

    // ========================================================================
    // Decorations
    // ========================================================================
    #[serde(default)]
    pub decorations: DecorationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font_family: None,
            bold_font_family: None,
            italic_font_family: None,
            bold_italic_font_family: None,
            font_size: crate::defaults::font_size(),
            antialias: crate::defaults::antialias(),
            atlas_page_size: crate::defaults::atlas_page_size(),
            palette: crate::defaults::palette(),
            retained_strings: crate::defaults::retained_strings(),
            sweep_interval: crate::defaults::sweep_interval(),
            decorations: DecorationConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the primary font family
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    /// Set the font size
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set how many recently queried strings are retained
    pub fn with_retained_strings(mut self, count: usize) -> Self {
        self.retained_strings = count;
        self
    }

    /// Set the number of misses between cache sweeps
    pub fn with_sweep_interval(mut self, interval: usize) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Check field values that serde cannot reject on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(ConfigError::Validation(format!(
                "font_size must be a positive number, got {}",
                self.font_size
            )));
        }
        if self.palette.len() != crate::PALETTE_LEN {
            return Err(ConfigError::Validation(format!(
                "palette must have {} entries, got {}",
                crate::PALETTE_LEN,
                self.palette.len()
            )));
        }
        if let Some(color) = self.palette.iter().find(|c| **c > 0xff_ffff) {
            return Err(ConfigError::Validation(format!(
                "palette entries are 0xRRGGBB, got {color:#x}"
            )));
        }
        if self.retained_strings == 0 {
            return Err(ConfigError::Validation(
                "retained_strings must be at least 1".to_string(),
            ));
        }
        if self.sweep_interval == 0 {
            return Err(ConfigError::Validation(
                "sweep_interval must be at least 1".to_string(),
            ));
        }
        if self.atlas_page_size < 16 {
            return Err(ConfigError::Validation(format!(
                "atlas_page_size must be at least 16, got {}",
                self.atlas_page_size
            )));
        }
        Ok(())
    }
}
