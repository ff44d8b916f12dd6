//! Text color palette.

use glyphstring_config::{ConfigError, PALETTE_LEN};

/// 16 text colors followed by their 16 shadow variants, each `0xRRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [u32; PALETTE_LEN],
}

impl Palette {
    pub fn from_colors(colors: &[u32]) -> Result<Self, ConfigError> {
        let colors: [u32; PALETTE_LEN] = colors.try_into().map_err(|_| {
            ConfigError::Validation(format!(
                "palette must have {} entries, got {}",
                PALETTE_LEN,
                colors.len()
            ))
        })?;
        Ok(Self { colors })
    }

    /// The color to draw with after an escape code.
    ///
    /// `initial` is the caller's `0xAARRGGBB` color. A palette code replaces
    /// its RGB part and keeps its alpha; `None` restores `initial`. Shadow
    /// text uses the darker second half of the palette.
    pub fn apply(&self, code: Option<u8>, initial: u32, shadow: bool) -> u32 {
        match code {
            Some(code) => {
                let index = code as usize + if shadow { 16 } else { 0 };
                (self.colors[index % PALETTE_LEN] & 0x00ff_ffff) | (initial & 0xff00_0000)
            }
            None => initial,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        let mut colors = [0; PALETTE_LEN];
        for (slot, color) in colors.iter_mut().zip(glyphstring_config::defaults::palette()) {
            *slot = color;
        }
        Self { colors }
    }
}

/// Split `0xAARRGGBB` into `[r, g, b, a]`.
pub fn rgba(color: u32) -> [u8; 4] {
    [
        ((color >> 16) & 0xff) as u8,
        ((color >> 8) & 0xff) as u8,
        (color & 0xff) as u8,
        ((color >> 24) & 0xff) as u8,
    ]
}
