//! Default text color palette.

/// The classic 16-color chat palette followed by its darker shadow variants.
///
/// Entries are `0xRRGGBB`; the alpha channel of a drawn color always comes
/// from the caller's initial color.
pub fn palette() -> Vec<u32> {
    (0..crate::PALETTE_LEN as u32)
        .map(|index| {
            let bright = (index >> 3 & 1) * 85;
            let mut red = (index >> 2 & 1) * 170 + bright;
            let mut green = (index >> 1 & 1) * 170 + bright;
            let mut blue = (index & 1) * 170 + bright;

            // Gold instead of dark yellow
            if index == 6 {
                red += 85;
            }

            if index >= 16 {
                red /= 4;
                green /= 4;
                blue /= 4;
            }

            (red & 0xff) << 16 | (green & 0xff) << 8 | (blue & 0xff)
        })
        .collect()
}
