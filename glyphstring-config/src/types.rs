//! Nested configuration types.

use serde::{Deserialize, Serialize};

/// Placement of underline and strikethrough bars.
///
/// Offsets and thicknesses are in layout pixels (twice the caller's
/// coordinate scale); the baseline offset is in caller coordinates because
/// callers position strings by the top of their bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecorationConfig {
    /// Distance from the top of the string box to the baseline (caller units)
    #[serde(default = "crate::defaults::baseline_offset")]
    pub baseline_offset: f32,

    /// Underline offset below the baseline
    #[serde(default = "crate::defaults::underline_offset")]
    pub underline_offset: i32,

    /// Underline thickness
    #[serde(default = "crate::defaults::underline_thickness")]
    pub underline_thickness: i32,

    /// Strikethrough offset from the baseline (negative is above)
    #[serde(default = "crate::defaults::strikethrough_offset")]
    pub strikethrough_offset: i32,

    /// Strikethrough thickness
    #[serde(default = "crate::defaults::strikethrough_thickness")]
    pub strikethrough_thickness: i32,
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            baseline_offset: crate::defaults::baseline_offset(),
            underline_offset: crate::defaults::underline_offset(),
            underline_thickness: crate::defaults::underline_thickness(),
            strikethrough_offset: crate::defaults::strikethrough_offset(),
            strikethrough_thickness: crate::defaults::strikethrough_thickness(),
        }
    }
}
