//! Default values for underline and strikethrough placement.

pub fn baseline_offset() -> f32 {
    7.0
}

pub fn underline_offset() -> i32 {
    1
}

pub fn underline_thickness() -> i32 {
    2
}

pub fn strikethrough_offset() -> i32 {
    -6
}

pub fn strikethrough_thickness() -> i32 {
    2
}
