//! Font fallback chain configuration.
//!
//! Defines the priority order of fallback fonts for comprehensive Unicode coverage.

/// Fallback font families in priority order.
///
/// These fonts are searched in order when the styled primary font doesn't
/// have a glyph. The order prefers proportional UI faces first, then
/// script-specific coverage (Hebrew/Arabic, CJK), then symbol and emoji
/// fonts, then broad-coverage catch-alls.
pub const FALLBACK_FAMILIES: &[&str] = &[
    // Proportional UI fonts
    "DejaVu Sans",
    "Noto Sans",
    "Liberation Sans",
    "Arial",
    "Helvetica",
    "Segoe UI",
    // Right-to-left scripts
    "Noto Sans Hebrew",
    "Noto Sans Arabic",
    "Noto Naskh Arabic",
    "Arial Hebrew",
    "Geeza Pro",
    // CJK fonts
    "Noto Sans CJK JP",
    "Noto Sans CJK SC",
    "Noto Sans CJK TC",
    "Noto Sans CJK KR",
    "Microsoft YaHei",
    "MS Gothic",
    "Malgun Gothic",
    // Other complex scripts
    "Noto Sans Devanagari",
    "Noto Sans Thai",
    // Symbols and emoji
    "Noto Sans Symbols",
    "Noto Sans Symbols 2",
    "Segoe UI Symbol",
    "Apple Symbols",
    "Noto Color Emoji",
    "Apple Color Emoji",
    "Segoe UI Emoji",
    // General fallbacks
    "Symbola",
    "Arial Unicode MS",
];
