//! Font loading utilities for system fonts.

use fontdb::{Database, Family, Query};

use super::types::FontData;

/// Load a font from the system font database.
///
/// # Returns
/// `Some(FontData)` if the font was found and loaded successfully.
pub fn load_font_from_db(db: &Database, family_name: &str) -> Option<FontData> {
    load_font_from_db_with_style(db, Family::Name(family_name), None, None)
}

/// Load the database's generic sans-serif face.
pub fn load_sans_serif_from_db(db: &Database) -> Option<FontData> {
    load_font_from_db_with_style(db, Family::SansSerif, None, None)
}

/// Load a font from the system font database with specific style.
///
/// # Arguments
/// * `db` - The font database to query
/// * `family` - Font family to load
/// * `weight` - Optional font weight (default: NORMAL)
/// * `style` - Optional font style (default: Normal)
pub fn load_font_from_db_with_style(
    db: &Database,
    family: Family<'_>,
    weight: Option<fontdb::Weight>,
    style: Option<fontdb::Style>,
) -> Option<FontData> {
    let query = Query {
        families: &[family],
        weight: weight.unwrap_or(fontdb::Weight::NORMAL),
        style: style.unwrap_or(fontdb::Style::Normal),
        ..Query::default()
    };

    let id = db.query(&query)?;

    // Pass face_index for TTC (TrueType Collection) files where multiple fonts
    // share the same data but have different face indices.
    db.with_face_data(id, |data, face_index| {
        FontData::new_with_index(data.to_vec(), face_index as usize)
    })
    .flatten()
}
