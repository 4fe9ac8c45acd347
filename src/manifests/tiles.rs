//! Grid of image tiles

use crate::core::manifest::ManifestSchema;
use crate::core::parameter::FieldSpec;

pub const TILE_COUNT: usize = 4;

pub fn tiles() -> ManifestSchema {
    let mut schema =
        ManifestSchema::new("tiles", "Tiles").field(FieldSpec::localized("title").required());

    for tile in 1..=TILE_COUNT {
        schema = schema
            .field(FieldSpec::rich_text(format!("body_{tile}")))
            .field(FieldSpec::url(format!("link_url_{tile}")))
            .image_slot(format!("image_{tile}"));
    }

    schema
}
