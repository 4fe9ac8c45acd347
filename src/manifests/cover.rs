//! Cover blocks: a title and body over a background image

use crate::core::manifest::ManifestSchema;
use crate::core::parameter::FieldSpec;

use super::link_text;

/// Full screen cover
pub fn full() -> ManifestSchema {
    ManifestSchema::new("cover_full", "Cover (Full screen)")
        .field(FieldSpec::localized("title").required())
        .field(FieldSpec::rich_text("body").required())
        .image_slot("background_image")
}

/// Half screen cover with a call-to-action link
pub fn half() -> ManifestSchema {
    ManifestSchema::new("cover_half", "Cover (Half screen)")
        .field(FieldSpec::localized("title").required())
        .field(FieldSpec::rich_text("body").required())
        .field(link_text("link_text").required())
        .field(FieldSpec::url("link_url").required())
        .image_slot("background_image")
}
