//! Stacks of three custom items, each with body, link and image

use crate::core::manifest::ManifestSchema;
use crate::core::parameter::FieldSpec;

use super::link_text;

/// Items in a stack
pub const STACK_ITEMS: usize = 3;

pub fn horizontal() -> ManifestSchema {
    stack("stack_horizontal", "Stack of 3 custom items (Horizontal)")
}

pub fn vertical() -> ManifestSchema {
    stack("stack_vertical", "Stack of 3 custom items (Vertical)")
}

fn stack(name: &str, public_name: &str) -> ManifestSchema {
    let mut schema =
        ManifestSchema::new(name, public_name).field(FieldSpec::localized("title").required());

    for item in 1..=STACK_ITEMS {
        schema = schema
            .field(FieldSpec::rich_text(format!("body_{item}")).required())
            .field(link_text(format!("link_text_{item}")).required())
            .field(FieldSpec::url(format!("link_url_{item}")).required())
            .image_slot(format!("image_{item}"));
    }

    schema
}
