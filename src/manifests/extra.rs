//! Extra panels for process group landing pages

use crate::core::constraint::ManifestConstraint;
use crate::core::manifest::ManifestSchema;
use crate::core::parameter::{FieldConstraints, FieldSpec, FieldType};
use crate::core::scope::ScopeName;

use super::link_text;

/// Icons a title link may show
pub const SOCIAL_ICONS: [&str; 7] = [
    "instagram", "facebook", "twitter", "youtube", "linkedin", "telegram", "globe",
];

const TITLE_LINKS: usize = 3;

/// Row of icon links next to the group title
pub fn title() -> ManifestSchema {
    let mut schema = ManifestSchema::new("extra_title", "Extra title")
        .constraint(group_only());

    for link in 1..=TITLE_LINKS {
        let mut text = link_text(format!("link_text_{link}"));
        let mut url = FieldSpec::url(format!("link_url_{link}"));
        let mut icon = FieldSpec::new(format!("icon_{link}"), FieldType::Icon)
            .with_constraints(FieldConstraints::new().with_allowed_values(SOCIAL_ICONS));
        if link == 1 {
            text = text.required();
            url = url.required();
            icon = icon.required().with_default("instagram");
        }
        schema = schema.field(text).field(url).field(icon);
    }

    schema
}

/// Free text panel
pub fn information() -> ManifestSchema {
    ManifestSchema::new("extra_information", "Extra information")
        .field(FieldSpec::rich_text("body").required())
        .constraint(group_only())
}

pub(crate) fn group_only() -> ManifestConstraint {
    ManifestConstraint::scope_only([ScopeName::ParticipatoryProcessGroupHomepage])
}
