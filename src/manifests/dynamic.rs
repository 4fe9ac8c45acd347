//! Blocks whose content comes from linked components

use crate::core::constraint::{ComponentKind, ManifestConstraint};
use crate::core::manifest::ManifestSchema;
use crate::core::parameter::{FieldConstraints, FieldSpec, FieldType};

use super::extra::group_only;

/// Resource types the calendar can filter on
pub const CALENDAR_FILTERS: [&str; 4] = ["debates", "meetings", "surveys", "participatory_processes"];

/// Upper bound for the number of listed items
pub const MAX_LISTED_ITEMS: i64 = 12;

fn count_field() -> FieldSpec {
    FieldSpec::new("count", FieldType::Integer)
        .required()
        .with_default(3i64)
        .with_constraints(FieldConstraints::new().with_range(1, MAX_LISTED_ITEMS))
}

/// Upcoming meetings of a meetings component
pub fn upcoming_meetings() -> ManifestSchema {
    ManifestSchema::new("alternative_upcoming_meetings", "Upcoming meetings (Alternative)")
        .field(FieldSpec::localized("title").required())
        .field(count_field())
        .constraint(ManifestConstraint::requires_component(ComponentKind::Meetings))
}

/// Latest posts of a blogs component
pub fn latest_blog_posts() -> ManifestSchema {
    ManifestSchema::new("latest_blog_posts", "Latest blog posts")
        .field(count_field())
        .constraint(ManifestConstraint::requires_component(ComponentKind::Blogs))
}

/// Calendar of events across the group's processes
pub fn calendar() -> ManifestSchema {
    let filters: Vec<String> = CALENDAR_FILTERS.iter().map(|f| f.to_string()).collect();

    ManifestSchema::new("calendar", "Calendar")
        .field(
            FieldSpec::new("filters", FieldType::TextList)
                .with_default(filters)
                .with_constraints(FieldConstraints::new().with_allowed_values(CALENDAR_FILTERS)),
        )
        .constraint(group_only())
}
