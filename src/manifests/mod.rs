//! Built-in content block manifests
//!
//! Each manifest kind maps to a static schema. The registry is populated from
//! `ManifestKind::ALL`; hosts may register further schemas at runtime.

pub mod cover;
pub mod stack;
pub mod extra;
pub mod dynamic;
pub mod tiles;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::block::LandingError;
use crate::core::manifest::ManifestSchema;
use crate::core::parameter::{FieldConstraints, FieldSpec};

/// Longest label a call-to-action link may carry, per locale
pub const MAX_LINK_TEXT_LENGTH: usize = 60;

/// Localized call-to-action label
pub(crate) fn link_text(name: impl Into<String>) -> FieldSpec {
    FieldSpec::localized(name)
        .with_constraints(FieldConstraints::new().with_max_length(MAX_LINK_TEXT_LENGTH))
}

/// Built-in manifest kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestKind {
    AlternativeUpcomingMeetings,
    StackHorizontal,
    StackVertical,
    LatestBlogPosts,
    CoverFull,
    CoverHalf,
    Tiles,
    ExtraTitle,
    ExtraInformation,
    Calendar,
}

impl ManifestKind {
    /// Every built-in kind, in palette order
    pub const ALL: [ManifestKind; 10] = [
        ManifestKind::AlternativeUpcomingMeetings,
        ManifestKind::StackHorizontal,
        ManifestKind::StackVertical,
        ManifestKind::LatestBlogPosts,
        ManifestKind::CoverFull,
        ManifestKind::CoverHalf,
        ManifestKind::Tiles,
        ManifestKind::ExtraTitle,
        ManifestKind::ExtraInformation,
        ManifestKind::Calendar,
    ];

    /// Manifest identifier
    pub fn name(self) -> &'static str {
        match self {
            ManifestKind::AlternativeUpcomingMeetings => "alternative_upcoming_meetings",
            ManifestKind::StackHorizontal => "stack_horizontal",
            ManifestKind::StackVertical => "stack_vertical",
            ManifestKind::LatestBlogPosts => "latest_blog_posts",
            ManifestKind::CoverFull => "cover_full",
            ManifestKind::CoverHalf => "cover_half",
            ManifestKind::Tiles => "tiles",
            ManifestKind::ExtraTitle => "extra_title",
            ManifestKind::ExtraInformation => "extra_information",
            ManifestKind::Calendar => "calendar",
        }
    }

    /// Settings schema of this kind
    pub fn schema(self) -> ManifestSchema {
        match self {
            ManifestKind::AlternativeUpcomingMeetings => dynamic::upcoming_meetings(),
            ManifestKind::StackHorizontal => stack::horizontal(),
            ManifestKind::StackVertical => stack::vertical(),
            ManifestKind::LatestBlogPosts => dynamic::latest_blog_posts(),
            ManifestKind::CoverFull => cover::full(),
            ManifestKind::CoverHalf => cover::half(),
            ManifestKind::Tiles => tiles::tiles(),
            ManifestKind::ExtraTitle => extra::title(),
            ManifestKind::ExtraInformation => extra::information(),
            ManifestKind::Calendar => dynamic::calendar(),
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ManifestKind {
    type Err = LandingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ManifestKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| LandingError::UnknownManifest(s.to_string()))
    }
}
