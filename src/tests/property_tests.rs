//! Property-based tests using proptest.
//!
//! These tests verify invariants of the settings model that must hold for
//! *any* payload, catching edge cases that hand-written tests miss.

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use crate::core::images::ImageAsset;
use crate::core::{LandingError, ScopeName};
use crate::manifests::ManifestKind;
use crate::runtime::ContentBlockService;
use crate::tests::factories::{self, LOCALES};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn kind() -> impl Strategy<Value = ManifestKind> {
    proptest::sample::select(ManifestKind::ALL.to_vec())
}

/// Homepage manifests that need no component
fn plain_homepage_kind() -> impl Strategy<Value = ManifestKind> {
    proptest::sample::select(vec![
        ManifestKind::CoverFull,
        ManifestKind::CoverHalf,
        ManifestKind::StackHorizontal,
        ManifestKind::StackVertical,
        ManifestKind::Tiles,
    ])
}

/// Scope and resource where `kind` may be placed
fn placement(kind: ManifestKind) -> (&'static str, Option<u64>) {
    if kind.schema().allows_scope(ScopeName::Homepage) {
        ("homepage", None)
    } else {
        ("participatory_process_group_homepage", Some(1))
    }
}

/// Instantiate `kind` somewhere it is allowed
fn place(service: &ContentBlockService, kind: ManifestKind) -> crate::core::ContentBlock {
    let (scope, resource) = placement(kind);
    service
        .instantiate(kind.name(), scope, resource, Some(1))
        .unwrap()
}

/// Non-empty localized text over a subset of the configured locales
fn localized_text() -> impl Strategy<Value = Value> {
    (
        "[A-Za-z][A-Za-z ]{0,20}",
        proptest::sample::subsequence(LOCALES.to_vec(), 1..=LOCALES.len()),
    )
        .prop_map(|(text, locales)| {
            let mut map = Map::new();
            map.insert("en".into(), Value::String(text.clone()));
            for locale in locales {
                map.insert(locale.into(), Value::String(format!("{text} {locale}")));
            }
            Value::Object(map)
        })
}

fn slot_name() -> impl Strategy<Value = String> {
    "[a-z_]{1,12}[0-9]?"
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

proptest! {
    /// Every freshly placed block renders: required fields hold a value
    /// in the default locale and every slot starts empty.
    #[test]
    fn new_blocks_are_complete(kind in kind()) {
        let service = factories::service();
        let block = place(&service, kind);
        let schema = service.registry().get(kind.name()).unwrap();

        prop_assert!(block.is_complete(&schema, "en"));
        prop_assert_eq!(block.images.slots().count(), schema.image_slots.len());
        prop_assert_eq!(block.images.iter().count(), 0);

        let (scope, resource) = placement(kind);
        let listed = service.list_for_scope(scope, resource).unwrap();
        let stored = listed.iter().find(|b| b.id == block.id);
        prop_assert!(stored.is_some(), "{} missing from {}", kind.name(), scope);
        let stored = stored.unwrap();
        prop_assert!(stored.is_complete(&schema, "en"));
        prop_assert_eq!(&stored.settings, &block.settings);
    }
}

// ---------------------------------------------------------------------------
// Settings updates
// ---------------------------------------------------------------------------

proptest! {
    /// Applying the same payload twice gives the same settings as applying it once.
    #[test]
    fn update_is_idempotent(kind in plain_homepage_kind(), title in localized_text()) {
        let service = factories::service();
        let block = place(&service, kind);
        let patch = json!({ "title": title });

        let once = service.update_settings(block.id, &patch).unwrap();
        let twice = service.update_settings(block.id, &patch).unwrap();
        prop_assert_eq!(once.settings, twice.settings);
    }

    /// Keys absent from a payload keep their values.
    #[test]
    fn absent_keys_are_untouched(title in localized_text(), body in localized_text()) {
        let service = factories::service();
        let block = factories::cover_half_block(&service);

        let updated = service
            .update_settings(block.id, &json!({ "title": title, "body": body }))
            .unwrap();

        for key in ["link_text", "link_url"] {
            prop_assert_eq!(updated.setting(key), block.setting(key));
        }
        for locale in LOCALES {
            let expected = title
                .get(locale)
                .and_then(Value::as_str)
                .or_else(|| block.settings.localized("title").and_then(|t| t.get(locale)));
            prop_assert_eq!(
                updated.settings.localized("title").and_then(|t| t.get(locale)),
                expected
            );
        }
    }

    /// A rejected payload changes nothing, whatever else it carries.
    #[test]
    fn rejected_update_is_all_or_nothing(
        title in localized_text(),
        count in 13i64..1000,
    ) {
        let service = factories::service();
        let block = service
            .instantiate("alternative_upcoming_meetings", "homepage", None, Some(1))
            .unwrap();

        let result = service.update_settings(block.id, &json!({ "title": title, "count": count }));

        prop_assert!(result.is_err(), "expected rejection of count {}", count);
        prop_assert_eq!(service.find(block.id).unwrap().settings, block.settings);
    }
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

proptest! {
    /// Attaching to an undeclared slot fails and leaves the images unchanged.
    #[test]
    fn undeclared_slot_is_rejected(kind in plain_homepage_kind(), slot in slot_name()) {
        let service = factories::service();
        let block = place(&service, kind);
        prop_assume!(!block.images.has_slot(&slot));

        let asset = ImageAsset::new("blob", "city.jpeg", "image/jpeg", 2048);
        let result = service.attach_image(block.id, &slot, asset);

        prop_assert!(
            matches!(result, Err(LandingError::InvalidSlot { .. })),
            "expected InvalidSlot error"
        );
        prop_assert_eq!(service.find(block.id).unwrap().images, block.images);
    }

    /// Attaching to one slot leaves every other slot as it was.
    #[test]
    fn attach_touches_only_its_slot(slot in 1usize..=4) {
        let service = factories::service();
        let block = place(&service, ManifestKind::Tiles);
        let name = format!("image_{slot}");

        let asset = factories::city_image(2);

        let updated = service.attach_image(block.id, &name, asset.clone()).unwrap();

        for other in block.images.slots().filter(|s| *s != name) {
            prop_assert!(updated.image(other).is_none());
        }
        prop_assert_eq!(updated.image(&name), Some(&asset));
    }
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

proptest! {
    /// Listing returns blocks in activation order with weights 1..=n.
    #[test]
    fn listing_preserves_activation_order(
        kinds in proptest::collection::vec(plain_homepage_kind(), 1..12),
    ) {
        let service = factories::service();
        let ids: Vec<_> = kinds.iter().map(|kind| place(&service, *kind).id).collect();

        let listed = service.list_for_scope("homepage", None).unwrap();
        prop_assert_eq!(factories::ids(&listed), ids);
        for (n, block) in listed.iter().enumerate() {
            prop_assert_eq!(block.weight as usize, n + 1);
        }
    }

    /// Any permutation of the active blocks is accepted and becomes the new order.
    #[test]
    fn reorder_applies_any_permutation(
        kinds in proptest::collection::vec(plain_homepage_kind(), 1..8),
        seed in any::<u64>(),
    ) {
        let service = factories::service();
        let mut ids: Vec<_> = kinds.iter().map(|kind| place(&service, *kind).id).collect();

        // deterministic shuffle
        let len = ids.len();
        for i in 0..len {
            let j = (seed.wrapping_mul(i as u64 + 1) % len as u64) as usize;
            ids.swap(i, j);
        }

        let reordered = service.reorder("homepage", None, &ids).unwrap();
        prop_assert_eq!(factories::ids(&reordered), ids.clone());
        prop_assert_eq!(factories::ids(&service.list_for_scope("homepage", None).unwrap()), ids);
    }
}
