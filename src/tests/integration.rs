//! Integration tests: an administrator building landing pages
//!
//! These tests walk through the admin flows end to end:
//!   palette → drag into active list → edit settings → upload images
//! and check what a rendering template would read back for each surface.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::sync::Arc;

    use crate::config::Configuration;
    use crate::core::constraint::ComponentKind;
    use crate::core::images::RecordingStorage;
    use crate::core::registry::ManifestRegistry;
    use crate::core::scope::StaticResolver;
    use crate::core::{LandingError, SettingValue};
    use crate::manifests::ManifestKind;
    use crate::runtime::ContentBlockService;
    use crate::tests::factories::{self, city_image, ids, literal, localized, paragraph};

    const BLOGS: u64 = 21;
    const MEETINGS: u64 = 22;
    const GROUP: u64 = 5;

    fn resolver() -> Arc<StaticResolver> {
        Arc::new(
            StaticResolver::new()
                .with_process_group(GROUP)
                .with_component(BLOGS, ComponentKind::Blogs)
                .with_component(MEETINGS, ComponentKind::Meetings),
        )
    }

    fn admin_service() -> ContentBlockService {
        factories::service().with_resolver(resolver())
    }

    /// Component a manifest needs when dragged onto the homepage
    fn component_for(manifest: &str) -> Option<u64> {
        match manifest {
            "latest_blog_posts" => Some(BLOGS),
            "alternative_upcoming_meetings" => Some(MEETINGS),
            _ => None,
        }
    }

    // ====================================================================
    // Homepage settings
    // ====================================================================

    #[test]
    fn test_palette_lists_homepage_blocks() {
        let service = admin_service();
        let names: Vec<String> = service
            .inactive_manifests("homepage", None)
            .unwrap()
            .iter()
            .map(|schema| schema.public_name.clone())
            .collect();

        for expected in [
            "Upcoming meetings (Alternative)",
            "Stack of 3 custom items (Horizontal)",
            "Stack of 3 custom items (Vertical)",
            "Latest blog posts",
            "Cover (Full screen)",
            "Cover (Half screen)",
            "Tiles",
        ] {
            assert!(names.iter().any(|n| n == expected), "{expected} missing from palette");
        }
        assert!(!names.iter().any(|n| n == "Calendar"));
    }

    #[test]
    fn test_no_blocks_initially() {
        let service = admin_service();
        assert_eq!(service.count(), 0);
        assert!(service.list_for_scope("homepage", None).unwrap().is_empty());
    }

    #[test]
    fn test_dragging_each_block_increases_count() {
        let service = admin_service();
        let palette = service.inactive_manifests("homepage", None).unwrap();

        for (n, schema) in palette.iter().enumerate() {
            let block = service
                .instantiate(&schema.name, "homepage", None, component_for(&schema.name))
                .unwrap();
            assert_eq!(service.count(), n + 1);
            assert_eq!(block.weight as usize, n + 1);
        }

        assert!(service.inactive_manifests("homepage", None).unwrap().is_empty());
    }

    #[test]
    fn test_editing_each_persisted_block() {
        let service = admin_service();

        for kind in [
            ManifestKind::AlternativeUpcomingMeetings,
            ManifestKind::CoverFull,
            ManifestKind::CoverHalf,
            ManifestKind::StackHorizontal,
            ManifestKind::StackVertical,
            ManifestKind::Tiles,
        ] {
            let block = service
                .instantiate(kind.name(), "homepage", None, component_for(kind.name()))
                .unwrap();
            let updated = service
                .update_settings(block.id, &json!({ "title": localized("Updated") }))
                .unwrap();

            assert_eq!(updated.translated("title", "es", "en"), Some("Updated (es)"));
            assert_eq!(service.find(block.id).unwrap(), updated);
        }

        let posts = service
            .instantiate("latest_blog_posts", "homepage", None, Some(BLOGS))
            .unwrap();
        let updated = service.update_settings(posts.id, &json!({ "count": 6 })).unwrap();
        assert_eq!(updated.setting("count").and_then(SettingValue::as_integer), Some(6));
    }

    #[test]
    fn test_replacing_cover_image() {
        let storage = Arc::new(RecordingStorage::new());
        let service = admin_service().with_storage(storage.clone());
        let cover = factories::cover_full_block(&service);

        let updated = service
            .attach_image(cover.id, "background_image", city_image(2))
            .unwrap();

        assert_eq!(updated.image("background_image").unwrap().filename, "city2.jpeg");
        assert_eq!(storage.take_released(), vec![city_image(1)]);
    }

    #[test]
    fn test_invalid_edit_keeps_previous_settings() {
        let service = admin_service();
        let cover = factories::cover_half_block(&service);

        let error = service
            .update_settings(
                cover.id,
                &json!({
                    "title": localized("Never saved"),
                    "link_url": literal("not a url"),
                }),
            )
            .unwrap_err();

        assert_eq!(error.invalid_fields(), vec!["link_url"]);
        assert_eq!(service.find(cover.id).unwrap().settings, cover.settings);
    }

    #[test]
    fn test_blocks_requiring_components() {
        let service = admin_service();

        assert!(matches!(
            service.instantiate("latest_blog_posts", "homepage", None, None),
            Err(LandingError::MissingComponent { kind: ComponentKind::Blogs, .. })
        ));
        assert!(matches!(
            service.instantiate("latest_blog_posts", "homepage", None, Some(MEETINGS)),
            Err(LandingError::ComponentMismatch { .. })
        ));

        let block = service
            .instantiate("alternative_upcoming_meetings", "homepage", None, Some(MEETINGS))
            .unwrap();
        assert_eq!(block.component_id, Some(MEETINGS));
        assert_eq!(block.setting("count").and_then(SettingValue::as_integer), Some(3));
    }

    // ====================================================================
    // Process group landing page
    // ====================================================================

    #[test]
    fn test_process_group_landing_blocks() {
        let service = admin_service();
        let scope = "participatory_process_group_homepage";

        let extra_title = factories::extra_title_block(&service, GROUP);
        let extra_information = service
            .instantiate("extra_information", scope, Some(GROUP), None)
            .unwrap();
        service
            .update_settings(extra_information.id, &json!({ "body": paragraph("About the group") }))
            .unwrap();
        let calendar = service.instantiate("calendar", scope, Some(GROUP), None).unwrap();

        let blocks = service.list_for_scope(scope, Some(GROUP)).unwrap();
        assert_eq!(ids(&blocks), vec![extra_title.id, extra_information.id, calendar.id]);

        let title = &blocks[0];
        assert_eq!(title.translated("link_text_1", "en", "en"), Some("Follow us (en)"));
        assert_eq!(
            title.translated("link_url_1", "en", "en"),
            Some("https://instagram.com/decidim")
        );
        assert_eq!(title.setting("icon_1").and_then(SettingValue::as_text), Some("instagram"));

        assert_eq!(
            blocks[1].translated("body", "ca", "en"),
            Some("<p>About the group (ca)</p>")
        );

        let filters = blocks[2].setting("filters").and_then(SettingValue::as_list).unwrap();
        assert!(filters.iter().any(|f| f == "meetings"));
        assert!(filters.iter().any(|f| f == "participatory_processes"));

        assert!(service.list_for_scope("homepage", None).unwrap().is_empty());
    }

    #[test]
    fn test_group_blocks_need_existing_group() {
        let service = admin_service();
        let scope = "participatory_process_group_homepage";

        assert!(matches!(
            service.instantiate("calendar", scope, None, None),
            Err(LandingError::InvalidScope(_))
        ));
        assert!(matches!(
            service.instantiate("calendar", scope, Some(999), None),
            Err(LandingError::InvalidScope(_))
        ));
        assert!(matches!(
            service.instantiate("calendar", "homepage", None, None),
            Err(LandingError::InvalidScope(_))
        ));
        assert_eq!(service.count(), 0);
    }

    #[test]
    fn test_extra_title_rejects_unknown_icon() {
        let service = admin_service();
        let block = factories::extra_title_block(&service, GROUP);

        let error = service
            .update_settings(block.id, &json!({ "icon_2": "myspace" }))
            .unwrap_err();
        assert_eq!(error.invalid_fields(), vec!["icon_2"]);
    }

    // ====================================================================
    // Settings model scenarios
    // ====================================================================

    #[test]
    fn test_cover_full_title_update_keeps_body() {
        let service = admin_service();
        let block = service.instantiate("cover_full", "homepage", None, None).unwrap();
        let body = block.setting("body").cloned();

        let updated = service
            .update_settings(block.id, &json!({ "title": { "en": "Welcome" } }))
            .unwrap();

        assert_eq!(updated.settings.localized("title").unwrap().get("en"), Some("Welcome"));
        assert_eq!(updated.setting("body").cloned(), body);
    }

    #[test]
    fn test_stack_horizontal_attach_second_image() {
        let service = admin_service();
        let block = service
            .instantiate("stack_horizontal", "homepage", None, None)
            .unwrap();

        let updated = service.attach_image(block.id, "image_2", city_image(7)).unwrap();

        assert_eq!(updated.image("image_2"), Some(&city_image(7)));
        assert!(updated.image("image_1").is_none());
        assert!(updated.image("image_3").is_none());
    }

    #[test]
    fn test_attach_undeclared_slot() {
        let service = admin_service();
        let block = factories::stack_vertical_block(&service);

        let error = service
            .attach_image(block.id, "background_image", city_image(9))
            .unwrap_err();

        assert!(matches!(error, LandingError::InvalidSlot { .. }));
        assert_eq!(service.find(block.id).unwrap().images, block.images);
    }

    #[test]
    fn test_unknown_manifest() {
        let service = admin_service();
        assert_eq!(
            service.instantiate("unknown_manifest", "homepage", None, None),
            Err(LandingError::UnknownManifest("unknown_manifest".into()))
        );
    }

    #[test]
    fn test_list_keeps_activation_order_until_reordered() {
        let service = admin_service();
        let cover = factories::cover_full_block(&service);
        let stack = factories::stack_horizontal_block(&service);
        let half = factories::cover_half_block(&service);

        service
            .update_settings(stack.id, &json!({ "title": localized("Edited") }))
            .unwrap();
        let blocks = service.list_for_scope("homepage", None).unwrap();
        assert_eq!(ids(&blocks), vec![cover.id, stack.id, half.id]);

        service
            .reorder("homepage", None, &[half.id, cover.id, stack.id])
            .unwrap();
        let blocks = service.list_for_scope("homepage", None).unwrap();
        assert_eq!(ids(&blocks), vec![half.id, cover.id, stack.id]);
        assert_eq!(
            blocks.iter().map(|b| b.weight).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_custom_manifest_registered_at_runtime() {
        use crate::core::manifest::ManifestSchema;
        use crate::core::parameter::FieldSpec;

        let registry = ManifestRegistry::with_builtin();
        registry
            .register(
                ManifestSchema::new("banner", "Banner")
                    .field(FieldSpec::localized("headline").required())
                    .image_slot("image"),
            )
            .unwrap();
        let service = ContentBlockService::new(registry, Configuration::new()).unwrap();

        let block = service.instantiate("banner", "homepage", None, None).unwrap();
        assert_eq!(block.translated("headline", "en", "en"), Some("Headline"));
        assert!(service
            .inactive_manifests("homepage", None)
            .unwrap()
            .iter()
            .all(|schema| schema.name != "banner"));
    }
}
