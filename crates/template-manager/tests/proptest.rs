//! Property-based tests for template set composition.

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;
use serde_json::json;
use template_manager::{EmbeddedFs, TemplateManager, TemplatesPath};

// ============================================================================
// Test helpers
// ============================================================================

fn site(pages: &BTreeSet<String>, partials: &BTreeSet<String>) -> EmbeddedFs {
    let mut fs = EmbeddedFs::new().with_file("site/layout.html", "<{% block body %}{% endblock %}>");
    for page in pages {
        fs.insert(
            format!("site/pages/{}.html", page),
            format!(r#"{{% extends "layout" %}}{{% block body %}}{}{{% endblock %}}"#, page),
        );
    }
    for partial in partials {
        fs.insert(format!("site/partials/{}.html", partial), partial.clone());
    }
    fs
}

fn manager(fs: EmbeddedFs) -> TemplateManager {
    TemplateManager::new(TemplatesPath::under("site"), Some(Arc::new(fs)))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn set_count_equals_page_count(
        pages in prop::collection::btree_set("[a-z]{1,8}", 0..12),
        partials in prop::collection::btree_set("[a-z]{1,8}", 0..4),
    ) {
        let manager = manager(site(&pages, &partials));
        let templates = manager.templates().unwrap();

        prop_assert_eq!(templates.len(), pages.len());
        for page in &pages {
            let name = format!("{}.html", page);
            prop_assert!(templates.contains_key(&name));
        }
    }

    #[test]
    fn every_page_renders_inside_layout(
        pages in prop::collection::btree_set("[a-z]{1,8}", 1..6),
    ) {
        let manager = manager(site(&pages, &BTreeSet::new()));

        for page in &pages {
            let html = manager
                .render_to_string(&format!("{}.html", page), &json!({}))
                .unwrap();
            prop_assert_eq!(html, format!("<{}>", page));
        }
    }

    #[test]
    fn unknown_pages_never_write(name in "[A-Z]{1,8}\\.html") {
        let pages: BTreeSet<String> = ["home".to_string()].into_iter().collect();
        let manager = manager(site(&pages, &BTreeSet::new()));

        let mut out = Vec::new();
        let err = manager.render(&mut out, &name, &json!({})).unwrap_err();
        prop_assert!(err.is_not_found());
        prop_assert!(out.is_empty());
    }
}
