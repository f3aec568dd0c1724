//! Persisted-format round trips and migration
//!
//! Documents built through the protocol must round-trip losslessly, and
//! older payloads must be upgraded before any resolver trusts them.

use maquette_document::{ComponentKind, Document, DocumentError, NodeId, PropertyKey};
use maquette_mutate::{apply, Mutation, MutationOutcome};
use maquette_theme::SectionName;

fn apply_ok(doc: &Document, mutation: Mutation) -> Document {
    match apply(doc, &mutation).expect("no invariant violation") {
        MutationOutcome::Applied(next) => next,
        MutationOutcome::Rejected { reason } => panic!("unexpected rejection: {reason}"),
    }
}

#[test]
fn test_documents_round_trip_after_edits() {
    let mut doc = Document::new();
    doc = apply_ok(
        &doc,
        Mutation::AddBoard {
            component: ComponentKind::Button,
            variant: NodeId::from("btn-default"),
        },
    );
    doc = apply_ok(
        &doc,
        Mutation::AddUserVariant {
            source: NodeId::from("btn-default"),
            id: NodeId::from("btn-primary"),
            label: "Primary".to_string(),
        },
    );

    let payload = doc.to_json().unwrap();
    let back = Document::from_json(&payload).unwrap();
    assert_eq!(back, doc);
    assert_eq!(back.version(), doc.version());
}

#[test]
fn test_v1_documents_upgrade_on_load() {
    // A version-1 payload: no board overrides, theme section still named
    // "colors", and a node referencing it as @colors.*
    let payload = r##"{
        "version": 1,
        "boards": {
            "button": {
                "component": "button",
                "variants": ["btn-default"],
                "theme": "paper"
            }
        },
        "nodeTable": {
            "btn-default": {
                "node": "variant",
                "id": "btn-default",
                "component": "button",
                "level": "element",
                "label": "Button",
                "properties": {
                    "fill": { "kind": "theme-categorical", "value": "@colors.primary" }
                },
                "fromSchema": true
            }
        },
        "customTheme": {
            "id": "custom",
            "name": "Custom",
            "base": { "size": 16.0, "ratio": 1.25, "unit": "px" },
            "sections": {
                "colors": {
                    "primary": { "kind": "color", "value": "#1e66f5" }
                }
            }
        }
    }"##;

    let doc = Document::from_json(payload).unwrap();
    assert_eq!(doc.version(), 3);

    // The section was renamed and the reference rewritten with it
    assert!(doc
        .custom_theme()
        .section(SectionName::Swatches)
        .unwrap()
        .contains_key("primary"));
    let fill = doc
        .node(&NodeId::from("btn-default"))
        .unwrap()
        .property(PropertyKey::Fill)
        .unwrap();
    assert_eq!(
        fill.token_ref().unwrap().to_string(),
        "@swatches.primary"
    );
    // Boards gained their overrides map
    assert!(doc
        .board(ComponentKind::Button)
        .unwrap()
        .overrides
        .is_empty());
}

#[test]
fn test_future_versions_are_refused() {
    let payload = r#"{ "version": 99, "boards": {}, "nodeTable": {}, "customTheme": {} }"#;
    assert!(matches!(
        Document::from_json(payload),
        Err(DocumentError::VersionUnsupported { found: 99, .. })
    ));
}

#[test]
fn test_malformed_documents_fail_loudly_on_load() {
    // A children reference to a missing node is caught at import, before
    // any resolver ever sees the document
    let payload = r#"{
        "version": 3,
        "boards": {
            "button": {
                "component": "button",
                "variants": ["btn-default"],
                "theme": "paper"
            }
        },
        "nodeTable": {
            "btn-default": {
                "node": "variant",
                "id": "btn-default",
                "component": "button",
                "level": "element",
                "label": "Button",
                "properties": {},
                "children": ["ghost"],
                "fromSchema": true
            }
        },
        "customTheme": {
            "id": "custom",
            "name": "Custom",
            "base": { "size": 16.0, "ratio": 1.25, "unit": "px" },
            "sections": {}
        }
    }"#;
    assert!(matches!(
        Document::from_json(payload),
        Err(DocumentError::DanglingReference { .. })
    ));
}
