//! End-to-end mutation scenarios
//!
//! These tests drive the engine the way the editor does: every document is
//! built through the mutation protocol itself, then queried through the
//! resolver, so the invariant checking and propagation rules are exercised
//! on realistic edit streams.

use maquette_core::Color;
use maquette_document::{
    navigator, ComponentKind, Document, NodeId, PropertyKey, PropertyValue,
};
use maquette_mutate::{apply, can_insert, Mutation, MutationOutcome, ReasonCode, RejectReason};
use maquette_resolve::{node_theme_id, resolve_property, ConcreteValue};
use maquette_theme::{SectionName, ThemeId, TokenRef};

fn init_logs() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("maquette_mutate=debug")
        .try_init();
}

fn apply_ok(doc: &Document, mutation: Mutation) -> Document {
    match apply(doc, &mutation).expect("no invariant violation") {
        MutationOutcome::Applied(next) => next,
        MutationOutcome::Rejected { reason } => panic!("unexpected rejection: {reason}"),
    }
}

fn expect_rejection(doc: &Document, mutation: Mutation) -> RejectReason {
    match apply(doc, &mutation).expect("no invariant violation") {
        MutationOutcome::Applied(_) => panic!("expected a rejection"),
        MutationOutcome::Rejected { reason } => reason,
    }
}

/// Card board holding a button instance holding a text instance, built
/// entirely through the protocol
fn editor_document() -> Document {
    let mut doc = Document::new();
    for (component, variant) in [
        (ComponentKind::Card, "card-default"),
        (ComponentKind::Button, "btn-default"),
        (ComponentKind::Text, "text-default"),
    ] {
        doc = apply_ok(
            &doc,
            Mutation::AddBoard {
                component,
                variant: NodeId::from(variant),
            },
        );
    }
    doc = apply_ok(
        &doc,
        Mutation::InsertInstance {
            parent: NodeId::from("card-default"),
            variant: NodeId::from("btn-default"),
            id: NodeId::from("card-btn"),
            index: None,
        },
    );
    apply_ok(
        &doc,
        Mutation::InsertInstance {
            parent: NodeId::from("card-btn"),
            variant: NodeId::from("text-default"),
            id: NodeId::from("btn-text"),
            index: None,
        },
    )
}

// ========== Theme fallback ==========

#[test]
fn test_theme_cascade_follows_board_then_override() {
    init_logs();
    let doc = editor_document();

    // No explicit theme anywhere: the board theme applies
    assert_eq!(
        node_theme_id(&doc, &NodeId::from("btn-default")).unwrap(),
        ThemeId::new("paper")
    );
    // A nested instance with no explicit theme resolves the same way
    assert_eq!(
        node_theme_id(&doc, &NodeId::from("btn-text")).unwrap(),
        ThemeId::new("paper")
    );

    // Overriding the variant retargets everything beneath it
    let doc = apply_ok(
        &doc,
        Mutation::SetNodeTheme {
            node: NodeId::from("card-default"),
            theme: Some(ThemeId::new("ink")),
        },
    );
    assert_eq!(
        node_theme_id(&doc, &NodeId::from("card-default")).unwrap(),
        ThemeId::new("ink")
    );
    assert_eq!(
        node_theme_id(&doc, &NodeId::from("btn-text")).unwrap(),
        ThemeId::new("ink")
    );
}

#[test]
fn test_board_theme_change_applies_to_unoverridden_nodes() {
    let doc = editor_document();
    let doc = apply_ok(
        &doc,
        Mutation::SetBoardTheme {
            board: ComponentKind::Card,
            theme: ThemeId::new("ink"),
        },
    );
    assert_eq!(
        node_theme_id(&doc, &NodeId::from("btn-text")).unwrap(),
        ThemeId::new("ink")
    );
}

#[test]
fn test_unknown_theme_is_rejected() {
    let doc = editor_document();
    let reason = expect_rejection(
        &doc,
        Mutation::SetNodeTheme {
            node: NodeId::from("card-default"),
            theme: Some(ThemeId::new("vellum")),
        },
    );
    assert!(matches!(reason, RejectReason::UnknownTheme { .. }));
}

// ========== Rename propagation ==========

#[test]
fn test_default_variant_rename_is_rejected_and_document_unchanged() {
    let doc = editor_document();
    let before = doc.to_json().unwrap();

    let reason = expect_rejection(
        &doc,
        Mutation::RenameNode {
            node: NodeId::from("btn-default"),
            label: "Fancy Button".to_string(),
        },
    );
    assert_eq!(reason, RejectReason::Disallowed);
    assert_eq!(doc.to_json().unwrap(), before);
    assert_eq!(
        doc.node(&NodeId::from("btn-default")).unwrap().label(),
        "Button"
    );
}

#[test]
fn test_user_variant_rename_propagates_to_descendants_only() {
    let doc = editor_document();
    // Derive a user variant and instantiate it twice
    let doc = apply_ok(
        &doc,
        Mutation::AddUserVariant {
            source: NodeId::from("btn-default"),
            id: NodeId::from("btn-primary"),
            label: "Primary".to_string(),
        },
    );
    let doc = apply_ok(
        &doc,
        Mutation::InsertInstance {
            parent: NodeId::from("card-default"),
            variant: NodeId::from("btn-primary"),
            id: NodeId::from("card-primary-1"),
            index: None,
        },
    );
    let doc = apply_ok(
        &doc,
        Mutation::InsertInstance {
            parent: NodeId::from("card-default"),
            variant: NodeId::from("btn-primary"),
            id: NodeId::from("card-primary-2"),
            index: None,
        },
    );

    let doc = apply_ok(
        &doc,
        Mutation::RenameNode {
            node: NodeId::from("btn-primary"),
            label: "Call To Action".to_string(),
        },
    );

    for id in ["btn-primary", "card-primary-1", "card-primary-2"] {
        assert_eq!(doc.node(&NodeId::from(id)).unwrap().label(), "Call To Action");
    }
    // Instances of the *default* variant are unrelated and untouched
    assert_eq!(doc.node(&NodeId::from("card-btn")).unwrap().label(), "Button");
}

#[test]
fn test_instance_rename_reaches_siblings_of_origin() {
    let doc = editor_document();
    let doc = apply_ok(
        &doc,
        Mutation::InsertInstance {
            parent: NodeId::from("card-default"),
            variant: NodeId::from("btn-default"),
            id: NodeId::from("card-btn-2"),
            index: None,
        },
    );

    let doc = apply_ok(
        &doc,
        Mutation::RenameNode {
            node: NodeId::from("card-btn"),
            label: "Submit".to_string(),
        },
    );

    // Both instances share btn-default as their variant
    assert_eq!(doc.node(&NodeId::from("card-btn")).unwrap().label(), "Submit");
    assert_eq!(
        doc.node(&NodeId::from("card-btn-2")).unwrap().label(),
        "Submit"
    );
    // The variant itself keeps its schema label
    assert_eq!(
        doc.node(&NodeId::from("btn-default")).unwrap().label(),
        "Button"
    );
}

// ========== Property propagation ==========

#[test]
fn test_variant_property_edit_skips_overriding_instances() {
    let doc = editor_document();
    let doc = apply_ok(
        &doc,
        Mutation::InsertInstance {
            parent: NodeId::from("card-default"),
            variant: NodeId::from("btn-default"),
            id: NodeId::from("card-btn-2"),
            index: None,
        },
    );
    // card-btn-2 overrides its fill; card-btn keeps the inherited slot
    let override_value = PropertyValue::ThemeCategorical(TokenRef::new(
        SectionName::Swatches,
        "danger",
    ));
    let doc = apply_ok(
        &doc,
        Mutation::SetProperty {
            node: NodeId::from("card-btn-2"),
            key: PropertyKey::Fill,
            value: override_value.clone(),
        },
    );

    let edit = PropertyValue::ThemeCategorical(TokenRef::new(SectionName::Swatches, "accent"));
    let doc = apply_ok(
        &doc,
        Mutation::SetProperty {
            node: NodeId::from("btn-default"),
            key: PropertyKey::Fill,
            value: edit.clone(),
        },
    );

    assert_eq!(
        doc.node(&NodeId::from("card-btn"))
            .unwrap()
            .property(PropertyKey::Fill),
        Some(&edit)
    );
    // The override survives the template edit
    assert_eq!(
        doc.node(&NodeId::from("card-btn-2"))
            .unwrap()
            .property(PropertyKey::Fill),
        Some(&override_value)
    );
}

#[test]
fn test_invalid_pair_value_is_rejected() {
    let doc = editor_document();
    // A token reference pointing outside the effective theme is a
    // rejection, not a way to corrupt the document
    let reason = expect_rejection(
        &doc,
        Mutation::SetProperty {
            node: NodeId::from("card-btn"),
            key: PropertyKey::Fill,
            value: PropertyValue::ThemeCategorical(TokenRef::new(
                SectionName::Swatches,
                "custom9",
            )),
        },
    );
    assert!(matches!(reason, RejectReason::UnknownToken { .. }));
}

// ========== Structural edits ==========

#[test]
fn test_circular_insert_is_rejected_before_mutation() {
    let doc = editor_document();
    // A form instance inside the card template: module-in-module nesting
    // is legal, which is exactly where template cycles become possible
    let doc = apply_ok(
        &doc,
        Mutation::AddBoard {
            component: ComponentKind::Form,
            variant: NodeId::from("form-default"),
        },
    );
    let doc = apply_ok(
        &doc,
        Mutation::InsertInstance {
            parent: NodeId::from("card-default"),
            variant: NodeId::from("form-default"),
            id: NodeId::from("card-form"),
            index: None,
        },
    );
    let before = doc.to_json().unwrap();

    // Nesting the card variant inside its own subtree would loop the
    // template graph
    let validity = can_insert(&doc, &NodeId::from("card-default"), &NodeId::from("card-form"));
    assert_eq!(validity.reason, Some(ReasonCode::CircularInstance));

    let reason = expect_rejection(
        &doc,
        Mutation::InsertInstance {
            parent: NodeId::from("card-form"),
            variant: NodeId::from("card-default"),
            id: NodeId::from("nested-card"),
            index: None,
        },
    );
    assert_eq!(
        reason,
        RejectReason::InvalidInsert {
            code: ReasonCode::CircularInstance
        }
    );
    // Rejection leaves the document byte-for-byte unchanged
    assert_eq!(doc.to_json().unwrap(), before);

    // The same variant is fine under an unrelated module parent
    let validity = can_insert(&doc, &NodeId::from("form-default"), &NodeId::from("card-default"));
    assert!(validity.valid);
}

#[test]
fn test_level_rules_gate_insertion() {
    let doc = editor_document();
    // Text is a primitive: nothing can be inserted under it
    let validity = can_insert(&doc, &NodeId::from("btn-default"), &NodeId::from("btn-text"));
    assert_eq!(validity.reason, Some(ReasonCode::NoChildrenAllowed));

    // A module cannot nest under an element
    let validity = can_insert(&doc, &NodeId::from("card-default"), &NodeId::from("card-btn"));
    assert_eq!(validity.reason, Some(ReasonCode::LevelMismatch));
}

#[test]
fn test_move_rejects_bad_targets() {
    let doc = editor_document();
    // Primitives never receive children
    let reason = expect_rejection(
        &doc,
        Mutation::MoveNode {
            node: NodeId::from("card-btn"),
            new_parent: NodeId::from("btn-text"),
            index: 0,
        },
    );
    assert!(matches!(reason, RejectReason::InvalidInsert { .. }));

    // A node cannot land inside its own subtree
    let doc = apply_ok(
        &doc,
        Mutation::AddBoard {
            component: ComponentKind::Form,
            variant: NodeId::from("form-default"),
        },
    );
    let doc = apply_ok(
        &doc,
        Mutation::InsertInstance {
            parent: NodeId::from("card-default"),
            variant: NodeId::from("form-default"),
            id: NodeId::from("card-form"),
            index: None,
        },
    );
    let reason = expect_rejection(
        &doc,
        Mutation::MoveNode {
            node: NodeId::from("card-form"),
            new_parent: NodeId::from("card-form"),
            index: 0,
        },
    );
    assert_eq!(reason, RejectReason::MoveIntoOwnSubtree);
}

#[test]
fn test_insert_respects_explicit_index() {
    let doc = editor_document();
    let doc = apply_ok(
        &doc,
        Mutation::InsertInstance {
            parent: NodeId::from("card-default"),
            variant: NodeId::from("btn-default"),
            id: NodeId::from("card-btn-2"),
            index: Some(0),
        },
    );
    assert_eq!(
        navigator::child_index(&doc, &NodeId::from("card-btn-2")).unwrap(),
        0
    );
    assert_eq!(
        navigator::child_index(&doc, &NodeId::from("card-btn")).unwrap(),
        1
    );

    let reason = expect_rejection(
        &doc,
        Mutation::InsertInstance {
            parent: NodeId::from("card-default"),
            variant: NodeId::from("btn-default"),
            id: NodeId::from("card-btn-3"),
            index: Some(9),
        },
    );
    assert!(matches!(reason, RejectReason::IndexOutOfRange { .. }));
}

#[test]
fn test_delete_instance_cascades_to_copies() {
    let doc = editor_document();
    // Duplicate the button instance; the copy's origin chain passes
    // through the original
    let doc = apply_ok(
        &doc,
        Mutation::DuplicateNode {
            node: NodeId::from("card-btn"),
            id: NodeId::from("card-btn-copy"),
        },
    );
    assert!(doc.contains_node(&NodeId::from("card-btn-copy")));

    let doc = apply_ok(
        &doc,
        Mutation::DeleteNode {
            node: NodeId::from("card-btn"),
        },
    );
    // The subtree and the dependent copy are gone, the template survives
    assert!(!doc.contains_node(&NodeId::from("card-btn")));
    assert!(!doc.contains_node(&NodeId::from("btn-text")));
    assert!(!doc.contains_node(&NodeId::from("card-btn-copy")));
    assert!(doc.contains_node(&NodeId::from("btn-default")));
    doc.check_invariants().unwrap();
}

#[test]
fn test_delete_variant_in_use_is_rejected() {
    let doc = editor_document();
    let doc = apply_ok(
        &doc,
        Mutation::AddUserVariant {
            source: NodeId::from("btn-default"),
            id: NodeId::from("btn-primary"),
            label: "Primary".to_string(),
        },
    );
    let doc = apply_ok(
        &doc,
        Mutation::InsertInstance {
            parent: NodeId::from("card-default"),
            variant: NodeId::from("btn-primary"),
            id: NodeId::from("card-primary"),
            index: None,
        },
    );

    let reason = expect_rejection(
        &doc,
        Mutation::DeleteNode {
            node: NodeId::from("btn-primary"),
        },
    );
    assert!(matches!(reason, RejectReason::VariantInUse { .. }));

    // After removing the instance, the variant can go
    let doc = apply_ok(
        &doc,
        Mutation::DeleteNode {
            node: NodeId::from("card-primary"),
        },
    );
    let doc = apply_ok(
        &doc,
        Mutation::DeleteNode {
            node: NodeId::from("btn-primary"),
        },
    );
    assert!(!doc.contains_node(&NodeId::from("btn-primary")));
    doc.check_invariants().unwrap();
}

#[test]
fn test_default_variant_delete_is_rejected() {
    let doc = editor_document();
    let reason = expect_rejection(
        &doc,
        Mutation::DeleteNode {
            node: NodeId::from("text-default"),
        },
    );
    assert_eq!(reason, RejectReason::Disallowed);
}

#[test]
fn test_duplicate_variant_lands_next_to_source() {
    let doc = editor_document();
    let doc = apply_ok(
        &doc,
        Mutation::DuplicateNode {
            node: NodeId::from("btn-default"),
            id: NodeId::from("btn-default-copy"),
        },
    );
    let board = doc.board(ComponentKind::Button).unwrap();
    assert_eq!(
        board.variants,
        vec![NodeId::from("btn-default"), NodeId::from("btn-default-copy")]
    );
    // The copy is a user variant derived from the default
    let copy = doc.node(&NodeId::from("btn-default-copy")).unwrap();
    assert!(!copy.is_default_variant());
    assert_eq!(copy.instance_of(), Some(&NodeId::from("btn-default")));
}

// ========== Acyclicity ==========

#[test]
fn test_origin_walks_stay_bounded_after_many_edits() {
    let mut doc = editor_document();
    // Chain of derived variants: each derives from the previous
    let mut source = NodeId::from("btn-default");
    for n in 0..8 {
        let id = NodeId::new(format!("btn-gen-{n}"));
        doc = apply_ok(
            &doc,
            Mutation::AddUserVariant {
                source: source.clone(),
                id: id.clone(),
                label: format!("Generation {n}"),
            },
        );
        source = id;
    }
    // Every origin chain terminates within the node count
    let limit = doc.node_count();
    for id in doc.node_ids() {
        let chain = navigator::origin_chain(&doc, id).unwrap();
        assert!(chain.len() <= limit);
    }
}

// ========== Atomicity ==========

#[test]
fn test_rejection_never_mutates() {
    let doc = editor_document();
    let before = doc.to_json().unwrap();
    let rejections = [
        Mutation::RenameNode {
            node: NodeId::from("missing"),
            label: "X".to_string(),
        },
        Mutation::DeleteNode {
            node: NodeId::from("btn-default"),
        },
        Mutation::MoveNode {
            node: NodeId::from("btn-default"),
            new_parent: NodeId::from("card-default"),
            index: 0,
        },
        Mutation::AddBoard {
            component: ComponentKind::Card,
            variant: NodeId::from("other-card"),
        },
        Mutation::RemoveSwatch {
            key: "custom1".to_string(),
        },
    ];
    for mutation in rejections {
        let outcome = apply(&doc, &mutation).unwrap();
        assert!(!outcome.is_applied(), "{mutation:?} should be rejected");
        assert_eq!(doc.to_json().unwrap(), before);
    }
}

// ========== Protocol ==========

#[test]
fn test_mutations_replay_from_wire_form() {
    let doc = editor_document();
    let wire = r#"{
        "type": "insert-instance",
        "payload": {
            "parent": "card-default",
            "variant": "btn-default",
            "id": "wire-btn"
        }
    }"#;
    let mutation: Mutation = serde_json::from_str(wire).unwrap();
    let doc = apply_ok(&doc, mutation);
    assert!(doc.contains_node(&NodeId::from("wire-btn")));
}

// ========== Resolution over mutated documents ==========

#[test]
fn test_instance_fill_resolves_after_template_edit() {
    let doc = editor_document();
    let edit = PropertyValue::ThemeCategorical(TokenRef::new(SectionName::Swatches, "danger"));
    let doc = apply_ok(
        &doc,
        Mutation::SetProperty {
            node: NodeId::from("btn-default"),
            key: PropertyKey::Fill,
            value: edit,
        },
    );
    let resolved = resolve_property(&doc, &NodeId::from("card-btn"), PropertyKey::Fill)
        .unwrap()
        .unwrap();
    // paper's danger swatch
    assert_eq!(resolved, ConcreteValue::Color(Color::from_hex(0xd20f39)));
}
