//! The two-phase mutation engine
//!
//! `apply` takes the current snapshot and one mutation request and returns
//! either the next snapshot or a rejection, atomically. Phase one
//! validates and locates against the unmodified snapshot; phase two builds
//! the next snapshot through a copy-on-write draft. Structural operations
//! re-verify the document invariants after applying; a failure there
//! surfaces as a `DocumentError`, never as a rejection, because it means
//! corruption rather than an invalid user request.

use thiserror::Error;
use tracing::debug;

use maquette_document::{
    navigator, Board, ComponentKind, Document, ExactValue, Node, NodeId, PropertyKey,
    PropertyValue, Result, VariantNode,
};
use maquette_resolve::{is_valid_pair, theme as lookup_theme};
use maquette_theme::{default_theme_id, ThemeId};

use crate::ops::Mutation;
use crate::rules::{entity_kind, rule_for, EntityKind, OpKind, Propagation};
use crate::structure;
use crate::swatch;
use crate::validate::{can_insert, ReasonCode};

/// Why a request was turned down. Ordinary data, not an error: the
/// document is unchanged and the editing layer presents this as UI
/// feedback.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RejectReason {
    #[error("operation is not allowed for this entity")]
    Disallowed,

    #[error("unknown node {id}")]
    UnknownNode { id: NodeId },

    #[error("unknown theme {id}")]
    UnknownTheme { id: ThemeId },

    #[error("no board for component {component}")]
    UnknownBoard { component: ComponentKind },

    #[error("a board for component {component} already exists")]
    BoardExists { component: ComponentKind },

    #[error("id {id} is already taken")]
    DuplicateId { id: NodeId },

    #[error("insertion is invalid: {code:?}")]
    InvalidInsert { code: ReasonCode },

    #[error("variant {id} is still in use")]
    VariantInUse { id: NodeId },

    #[error("swatch {key:?} not found in the custom theme")]
    SwatchNotFound { key: String },

    #[error("{key:?} is not a custom swatch")]
    NotACustomSwatch { key: String },

    #[error("value does not match the two-axis grammar")]
    InvalidPairValue,

    #[error("token {reference} does not exist in the effective theme")]
    UnknownToken { reference: String },

    #[error("index {index} is out of range")]
    IndexOutOfRange { index: usize },

    #[error("cannot move a node into its own subtree")]
    MoveIntoOwnSubtree,
}

/// Result of one mutation call
#[derive(Clone, Debug)]
pub enum MutationOutcome {
    /// The next snapshot; the prior one is untouched
    Applied(Document),
    /// Request turned down; the caller keeps the prior snapshot
    Rejected { reason: RejectReason },
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied(_))
    }

    /// The new snapshot, if the mutation applied
    pub fn applied(self) -> Option<Document> {
        match self {
            MutationOutcome::Applied(doc) => Some(doc),
            MutationOutcome::Rejected { .. } => None,
        }
    }

    /// The rejection reason, if the mutation was turned down
    pub fn rejection(&self) -> Option<&RejectReason> {
        match self {
            MutationOutcome::Applied(_) => None,
            MutationOutcome::Rejected { reason } => Some(reason),
        }
    }
}

fn rejected(reason: RejectReason) -> Result<MutationOutcome> {
    Ok(MutationOutcome::Rejected { reason })
}

/// Validate and apply one mutation against a snapshot
pub fn apply(doc: &Document, mutation: &Mutation) -> Result<MutationOutcome> {
    let outcome = dispatch(doc, mutation)?;
    match &outcome {
        MutationOutcome::Applied(_) => debug!(?mutation, "mutation applied"),
        MutationOutcome::Rejected { reason } => debug!(?mutation, %reason, "mutation rejected"),
    }
    Ok(outcome)
}

fn dispatch(doc: &Document, mutation: &Mutation) -> Result<MutationOutcome> {
    match mutation {
        Mutation::RenameNode { node, label } => rename(doc, node, label),
        Mutation::SetProperty { node, key, value } => set_property(doc, node, *key, value),
        Mutation::ClearProperty { node, key } => clear_property(doc, node, *key),
        Mutation::SetNodeTheme { node, theme } => set_node_theme(doc, node, theme.as_ref()),
        Mutation::SetBoardTheme { board, theme } => set_board_theme(doc, *board, theme),
        Mutation::SetBoardOverride { board, key, value } => {
            set_board_override(doc, *board, *key, value)
        }
        Mutation::AddBoard { component, variant } => add_board(doc, *component, variant),
        Mutation::AddUserVariant { source, id, label } => {
            add_user_variant(doc, source, id, label)
        }
        Mutation::InsertInstance {
            parent,
            variant,
            id,
            index,
        } => insert_instance(doc, parent, variant, id, *index),
        Mutation::MoveNode {
            node,
            new_parent,
            index,
        } => move_node(doc, node, new_parent, *index),
        Mutation::DeleteNode { node } => delete_node(doc, node),
        Mutation::DuplicateNode { node, id } => duplicate_node(doc, node, id),
        Mutation::AddSwatch { color } => swatch::add_swatch(doc, *color),
        Mutation::RemoveSwatch { key } => swatch::remove_swatch(doc, key),
    }
}

/// Seal a draft after a structural edit, re-verifying invariants 1-3
fn finish_structural(draft: maquette_document::DocumentDraft) -> Result<MutationOutcome> {
    let next = draft.finish();
    next.check_invariants()?;
    Ok(MutationOutcome::Applied(next))
}

fn theme_exists(doc: &Document, id: &ThemeId) -> bool {
    lookup_theme(doc, id).is_ok()
}

/// Instances whose origin chain passes through `target`, table order
fn dependent_instances(doc: &Document, target: &NodeId) -> Result<Vec<NodeId>> {
    let mut dependents = Vec::new();
    for id in doc.node_ids() {
        let node = doc.expect_node(id)?;
        if node.is_child() && navigator::origin_passes_through(doc, id, target)? {
            dependents.push(id.clone());
        }
    }
    Ok(dependents)
}

/// Other instances bound to the same variant as `target`
fn sibling_of_origin_instances(doc: &Document, target: &NodeId) -> Result<Vec<NodeId>> {
    let Some(Node::Instance(target_instance)) = doc.node(target) else {
        return Ok(Vec::new());
    };
    let mut siblings = Vec::new();
    for id in doc.node_ids() {
        if id == target {
            continue;
        }
        if let Some(Node::Instance(instance)) = doc.node(id) {
            if instance.variant == target_instance.variant {
                siblings.push(id.clone());
            }
        }
    }
    Ok(siblings)
}

/// Nodes an edit must replicate to, per the rule table
fn propagation_targets(
    doc: &Document,
    target: &NodeId,
    propagation: Propagation,
) -> Result<Vec<NodeId>> {
    match propagation {
        Propagation::None => Ok(Vec::new()),
        Propagation::Descendants => dependent_instances(doc, target),
        Propagation::SiblingsOfOrigin => sibling_of_origin_instances(doc, target),
    }
}

// ========== Rename ==========

fn rename(doc: &Document, node_id: &NodeId, label: &str) -> Result<MutationOutcome> {
    let Some(node) = doc.node(node_id) else {
        return rejected(RejectReason::UnknownNode {
            id: node_id.clone(),
        });
    };
    let rule = rule_for(OpKind::Rename, entity_kind(node));
    if !rule.allowed {
        return rejected(RejectReason::Disallowed);
    }

    let mut draft = doc.draft();
    draft.node_mut(node_id)?.set_label(label.to_string());
    for dependent in propagation_targets(doc, node_id, rule.propagation)? {
        draft.node_mut(&dependent)?.set_label(label.to_string());
    }
    Ok(MutationOutcome::Applied(draft.finish()))
}

// ========== Property edits ==========

fn set_property(
    doc: &Document,
    node_id: &NodeId,
    key: PropertyKey,
    value: &PropertyValue,
) -> Result<MutationOutcome> {
    let Some(node) = doc.node(node_id) else {
        return rejected(RejectReason::UnknownNode {
            id: node_id.clone(),
        });
    };
    let rule = rule_for(OpKind::SetProperty, entity_kind(node));
    if !rule.allowed {
        return rejected(RejectReason::Disallowed);
    }

    // Exact pairs must pass the shared two-axis grammar
    if let PropertyValue::Exact(ExactValue::Pair(pair)) = value {
        if !is_valid_pair(pair) {
            return rejected(RejectReason::InvalidPairValue);
        }
    }
    // Token references must resolve in the node's effective theme now, so
    // the engine never creates a document the resolver will fail on
    if let Some(token) = value.token_ref() {
        let theme = maquette_resolve::node_theme(doc, node_id)?;
        if !theme.contains(token) {
            return rejected(RejectReason::UnknownToken {
                reference: token.to_string(),
            });
        }
    }

    let old = node.property(key).cloned();
    let mut draft = doc.draft();
    draft
        .node_mut(node_id)?
        .properties_mut()
        .insert(key, value.clone());
    // Copies that already override the slot keep their override
    for dependent in propagation_targets(doc, node_id, rule.propagation)? {
        let inherited = doc.expect_node(&dependent)?.property(key) == old.as_ref();
        if inherited {
            draft
                .node_mut(&dependent)?
                .properties_mut()
                .insert(key, value.clone());
        }
    }
    Ok(MutationOutcome::Applied(draft.finish()))
}

fn clear_property(doc: &Document, node_id: &NodeId, key: PropertyKey) -> Result<MutationOutcome> {
    let Some(node) = doc.node(node_id) else {
        return rejected(RejectReason::UnknownNode {
            id: node_id.clone(),
        });
    };
    let rule = rule_for(OpKind::ClearProperty, entity_kind(node));
    if !rule.allowed {
        return rejected(RejectReason::Disallowed);
    }

    let old = node.property(key).cloned();
    let mut draft = doc.draft();
    draft.node_mut(node_id)?.properties_mut().shift_remove(&key);
    for dependent in propagation_targets(doc, node_id, rule.propagation)? {
        let inherited = doc.expect_node(&dependent)?.property(key) == old.as_ref();
        if inherited {
            draft
                .node_mut(&dependent)?
                .properties_mut()
                .shift_remove(&key);
        }
    }
    Ok(MutationOutcome::Applied(draft.finish()))
}

// ========== Theme assignment ==========

fn set_node_theme(
    doc: &Document,
    node_id: &NodeId,
    theme: Option<&ThemeId>,
) -> Result<MutationOutcome> {
    if doc.node(node_id).is_none() {
        return rejected(RejectReason::UnknownNode {
            id: node_id.clone(),
        });
    }
    if let Some(theme) = theme {
        if !theme_exists(doc, theme) {
            return rejected(RejectReason::UnknownTheme { id: theme.clone() });
        }
    }
    let mut draft = doc.draft();
    draft.node_mut(node_id)?.set_theme(theme.cloned());
    Ok(MutationOutcome::Applied(draft.finish()))
}

fn set_board_theme(
    doc: &Document,
    component: ComponentKind,
    theme: &ThemeId,
) -> Result<MutationOutcome> {
    if doc.board(component).is_none() {
        return rejected(RejectReason::UnknownBoard { component });
    }
    if !theme_exists(doc, theme) {
        return rejected(RejectReason::UnknownTheme { id: theme.clone() });
    }
    let mut draft = doc.draft();
    draft
        .board_mut(component)
        .expect("board presence checked above")
        .theme = theme.clone();
    Ok(MutationOutcome::Applied(draft.finish()))
}

fn set_board_override(
    doc: &Document,
    component: ComponentKind,
    key: PropertyKey,
    value: &PropertyValue,
) -> Result<MutationOutcome> {
    let Some(board) = doc.board(component) else {
        return rejected(RejectReason::UnknownBoard { component });
    };
    if let PropertyValue::Exact(ExactValue::Pair(pair)) = value {
        if !is_valid_pair(pair) {
            return rejected(RejectReason::InvalidPairValue);
        }
    }
    // Board overrides resolve against the board's own theme
    if let Some(token) = value.token_ref() {
        if !lookup_theme(doc, &board.theme)?.contains(token) {
            return rejected(RejectReason::UnknownToken {
                reference: token.to_string(),
            });
        }
    }
    let mut draft = doc.draft();
    draft
        .board_mut(component)
        .expect("board presence checked above")
        .overrides
        .insert(key, value.clone());
    Ok(MutationOutcome::Applied(draft.finish()))
}

// ========== Board and variant creation ==========

fn add_board(doc: &Document, component: ComponentKind, variant: &NodeId) -> Result<MutationOutcome> {
    if doc.board(component).is_some() {
        return rejected(RejectReason::BoardExists { component });
    }
    if doc.contains_node(variant) {
        return rejected(RejectReason::DuplicateId {
            id: variant.clone(),
        });
    }

    let mut draft = doc.draft();
    let default_variant = VariantNode::default_variant(variant.clone(), component);
    let mut board = Board::new(component, default_theme_id());
    board.variants.push(default_variant.id.clone());
    draft.insert_node(Node::Variant(default_variant));
    draft.insert_board(board);
    finish_structural(draft)
}

fn add_user_variant(
    doc: &Document,
    source: &NodeId,
    id: &NodeId,
    label: &str,
) -> Result<MutationOutcome> {
    let Some(source_node) = doc.node(source) else {
        return rejected(RejectReason::UnknownNode { id: source.clone() });
    };
    let Node::Variant(_) = source_node else {
        // Only variants can be derived from
        return rejected(RejectReason::Disallowed);
    };
    let component = source_node.component();
    if doc.board(component).is_none() {
        return rejected(RejectReason::UnknownBoard { component });
    }

    let nodes = structure::derive_variant(doc, source, id, label.to_string())?;
    if let Some(taken) = structure::copied_ids(&nodes).find(|id| doc.contains_node(id)) {
        return rejected(RejectReason::DuplicateId { id: taken.clone() });
    }

    let mut draft = doc.draft();
    for node in nodes {
        draft.insert_node(node);
    }
    let board = draft
        .board_mut(component)
        .expect("board presence checked above");
    let position = board
        .variants
        .iter()
        .position(|v| v == source)
        .map(|p| p + 1)
        .unwrap_or(board.variants.len());
    board.variants.insert(position, id.clone());
    finish_structural(draft)
}

// ========== Structural edits ==========

fn insert_instance(
    doc: &Document,
    parent: &NodeId,
    variant: &NodeId,
    id: &NodeId,
    index: Option<usize>,
) -> Result<MutationOutcome> {
    // Circular inserts are rejected before any mutation happens
    let validity = can_insert(doc, variant, parent);
    if let Some(code) = validity.reason {
        return rejected(RejectReason::InvalidInsert { code });
    }
    let parent_node = doc.expect_node(parent)?;
    if let Some(index) = index {
        if index > parent_node.children().len() {
            return rejected(RejectReason::IndexOutOfRange { index });
        }
    }

    let nodes = structure::instantiate(doc, variant, id)?;
    if let Some(taken) = structure::copied_ids(&nodes).find(|id| doc.contains_node(id)) {
        return rejected(RejectReason::DuplicateId { id: taken.clone() });
    }

    let mut draft = doc.draft();
    for node in nodes {
        draft.insert_node(node);
    }
    let children = draft.node_mut(parent)?.children_mut();
    match index {
        Some(index) => children.insert(index, id.clone()),
        None => children.push(id.clone()),
    }
    finish_structural(draft)
}

fn move_node(
    doc: &Document,
    node_id: &NodeId,
    new_parent: &NodeId,
    index: usize,
) -> Result<MutationOutcome> {
    let Some(node) = doc.node(node_id) else {
        return rejected(RejectReason::UnknownNode {
            id: node_id.clone(),
        });
    };
    let rule = rule_for(OpKind::Move, entity_kind(node));
    if !rule.allowed {
        return rejected(RejectReason::Disallowed);
    }
    let Some(parent_node) = doc.node(new_parent) else {
        return rejected(RejectReason::UnknownNode {
            id: new_parent.clone(),
        });
    };
    if !parent_node.component().supports_children() {
        return rejected(RejectReason::InvalidInsert {
            code: ReasonCode::NoChildrenAllowed,
        });
    }
    if !maquette_document::catalog::can_nest(parent_node.component(), node.component()) {
        return rejected(RejectReason::InvalidInsert {
            code: ReasonCode::LevelMismatch,
        });
    }
    if navigator::subtree_ids(doc, node_id).contains(new_parent) {
        return rejected(RejectReason::MoveIntoOwnSubtree);
    }
    // A child without a parent is corruption, not a bad request
    let old_parent = navigator::find_parent_node(doc, node_id)
        .ok_or_else(|| maquette_document::DocumentError::ParentNotFound {
            id: node_id.clone(),
        })?
        .id()
        .clone();

    let capacity = if &old_parent == new_parent {
        parent_node.children().len() - 1
    } else {
        parent_node.children().len()
    };
    if index > capacity {
        return rejected(RejectReason::IndexOutOfRange { index });
    }

    let mut draft = doc.draft();
    draft
        .node_mut(&old_parent)?
        .children_mut()
        .retain(|child| child != node_id);
    draft
        .node_mut(new_parent)?
        .children_mut()
        .insert(index, node_id.clone());
    finish_structural(draft)
}

fn delete_node(doc: &Document, node_id: &NodeId) -> Result<MutationOutcome> {
    let Some(node) = doc.node(node_id) else {
        return rejected(RejectReason::UnknownNode {
            id: node_id.clone(),
        });
    };
    let entity = entity_kind(node);
    let rule = rule_for(OpKind::Delete, entity);
    if !rule.allowed {
        return rejected(RejectReason::Disallowed);
    }

    match entity {
        EntityKind::DefaultVariant => unreachable!("denied by the rule table"),
        EntityKind::UserVariant => {
            // No cascade for variants: dependents must be deleted first
            let in_use = navigator::find_node_by_variant(doc, node_id).is_some()
                || !dependent_instances(doc, node_id)?.is_empty();
            if in_use {
                return rejected(RejectReason::VariantInUse {
                    id: node_id.clone(),
                });
            }
            let mut draft = doc.draft();
            for member in navigator::subtree_ids(doc, node_id) {
                draft.remove_node(&member);
            }
            let board = navigator::owning_board(doc, node_id)?.component;
            draft
                .board_mut(board)
                .expect("owning board exists")
                .variants
                .retain(|v| v != node_id);
            finish_structural(draft)
        }
        EntityKind::Instance => {
            // Cascade: the subtree, plus every copy depending on it
            let doomed = structure::doomed_set(doc, node_id)?;
            let mut draft = doc.draft();
            for id in doc.node_ids() {
                if doomed.contains(id) {
                    continue;
                }
                let detached = doc
                    .expect_node(id)?
                    .children()
                    .iter()
                    .any(|child| doomed.contains(child));
                if detached {
                    draft
                        .node_mut(id)?
                        .children_mut()
                        .retain(|child| !doomed.contains(child));
                }
            }
            for id in &doomed {
                draft.remove_node(id);
            }
            finish_structural(draft)
        }
    }
}

fn duplicate_node(doc: &Document, node_id: &NodeId, id: &NodeId) -> Result<MutationOutcome> {
    let Some(node) = doc.node(node_id) else {
        return rejected(RejectReason::UnknownNode {
            id: node_id.clone(),
        });
    };
    let rule = rule_for(OpKind::Duplicate, entity_kind(node));
    if !rule.allowed {
        return rejected(RejectReason::Disallowed);
    }

    match node {
        // Duplicating a variant derives a user variant next to it
        Node::Variant(variant) => add_user_variant(doc, node_id, id, &variant.label),
        Node::Instance(_) => {
            let parent = navigator::find_parent_node(doc, node_id)
                .ok_or_else(|| maquette_document::DocumentError::ParentNotFound {
                    id: node_id.clone(),
                })?
                .id()
                .clone();
            let position = navigator::child_index(doc, node_id)? + 1;

            let nodes = structure::instantiate(doc, node_id, id)?;
            if let Some(taken) = structure::copied_ids(&nodes).find(|id| doc.contains_node(id)) {
                return rejected(RejectReason::DuplicateId { id: taken.clone() });
            }

            let mut draft = doc.draft();
            for node in nodes {
                draft.insert_node(node);
            }
            draft
                .node_mut(&parent)?
                .children_mut()
                .insert(position, id.clone());
            finish_structural(draft)
        }
    }
}
