//! Insertion validation surface
//!
//! The editor asks "can this variant be instantiated under that node"
//! before the user ever attempts the insert, so invalid catalog entries
//! can be grayed out. The same predicate gates the actual insert inside
//! the engine, so the preview can never disagree with the operation.

use rustc_hash::FxHashSet;

use maquette_document::{catalog, navigator, Document, Node, NodeId};

/// Machine-readable reason an insertion is invalid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReasonCode {
    UnknownParent,
    UnknownVariant,
    /// The parent kind is a leaf (primitives never hold children)
    NoChildrenAllowed,
    /// The child's tier does not sit strictly below the parent's
    LevelMismatch,
    /// The insert would nest a variant inside its own instances
    CircularInstance,
}

/// Boolean verdict plus the first failing reason
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Validity {
    pub valid: bool,
    pub reason: Option<ReasonCode>,
}

impl Validity {
    pub const VALID: Validity = Validity {
        valid: true,
        reason: None,
    };

    pub fn invalid(reason: ReasonCode) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }
}

/// Every variant reachable from `variant_id` by walking nested instances'
/// `variant` bindings, the variant itself included. Visited-set bounded,
/// so it terminates even on a corrupted document.
pub fn reachable_variants(doc: &Document, variant_id: &NodeId) -> FxHashSet<NodeId> {
    let mut reachable: FxHashSet<NodeId> = FxHashSet::default();
    let mut worklist = vec![variant_id.clone()];
    while let Some(current) = worklist.pop() {
        if !reachable.insert(current.clone()) {
            continue;
        }
        for id in navigator::subtree_ids(doc, &current) {
            if let Some(Node::Instance(instance)) = doc.node(&id) {
                worklist.push(instance.variant.clone());
            }
        }
    }
    reachable
}

/// Can `variant_id` be instantiated under `parent_id`?
///
/// Checks the catalog nesting rules and the circular-instance rule: a
/// variant may not end up nested (directly or through intermediate
/// variants) inside its own subtree.
pub fn can_insert(doc: &Document, variant_id: &NodeId, parent_id: &NodeId) -> Validity {
    let Some(parent) = doc.node(parent_id) else {
        return Validity::invalid(ReasonCode::UnknownParent);
    };
    let Some(variant @ Node::Variant(_)) = doc.node(variant_id) else {
        return Validity::invalid(ReasonCode::UnknownVariant);
    };

    if !parent.component().supports_children() {
        return Validity::invalid(ReasonCode::NoChildrenAllowed);
    }
    if !catalog::can_nest(parent.component(), variant.component()) {
        return Validity::invalid(ReasonCode::LevelMismatch);
    }

    // The root variant above the insertion point must not be reachable
    // from the inserted variant, or the tree of templates would loop
    match navigator::subtree_root(doc, parent_id) {
        Ok(root) => {
            if reachable_variants(doc, variant_id).contains(root.id()) {
                return Validity::invalid(ReasonCode::CircularInstance);
            }
        }
        Err(_) => return Validity::invalid(ReasonCode::UnknownParent),
    }

    Validity::VALID
}
