//! Propagation rule table
//!
//! One declarative entry per operation kind and affected entity kind:
//! whether the operation is allowed at all and, if so, how far it
//! replicates. The engine consults this table and nothing else: adding
//! an operation means adding a row here, not scattering conditionals.

use maquette_document::Node;

/// Entity kinds the rule table distinguishes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    DefaultVariant,
    UserVariant,
    Instance,
}

/// How far an allowed operation replicates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
    /// Affect only the targeted node
    None,
    /// Also apply to every instance whose origin chain passes through the
    /// target
    Descendants,
    /// Also apply to every other instance sharing the target's variant
    SiblingsOfOrigin,
}

/// One rule table entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rule {
    pub allowed: bool,
    pub propagation: Propagation,
}

const ALLOW: fn(Propagation) -> Rule = |propagation| Rule {
    allowed: true,
    propagation,
};
const DENY: Rule = Rule {
    allowed: false,
    propagation: Propagation::None,
};

/// Operation kinds the rule table distinguishes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpKind {
    Rename,
    SetProperty,
    ClearProperty,
    SetTheme,
    Insert,
    Move,
    Delete,
    Duplicate,
}

/// Classify a node for rule lookup
pub fn entity_kind(node: &Node) -> EntityKind {
    match node {
        Node::Variant(variant) if variant.from_schema => EntityKind::DefaultVariant,
        Node::Variant(_) => EntityKind::UserVariant,
        Node::Instance(_) => EntityKind::Instance,
    }
}

/// The rule for one operation on one entity kind
pub fn rule_for(op: OpKind, entity: EntityKind) -> Rule {
    use EntityKind::*;
    use Propagation::*;
    match (op, entity) {
        // Default variant labels are schema-fixed
        (OpKind::Rename, DefaultVariant) => DENY,
        (OpKind::Rename, UserVariant) => ALLOW(Descendants),
        // Instance labels track the shared variant identity
        (OpKind::Rename, Instance) => ALLOW(SiblingsOfOrigin),

        // Property edits on templates flow down to non-overriding copies
        (OpKind::SetProperty, DefaultVariant) => ALLOW(Descendants),
        (OpKind::SetProperty, UserVariant) => ALLOW(Descendants),
        (OpKind::SetProperty, Instance) => ALLOW(None),
        (OpKind::ClearProperty, DefaultVariant) => ALLOW(Descendants),
        (OpKind::ClearProperty, UserVariant) => ALLOW(Descendants),
        (OpKind::ClearProperty, Instance) => ALLOW(None),

        (OpKind::SetTheme, _) => ALLOW(None),

        // Insert targets the parent receiving the child
        (OpKind::Insert, _) => ALLOW(None),

        // Variants are addressed from boards, not children lists
        (OpKind::Move, DefaultVariant) => DENY,
        (OpKind::Move, UserVariant) => DENY,
        (OpKind::Move, Instance) => ALLOW(None),

        // The schema default variant anchors every origin chain
        (OpKind::Delete, DefaultVariant) => DENY,
        // User variants must be detached from dependents first
        (OpKind::Delete, UserVariant) => ALLOW(None),
        // Deleting an instance cascades to its copies
        (OpKind::Delete, Instance) => ALLOW(Descendants),

        (OpKind::Duplicate, _) => ALLOW(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_variant_rename_is_denied() {
        assert!(!rule_for(OpKind::Rename, EntityKind::DefaultVariant).allowed);
        assert!(rule_for(OpKind::Rename, EntityKind::UserVariant).allowed);
    }

    #[test]
    fn test_user_variant_rename_propagates_to_descendants() {
        assert_eq!(
            rule_for(OpKind::Rename, EntityKind::UserVariant).propagation,
            Propagation::Descendants
        );
    }

    #[test]
    fn test_instance_property_edits_stay_local() {
        assert_eq!(
            rule_for(OpKind::SetProperty, EntityKind::Instance).propagation,
            Propagation::None
        );
    }
}
