//! The mutation protocol
//!
//! A discriminated request consumed by the engine. This is the external
//! write surface: rendering, export tooling and agent-driven editing all
//! funnel through the same requests, so invariant checking is identical
//! regardless of caller.
//!
//! Fresh node ids are supplied by the caller, never minted here: an edit
//! stream with explicit ids replays deterministically. Operations that
//! deep-copy a subtree derive ids for the copied children from the
//! supplied root id.

use serde::{Deserialize, Serialize};

use maquette_core::Color;
use maquette_document::{ComponentKind, NodeId, PropertyKey, PropertyValue};
use maquette_theme::ThemeId;

/// A single named operation against the document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum Mutation {
    /// Relabel a node. Disallowed for default variants (their label is
    /// schema-fixed); propagation per the rule table.
    RenameNode { node: NodeId, label: String },

    /// Write one property slot
    SetProperty {
        node: NodeId,
        key: PropertyKey,
        value: PropertyValue,
    },

    /// Remove one property slot entirely
    ClearProperty { node: NodeId, key: PropertyKey },

    /// Set or clear a node's explicit theme override
    SetNodeTheme {
        node: NodeId,
        theme: Option<ThemeId>,
    },

    /// Change a board's default theme
    SetBoardTheme {
        board: ComponentKind,
        theme: ThemeId,
    },

    /// Write one board-level default property override
    SetBoardOverride {
        board: ComponentKind,
        key: PropertyKey,
        value: PropertyValue,
    },

    /// Create a board plus its schema default variant
    AddBoard {
        component: ComponentKind,
        /// Id for the new default variant
        variant: NodeId,
    },

    /// Derive a user variant from an existing variant
    AddUserVariant {
        source: NodeId,
        id: NodeId,
        label: String,
    },

    /// Instantiate a variant under a parent node
    InsertInstance {
        parent: NodeId,
        variant: NodeId,
        id: NodeId,
        /// Position in the parent's children list; append when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },

    /// Reparent an instance
    MoveNode {
        node: NodeId,
        new_parent: NodeId,
        index: usize,
    },

    /// Delete a node (and, per the rule table, its dependents)
    DeleteNode { node: NodeId },

    /// Copy a node next to itself (variants join the board list, instances
    /// their parent's children)
    DuplicateNode { node: NodeId, id: NodeId },

    /// Add a custom swatch under the next free `custom<N>` key
    AddSwatch { color: Color },

    /// Freeze every reference to a custom swatch, then delete it
    RemoveSwatch { key: String },
}

impl Mutation {
    /// The node this operation targets, when it targets one
    pub fn target(&self) -> Option<&NodeId> {
        match self {
            Mutation::RenameNode { node, .. }
            | Mutation::SetProperty { node, .. }
            | Mutation::ClearProperty { node, .. }
            | Mutation::SetNodeTheme { node, .. }
            | Mutation::MoveNode { node, .. }
            | Mutation::DeleteNode { node }
            | Mutation::DuplicateNode { node, .. } => Some(node),
            Mutation::AddUserVariant { source, .. } => Some(source),
            Mutation::InsertInstance { parent, .. } => Some(parent),
            Mutation::SetBoardTheme { .. }
            | Mutation::SetBoardOverride { .. }
            | Mutation::AddBoard { .. }
            | Mutation::AddSwatch { .. }
            | Mutation::RemoveSwatch { .. } => None,
        }
    }
}
