//! The immutable document container
//!
//! A `Document` is a value: boards, the node table, and the custom theme,
//! tagged with the format version. Mutations go through [`DocumentDraft`],
//! an explicit copy-on-write builder: the node table holds `Arc<Node>`
//! entries, a draft clones the map (pointer clones only) and replaces just
//! the entries it touches, and `finish` seals the next snapshot. The prior
//! snapshot stays valid and byte-for-byte unchanged throughout.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use maquette_theme::{default_theme_id, stock_theme, Theme, ThemeId};

use crate::board::Board;
use crate::catalog::{self, ComponentKind};
use crate::error::{DocumentError, Result};
use crate::id::NodeId;
use crate::migrate::{self, DOCUMENT_VERSION};
use crate::navigator;
use crate::node::Node;

/// Reserved id of the document's single mutable theme
pub fn custom_theme_id() -> ThemeId {
    ThemeId::new("custom")
}

/// Immutable document snapshot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    version: u32,
    boards: IndexMap<ComponentKind, Board>,
    node_table: IndexMap<NodeId, Arc<Node>>,
    custom_theme: Theme,
}

impl Document {
    /// Fresh empty document; the custom theme starts as a copy of the
    /// default stock theme
    pub fn new() -> Self {
        let mut custom_theme = stock_theme(&default_theme_id())
            .expect("default stock theme is always registered")
            .clone();
        custom_theme.id = custom_theme_id();
        custom_theme.name = "Custom".to_string();
        Self {
            version: DOCUMENT_VERSION,
            boards: IndexMap::new(),
            node_table: IndexMap::new(),
            custom_theme,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn boards(&self) -> &IndexMap<ComponentKind, Board> {
        &self.boards
    }

    pub fn board(&self, component: ComponentKind) -> Option<&Board> {
        self.boards.get(&component)
    }

    pub fn custom_theme(&self) -> &Theme {
        &self.custom_theme
    }

    /// Node lookup; `None` for unknown ids
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.node_table.get(id).map(Arc::as_ref)
    }

    /// Node lookup that treats absence as an invariant violation
    pub fn expect_node(&self, id: &NodeId) -> Result<&Node> {
        self.node(id).ok_or_else(|| DocumentError::NodeNotFound {
            id: id.clone(),
        })
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node_table.contains_key(id)
    }

    /// All node ids in table order (insertion order, stable under edits)
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.node_table.keys()
    }

    pub fn node_count(&self) -> usize {
        self.node_table.len()
    }

    /// Open a copy-on-write draft for the next snapshot
    pub fn draft(&self) -> DocumentDraft {
        DocumentDraft {
            version: self.version,
            boards: self.boards.clone(),
            node_table: self.node_table.clone(),
            custom_theme: self.custom_theme.clone(),
        }
    }

    // ========== Persistence ==========

    /// Serialize to the persisted JSON format
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| DocumentError::Malformed(e.to_string()))
    }

    /// Load a persisted document: migrate older versions, deserialize,
    /// then verify the structural invariants before anything trusts it
    pub fn from_json(payload: &str) -> Result<Self> {
        let mut value: serde_json::Value =
            serde_json::from_str(payload).map_err(|e| DocumentError::Malformed(e.to_string()))?;
        migrate::upgrade(&mut value)?;
        let document: Document =
            serde_json::from_value(value).map_err(|e| DocumentError::Malformed(e.to_string()))?;
        document.check_invariants()?;
        Ok(document)
    }

    // ========== Invariants ==========

    /// Verify the structural invariants.
    ///
    /// Holds after every engine mutation by construction; run explicitly
    /// after structural edits and on import. A failure here means the
    /// document is corrupt, not that a user request was invalid.
    pub fn check_invariants(&self) -> Result<()> {
        let mut reference_counts: IndexMap<&NodeId, u32> = IndexMap::new();

        // Boards reference resolvable variants
        for board in self.boards.values() {
            for variant_id in &board.variants {
                let node = self.expect_node(variant_id)?;
                if node.is_child() {
                    return Err(DocumentError::ChildFlagMismatch {
                        id: variant_id.clone(),
                    });
                }
                *reference_counts.entry(variant_id).or_default() += 1;
            }
        }

        // Children lists reference resolvable instances, nesting is legal
        for (id, node) in &self.node_table {
            for child_id in node.children() {
                let child = self
                    .node(child_id)
                    .ok_or_else(|| DocumentError::DanglingReference {
                        parent: id.clone(),
                        child: child_id.clone(),
                    })?;
                if !child.is_child() {
                    return Err(DocumentError::ChildFlagMismatch {
                        id: child_id.clone(),
                    });
                }
                if !catalog::can_nest(node.component(), child.component()) {
                    return Err(DocumentError::InvalidNesting {
                        parent: id.clone(),
                        child: child_id.clone(),
                    });
                }
                *reference_counts.entry(child_id).or_default() += 1;
            }
        }

        for (id, node) in &self.node_table {
            let references = reference_counts.get(id).copied().unwrap_or(0);
            match node.as_ref() {
                // isChild == true iff exactly one parent's children list
                Node::Instance(_) => {
                    if references == 0 {
                        return Err(DocumentError::ParentNotFound { id: id.clone() });
                    }
                    if references > 1 {
                        return Err(DocumentError::MultipleParents { id: id.clone() });
                    }
                }
                Node::Variant(variant) => {
                    if references == 0 {
                        return Err(DocumentError::OrphanVariant { id: id.clone() });
                    }
                    if references > 1 {
                        return Err(DocumentError::MultipleParents { id: id.clone() });
                    }
                    if variant.from_schema && variant.label != variant.component.schema_label() {
                        return Err(DocumentError::SchemaLabelMutated {
                            id: id.clone(),
                            label: variant.label.clone(),
                        });
                    }
                    if variant.level != variant.component.level() {
                        return Err(DocumentError::InvalidNesting {
                            parent: id.clone(),
                            child: id.clone(),
                        });
                    }
                }
            }
        }

        // Origin chains are acyclic and end at a default variant
        for id in self.node_table.keys() {
            navigator::origin_root(self, id)?;
        }

        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy-on-write builder for the next snapshot
pub struct DocumentDraft {
    version: u32,
    boards: IndexMap<ComponentKind, Board>,
    node_table: IndexMap<NodeId, Arc<Node>>,
    custom_theme: Theme,
}

impl DocumentDraft {
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.node_table.get(id).map(Arc::as_ref)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node_table.contains_key(id)
    }

    /// Insert a fresh node; replaces any entry under the same id
    pub fn insert_node(&mut self, node: Node) {
        self.node_table.insert(node.id().clone(), Arc::new(node));
    }

    /// Mutable access to one node; unshares the entry on first touch
    pub fn node_mut(&mut self, id: &NodeId) -> Result<&mut Node> {
        self.node_table
            .get_mut(id)
            .map(Arc::make_mut)
            .ok_or_else(|| DocumentError::NodeNotFound { id: id.clone() })
    }

    /// Remove a node entry, preserving table order
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Arc<Node>> {
        self.node_table.shift_remove(id)
    }

    pub fn boards(&self) -> &IndexMap<ComponentKind, Board> {
        &self.boards
    }

    pub fn board(&self, component: ComponentKind) -> Option<&Board> {
        self.boards.get(&component)
    }

    pub fn board_mut(&mut self, component: ComponentKind) -> Option<&mut Board> {
        self.boards.get_mut(&component)
    }

    pub fn insert_board(&mut self, board: Board) {
        self.boards.insert(board.component, board);
    }

    pub fn custom_theme(&self) -> &Theme {
        &self.custom_theme
    }

    pub fn custom_theme_mut(&mut self) -> &mut Theme {
        &mut self.custom_theme
    }

    /// Seal the draft into the next immutable snapshot
    pub fn finish(self) -> Document {
        Document {
            version: self.version,
            boards: self.boards,
            node_table: self.node_table,
            custom_theme: self.custom_theme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::VariantNode;

    fn doc_with_board() -> Document {
        let mut draft = Document::new().draft();
        let variant = VariantNode::default_variant(NodeId::from("btn-default"), ComponentKind::Button);
        let mut board = Board::new(ComponentKind::Button, default_theme_id());
        board.variants.push(variant.id.clone());
        draft.insert_node(Node::Variant(variant));
        draft.insert_board(board);
        draft.finish()
    }

    #[test]
    fn test_draft_leaves_prior_snapshot_untouched() {
        let original = doc_with_board();
        let before = original.to_json().unwrap();

        let mut draft = original.draft();
        draft
            .node_mut(&NodeId::from("btn-default"))
            .unwrap()
            .set_theme(Some(ThemeId::new("ink")));
        let next = draft.finish();

        assert_eq!(original.to_json().unwrap(), before);
        assert_ne!(next.to_json().unwrap(), before);
    }

    #[test]
    fn test_invariants_hold_for_well_formed_document() {
        doc_with_board().check_invariants().unwrap();
    }

    #[test]
    fn test_invariants_catch_dangling_variant() {
        let original = doc_with_board();
        let mut draft = original.draft();
        draft.remove_node(&NodeId::from("btn-default"));
        let broken = draft.finish();
        assert!(matches!(
            broken.check_invariants(),
            Err(DocumentError::NodeNotFound { .. })
        ));
    }

    #[test]
    fn test_invariants_catch_relabeled_default_variant() {
        let original = doc_with_board();
        let mut draft = original.draft();
        draft
            .node_mut(&NodeId::from("btn-default"))
            .unwrap()
            .set_label("Fancy".to_string());
        let broken = draft.finish();
        assert!(matches!(
            broken.check_invariants(),
            Err(DocumentError::SchemaLabelMutated { .. })
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let document = doc_with_board();
        let payload = document.to_json().unwrap();
        let back = Document::from_json(&payload).unwrap();
        assert_eq!(back, document);
    }
}
