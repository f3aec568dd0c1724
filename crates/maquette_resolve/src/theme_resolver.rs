//! Theme resolution
//!
//! Which theme is in effect for a node: its own explicit override, else
//! the nearest ancestor's, else the theme of the board owning the node's
//! root variant. For any node reachable from a board this is total; it
//! only fails on structural corruption (a detached root variant).

use indexmap::IndexSet;
use tracing::trace;

use maquette_document::{navigator, ComponentKind, Document, DocumentError, NodeId, Result};
use maquette_theme::{default_theme_id, stock_theme, Theme, ThemeId};

/// Anything that carries a theme: a board directly, or a node through the
/// fallback walk
#[derive(Clone, Copy, Debug)]
pub enum ThemeTarget<'a> {
    Board(ComponentKind),
    Node(&'a NodeId),
}

/// Effective theme id for a node.
///
/// Walks ancestors until an explicit theme is found; past the subtree
/// root, falls back to the owning board's theme.
pub fn node_theme_id(doc: &Document, id: &NodeId) -> Result<ThemeId> {
    let mut current = doc.expect_node(id)?;
    loop {
        if let Some(theme) = current.theme() {
            trace!(node = %current.id(), theme = %theme, "explicit theme");
            return Ok(theme.clone());
        }
        match navigator::find_parent_node(doc, current.id()) {
            Some(parent) => current = parent,
            None => break,
        }
    }
    // No explicit theme anywhere on the path: the owning board decides
    let board = navigator::owning_board(doc, id)?;
    trace!(node = %id, theme = %board.theme, "board fallback theme");
    Ok(board.theme.clone())
}

/// Effective theme id for a board or node target
pub fn object_theme_id(doc: &Document, target: ThemeTarget<'_>) -> Result<ThemeId> {
    match target {
        // A board's own theme field is authoritative, no walk needed
        ThemeTarget::Board(component) => doc
            .board(component)
            .map(|board| board.theme.clone())
            .ok_or(DocumentError::BoardNotFound { component }),
        ThemeTarget::Node(id) => node_theme_id(doc, id),
    }
}

/// Look a theme up by id across the custom theme and the stock themes
pub fn theme<'a>(doc: &'a Document, id: &ThemeId) -> Result<&'a Theme> {
    if &doc.custom_theme().id == id {
        return Ok(doc.custom_theme());
    }
    stock_theme(id).ok_or_else(|| DocumentError::ThemeNotFound {
        id: id.to_string(),
    })
}

/// Resolved theme for a node
pub fn node_theme<'a>(doc: &'a Document, id: &NodeId) -> Result<&'a Theme> {
    let theme_id = node_theme_id(doc, id)?;
    theme(doc, &theme_id)
}

/// Resolved theme for a board or node target
pub fn object_theme<'a>(doc: &'a Document, target: ThemeTarget<'_>) -> Result<&'a Theme> {
    let theme_id = object_theme_id(doc, target)?;
    theme(doc, &theme_id)
}

/// Every theme id referenced by any board or node, first-seen order.
///
/// Never empty: falls back to the default stock theme id so downstream
/// consumers can rely on at least one entry.
pub fn collect_used_themes(doc: &Document) -> Vec<ThemeId> {
    let mut used: IndexSet<ThemeId> = IndexSet::new();
    for board in doc.boards().values() {
        used.insert(board.theme.clone());
    }
    for id in doc.node_ids() {
        if let Some(theme) = doc.node(id).and_then(|node| node.theme()) {
            used.insert(theme.clone());
        }
    }
    if used.is_empty() {
        used.insert(default_theme_id());
    }
    used.into_iter().collect()
}
