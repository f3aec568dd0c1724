//! Read-only tree traversal
//!
//! Free functions over a document snapshot. No parent index is maintained;
//! parent lookup searches lazily across every board in one deterministic
//! order (board insertion order, then variant list order, then depth-first
//! children order), so results are stable for testing.

use rustc_hash::FxHashSet;

use crate::board::Board;
use crate::document::Document;
use crate::error::{DocumentError, Result};
use crate::id::NodeId;
use crate::node::Node;

/// Visit every node reachable from a board variant, preorder DFS, calling
/// `visit` until it returns `Some`.
fn search_tree<'a, T>(
    doc: &'a Document,
    root: &NodeId,
    visit: &mut impl FnMut(&'a Node) -> Option<T>,
) -> Option<T> {
    let mut stack: Vec<&NodeId> = vec![root];
    // Revisit guard keeps the walk bounded even on a corrupted tree
    let mut seen: FxHashSet<&NodeId> = FxHashSet::default();
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        let Some(node) = doc.node(id) else {
            continue;
        };
        if let Some(found) = visit(node) {
            return Some(found);
        }
        // Push reversed so children pop in list order
        stack.extend(node.children().iter().rev());
    }
    None
}

/// Run `visit` over every variant subtree in deterministic order
fn search_document<'a, T>(
    doc: &'a Document,
    mut visit: impl FnMut(&'a Node) -> Option<T>,
) -> Option<T> {
    for board in doc.boards().values() {
        for variant_id in &board.variants {
            if let Some(found) = search_tree(doc, variant_id, &mut visit) {
                return Some(found);
            }
        }
    }
    None
}

/// The unique node whose children list contains `id`.
///
/// `None` for ids that are not children of anything: variants, unknown ids.
pub fn find_parent_node<'a>(doc: &'a Document, id: &NodeId) -> Option<&'a Node> {
    search_document(doc, |node| {
        if node.children().iter().any(|child| child == id) {
            Some(node)
        } else {
            None
        }
    })
}

fn resolved_parent<'a>(doc: &'a Document, id: &NodeId) -> Result<Option<&'a Node>> {
    let node = doc.expect_node(id)?;
    if !node.is_child() {
        return Ok(None);
    }
    // A child with no resolvable parent is structural corruption
    find_parent_node(doc, id)
        .map(Some)
        .ok_or_else(|| DocumentError::ParentNotFound { id: id.clone() })
}

/// Whether two nodes share a parent. `false` for a node and itself, and
/// for nodes that are not children of anything.
pub fn are_sibling_nodes(doc: &Document, a: &NodeId, b: &NodeId) -> Result<bool> {
    if a == b {
        return Ok(false);
    }
    let parent_a = resolved_parent(doc, a)?;
    let parent_b = resolved_parent(doc, b)?;
    match (parent_a, parent_b) {
        (Some(pa), Some(pb)) => Ok(pa.id() == pb.id()),
        _ => Ok(false),
    }
}

/// Position of a child within its parent's children list
pub fn child_index(doc: &Document, id: &NodeId) -> Result<usize> {
    let parent = find_parent_node(doc, id)
        .ok_or_else(|| DocumentError::ParentNotFound { id: id.clone() })?;
    let index = parent
        .children()
        .iter()
        .position(|child| child == id)
        .expect("parent lookup implies membership");
    Ok(index)
}

/// Whether a child is the only entry in its parent's children list
pub fn is_only_child(doc: &Document, id: &NodeId) -> Result<bool> {
    let parent = find_parent_node(doc, id)
        .ok_or_else(|| DocumentError::ParentNotFound { id: id.clone() })?;
    Ok(parent.children().len() == 1)
}

/// Every variant node, board order then list order
pub fn all_variants(doc: &Document) -> Vec<&Node> {
    let mut variants = Vec::new();
    for board in doc.boards().values() {
        for variant_id in &board.variants {
            if let Some(node) = doc.node(variant_id) {
                variants.push(node);
            }
        }
    }
    variants
}

/// First instance (deterministic traversal order) whose `variant` field is
/// `variant_id`. Powers "is this variant in use" queries; `None` when the
/// variant is unused.
pub fn find_node_by_variant<'a>(doc: &'a Document, variant_id: &NodeId) -> Option<&'a Node> {
    search_document(doc, |node| match node {
        Node::Instance(instance) if &instance.variant == variant_id => Some(node),
        _ => None,
    })
}

/// Preorder id list of the subtree rooted at `root`, root included
pub fn subtree_ids(doc: &Document, root: &NodeId) -> Vec<NodeId> {
    let mut ids = Vec::new();
    search_tree(doc, root, &mut |node: &Node| -> Option<()> {
        ids.push(node.id().clone());
        None
    });
    ids
}

/// The origin chain: `id`, then each `instanceOf` hop, until a node with
/// no origin link. Fails on a revisit *within this walk*; a node reached
/// twice elsewhere in the tree is not a cycle.
pub fn origin_chain<'a>(doc: &'a Document, id: &NodeId) -> Result<Vec<&'a Node>> {
    let mut visited: FxHashSet<NodeId> = FxHashSet::default();
    let mut chain = Vec::new();
    let mut current = doc.expect_node(id)?;
    loop {
        if !visited.insert(current.id().clone()) {
            return Err(DocumentError::CircularOrigin {
                id: current.id().clone(),
            });
        }
        chain.push(current);
        match current.instance_of() {
            Some(origin_id) => current = doc.expect_node(origin_id)?,
            None => break,
        }
    }
    Ok(chain)
}

/// End of the origin chain, which must be a default variant
pub fn origin_root<'a>(doc: &'a Document, id: &NodeId) -> Result<&'a Node> {
    let chain = origin_chain(doc, id)?;
    let root = chain.last().expect("origin chain is never empty");
    if root.is_default_variant() {
        Ok(root)
    } else {
        Err(DocumentError::BrokenOriginChain { id: id.clone() })
    }
}

/// Whether `id`'s origin chain passes through `target` (strictly above
/// `id` itself)
pub fn origin_passes_through(doc: &Document, id: &NodeId, target: &NodeId) -> Result<bool> {
    let chain = origin_chain(doc, id)?;
    Ok(chain.iter().skip(1).any(|node| node.id() == target))
}

/// Walk parents up to the variant at the root of `id`'s subtree
pub fn subtree_root<'a>(doc: &'a Document, id: &NodeId) -> Result<&'a Node> {
    let mut current = doc.expect_node(id)?;
    while current.is_child() {
        current = find_parent_node(doc, current.id()).ok_or_else(|| {
            DocumentError::ParentNotFound {
                id: current.id().clone(),
            }
        })?;
    }
    Ok(current)
}

/// The board owning the variant at the root of `id`'s subtree.
///
/// A root variant listed on no board is an invariant violation.
pub fn owning_board<'a>(doc: &'a Document, id: &NodeId) -> Result<&'a Board> {
    let root = subtree_root(doc, id)?;
    doc.boards()
        .values()
        .find(|board| board.owns_variant(root.id()))
        .ok_or_else(|| DocumentError::OrphanVariant {
            id: root.id().clone(),
        })
}
