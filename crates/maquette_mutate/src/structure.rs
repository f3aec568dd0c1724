//! Subtree copying and cascade collection
//!
//! The structural helpers behind insert, duplicate, derive-variant and
//! delete. Copies derive child ids deterministically from the supplied
//! root id (`<root>-1`, `<root>-2`, … in preorder), so the same mutation
//! replayed against the same snapshot produces the same document.

use rustc_hash::FxHashSet;

use maquette_document::{
    navigator, Document, DocumentError, InstanceNode, Node, NodeId, Result, VariantNode,
};

/// Deep-copy the children of `source` as instances bound to the copied
/// originals. Returns the new children ids for the copied parent and
/// appends every new node to `out`.
fn copy_children(
    doc: &Document,
    source: &Node,
    prefix: &NodeId,
    counter: &mut usize,
    out: &mut Vec<Node>,
) -> Result<Vec<NodeId>> {
    let mut children = Vec::with_capacity(source.children().len());
    for child_id in source.children() {
        let child_node = doc.expect_node(child_id)?;
        let Node::Instance(child) = child_node else {
            // Variants never appear inside children lists
            return Err(DocumentError::ChildFlagMismatch {
                id: child_id.clone(),
            });
        };
        *counter += 1;
        let new_id = NodeId::new(format!("{prefix}-{counter}"));
        let grandchildren = copy_children(doc, child_node, prefix, counter, out)?;
        out.push(Node::Instance(InstanceNode {
            id: new_id.clone(),
            component: child.component,
            level: child.level,
            label: child.label.clone(),
            theme: child.theme.clone(),
            properties: child.properties.clone(),
            children: grandchildren.into_iter().collect(),
            variant: child.variant.clone(),
            instance_of: child.id.clone(),
        }));
        children.push(new_id);
    }
    Ok(children)
}

/// Copy `source` (a variant or an instance) as a fresh instance rooted at
/// `new_id`. The copy is bound to `source` for override inheritance and to
/// `source`'s variant identity for rendering. Returns every new node,
/// root last.
pub fn instantiate(doc: &Document, source_id: &NodeId, new_id: &NodeId) -> Result<Vec<Node>> {
    let source = doc.expect_node(source_id)?;
    let variant_binding = match source {
        Node::Variant(variant) => variant.id.clone(),
        Node::Instance(instance) => instance.variant.clone(),
    };

    let mut out = Vec::new();
    let mut counter = 0;
    let children = copy_children(doc, source, new_id, &mut counter, &mut out)?;
    out.push(Node::Instance(InstanceNode {
        id: new_id.clone(),
        component: source.component(),
        level: source.level(),
        label: source.label().to_string(),
        theme: source.theme().cloned(),
        properties: source.properties().clone(),
        children: children.into_iter().collect(),
        variant: variant_binding,
        instance_of: source_id.clone(),
    }));
    Ok(out)
}

/// Copy `source` (a variant) as a fresh user variant rooted at `new_id`.
/// Returns every new node, root last.
pub fn derive_variant(
    doc: &Document,
    source_id: &NodeId,
    new_id: &NodeId,
    label: String,
) -> Result<Vec<Node>> {
    let source = doc.expect_node(source_id)?;

    let mut out = Vec::new();
    let mut counter = 0;
    let children = copy_children(doc, source, new_id, &mut counter, &mut out)?;
    out.push(Node::Variant(VariantNode {
        id: new_id.clone(),
        component: source.component(),
        level: source.level(),
        label,
        theme: source.theme().cloned(),
        properties: source.properties().clone(),
        children: children.into_iter().collect(),
        from_schema: false,
        instance_of: Some(source_id.clone()),
    }));
    Ok(out)
}

/// Ids a copy rooted at `new_id` would occupy (root plus derived children)
pub fn copied_ids(nodes: &[Node]) -> impl Iterator<Item = &NodeId> {
    nodes.iter().map(|node| node.id())
}

/// The full set of nodes a cascading instance delete removes: the target's
/// subtree, plus the subtree of every node whose origin chain passes
/// through anything already doomed, to a fixpoint.
pub fn doomed_set(doc: &Document, target: &NodeId) -> Result<FxHashSet<NodeId>> {
    let mut doomed: FxHashSet<NodeId> =
        navigator::subtree_ids(doc, target).into_iter().collect();
    loop {
        let mut grew = false;
        for id in doc.node_ids() {
            if doomed.contains(id) {
                continue;
            }
            let depends = navigator::origin_chain(doc, id)?
                .iter()
                .skip(1)
                .any(|origin| doomed.contains(origin.id()));
            if depends {
                for member in navigator::subtree_ids(doc, id) {
                    grew |= doomed.insert(member);
                }
            }
        }
        if !grew {
            return Ok(doomed);
        }
    }
}
