//! Property value resolution
//!
//! One slot on one node goes through the cascade in strict precedence
//! order; the first branch that applies wins:
//!
//! 1. `Empty`: unset, the caller decides the rendering default
//! 2. `Exact`: the literal, as stored
//! 3. `Preset`: the symbolic member, no further indirection
//! 4. theme tokens: payload lookup in the node's effective theme;
//!    ordinal step payloads go through the scale generator
//! 5. `Computed`: a named pure function over the parent's already
//!    resolved values, never over raw slots
//! 6. `Inherit`: the nearest ancestor that defines the property, falling
//!    back to the owning board's overrides and then the component schema
//!
//! Every recursive step moves strictly up the tree, so resolution is a
//! bounded walk: no memoization, no subscriptions, and the same snapshot
//! always resolves to the same output.

use tracing::trace;

use maquette_core::{AxisPair, Color, Dim};
use maquette_document::{
    navigator, ComputedFn, Document, DocumentError, ExactValue, NodeId, PropertyKey, PropertyValue,
    Result,
};
use maquette_theme::{scale, FontSpec, TokenPayload, TokenRef};

use crate::theme_resolver::node_theme;

/// A fully resolved, renderable property value
#[derive(Clone, Debug, PartialEq)]
pub enum ConcreteValue {
    Dimension(Dim),
    Color(Color),
    Text(String),
    Flag(bool),
    Pair(AxisPair),
    Font(FontSpec),
    /// A preset member, still symbolic but final
    Keyword(String),
}

/// Resolve one property slot on one node.
///
/// `Ok(None)` means the slot is unset (`Empty` or absent); hard errors
/// mean the document is inconsistent (missing node, dropped theme token).
pub fn resolve_property(
    doc: &Document,
    node_id: &NodeId,
    key: PropertyKey,
) -> Result<Option<ConcreteValue>> {
    let node = doc.expect_node(node_id)?;
    match node.property(key) {
        None => Ok(None),
        Some(value) => resolve_value(doc, node_id, key, value),
    }
}

/// Resolve a tagged value in the context of the node that carries it
fn resolve_value(
    doc: &Document,
    node_id: &NodeId,
    key: PropertyKey,
    value: &PropertyValue,
) -> Result<Option<ConcreteValue>> {
    trace!(node = %node_id, property = %key, "resolving");
    match value {
        PropertyValue::Empty => Ok(None),
        PropertyValue::Exact(exact) => Ok(Some(exact_value(exact))),
        PropertyValue::Preset(member) => Ok(Some(ConcreteValue::Keyword(member.clone()))),
        PropertyValue::ThemeCategorical(token) => {
            categorical_token(doc, node_id, token).map(Some)
        }
        PropertyValue::ThemeOrdinal(token) => ordinal_token(doc, node_id, token).map(Some),
        PropertyValue::Computed(function) => computed(doc, node_id, *function),
        PropertyValue::Inherit => inherit(doc, node_id, key),
    }
}

fn exact_value(exact: &ExactValue) -> ConcreteValue {
    match exact {
        ExactValue::Dimension(dim) => ConcreteValue::Dimension(*dim),
        ExactValue::Color(color) => ConcreteValue::Color(*color),
        ExactValue::Text(text) => ConcreteValue::Text(text.clone()),
        ExactValue::Flag(flag) => ConcreteValue::Flag(*flag),
        ExactValue::Pair(pair) => ConcreteValue::Pair(*pair),
    }
}

/// Categorical tokens return their payload as-is; a step payload has no
/// categorical meaning
fn categorical_token(doc: &Document, node_id: &NodeId, token: &TokenRef) -> Result<ConcreteValue> {
    let theme = node_theme(doc, node_id)?;
    let payload = theme
        .token(token)
        .ok_or_else(|| DocumentError::TokenNotFound {
            reference: token.to_string(),
        })?;
    match payload {
        TokenPayload::Color(color) => Ok(ConcreteValue::Color(*color)),
        TokenPayload::Font(font) => Ok(ConcreteValue::Font(font.clone())),
        TokenPayload::Dim(dim) => Ok(ConcreteValue::Dimension(*dim)),
        TokenPayload::Step(_) => Err(DocumentError::TokenKindMismatch {
            reference: token.to_string(),
        }),
    }
}

/// Ordinal tokens participate in magnitude scaling: step payloads run
/// through the scale generator with the theme's core parameters
fn ordinal_token(doc: &Document, node_id: &NodeId, token: &TokenRef) -> Result<ConcreteValue> {
    let theme = node_theme(doc, node_id)?;
    let payload = theme
        .token(token)
        .ok_or_else(|| DocumentError::TokenNotFound {
            reference: token.to_string(),
        })?;
    match payload {
        TokenPayload::Step(step) => Ok(ConcreteValue::Dimension(scale::dim(*step, &theme.base))),
        TokenPayload::Dim(dim) => Ok(ConcreteValue::Dimension(*dim)),
        TokenPayload::Color(_) | TokenPayload::Font(_) => Err(DocumentError::TokenKindMismatch {
            reference: token.to_string(),
        }),
    }
}

/// The parent's resolved padding as a single-axis magnitude, if available
fn parent_padding(doc: &Document, node_id: &NodeId) -> Result<Option<Dim>> {
    let Some(parent) = navigator::find_parent_node(doc, node_id) else {
        return Ok(None);
    };
    match resolve_property(doc, parent.id(), PropertyKey::Padding)? {
        Some(ConcreteValue::Dimension(dim)) => Ok(Some(dim)),
        _ => Ok(None),
    }
}

/// Computed slots consume only already-resolved parent values. A node
/// without a parent (or whose parent leaves the input unset) resolves to
/// unset rather than guessing.
fn computed(
    doc: &Document,
    node_id: &NodeId,
    function: ComputedFn,
) -> Result<Option<ConcreteValue>> {
    match function {
        ComputedFn::GapBox => {
            let padding = parent_padding(doc, node_id)?;
            Ok(padding.map(|dim| ConcreteValue::Dimension(dim.scaled(0.5))))
        }
        ComputedFn::OpticalPadding => {
            let padding = parent_padding(doc, node_id)?;
            Ok(padding
                .map(|dim| ConcreteValue::Pair(AxisPair::new(dim, dim.scaled(0.75)))))
        }
    }
}

/// Walk up to the nearest ancestor that defines the property. A slot
/// holding `Inherit` defers rather than defines, so the walk skips it.
fn inherit(doc: &Document, node_id: &NodeId, key: PropertyKey) -> Result<Option<ConcreteValue>> {
    let mut current = doc.expect_node(node_id)?;
    while let Some(parent) = navigator::find_parent_node(doc, current.id()) {
        if let Some(value) = parent.property(key) {
            if value.is_set() && !matches!(value, PropertyValue::Inherit) {
                return resolve_value(doc, parent.id(), key, value);
            }
        }
        current = parent;
    }
    fallback(doc, node_id, key)
}

/// Inherit fallback when no ancestor defines the slot: the owning board's
/// overrides, then the component schema default. A fallback entry that is
/// itself `Inherit` has nothing left to defer to and counts as unset.
fn fallback(doc: &Document, node_id: &NodeId, key: PropertyKey) -> Result<Option<ConcreteValue>> {
    let node = doc.expect_node(node_id)?;
    let board = navigator::owning_board(doc, node_id)?;
    if let Some(value) = board.overrides.get(&key) {
        if value.is_set() && !matches!(value, PropertyValue::Inherit) {
            return resolve_value(doc, node_id, key, value);
        }
    }
    let schema = node.component().schema_properties();
    match schema.get(&key) {
        Some(value) if value.is_set() && !matches!(value, PropertyValue::Inherit) => {
            resolve_value(doc, node_id, key, value)
        }
        _ => Ok(None),
    }
}
