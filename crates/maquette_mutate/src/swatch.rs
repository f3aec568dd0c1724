//! Custom swatch operations
//!
//! Adding a swatch allocates the next `custom<N>` key monotonically.
//! Removing one is a two-step operation: first every direct reference to
//! the token, on any node property or board override, is migrated to its
//! currently-resolved literal (the "freeze"), then the token is deleted.
//! Removing a token therefore never silently changes an already-placed
//! design. References held only through `Inherit` chains resolve via some
//! ancestor's direct reference, which the freeze has already rewritten, so
//! inherited observers keep their value without gaining an override.

use tracing::debug;

use maquette_core::Color;
use maquette_document::{
    Document, DocumentError, ExactValue, NodeId, PropertyKey, PropertyValue, Result,
};
use maquette_resolve::{resolve_property, theme as lookup_theme, ConcreteValue};
use maquette_theme::{TokenPayload, TokenRef, CUSTOM_SWATCH_PREFIX};

use crate::engine::{MutationOutcome, RejectReason};

/// Add a color under the next free custom swatch key
pub fn add_swatch(doc: &Document, color: Color) -> Result<MutationOutcome> {
    let mut draft = doc.draft();
    let token = draft.custom_theme_mut().add_custom_swatch(color);
    debug!(%token, "added custom swatch");
    Ok(MutationOutcome::Applied(draft.finish()))
}

/// A resolved literal, turned back into a storable exact value
fn freeze_value(resolved: ConcreteValue) -> Option<PropertyValue> {
    match resolved {
        ConcreteValue::Color(color) => Some(PropertyValue::Exact(ExactValue::Color(color))),
        ConcreteValue::Dimension(dim) => Some(PropertyValue::Exact(ExactValue::Dimension(dim))),
        ConcreteValue::Text(text) => Some(PropertyValue::Exact(ExactValue::Text(text))),
        ConcreteValue::Flag(flag) => Some(PropertyValue::Exact(ExactValue::Flag(flag))),
        ConcreteValue::Pair(pair) => Some(PropertyValue::Exact(ExactValue::Pair(pair))),
        ConcreteValue::Keyword(member) => Some(PropertyValue::Preset(member)),
        // Fonts have no exact form; swatch payloads never resolve to one
        ConcreteValue::Font(_) => None,
    }
}

/// Slots on a node that reference the token directly
fn referencing_slots(doc: &Document, id: &NodeId, token: &TokenRef) -> Result<Vec<PropertyKey>> {
    let node = doc.expect_node(id)?;
    Ok(node
        .properties()
        .iter()
        .filter(|(_, value)| value.token_ref() == Some(token))
        .map(|(key, _)| *key)
        .collect())
}

/// Freeze every direct reference to a custom swatch, then delete it
pub fn remove_swatch(doc: &Document, key: &str) -> Result<MutationOutcome> {
    if !key.starts_with(CUSTOM_SWATCH_PREFIX) {
        return Ok(MutationOutcome::Rejected {
            reason: RejectReason::NotACustomSwatch {
                key: key.to_string(),
            },
        });
    }
    let token = TokenRef::swatch(key);
    if !doc.custom_theme().contains(&token) {
        return Ok(MutationOutcome::Rejected {
            reason: RejectReason::SwatchNotFound {
                key: key.to_string(),
            },
        });
    }

    let mut draft = doc.draft();

    // Step one: migrate node references to their resolved literals
    let node_ids: Vec<NodeId> = doc.node_ids().cloned().collect();
    for id in node_ids {
        for slot in referencing_slots(doc, &id, &token)? {
            // Resolved in the node's own effective theme; a node whose
            // theme lacks the token was already broken, and that error
            // propagates rather than being papered over
            let frozen = match resolve_property(doc, &id, slot)? {
                Some(resolved) => freeze_value(resolved),
                None => Some(PropertyValue::Empty),
            };
            if let Some(frozen) = frozen {
                debug!(node = %id, property = %slot, "freezing swatch reference");
                draft.node_mut(&id)?.properties_mut().insert(slot, frozen);
            }
        }
    }

    // Board overrides freeze against the board's own theme
    let boards: Vec<_> = doc.boards().keys().copied().collect();
    for component in boards {
        let board = doc.board(component).expect("iterating existing boards");
        let slots: Vec<PropertyKey> = board
            .overrides
            .iter()
            .filter(|(_, value)| value.token_ref() == Some(&token))
            .map(|(key, _)| *key)
            .collect();
        if slots.is_empty() {
            continue;
        }
        let payload = lookup_theme(doc, &board.theme)?
            .token(&token)
            .ok_or_else(|| DocumentError::TokenNotFound {
                reference: token.to_string(),
            })?
            .clone();
        let TokenPayload::Color(color) = payload else {
            return Err(DocumentError::TokenKindMismatch {
                reference: token.to_string(),
            });
        };
        let board = draft
            .board_mut(component)
            .expect("iterating existing boards");
        for slot in slots {
            board
                .overrides
                .insert(slot, PropertyValue::Exact(ExactValue::Color(color)));
        }
    }

    // Step two: delete the token. The allocation counter survives, so the
    // freed number is never reused.
    draft.custom_theme_mut().remove_token(&token);
    debug!(%token, "removed custom swatch");
    Ok(MutationOutcome::Applied(draft.finish()))
}
