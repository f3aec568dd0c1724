//! Persisted-format migration
//!
//! Older documents are upgraded at the JSON level before typed
//! deserialization, so no resolver ever sees a pre-migration shape.
//!
//! Ladder:
//! - v1 → v2: boards gained the `overrides` map
//! - v2 → v3: the theme section `colors` became `swatches`, including every
//!   `@colors.*` token reference on nodes and board overrides

use serde_json::Value;
use tracing::info;

use crate::error::{DocumentError, Result};

/// Current persisted format version
pub const DOCUMENT_VERSION: u32 = 3;

/// Upgrade a raw document payload in place to the current version
pub fn upgrade(value: &mut Value) -> Result<()> {
    let found = value
        .get("version")
        .and_then(Value::as_u64)
        .ok_or_else(|| DocumentError::Malformed("missing or non-numeric version".to_string()))?
        as u32;

    if found > DOCUMENT_VERSION {
        return Err(DocumentError::VersionUnsupported {
            found,
            current: DOCUMENT_VERSION,
        });
    }

    if found < 2 {
        info!(from = found, "migrating document: adding board overrides");
        add_board_overrides(value);
    }
    if found < 3 {
        info!(from = found, "migrating document: renaming colors section");
        rename_colors_section(value);
    }

    value["version"] = DOCUMENT_VERSION.into();
    Ok(())
}

/// v1 → v2: every board gets an empty `overrides` map
fn add_board_overrides(value: &mut Value) {
    let Some(boards) = value.get_mut("boards").and_then(Value::as_object_mut) else {
        return;
    };
    for board in boards.values_mut() {
        if let Some(board) = board.as_object_mut() {
            board
                .entry("overrides")
                .or_insert_with(|| Value::Object(Default::default()));
        }
    }
}

/// v2 → v3: `colors` section becomes `swatches`, references follow
fn rename_colors_section(value: &mut Value) {
    if let Some(sections) = value
        .pointer_mut("/customTheme/sections")
        .and_then(Value::as_object_mut)
    {
        if let Some(colors) = sections.remove("colors") {
            sections.insert("swatches".to_string(), colors);
        }
    }

    if let Some(nodes) = value.get_mut("nodeTable").and_then(Value::as_object_mut) {
        for node in nodes.values_mut() {
            if let Some(properties) = node.get_mut("properties") {
                rewrite_references(properties);
            }
        }
    }
    if let Some(boards) = value.get_mut("boards").and_then(Value::as_object_mut) {
        for board in boards.values_mut() {
            if let Some(overrides) = board.get_mut("overrides") {
                rewrite_references(overrides);
            }
        }
    }
}

/// Rewrite `@colors.*` token strings inside a property map
fn rewrite_references(properties: &mut Value) {
    let Some(properties) = properties.as_object_mut() else {
        return;
    };
    for slot in properties.values_mut() {
        let Some(reference) = slot.get_mut("value").and_then(|v| v.as_str().map(String::from))
        else {
            continue;
        };
        if let Some(rest) = reference.strip_prefix("@colors.") {
            slot["value"] = Value::String(format!("@swatches.{rest}"));
        }
    }
}
