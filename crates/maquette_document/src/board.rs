//! Boards
//!
//! One board exists per component kind in use. A board is a root
//! container, not a node: it owns the ordered variant list, the default
//! theme for everything under it, and board-level default property
//! overrides that sit between a node's own slots and the component schema
//! in the inherit fallback.

use serde::{Deserialize, Serialize};

use maquette_theme::ThemeId;

use crate::catalog::ComponentKind;
use crate::id::NodeId;
use crate::property::PropertyMap;

/// Root container for one component kind
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub component: ComponentKind,
    /// Ordered variant ids; index 0 is the schema default variant
    pub variants: Vec<NodeId>,
    /// Theme every node under this board falls back to
    pub theme: ThemeId,
    /// Board-level default property overrides
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    pub overrides: PropertyMap,
}

impl Board {
    pub fn new(component: ComponentKind, theme: ThemeId) -> Self {
        Self {
            component,
            variants: Vec::new(),
            theme,
            overrides: PropertyMap::new(),
        }
    }

    /// Whether a variant id is listed on this board
    pub fn owns_variant(&self, id: &NodeId) -> bool {
        self.variants.iter().any(|v| v == id)
    }
}
