//! Node sum type
//!
//! A node is either a variant (a reusable template addressed from a
//! board's variant list) or an instance (a graph-bound copy nested in
//! another node's children). The two kinds share identity, label, theme
//! override, property slots and children; everything kind-specific is in
//! the respective struct so exhaustive matches catch any operation that
//! forgot one side.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use maquette_core::Level;
use maquette_theme::ThemeId;

use crate::catalog::ComponentKind;
use crate::id::NodeId;
use crate::property::{PropertyKey, PropertyMap, PropertyValue};

/// Ordered child id list
pub type Children = SmallVec<[NodeId; 4]>;

/// A reusable template for a component kind
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    pub id: NodeId,
    pub component: ComponentKind,
    pub level: Level,
    pub label: String,
    /// Explicit theme override; `None` inherits from parent context/board
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeId>,
    pub properties: PropertyMap,
    #[serde(default, skip_serializing_if = "Children::is_empty")]
    pub children: Children,
    /// True for the schema-generated default variant of a board
    pub from_schema: bool,
    /// For user variants, the default variant this one was derived from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_of: Option<NodeId>,
}

/// A node nested inside another node's children
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceNode {
    pub id: NodeId,
    pub component: ComponentKind,
    pub level: Level,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeId>,
    pub properties: PropertyMap,
    #[serde(default, skip_serializing_if = "Children::is_empty")]
    pub children: Children,
    /// The variant this instance visually represents
    pub variant: NodeId,
    /// The node (variant or instance) this one was copied from
    pub instance_of: NodeId,
}

/// Polymorphic document node
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum Node {
    Variant(VariantNode),
    Instance(InstanceNode),
}

impl Node {
    pub fn id(&self) -> &NodeId {
        match self {
            Node::Variant(v) => &v.id,
            Node::Instance(i) => &i.id,
        }
    }

    pub fn component(&self) -> ComponentKind {
        match self {
            Node::Variant(v) => v.component,
            Node::Instance(i) => i.component,
        }
    }

    pub fn level(&self) -> Level {
        match self {
            Node::Variant(v) => v.level,
            Node::Instance(i) => i.level,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Node::Variant(v) => &v.label,
            Node::Instance(i) => &i.label,
        }
    }

    pub fn theme(&self) -> Option<&ThemeId> {
        match self {
            Node::Variant(v) => v.theme.as_ref(),
            Node::Instance(i) => i.theme.as_ref(),
        }
    }

    pub fn properties(&self) -> &PropertyMap {
        match self {
            Node::Variant(v) => &v.properties,
            Node::Instance(i) => &i.properties,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Variant(v) => &v.children,
            Node::Instance(i) => &i.children,
        }
    }

    /// True iff the node lives inside another node's children list
    pub fn is_child(&self) -> bool {
        matches!(self, Node::Instance(_))
    }

    /// The origin link for the override-inheritance chain
    pub fn instance_of(&self) -> Option<&NodeId> {
        match self {
            Node::Variant(v) => v.instance_of.as_ref(),
            Node::Instance(i) => Some(&i.instance_of),
        }
    }

    /// True for the schema-generated default variant
    pub fn is_default_variant(&self) -> bool {
        matches!(self, Node::Variant(v) if v.from_schema)
    }

    pub fn as_variant(&self) -> Option<&VariantNode> {
        match self {
            Node::Variant(v) => Some(v),
            Node::Instance(_) => None,
        }
    }

    pub fn as_instance(&self) -> Option<&InstanceNode> {
        match self {
            Node::Instance(i) => Some(i),
            Node::Variant(_) => None,
        }
    }

    /// The value stored in one property slot, if any
    pub fn property(&self, key: PropertyKey) -> Option<&PropertyValue> {
        self.properties().get(&key)
    }

    // ========== Mutable access (used by the document draft) ==========

    pub fn set_label(&mut self, label: String) {
        match self {
            Node::Variant(v) => v.label = label,
            Node::Instance(i) => i.label = label,
        }
    }

    pub fn set_theme(&mut self, theme: Option<ThemeId>) {
        match self {
            Node::Variant(v) => v.theme = theme,
            Node::Instance(i) => i.theme = theme,
        }
    }

    pub fn properties_mut(&mut self) -> &mut PropertyMap {
        match self {
            Node::Variant(v) => &mut v.properties,
            Node::Instance(i) => &mut i.properties,
        }
    }

    pub fn children_mut(&mut self) -> &mut Children {
        match self {
            Node::Variant(v) => &mut v.children,
            Node::Instance(i) => &mut i.children,
        }
    }
}

impl VariantNode {
    /// Schema-generated default variant for a component kind
    pub fn default_variant(id: NodeId, component: ComponentKind) -> Self {
        Self {
            id,
            component,
            level: component.level(),
            label: component.schema_label().to_string(),
            theme: None,
            properties: component.schema_properties(),
            children: Children::new(),
            from_schema: true,
            instance_of: None,
        }
    }
}
