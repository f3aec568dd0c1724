//! Property slots and tagged values
//!
//! A node never stores final visual values. Each property slot holds a
//! tagged `PropertyValue` that the resolver turns into a concrete literal
//! through the cascade: exact literals pass through, presets stay
//! symbolic, theme references are looked up in the effective theme,
//! computed slots run a named pure function over the parent's resolved
//! values, and inherit defers up the tree.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use maquette_core::{AxisPair, Color, Dim};
use maquette_theme::TokenRef;

/// Property slot catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyKey {
    Fill,
    TextColor,
    BorderColor,
    BorderWidth,
    CornerRadius,
    Padding,
    Gap,
    Font,
    Width,
    Height,
    Opacity,
    Direction,
    Align,
    BackgroundPosition,
    BackgroundSize,
}

impl PropertyKey {
    /// Stable id as used in the persisted format
    pub fn id(self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::TextColor => "text-color",
            Self::BorderColor => "border-color",
            Self::BorderWidth => "border-width",
            Self::CornerRadius => "corner-radius",
            Self::Padding => "padding",
            Self::Gap => "gap",
            Self::Font => "font",
            Self::Width => "width",
            Self::Height => "height",
            Self::Opacity => "opacity",
            Self::Direction => "direction",
            Self::Align => "align",
            Self::BackgroundPosition => "background-position",
            Self::BackgroundSize => "background-size",
        }
    }
}

impl std::fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// A literal carried by an `Exact` value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "domain", content = "value", rename_all = "kebab-case")]
pub enum ExactValue {
    /// Single-axis magnitude with unit
    Dimension(Dim),
    Color(Color),
    Text(String),
    Flag(bool),
    /// Two independently unit-tagged axes (background position/size)
    Pair(AxisPair),
}

/// Named pure functions for computed slots.
///
/// Computed functions only ever consume already-resolved parent values,
/// never raw slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComputedFn {
    /// Parent's resolved padding, vertically compressed for optical balance
    OpticalPadding,
    /// Half the parent's resolved padding on both axes
    GapBox,
}

/// The tagged union stored in a property slot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum PropertyValue {
    /// Unset; the caller decides the rendering default
    Empty,
    /// A concrete literal, no indirection
    Exact(ExactValue),
    /// A symbolic member meaningful only to this property's schema
    Preset(String),
    /// `@section.key` reference; payload returned as-is
    ThemeCategorical(TokenRef),
    /// `@section.key` reference; step payloads go through the scale
    ThemeOrdinal(TokenRef),
    /// Named pure function over the parent's resolved context
    Computed(ComputedFn),
    /// Defer to the nearest ancestor that defines this property
    Inherit,
}

impl PropertyValue {
    /// The token reference carried by either theme-reference kind
    pub fn token_ref(&self) -> Option<&TokenRef> {
        match self {
            PropertyValue::ThemeCategorical(token) | PropertyValue::ThemeOrdinal(token) => {
                Some(token)
            }
            _ => None,
        }
    }

    /// Whether this slot holds any value at all
    pub fn is_set(&self) -> bool {
        !matches!(self, PropertyValue::Empty)
    }
}

/// Ordered map of property slots
pub type PropertyMap = IndexMap<PropertyKey, PropertyValue>;
