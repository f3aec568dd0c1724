//! Component catalog
//!
//! The closed set of component kinds the editor ships with, each pinned to
//! a structural tier with a schema-fixed default-variant label and the
//! built-in property slots a fresh default variant starts with. Nesting
//! legality lives here as the single `can_nest` predicate: the mutation
//! engine and the validation surface both consult it and nothing else
//! hard-codes tier rules.

use serde::{Deserialize, Serialize};

use maquette_core::{Dim, Level};
use maquette_theme::{SectionName, TokenRef};

use crate::property::{ComputedFn, ExactValue, PropertyKey, PropertyMap, PropertyValue};

/// Component kind catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    // Primitives
    Text,
    Icon,
    Divider,
    // Elements
    Button,
    Input,
    Checkbox,
    Badge,
    // Modules
    Card,
    Toolbar,
    Form,
    // Screens
    Page,
}

impl ComponentKind {
    /// Full catalog, tier order
    pub fn all() -> &'static [ComponentKind] {
        const KINDS: [ComponentKind; 11] = [
            ComponentKind::Text,
            ComponentKind::Icon,
            ComponentKind::Divider,
            ComponentKind::Button,
            ComponentKind::Input,
            ComponentKind::Checkbox,
            ComponentKind::Badge,
            ComponentKind::Card,
            ComponentKind::Toolbar,
            ComponentKind::Form,
            ComponentKind::Page,
        ];
        &KINDS
    }

    /// Structural tier this kind sits on
    pub fn level(self) -> Level {
        match self {
            Self::Text | Self::Icon | Self::Divider => Level::Primitive,
            Self::Button | Self::Input | Self::Checkbox | Self::Badge => Level::Element,
            Self::Card | Self::Toolbar | Self::Form => Level::Module,
            Self::Page => Level::Screen,
        }
    }

    /// Whether nodes of this kind may hold children at all
    pub fn supports_children(self) -> bool {
        self.level() > Level::Primitive
    }

    /// Schema-fixed label of the default variant (rename-proof)
    pub fn schema_label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Icon => "Icon",
            Self::Divider => "Divider",
            Self::Button => "Button",
            Self::Input => "Input",
            Self::Checkbox => "Checkbox",
            Self::Badge => "Badge",
            Self::Card => "Card",
            Self::Toolbar => "Toolbar",
            Self::Form => "Form",
            Self::Page => "Page",
        }
    }

    /// Built-in property slots of a fresh default variant.
    ///
    /// Also the fallback of last resort for `Inherit` resolution: when no
    /// ancestor defines an inherited slot, the resolver lands here.
    pub fn schema_properties(self) -> PropertyMap {
        let categorical =
            |section, key: &str| PropertyValue::ThemeCategorical(TokenRef::new(section, key));
        let ordinal = |section, key: &str| PropertyValue::ThemeOrdinal(TokenRef::new(section, key));
        let preset = |member: &str| PropertyValue::Preset(member.to_string());
        let px = |v: f32| PropertyValue::Exact(ExactValue::Dimension(Dim::px(v)));

        let mut props = PropertyMap::new();
        match self {
            Self::Text => {
                props.insert(PropertyKey::TextColor, PropertyValue::Inherit);
                props.insert(PropertyKey::Font, categorical(SectionName::Fonts, "body"));
            }
            Self::Icon => {
                props.insert(PropertyKey::Fill, PropertyValue::Inherit);
                props.insert(PropertyKey::Width, ordinal(SectionName::Sizes, "md"));
                props.insert(PropertyKey::Height, ordinal(SectionName::Sizes, "md"));
            }
            Self::Divider => {
                props.insert(PropertyKey::Fill, categorical(SectionName::Swatches, "outline"));
                props.insert(PropertyKey::Height, px(1.0));
            }
            Self::Button => {
                props.insert(PropertyKey::Fill, categorical(SectionName::Swatches, "primary"));
                props.insert(
                    PropertyKey::TextColor,
                    categorical(SectionName::Swatches, "on-primary"),
                );
                props.insert(PropertyKey::Padding, ordinal(SectionName::Gaps, "md"));
                props.insert(
                    PropertyKey::CornerRadius,
                    categorical(SectionName::Corners, "md"),
                );
                props.insert(PropertyKey::Gap, PropertyValue::Computed(ComputedFn::GapBox));
                props.insert(PropertyKey::Direction, preset("row"));
            }
            Self::Input => {
                props.insert(PropertyKey::Fill, categorical(SectionName::Swatches, "surface"));
                props.insert(
                    PropertyKey::BorderColor,
                    categorical(SectionName::Swatches, "outline"),
                );
                props.insert(PropertyKey::BorderWidth, px(1.0));
                props.insert(
                    PropertyKey::CornerRadius,
                    categorical(SectionName::Corners, "sm"),
                );
                props.insert(PropertyKey::Padding, ordinal(SectionName::Gaps, "sm"));
                props.insert(PropertyKey::TextColor, PropertyValue::Inherit);
            }
            Self::Checkbox => {
                props.insert(PropertyKey::Fill, categorical(SectionName::Swatches, "surface"));
                props.insert(
                    PropertyKey::BorderColor,
                    categorical(SectionName::Swatches, "outline"),
                );
                props.insert(PropertyKey::BorderWidth, px(1.0));
                props.insert(
                    PropertyKey::CornerRadius,
                    categorical(SectionName::Corners, "sm"),
                );
                props.insert(PropertyKey::Width, ordinal(SectionName::Sizes, "sm"));
                props.insert(PropertyKey::Height, ordinal(SectionName::Sizes, "sm"));
            }
            Self::Badge => {
                props.insert(PropertyKey::Fill, categorical(SectionName::Swatches, "accent"));
                props.insert(
                    PropertyKey::TextColor,
                    categorical(SectionName::Swatches, "on-primary"),
                );
                props.insert(
                    PropertyKey::CornerRadius,
                    categorical(SectionName::Corners, "pill"),
                );
                props.insert(PropertyKey::Padding, ordinal(SectionName::Gaps, "xs"));
            }
            Self::Card => {
                props.insert(PropertyKey::Fill, categorical(SectionName::Swatches, "surface"));
                props.insert(
                    PropertyKey::TextColor,
                    categorical(SectionName::Swatches, "on-surface"),
                );
                props.insert(PropertyKey::Padding, ordinal(SectionName::Gaps, "lg"));
                props.insert(
                    PropertyKey::CornerRadius,
                    categorical(SectionName::Corners, "lg"),
                );
                props.insert(PropertyKey::Gap, PropertyValue::Computed(ComputedFn::GapBox));
                props.insert(PropertyKey::Direction, preset("column"));
            }
            Self::Toolbar => {
                props.insert(PropertyKey::Fill, categorical(SectionName::Swatches, "surface"));
                props.insert(PropertyKey::Padding, ordinal(SectionName::Gaps, "sm"));
                props.insert(PropertyKey::Gap, ordinal(SectionName::Gaps, "sm"));
                props.insert(PropertyKey::Direction, preset("row"));
                props.insert(PropertyKey::Align, preset("center"));
            }
            Self::Form => {
                props.insert(PropertyKey::Gap, ordinal(SectionName::Gaps, "md"));
                props.insert(PropertyKey::Direction, preset("column"));
                props.insert(
                    PropertyKey::Padding,
                    PropertyValue::Computed(ComputedFn::OpticalPadding),
                );
            }
            Self::Page => {
                props.insert(PropertyKey::Fill, categorical(SectionName::Swatches, "surface"));
                props.insert(
                    PropertyKey::TextColor,
                    categorical(SectionName::Swatches, "on-surface"),
                );
                props.insert(PropertyKey::Padding, ordinal(SectionName::Gaps, "xl"));
                props.insert(PropertyKey::Gap, ordinal(SectionName::Gaps, "lg"));
                props.insert(PropertyKey::Direction, preset("column"));
            }
        }
        props
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.schema_label())
    }
}

/// Nesting predicate: may a `child` kind be placed under a `parent` kind?
///
/// The child's tier must sit below the parent's, except that modules may
/// contain other modules (a form inside a card). Module-in-module nesting
/// is why the circular-instance check exists: it is the one place a
/// variant could end up inside its own instances.
pub fn can_nest(parent: ComponentKind, child: ComponentKind) -> bool {
    if !parent.supports_children() {
        return false;
    }
    child.level() < parent.level()
        || (child.level() == parent.level() && parent.level() == Level::Module)
}
