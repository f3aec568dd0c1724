//! Theme structure
//!
//! `Theme` is a plain value: an id, a display name, the ordinal scale core
//! parameters, and ordered token sections. Section and key order is
//! preserved so editor listings and freeze passes iterate deterministically.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use maquette_core::{Color, Dim, Unit};

use crate::token::TokenRef;
use crate::CUSTOM_SWATCH_PREFIX;

/// Opaque theme identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeId(String);

impl ThemeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ThemeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ThemeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Token section catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionName {
    Swatches,
    Fonts,
    Sizes,
    Gaps,
    Corners,
}

impl SectionName {
    /// Stable section id as used inside `@section.key` references
    pub fn id(self) -> &'static str {
        match self {
            Self::Swatches => "swatches",
            Self::Fonts => "fonts",
            Self::Sizes => "sizes",
            Self::Gaps => "gaps",
            Self::Corners => "corners",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "swatches" => Some(Self::Swatches),
            "fonts" => Some(Self::Fonts),
            "sizes" => Some(Self::Sizes),
            "gaps" => Some(Self::Gaps),
            "corners" => Some(Self::Corners),
            _ => None,
        }
    }

    /// Full section list, listing order
    pub fn all() -> &'static [SectionName] {
        const SECTIONS: [SectionName; 5] = [
            SectionName::Swatches,
            SectionName::Fonts,
            SectionName::Sizes,
            SectionName::Gaps,
            SectionName::Corners,
        ];
        &SECTIONS
    }
}

impl std::fmt::Display for SectionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// A concrete font preset payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub weight: u16,
    pub size: Dim,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, weight: u16, size: Dim) -> Self {
        Self {
            family: family.into(),
            weight,
            size,
        }
    }
}

/// Payload stored under a token key
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum TokenPayload {
    /// A concrete color (swatches)
    Color(Color),
    /// A font preset (fonts)
    Font(FontSpec),
    /// A step on the ordinal scale (sizes, gaps)
    Step(i32),
    /// A concrete dimensional value (corners, fixed sizes)
    Dim(Dim),
}

/// Core parameters of the ordinal scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleBase {
    /// Magnitude at step 0
    pub size: f32,
    /// Geometric ratio between adjacent steps
    pub ratio: f32,
    /// Unit attached to scaled magnitudes
    pub unit: Unit,
}

impl Default for ScaleBase {
    fn default() -> Self {
        Self {
            size: 16.0,
            ratio: 1.25,
            unit: Unit::Px,
        }
    }
}

/// Ordered map of token keys to payloads
pub type TokenSection = IndexMap<String, TokenPayload>;

/// A named bundle of design tokens
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub id: ThemeId,
    pub name: String,
    pub base: ScaleBase,
    pub sections: IndexMap<SectionName, TokenSection>,
    /// Highest custom swatch suffix ever allocated. Survives deletion of
    /// the swatch itself so freed numbers are never handed out again.
    /// Documents from before this field was persisted seed it lazily from
    /// the surviving keys.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub custom_seq: u32,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl Theme {
    /// Empty theme with the given identity
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ThemeId::new(id),
            name: name.into(),
            base: ScaleBase::default(),
            sections: IndexMap::new(),
            custom_seq: 0,
        }
    }

    /// Look up a token payload by reference
    pub fn token(&self, token: &TokenRef) -> Option<&TokenPayload> {
        self.sections.get(&token.section)?.get(&token.key)
    }

    /// Whether a reference resolves inside this theme
    pub fn contains(&self, token: &TokenRef) -> bool {
        self.token(token).is_some()
    }

    /// Read access to one section
    pub fn section(&self, name: SectionName) -> Option<&TokenSection> {
        self.sections.get(&name)
    }

    /// Insert (or replace) a token payload
    pub fn set_token(&mut self, token: TokenRef, payload: TokenPayload) {
        self.sections
            .entry(token.section)
            .or_default()
            .insert(token.key, payload);
    }

    /// Remove a token payload, preserving the order of the remaining keys
    pub fn remove_token(&mut self, token: &TokenRef) -> Option<TokenPayload> {
        self.sections.get_mut(&token.section)?.shift_remove(&token.key)
    }

    /// Next free `custom<N>` swatch key.
    ///
    /// The suffix is max(historical counter, max existing suffix) + 1, not
    /// the key count, so numbers freed by deletion are never reused, even
    /// when the deleted swatch was the highest-numbered one.
    pub fn next_custom_swatch_key(&self) -> String {
        format!("{}{}", CUSTOM_SWATCH_PREFIX, self.high_water_suffix() + 1)
    }

    /// Allocate the next custom swatch key and insert a color under it
    pub fn add_custom_swatch(&mut self, color: Color) -> TokenRef {
        let suffix = self.high_water_suffix() + 1;
        self.custom_seq = suffix;
        let token = TokenRef::swatch(format!("{CUSTOM_SWATCH_PREFIX}{suffix}"));
        self.set_token(token.clone(), TokenPayload::Color(color));
        token
    }

    fn high_water_suffix(&self) -> u32 {
        let max_existing = self
            .section(SectionName::Swatches)
            .map(|swatches| {
                swatches
                    .keys()
                    .filter_map(|key| key.strip_prefix(CUSTOM_SWATCH_PREFIX))
                    .filter_map(|suffix| suffix.parse::<u32>().ok())
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0);
        self.custom_seq.max(max_existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme_with_swatches(keys: &[&str]) -> Theme {
        let mut theme = Theme::new("test", "Test");
        for key in keys {
            theme.set_token(TokenRef::swatch(*key), TokenPayload::Color(Color::BLACK));
        }
        theme
    }

    #[test]
    fn test_token_lookup() {
        let theme = theme_with_swatches(&["primary"]);
        assert!(theme.contains(&TokenRef::swatch("primary")));
        assert!(!theme.contains(&TokenRef::swatch("missing")));
    }

    #[test]
    fn test_first_custom_swatch_key() {
        let theme = theme_with_swatches(&["primary"]);
        assert_eq!(theme.next_custom_swatch_key(), "custom1");
    }

    #[test]
    fn test_custom_swatch_key_skips_freed_numbers() {
        let mut theme = theme_with_swatches(&["custom1", "custom2", "custom6"]);
        // Deleting a lower-numbered swatch must not make its number reusable
        theme.remove_token(&TokenRef::swatch("custom2"));
        assert_eq!(theme.next_custom_swatch_key(), "custom7");
    }

    #[test]
    fn test_custom_swatch_key_survives_deleting_the_maximum() {
        let mut theme = Theme::new("test", "Test");
        for _ in 0..6 {
            theme.add_custom_swatch(Color::BLACK);
        }
        theme.remove_token(&TokenRef::swatch("custom6"));
        let token = theme.add_custom_swatch(Color::WHITE);
        assert_eq!(token.key, "custom7");
    }

    #[test]
    fn test_custom_swatch_key_ignores_non_numeric_suffixes() {
        let theme = theme_with_swatches(&["customx", "custom3"]);
        assert_eq!(theme.next_custom_swatch_key(), "custom4");
    }
}
