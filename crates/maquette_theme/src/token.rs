//! Token references
//!
//! A token reference is the `@section.key` string a property value carries
//! instead of a concrete literal. Parsing is strict: the leading `@`, a
//! known section name, a single `.`, and a non-empty key.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

use crate::theme::SectionName;

/// A parsed `@section.key` theme token reference
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TokenRef {
    pub section: SectionName,
    pub key: String,
}

/// Error parsing a token reference string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid token reference {input:?}: {reason}")]
pub struct TokenRefParseError {
    pub input: String,
    pub reason: &'static str,
}

impl TokenRef {
    pub fn new(section: SectionName, key: impl Into<String>) -> Self {
        Self {
            section,
            key: key.into(),
        }
    }

    /// Shorthand for a swatch reference
    pub fn swatch(key: impl Into<String>) -> Self {
        Self::new(SectionName::Swatches, key)
    }
}

impl std::fmt::Display for TokenRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}.{}", self.section.id(), self.key)
    }
}

impl FromStr for TokenRef {
    type Err = TokenRefParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| TokenRefParseError {
            input: s.to_string(),
            reason,
        };
        let body = s.strip_prefix('@').ok_or_else(|| err("missing leading '@'"))?;
        let (section, key) = body
            .split_once('.')
            .ok_or_else(|| err("missing '.' between section and key"))?;
        if key.is_empty() || key.contains('.') {
            return Err(err("key must be a single non-empty segment"));
        }
        let section = SectionName::from_id(section).ok_or_else(|| err("unknown section"))?;
        Ok(TokenRef::new(section, key))
    }
}

impl Serialize for TokenRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TokenRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
