//! Node identifiers
//!
//! Ids are opaque strings, globally unique within one document. The
//! mutation engine never mints ids itself; callers supply them in
//! mutation payloads, which keeps an edit stream replayable. The engine only
//! rejects collisions.

use serde::{Deserialize, Serialize};

/// Opaque node identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
