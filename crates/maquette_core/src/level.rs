//! Structural tiers
//!
//! Every component kind sits on one tier of the nesting hierarchy. The
//! ordering is total: a node may only contain children of a strictly lower
//! tier, and primitives are always leaves.

use serde::{Deserialize, Serialize};

/// Structural tier of a component kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Primitive,
    Element,
    Module,
    Screen,
}

impl Level {
    /// Full tier list, lowest first
    pub fn all() -> &'static [Level] {
        const LEVELS: [Level; 4] = [
            Level::Primitive,
            Level::Element,
            Level::Module,
            Level::Screen,
        ];
        &LEVELS
    }

    /// User-facing display name
    pub fn display_name(self) -> &'static str {
        match self {
            Level::Primitive => "Primitive",
            Level::Element => "Element",
            Level::Module => "Module",
            Level::Screen => "Screen",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_totally_ordered() {
        assert!(Level::Primitive < Level::Element);
        assert!(Level::Element < Level::Module);
        assert!(Level::Module < Level::Screen);
    }
}
