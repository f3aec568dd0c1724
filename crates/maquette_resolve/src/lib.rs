//! Maquette Resolution Engine
//!
//! Read-only queries that turn a node's indirect property values into
//! concrete, renderable literals:
//!
//! - **Theme resolution**: which theme is in effect for a node: its own
//!   explicit override, else the nearest ancestor's, else the owning
//!   board's.
//! - **Value resolution**: the fixed-precedence cascade over one property
//!   slot (empty, exact, preset, theme token, computed, inherit). The
//!   first branch that applies wins; the rest are skipped.
//! - **Size/position grammar**: the shared pure predicate validating
//!   two-axis value strings like `"10px 20%"`.
//!
//! Everything here is a one-shot deterministic walk over an immutable
//! snapshot. Resolving the same slot on the same snapshot twice yields the
//! same output; nothing is cached or subscribed.
//!
//! A missing theme token is a hard [`DocumentError::TokenNotFound`]: a
//! theme swap dropped a token some node still references, and a silent
//! fallback would hide that data loss from the editing user.
//!
//! [`DocumentError::TokenNotFound`]: maquette_document::DocumentError

pub mod grammar;
pub mod theme_resolver;
pub mod value_resolver;

pub use grammar::{is_valid_axis_pair, is_valid_pair, parse_axis_pair, GrammarError};
pub use theme_resolver::{
    collect_used_themes, node_theme, node_theme_id, object_theme, object_theme_id, theme,
    ThemeTarget,
};
pub use value_resolver::{resolve_property, ConcreteValue};
