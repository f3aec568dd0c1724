//! Maquette Document Store
//!
//! The document is the immutable value at the center of the editor: a map
//! of boards (one per component kind), a node table holding every variant
//! and instance, and the single mutable custom theme. Mutations never edit
//! a document in place; they build the next snapshot through a
//! copy-on-write [`DocumentDraft`], so readers holding an older snapshot
//! are never invalidated mid-read.
//!
//! # Node model
//!
//! Nodes are a tagged sum:
//!
//! - [`node::VariantNode`]: a reusable template addressed from a board's
//!   variant list. Default variants come from the component schema and
//!   keep their schema-fixed label; user variants are derived copies.
//! - [`node::InstanceNode`]: a node nested in another node's children,
//!   bound to a variant for visual identity and to an origin node for
//!   override inheritance.
//!
//! Exhaustive matching on [`node::Node`] forces every operation to handle
//! both kinds.
//!
//! # Navigation
//!
//! The [`navigator`] module is the read-only traversal service: parent and
//! sibling lookup, variant flattening, variant-in-use search, and the
//! cycle-safe origin-chain walk. All traversal follows one deterministic
//! order (board insertion order, then variant list order, then depth-first
//! children order), so results are stable under test.

pub mod board;
pub mod catalog;
pub mod document;
pub mod error;
pub mod id;
pub mod migrate;
pub mod navigator;
pub mod node;
pub mod property;

pub use board::Board;
pub use catalog::ComponentKind;
pub use document::{custom_theme_id, Document, DocumentDraft};
pub use error::{DocumentError, Result};
pub use id::NodeId;
pub use migrate::DOCUMENT_VERSION;
pub use node::{InstanceNode, Node, VariantNode};
pub use property::{ComputedFn, ExactValue, PropertyKey, PropertyMap, PropertyValue};
