//! Document error types
//!
//! Everything in `DocumentError` is an invariant violation: the document
//! itself is inconsistent, usually because a malformed external file was
//! imported or because of a bug upstream. These propagate uncaught to the
//! caller and are never silently recovered, because continuing would produce
//! visual output the user cannot tell is wrong.
//!
//! User-facing validation failures (a disallowed rename, an insert that
//! would break nesting rules) are *not* errors; the mutation engine
//! returns those as ordinary rejection values.

use thiserror::Error;

use crate::catalog::ComponentKind;
use crate::id::NodeId;

/// Invariant violations raised by the document core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    /// An id does not resolve in the node table
    #[error("node not found: {id}")]
    NodeNotFound { id: NodeId },

    /// A child node has no resolvable parent
    #[error("parent not found for child node {id}")]
    ParentNotFound { id: NodeId },

    /// A node appears in more than one children/variants list
    #[error("node {id} is referenced by more than one parent")]
    MultipleParents { id: NodeId },

    /// A node's child flag disagrees with where it is referenced from
    /// (a variant inside a children list, or vice versa)
    #[error("node {id} is referenced as the wrong kind of child")]
    ChildFlagMismatch { id: NodeId },

    /// A children or variants list references a missing node
    #[error("dangling reference to {child} in {parent}")]
    DanglingReference { parent: NodeId, child: NodeId },

    /// The instance-of chain revisited a node within one walk
    #[error("circular origin chain through {id}")]
    CircularOrigin { id: NodeId },

    /// The instance-of chain ended somewhere other than a default variant
    #[error("origin chain of {id} does not terminate at a default variant")]
    BrokenOriginChain { id: NodeId },

    /// A root variant is not listed on any board
    #[error("variant {id} is not owned by any board")]
    OrphanVariant { id: NodeId },

    /// No board exists for a component kind
    #[error("no board for component {component}")]
    BoardNotFound { component: ComponentKind },

    /// A default variant's label no longer matches its schema
    #[error("default variant {id} carries a non-schema label {label:?}")]
    SchemaLabelMutated { id: NodeId, label: String },

    /// A parent/child pair violates the catalog nesting rules
    #[error("node {child} cannot be nested under {parent}")]
    InvalidNesting { parent: NodeId, child: NodeId },

    /// A referenced theme id resolves to no known theme
    #[error("theme not found: {id}")]
    ThemeNotFound { id: String },

    /// A property references a token missing from the resolved theme.
    /// Typically a theme swap dropped a token a node still points at;
    /// falling back silently would hide the data loss.
    #[error("theme token not found: {reference}")]
    TokenNotFound { reference: String },

    /// A token resolved to a payload its reference kind cannot carry
    /// (e.g. a categorical reference landing on a scale step)
    #[error("token payload mismatch for {reference}")]
    TokenKindMismatch { reference: String },

    /// The persisted payload could not be parsed into a document
    #[error("malformed document: {0}")]
    Malformed(String),

    /// The persisted document is newer than this build understands
    #[error("unsupported document version {found} (current is {current})")]
    VersionUnsupported { found: u32, current: u32 },
}

/// Result alias for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;
