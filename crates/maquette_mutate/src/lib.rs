//! Maquette Mutation Engine
//!
//! The sole write path into a document. Every edit, human or automated,
//! arrives as a discriminated [`Mutation`] request and runs through the
//! same two-phase pipeline:
//!
//! 1. **validate-and-locate**: pure checks against the current snapshot.
//!    A request the user is not allowed to make comes back as
//!    [`MutationOutcome::Rejected`] with a reason; the document is
//!    untouched.
//! 2. **apply**: a copy-on-write draft produces the next snapshot.
//!    Structural operations re-verify the document invariants afterwards;
//!    a failure there is a [`DocumentError`], not a rejection, because it
//!    means the engine (or an imported document) is broken.
//!
//! There is no partial application: either the whole operation succeeds
//! and the caller gets a new snapshot, or the prior snapshot stays valid
//! byte for byte.
//!
//! Whether an edit replicates to related nodes is decided by the
//! declarative [`rules`] table: per operation and per entity kind
//! (default variant / user variant / instance), an edit either stays on
//! its target, follows the origin chains down to *descendants*, or fans
//! out to *siblings of origin* sharing the same variant.
//!
//! [`DocumentError`]: maquette_document::DocumentError

pub mod engine;
pub mod ops;
pub mod rules;
pub mod structure;
pub mod swatch;
pub mod validate;

pub use engine::{apply, MutationOutcome, RejectReason};
pub use ops::Mutation;
pub use rules::{entity_kind, rule_for, EntityKind, OpKind, Propagation, Rule};
pub use validate::{can_insert, ReasonCode, Validity};
