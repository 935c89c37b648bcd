//! Contract-violation errors.
//!
//! Nothing here is a user-facing diagnostic: every variant means the calling
//! pass broke an internal precondition. The panicking entry points format
//! these into their panic message; the `try_` variants hand them back.

use thiserror::Error;

/// A delegate cache contract violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// A container or field was named twice.
    #[error("{symbol} was already named `{existing}`")]
    NameAlreadyAssigned { symbol: String, existing: String },

    /// A field was requested from a module-scoped container after finalization.
    #[error("cache container `{container}` is frozen; no fields can be added")]
    ContainerFrozen { container: String },

    /// A conversion supplied the wrong number of type arguments for its target.
    #[error("generic cache container takes {expected} type arguments, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    /// Finalization ran twice for one manager.
    #[error("delegate cache manager was already finalized")]
    AlreadyFinalized,
}
