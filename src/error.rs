//! Error types for the `daryq` crate

use std::collections::TryReserveError;

/// Errors reported by heap operations.
///
/// None of these leave the heap in a modified state: an operation that
/// fails has not changed anything.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The operation needs at least one element and the heap has none.
    #[error("operation requires a non-empty heap")]
    EmptyHeap,

    /// The handle was never issued by this heap, or its element has
    /// already been extracted or erased.
    #[error("handle does not refer to an element of this heap")]
    InvalidHandle,

    /// Element storage could not grow to hold another element.
    #[error("heap storage could not grow: {0}")]
    AllocationFailure(#[from] TryReserveError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
