use thiserror::Error;

use crate::PathKind;

// -----------------------------------------------------------------------------
// Error

/// Error returned when an [`AnyPath`](crate::AnyPath) is downcast
/// to a typed path it cannot back.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CastError {
    #[error("Cannot cast a {actual} path into a {expected} path")]
    KindMismatch { expected: PathKind, actual: PathKind },
}

impl CastError {
    /// Returns the kind of the erased path.
    #[inline]
    pub const fn actual(&self) -> PathKind {
        match self {
            Self::KindMismatch { actual, .. } => *actual,
        }
    }

    /// Returns the kind that was requested.
    #[inline]
    pub const fn expected(&self) -> PathKind {
        match self {
            Self::KindMismatch { expected, .. } => *expected,
        }
    }
}
