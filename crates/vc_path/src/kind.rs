use core::fmt;

// -----------------------------------------------------------------------------
// Ownership

/// Who owns the slot a writable path writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// The slot lives inside the root, writes need `&mut Root`.
    ///
    /// A write below a value-owned link must copy the modified value
    /// back up into the root.
    Value,
    /// The slot lives inside a shared container reachable from the root,
    /// writes only need `&Root`.
    ///
    /// A write below a reference-owned link is visible through every holder
    /// of the container, nothing is written back upstream.
    Reference,
}

// -----------------------------------------------------------------------------
// PathKind

/// The runtime capability of a path.
///
/// # Examples
///
/// ```
/// use vc_path::{Ownership, PathKind};
///
/// assert_eq!(PathKind::Writable.ownership(), Some(Ownership::Value));
/// assert_eq!(PathKind::ReadOnly.ownership(), None);
///
/// let kind = PathKind::Writable.compose(PathKind::ReferenceWritable);
/// assert_eq!(kind, PathKind::ReferenceWritable);
///
/// let kind = PathKind::ReadOnly.compose(PathKind::ReferenceWritable);
/// assert_eq!(kind, PathKind::ReadOnly);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKind {
    /// Only readable.
    ReadOnly,
    /// Readable and writable through `&mut Root`.
    Writable,
    /// Readable and writable through `&Root`.
    ReferenceWritable,
}

impl PathKind {
    /// Returns the kind of a writable path with the given ownership.
    #[inline]
    pub const fn writable(ownership: Ownership) -> Self {
        match ownership {
            Ownership::Value => Self::Writable,
            Ownership::Reference => Self::ReferenceWritable,
        }
    }

    /// Returns `true` if the path can be written.
    #[inline]
    pub const fn is_writable(self) -> bool {
        !matches!(self, Self::ReadOnly)
    }

    /// Returns the ownership of the written slot, `None` for read-only paths.
    #[inline]
    pub const fn ownership(self) -> Option<Ownership> {
        match self {
            Self::ReadOnly => None,
            Self::Writable => Some(Ownership::Value),
            Self::ReferenceWritable => Some(Ownership::Reference),
        }
    }

    /// Returns the kind of `self` followed by `inner`.
    ///
    /// The result is writable only if both links are writable, and
    /// reference-owned if either link is reference-owned.
    #[inline]
    pub const fn compose(self, inner: Self) -> Self {
        match (self.ownership(), inner.ownership()) {
            (None, _) | (_, None) => Self::ReadOnly,
            (Some(Ownership::Value), Some(Ownership::Value)) => Self::Writable,
            _ => Self::ReferenceWritable,
        }
    }

    /// Returns `true` if a path of kind `self` provides every capability of `other`.
    ///
    /// ```
    /// use vc_path::PathKind;
    ///
    /// assert!(PathKind::ReferenceWritable.satisfies(PathKind::Writable));
    /// assert!(!PathKind::Writable.satisfies(PathKind::ReferenceWritable));
    /// assert!(PathKind::Writable.satisfies(PathKind::ReadOnly));
    /// ```
    #[inline]
    pub const fn satisfies(self, other: Self) -> bool {
        match other {
            Self::ReadOnly => true,
            Self::Writable => self.is_writable(),
            Self::ReferenceWritable => matches!(self, Self::ReferenceWritable),
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ReadOnly => "read-only",
            Self::Writable => "writable",
            Self::ReferenceWritable => "reference-writable",
        })
    }
}

// -----------------------------------------------------------------------------
// Tests
