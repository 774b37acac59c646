//! Provide `FixedHashState`, the stable hasher behind identity tokens.
//!
//! Identity tokens pre-compute their hash once, at construction time.
//! The result must only depend on the token content, so the state is
//! seeded with a fixed value instead of a per-process random one.

use core::hash::{BuildHasher, Hash};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHasher

/// The seed shared by every [`FixedHashState`].
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x2D35_8DCC_AA6C_78A5);

/// A hasher whose results only depend on the input.
///
/// A type alias for [`foldhash::fast::FoldHasher`],
/// created through [`FixedHashState::build_hasher`].
pub type FixedHasher = FoldHasher<'static>;

/// Fixed hash state based upon a random but fixed seed.
///
/// # Examples
///
/// ```
/// use core::hash::{BuildHasher, Hash, Hasher};
/// use vc_identity::hash::FixedHashState;
///
/// let mut hasher = FixedHashState.build_hasher();
/// 3.hash(&mut hasher);
/// let first = hasher.finish();
///
/// assert_eq!(first, FixedHashState.hash_one(3));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

/// Hashes a single value with [`FixedHashState`].
///
/// # Examples
///
/// ```
/// use vc_identity::hash::fixed_hash;
///
/// assert_eq!(fixed_hash(&"token"), fixed_hash(&"token"));
/// assert_ne!(fixed_hash(&1_u32), fixed_hash(&2_u32));
/// ```
#[inline]
pub fn fixed_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    FixedHashState.hash_one(value)
}

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
