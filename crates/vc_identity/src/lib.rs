#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(any(test, feature = "std"))]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod force_eq;
mod hash_token;
mod token;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use force_eq::{EqStrategy, ForceEq, dump};
pub use hash_token::HashTokenWrapper;
pub use token::{IdentityToken, Tokens, TypeToken};
