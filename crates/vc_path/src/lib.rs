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

mod any_path;
mod error;
mod kind;
mod macros;
mod optional;
mod typed;

pub mod mapper;

// -----------------------------------------------------------------------------
// Top-level exports

pub use any_path::AnyPath;
pub use error::CastError;
pub use kind::{Ownership, PathKind};
pub use optional::{OptionalPathExt, unwrap_path};
pub use typed::{
    Compose, Lift, Path, Readable, ReferenceWritable, ReferenceWritablePath, Writable,
    WritablePath,
};

/// The most common traits and types, for glob imports.
pub mod prelude {
    pub use crate::mapper::{Mappable, Mapper};
    pub use crate::{
        Compose, Lift, OptionalPathExt, Path, Readable, ReferenceWritable,
        ReferenceWritablePath, Writable, WritablePath,
    };
}
