//! The `GenericParam` table (0x2A): generic parameters of types and methods.
//!
//! Rows are sorted by owner, then by `number`.

mod raw;

pub use raw::*;
