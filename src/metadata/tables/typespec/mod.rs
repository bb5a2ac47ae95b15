//! The `TypeSpec` table (0x1B): constructed types (generic instantiations, arrays, pointers)
//! stored as signature blobs.

mod raw;

pub use raw::*;
