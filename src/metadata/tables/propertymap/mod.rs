//! The `PropertyMap` table (0x15): the run of `Property` rows owned by a `TypeDef`.
//!
//! A type's properties run from its `property_list` up to the next row's, or to the end of
//! the `Property` table for the last row.

mod raw;

pub use raw::*;
