//! The `Property` table (0x17): property names and signatures.
//!
//! Accessors are not part of the row; they are linked through `MethodSemantics`.

mod raw;

pub use raw::*;
