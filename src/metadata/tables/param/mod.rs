//! The `Param` table (0x08): parameter names, grouped by their declaring method.
//!
//! Sequence `0` describes the return value; parameters start at sequence `1`. Rows may be
//! missing for unnamed parameters.

mod raw;

pub use raw::*;
