//! The `ExportedType` table (0x27): types forwarded to, or defined in, other files of the
//! assembly.

mod raw;

pub use raw::*;
