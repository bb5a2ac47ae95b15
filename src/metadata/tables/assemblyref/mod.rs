//! The `AssemblyRef` table (0x23): the assemblies this module depends on.

mod raw;

pub use raw::*;
