//! The `TypeRef` table (0x01): references to types defined elsewhere.
//!
//! The resolution scope says where the type lives: an `AssemblyRef` for types of other
//! assemblies, another `TypeRef` for nested types, `Module`/`ModuleRef` for this assembly.

mod raw;

pub use raw::*;
