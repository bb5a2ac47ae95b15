//! The `InterfaceImpl` table (0x09): interfaces implemented by each `TypeDef`.

mod raw;

pub use raw::*;
