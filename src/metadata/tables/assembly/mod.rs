//! The `Assembly` table (0x20): the manifest row of the assembly, at most one row.

mod raw;

pub use raw::*;

use bitflags::bitflags;

bitflags! {
    /// Flags of `Assembly` and `AssemblyRef` rows (ECMA-335 II.23.1.2).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AssemblyFlags: u32 {
        /// The key blob holds the full public key rather than its token
        const PUBLIC_KEY = 0x0001;
        /// The assembly can be retargeted to another publisher
        const RETARGETABLE = 0x0100;
        /// JIT tracking is disabled
        const DISABLE_JIT_COMPILE_OPTIMIZER = 0x4000;
        /// JIT tracking is enabled
        const ENABLE_JIT_COMPILE_TRACKING = 0x8000;
    }
}
