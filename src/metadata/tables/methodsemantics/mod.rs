//! The `MethodSemantics` table (0x18): links properties and events to their accessor methods.

mod raw;

pub use raw::*;

use bitflags::bitflags;

bitflags! {
    /// Role of an accessor method (ECMA-335 II.23.1.12).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MethodSemanticsAttributes: u32 {
        /// Property setter
        const SETTER = 0x0001;
        /// Property getter
        const GETTER = 0x0002;
        /// Other accessor of a property or event
        const OTHER = 0x0004;
        /// Event `add` accessor
        const ADD_ON = 0x0008;
        /// Event `remove` accessor
        const REMOVE_ON = 0x0010;
        /// Event `raise` accessor
        const FIRE = 0x0020;
    }
}
