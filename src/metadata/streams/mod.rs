//! Metadata streams of a .NET module.
//!
//! The metadata root lists up to five streams by name:
//!
//! - **`#~`** - the compressed metadata tables ([`TablesHeader`])
//! - **`#Strings`** - NUL-terminated UTF-8 identifiers ([`Strings`])
//! - **`#Blob`** - length-prefixed signatures and keys ([`Blob`])
//! - **`#US`** and **`#GUID`** - user strings and module GUIDs, not needed to describe
//!   types and left unread
//!
//! # References
//!
//! - ECMA-335 6th Edition, Partition II, Section 24.2.2 - Stream Headers

mod blob;
mod streamheader;
mod strings;
mod tablesheader;

pub use blob::Blob;
pub use streamheader::{StreamHeader, STREAM_NAMES};
pub use strings::Strings;
pub use tablesheader::TablesHeader;
