//! Raw rows of the metadata tables read by the exporter.
//!
//! Each table lives in its own module with a `*Raw` row type implementing [`RowReadable`].
//! Rows are plain decoded values: heap indexes are left unresolved and references to other
//! tables stay as row ids or [`CodedIndex`] values. Resolving them is the job of the caller,
//! which holds the heaps.
//!
//! Only the tables the type model needs are decoded; the others are still sized through
//! [`TableId::columns`] so the tables that follow them can be located.

mod assembly;
mod assemblyref;
mod exportedtype;
mod field;
mod genericparam;
mod interfaceimpl;
mod methoddef;
mod methodsemantics;
mod param;
mod property;
mod propertymap;
mod typedef;
mod typeref;
mod typespec;
mod types;

pub use assembly::*;
pub use assemblyref::*;
pub use exportedtype::*;
pub use field::*;
pub use genericparam::*;
pub use interfaceimpl::*;
pub use methoddef::*;
pub use methodsemantics::*;
pub use param::*;
pub use property::*;
pub use propertymap::*;
pub use typedef::*;
pub use typeref::*;
pub use typespec::*;
pub use types::*;
