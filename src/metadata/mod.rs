//! Metadata parsing for .NET modules.
//!
//! This module reads the parts of the ECMA-335 metadata the exporter needs: the CLI header,
//! the metadata root with its stream directory, the `#Strings` and `#Blob` heaps, the `#~`
//! tables and the signature blobs. [`cilmodule::CilModule`] owns a loaded file together with
//! these views.
//!
//! # Key Components
//!
//! - [`cilmodule`] - A loaded module with identity, references and table access
//! - [`cor20header`] - CLI header
//! - [`root`] - Metadata root and stream directory
//! - [`streams`] - Heaps and the tables header
//! - [`tables`] - Raw table rows and coded indexes
//! - [`signatures`] - Method, field, property and type signatures
//! - [`typesystem`] - Element types and textual type names
//! - [`identity`] - Assembly identities and public key tokens
//! - [`token`] - Metadata tokens
//!
//! # Examples
//!
//! ```rust,no_run
//! use dllexporter::metadata::{cilmodule::CilModule, tables::TypeDefRaw};
//! use std::path::Path;
//!
//! let module = CilModule::from_path(Path::new("Library.dll"))?;
//! if let Some(types) = module.table::<TypeDefRaw>() {
//!     for row in types.iter() {
//!         println!("{}", module.string(row.type_name)?);
//!     }
//! }
//! # Ok::<(), dllexporter::Error>(())
//! ```

/// A loaded module and its parsed metadata
pub mod cilmodule;
/// Implementation of the Header of CIL
pub mod cor20header;
/// Assembly identities and display names
pub mod identity;
/// Implementation of the root metadata structure
pub mod root;
/// Implementation of method and type signatures
pub mod signatures;
/// Implementation of the metadata streams (tables and heaps)
pub mod streams;
/// Implementation of the .NET metadata tables
pub mod tables;
/// Commonly used metadata token type
pub mod token;
/// Element types and textual type names
pub mod typesystem;
