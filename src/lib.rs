// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # dllexporter
//!
//! Exports the public surface of a .NET module: its public classes, interfaces, enumerations
//! and value types with their methods, properties and fields. The module is read natively
//! through an ECMA-335 metadata reader, so neither Windows nor a .NET runtime is required.
//!
//! Non-system dependencies are looked up next to the module. Platform assemblies, resource
//! satellites and generated serializers are recognized by name and ignored. The outcome of
//! every lookup is kept in a [`resolver::DependencyLedger`] that becomes part of the export.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dllexporter::{export::ExportFormat, Session};
//!
//! let session = Session::open("bin/Library.dll")?;
//! for ty in session.types() {
//!     println!("{} ({})", ty.full_name, ty.kind.label());
//! }
//!
//! let json = session.render(ExportFormat::Json)?;
//! std::fs::write("Library.json", json)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`file`] - PE container, memory-mapped or in memory
//! - [`metadata`] - CLI header, metadata root, heaps, tables and signatures
//! - [`resolver`] - Classification and on-disk lookup of referenced assemblies
//! - [`project`] - Loads a module with its dependencies and checks which types can load
//! - [`collector`] - Builds [`collector::TypeRecord`]s for the public types
//! - [`export`] - Text, JSON and XML renderers
//! - [`session`] - One export run from path to rendered document
//! - [`diagnostics`] - Failures that were recovered from during a run
//!
//! ## Error Handling
//!
//! Failures that stop a run are returned as [`Error`]. Failures limited to a single type or
//! dependency are recovered and recorded in the session's diagnostics:
//!
//! ```rust,no_run
//! use dllexporter::{Error, Session};
//!
//! match Session::open("bin/Library.dll") {
//!     Ok(session) if session.diagnostics().has_errors() => {
//!         eprintln!("{}", session.diagnostics().summary())
//!     }
//!     Ok(_) => println!("clean export"),
//!     Err(Error::ModuleNotFound(path)) => eprintln!("missing: {}", path.display()),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```
//!
//! ### References
//!
//! - [ECMA-335 Standard](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - Official CLI specification
#[macro_use]
pub(crate) mod error;

/// In-memory .NET images for unit tests and for tests of dependent crates (`test-util` feature)
#[cfg(any(test, feature = "test-util"))]
#[allow(missing_docs)]
pub mod test;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust,no_run
/// use dllexporter::prelude::*;
///
/// let session = Session::open("Library.dll")?;
/// println!("{}", session.render(ExportFormat::Text)?);
/// # Ok::<(), dllexporter::Error>(())
/// ```
pub mod prelude;

/// PE file access and little-endian parsing primitives
pub mod file;

/// ECMA-335 metadata: CLI header, metadata root, streams, tables, signatures
///
/// [`metadata::cilmodule::CilModule`] ties the parts together for one loaded module.
///
/// # Example
///
/// ```rust,no_run
/// use dllexporter::metadata::cilmodule::CilModule;
/// use std::path::Path;
///
/// let module = CilModule::from_path(Path::new("Library.dll"))?;
/// println!("metadata version {}", module.root().version);
/// # Ok::<(), dllexporter::Error>(())
/// ```
pub mod metadata;

/// Recovered failures of an export run
pub mod diagnostics;

/// Dependency classification, lookup and bookkeeping
pub mod resolver;

/// Loading a module together with its dependencies
pub mod project;

/// Extraction of exported type records
pub mod collector;

/// Text, JSON and XML renderers
pub mod export;

/// One export run over a primary module
pub mod session;

/// `dllexporter` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `dllexporter` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;

/// PE container of a module.
pub use file::File;

/// Main entry point for an export run.
pub use session::Session;
