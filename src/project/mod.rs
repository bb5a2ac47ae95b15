//! Loading a module together with its dependencies.
//!
//! [`ModuleLoader`] loads the primary module and walks its assembly references breadth-first,
//! handing every distinct name to a [`crate::resolver::DependencyResolver`]. The references of
//! each resolved dependency are walked as well. The result is a [`LoadedModule`].
//!
//! [`LoadedModule::types`] then decides, per type definition, whether the type can be loaded
//! with the dependencies at hand. A type can not be loaded when its base type or one of its
//! interfaces lives in an assembly that was neither ignored nor resolved, or in a resolved
//! assembly that does not provide it. Such types come back as [`TypeLoadFailure`] values
//! instead of aborting the enumeration.
//!
//! # Example
//!
//! ```rust,no_run
//! use dllexporter::project::ModuleLoader;
//! use dllexporter::resolver::DirectoryResolver;
//! use std::path::Path;
//!
//! let path = Path::new("bin/Library.dll");
//! let mut resolver = DirectoryResolver::for_module(path);
//! let loaded = ModuleLoader::load(path, &mut resolver)?;
//!
//! for outcome in loaded.types() {
//!     match outcome {
//!         Ok(row) => println!("loadable: {}", row.token),
//!         Err(failure) => println!("{failure}"),
//!     }
//! }
//! # Ok::<(), dllexporter::Error>(())
//! ```

mod loader;
mod typeload;

pub use loader::{LoadedModule, ModuleLoader};
pub use typeload::{TypeLoadFailure, TypeLoadReason};
