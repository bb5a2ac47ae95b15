//! One export run: resolve, load, collect, render.
//!
//! A [`Session`] owns everything produced for one primary module: the dependency ledger,
//! the collected types and the diagnostics. Each session creates its own resolver, so
//! sessions never share resolution state.
//!
//! # Example
//!
//! ```rust,no_run
//! use dllexporter::{export::ExportFormat, Session};
//!
//! let session = Session::builder()
//!     .search_path("lib")
//!     .open("bin/Library.dll")?;
//!
//! println!("{}", session.render(ExportFormat::Json)?);
//! if session.diagnostics().has_any() {
//!     eprintln!("{}", session.diagnostics());
//! }
//! # Ok::<(), dllexporter::Error>(())
//! ```

use std::path::{Path, PathBuf};

use log::info;

use crate::{
    collector::{collect, TypeRecord},
    diagnostics::Diagnostics,
    export::{render, ExportFormat},
    project::ModuleLoader,
    resolver::{DependencyLedger, DirectoryResolver},
    Result,
};

/// Options of a [`Session`].
#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    search_paths: Vec<PathBuf>,
}

impl SessionBuilder {
    /// Adds a directory searched for dependencies after the primary module's directory.
    #[must_use]
    pub fn search_path(mut self, directory: impl Into<PathBuf>) -> Self {
        self.search_paths.push(directory.into());
        self
    }

    /// Loads the module at `path` and collects its types.
    ///
    /// # Errors
    /// Returns [`crate::Error::ModuleNotFound`] or [`crate::Error::ModuleLoad`] if the primary
    /// module can not be loaded. Failures below the primary module are recovered and end up
    /// in [`Session::diagnostics`].
    pub fn open(self, path: impl AsRef<Path>) -> Result<Session> {
        let path = path.as_ref();

        let mut resolver = self
            .search_paths
            .into_iter()
            .fold(DirectoryResolver::for_module(path), DirectoryResolver::with_search_path);

        let loaded = ModuleLoader::load(path, &mut resolver)?;
        let collection = collect(&loaded);
        info!(
            "Collected {} types from {}",
            collection.types.len(),
            path.display()
        );

        Ok(Session {
            path: path.to_path_buf(),
            ledger: resolver.into_ledger(),
            types: collection.types,
            diagnostics: collection.diagnostics,
        })
    }
}

/// The result of exporting one module.
#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    ledger: DependencyLedger,
    types: Vec<TypeRecord>,
    diagnostics: Diagnostics,
}

impl Session {
    /// Loads the module at `path`, searching dependencies next to it.
    ///
    /// # Errors
    /// See [`SessionBuilder::open`].
    pub fn open(path: impl AsRef<Path>) -> Result<Session> {
        Self::builder().open(path)
    }

    /// Starts configuring a session.
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// Path of the primary module.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Exported types in table order.
    #[must_use]
    pub fn types(&self) -> &[TypeRecord] {
        &self.types
    }

    /// Dependency outcomes of the run.
    #[must_use]
    pub fn ledger(&self) -> &DependencyLedger {
        &self.ledger
    }

    /// Recovered failures of the run.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Renders the run in `format`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Serialization`] if the JSON or XML writer fails.
    pub fn render(&self, format: ExportFormat) -> Result<String> {
        render(format, &self.ledger, &self.types)
    }
}
