//! # dllexporter Prelude
//!
//! Re-exports of the types needed for a typical export run. Import this module to get quick
//! access to the session, the records and the renderers.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dllexporter operations
pub use crate::Error;

/// The result type used throughout dllexporter
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// One export run over a primary module
pub use crate::session::{Session, SessionBuilder};

/// Loading a module with its dependencies
pub use crate::project::{LoadedModule, ModuleLoader, TypeLoadFailure};

/// A single parsed module
pub use crate::metadata::cilmodule::CilModule;

// ================================================================================================
// Dependencies
// ================================================================================================

/// Resolver contract, the directory-based resolver and their bookkeeping
pub use crate::resolver::{
    classify, Classification, DependencyLedger, DependencyResolver, DirectoryResolver,
};

// ================================================================================================
// Records and Export
// ================================================================================================

/// Exported type records
pub use crate::collector::{
    collect, FieldRecord, MethodRecord, ParameterRecord, PropertyRecord, TypeKind, TypeRecord,
};

/// Output formats
pub use crate::export::{render, ExportFormat};

/// Recovered failures
pub use crate::diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics};

// ================================================================================================
// Metadata
// ================================================================================================

/// Metadata token type for referencing table entries
pub use crate::metadata::token::Token;

/// Assembly identities
pub use crate::metadata::identity::{AssemblyIdentity, AssemblyVersion};
