//! Recovered failures of an export run.
//!
//! Loading and collection are lenient: a type that can not be loaded, a member that can not be
//! decoded or a dependency that can not be found does not abort the run. Each such failure is
//! logged and recorded here, so callers can report what was left out.
//!
//! [`Diagnostics`] appends through `&self` on top of `boxcar::Vec`. The collector creates one per
//! run and records type-load failures, extraction failures and missing dependencies into it.
//!
//! # Example
//!
//! ```rust
//! use dllexporter::diagnostics::{DiagnosticCategory, Diagnostics};
//!
//! let diagnostics = Diagnostics::new();
//! diagnostics.warning(DiagnosticCategory::Dependency, "Helper.dll not found");
//!
//! assert_eq!(diagnostics.warning_count(), 1);
//! assert!(!diagnostics.has_errors());
//! ```

use std::fmt::{self, Write};

use crate::metadata::token::Token;

/// How serious a recovered failure is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Informational, nothing was lost
    Info,
    /// Output is reduced but still meaningful
    Warning,
    /// A type or member was dropped from the output
    Error,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Info => write!(f, "INFO"),
            DiagnosticSeverity::Warning => write!(f, "WARN"),
            DiagnosticSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// Where a recovered failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    /// A type could not be loaded because of a missing dependency
    TypeLoad,
    /// The members of a loadable type could not be extracted
    Extraction,
    /// A referenced assembly could not be found or loaded
    Dependency,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::TypeLoad => write!(f, "TypeLoad"),
            DiagnosticCategory::Extraction => write!(f, "Extraction"),
            DiagnosticCategory::Dependency => write!(f, "Dependency"),
        }
    }
}

/// One recovered failure.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity
    pub severity: DiagnosticSeverity,
    /// Category
    pub category: DiagnosticCategory,
    /// Human readable description
    pub message: String,
    /// Metadata row the failure is about
    pub token: Option<Token>,
}

impl Diagnostic {
    /// Creates a diagnostic without a token.
    pub fn new(
        severity: DiagnosticSeverity,
        category: DiagnosticCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            token: None,
        }
    }

    /// Attaches the metadata token of the affected row.
    #[must_use]
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.category, self.message)?;

        if let Some(token) = self.token {
            write!(f, " (token: {token})")?;
        }

        Ok(())
    }
}

/// Append-only list of [`Diagnostic`] entries.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: boxcar::Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: boxcar::Vec::new(),
        }
    }

    /// Records an informational entry.
    pub fn info(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(DiagnosticSeverity::Info, category, message));
    }

    /// Records a warning.
    pub fn warning(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(
            DiagnosticSeverity::Warning,
            category,
            message,
        ));
    }

    /// Records an error.
    pub fn error(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(
            DiagnosticSeverity::Error,
            category,
            message,
        ));
    }

    /// Records a prepared entry.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Whether anything was recorded.
    #[must_use]
    pub fn has_any(&self) -> bool {
        self.entries.count() > 0
    }

    /// Whether an error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.iter().any(|d| d.severity == DiagnosticSeverity::Error)
    }

    /// Number of entries.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Number of errors.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count_severity(DiagnosticSeverity::Error)
    }

    /// Number of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count_severity(DiagnosticSeverity::Warning)
    }

    fn count_severity(&self, severity: DiagnosticSeverity) -> usize {
        self.iter().filter(|d| d.severity == severity).count()
    }

    /// Entries in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|(_, d)| d)
    }

    /// Entries of one category.
    #[must_use]
    pub fn by_category(&self, category: DiagnosticCategory) -> Vec<&Diagnostic> {
        self.iter().filter(|d| d.category == category).collect()
    }

    /// Multi-line summary: counts first, then every error and warning.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut output = String::new();

        let _ = writeln!(
            output,
            "Diagnostics: {} error(s), {} warning(s)",
            self.error_count(),
            self.warning_count()
        );

        for diag in self
            .iter()
            .filter(|d| d.severity != DiagnosticSeverity::Info)
        {
            let _ = writeln!(output, "  {diag}");
        }

        output
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
