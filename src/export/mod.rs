//! Rendering of collected types as text, JSON or XML.
//!
//! All three renderers work on the same inputs: the [`DependencyLedger`] of the run and the
//! collected [`TypeRecord`] values. JSON is the canonical format; the text form is meant for
//! reading and the XML form mirrors the JSON structure.
//!
//! # Example
//!
//! ```rust
//! use dllexporter::export::{render, ExportFormat};
//! use dllexporter::resolver::DependencyLedger;
//!
//! let ledger = DependencyLedger::new();
//! let json = render("JSON".parse().unwrap(), &ledger, &[])?;
//! assert!(json.contains("\"Types\": []"));
//!
//! // unknown names fall back to text
//! assert_eq!("yaml".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
//! # Ok::<(), dllexporter::Error>(())
//! ```

mod json;
mod text;
mod xml;

use std::{convert::Infallible, fmt, str::FromStr};

use crate::{collector::TypeRecord, resolver::DependencyLedger, Result};

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Human readable listing
    #[default]
    Text,
    /// Indented JSON document
    Json,
    /// Indented XML document
    Xml,
}

impl FromStr for ExportFormat {
    type Err = Infallible;

    /// Case-insensitive; anything unrecognized selects [`ExportFormat::Text`].
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "json" => ExportFormat::Json,
            "xml" => ExportFormat::Xml,
            _ => ExportFormat::Text,
        })
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Text => write!(f, "text"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Xml => write!(f, "xml"),
        }
    }
}

/// Renders `types` and `ledger` in `format`.
///
/// # Errors
/// Returns [`crate::Error::Serialization`] if the JSON or XML writer fails.
pub fn render(
    format: ExportFormat,
    ledger: &DependencyLedger,
    types: &[TypeRecord],
) -> Result<String> {
    match format {
        ExportFormat::Text => Ok(text::render(ledger, types)),
        ExportFormat::Json => json::render(ledger, types),
        ExportFormat::Xml => xml::render(ledger, types),
    }
}
