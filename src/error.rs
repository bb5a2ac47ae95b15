use std::path::PathBuf;

use thiserror::Error;

use crate::project::TypeLoadFailure;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_bounds_error {
    () => {
        crate::Error::OutOfBounds
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## File Parsing Errors
/// - [`Error::Malformed`] - Corrupted or invalid file structure
/// - [`Error::OutOfBounds`] - Attempted to read beyond file boundaries
/// - [`Error::NotSupported`] - Unsupported file format or feature
/// - [`Error::Empty`] - Empty input provided
/// - [`Error::RecursionLimit`] - A signature nested deeper than the parser allows
///
/// ## I/O and External Errors
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::GoblinErr`] - PE parsing errors from the goblin crate
/// - [`Error::Serialization`] - JSON or XML writer failures
///
/// ## Loading Errors
/// - [`Error::ModuleNotFound`] - The primary module path does not exist
/// - [`Error::ModuleLoad`] - The primary module exists but could not be parsed
/// - [`Error::TypeLoad`] - A single type could not be loaded
///
/// # Examples
///
/// ```rust,no_run
/// use dllexporter::{Error, Session};
///
/// match Session::open("Library.dll") {
///     Ok(session) => println!("{} types", session.types().len()),
///     Err(Error::ModuleNotFound(path)) => eprintln!("missing: {}", path.display()),
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The file is damaged and could not be parsed.
    ///
    /// Carries the source location where the malformation was detected.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the file.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// This file type is not supported.
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Generic error for miscellaneous failures.
    #[error("{0}")]
    Error(String),

    /// Error from the goblin crate during PE parsing.
    #[error("{0}")]
    GoblinErr(#[from] goblin::error::Error),

    /// Recursion limit reached while parsing a signature.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// The primary module path does not exist.
    #[error("Module not found: {}", .0.display())]
    ModuleNotFound(PathBuf),

    /// The primary module exists but could not be loaded.
    #[error("Failed to load module {}: {source}", .path.display())]
    ModuleLoad {
        /// Path of the module that failed to load
        path: PathBuf,
        /// The underlying parse failure
        source: Box<Error>,
    },

    /// A single type definition could not be loaded.
    #[error("{0}")]
    TypeLoad(TypeLoadFailure),

    /// Rendering an export document failed.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Serialization(error.to_string())
    }
}
