//! Dependency classification and on-disk resolution.
//!
//! Every assembly a module references passes through a [`DependencyResolver`] exactly once
//! per distinct name. Names of platform assemblies, localized resource satellites and
//! generated serialization helpers are never searched for; [`classify`] sorts them out without
//! touching the disk. Everything else is looked up next to the primary module by
//! [`DirectoryResolver`].
//!
//! The outcomes end up in a [`DependencyLedger`]: the names that were located and loaded, and
//! the names that were skipped on purpose. Names that could not be found appear in neither
//! list.
//!
//! # Example
//!
//! ```rust
//! use dllexporter::resolver::{classify, Classification};
//!
//! assert_eq!(classify("System.Runtime"), Classification::SystemIgnored);
//! assert_eq!(classify("Contoso.resources"), Classification::ResourceIgnored);
//! assert_eq!(classify("Contoso.XmlSerializers"), Classification::GeneratedIgnored);
//! assert_eq!(classify("Contoso.Helper"), Classification::NeedsResolution);
//! ```

mod directory;
mod ledger;

use std::sync::Arc;

use crate::metadata::cilmodule::CilModule;

pub use directory::DirectoryResolver;
pub use ledger::DependencyLedger;

/// Assembly names that ship with the platform.
const SYSTEM_ASSEMBLIES: [&str; 50] = [
    "mscorlib",
    "System",
    "System.Core",
    "System.Xml",
    "System.Data",
    "System.Configuration",
    "System.Runtime",
    "System.Private.CoreLib",
    "netstandard",
    "Microsoft.Win32.Primitives",
    "System.AppContext",
    "System.Collections",
    "System.Collections.Concurrent",
    "System.Console",
    "System.Diagnostics.Debug",
    "System.Diagnostics.Tools",
    "System.Diagnostics.Tracing",
    "System.Globalization",
    "System.IO",
    "System.IO.Compression",
    "System.IO.FileSystem",
    "System.IO.FileSystem.Primitives",
    "System.Linq",
    "System.Linq.Expressions",
    "System.Net.Primitives",
    "System.Net.Sockets",
    "System.ObjectModel",
    "System.Reflection",
    "System.Reflection.Extensions",
    "System.Reflection.Primitives",
    "System.Resources.ResourceManager",
    "System.Runtime.Extensions",
    "System.Runtime.Handles",
    "System.Runtime.InteropServices",
    "System.Runtime.InteropServices.RuntimeInformation",
    "System.Runtime.Numerics",
    "System.Security.Cryptography.Algorithms",
    "System.Security.Cryptography.Primitives",
    "System.Text.Encoding",
    "System.Text.Encoding.Extensions",
    "System.Text.RegularExpressions",
    "System.Threading",
    "System.Threading.Tasks",
    "System.Threading.Thread",
    "System.Threading.Timer",
    "System.ValueTuple",
    "System.Xml.ReaderWriter",
    "System.Xml.XmlDocument",
    "System.Xml.XPath",
    "System.Xml.XPath.XDocument",
];

/// Name prefixes reserved for platform and vendor assemblies.
const SYSTEM_PREFIXES: [&str; 4] = ["System.", "Microsoft.", "netstandard", "mscorlib"];

/// How a referenced assembly name is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Platform or vendor assembly, assumed to be always available
    SystemIgnored,
    /// Localized resource satellite (`*.resources`)
    ResourceIgnored,
    /// Generated serialization helper (`*.XmlSerializers`)
    GeneratedIgnored,
    /// Has to be found next to the primary module
    NeedsResolution,
}

impl Classification {
    /// Whether the name is skipped without a disk lookup.
    #[must_use]
    pub fn is_ignored(self) -> bool {
        self != Classification::NeedsResolution
    }
}

/// Classifies an assembly name. Pure; never touches the disk.
///
/// The platform list and prefixes are checked first, then the `.resources` and
/// `.XmlSerializers` suffixes.
#[must_use]
pub fn classify(name: &str) -> Classification {
    if SYSTEM_ASSEMBLIES.contains(&name)
        || SYSTEM_PREFIXES
            .iter()
            .any(|prefix| name.starts_with(prefix))
    {
        Classification::SystemIgnored
    } else if name.ends_with(".resources") {
        Classification::ResourceIgnored
    } else if name.ends_with(".XmlSerializers") {
        Classification::GeneratedIgnored
    } else {
        Classification::NeedsResolution
    }
}

/// Supplies the modules a loading module depends on.
///
/// The loader calls [`DependencyResolver::resolve`] once for every referenced assembly name,
/// before any type is collected. Implementations keep their own [`DependencyLedger`].
pub trait DependencyResolver {
    /// Returns the loaded module for `name`, or `None` when it is ignored or unavailable.
    ///
    /// Repeated calls for the same name must not repeat any lookup.
    fn resolve(&mut self, name: &str) -> Option<Arc<CilModule>>;

    /// Outcomes recorded so far.
    fn ledger(&self) -> &DependencyLedger;
}
