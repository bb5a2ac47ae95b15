use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{debug, info, warn};

use crate::{
    metadata::cilmodule::CilModule,
    resolver::{classify, Classification, DependencyLedger, DependencyResolver},
};

/// File extensions tried for a dependency, in order.
const EXTENSIONS: [&str; 2] = ["dll", "exe"];

/// Resolves dependencies from the directory of the primary module.
///
/// Ignored names are recorded without a lookup. Other names are searched as `<name>.dll`,
/// then `<name>.exe`, first in the primary directory and then in each extra search path in
/// the order they were added. Every outcome is cached, so a name is looked up at most once
/// per resolver.
///
/// # Example
///
/// ```rust,no_run
/// use dllexporter::resolver::{DependencyResolver, DirectoryResolver};
///
/// let mut resolver = DirectoryResolver::new("bin/Release").with_search_path("lib");
/// if let Some(module) = resolver.resolve("Contoso.Helper") {
///     println!("{:?}", module.identity());
/// }
/// println!("resolved: {:?}", resolver.ledger().resolved());
/// ```
pub struct DirectoryResolver {
    search_paths: Vec<PathBuf>,
    ledger: DependencyLedger,
    cache: HashMap<String, Option<Arc<CilModule>>>,
}

impl DirectoryResolver {
    /// Creates a resolver searching `directory`.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        DirectoryResolver {
            search_paths: vec![directory.into()],
            ledger: DependencyLedger::new(),
            cache: HashMap::new(),
        }
    }

    /// Creates a resolver searching the directory that contains `module_path`.
    #[must_use]
    pub fn for_module(module_path: &Path) -> Self {
        match module_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Self::new(parent),
            _ => Self::new("."),
        }
    }

    /// Adds a directory searched after the ones already configured.
    #[must_use]
    pub fn with_search_path(mut self, directory: impl Into<PathBuf>) -> Self {
        self.search_paths.push(directory.into());
        self
    }

    /// Directories searched, in order.
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Consumes the resolver, keeping its ledger.
    #[must_use]
    pub fn into_ledger(self) -> DependencyLedger {
        self.ledger
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        self.search_paths.iter().find_map(|directory| {
            EXTENSIONS
                .iter()
                .map(|extension| directory.join(format!("{name}.{extension}")))
                .find(|candidate| candidate.is_file())
        })
    }

    fn lookup(&mut self, name: &str) -> Option<Arc<CilModule>> {
        debug!("Resolving dependency {name}");

        let Some(path) = self.locate(name) else {
            warn!(
                "Dependency {name} not found in {}",
                self.search_paths
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            return None;
        };

        match CilModule::from_path(&path) {
            Ok(module) => {
                self.ledger.record_resolved(name);
                info!("Resolved dependency {name} from {}", path.display());
                Some(Arc::new(module))
            }
            Err(error) => {
                warn!("Failed to load dependency {name} from {}: {error}", path.display());
                None
            }
        }
    }
}

impl DependencyResolver for DirectoryResolver {
    fn resolve(&mut self, name: &str) -> Option<Arc<CilModule>> {
        if let Some(cached) = self.cache.get(name) {
            return cached.clone();
        }

        let outcome = match classify(name) {
            Classification::NeedsResolution => self.lookup(name),
            ignored => {
                if self.ledger.record_ignored(name) {
                    info!("Ignoring {ignored:?} dependency {name}");
                }
                None
            }
        };

        self.cache.insert(name.to_string(), outcome.clone());
        outcome
    }

    fn ledger(&self) -> &DependencyLedger {
        &self.ledger
    }
}
