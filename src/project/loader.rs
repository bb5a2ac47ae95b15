use std::{
    collections::{HashSet, VecDeque},
    path::Path,
    sync::Arc,
};

use log::{debug, info};

use crate::{
    metadata::{cilmodule::CilModule, tables::TypeDefRaw},
    project::typeload::{TypeLoadCheck, TypeLoadFailure},
    resolver::{classify, DependencyResolver},
    Error, Result,
};

/// Loads a primary module and its dependencies.
pub struct ModuleLoader;

impl ModuleLoader {
    /// Loads the module at `path` and resolves its references through `resolver`.
    ///
    /// # Errors
    /// Returns [`Error::ModuleNotFound`] if `path` does not exist and [`Error::ModuleLoad`] if
    /// it can not be parsed. Dependencies that fail to resolve are not errors; they are listed
    /// by [`LoadedModule::missing`].
    pub fn load(path: &Path, resolver: &mut dyn DependencyResolver) -> Result<LoadedModule> {
        if !path.exists() {
            return Err(Error::ModuleNotFound(path.to_path_buf()));
        }

        let module = CilModule::from_path(path).map_err(|source| Error::ModuleLoad {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;

        match module.identity() {
            Some(identity) => info!("Loaded assembly {identity}"),
            None => info!("Loaded module {}", path.display()),
        }

        Ok(Self::load_module(module, resolver))
    }

    /// Resolves the references of an already parsed module.
    pub fn load_module(module: CilModule, resolver: &mut dyn DependencyResolver) -> LoadedModule {
        let primary = Arc::new(module);
        let mut dependencies: Vec<(String, Arc<CilModule>)> = Vec::new();
        let mut missing = Vec::new();

        let mut seen: HashSet<String> = primary.name().into_iter().collect();
        let mut queue = VecDeque::from([primary.clone()]);

        while let Some(current) = queue.pop_front() {
            for reference in current.assembly_refs() {
                if !seen.insert(reference.name.clone()) {
                    continue;
                }

                debug!("Reference {reference}");
                match resolver.resolve(&reference.name) {
                    Some(dependency) => {
                        queue.push_back(dependency.clone());
                        dependencies.push((reference.name, dependency));
                    }
                    None if !classify(&reference.name).is_ignored() => {
                        missing.push(reference.name);
                    }
                    None => {}
                }
            }
        }

        LoadedModule {
            primary,
            dependencies,
            missing,
        }
    }
}

/// A primary module with the dependencies that could be resolved for it.
pub struct LoadedModule {
    primary: Arc<CilModule>,
    dependencies: Vec<(String, Arc<CilModule>)>,
    missing: Vec<String>,
}

impl LoadedModule {
    /// The module being exported.
    #[must_use]
    pub fn primary(&self) -> &CilModule {
        &self.primary
    }

    /// Resolved dependencies with the names they were referenced by, in resolution order.
    pub fn dependencies(&self) -> impl Iterator<Item = (&str, &CilModule)> {
        self.dependencies
            .iter()
            .map(|(name, module)| (name.as_str(), module.as_ref()))
    }

    /// The resolved dependency referenced as `name`.
    #[must_use]
    pub fn dependency(&self, name: &str) -> Option<&CilModule> {
        self.dependencies
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, module)| module.as_ref())
    }

    /// Referenced names that needed resolution but could not be found or loaded.
    #[must_use]
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    /// Every type definition of the primary module in table order, each either loadable or
    /// failed. Non-public types are included.
    #[must_use]
    pub fn types(&self) -> Vec<std::result::Result<TypeDefRaw, TypeLoadFailure>> {
        let Some(table) = self.primary.table::<TypeDefRaw>() else {
            return Vec::new();
        };

        let mut check = TypeLoadCheck::new(self);
        table
            .iter()
            .map(|row| match check.type_def(row.rid) {
                Ok(()) => Ok(row),
                Err(reason) => Err(TypeLoadFailure::new(self.primary(), &row, reason)),
            })
            .collect()
    }
}
