//! Collection of the exported types of a loaded module.
//!
//! [`collect`] walks the type definitions of the primary module in table order. Types that can
//! not be loaded are logged and recorded in the [`Diagnostics`]; so are types whose members can
//! not be extracted. Neither stops the walk. A type is exported when it is top-level public and
//! not compiler-generated; of its members only the public ones declared on the type itself
//! are kept, without accessors, operators, constructors and enum backing fields.
//!
//! # Example
//!
//! ```rust,no_run
//! use dllexporter::collector::collect;
//! use dllexporter::project::ModuleLoader;
//! use dllexporter::resolver::DirectoryResolver;
//! use std::path::Path;
//!
//! let path = Path::new("Library.dll");
//! let mut resolver = DirectoryResolver::for_module(path);
//! let loaded = ModuleLoader::load(path, &mut resolver)?;
//!
//! let collection = collect(&loaded);
//! for record in &collection.types {
//!     println!("{} ({:?})", record.full_name, record.kind);
//! }
//! # Ok::<(), dllexporter::Error>(())
//! ```

mod extract;
mod records;

use log::{debug, warn};

use crate::{
    collector::extract::TypeExtractor,
    diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics},
    project::LoadedModule,
    Error,
};

pub use records::{
    FieldRecord, MethodRecord, ParameterRecord, PropertyRecord, TypeKind, TypeRecord,
};

/// The exported types of a module and what went wrong while collecting them.
#[derive(Debug, Default)]
pub struct Collection {
    /// Exported types in table order
    pub types: Vec<TypeRecord>,
    /// Recovered failures
    pub diagnostics: Diagnostics,
}

/// Collects the exported types of `loaded`.
#[must_use]
pub fn collect(loaded: &LoadedModule) -> Collection {
    let diagnostics = Diagnostics::new();

    for name in loaded.missing() {
        diagnostics.warning(
            DiagnosticCategory::Dependency,
            format!("Dependency {name} could not be resolved"),
        );
    }

    let outcomes = loaded.types();
    let failures = outcomes.iter().filter(|outcome| outcome.is_err()).count();
    if failures > 0 {
        warn!(
            "{failures} of {} types could not be loaded, continuing with the rest",
            outcomes.len()
        );
    }

    let extractor = TypeExtractor::new(loaded.primary());
    let mut types = Vec::new();

    for outcome in outcomes {
        let row = match outcome {
            Ok(row) => row,
            Err(failure) => {
                let token = failure.token;
                let error = Error::TypeLoad(failure);
                warn!("{error}");
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticSeverity::Error,
                        DiagnosticCategory::TypeLoad,
                        error.to_string(),
                    )
                    .with_token(token),
                );
                continue;
            }
        };

        let record = extractor
            .qualifies(&row)
            .and_then(|qualifies| qualifies.then(|| extractor.extract(&row)).transpose());

        match record {
            Ok(Some(record)) => {
                debug!("Collected {}", record.full_name);
                types.push(record);
            }
            Ok(None) => {}
            Err(error) => {
                let name = extractor
                    .names(&row)
                    .map_or_else(|_| row.token.to_string(), |(_, name)| name.to_string());
                warn!("Failed to process type {name}: {error}");
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticSeverity::Error,
                        DiagnosticCategory::Extraction,
                        format!("Failed to process type {name}: {error}"),
                    )
                    .with_token(row.token),
                );
            }
        }
    }

    Collection { types, diagnostics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::cilmodule::CilModule,
        project::ModuleLoader,
        resolver::DirectoryResolver,
        test::{ImageBuilder, MethodDecl, PropertyDecl, Ty, TypeDecl},
    };

    fn collect_image(image: Vec<u8>) -> Collection {
        let dir = tempfile::tempdir().unwrap();
        let mut resolver = DirectoryResolver::new(dir.path());
        let loaded = ModuleLoader::load_module(CilModule::from_mem(image).unwrap(), &mut resolver);
        collect(&loaded)
    }

    #[test]
    fn greeter() {
        let image = ImageBuilder::new("Greetings")
            .add_type(
                TypeDecl::class("Contoso", "Greeter")
                    .constructor()
                    .method(MethodDecl::new("Greet", Ty::String).param("name", Ty::String))
                    .method(MethodDecl::new("Secret", Ty::Void).private())
                    .property(PropertyDecl::new("Count", Ty::Int).getter(true))
                    .field("Prefix", Ty::String)
                    .field_with("cache", Ty::Object, 0x0001),
            )
            .build();

        let collection = collect_image(image);
        assert!(!collection.diagnostics.has_any());
        assert_eq!(collection.types.len(), 1);

        let greeter = &collection.types[0];
        assert_eq!(greeter.name, "Greeter");
        assert_eq!(greeter.namespace.as_deref(), Some("Contoso"));
        assert_eq!(greeter.full_name, "Contoso.Greeter");
        assert_eq!(greeter.kind, TypeKind::Class);

        assert_eq!(
            greeter.methods,
            vec![MethodRecord {
                name: "Greet".into(),
                return_type: "string".into(),
                parameters: vec![ParameterRecord {
                    name: "name".into(),
                    type_name: "string".into(),
                }],
                is_public: true,
            }]
        );
        assert_eq!(
            greeter.properties,
            vec![PropertyRecord {
                name: "Count".into(),
                type_name: "int".into(),
                can_read: true,
                can_write: false,
            }]
        );
        assert_eq!(
            greeter.fields,
            vec![FieldRecord {
                name: "Prefix".into(),
                type_name: "string".into(),
                is_public: true,
            }]
        );
    }

    #[test]
    fn qualifying_types() {
        let image = ImageBuilder::new("Sample")
            .add_type(TypeDecl::class("Contoso", "Visible"))
            .add_type(TypeDecl::class("Contoso", "Hidden").internal())
            .add_type(TypeDecl::class("Contoso", "Special").special_name())
            .add_type(TypeDecl::class("", "<PrivateImplementationDetails>"))
            .add_type(TypeDecl::class("", "Global"))
            .build();

        let collection = collect_image(image);
        let names: Vec<&str> = collection.types.iter().map(|t| t.full_name.as_str()).collect();
        assert_eq!(names, vec!["Contoso.Visible", "Global"]);
        assert_eq!(collection.types[1].namespace, None);
    }

    #[test]
    fn hidden_types_only() {
        let image = ImageBuilder::new("Internals")
            .add_type(TypeDecl::class("Contoso", "Hidden").internal())
            .add_type(TypeDecl::class("Contoso", "Special").special_name())
            .add_type(TypeDecl::value_type("Contoso", "Both").internal().special_name())
            .build();

        let collection = collect_image(image);
        assert!(collection.types.is_empty());
        assert!(!collection.diagnostics.has_any());
    }

    #[test]
    fn kinds() {
        let image = ImageBuilder::new("Sample")
            .add_type(TypeDecl::interface("Contoso", "IShape").method(
                MethodDecl::new("Area", Ty::Double),
            ))
            .add_type(
                TypeDecl::enumeration("Contoso", "Color")
                    .literal("Red")
                    .literal("Green"),
            )
            .add_type(TypeDecl::value_type("Contoso", "Point").field("X", Ty::Int))
            .add_type(TypeDecl::class("Contoso", "Shape"))
            .build();

        let collection = collect_image(image);
        let kinds: Vec<TypeKind> = collection.types.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TypeKind::Interface,
                TypeKind::Enum,
                TypeKind::ValueType,
                TypeKind::Class
            ]
        );

        // value__ is special-named
        let color = &collection.types[1];
        let fields: Vec<(&str, &str)> = color
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.type_name.as_str()))
            .collect();
        assert_eq!(fields, vec![("Red", "Color"), ("Green", "Color")]);

        assert_eq!(collection.types[0].methods[0].return_type, "double");
        assert!(collection.types[3].methods.is_empty());
    }

    #[test]
    fn member_details() {
        let image = ImageBuilder::new("Sample")
            .add_type(
                TypeDecl::class("Contoso", "Store`1")
                    .generic_param("TItem")
                    .method(
                        MethodDecl::new("Find", Ty::Var(0))
                            .param("keys", Ty::array(Ty::String))
                            .unnamed_param(Ty::by_ref(Ty::Int)),
                    )
                    .method(
                        MethodDecl::new("Convert", Ty::MVar(0))
                            .generic_param("TOut")
                            .static_(),
                    )
                    .method(MethodDecl::new("op_Equality", Ty::Bool).special_name().static_())
                    .property(PropertyDecl::new("Items", Ty::generic(
                        Ty::external("System.Collections.Generic", "List`1"),
                        vec![Ty::Var(0)],
                    )).getter(true).setter(true))
                    .property(PropertyDecl::new("Size", Ty::Long).getter(true).setter(false))
                    .property(PropertyDecl::new("Internal", Ty::Int).getter(false)),
            )
            .build();

        let collection = collect_image(image);
        let store = &collection.types[0];

        let find = &store.methods[0];
        assert_eq!(find.return_type, "TItem");
        assert_eq!(find.parameters[0].name, "keys");
        assert_eq!(find.parameters[0].type_name, "string[]");
        assert_eq!(find.parameters[1].name, "");
        assert_eq!(find.parameters[1].type_name, "int&");

        assert_eq!(store.methods[1].name, "Convert");
        assert_eq!(store.methods[1].return_type, "TOut");
        assert_eq!(store.methods.len(), 2);

        let properties: Vec<(&str, &str, bool, bool)> = store
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.type_name.as_str(), p.can_read, p.can_write))
            .collect();
        assert_eq!(
            properties,
            vec![("Items", "List`1", true, true), ("Size", "long", true, true)]
        );
    }

    #[test]
    fn type_load_failures_are_recorded() {
        let image = ImageBuilder::new("Sample")
            .add_type(TypeDecl::class("Contoso", "Fine"))
            .add_type(
                TypeDecl::class("Contoso", "Derived")
                    .extends(Ty::external_in("Missing", "Contoso.Base", "Base")),
            )
            .add_type(TypeDecl::class("Contoso", "AlsoFine"))
            .build();

        let collection = collect_image(image);
        let names: Vec<&str> = collection.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Fine", "AlsoFine"]);

        assert_eq!(collection.diagnostics.error_count(), 1);
        assert_eq!(
            collection.diagnostics.by_category(DiagnosticCategory::TypeLoad).len(),
            1
        );
        assert_eq!(
            collection.diagnostics.by_category(DiagnosticCategory::Dependency).len(),
            1
        );
    }

    #[test]
    fn extraction_failures_skip_the_type() {
        let image = ImageBuilder::new("Sample")
            .add_type(TypeDecl::class("Contoso", "Broken").field_raw_signature("Bad", vec![0x06]))
            .add_type(TypeDecl::class("Contoso", "Fine").field("Ok", Ty::Int))
            .build();

        let collection = collect_image(image);
        assert_eq!(collection.types.len(), 1);
        assert_eq!(collection.types[0].name, "Fine");

        let failures = collection.diagnostics.by_category(DiagnosticCategory::Extraction);
        assert_eq!(failures.len(), 1);
        assert!(failures[0].message.starts_with("Failed to process type Broken"));
    }
}
