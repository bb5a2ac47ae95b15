use std::{collections::HashMap, fmt};

use crate::{
    metadata::{
        cilmodule::CilModule,
        signatures::{parse_type_spec_signature, TypeSignature},
        tables::{InterfaceImplRaw, TableId, TypeDefRaw, TypeRefRaw, TypeSpecRaw},
        token::Token,
    },
    project::LoadedModule,
    resolver::classify,
};

/// Bounds the reference chains followed for one type.
const MAX_CHAIN_DEPTH: usize = 64;

/// Why a type could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeLoadReason {
    /// A referenced assembly was neither ignored nor resolved
    AssemblyNotFound(String),
    /// A resolved assembly neither defines nor forwards a referenced type
    TypeNotFound {
        /// Referenced assembly
        assembly: String,
        /// Full name of the missing type
        type_name: String,
    },
    /// A row on the way could not be read
    Malformed(String),
}

impl fmt::Display for TypeLoadReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeLoadReason::AssemblyNotFound(name) => {
                write!(f, "could not load assembly '{name}'")
            }
            TypeLoadReason::TypeNotFound {
                assembly,
                type_name,
            } => write!(f, "type '{type_name}' not found in assembly '{assembly}'"),
            TypeLoadReason::Malformed(message) => write!(f, "{message}"),
        }
    }
}

/// A type definition that can not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeLoadFailure {
    /// `TypeDef` token of the type
    pub token: Token,
    /// Full name of the type, as far as it could be read
    pub type_name: String,
    /// What is missing
    pub reason: TypeLoadReason,
}

impl TypeLoadFailure {
    pub(crate) fn new(module: &CilModule, row: &TypeDefRaw, reason: TypeLoadReason) -> Self {
        let name = module.string(row.type_name).unwrap_or("?");
        let type_name = match module.string(row.type_namespace) {
            Ok(namespace) if !namespace.is_empty() => format!("{namespace}.{name}"),
            _ => name.to_string(),
        };

        TypeLoadFailure {
            token: row.token,
            type_name,
            reason,
        }
    }
}

impl fmt::Display for TypeLoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Could not load type '{}' ({}): {}",
            self.type_name, self.token, self.reason
        )
    }
}

type Outcome = Result<(), TypeLoadReason>;

/// Follows base types, interfaces and instantiations of the primary module's types.
///
/// Outcomes of `TypeDef` rows are memoized; a row reached again while it is being checked
/// counts as loadable.
pub(crate) struct TypeLoadCheck<'l> {
    loaded: &'l LoadedModule,
    type_defs: HashMap<u32, Option<Outcome>>,
}

impl<'l> TypeLoadCheck<'l> {
    pub(crate) fn new(loaded: &'l LoadedModule) -> Self {
        TypeLoadCheck {
            loaded,
            type_defs: HashMap::new(),
        }
    }

    fn module(&self) -> &'l CilModule {
        self.loaded.primary()
    }

    pub(crate) fn type_def(&mut self, rid: u32) -> Outcome {
        self.type_def_at(rid, 0)
    }

    fn type_def_at(&mut self, rid: u32, depth: usize) -> Outcome {
        match self.type_defs.get(&rid) {
            Some(Some(outcome)) => return outcome.clone(),
            // cyclic base chain
            Some(None) => return Ok(()),
            None => {}
        }

        self.type_defs.insert(rid, None);
        let outcome = self.check_type_def(rid, depth);
        self.type_defs.insert(rid, Some(outcome.clone()));
        outcome
    }

    fn check_type_def(&mut self, rid: u32, depth: usize) -> Outcome {
        let module = self.module();
        let Some(row) = module.row::<TypeDefRaw>(rid) else {
            return Err(TypeLoadReason::Malformed(format!(
                "invalid TypeDef row {rid}"
            )));
        };

        if !row.extends.is_null() {
            self.token(row.extends.token, depth + 1)?;
        }

        if let Some(interfaces) = module.table::<InterfaceImplRaw>() {
            for implementation in interfaces.iter().filter(|entry| entry.class == rid) {
                self.token(implementation.interface.token, depth + 1)?;
            }
        }

        Ok(())
    }

    fn token(&mut self, token: Token, depth: usize) -> Outcome {
        if depth > MAX_CHAIN_DEPTH {
            return Err(TypeLoadReason::Malformed(format!(
                "reference chain too deep at {token}"
            )));
        }

        match token.table_id() {
            Some(TableId::TypeDef) => self.type_def_at(token.row(), depth),
            Some(TableId::TypeRef) => self.type_ref(token.row(), depth),
            Some(TableId::TypeSpec) => {
                let module = self.module();
                let Some(row) = module.row::<TypeSpecRaw>(token.row()) else {
                    return Err(TypeLoadReason::Malformed(format!(
                        "invalid TypeSpec reference {token}"
                    )));
                };

                let spec = module
                    .blob(row.signature)
                    .and_then(parse_type_spec_signature)
                    .map_err(|error| TypeLoadReason::Malformed(error.to_string()))?;
                self.signature(&spec.base, depth + 1)
            }
            _ => Err(TypeLoadReason::Malformed(format!(
                "{token} does not name a type"
            ))),
        }
    }

    fn type_ref(&mut self, rid: u32, depth: usize) -> Outcome {
        let module = self.module();
        let Some(row) = module.row::<TypeRefRaw>(rid) else {
            return Err(TypeLoadReason::Malformed(format!(
                "invalid TypeRef row {rid}"
            )));
        };

        let scope = row.resolution_scope;
        match scope.tag {
            TableId::AssemblyRef => {
                let Some(reference) = module.assembly_ref(scope.row) else {
                    return Err(TypeLoadReason::Malformed(format!(
                        "invalid AssemblyRef row {}",
                        scope.row
                    )));
                };

                if classify(&reference.name).is_ignored() {
                    return Ok(());
                }

                let Some(dependency) = self.loaded.dependency(&reference.name) else {
                    return Err(TypeLoadReason::AssemblyNotFound(reference.name));
                };

                let namespace = module.string(row.type_namespace).unwrap_or_default();
                let name = module.string(row.type_name).unwrap_or_default();
                if dependency.provides_type(namespace, name) {
                    Ok(())
                } else {
                    Err(TypeLoadReason::TypeNotFound {
                        assembly: reference.name,
                        type_name: if namespace.is_empty() {
                            name.to_string()
                        } else {
                            format!("{namespace}.{name}")
                        },
                    })
                }
            }
            // nested type, loadable if its outermost type is
            TableId::TypeRef => self.token(scope.token, depth + 1),
            _ => Ok(()),
        }
    }

    fn signature(&mut self, signature: &TypeSignature, depth: usize) -> Outcome {
        match signature {
            TypeSignature::Class(token) | TypeSignature::ValueType(token) => {
                self.token(*token, depth)
            }
            TypeSignature::GenericInst(base, arguments) => {
                self.signature(base, depth)?;
                for argument in arguments {
                    self.signature(argument, depth)?;
                }
                Ok(())
            }
            TypeSignature::SzArray(array) => self.signature(&array.base, depth),
            TypeSignature::Array(array) => self.signature(&array.base, depth),
            TypeSignature::Ptr(pointer) => self.signature(&pointer.base, depth),
            TypeSignature::ByRef(inner) | TypeSignature::Pinned(inner) => {
                self.signature(inner, depth)
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let failure = TypeLoadFailure {
            token: Token::from_parts(TableId::TypeDef, 3),
            type_name: "Contoso.Widget".into(),
            reason: TypeLoadReason::AssemblyNotFound("Helper".into()),
        };
        assert_eq!(
            failure.to_string(),
            "Could not load type 'Contoso.Widget' (0x02000003): could not load assembly 'Helper'"
        );

        let missing = TypeLoadReason::TypeNotFound {
            assembly: "Helper".into(),
            type_name: "Contoso.Gadget".into(),
        };
        assert_eq!(
            missing.to_string(),
            "type 'Contoso.Gadget' not found in assembly 'Helper'"
        );
    }
}
