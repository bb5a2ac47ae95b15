use crate::{
    metadata::{
        cilmodule::CilModule,
        signatures::{parse_type_spec_signature, SignatureParameter, TypeSignature},
        tables::{CodedIndex, GenericParamRaw, TableId, TypeDefRaw, TypeRefRaw, TypeSpecRaw},
        token::Token,
    },
    Error::RecursionLimit,
    Result,
};

/// `TypeSpec` blobs may reference further `TypeSpec` rows; this bounds the chain.
const MAX_TYPESPEC_DEPTH: usize = 16;

/// C# keyword for a `System` type, if it has one.
///
/// ```rust
/// use dllexporter::metadata::typesystem::keyword_alias;
///
/// assert_eq!(keyword_alias("System", "Int32"), Some("int"));
/// assert_eq!(keyword_alias("System", "IntPtr"), None);
/// assert_eq!(keyword_alias("Contoso", "String"), None);
/// ```
#[must_use]
pub fn keyword_alias(namespace: &str, name: &str) -> Option<&'static str> {
    if namespace != "System" {
        return None;
    }

    Some(match name {
        "Void" => "void",
        "Boolean" => "bool",
        "Char" => "char",
        "SByte" => "sbyte",
        "Byte" => "byte",
        "Int16" => "short",
        "UInt16" => "ushort",
        "Int32" => "int",
        "UInt32" => "uint",
        "Int64" => "long",
        "UInt64" => "ulong",
        "Single" => "float",
        "Double" => "double",
        "String" => "string",
        "Object" => "object",
        _ => return None,
    })
}

/// The type and method whose generic parameters `!n` and `!!n` refer to.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericContext {
    /// `TypeDef` row declaring the type parameters
    pub type_def: Option<u32>,
    /// `MethodDef` row declaring the method parameters
    pub method_def: Option<u32>,
}

impl GenericContext {
    /// Context of the members of `TypeDef` row `type_def`.
    #[must_use]
    pub fn for_type(type_def: u32) -> Self {
        GenericContext {
            type_def: Some(type_def),
            method_def: None,
        }
    }

    /// The same context, inside method `method_def`.
    #[must_use]
    pub fn with_method(self, method_def: u32) -> Self {
        GenericContext {
            method_def: Some(method_def),
            ..self
        }
    }
}

/// Renders signature types as the short names used in exported records.
pub struct TypeNamer<'m> {
    module: &'m CilModule,
}

impl<'m> TypeNamer<'m> {
    /// Creates a namer that resolves tokens against `module`.
    #[must_use]
    pub fn new(module: &'m CilModule) -> Self {
        TypeNamer { module }
    }

    /// Name of a parameter or return type; by-ref parameters get a trailing `&`.
    ///
    /// # Errors
    /// Returns an error if a referenced row or heap entry can not be read.
    pub fn parameter(&self, param: &SignatureParameter, ctx: &GenericContext) -> Result<String> {
        let mut name = self.name(&param.base, ctx)?;
        if param.by_ref {
            name.push('&');
        }
        Ok(name)
    }

    /// Name of a signature type.
    ///
    /// # Errors
    /// Returns an error if a referenced row or heap entry can not be read.
    pub fn name(&self, sig: &TypeSignature, ctx: &GenericContext) -> Result<String> {
        self.render(sig, ctx, 0)
    }

    /// Name of the `TypeDef`, `TypeRef` or `TypeSpec` row `token` points at.
    ///
    /// # Errors
    /// Returns an error for a token outside those tables or an unreadable row.
    pub fn token(&self, token: Token, ctx: &GenericContext) -> Result<String> {
        self.render_token(token, ctx, 0)
    }

    fn render(&self, sig: &TypeSignature, ctx: &GenericContext, depth: usize) -> Result<String> {
        Ok(match sig {
            TypeSignature::Void => "void".to_string(),
            TypeSignature::Boolean => "bool".to_string(),
            TypeSignature::Char => "char".to_string(),
            TypeSignature::I1 => "sbyte".to_string(),
            TypeSignature::U1 => "byte".to_string(),
            TypeSignature::I2 => "short".to_string(),
            TypeSignature::U2 => "ushort".to_string(),
            TypeSignature::I4 => "int".to_string(),
            TypeSignature::U4 => "uint".to_string(),
            TypeSignature::I8 => "long".to_string(),
            TypeSignature::U8 => "ulong".to_string(),
            TypeSignature::R4 => "float".to_string(),
            TypeSignature::R8 => "double".to_string(),
            TypeSignature::String => "string".to_string(),
            TypeSignature::Object | TypeSignature::Unknown => "object".to_string(),
            TypeSignature::I | TypeSignature::FnPtr(_) => "IntPtr".to_string(),
            TypeSignature::U => "UIntPtr".to_string(),
            TypeSignature::TypedByRef => "TypedReference".to_string(),
            TypeSignature::Class(token) | TypeSignature::ValueType(token) => {
                self.render_token(*token, ctx, depth)?
            }
            // generic arguments are not part of the exported name
            TypeSignature::GenericInst(base, _) => self.render(base, ctx, depth)?,
            TypeSignature::SzArray(array) => format!("{}[]", self.render(&array.base, ctx, depth)?),
            TypeSignature::Array(array) => format!(
                "{}[{}]",
                self.render(&array.base, ctx, depth)?,
                ",".repeat(array.rank.saturating_sub(1) as usize)
            ),
            TypeSignature::ByRef(inner) => format!("{}&", self.render(inner, ctx, depth)?),
            TypeSignature::Ptr(pointer) => format!("{}*", self.render(&pointer.base, ctx, depth)?),
            TypeSignature::Pinned(inner) => self.render(inner, ctx, depth)?,
            TypeSignature::GenericParamType(number) => self
                .generic_param_name(
                    ctx.type_def.map(|rid| CodedIndex::new(TableId::TypeDef, rid)),
                    *number,
                )
                .unwrap_or_else(|| format!("T{number}")),
            TypeSignature::GenericParamMethod(number) => self
                .generic_param_name(
                    ctx.method_def.map(|rid| CodedIndex::new(TableId::MethodDef, rid)),
                    *number,
                )
                .unwrap_or_else(|| format!("M{number}")),
        })
    }

    fn render_token(&self, token: Token, ctx: &GenericContext, depth: usize) -> Result<String> {
        match token.table_id() {
            Some(TableId::TypeDef) => {
                let Some(row) = self.module.row::<TypeDefRaw>(token.row()) else {
                    return Err(malformed_error!("Invalid TypeDef reference - {}", token));
                };
                self.named(row.type_namespace, row.type_name)
            }
            Some(TableId::TypeRef) => {
                let Some(row) = self.module.row::<TypeRefRaw>(token.row()) else {
                    return Err(malformed_error!("Invalid TypeRef reference - {}", token));
                };
                self.named(row.type_namespace, row.type_name)
            }
            Some(TableId::TypeSpec) => {
                if depth >= MAX_TYPESPEC_DEPTH {
                    return Err(RecursionLimit(MAX_TYPESPEC_DEPTH));
                }

                let Some(row) = self.module.row::<TypeSpecRaw>(token.row()) else {
                    return Err(malformed_error!("Invalid TypeSpec reference - {}", token));
                };
                let spec = parse_type_spec_signature(self.module.blob(row.signature)?)?;
                self.render(&spec.base, ctx, depth + 1)
            }
            _ => Err(malformed_error!("Token does not name a type - {}", token)),
        }
    }

    fn named(&self, namespace_index: u32, name_index: u32) -> Result<String> {
        let namespace = self.module.string(namespace_index)?;
        let name = self.module.string(name_index)?;

        Ok(keyword_alias(namespace, name)
            .map_or_else(|| name.to_string(), ToString::to_string))
    }

    fn generic_param_name(&self, owner: Option<CodedIndex>, number: u32) -> Option<String> {
        let owner = owner?;
        let table = self.module.table::<GenericParamRaw>()?;

        table
            .iter()
            .find(|param| param.owner == owner && param.number == number)
            .and_then(|param| self.module.string(param.name).ok())
            .filter(|name| !name.is_empty())
            .map(ToString::to_string)
    }
}
