use std::ops::Range;

use crate::{
    collector::records::{
        FieldRecord, MethodRecord, ParameterRecord, PropertyRecord, TypeKind, TypeRecord,
    },
    metadata::{
        cilmodule::CilModule,
        signatures::{parse_field_signature, parse_method_signature, parse_property_signature},
        tables::{
            CodedIndex, FieldAttributes, FieldRaw, MethodAttributes, MethodDefRaw,
            MethodSemanticsAttributes, MethodSemanticsRaw, ParamRaw, PropertyMapRaw, PropertyRaw,
            TableId, TypeAttributes, TypeDefRaw, TypeRefRaw,
        },
        token::Token,
        typesystem::{GenericContext, TypeNamer},
    },
    Result,
};

/// Builds [`TypeRecord`] values from `TypeDef` rows of one module.
pub(crate) struct TypeExtractor<'m> {
    module: &'m CilModule,
    namer: TypeNamer<'m>,
}

impl<'m> TypeExtractor<'m> {
    pub(crate) fn new(module: &'m CilModule) -> Self {
        TypeExtractor {
            module,
            namer: TypeNamer::new(module),
        }
    }

    /// Namespace and name of a type definition.
    pub(crate) fn names(&self, row: &TypeDefRaw) -> Result<(&'m str, &'m str)> {
        Ok((
            self.module.string(row.type_namespace)?,
            self.module.string(row.type_name)?,
        ))
    }

    /// Whether a type is exported: top-level public and not special-named.
    pub(crate) fn qualifies(&self, row: &TypeDefRaw) -> Result<bool> {
        let (_, name) = self.names(row)?;

        Ok(row.flags & TypeAttributes::VISIBILITY_MASK == TypeAttributes::PUBLIC
            && row.flags & TypeAttributes::SPECIAL_NAME == 0
            && !name.starts_with('<'))
    }

    pub(crate) fn extract(&self, row: &TypeDefRaw) -> Result<TypeRecord> {
        let (namespace, name) = self.names(row)?;
        let ctx = GenericContext::for_type(row.rid);

        Ok(TypeRecord {
            name: name.to_string(),
            namespace: (!namespace.is_empty()).then(|| namespace.to_string()),
            full_name: if namespace.is_empty() {
                name.to_string()
            } else {
                format!("{namespace}.{name}")
            },
            kind: self.kind(row, namespace, name)?,
            methods: self.methods(row, &ctx)?,
            properties: self.properties(row, &ctx)?,
            fields: self.fields(row, &ctx)?,
        })
    }

    fn kind(&self, row: &TypeDefRaw, namespace: &str, name: &str) -> Result<TypeKind> {
        if row.flags & TypeAttributes::INTERFACE != 0 {
            return Ok(TypeKind::Interface);
        }

        let base = self.base_name(row.extends.token)?;
        Ok(match base {
            Some(("System", "Enum")) => TypeKind::Enum,
            Some(("System", "ValueType")) if !(namespace == "System" && name == "Enum") => {
                TypeKind::ValueType
            }
            _ => TypeKind::Class,
        })
    }

    /// Namespace and name of a base type given by `TypeDef` or `TypeRef`. Instantiated
    /// bases are never `System.Enum` or `System.ValueType`.
    fn base_name(&self, token: Token) -> Result<Option<(&'m str, &'m str)>> {
        if token.is_null() {
            return Ok(None);
        }

        match token.table_id() {
            Some(TableId::TypeDef) => {
                let Some(base) = self.module.row::<TypeDefRaw>(token.row()) else {
                    return Err(malformed_error!("Invalid base type - {}", token));
                };
                Ok(Some(self.names(&base)?))
            }
            Some(TableId::TypeRef) => {
                let Some(base) = self.module.row::<TypeRefRaw>(token.row()) else {
                    return Err(malformed_error!("Invalid base type - {}", token));
                };
                Ok(Some((
                    self.module.string(base.type_namespace)?,
                    self.module.string(base.type_name)?,
                )))
            }
            _ => Ok(None),
        }
    }

    fn methods(&self, row: &TypeDefRaw, ctx: &GenericContext) -> Result<Vec<MethodRecord>> {
        let next = self.module.row::<TypeDefRaw>(row.rid + 1);
        let range = self.member_range(
            TableId::MethodDef,
            row.method_list,
            next.map(|next| next.method_list),
            row.token,
        )?;

        let mut methods = Vec::new();
        for rid in range {
            let Some(method) = self.module.row::<MethodDefRaw>(rid) else {
                return Err(malformed_error!("Invalid MethodDef row - {}", rid));
            };

            let is_public =
                method.flags & MethodAttributes::MEMBER_ACCESS_MASK == MethodAttributes::PUBLIC;
            if !is_public || method.flags & MethodAttributes::SPECIAL_NAME != 0 {
                continue;
            }

            let ctx = ctx.with_method(rid);
            let signature = parse_method_signature(self.module.blob(method.signature)?)?;
            let names = self.parameter_names(&method)?;

            let parameters = signature
                .params
                .iter()
                .enumerate()
                .map(|(index, param)| {
                    Ok(ParameterRecord {
                        name: names
                            .iter()
                            .find(|(sequence, _)| *sequence as usize == index + 1)
                            .map(|(_, name)| (*name).to_string())
                            .unwrap_or_default(),
                        type_name: self.namer.parameter(param, &ctx)?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            methods.push(MethodRecord {
                name: self.module.string(method.name)?.to_string(),
                return_type: self.namer.parameter(&signature.return_type, &ctx)?,
                parameters,
                is_public,
            });
        }

        Ok(methods)
    }

    /// `(sequence, name)` of the `Param` rows of a method.
    fn parameter_names(&self, method: &MethodDefRaw) -> Result<Vec<(u32, &'m str)>> {
        let next = self.module.row::<MethodDefRaw>(method.rid + 1);
        let range = self.member_range(
            TableId::Param,
            method.param_list,
            next.map(|next| next.param_list),
            method.token,
        )?;

        range
            .map(|rid| {
                let Some(param) = self.module.row::<ParamRaw>(rid) else {
                    return Err(malformed_error!("Invalid Param row - {}", rid));
                };
                Ok((param.sequence, self.module.string(param.name)?))
            })
            .collect()
    }

    fn properties(&self, row: &TypeDefRaw, ctx: &GenericContext) -> Result<Vec<PropertyRecord>> {
        let Some(maps) = self.module.table::<PropertyMapRaw>() else {
            return Ok(Vec::new());
        };
        let Some(map) = maps.iter().find(|map| map.parent == row.rid) else {
            return Ok(Vec::new());
        };

        let range = self.member_range(
            TableId::Property,
            map.property_list,
            maps.get(map.rid + 1).map(|next| next.property_list),
            row.token,
        )?;

        let mut properties = Vec::new();
        for rid in range {
            let Some(property) = self.module.row::<PropertyRaw>(rid) else {
                return Err(malformed_error!("Invalid Property row - {}", rid));
            };

            let (getter, setter) = self.accessors(rid);
            let is_public = |accessor: Option<u32>| {
                accessor
                    .and_then(|rid| self.module.row::<MethodDefRaw>(rid))
                    .is_some_and(|method| {
                        method.flags & MethodAttributes::MEMBER_ACCESS_MASK
                            == MethodAttributes::PUBLIC
                    })
            };
            if !is_public(getter) && !is_public(setter) {
                continue;
            }

            let signature = parse_property_signature(self.module.blob(property.signature)?)?;
            properties.push(PropertyRecord {
                name: self.module.string(property.name)?.to_string(),
                type_name: self.namer.name(&signature.base, ctx)?,
                can_read: getter.is_some(),
                can_write: setter.is_some(),
            });
        }

        Ok(properties)
    }

    /// Getter and setter of `Property` row `property`.
    fn accessors(&self, property: u32) -> (Option<u32>, Option<u32>) {
        let Some(semantics) = self.module.table::<MethodSemanticsRaw>() else {
            return (None, None);
        };

        let association = CodedIndex::new(TableId::Property, property);
        let mut getter = None;
        let mut setter = None;
        for entry in semantics.iter().filter(|entry| entry.association == association) {
            if entry.semantics.contains(MethodSemanticsAttributes::GETTER) {
                getter.get_or_insert(entry.method);
            } else if entry.semantics.contains(MethodSemanticsAttributes::SETTER) {
                setter.get_or_insert(entry.method);
            }
        }

        (getter, setter)
    }

    fn fields(&self, row: &TypeDefRaw, ctx: &GenericContext) -> Result<Vec<FieldRecord>> {
        let next = self.module.row::<TypeDefRaw>(row.rid + 1);
        let range = self.member_range(
            TableId::Field,
            row.field_list,
            next.map(|next| next.field_list),
            row.token,
        )?;

        let mut fields = Vec::new();
        for rid in range {
            let Some(field) = self.module.row::<FieldRaw>(rid) else {
                return Err(malformed_error!("Invalid Field row - {}", rid));
            };

            let is_public =
                field.flags & FieldAttributes::FIELD_ACCESS_MASK == FieldAttributes::PUBLIC;
            if !is_public || field.flags & FieldAttributes::SPECIAL_NAME != 0 {
                continue;
            }

            let signature = parse_field_signature(self.module.blob(field.signature)?)?;
            fields.push(FieldRecord {
                name: self.module.string(field.name)?.to_string(),
                type_name: self.namer.name(&signature.base, ctx)?,
                is_public,
            });
        }

        Ok(fields)
    }

    /// Rows `start..next_start` of `table`, the member list of `owner`. The last owner's
    /// list runs to the end of the table.
    fn member_range(
        &self,
        table: TableId,
        start: u32,
        next_start: Option<u32>,
        owner: Token,
    ) -> Result<Range<u32>> {
        let count = self.row_count(table);
        let end = next_start.unwrap_or(count + 1);

        checked_range(start, end, count).ok_or_else(|| {
            malformed_error!("Invalid {:?} range {}..{} of {}", table, start, end, owner)
        })
    }

    fn row_count(&self, table: TableId) -> u32 {
        self.module.tables().table_row_count(table)
    }
}

/// `start..end` if it lies within a table of `count` rows. An empty list may start one past
/// the last row.
fn checked_range(start: u32, end: u32, count: u32) -> Option<Range<u32>> {
    if start == 0 && end == 0 {
        // list column of an empty table
        return Some(0..0);
    }

    (start >= 1 && start <= end && end <= count + 1).then_some(start..end)
}
