//! In-memory .NET images for tests.
//!
//! [`ImageBuilder`] writes a small but complete PE32 DLL: DOS and PE headers, a single `.text`
//! section holding the CLI header, and metadata with the `#~`, `#Strings` and `#Blob` streams.
//! Types are described with [`TypeDecl`], members with [`MethodDecl`] and [`PropertyDecl`], and
//! signature types with [`Ty`]. Assembly and type references are created as the declarations
//! mention them.

use std::collections::{BTreeMap, HashMap};

use crate::metadata::tables::{FieldAttributes, MethodAttributes, TableId, TypeAttributes};

const SECTION_RVA: u32 = 0x2000;
const SECTION_ALIGNMENT: u32 = 0x2000;
const FILE_ALIGNMENT: usize = 0x200;
const CLI_HEADER_SIZE: usize = 72;
const METADATA_VERSION: &[u8; 12] = b"v4.0.30319\0\0";

const HIDE_BY_SIG: u32 = 0x0080;
const SEMANTICS_SETTER: u16 = 0x0001;
const SEMANTICS_GETTER: u16 = 0x0002;

/// A type as it appears in a signature.
#[derive(Debug, Clone, PartialEq)]
pub enum Ty {
    Void,
    Bool,
    Int,
    Long,
    String,
    Object,
    Double,
    /// Generic parameter of the declaring type
    Var(u32),
    /// Generic parameter of the method
    MVar(u32),
    SzArray(Box<Ty>),
    ByRef(Box<Ty>),
    Generic(Box<Ty>, Vec<Ty>),
    /// A type declared in the same image, by simple name
    Local(String),
    External {
        assembly: String,
        namespace: String,
        name: String,
        value_type: bool,
    },
}

impl Ty {
    /// A class in `System.Runtime`.
    pub fn external(namespace: &str, name: &str) -> Ty {
        Ty::external_in("System.Runtime", namespace, name)
    }

    pub fn external_in(assembly: &str, namespace: &str, name: &str) -> Ty {
        Ty::External {
            assembly: assembly.to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
            value_type: false,
        }
    }

    pub fn generic(base: Ty, args: Vec<Ty>) -> Ty {
        Ty::Generic(Box::new(base), args)
    }

    pub fn array(element: Ty) -> Ty {
        Ty::SzArray(Box::new(element))
    }

    pub fn by_ref(inner: Ty) -> Ty {
        Ty::ByRef(Box::new(inner))
    }
}

#[derive(Debug, Clone)]
enum FieldSig {
    Typed(Ty),
    Raw(Vec<u8>),
}

#[derive(Debug, Clone)]
struct FieldDecl {
    name: String,
    flags: u16,
    signature: FieldSig,
}

/// A method of a [`TypeDecl`]. Public and instance unless told otherwise.
#[derive(Debug, Clone)]
pub struct MethodDecl {
    name: String,
    returns: Ty,
    params: Vec<(Option<String>, Ty)>,
    flags: u32,
    generic_params: Vec<String>,
}

impl MethodDecl {
    pub fn new(name: &str, returns: Ty) -> Self {
        MethodDecl {
            name: name.to_string(),
            returns,
            params: Vec::new(),
            flags: MethodAttributes::PUBLIC | HIDE_BY_SIG,
            generic_params: Vec::new(),
        }
    }

    pub fn param(mut self, name: &str, ty: Ty) -> Self {
        self.params.push((Some(name.to_string()), ty));
        self
    }

    /// A parameter without a `Param` row.
    pub fn unnamed_param(mut self, ty: Ty) -> Self {
        self.params.push((None, ty));
        self
    }

    pub fn private(mut self) -> Self {
        self.flags =
            (self.flags & !MethodAttributes::MEMBER_ACCESS_MASK) | MethodAttributes::PRIVATE;
        self
    }

    pub fn static_(mut self) -> Self {
        self.flags |= MethodAttributes::STATIC;
        self
    }

    pub fn special_name(mut self) -> Self {
        self.flags |= MethodAttributes::SPECIAL_NAME;
        self
    }

    pub fn generic_param(mut self, name: &str) -> Self {
        self.generic_params.push(name.to_string());
        self
    }

    fn is_static(&self) -> bool {
        self.flags & MethodAttributes::STATIC != 0
    }
}

/// A property with optional accessors; `true` makes an accessor public.
#[derive(Debug, Clone)]
pub struct PropertyDecl {
    name: String,
    ty: Ty,
    getter: Option<bool>,
    setter: Option<bool>,
}

impl PropertyDecl {
    pub fn new(name: &str, ty: Ty) -> Self {
        PropertyDecl {
            name: name.to_string(),
            ty,
            getter: None,
            setter: None,
        }
    }

    pub fn getter(mut self, public: bool) -> Self {
        self.getter = Some(public);
        self
    }

    pub fn setter(mut self, public: bool) -> Self {
        self.setter = Some(public);
        self
    }

    fn accessor(
        &self,
        prefix: &str,
        public: bool,
        returns: Ty,
        params: Vec<(Option<String>, Ty)>,
    ) -> MethodDecl {
        let access = if public {
            MethodAttributes::PUBLIC
        } else {
            MethodAttributes::PRIVATE
        };
        MethodDecl {
            name: format!("{prefix}_{}", self.name),
            returns,
            params,
            flags: access | HIDE_BY_SIG | MethodAttributes::SPECIAL_NAME,
            generic_params: Vec::new(),
        }
    }
}

/// A type definition.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    namespace: String,
    name: String,
    flags: u32,
    value_type: bool,
    extends: Option<Ty>,
    interfaces: Vec<Ty>,
    generic_params: Vec<String>,
    constructor: bool,
    fields: Vec<FieldDecl>,
    methods: Vec<MethodDecl>,
    properties: Vec<PropertyDecl>,
}

impl TypeDecl {
    fn new(namespace: &str, name: &str, flags: u32, extends: Option<Ty>) -> Self {
        TypeDecl {
            namespace: namespace.to_string(),
            name: name.to_string(),
            flags,
            value_type: false,
            extends,
            interfaces: Vec::new(),
            generic_params: Vec::new(),
            constructor: false,
            fields: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// A public class deriving from `System.Object`.
    pub fn class(namespace: &str, name: &str) -> Self {
        TypeDecl::new(
            namespace,
            name,
            TypeAttributes::PUBLIC,
            Some(Ty::external("System", "Object")),
        )
    }

    pub fn interface(namespace: &str, name: &str) -> Self {
        TypeDecl::new(
            namespace,
            name,
            TypeAttributes::PUBLIC | TypeAttributes::INTERFACE | TypeAttributes::ABSTRACT,
            None,
        )
    }

    /// An enum with its `value__` backing field.
    pub fn enumeration(namespace: &str, name: &str) -> Self {
        let mut decl = TypeDecl::new(
            namespace,
            name,
            TypeAttributes::PUBLIC | TypeAttributes::SEALED,
            Some(Ty::external("System", "Enum")),
        );
        decl.value_type = true;
        decl.field_with(
            "value__",
            Ty::Int,
            FieldAttributes::PUBLIC
                | FieldAttributes::SPECIAL_NAME
                | FieldAttributes::RT_SPECIAL_NAME,
        )
    }

    pub fn value_type(namespace: &str, name: &str) -> Self {
        let mut decl = TypeDecl::new(
            namespace,
            name,
            TypeAttributes::PUBLIC | TypeAttributes::SEALED,
            Some(Ty::external("System", "ValueType")),
        );
        decl.value_type = true;
        decl
    }

    pub fn internal(mut self) -> Self {
        self.flags &= !TypeAttributes::VISIBILITY_MASK;
        self
    }

    pub fn special_name(mut self) -> Self {
        self.flags |= TypeAttributes::SPECIAL_NAME;
        self
    }

    pub fn extends(mut self, base: Ty) -> Self {
        self.extends = Some(base);
        self
    }

    pub fn implements(mut self, interface: Ty) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn generic_param(mut self, name: &str) -> Self {
        self.generic_params.push(name.to_string());
        self
    }

    /// Adds a public parameterless `.ctor`.
    pub fn constructor(mut self) -> Self {
        self.constructor = true;
        self
    }

    pub fn field(self, name: &str, ty: Ty) -> Self {
        self.field_with(name, ty, FieldAttributes::PUBLIC)
    }

    pub fn field_with(mut self, name: &str, ty: Ty, flags: u32) -> Self {
        self.fields.push(FieldDecl {
            name: name.to_string(),
            flags: flags as u16,
            signature: FieldSig::Typed(ty),
        });
        self
    }

    /// A public field whose signature blob is written as given.
    pub fn field_raw_signature(mut self, name: &str, blob: Vec<u8>) -> Self {
        self.fields.push(FieldDecl {
            name: name.to_string(),
            flags: FieldAttributes::PUBLIC as u16,
            signature: FieldSig::Raw(blob),
        });
        self
    }

    /// A `public static literal` field typed as the declaring type, as enum members are.
    pub fn literal(self, name: &str) -> Self {
        let own = Ty::Local(self.name.clone());
        self.field_with(
            name,
            own,
            FieldAttributes::PUBLIC | FieldAttributes::STATIC | FieldAttributes::LITERAL,
        )
    }

    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    pub fn property(mut self, property: PropertyDecl) -> Self {
        self.properties.push(property);
        self
    }
}

/// Builds the bytes of a .NET DLL.
///
/// # Example
/// ```rust,ignore
/// let image = ImageBuilder::new("Helper")
///     .assembly_ref("System.Runtime")
///     .add_type(TypeDecl::class("Contoso", "Widget").field("Size", Ty::Int))
///     .build();
/// let module = CilModule::from_mem(image)?;
/// ```
#[derive(Debug, Clone)]
pub struct ImageBuilder {
    name: String,
    version: [u16; 4],
    public_key: Vec<u8>,
    references: Vec<String>,
    types: Vec<TypeDecl>,
    forwarders: Vec<(String, String, String)>,
}

impl ImageBuilder {
    pub fn new(name: &str) -> Self {
        ImageBuilder {
            name: name.to_string(),
            version: [1, 0, 0, 0],
            public_key: Vec::new(),
            references: Vec::new(),
            types: Vec::new(),
            forwarders: Vec::new(),
        }
    }

    pub fn version(mut self, major: u16, minor: u16, build: u16, revision: u16) -> Self {
        self.version = [major, minor, build, revision];
        self
    }

    pub fn public_key(mut self, key: &[u8]) -> Self {
        self.public_key = key.to_vec();
        self
    }

    /// Adds an `AssemblyRef` row. Explicit references come first, in call order.
    pub fn assembly_ref(mut self, name: &str) -> Self {
        if !self.references.iter().any(|existing| existing == name) {
            self.references.push(name.to_string());
        }
        self
    }

    pub fn add_type(mut self, decl: TypeDecl) -> Self {
        self.types.push(decl);
        self
    }

    /// Forwards `namespace.name` to `assembly` through an `ExportedType` row.
    pub fn forward(mut self, assembly: &str, namespace: &str, name: &str) -> Self {
        self.forwarders
            .push((assembly.to_string(), namespace.to_string(), name.to_string()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let metadata = Emitter::new(self).metadata();
        pe_image(&metadata)
    }
}

/// Rows of one table, already encoded.
#[derive(Debug, Default)]
struct Rows {
    count: u32,
    data: Vec<u8>,
}

struct Emitter<'b> {
    builder: &'b ImageBuilder,
    strings: Vec<u8>,
    string_offsets: HashMap<String, u16>,
    blobs: Vec<u8>,
    references: Vec<String>,
    type_refs: Vec<(u32, String, String)>,
    locals: HashMap<String, (u32, bool)>,
    tables: BTreeMap<u8, Rows>,
}

impl<'b> Emitter<'b> {
    fn new(builder: &'b ImageBuilder) -> Self {
        let locals = builder
            .types
            .iter()
            .enumerate()
            .map(|(index, decl)| (decl.name.clone(), (index as u32 + 2, decl.value_type)))
            .collect();

        Emitter {
            builder,
            strings: vec![0],
            string_offsets: HashMap::new(),
            blobs: vec![0],
            references: builder.references.clone(),
            type_refs: Vec::new(),
            locals,
            tables: BTreeMap::new(),
        }
    }

    fn string(&mut self, value: &str) -> u16 {
        if value.is_empty() {
            return 0;
        }
        if let Some(offset) = self.string_offsets.get(value) {
            return *offset;
        }

        let offset = self.strings.len() as u16;
        self.strings.extend_from_slice(value.as_bytes());
        self.strings.push(0);
        self.string_offsets.insert(value.to_string(), offset);
        offset
    }

    fn blob(&mut self, value: &[u8]) -> u16 {
        if value.is_empty() {
            return 0;
        }

        let offset = self.blobs.len() as u16;
        compressed(&mut self.blobs, value.len() as u32);
        self.blobs.extend_from_slice(value);
        offset
    }

    fn assembly_ref(&mut self, name: &str) -> u32 {
        match self.references.iter().position(|existing| existing == name) {
            Some(index) => index as u32 + 1,
            None => {
                self.references.push(name.to_string());
                self.references.len() as u32
            }
        }
    }

    fn type_ref(&mut self, assembly: &str, namespace: &str, name: &str) -> u32 {
        let scope = self.assembly_ref(assembly);
        let key = (scope, namespace.to_string(), name.to_string());
        match self.type_refs.iter().position(|existing| *existing == key) {
            Some(index) => index as u32 + 1,
            None => {
                self.type_refs.push(key);
                self.type_refs.len() as u32
            }
        }
    }

    fn row(&mut self, table: TableId, data: &[u8]) -> u32 {
        let rows = self.tables.entry(table as u8).or_default();
        rows.count += 1;
        rows.data.extend_from_slice(data);
        rows.count
    }

    fn next_rid(&self, table: TableId) -> u32 {
        self.tables.get(&(table as u8)).map_or(0, |rows| rows.count) + 1
    }

    /// `TypeDefOrRef` coded index for `ty`; anything but a named type becomes a `TypeSpec` row.
    fn type_def_or_ref(&mut self, ty: &Ty) -> u16 {
        match ty {
            Ty::Local(name) => (self.local(name).0 << 2) as u16,
            Ty::External {
                assembly,
                namespace,
                name,
                ..
            } => ((self.type_ref(assembly, namespace, name) << 2) | 1) as u16,
            other => {
                let mut signature = Vec::new();
                self.encode(other, &mut signature);
                let blob = self.blob(&signature);
                let rid = self.row(TableId::TypeSpec, &blob.to_le_bytes());
                ((rid << 2) | 2) as u16
            }
        }
    }

    fn local(&self, name: &str) -> (u32, bool) {
        match self.locals.get(name) {
            Some(local) => *local,
            None => panic!("no type named {name} in the image"),
        }
    }

    fn encode(&mut self, ty: &Ty, out: &mut Vec<u8>) {
        match ty {
            Ty::Void => out.push(0x01),
            Ty::Bool => out.push(0x02),
            Ty::Int => out.push(0x08),
            Ty::Long => out.push(0x0a),
            Ty::Double => out.push(0x0d),
            Ty::String => out.push(0x0e),
            Ty::Object => out.push(0x1c),
            Ty::Var(number) => {
                out.push(0x13);
                compressed(out, *number);
            }
            Ty::MVar(number) => {
                out.push(0x1e);
                compressed(out, *number);
            }
            Ty::SzArray(element) => {
                out.push(0x1d);
                self.encode(element, out);
            }
            Ty::ByRef(inner) => {
                out.push(0x10);
                self.encode(inner, out);
            }
            Ty::Generic(base, args) => {
                out.push(0x15);
                self.encode(base, out);
                compressed(out, args.len() as u32);
                for arg in args {
                    self.encode(arg, out);
                }
            }
            Ty::Local(name) => {
                let (rid, value_type) = self.local(name);
                out.push(if value_type { 0x11 } else { 0x12 });
                compressed(out, rid << 2);
            }
            Ty::External {
                assembly,
                namespace,
                name,
                value_type,
            } => {
                let rid = self.type_ref(assembly, namespace, name);
                out.push(if *value_type { 0x11 } else { 0x12 });
                compressed(out, (rid << 2) | 1);
            }
        }
    }

    fn method_signature(&mut self, method: &MethodDecl) -> Vec<u8> {
        let mut convention = if method.is_static() { 0x00 } else { 0x20 };
        if !method.generic_params.is_empty() {
            convention |= 0x10;
        }

        let mut signature = vec![convention];
        if !method.generic_params.is_empty() {
            compressed(&mut signature, method.generic_params.len() as u32);
        }
        compressed(&mut signature, method.params.len() as u32);
        self.encode(&method.returns, &mut signature);
        for (_, ty) in &method.params {
            self.encode(ty, &mut signature);
        }
        signature
    }

    fn method(&mut self, method: &MethodDecl, generic_params: &mut Vec<(u16, u16, String)>) -> u32 {
        let param_list = self.next_rid(TableId::Param);
        for (sequence, (name, _)) in method.params.iter().enumerate() {
            if let Some(name) = name {
                let mut row = Vec::new();
                row.extend_from_slice(&0u16.to_le_bytes());
                row.extend_from_slice(&(sequence as u16 + 1).to_le_bytes());
                row.extend_from_slice(&self.string(name).to_le_bytes());
                self.row(TableId::Param, &row);
            }
        }

        let signature = self.method_signature(method);
        let mut row = Vec::new();
        row.extend_from_slice(&0u32.to_le_bytes());
        row.extend_from_slice(&0u16.to_le_bytes());
        row.extend_from_slice(&(method.flags as u16).to_le_bytes());
        row.extend_from_slice(&self.string(&method.name).to_le_bytes());
        row.extend_from_slice(&self.blob(&signature).to_le_bytes());
        row.extend_from_slice(&(param_list as u16).to_le_bytes());
        let rid = self.row(TableId::MethodDef, &row);

        for (number, name) in method.generic_params.iter().enumerate() {
            generic_params.push((((rid << 1) | 1) as u16, number as u16, name.clone()));
        }
        rid
    }

    fn type_def(
        &mut self,
        rid: u32,
        decl: &TypeDecl,
        generic_params: &mut Vec<(u16, u16, String)>,
    ) {
        let extends = match &decl.extends {
            Some(base) => self.type_def_or_ref(base),
            None => 0,
        };
        let field_list = self.next_rid(TableId::Field);
        let method_list = self.next_rid(TableId::MethodDef);

        let mut row = Vec::new();
        row.extend_from_slice(&decl.flags.to_le_bytes());
        row.extend_from_slice(&self.string(&decl.name).to_le_bytes());
        row.extend_from_slice(&self.string(&decl.namespace).to_le_bytes());
        row.extend_from_slice(&extends.to_le_bytes());
        row.extend_from_slice(&(field_list as u16).to_le_bytes());
        row.extend_from_slice(&(method_list as u16).to_le_bytes());
        self.row(TableId::TypeDef, &row);

        for (number, name) in decl.generic_params.iter().enumerate() {
            generic_params.push(((rid << 1) as u16, number as u16, name.clone()));
        }

        for interface in &decl.interfaces {
            let coded = self.type_def_or_ref(interface);
            let mut row = Vec::new();
            row.extend_from_slice(&(rid as u16).to_le_bytes());
            row.extend_from_slice(&coded.to_le_bytes());
            self.row(TableId::InterfaceImpl, &row);
        }

        for field in &decl.fields {
            let signature = match &field.signature {
                FieldSig::Typed(ty) => {
                    let mut signature = vec![0x06];
                    self.encode(ty, &mut signature);
                    signature
                }
                FieldSig::Raw(blob) => blob.clone(),
            };
            let mut row = Vec::new();
            row.extend_from_slice(&field.flags.to_le_bytes());
            row.extend_from_slice(&self.string(&field.name).to_le_bytes());
            row.extend_from_slice(&self.blob(&signature).to_le_bytes());
            self.row(TableId::Field, &row);
        }

        if decl.constructor {
            let ctor = MethodDecl {
                name: ".ctor".to_string(),
                returns: Ty::Void,
                params: Vec::new(),
                flags: MethodAttributes::PUBLIC
                    | HIDE_BY_SIG
                    | MethodAttributes::SPECIAL_NAME
                    | MethodAttributes::RT_SPECIAL_NAME,
                generic_params: Vec::new(),
            };
            self.method(&ctor, generic_params);
        }
        for method in &decl.methods {
            self.method(method, generic_params);
        }

        if decl.properties.is_empty() {
            return;
        }

        let mut map = Vec::new();
        map.extend_from_slice(&(rid as u16).to_le_bytes());
        map.extend_from_slice(&(self.next_rid(TableId::Property) as u16).to_le_bytes());
        self.row(TableId::PropertyMap, &map);

        for property in &decl.properties {
            let mut accessors = Vec::new();
            if let Some(public) = property.getter {
                let getter = property.accessor("get", public, property.ty.clone(), Vec::new());
                accessors.push((SEMANTICS_GETTER, self.method(&getter, generic_params)));
            }
            if let Some(public) = property.setter {
                let params = vec![(Some("value".to_string()), property.ty.clone())];
                let setter = property.accessor("set", public, Ty::Void, params);
                accessors.push((SEMANTICS_SETTER, self.method(&setter, generic_params)));
            }

            let mut signature = vec![0x28, 0x00];
            self.encode(&property.ty, &mut signature);
            let mut row = Vec::new();
            row.extend_from_slice(&0u16.to_le_bytes());
            row.extend_from_slice(&self.string(&property.name).to_le_bytes());
            row.extend_from_slice(&self.blob(&signature).to_le_bytes());
            let property_rid = self.row(TableId::Property, &row);

            for (semantics, method) in accessors {
                let mut row = Vec::new();
                row.extend_from_slice(&semantics.to_le_bytes());
                row.extend_from_slice(&(method as u16).to_le_bytes());
                row.extend_from_slice(&(((property_rid << 1) | 1) as u16).to_le_bytes());
                self.row(TableId::MethodSemantics, &row);
            }
        }
    }

    fn metadata(mut self) -> Vec<u8> {
        let builder = self.builder;

        let mut module = Vec::new();
        module.extend_from_slice(&0u16.to_le_bytes());
        module.extend_from_slice(&self.string(&format!("{}.dll", builder.name)).to_le_bytes());
        module.extend_from_slice(&[0; 6]);
        self.row(TableId::Module, &module);

        let mut global = Vec::new();
        global.extend_from_slice(&0u32.to_le_bytes());
        global.extend_from_slice(&self.string("<Module>").to_le_bytes());
        global.extend_from_slice(&[0, 0, 0, 0, 1, 0, 1, 0]);
        self.row(TableId::TypeDef, &global);

        let mut generic_params = Vec::new();
        for (index, decl) in builder.types.iter().enumerate() {
            self.type_def(index as u32 + 2, decl, &mut generic_params);
        }

        generic_params.sort_by_key(|(owner, number, _)| (*owner, *number));
        for (owner, number, name) in generic_params {
            let mut row = Vec::new();
            row.extend_from_slice(&number.to_le_bytes());
            row.extend_from_slice(&0u16.to_le_bytes());
            row.extend_from_slice(&owner.to_le_bytes());
            row.extend_from_slice(&self.string(&name).to_le_bytes());
            self.row(TableId::GenericParam, &row);
        }

        for (assembly, namespace, name) in &builder.forwarders {
            let scope = self.assembly_ref(assembly);
            let mut row = Vec::new();
            row.extend_from_slice(&0x0020_0000u32.to_le_bytes());
            row.extend_from_slice(&0u32.to_le_bytes());
            row.extend_from_slice(&self.string(name).to_le_bytes());
            row.extend_from_slice(&self.string(namespace).to_le_bytes());
            row.extend_from_slice(&(((scope << 2) | 1) as u16).to_le_bytes());
            self.row(TableId::ExportedType, &row);
        }

        let mut assembly = Vec::new();
        assembly.extend_from_slice(&0x8004u32.to_le_bytes());
        for part in builder.version {
            assembly.extend_from_slice(&part.to_le_bytes());
        }
        let flags = u32::from(!builder.public_key.is_empty());
        assembly.extend_from_slice(&flags.to_le_bytes());
        assembly.extend_from_slice(&self.blob(&builder.public_key).to_le_bytes());
        assembly.extend_from_slice(&self.string(&builder.name).to_le_bytes());
        assembly.extend_from_slice(&0u16.to_le_bytes());
        self.row(TableId::Assembly, &assembly);

        // type references were collected while encoding, their scopes are final now
        for (scope, namespace, name) in self.type_refs.clone() {
            let mut row = Vec::new();
            row.extend_from_slice(&(((scope << 2) | 2) as u16).to_le_bytes());
            row.extend_from_slice(&self.string(&name).to_le_bytes());
            row.extend_from_slice(&self.string(&namespace).to_le_bytes());
            self.row(TableId::TypeRef, &row);
        }

        for reference in self.references.clone() {
            let mut row = Vec::new();
            for part in [1u16, 0, 0, 0] {
                row.extend_from_slice(&part.to_le_bytes());
            }
            row.extend_from_slice(&0u32.to_le_bytes());
            row.extend_from_slice(&0u16.to_le_bytes());
            row.extend_from_slice(&self.string(&reference).to_le_bytes());
            row.extend_from_slice(&0u16.to_le_bytes());
            row.extend_from_slice(&0u16.to_le_bytes());
            self.row(TableId::AssemblyRef, &row);
        }

        let tables = self.tables_stream();
        let mut strings = std::mem::take(&mut self.strings);
        let mut blobs = std::mem::take(&mut self.blobs);
        pad4(&mut strings);
        pad4(&mut blobs);

        metadata_root(&[
            ("#~", tables.as_slice()),
            ("#Strings", strings.as_slice()),
            ("#Blob", blobs.as_slice()),
        ])
    }

    fn tables_stream(&self) -> Vec<u8> {
        let valid = self
            .tables
            .keys()
            .fold(0u64, |mask, id| mask | (1u64 << id));

        let mut stream = Vec::new();
        stream.extend_from_slice(&0u32.to_le_bytes());
        stream.extend_from_slice(&[2, 0, 0, 1]);
        stream.extend_from_slice(&valid.to_le_bytes());
        stream.extend_from_slice(&0u64.to_le_bytes());
        for rows in self.tables.values() {
            stream.extend_from_slice(&rows.count.to_le_bytes());
        }
        for rows in self.tables.values() {
            stream.extend_from_slice(&rows.data);
        }
        pad4(&mut stream);
        stream
    }
}

fn metadata_root(streams: &[(&str, &[u8])]) -> Vec<u8> {
    let names: Vec<Vec<u8>> = streams
        .iter()
        .map(|(name, _)| {
            let mut padded = name.as_bytes().to_vec();
            padded.push(0);
            pad4(&mut padded);
            padded
        })
        .collect();
    let directory: usize = names.iter().map(|name| 8 + name.len()).sum();

    let mut root = Vec::new();
    root.extend_from_slice(&0x424A_5342u32.to_le_bytes());
    root.extend_from_slice(&1u16.to_le_bytes());
    root.extend_from_slice(&1u16.to_le_bytes());
    root.extend_from_slice(&0u32.to_le_bytes());
    root.extend_from_slice(&(METADATA_VERSION.len() as u32).to_le_bytes());
    root.extend_from_slice(METADATA_VERSION);
    root.extend_from_slice(&0u16.to_le_bytes());
    root.extend_from_slice(&(streams.len() as u16).to_le_bytes());

    let mut offset = root.len() + directory;
    for ((_, data), name) in streams.iter().zip(&names) {
        root.extend_from_slice(&(offset as u32).to_le_bytes());
        root.extend_from_slice(&(data.len() as u32).to_le_bytes());
        root.extend_from_slice(name);
        offset += data.len();
    }
    for (_, data) in streams {
        root.extend_from_slice(data);
    }
    root
}

/// Wraps `metadata` into a PE32 DLL with one `.text` section.
fn pe_image(metadata: &[u8]) -> Vec<u8> {
    let mut section = Vec::new();
    section.extend_from_slice(&(CLI_HEADER_SIZE as u32).to_le_bytes());
    section.extend_from_slice(&2u16.to_le_bytes());
    section.extend_from_slice(&5u16.to_le_bytes());
    section.extend_from_slice(&(SECTION_RVA + CLI_HEADER_SIZE as u32).to_le_bytes());
    section.extend_from_slice(&(metadata.len() as u32).to_le_bytes());
    // ILONLY
    section.extend_from_slice(&1u32.to_le_bytes());
    section.resize(CLI_HEADER_SIZE, 0);
    section.extend_from_slice(metadata);

    let virtual_size = section.len() as u32;
    let raw_size = section.len().next_multiple_of(FILE_ALIGNMENT);
    section.resize(raw_size, 0);
    let image_size = SECTION_RVA + virtual_size.next_multiple_of(SECTION_ALIGNMENT);

    let mut image = vec![0u8; FILE_ALIGNMENT];
    image[0..2].copy_from_slice(b"MZ");
    image[0x3c..0x40].copy_from_slice(&0x80u32.to_le_bytes());

    let mut headers = Vec::new();
    headers.extend_from_slice(b"PE\0\0");
    // COFF: i386, one section, PE32 optional header, executable 32-bit DLL
    headers.extend_from_slice(&0x014cu16.to_le_bytes());
    headers.extend_from_slice(&1u16.to_le_bytes());
    headers.extend_from_slice(&0u32.to_le_bytes());
    headers.extend_from_slice(&0u32.to_le_bytes());
    headers.extend_from_slice(&0u32.to_le_bytes());
    headers.extend_from_slice(&0xe0u16.to_le_bytes());
    headers.extend_from_slice(&0x2102u16.to_le_bytes());

    headers.extend_from_slice(&0x010bu16.to_le_bytes());
    headers.extend_from_slice(&[8, 0]);
    headers.extend_from_slice(&(raw_size as u32).to_le_bytes());
    headers.extend_from_slice(&0u32.to_le_bytes());
    headers.extend_from_slice(&0u32.to_le_bytes());
    headers.extend_from_slice(&0u32.to_le_bytes());
    headers.extend_from_slice(&SECTION_RVA.to_le_bytes());
    headers.extend_from_slice(&0u32.to_le_bytes());

    headers.extend_from_slice(&0x1000_0000u32.to_le_bytes());
    headers.extend_from_slice(&SECTION_ALIGNMENT.to_le_bytes());
    headers.extend_from_slice(&(FILE_ALIGNMENT as u32).to_le_bytes());
    for version in [4u16, 0, 0, 0, 4, 0] {
        headers.extend_from_slice(&version.to_le_bytes());
    }
    headers.extend_from_slice(&0u32.to_le_bytes());
    headers.extend_from_slice(&image_size.to_le_bytes());
    headers.extend_from_slice(&(FILE_ALIGNMENT as u32).to_le_bytes());
    headers.extend_from_slice(&0u32.to_le_bytes());
    headers.extend_from_slice(&3u16.to_le_bytes());
    headers.extend_from_slice(&0x8540u16.to_le_bytes());
    for size in [0x0010_0000u32, 0x1000, 0x0010_0000, 0x1000] {
        headers.extend_from_slice(&size.to_le_bytes());
    }
    headers.extend_from_slice(&0u32.to_le_bytes());
    headers.extend_from_slice(&16u32.to_le_bytes());
    for directory in 0..16 {
        let (rva, size) = if directory == 14 {
            (SECTION_RVA, CLI_HEADER_SIZE as u32)
        } else {
            (0, 0)
        };
        headers.extend_from_slice(&rva.to_le_bytes());
        headers.extend_from_slice(&size.to_le_bytes());
    }

    headers.extend_from_slice(b".text\0\0\0");
    headers.extend_from_slice(&virtual_size.to_le_bytes());
    headers.extend_from_slice(&SECTION_RVA.to_le_bytes());
    headers.extend_from_slice(&(raw_size as u32).to_le_bytes());
    headers.extend_from_slice(&(FILE_ALIGNMENT as u32).to_le_bytes());
    headers.extend_from_slice(&[0; 12]);
    headers.extend_from_slice(&0x6000_0020u32.to_le_bytes());

    image[0x80..0x80 + headers.len()].copy_from_slice(&headers);
    image.extend_from_slice(&section);
    image
}

fn compressed(out: &mut Vec<u8>, value: u32) {
    if value < 0x80 {
        out.push(value as u8);
    } else if value < 0x4000 {
        out.extend_from_slice(&(0x8000 | value as u16).to_be_bytes());
    } else {
        out.extend_from_slice(&(0xc000_0000 | value).to_be_bytes());
    }
}

fn pad4(data: &mut Vec<u8>) {
    data.resize(data.len().next_multiple_of(4), 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        cilmodule::CilModule,
        tables::{ExportedTypeRaw, MethodDefRaw, ParamRaw, TypeRefRaw},
    };

    #[test]
    fn image_parses() {
        let image = ImageBuilder::new("Sample")
            .add_type(
                TypeDecl::class("Contoso", "Widget")
                    .constructor()
                    .method(MethodDecl::new("Resize", Ty::Void).param("width", Ty::Int))
                    .property(PropertyDecl::new("Size", Ty::Int).getter(true)),
            )
            .build();
        assert_eq!(image.len() % FILE_ALIGNMENT, 0);

        let module = CilModule::from_mem(image).unwrap();
        let tables = module.tables();
        assert_eq!(tables.table_row_count(TableId::TypeDef), 2);
        // .ctor, Resize, get_Size
        assert_eq!(tables.table_row_count(TableId::MethodDef), 3);
        assert_eq!(tables.table_row_count(TableId::Param), 1);
        assert_eq!(tables.table_row_count(TableId::Property), 1);
        assert_eq!(tables.table_row_count(TableId::MethodSemantics), 1);

        let resize = module.row::<MethodDefRaw>(2).unwrap();
        assert_eq!(module.string(resize.name).unwrap(), "Resize");
        assert_eq!(resize.param_list, 1);
        let param = module.row::<ParamRaw>(1).unwrap();
        assert_eq!(param.sequence, 1);
        assert_eq!(module.string(param.name).unwrap(), "width");
        // HASTHIS, one parameter, void (int)
        assert_eq!(module.blob(resize.signature).unwrap(), &[0x20, 0x01, 0x01, 0x08]);

        let object = module.row::<TypeRefRaw>(1).unwrap();
        assert_eq!(module.string(object.type_name).unwrap(), "Object");
        assert_eq!(module.assembly_refs()[0].name, "System.Runtime");
    }

    #[test]
    fn strong_name_and_forwarders() {
        let key = [0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0];
        let image = ImageBuilder::new("Facade")
            .public_key(&key)
            .forward("Contoso.Core", "Contoso", "Moved")
            .build();
        let module = CilModule::from_mem(image).unwrap();

        assert_eq!(
            module.identity().unwrap().to_string(),
            "Facade, Version=1.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089"
        );
        let forwarded = module.row::<ExportedTypeRaw>(1).unwrap();
        assert_eq!(module.string(forwarded.name).unwrap(), "Moved");
        assert_eq!(module.assembly_refs()[0].name, "Contoso.Core");
        assert!(module.provides_type("Contoso", "Moved"));
    }

    #[test]
    fn compressed_lengths() {
        let mut out = Vec::new();
        compressed(&mut out, 0x03);
        compressed(&mut out, 0x80);
        compressed(&mut out, 0x4000);
        assert_eq!(out, vec![0x03, 0x80, 0x80, 0xc0, 0x00, 0x40, 0x00]);
    }
}
