use crate::metadata::{token::Token, typesystem::ArrayDimensions};

/// A type as encoded in a signature blob (II.23.2.12).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TypeSignature {
    /// Placeholder for signatures that have not been parsed
    #[default]
    Unknown,
    /// `void`
    Void,
    /// `System.Boolean`
    Boolean,
    /// `System.Char`
    Char,
    /// `System.SByte`
    I1,
    /// `System.Byte`
    U1,
    /// `System.Int16`
    I2,
    /// `System.UInt16`
    U2,
    /// `System.Int32`
    I4,
    /// `System.UInt32`
    U4,
    /// `System.Int64`
    I8,
    /// `System.UInt64`
    U8,
    /// `System.Single`
    R4,
    /// `System.Double`
    R8,
    /// `System.String`
    String,
    /// Unmanaged pointer
    Ptr(SignaturePointer),
    /// Managed reference to the inner type
    ByRef(Box<TypeSignature>),
    /// Value type - `TypeDefOrRef` token
    ValueType(Token),
    /// Reference type - `TypeDefOrRef` token
    Class(Token),
    /// Generic parameter of the enclosing type, by index
    GenericParamType(u32),
    /// General array with rank and optional bounds
    Array(SignatureArray),
    /// Instantiation of a generic type with its arguments
    GenericInst(Box<TypeSignature>, Vec<TypeSignature>),
    /// `System.TypedReference`
    TypedByRef,
    /// `System.IntPtr`
    I,
    /// `System.UIntPtr`
    U,
    /// Function pointer
    FnPtr(Box<SignatureMethod>),
    /// `System.Object`
    Object,
    /// Single-dimensional, zero-based array
    SzArray(SignatureSzArray),
    /// Generic parameter of the enclosing method, by index
    GenericParamMethod(u32),
    /// Pinned local
    Pinned(Box<TypeSignature>),
}

/// A general array
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureArray {
    /// The type in the array
    pub base: Box<TypeSignature>,
    /// The number of dimensions
    pub rank: u32,
    /// The dimensions with declared sizes, in order; may be fewer than `rank`
    pub dimensions: Vec<ArrayDimensions>,
}

/// A single-dimensional, zero-based array
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureSzArray {
    /// Custom modifiers - `TypeDefOrRefOrSpecEncoded`
    pub modifiers: Vec<Token>,
    /// The type in the array
    pub base: Box<TypeSignature>,
}

/// A pointer to a type
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignaturePointer {
    /// Custom modifiers - `TypeDefOrRefOrSpecEncoded`
    pub modifiers: Vec<Token>,
    /// The type pointed to
    pub base: Box<TypeSignature>,
}

/// Parameter or return type with optional custom modifiers
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureParameter {
    /// Custom modifiers of the parameter - `TypeDefOrRefOrSpecEncoded`
    pub modifiers: Vec<Token>,
    /// Parameter is passed by reference
    pub by_ref: bool,
    /// The type of the parameter
    pub base: TypeSignature,
}

/// Method signature (II.23.2.1)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureMethod {
    /// Instance method, a `this` pointer is passed
    pub has_this: bool,
    /// The `this` pointer is listed explicitly in the parameters
    pub explicit_this: bool,
    /// Calling convention is `vararg`
    pub vararg: bool,
    /// Number of generic parameters
    pub param_count_generic: u32,
    /// Declared number of parameters, including the vararg tail
    pub param_count: u32,
    /// The return type
    pub return_type: SignatureParameter,
    /// The fixed parameters
    pub params: Vec<SignatureParameter>,
    /// The parameters after the sentinel of a vararg call site
    pub varargs: Vec<SignatureParameter>,
}

/// Field signature (II.23.2.4)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureField {
    /// The custom modifiers for this field - `TypeDefOrRefOrSpecEncoded`
    pub modifiers: Vec<Token>,
    /// The type of the field
    pub base: TypeSignature,
}

/// Property signature (II.23.2.5)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureProperty {
    /// Instance property
    pub has_this: bool,
    /// The custom modifiers of the property type - `TypeDefOrRefOrSpecEncoded`
    pub modifiers: Vec<Token>,
    /// The type of the property
    pub base: TypeSignature,
    /// Index parameters
    pub params: Vec<SignatureParameter>,
}

/// Type specification signature (II.23.2.14)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureTypeSpec {
    /// Signature of this type
    pub base: TypeSignature,
}
