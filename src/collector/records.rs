//! Flattened descriptions of exported types and their members.
//!
//! Records carry names and textual type names only. They serialize with the PascalCase keys of
//! the JSON export.

use serde::Serialize;

/// The kind of an exported type. Exactly one applies to each type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TypeKind {
    /// Reference type that is not an interface
    Class,
    /// Interface
    Interface,
    /// Enumeration, derived from `System.Enum`
    Enum,
    /// Value type, derived from `System.ValueType`
    ValueType,
}

impl TypeKind {
    /// Label of the kind in the text export.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TypeKind::Class => "类",
            TypeKind::Interface => "接口",
            TypeKind::Enum => "枚举",
            TypeKind::ValueType => "值类型",
        }
    }

    /// Name of the kind in the structured exports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Class => "Class",
            TypeKind::Interface => "Interface",
            TypeKind::Enum => "Enum",
            TypeKind::ValueType => "ValueType",
        }
    }
}

/// An exported type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TypeRecord {
    /// Simple name, e.g. ``List`1``
    pub name: String,
    /// Namespace, `None` for the global namespace
    pub namespace: Option<String>,
    /// `Namespace.Name`, or the simple name in the global namespace
    pub full_name: String,
    /// Kind of the type
    pub kind: TypeKind,
    /// Public methods declared on the type
    pub methods: Vec<MethodRecord>,
    /// Public properties declared on the type
    pub properties: Vec<PropertyRecord>,
    /// Public fields declared on the type
    pub fields: Vec<FieldRecord>,
}

/// A method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MethodRecord {
    /// Method name
    pub name: String,
    /// Name of the return type
    pub return_type: String,
    /// Parameters in declaration order
    pub parameters: Vec<ParameterRecord>,
    /// Whether the method is public
    pub is_public: bool,
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterRecord {
    /// Parameter name, empty when the module does not name it
    pub name: String,
    /// Name of the parameter type
    #[serde(rename = "Type")]
    pub type_name: String,
}

/// A property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PropertyRecord {
    /// Property name
    pub name: String,
    /// Name of the property type
    #[serde(rename = "Type")]
    pub type_name: String,
    /// The property has a getter
    pub can_read: bool,
    /// The property has a setter
    pub can_write: bool,
}

/// A field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FieldRecord {
    /// Field name
    pub name: String,
    /// Name of the field type
    #[serde(rename = "Type")]
    pub type_name: String,
    /// Whether the field is public
    pub is_public: bool,
}
