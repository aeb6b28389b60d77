//! Type descriptors: the shape of output and input types.

use core::fmt;

use serde::{Serialize, Serializer};

/// Built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Signed 32-bit integer.
    Int,
    Float,
    String,
    Boolean,
    /// Opaque identifier; accepts strings and integers on input.
    Id,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "Int",
            Self::Float => "Float",
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Id => "ID",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ScalarKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "string" => Ok(Self::String),
            "boolean" | "bool" => Ok(Self::Boolean),
            "id" => Ok(Self::Id),
            _ => Err(format!("invalid scalar kind: {s}")),
        }
    }
}

/// What a field holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Scalar(ScalarKind),
    /// Ordered sequence of scalars.
    ScalarList(ScalarKind),
    /// A nested object of the named type.
    Object(String),
    /// Ordered sequence of nested objects of the named type.
    ObjectList(String),
}

impl FieldKind {
    /// The nested type this field refers to, if any.
    #[must_use]
    pub fn nested_type(&self) -> Option<&str> {
        match self {
            Self::Object(name) | Self::ObjectList(name) => Some(name),
            Self::Scalar(_) | Self::ScalarList(_) => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::ScalarList(kind) => write!(f, "[{kind}]"),
            Self::Object(name) => f.write_str(name),
            Self::ObjectList(name) => write!(f, "[{name}]"),
        }
    }
}

impl Serialize for FieldKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Where a type may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeUsage {
    /// Resolved from stored entities.
    Output,
    /// Coerced from request payloads.
    Input,
    Both,
}

impl TypeUsage {
    #[must_use]
    pub const fn is_output(self) -> bool {
        matches!(self, Self::Output | Self::Both)
    }

    #[must_use]
    pub const fn is_input(self) -> bool {
        matches!(self, Self::Input | Self::Both)
    }
}

/// A single field of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    /// Whether an explicit `null` is accepted on input.
    pub nullable: bool,
}

impl FieldDescriptor {
    /// A nullable field.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: true,
        }
    }

    /// Mark the field non-null.
    #[must_use]
    pub const fn non_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// The shape of one output or input type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub name: String,
    pub usage: TypeUsage,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, usage: TypeUsage, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            usage,
            fields,
        }
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_kind_display() {
        assert_eq!(FieldKind::Scalar(ScalarKind::Id).to_string(), "ID");
        assert_eq!(
            FieldKind::ScalarList(ScalarKind::String).to_string(),
            "[String]"
        );
        assert_eq!(
            FieldKind::ObjectList("Variant".to_string()).to_string(),
            "[Variant]"
        );
    }

    #[test]
    fn test_scalar_kind_from_str() {
        assert_eq!("int".parse::<ScalarKind>(), Ok(ScalarKind::Int));
        assert_eq!("String".parse::<ScalarKind>(), Ok(ScalarKind::String));
        assert!("decimal".parse::<ScalarKind>().is_err());
    }

    #[test]
    fn test_usage() {
        assert!(TypeUsage::Both.is_input() && TypeUsage::Both.is_output());
        assert!(!TypeUsage::Output.is_input());
        assert!(!TypeUsage::Input.is_output());
    }

    #[test]
    fn test_field_lookup() {
        let descriptor = TypeDescriptor::new(
            "Variant",
            TypeUsage::Output,
            vec![FieldDescriptor::new("status", FieldKind::Scalar(ScalarKind::Int)).non_null()],
        );
        assert!(descriptor.field("status").is_some_and(|f| !f.nullable));
        assert!(descriptor.field("price").is_none());
    }
}
