//! # Type Identities
//!
//! Lightweight handles naming a type. Named types (enums, interfaces, classes)
//! are resolved through the [`TypeRegistry`](super::TypeRegistry), which keeps
//! fully-qualified names unique, so name equality is type identity.

use chrono::NaiveDateTime;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// Fully-qualified type name, cheap to clone
pub type TypeName = Arc<str>;

/// Built-in scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    DateTime,
}

impl PrimitiveKind {
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
            PrimitiveKind::DateTime => "datetime",
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            PrimitiveKind::I8
                | PrimitiveKind::I16
                | PrimitiveKind::I32
                | PrimitiveKind::I64
                | PrimitiveKind::U8
                | PrimitiveKind::U16
                | PrimitiveKind::U32
                | PrimitiveKind::U64
        )
    }

    /// Value a freshly constructed property of this kind holds
    pub fn zero(self) -> Value {
        match self {
            PrimitiveKind::Bool => Value::Bool(false),
            PrimitiveKind::Char => Value::Char('\0'),
            PrimitiveKind::I8 => Value::I8(0),
            PrimitiveKind::I16 => Value::I16(0),
            PrimitiveKind::I32 => Value::I32(0),
            PrimitiveKind::I64 => Value::I64(0),
            PrimitiveKind::U8 => Value::U8(0),
            PrimitiveKind::U16 => Value::U16(0),
            PrimitiveKind::U32 => Value::U32(0),
            PrimitiveKind::U64 => Value::U64(0),
            PrimitiveKind::F32 => Value::F32(0.0),
            PrimitiveKind::F64 => Value::F64(0.0),
            PrimitiveKind::DateTime => Value::DateTime(NaiveDateTime::default()),
        }
    }
}

/// A type a value can be mapped to, or a property can be declared as
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    String,
    Primitive(PrimitiveKind),
    /// Enum, interface or class registered under this fully-qualified name
    Named(TypeName),
}

impl Type {
    pub fn named(name: impl AsRef<str>) -> Self {
        Type::Named(Arc::from(name.as_ref()))
    }

    pub fn i32() -> Self {
        Type::Primitive(PrimitiveKind::I32)
    }

    pub fn i64() -> Self {
        Type::Primitive(PrimitiveKind::I64)
    }

    pub fn f64() -> Self {
        Type::Primitive(PrimitiveKind::F64)
    }

    /// Fully-qualified name of the type
    pub fn qualified_name(&self) -> &str {
        match self {
            Type::String => "string",
            Type::Primitive(kind) => kind.name(),
            Type::Named(name) => name,
        }
    }

    pub fn as_named(&self) -> Option<&TypeName> {
        match self {
            Type::Named(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualified_name())
    }
}
