//! # Runtime Values
//!
//! The dynamic values the mapper reads from and writes to. Objects are shared
//! by reference ([`ObjectRef`]) and compared by pointer identity; everything
//! else is a plain value.

use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, RwLock};

use crate::error::{MapError, Result};
use crate::metadata::{ClassDef, PrimitiveKind, PropertyDef, Type, TypeName};

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A member of a registered enum
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub enum_name: TypeName,
    pub member: Arc<str>,
    pub discriminant: i64,
}

/// A dynamically typed value
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    String(String),
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    DateTime(NaiveDateTime),
    Enum(EnumValue),
    Object(ObjectRef),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Primitive kind of the value, if it is a scalar
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        let kind = match self {
            Value::Bool(_) => PrimitiveKind::Bool,
            Value::Char(_) => PrimitiveKind::Char,
            Value::I8(_) => PrimitiveKind::I8,
            Value::I16(_) => PrimitiveKind::I16,
            Value::I32(_) => PrimitiveKind::I32,
            Value::I64(_) => PrimitiveKind::I64,
            Value::U8(_) => PrimitiveKind::U8,
            Value::U16(_) => PrimitiveKind::U16,
            Value::U32(_) => PrimitiveKind::U32,
            Value::U64(_) => PrimitiveKind::U64,
            Value::F32(_) => PrimitiveKind::F32,
            Value::F64(_) => PrimitiveKind::F64,
            Value::DateTime(_) => PrimitiveKind::DateTime,
            _ => return None,
        };
        Some(kind)
    }

    /// Runtime type of the value; `None` for null
    pub fn runtime_type(&self) -> Option<Type> {
        match self {
            Value::Null => None,
            Value::String(_) => Some(Type::String),
            Value::Enum(e) => Some(Type::Named(e.enum_name.clone())),
            Value::Object(obj) => Some(Type::Named(obj.class().name.clone())),
            other => other.primitive_kind().map(Type::Primitive),
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::U16(a), Value::U16(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::String(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "{}", c),
            Value::I8(n) => write!(f, "{}", n),
            Value::I16(n) => write!(f, "{}", n),
            Value::I32(n) => write!(f, "{}", n),
            Value::I64(n) => write!(f, "{}", n),
            Value::U8(n) => write!(f, "{}", n),
            Value::U16(n) => write!(f, "{}", n),
            Value::U32(n) => write!(f, "{}", n),
            Value::U64(n) => write!(f, "{}", n),
            Value::F32(n) => write!(f, "{}", n),
            Value::F64(n) => write!(f, "{}", n),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Value::Enum(e) => f.write_str(&e.member),
            Value::Object(obj) => f.write_str(&obj.class().name),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

macro_rules! value_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from_scalar! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    NaiveDateTime => DateTime,
}

/// An instance of a registered class
///
/// Property storage is behind a lock so instances can be shared across threads
/// and populated through a shared reference.
pub struct Object {
    class: Arc<ClassDef>,
    slots: RwLock<HashMap<Arc<str>, Value>>,
}

impl Object {
    pub fn class(&self) -> &Arc<ClassDef> {
        &self.class
    }

    /// Read a property through its getter
    pub fn get(&self, name: &str) -> Result<Value> {
        let property = self.class.property_or_err(name)?;
        self.read(property)
    }

    /// Write a property through its setter, checking the declared type
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let property = self.class.property_or_err(name)?;
        self.write(property, value.into())
    }

    pub(crate) fn read(&self, property: &PropertyDef) -> Result<Value> {
        if !property.readable {
            return Err(MapError::PropertyNotReadable {
                type_name: self.class.name.to_string(),
                property: property.name.to_string(),
            });
        }
        match &property.getter {
            Some(getter) => getter(self),
            None => self.slot(&property.name),
        }
    }

    pub(crate) fn write(&self, property: &PropertyDef, value: Value) -> Result<()> {
        if !property.writable {
            return Err(MapError::PropertyNotWritable {
                type_name: self.class.name.to_string(),
                property: property.name.to_string(),
            });
        }
        if !property.accepts(&value) {
            return Err(MapError::TypeMismatch {
                property: property.name.to_string(),
                expected: property.ty.to_string(),
                found: value
                    .runtime_type()
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "null".to_string()),
            });
        }
        match &property.setter {
            Some(setter) => setter(self, value),
            None => self.set_slot(&property.name, value),
        }
    }

    /// Raw storage read, bypassing accessors
    pub fn slot(&self, name: &str) -> Result<Value> {
        let slots = self
            .slots
            .read()
            .map_err(|e| MapError::LockPoisoned(e.to_string()))?;
        Ok(slots.get(name).cloned().unwrap_or_default())
    }

    /// Raw storage write, bypassing accessors and type checks
    pub fn set_slot(&self, name: &str, value: Value) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|e| MapError::LockPoisoned(e.to_string()))?;
        slots.insert(Arc::from(name), value);
        Ok(())
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Slots may hold cyclic references, so only the class is printed
        f.debug_struct("Object")
            .field("class", &self.class.name)
            .finish_non_exhaustive()
    }
}

/// Shared handle to an [`Object`]; equality is reference identity
#[derive(Debug, Clone)]
pub struct ObjectRef(Arc<Object>);

impl ObjectRef {
    /// Allocate an instance with every property at its zero value
    pub(crate) fn allocate(class: Arc<ClassDef>) -> Self {
        let slots: HashMap<Arc<str>, Value> = class
            .properties
            .iter()
            .map(|p| (p.name.clone(), p.zero.clone()))
            .collect();
        ObjectRef(Arc::new(Object {
            class,
            slots: RwLock::new(slots),
        }))
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for ObjectRef {
    type Target = Object;

    fn deref(&self) -> &Object {
        &self.0
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ObjectRef {}
