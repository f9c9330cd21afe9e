//! # Class Metadata
//!
//! Describes the shape of a mappable class: its public properties, the
//! interfaces it implements and how a zero-argument instance is built.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::types::{Type, TypeName};
use crate::error::{MapError, Result};
use crate::value::{Object, ObjectRef, Value};

/// Custom property getter
pub type Getter = Arc<dyn Fn(&Object) -> Result<Value> + Send + Sync>;

/// Custom property setter
pub type Setter = Arc<dyn Fn(&Object, Value) -> Result<()> + Send + Sync>;

/// Body of a zero-argument constructor, run on a freshly allocated instance
pub type Initializer = Arc<dyn Fn(&ObjectRef) -> Result<()> + Send + Sync>;

/// How instances of a class are created
#[derive(Clone)]
pub enum Construction {
    /// Allocate with every property at its zero value
    Default,
    /// Allocate, then run a fallible initializer
    Initializer(Initializer),
    /// No zero-argument constructor; the class can't be a mapping destination
    Unavailable,
}

/// A public instance property
#[derive(Clone)]
pub struct PropertyDef {
    pub name: Arc<str>,
    pub ty: Type,
    pub readable: bool,
    pub writable: bool,
    pub(crate) getter: Option<Getter>,
    pub(crate) setter: Option<Setter>,
    /// Resolved on registration, enums need the registry
    pub(crate) zero: Value,
}

impl PropertyDef {
    /// Readable and writable property backed by the object's own storage
    pub fn new(name: impl AsRef<str>, ty: Type) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            ty,
            readable: true,
            writable: true,
            getter: None,
            setter: None,
            zero: Value::Null,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.readable = false;
        self
    }

    pub fn getter<F>(mut self, getter: F) -> Self
    where
        F: Fn(&Object) -> Result<Value> + Send + Sync + 'static,
    {
        self.getter = Some(Arc::new(getter));
        self
    }

    pub fn setter<F>(mut self, setter: F) -> Self
    where
        F: Fn(&Object, Value) -> Result<()> + Send + Sync + 'static,
    {
        self.setter = Some(Arc::new(setter));
        self
    }

    /// Whether `value` may be stored in this property
    pub fn accepts(&self, value: &Value) -> bool {
        match (value, &self.ty) {
            (Value::Null, Type::String) => true,
            (Value::Null, Type::Named(_)) => !matches!(self.zero, Value::Enum(_)),
            (Value::String(_), Type::String) => true,
            (Value::Enum(e), Type::Named(name)) => e.enum_name == *name,
            (Value::Object(obj), Type::Named(name)) => {
                obj.class().name == *name || obj.class().implements(name)
            }
            (other, Type::Primitive(kind)) => other.primitive_kind() == Some(*kind),
            _ => false,
        }
    }
}

impl fmt::Debug for PropertyDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDef")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("readable", &self.readable)
            .field("writable", &self.writable)
            .field("custom_getter", &self.getter.is_some())
            .field("custom_setter", &self.setter.is_some())
            .finish()
    }
}

/// A registered class
pub struct ClassDef {
    pub name: TypeName,
    pub properties: Vec<PropertyDef>,
    pub is_abstract: bool,
    /// Every interface implemented, including inherited ones
    pub(crate) interfaces: HashSet<TypeName>,
    pub(crate) construction: Construction,
}

impl ClassDef {
    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| &*p.name == name)
    }

    pub(crate) fn property_or_err(&self, name: &str) -> Result<&PropertyDef> {
        self.property(name).ok_or_else(|| MapError::UnknownProperty {
            type_name: self.name.to_string(),
            property: name.to_string(),
        })
    }

    pub fn implements(&self, interface: &str) -> bool {
        self.interfaces.contains(interface)
    }

    /// True if the class can be instantiated without arguments
    pub fn has_default_constructor(&self) -> bool {
        !self.is_abstract && !matches!(self.construction, Construction::Unavailable)
    }

    /// Create a new instance through the zero-argument constructor
    pub fn instantiate(self: &Arc<Self>) -> Result<ObjectRef> {
        if !self.has_default_constructor() {
            return Err(MapError::construction(
                self.name.to_string(),
                "no zero-argument constructor",
            ));
        }

        let object = ObjectRef::allocate(Arc::clone(self));
        if let Construction::Initializer(init) = &self.construction {
            init(&object)?;
        }
        Ok(object)
    }
}

impl fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDef")
            .field("name", &self.name)
            .field("properties", &self.properties)
            .field("is_abstract", &self.is_abstract)
            .field("interfaces", &self.interfaces)
            .finish_non_exhaustive()
    }
}

/// Builder handed to [`TypeRegistry::register_class`](super::TypeRegistry::register_class)
pub struct ClassBuilder {
    pub(crate) name: TypeName,
    pub(crate) properties: Vec<PropertyDef>,
    pub(crate) interfaces: Vec<TypeName>,
    pub(crate) is_abstract: bool,
    pub(crate) construction: Construction,
}

impl ClassBuilder {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            properties: Vec::new(),
            interfaces: Vec::new(),
            is_abstract: false,
            construction: Construction::Default,
        }
    }

    /// Add a readable and writable property
    pub fn property(self, name: impl AsRef<str>, ty: Type) -> Self {
        self.with_property(PropertyDef::new(name, ty))
    }

    pub fn with_property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    pub fn implements(mut self, interface: impl AsRef<str>) -> Self {
        self.interfaces.push(Arc::from(interface.as_ref()));
        self
    }

    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn without_default_constructor(mut self) -> Self {
        self.construction = Construction::Unavailable;
        self
    }

    /// Use a fallible constructor body instead of plain zero-initialization
    pub fn constructor<F>(mut self, init: F) -> Self
    where
        F: Fn(&ObjectRef) -> Result<()> + Send + Sync + 'static,
    {
        self.construction = Construction::Initializer(Arc::new(init));
        self
    }
}
