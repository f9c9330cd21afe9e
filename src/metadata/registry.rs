//! # Type Registry
//!
//! Owns every enum, interface and class definition the mapper can reflect
//! over. Names are unique across all three kinds.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use super::class::{ClassBuilder, ClassDef, PropertyDef};
use super::types::{Type, TypeName};
use crate::error::{MapError, Result};
use crate::value::{EnumValue, Value};

/// A registered enumeration
#[derive(Debug, Clone)]
pub struct EnumDef {
    pub name: TypeName,
    pub members: Vec<(Arc<str>, i64)>,
}

impl EnumDef {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            members: Vec::new(),
        }
    }

    /// Add a member whose discriminant follows the previous one
    pub fn member(self, name: impl AsRef<str>) -> Self {
        let next = self.members.last().map(|(_, d)| d + 1).unwrap_or(0);
        self.member_with(name, next)
    }

    pub fn member_with(mut self, name: impl AsRef<str>, discriminant: i64) -> Self {
        self.members.push((Arc::from(name.as_ref()), discriminant));
        self
    }

    fn value_of(&self, member: &Arc<str>, discriminant: i64) -> Value {
        Value::Enum(EnumValue {
            enum_name: self.name.clone(),
            member: member.clone(),
            discriminant,
        })
    }

    /// Look up a member by name
    pub fn find(&self, name: &str, ignore_case: bool) -> Option<Value> {
        self.members
            .iter()
            .find(|(m, _)| {
                if ignore_case {
                    m.eq_ignore_ascii_case(name)
                } else {
                    &**m == name
                }
            })
            .map(|(m, d)| self.value_of(m, *d))
    }

    /// Look up a member by discriminant
    pub fn find_discriminant(&self, discriminant: i64) -> Option<Value> {
        self.members
            .iter()
            .find(|(_, d)| *d == discriminant)
            .map(|(m, d)| self.value_of(m, *d))
    }

    /// Member with discriminant 0, or the first member
    pub fn zero(&self) -> Value {
        self.find_discriminant(0)
            .or_else(|| self.members.first().map(|(m, d)| self.value_of(m, *d)))
            .unwrap_or(Value::Null)
    }
}

/// A registered interface
#[derive(Debug, Clone)]
pub struct InterfaceDef {
    pub name: TypeName,
    pub extends: Vec<TypeName>,
}

impl InterfaceDef {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            extends: Vec::new(),
        }
    }

    pub fn extends(mut self, parent: impl AsRef<str>) -> Self {
        self.extends.push(Arc::from(parent.as_ref()));
        self
    }
}

/// Definition behind a [`Type::Named`]
#[derive(Debug, Clone)]
pub enum TypeDef {
    Enum(Arc<EnumDef>),
    Interface(Arc<InterfaceDef>),
    Class(Arc<ClassDef>),
}

/// Thread-safe store of type definitions
///
/// Register enums and interfaces before the classes that use them: zero values
/// of enum-typed properties and inherited interfaces are resolved when the
/// class is registered. Class property types may reference classes registered
/// later, including the class itself.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<TypeName, TypeDef>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_enum(&self, def: EnumDef) -> Result<Arc<EnumDef>> {
        let def = Arc::new(def);
        self.insert(def.name.clone(), TypeDef::Enum(Arc::clone(&def)))?;
        tracing::debug!("[REGISTRY] Registered enum {} ({} members)", def.name, def.members.len());
        Ok(def)
    }

    pub fn register_interface(&self, def: InterfaceDef) -> Result<Arc<InterfaceDef>> {
        for parent in &def.extends {
            self.interface(parent)
                .ok_or_else(|| MapError::UnknownType(parent.to_string()))?;
        }
        let def = Arc::new(def);
        self.insert(def.name.clone(), TypeDef::Interface(Arc::clone(&def)))?;
        tracing::debug!("[REGISTRY] Registered interface {}", def.name);
        Ok(def)
    }

    pub fn register_class(&self, builder: ClassBuilder) -> Result<Arc<ClassDef>> {
        let mut seen = HashSet::new();
        for property in &builder.properties {
            if !seen.insert(&property.name) {
                return Err(MapError::DuplicateProperty {
                    type_name: builder.name.to_string(),
                    property: property.name.to_string(),
                });
            }
        }
        let interfaces = self.interface_closure(&builder.interfaces)?;

        let properties: Vec<PropertyDef> = builder
            .properties
            .into_iter()
            .map(|mut property| {
                property.zero = self.zero_value(&property.ty);
                property
            })
            .collect();

        let class = Arc::new(ClassDef {
            name: builder.name,
            properties,
            is_abstract: builder.is_abstract,
            interfaces,
            construction: builder.construction,
        });
        self.insert(class.name.clone(), TypeDef::Class(Arc::clone(&class)))?;
        tracing::debug!(
            "[REGISTRY] Registered class {} ({} properties)",
            class.name,
            class.properties.len()
        );
        Ok(class)
    }

    pub fn lookup(&self, name: &str) -> Option<TypeDef> {
        let types = self.types.read().ok()?;
        types.get(name).cloned()
    }

    pub fn class(&self, name: &str) -> Option<Arc<ClassDef>> {
        match self.lookup(name)? {
            TypeDef::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn enumeration(&self, name: &str) -> Option<Arc<EnumDef>> {
        match self.lookup(name)? {
            TypeDef::Enum(def) => Some(def),
            _ => None,
        }
    }

    pub fn interface(&self, name: &str) -> Option<Arc<InterfaceDef>> {
        match self.lookup(name)? {
            TypeDef::Interface(def) => Some(def),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.types.read().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Zero value of a property declared with `ty`
    pub fn zero_value(&self, ty: &Type) -> Value {
        match ty {
            Type::String => Value::Null,
            Type::Primitive(kind) => kind.zero(),
            Type::Named(name) => self
                .enumeration(name)
                .map(|def| def.zero())
                .unwrap_or(Value::Null),
        }
    }

    fn insert(&self, name: TypeName, def: TypeDef) -> Result<()> {
        let mut types = self
            .types
            .write()
            .map_err(|e| MapError::LockPoisoned(e.to_string()))?;
        if types.contains_key(&name) {
            return Err(MapError::DuplicateType(name.to_string()));
        }
        types.insert(name, def);
        Ok(())
    }

    /// Direct interfaces plus everything they extend
    fn interface_closure(&self, direct: &[TypeName]) -> Result<HashSet<TypeName>> {
        let mut closure = HashSet::new();
        let mut pending: Vec<TypeName> = direct.to_vec();

        while let Some(name) = pending.pop() {
            if closure.contains(&name) {
                continue;
            }
            let def = self
                .interface(&name)
                .ok_or_else(|| MapError::UnknownType(name.to_string()))?;
            pending.extend(def.extends.iter().cloned());
            closure.insert(name);
        }

        Ok(closure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::PrimitiveKind;

    #[test]
    fn duplicate_names_are_rejected_across_kinds() {
        let registry = TypeRegistry::new();
        registry.register_enum(EnumDef::new("App.Status").member("Active")).unwrap();

        let err = registry
            .register_class(ClassBuilder::new("App.Status"))
            .unwrap_err();
        assert_eq!(err, MapError::DuplicateType("App.Status".to_string()));
    }

    #[test]
    fn duplicate_property_names_are_rejected() {
        let registry = TypeRegistry::new();
        let err = registry
            .register_class(
                ClassBuilder::new("Api.Dst")
                    .property("Age", Type::String)
                    .property("Age", Type::i32()),
            )
            .unwrap_err();

        assert_eq!(
            err,
            MapError::DuplicateProperty {
                type_name: "Api.Dst".to_string(),
                property: "Age".to_string(),
            }
        );
        assert!(registry.class("Api.Dst").is_none());
    }

    #[test]
    fn class_interfaces_include_inherited_ones() {
        let registry = TypeRegistry::new();
        registry.register_interface(InterfaceDef::new("App.INamed")).unwrap();
        registry
            .register_interface(InterfaceDef::new("App.IPerson").extends("App.INamed"))
            .unwrap();
        let class = registry
            .register_class(ClassBuilder::new("App.Person").implements("App.IPerson"))
            .unwrap();

        assert!(class.implements("App.IPerson"));
        assert!(class.implements("App.INamed"));
        assert!(!class.implements("App.IOther"));
    }

    #[test]
    fn unknown_interface_fails_registration() {
        let registry = TypeRegistry::new();
        let err = registry
            .register_class(ClassBuilder::new("App.Person").implements("App.IMissing"))
            .unwrap_err();
        assert_eq!(err, MapError::UnknownType("App.IMissing".to_string()));
        assert!(registry.is_empty());
    }

    #[test]
    fn enum_zero_prefers_zero_discriminant() {
        let def = EnumDef::new("App.Level")
            .member_with("High", 2)
            .member_with("None", 0);
        match def.zero() {
            Value::Enum(e) => assert_eq!(&*e.member, "None"),
            other => panic!("unexpected zero {:?}", other),
        }

        let def = EnumDef::new("App.Flag").member_with("On", 5);
        match def.zero() {
            Value::Enum(e) => assert_eq!(e.discriminant, 5),
            other => panic!("unexpected zero {:?}", other),
        }
    }

    #[test]
    fn property_zero_values_are_resolved_on_registration() {
        let registry = TypeRegistry::new();
        registry
            .register_enum(EnumDef::new("App.Status").member("Inactive").member("Active"))
            .unwrap();
        let class = registry
            .register_class(
                ClassBuilder::new("App.Account")
                    .property("Status", Type::named("App.Status"))
                    .property("Count", Type::Primitive(PrimitiveKind::U32))
                    .property("Owner", Type::named("App.Account")),
            )
            .unwrap();

        let account = class.instantiate().unwrap();
        assert_eq!(account.get("Count").unwrap(), Value::U32(0));
        assert_eq!(account.get("Owner").unwrap(), Value::Null);
        assert_eq!(account.get("Status").unwrap().to_string(), "Inactive");
    }
}
