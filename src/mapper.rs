//! # Mapper
//!
//! Entry point of the engine. Classifies the destination type and routes the
//! value to the string, enum, primitive, interface or class strategy.

use chrono::NaiveDateTime;
use std::sync::Arc;

use crate::compiler::compile_converter;
use crate::config::MapperConfig;
use crate::converter::{CacheStats, CompiledConverter, ConverterCache};
use crate::key::TypePairKey;
use crate::metadata::{ClassDef, EnumDef, InterfaceDef, PrimitiveKind, Type, TypeDef, TypeRegistry};
use crate::primitive::convert_primitive;
use crate::value::{ObjectRef, Value};

/// Maps values onto destination types, compiling one converter per class pair
///
/// A mapper owns its converter cache; share one instance (e.g. behind an
/// `Arc`) across threads so every caller benefits from the same converters.
#[derive(Debug)]
pub struct Mapper {
    registry: Arc<TypeRegistry>,
    cache: ConverterCache,
    config: MapperConfig,
}

impl Mapper {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_config(registry, MapperConfig::default())
    }

    pub fn with_config(registry: Arc<TypeRegistry>, config: MapperConfig) -> Self {
        Self {
            registry,
            cache: ConverterCache::new(),
            config,
        }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Map `value` onto `destination`
    ///
    /// # Arguments
    ///
    /// * `value` - The source value; never modified
    /// * `destination` - The type to produce
    ///
    /// # Returns
    ///
    /// * `Some(Value)` - The converted value. Class targets yield a new
    ///   instance, interface targets yield `value` itself
    /// * `None` - Null input, unknown destination, or no applicable conversion
    pub fn to(&self, value: &Value, destination: &Type) -> Option<Value> {
        if value.is_null() {
            return None;
        }

        match destination {
            Type::String => Some(Value::String(value.to_string())),
            Type::Primitive(kind) => self.to_primitive(value, *kind),
            Type::Named(name) => match self.registry.lookup(name) {
                Some(TypeDef::Enum(def)) => self.to_enum(value, &def),
                Some(TypeDef::Interface(def)) => self.to_interface(value, &def),
                Some(TypeDef::Class(class)) => {
                    let source = value.as_object()?;
                    self.to_class(source, &class).map(Value::Object)
                }
                None => {
                    tracing::debug!("[MAPPER] Unknown destination type {}", name);
                    None
                }
            },
        }
    }

    /// Typed form of [`to`](Self::to); `T::default()` when nothing maps
    pub fn to_type<T: MapTarget>(&self, value: &Value) -> T {
        self.to(value, &T::target_type())
            .and_then(T::from_value)
            .unwrap_or_default()
    }

    fn to_primitive(&self, value: &Value, kind: PrimitiveKind) -> Option<Value> {
        let converted = convert_primitive(value, kind);
        if converted.is_none() {
            tracing::debug!("[MAPPER] Can't convert {:?} to {}", value, kind.name());
        }
        converted
    }

    fn to_enum(&self, value: &Value, def: &EnumDef) -> Option<Value> {
        if let Value::Enum(e) = value {
            if e.enum_name == def.name {
                return Some(value.clone());
            }
        }

        let text = value.to_string();
        let text = text.trim();
        def.find(text, self.config.ignore_enum_case)
            .or_else(|| text.parse::<i64>().ok().and_then(|d| def.find_discriminant(d)))
            .or_else(|| {
                tracing::debug!("[MAPPER] '{}' is not a member of {}", text, def.name);
                None
            })
    }

    fn to_interface(&self, value: &Value, def: &InterfaceDef) -> Option<Value> {
        match value {
            Value::Object(obj) if obj.class().implements(&def.name) => Some(value.clone()),
            _ => None,
        }
    }

    /// Shallow class conversion through the converter cache
    pub(crate) fn to_class(&self, source: &ObjectRef, destination: &Arc<ClassDef>) -> Option<ObjectRef> {
        if destination.is_abstract {
            tracing::debug!("[MAPPER] {} is abstract", destination.name);
            return None;
        }

        let converter = self.converter(source, destination)?;
        match converter.convert(source) {
            Ok(object) => Some(object),
            Err(e) => {
                tracing::warn!("[MAPPER] {}: {}", converter.key(), e);
                None
            }
        }
    }

    fn converter(&self, source: &ObjectRef, destination: &Arc<ClassDef>) -> Option<Arc<CompiledConverter>> {
        let key = TypePairKey::new(source.class().name.clone(), destination.name.clone());
        self.cache
            .get_or_compile(&key, |key| compile_converter(key, source.class(), destination))
            .map_err(|e| tracing::debug!("[MAPPER] {}", e))
            .ok()
    }
}

/// Rust types usable with [`Mapper::to_type`]
pub trait MapTarget: Default + Sized {
    fn target_type() -> Type;

    fn from_value(value: Value) -> Option<Self>;
}

impl MapTarget for String {
    fn target_type() -> Type {
        Type::String
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

macro_rules! map_target_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl MapTarget for $ty {
                fn target_type() -> Type {
                    Type::Primitive(PrimitiveKind::$kind)
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$kind(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

map_target_primitive! {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ClassBuilder, EnumDef};

    fn mapper() -> Mapper {
        let registry = Arc::new(TypeRegistry::new());
        registry
            .register_enum(EnumDef::new("App.Status").member("Inactive").member("Active"))
            .unwrap();
        registry
            .register_class(ClassBuilder::new("App.Shape").abstract_class())
            .unwrap();
        registry
            .register_class(ClassBuilder::new("App.Point").property("X", Type::i32()))
            .unwrap();
        Mapper::new(registry)
    }

    #[test]
    fn null_maps_to_nothing() {
        let mapper = mapper();
        assert_eq!(mapper.to(&Value::Null, &Type::String), None);
        assert_eq!(mapper.to(&Value::Null, &Type::i32()), None);
    }

    #[test]
    fn unknown_destination_maps_to_nothing() {
        assert_eq!(mapper().to(&Value::I32(1), &Type::named("App.Missing")), None);
    }

    #[test]
    fn string_target_uses_display() {
        let mapper = mapper();
        assert_eq!(mapper.to(&Value::I32(30), &Type::String), Some(Value::from("30")));
        assert_eq!(mapper.to_type::<String>(&Value::Bool(false)), "false");
    }

    #[test]
    fn enum_accepts_discriminant_and_same_enum() {
        let mapper = mapper();
        let status = Type::named("App.Status");
        let active = mapper.to(&Value::I32(1), &status).unwrap();
        assert_eq!(active.to_string(), "Active");
        assert_eq!(mapper.to(&active, &status), Some(active.clone()));
        assert_eq!(mapper.to(&Value::I32(7), &status), None);
    }

    #[test]
    fn enum_case_sensitivity_follows_config() {
        let registry = Arc::clone(mapper().registry());
        let strict = Mapper::with_config(
            registry,
            MapperConfig {
                ignore_enum_case: false,
                ..MapperConfig::default()
            },
        );
        let status = Type::named("App.Status");
        assert_eq!(strict.to(&Value::from("active"), &status), None);
        assert!(strict.to(&Value::from("Active"), &status).is_some());
    }

    #[test]
    fn abstract_and_non_object_class_targets_map_to_nothing() {
        let mapper = mapper();
        let point = mapper
            .registry()
            .class("App.Point")
            .unwrap()
            .instantiate()
            .unwrap();
        assert_eq!(mapper.to(&Value::Object(point), &Type::named("App.Shape")), None);
        assert_eq!(mapper.to(&Value::I32(1), &Type::named("App.Point")), None);
        assert_eq!(mapper.cache_stats().compilations, 0);
    }

    #[test]
    fn typed_wrapper_defaults_on_failure() {
        let mapper = mapper();
        assert_eq!(mapper.to_type::<i32>(&Value::from("12")), 12);
        assert_eq!(mapper.to_type::<i32>(&Value::from("twelve")), 0);
        assert_eq!(mapper.to_type::<u8>(&Value::I32(-5)), 0);
        assert!(!mapper.to_type::<bool>(&Value::Null));
    }
}
