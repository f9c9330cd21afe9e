//! # Object Mapper
//!
//! Maps an arbitrary source object onto a destination type, copying every
//! public property whose name and declared type match on both sides.
//!
//! The mapper provides:
//! - A runtime type model (classes, enums, interfaces) held in a [`TypeRegistry`]
//! - One compiled converter per (source class, destination class) pair, cached
//!   and shared across threads
//! - Best-effort scalar conversions for string, enum and primitive targets
//! - Optional deep mapping with cycle detection
//!
//! ## Quick Start
//!
//! ```rust
//! use object_mapper::{ClassBuilder, Mapper, Type, TypeRegistry, Value};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let person = registry.register_class(
//!     ClassBuilder::new("App.Person")
//!         .property("Name", Type::String)
//!         .property("Age", Type::i32()),
//! )?;
//! registry.register_class(ClassBuilder::new("Api.PersonDto").property("Name", Type::String))?;
//!
//! let ann = person.instantiate()?;
//! ann.set("Name", "Ann")?;
//! ann.set("Age", 30i32)?;
//!
//! let mapper = Mapper::new(registry);
//! let dto = mapper
//!     .to(&Value::Object(ann), &Type::named("Api.PersonDto"))
//!     .expect("person maps to dto");
//! assert_eq!(dto.as_object().unwrap().get("Name")?, Value::from("Ann"));
//! # Ok::<(), object_mapper::MapError>(())
//! ```
//!
//! ## Architecture
//!
//! A call to [`Mapper::to`] goes through these steps:
//!
//! 1. **Dispatch** - Classify the destination as string, enum, primitive,
//!    interface or class
//! 2. **Cache Lookup** - Class targets look up the converter keyed by
//!    [`TypePairKey`]
//! 3. **Compilation** - On a miss, [`compile_converter`] matches properties
//!    and the result is published to the cache
//! 4. **Conversion** - The compiled converter constructs the destination and
//!    copies each matched property, skipping individual failures
//!
//! Every failure is reported as `None`; the mapper never returns an error to
//! its caller.

pub mod compiler;
pub mod config;
pub mod converter;
pub mod deep;
pub mod error;
pub mod guard;
pub mod key;
pub mod mapper;
pub mod metadata;
pub mod primitive;
pub mod value;

// Re-export the main mapping API
pub use mapper::{MapTarget, Mapper};
pub use config::MapperConfig;
pub use compiler::compile_converter;
pub use converter::{CacheStats, CompiledConverter, ConverterCache, CopyPair};
pub use guard::RecursionGuard;
pub use key::TypePairKey;
pub use error::{MapError, Result};

// Re-export the type and value model
pub use metadata::{
    ClassBuilder, ClassDef, EnumDef, InterfaceDef, PrimitiveKind, PropertyDef,
    Type, TypeDef, TypeName, TypeRegistry,
};
pub use value::{EnumValue, Object, ObjectRef, Value};
