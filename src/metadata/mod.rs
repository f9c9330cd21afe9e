//! # Type Metadata
//!
//! Runtime description of the types the mapper can convert between.

mod class;
mod registry;
mod types;

pub use class::{ClassBuilder, ClassDef, Construction, Getter, Initializer, PropertyDef, Setter};
pub use registry::{EnumDef, InterfaceDef, TypeDef, TypeRegistry};
pub use types::{PrimitiveKind, Type, TypeName};
