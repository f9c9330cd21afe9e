//! # Mapper Errors
//!
//! Error type shared by the registry, the object model and the converter
//! pipeline. The public mapping entry points never surface these; they are
//! logged and degraded to "no result".

use thiserror::Error;

/// Errors raised while describing types or reading/writing object properties
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    #[error("type '{0}' is already registered")]
    DuplicateType(String),

    #[error("type '{0}' is not registered")]
    UnknownType(String),

    #[error("type '{type_name}' declares property '{property}' more than once")]
    DuplicateProperty { type_name: String, property: String },

    #[error("type '{type_name}' has no property '{property}'")]
    UnknownProperty { type_name: String, property: String },

    #[error("property '{type_name}.{property}' is not readable")]
    PropertyNotReadable { type_name: String, property: String },

    #[error("property '{type_name}.{property}' is not writable")]
    PropertyNotWritable { type_name: String, property: String },

    #[error("property '{property}' expects {expected}, got {found}")]
    TypeMismatch {
        property: String,
        expected: String,
        found: String,
    },

    #[error("accessor for '{property}' failed: {message}")]
    Accessor { property: String, message: String },

    #[error("failed to construct '{type_name}': {message}")]
    Construction { type_name: String, message: String },

    #[error("no converter for {0}")]
    NotMappable(String),

    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("invalid mapper configuration: {0}")]
    InvalidConfig(String),
}

impl MapError {
    /// Convenience constructor for accessor closures
    pub fn accessor(property: impl Into<String>, message: impl Into<String>) -> Self {
        MapError::Accessor {
            property: property.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for constructor closures
    pub fn construction(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        MapError::Construction {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
