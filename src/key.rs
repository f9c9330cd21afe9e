//! # Type-Pair Key
//!
//! Identifies one conversion shape: a source class and a destination class.

use std::fmt;

use crate::metadata::TypeName;

/// `(source, destination)` pair used to key compiled converters
///
/// Equality and hashing both go through the fully-qualified names, which the
/// registry keeps unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypePairKey {
    source: TypeName,
    destination: TypeName,
}

impl TypePairKey {
    pub fn new(source: TypeName, destination: TypeName) -> Self {
        Self {
            source,
            destination,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }
}

impl fmt::Display for TypePairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.destination)
    }
}
