//! # Compiled Converters
//!
//! The artifact produced once per type pair: a resolved copy plan that builds
//! a destination instance and assigns every matching property.

use std::sync::Arc;

use crate::error::Result;
use crate::key::TypePairKey;
use crate::metadata::{ClassDef, PropertyDef};
use crate::value::ObjectRef;

/// One `source.property -> destination.property` assignment
#[derive(Debug, Clone)]
pub struct CopyPair {
    pub source: PropertyDef,
    pub destination: PropertyDef,
}

/// Immutable converter for a single [`TypePairKey`]
#[derive(Debug)]
pub struct CompiledConverter {
    key: TypePairKey,
    destination: Arc<ClassDef>,
    copies: Vec<CopyPair>,
}

impl CompiledConverter {
    pub(crate) fn new(key: TypePairKey, destination: Arc<ClassDef>, copies: Vec<CopyPair>) -> Self {
        Self {
            key,
            destination,
            copies,
        }
    }

    pub fn key(&self) -> &TypePairKey {
        &self.key
    }

    pub fn destination(&self) -> &Arc<ClassDef> {
        &self.destination
    }

    /// Copy pairs in discovery order
    pub fn copies(&self) -> &[CopyPair] {
        &self.copies
    }

    /// Build a new destination instance from `source`
    ///
    /// Fails only when the destination can't be constructed. A property whose
    /// read or write fails is skipped and the remaining pairs are still copied.
    pub fn convert(&self, source: &ObjectRef) -> Result<ObjectRef> {
        let target = self.destination.instantiate()?;

        for pair in &self.copies {
            let copied = source
                .read(&pair.source)
                .and_then(|value| target.write(&pair.destination, value));

            if let Err(e) = copied {
                tracing::warn!(
                    "[CONVERTER] {}: skipped property '{}': {}",
                    self.key,
                    pair.destination.name,
                    e
                );
            }
        }

        Ok(target)
    }
}
