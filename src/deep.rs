//! # Deep Mapping
//!
//! Recursive mapping layered on the shallow engine. After the compiled
//! converter has copied every exact match, same-named properties whose class
//! types differ are mapped recursively. A [`RecursionGuard`] keeps cyclic
//! source graphs from being walked forever.

use std::sync::Arc;

use crate::guard::RecursionGuard;
use crate::mapper::Mapper;
use crate::metadata::{ClassDef, Type};
use crate::value::{ObjectRef, Value};

impl Mapper {
    /// Map `value` onto `destination`, descending into nested objects
    ///
    /// Behaves like [`Mapper::to`] for every non-class destination. For class
    /// destinations each nested source object is converted to the declared
    /// type of the matching destination property. A source object that is
    /// reached again while it is still being mapped is skipped, leaving that
    /// destination property at its zero value.
    pub fn to_deep(&self, value: &Value, destination: &Type) -> Option<Value> {
        let mut guard = RecursionGuard::new();
        let mapped = self.map_nested(value, destination, &mut guard);
        debug_assert!(guard.is_idle());
        mapped
    }

    fn map_nested(&self, value: &Value, destination: &Type, guard: &mut RecursionGuard) -> Option<Value> {
        let class = destination
            .as_named()
            .and_then(|name| self.registry().class(name));
        let (Some(class), Some(source)) = (class, value.as_object()) else {
            return self.to(value, destination);
        };

        let mapped = if guard.enter(value) {
            self.deep_copy(source, &class, guard)
        } else {
            None
        };
        guard.exit();

        mapped.map(Value::Object)
    }

    fn deep_copy(
        &self,
        source: &ObjectRef,
        class: &Arc<ClassDef>,
        guard: &mut RecursionGuard,
    ) -> Option<ObjectRef> {
        let target = self.to_class(source, class)?;

        if let Some(max_depth) = self.config().max_depth {
            if guard.depth() > max_depth {
                tracing::debug!("[DEEP] Depth limit {} reached at {}", max_depth, class.name);
                return Some(target);
            }
        }

        for property in class.properties.iter().filter(|p| p.readable && p.writable) {
            let Some(nested_class) = property.ty.as_named() else {
                continue;
            };
            if self.registry().class(nested_class).is_none() {
                continue;
            }

            // Identical declared types were already assigned by the converter
            let Some(source_property) = source.class().property(&property.name) else {
                continue;
            };
            if !source_property.readable || source_property.ty == property.ty {
                continue;
            }

            let nested = match source.read(source_property) {
                Ok(nested @ Value::Object(_)) => nested,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!("[DEEP] Can't read {}.{}: {}", source.class().name, property.name, e);
                    continue;
                }
            };

            match self.map_nested(&nested, &property.ty, guard) {
                Some(mapped) => {
                    if let Err(e) = target.write(property, mapped) {
                        tracing::warn!("[DEEP] Can't assign {}.{}: {}", class.name, property.name, e);
                    }
                }
                None => tracing::debug!("[DEEP] Skipped {}.{}", class.name, property.name),
            }
        }

        Some(target)
    }
}
