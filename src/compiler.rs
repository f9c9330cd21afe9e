//! # Converter Compiler
//!
//! Builds the [`CompiledConverter`] for a type pair by matching the two
//! classes' public properties.

use std::sync::Arc;

use crate::converter::{CompiledConverter, CopyPair};
use crate::error::{MapError, Result};
use crate::key::TypePairKey;
use crate::metadata::ClassDef;

/// Compile the converter for `key`
///
/// The destination must have a zero-argument constructor. Every readable
/// source property is paired with the readable and writable destination
/// property of the same name and declared type; anything else is left out of
/// the plan.
///
/// # Arguments
///
/// * `key` - The source and destination class names
/// * `source` - Class of the object being mapped
/// * `destination` - Class to instantiate and populate
///
/// # Returns
///
/// * `Ok(CompiledConverter)` - The copy plan, possibly empty
/// * `Err(MapError)` - The pair can't be converted
pub fn compile_converter(
    key: &TypePairKey,
    source: &ClassDef,
    destination: &Arc<ClassDef>,
) -> Result<CompiledConverter> {
    tracing::info!("[COMPILER] Compiling converter {}", key);

    // Phase 1: the destination must be constructible
    if !destination.has_default_constructor() {
        tracing::debug!("[COMPILER] {} has no zero-argument constructor", destination.name);
        return Err(MapError::NotMappable(format!(
            "{}: destination has no zero-argument constructor",
            key
        )));
    }

    // Phase 2: match properties by exact name and declared type
    let mut copies = Vec::new();
    for source_property in source.properties.iter().filter(|p| p.readable) {
        let matched = destination.properties.iter().find(|p| {
            p.readable && p.writable && p.name == source_property.name && p.ty == source_property.ty
        });

        match matched {
            Some(destination_property) => copies.push(CopyPair {
                source: source_property.clone(),
                destination: destination_property.clone(),
            }),
            None => tracing::debug!(
                "[COMPILER] {}: no match for '{}: {}'",
                key,
                source_property.name,
                source_property.ty
            ),
        }
    }

    tracing::info!("[COMPILER] {} compiled ({} copy pairs)", key, copies.len());
    Ok(CompiledConverter::new(key.clone(), Arc::clone(destination), copies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ClassBuilder, PropertyDef, Type, TypeRegistry};

    fn compile(registry: &TypeRegistry, source: &str, destination: &str) -> Result<CompiledConverter> {
        let key = TypePairKey::new(Arc::from(source), Arc::from(destination));
        let source = registry.class(source).unwrap();
        let destination = registry.class(destination).unwrap();
        compile_converter(&key, &source, &destination)
    }

    fn registry() -> TypeRegistry {
        let registry = TypeRegistry::new();
        registry
            .register_class(
                ClassBuilder::new("App.Person")
                    .property("Name", Type::String)
                    .property("Age", Type::i32())
                    .property("Extra", Type::f64())
                    .with_property(PropertyDef::new("Secret", Type::String).write_only()),
            )
            .unwrap();
        registry
            .register_class(
                ClassBuilder::new("Api.PersonDto")
                    .property("Age", Type::i32())
                    .property("Name", Type::String)
                    .property("Secret", Type::String)
                    .with_property(PropertyDef::new("Extra", Type::f64()).read_only()),
            )
            .unwrap();
        registry
            .register_class(ClassBuilder::new("Api.Sealed").without_default_constructor())
            .unwrap();
        registry
    }

    #[test]
    fn pairs_follow_source_declaration_order() {
        let converter = compile(&registry(), "App.Person", "Api.PersonDto").unwrap();
        let names: Vec<&str> = converter
            .copies()
            .iter()
            .map(|c| &*c.destination.name)
            .collect();
        assert_eq!(names, vec!["Name", "Age"]);
    }

    #[test]
    fn name_matching_is_case_sensitive() {
        let registry = registry();
        registry
            .register_class(ClassBuilder::new("Api.Lower").property("name", Type::String))
            .unwrap();
        let converter = compile(&registry, "App.Person", "Api.Lower").unwrap();
        assert!(converter.copies().is_empty());
    }

    #[test]
    fn destination_without_constructor_is_rejected() {
        let err = compile(&registry(), "App.Person", "Api.Sealed").unwrap_err();
        assert!(matches!(err, MapError::NotMappable(_)));
    }

    #[test]
    fn write_only_and_read_only_destinations_are_skipped() {
        let converter = compile(&registry(), "App.Person", "Api.PersonDto").unwrap();
        let names: Vec<&str> = converter
            .copies()
            .iter()
            .map(|c| &*c.source.name)
            .collect();
        assert!(!names.contains(&"Secret"));
        assert!(!names.contains(&"Extra"));
    }

    #[test]
    fn source_class_is_taken_as_given() {
        let registry = registry();
        let elsewhere = TypeRegistry::new();
        let source = elsewhere
            .register_class(ClassBuilder::new("Ext.Person").property("Name", Type::String))
            .unwrap();
        let destination = registry.class("Api.PersonDto").unwrap();
        let key = TypePairKey::new(source.name.clone(), destination.name.clone());

        let converter = compile_converter(&key, &source, &destination).unwrap();
        assert_eq!(converter.copies().len(), 1);
    }
}
