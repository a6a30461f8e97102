//! Read-only schema accessor over an immutable entity model snapshot

use std::collections::{BTreeMap, HashSet};

use super::errors::{ModelError, ModelResult};
use super::types::{EntitySet, EntityType, NavigationProperty, PropertyKind};

/// Schema lookups needed by the compilation and projection pipeline.
///
/// Implementations must be immutable for the lifetime of a request.
pub trait SchemaAccessor {
    /// Entity set by name
    fn entity_set(&self, name: &str) -> Option<&EntitySet>;

    /// Entity type by (unqualified) name
    fn entity_type(&self, name: &str) -> Option<&EntityType>;

    /// Resolves a navigation from `source` to the declared property and the
    /// entity set it lands in
    fn navigation_target(
        &self,
        source: &EntitySet,
        navigation: &str,
    ) -> ModelResult<(&NavigationProperty, &EntitySet)>;

    /// Entity type bound to an entity set
    fn entity_type_of(&self, set: &EntitySet) -> ModelResult<&EntityType> {
        self.entity_type(&set.entity_type)
            .ok_or_else(|| ModelError::unknown_entity_type(&set.entity_type))
    }

    /// Whether exact-match predicates on `property` must use the keyword variant
    fn needs_keyword(&self, entity_type: &EntityType, property: &str) -> bool {
        entity_type
            .property(property)
            .map_or(false, |p| p.keyword && p.kind == PropertyKind::Primitive)
    }
}

/// Validated, immutable entity model
#[derive(Debug, Clone, Default)]
pub struct EntityModel {
    entity_types: BTreeMap<String, EntityType>,
    entity_sets: BTreeMap<String, EntitySet>,
}

impl EntityModel {
    /// Builds a model, validating its structure.
    pub fn new(entity_types: Vec<EntityType>, entity_sets: Vec<EntitySet>) -> ModelResult<Self> {
        let mut types = BTreeMap::new();
        for ty in entity_types {
            if types.contains_key(&ty.name) {
                return Err(ModelError::malformed_model(
                    "<model>",
                    format!("entity type '{}' declared twice", ty.name),
                ));
            }
            types.insert(ty.name.clone(), ty);
        }

        let mut sets = BTreeMap::new();
        for set in entity_sets {
            if sets.contains_key(&set.name) {
                return Err(ModelError::malformed_model(
                    "<model>",
                    format!("entity set '{}' declared twice", set.name),
                ));
            }
            sets.insert(set.name.clone(), set);
        }

        let model = Self {
            entity_types: types,
            entity_sets: sets,
        };
        model.validate_structure()?;
        Ok(model)
    }

    /// Returns all entity sets in name order
    pub fn entity_sets(&self) -> impl Iterator<Item = &EntitySet> {
        self.entity_sets.values()
    }

    /// Returns all entity types in name order
    pub fn entity_types(&self) -> impl Iterator<Item = &EntityType> {
        self.entity_types.values()
    }

    fn validate_structure(&self) -> ModelResult<()> {
        for ty in self.entity_types.values() {
            let mut seen = HashSet::new();
            for prop in &ty.properties {
                if !seen.insert(prop.name.as_str()) {
                    return Err(ModelError::malformed_model(
                        "<model>",
                        format!("property '{}' declared twice on '{}'", prop.name, ty.name),
                    ));
                }
                if prop.kind.is_complex() && prop.primitive.is_some() {
                    return Err(ModelError::malformed_model(
                        "<model>",
                        format!(
                            "complex property '{}.{}' cannot carry a primitive type",
                            ty.name, prop.name
                        ),
                    ));
                }
            }
            for nav in &ty.navigations {
                if !self.entity_types.contains_key(&nav.target) {
                    return Err(ModelError::malformed_model(
                        "<model>",
                        format!(
                            "navigation '{}.{}' targets unknown type '{}'",
                            ty.name, nav.name, nav.target
                        ),
                    ));
                }
            }
        }

        for set in self.entity_sets.values() {
            if !self.entity_types.contains_key(&set.entity_type) {
                return Err(ModelError::malformed_model(
                    "<model>",
                    format!(
                        "entity set '{}' references unknown type '{}'",
                        set.name, set.entity_type
                    ),
                ));
            }
            for (nav, target) in &set.bindings {
                if !self.entity_sets.contains_key(target) {
                    return Err(ModelError::malformed_model(
                        "<model>",
                        format!(
                            "binding '{}' on '{}' names unknown entity set '{}'",
                            nav, set.name, target
                        ),
                    ));
                }
            }
        }

        Ok(())
    }
}

impl SchemaAccessor for EntityModel {
    fn entity_set(&self, name: &str) -> Option<&EntitySet> {
        self.entity_sets.get(name)
    }

    fn entity_type(&self, name: &str) -> Option<&EntityType> {
        self.entity_types.get(name)
    }

    fn navigation_target(
        &self,
        source: &EntitySet,
        navigation: &str,
    ) -> ModelResult<(&NavigationProperty, &EntitySet)> {
        let source_type = self.entity_type_of(source)?;
        let nav = source_type
            .navigation(navigation)
            .ok_or_else(|| ModelError::unknown_navigation(&source.name, navigation))?;

        // Explicit binding wins
        if let Some(target) = source.bindings.get(navigation) {
            let set = self
                .entity_sets
                .get(target)
                .ok_or_else(|| ModelError::unknown_entity_set(target))?;
            return Ok((nav, set));
        }

        // Otherwise the target type must be bound to exactly one set
        let mut candidates = self
            .entity_sets
            .values()
            .filter(|s| s.entity_type == nav.target);
        match (candidates.next(), candidates.next()) {
            (Some(set), None) => Ok((nav, set)),
            _ => Err(ModelError::unknown_navigation(&source.name, navigation)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::errors::ModelErrorCode;
    use crate::model::types::{Cardinality, PrimitiveType, Property};

    fn library() -> EntityModel {
        let author = EntityType::new("Author")
            .with_property(Property::primitive("id", PrimitiveType::String).with_field("_id"))
            .with_property(Property::text("name"))
            .with_navigation(NavigationProperty::new("books", "Book", Cardinality::Many));
        let book = EntityType::new("Book")
            .with_property(Property::primitive("id", PrimitiveType::String).with_field("_id"))
            .with_property(Property::text("title"))
            .with_property(Property::complex("dimensions"))
            .with_navigation(NavigationProperty::new("author", "Author", Cardinality::One));

        EntityModel::new(
            vec![author, book],
            vec![
                EntitySet::new("Authors", "Author", "library"),
                EntitySet::new("Books", "Book", "library").with_binding("author", "Authors"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_by_name() {
        let model = library();
        assert!(model.entity_set("Books").is_some());
        assert!(model.entity_set("Chapters").is_none());
        let set = model.entity_set("Books").unwrap();
        assert_eq!(model.entity_type_of(set).unwrap().name, "Book");
    }

    #[test]
    fn test_navigation_through_binding() {
        let model = library();
        let books = model.entity_set("Books").unwrap();
        let (nav, target) = model.navigation_target(books, "author").unwrap();
        assert_eq!(nav.cardinality, Cardinality::One);
        assert_eq!(target.name, "Authors");
    }

    #[test]
    fn test_navigation_through_unique_type_binding() {
        let model = library();
        let authors = model.entity_set("Authors").unwrap();
        let (nav, target) = model.navigation_target(authors, "books").unwrap();
        assert!(nav.is_collection());
        assert_eq!(target.name, "Books");
    }

    #[test]
    fn test_unknown_navigation() {
        let model = library();
        let authors = model.entity_set("Authors").unwrap();
        let err = model.navigation_target(authors, "publisher").unwrap_err();
        assert_eq!(err.code(), ModelErrorCode::EdmUnknownNavigation);
    }

    #[test]
    fn test_needs_keyword_only_for_primitive_text() {
        let model = library();
        let book = model.entity_type("Book").unwrap();
        assert!(model.needs_keyword(book, "title"));
        assert!(!model.needs_keyword(book, "id"));
        assert!(!model.needs_keyword(book, "dimensions"));
        assert!(!model.needs_keyword(book, "missing"));
    }

    #[test]
    fn test_set_with_unknown_type_rejected() {
        let result = EntityModel::new(vec![], vec![EntitySet::new("Books", "Book", "library")]);
        assert_eq!(
            result.unwrap_err().code(),
            ModelErrorCode::EdmMalformedModel
        );
    }

    #[test]
    fn test_duplicate_property_rejected() {
        let ty = EntityType::new("Book")
            .with_property(Property::text("title"))
            .with_property(Property::text("title"));
        assert!(EntityModel::new(vec![ty], vec![]).is_err());
    }

    #[test]
    fn test_dangling_navigation_rejected() {
        let ty = EntityType::new("Book").with_navigation(NavigationProperty::new(
            "author",
            "Author",
            Cardinality::One,
        ));
        assert!(EntityModel::new(vec![ty], vec![]).is_err());
    }
}
