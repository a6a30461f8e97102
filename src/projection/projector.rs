//! Result projector
//!
//! Raw hits are schema-less field maps. Each field becomes a property named
//! after the declared property it backs (or after the field itself when the
//! model does not declare it), materialized as:
//!
//! - array: collection; element kind comes from the declared property, not
//!   from the elements
//! - object: complex value with one level of scalar sub-properties; anything
//!   nested deeper stays a raw primitive value
//! - anything else: primitive
//!
//! Field order follows the hit.

use serde_json::{Map, Value};

use super::entity::{ProjectedCollection, ProjectedEntity, ProjectedProperty, PropertyValue};
use crate::executor::{RawHit, SearchResponse};
use crate::model::{EntityType, Property, PropertyKind};

/// Projects raw hits into typed entities of one entity type
pub struct ResultProjector<'a> {
    entity_type: &'a EntityType,
    id_field: &'a str,
}

impl<'a> ResultProjector<'a> {
    pub fn new(entity_type: &'a EntityType, id_field: &'a str) -> Self {
        Self {
            entity_type,
            id_field,
        }
    }

    /// Property name carrying the identifier
    pub fn id_property(&self) -> &str {
        self.entity_type
            .property_by_field(self.id_field)
            .map(|p| p.name.as_str())
            .unwrap_or(self.id_field)
    }

    /// Collection case. `count` attaches the engine's total, not the page size.
    pub fn project(&self, response: &SearchResponse, count: bool) -> ProjectedCollection {
        ProjectedCollection {
            entities: response.hits.iter().map(|hit| self.project_hit(hit)).collect(),
            count: count.then_some(response.total),
        }
    }

    /// Builds one entity; the identifier property always comes first
    pub fn project_hit(&self, hit: &RawHit) -> ProjectedEntity {
        let id_property = self.id_property();
        let mut properties = Vec::with_capacity(hit.source.len() + 1);
        properties.push(ProjectedProperty::new(
            id_property,
            PropertyValue::Primitive(Value::String(hit.id.clone())),
        ));

        for (field, value) in &hit.source {
            let declared = self.entity_type.property_by_field(field);
            let name = declared.map_or(field.as_str(), |p| p.name.as_str());
            if name == id_property {
                continue;
            }
            properties.push(ProjectedProperty::new(name, materialize(declared, value)));
        }

        ProjectedEntity {
            id: hit.id.clone(),
            properties,
        }
    }

    /// Single-scalar case for a trailing primitive property.
    ///
    /// An empty field map yields the identifier, named after the identifier
    /// property; otherwise the first field map entry is the scalar. No hit
    /// yields None.
    pub fn project_scalar(&self, response: &SearchResponse, property: &str) -> Option<ProjectedProperty> {
        let hit = response.hits.first()?;
        let Some((field, value)) = hit.source.iter().next() else {
            return Some(ProjectedProperty::new(
                self.id_property(),
                PropertyValue::Primitive(Value::String(hit.id.clone())),
            ));
        };
        let declared = self
            .entity_type
            .property(property)
            .or_else(|| self.entity_type.property_by_field(field));
        Some(ProjectedProperty::new(property, materialize(declared, value)))
    }
}

/// Materializes one field value according to its declared property
pub fn materialize(declared: Option<&Property>, value: &Value) -> PropertyValue {
    match value {
        Value::Array(items) => {
            let complex = match declared {
                Some(p) => p.kind.is_complex(),
                None => !items.is_empty() && items.iter().all(Value::is_object),
            };
            if complex {
                PropertyValue::Collection {
                    kind: PropertyKind::CollectionComplex,
                    items: items.iter().map(complex_element).collect(),
                }
            } else {
                PropertyValue::Collection {
                    kind: PropertyKind::CollectionPrimitive,
                    items: items.iter().cloned().map(PropertyValue::Primitive).collect(),
                }
            }
        }
        Value::Object(map) => PropertyValue::Complex(sub_properties(map)),
        other => PropertyValue::Primitive(other.clone()),
    }
}

fn complex_element(value: &Value) -> PropertyValue {
    match value {
        Value::Object(map) => PropertyValue::Complex(sub_properties(map)),
        // Left for the serializer to reject
        other => PropertyValue::Primitive(other.clone()),
    }
}

fn sub_properties(map: &Map<String, Value>) -> Vec<ProjectedProperty> {
    map.iter()
        .map(|(k, v)| ProjectedProperty::new(k.clone(), PropertyValue::Primitive(v.clone())))
        .collect()
}
