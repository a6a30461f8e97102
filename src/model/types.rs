//! Entity data model definitions
//!
//! An entity model is a set of entity types (ordered properties plus
//! navigation relationships) and entity sets binding each type to one
//! search index and document type. Everything here is immutable once the
//! model has been loaded.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Primitive property types understood by the serializer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    #[serde(rename = "Edm.String")]
    String,
    #[serde(rename = "Edm.Boolean")]
    Boolean,
    #[serde(rename = "Edm.Int32")]
    Int32,
    #[serde(rename = "Edm.Int64")]
    Int64,
    #[serde(rename = "Edm.Double")]
    Double,
    #[serde(rename = "Edm.Date")]
    Date,
    #[serde(rename = "Edm.DateTimeOffset")]
    DateTimeOffset,
    #[serde(rename = "Edm.Guid")]
    Guid,
}

impl PrimitiveType {
    /// Returns the qualified type name used on the wire
    pub fn full_name(&self) -> &'static str {
        match self {
            PrimitiveType::String => "Edm.String",
            PrimitiveType::Boolean => "Edm.Boolean",
            PrimitiveType::Int32 => "Edm.Int32",
            PrimitiveType::Int64 => "Edm.Int64",
            PrimitiveType::Double => "Edm.Double",
            PrimitiveType::Date => "Edm.Date",
            PrimitiveType::DateTimeOffset => "Edm.DateTimeOffset",
            PrimitiveType::Guid => "Edm.Guid",
        }
    }

    /// Infers a primitive type from the shape of a scalar value.
    ///
    /// Returns None for null, arrays and objects.
    pub fn infer(value: &Value) -> Option<PrimitiveType> {
        match value {
            Value::String(_) => Some(PrimitiveType::String),
            Value::Bool(_) => Some(PrimitiveType::Boolean),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    if i32::try_from(i).is_ok() {
                        Some(PrimitiveType::Int32)
                    } else {
                        Some(PrimitiveType::Int64)
                    }
                } else if n.is_u64() {
                    Some(PrimitiveType::Int64)
                } else {
                    Some(PrimitiveType::Double)
                }
            }
            _ => None,
        }
    }

    /// Narrowest type holding values of both types. Numeric types widen
    /// Int32 -> Int64 -> Double; any other mismatch has no common type.
    pub fn widen(self, other: PrimitiveType) -> Option<PrimitiveType> {
        use PrimitiveType::*;
        match (self, other) {
            (a, b) if a == b => Some(a),
            (Int32, Int64) | (Int64, Int32) => Some(Int64),
            (Int32 | Int64, Double) | (Double, Int32 | Int64) => Some(Double),
            _ => None,
        }
    }
}

/// Structural kind of a declared property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    #[default]
    Primitive,
    Complex,
    CollectionPrimitive,
    CollectionComplex,
}

impl PropertyKind {
    /// True for single or collection complex kinds
    pub fn is_complex(&self) -> bool {
        matches!(self, PropertyKind::Complex | PropertyKind::CollectionComplex)
    }

    /// True for either collection kind
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            PropertyKind::CollectionPrimitive | PropertyKind::CollectionComplex
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::Primitive => "primitive",
            PropertyKind::Complex => "complex",
            PropertyKind::CollectionPrimitive => "collection_primitive",
            PropertyKind::CollectionComplex => "collection_complex",
        }
    }
}

/// Structural property of an entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Protocol-facing property name
    pub name: String,
    /// Backing document field; defaults to the property name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Structural kind
    #[serde(default)]
    pub kind: PropertyKind,
    /// Primitive type (element type for primitive collections)
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub primitive: Option<PrimitiveType>,
    /// Whether exact-match filtering must target the keyword sub-field
    #[serde(default)]
    pub keyword: bool,
}

impl Property {
    /// Primitive property backed by a field of the same name
    pub fn primitive(name: impl Into<String>, primitive: PrimitiveType) -> Self {
        Self {
            name: name.into(),
            field: None,
            kind: PropertyKind::Primitive,
            primitive: Some(primitive),
            keyword: false,
        }
    }

    /// Analyzed text property that needs the keyword variant for exact matches
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            keyword: true,
            ..Self::primitive(name, PrimitiveType::String)
        }
    }

    /// Complex (nested object) property
    pub fn complex(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: None,
            kind: PropertyKind::Complex,
            primitive: None,
            keyword: false,
        }
    }

    /// Collection of primitives
    pub fn collection(name: impl Into<String>, element: PrimitiveType) -> Self {
        Self {
            kind: PropertyKind::CollectionPrimitive,
            ..Self::primitive(name, element)
        }
    }

    /// Collection of complex values
    pub fn complex_collection(name: impl Into<String>) -> Self {
        Self {
            kind: PropertyKind::CollectionComplex,
            ..Self::complex(name)
        }
    }

    /// Overrides the backing document field
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Returns the backing document field name
    pub fn field(&self) -> &str {
        self.field.as_deref().unwrap_or(&self.name)
    }
}

/// Cardinality of a navigation relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    One,
    Many,
}

/// Declared relationship to another entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationProperty {
    pub name: String,
    /// Target entity type name
    pub target: String,
    pub cardinality: Cardinality,
}

impl NavigationProperty {
    pub fn new(name: impl Into<String>, target: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            cardinality,
        }
    }

    /// True for to-many navigations
    pub fn is_collection(&self) -> bool {
        self.cardinality == Cardinality::Many
    }
}

/// Named shape: ordered properties plus navigations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityType {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub navigations: Vec<NavigationProperty>,
    /// Bound operations advertised on each entity under full metadata
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<String>,
}

impl EntityType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: String::new(),
            properties: Vec::new(),
            navigations: Vec::new(),
            operations: Vec::new(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_navigation(mut self, navigation: NavigationProperty) -> Self {
        self.navigations.push(navigation);
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operations.push(operation.into());
        self
    }

    /// Namespace-qualified name, or the bare name without a namespace
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Looks up a property by its protocol-facing name
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Looks up a property by its backing document field
    pub fn property_by_field(&self, field: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.field() == field)
    }

    /// Looks up a navigation property by name
    pub fn navigation(&self, name: &str) -> Option<&NavigationProperty> {
        self.navigations.iter().find(|n| n.name == name)
    }
}

/// Queryable collection bound to one entity type and one index/document type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySet {
    pub name: String,
    pub entity_type: String,
    pub index: String,
    /// Backing document type; defaults to the entity type name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    /// Navigation name to target entity set name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub bindings: BTreeMap<String, String>,
}

impl EntitySet {
    pub fn new(
        name: impl Into<String>,
        entity_type: impl Into<String>,
        index: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            entity_type: entity_type.into(),
            index: index.into(),
            doc_type: None,
            bindings: BTreeMap::new(),
        }
    }

    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    pub fn with_binding(mut self, navigation: impl Into<String>, target: impl Into<String>) -> Self {
        self.bindings.insert(navigation.into(), target.into());
        self
    }

    /// Returns the backing document type
    pub fn doc_type(&self) -> &str {
        self.doc_type.as_deref().unwrap_or(&self.entity_type)
    }
}
