//! Typed projection output

use serde_json::Value;

use crate::model::PropertyKind;

/// Materialized property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Primitive(Value),
    /// One level of named scalar sub-properties
    Complex(Vec<ProjectedProperty>),
    /// `kind` is either collection variant of [`PropertyKind`]
    Collection {
        kind: PropertyKind,
        items: Vec<PropertyValue>,
    },
}

impl PropertyValue {
    /// Structural kind of this value
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Primitive(_) => PropertyKind::Primitive,
            PropertyValue::Complex(_) => PropertyKind::Complex,
            PropertyValue::Collection { kind, .. } => *kind,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Primitive(Value::Null))
    }

    /// Plain JSON form, without any type checking
    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::Primitive(v) => v.clone(),
            PropertyValue::Complex(props) => Value::Object(
                props
                    .iter()
                    .map(|p| (p.name.clone(), p.value.to_json()))
                    .collect(),
            ),
            PropertyValue::Collection { items, .. } => {
                Value::Array(items.iter().map(PropertyValue::to_json).collect())
            }
        }
    }
}

/// Named property of a projected entity
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedProperty {
    pub name: String,
    pub value: PropertyValue,
}

impl ProjectedProperty {
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// One typed entity built from one hit
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedEntity {
    pub id: String,
    pub properties: Vec<ProjectedProperty>,
}

impl ProjectedEntity {
    pub fn property(&self, name: &str) -> Option<&ProjectedProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Projected result rows plus the optional total count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedCollection {
    pub entities: Vec<ProjectedEntity>,
    /// Total matches, present only when requested
    pub count: Option<u64>,
}
