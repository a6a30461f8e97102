//! Response writer
//!
//! Schema-driven: each property is written against its declared descriptor,
//! or against a descriptor synthesized from the runtime value when the entity
//! type does not declare it.

use chrono::{DateTime, NaiveDate};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::context::{ContextUrl, MetadataLevel};
use super::errors::{SerializerError, SerializerResult};
use crate::model::{EntityType, PrimitiveType, Property, PropertyKind};
use crate::projection::{ProjectedCollection, ProjectedEntity, ProjectedProperty, PropertyValue};

/// Null indicator for scalar responses
pub const JSON_NULL: &str = "@odata.null";
pub const JSON_CONTEXT: &str = "@odata.context";
pub const JSON_METADATA_ETAG: &str = "@odata.metadataEtag";
pub const JSON_COUNT: &str = "@odata.count";
pub const JSON_ID: &str = "@odata.id";
pub const JSON_TYPE: &str = "@odata.type";
pub const VALUE: &str = "value";

/// Per-response writer options
#[derive(Debug, Clone, Default)]
pub struct SerializerOptions {
    pub metadata: MetadataLevel,
    pub context: Option<ContextUrl>,
    pub metadata_etag: Option<String>,
    /// `$select` paths; empty selects everything
    pub select: Vec<String>,
    /// Base for entity ids under full metadata
    pub service_root: String,
    pub entity_set: String,
}

/// Shape a property is written against
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub kind: PropertyKind,
    pub primitive: Option<PrimitiveType>,
    /// Written as raw JSON, without shape or type checks
    pub untyped: bool,
}

impl PropertyDescriptor {
    pub fn declared(property: &Property) -> Self {
        Self {
            name: property.name.clone(),
            kind: property.kind,
            primitive: property.primitive,
            untyped: false,
        }
    }

    /// Minimal descriptor for an undeclared property, from the value's shape.
    ///
    /// Collection elements widen to a common primitive type; elements with
    /// no common type leave the descriptor without one. Arrays mixing
    /// structured and scalar elements are passed through untyped.
    pub fn synthesize(name: &str, value: &PropertyValue) -> Self {
        let (primitive, untyped) = match value {
            PropertyValue::Primitive(v) => (PrimitiveType::infer(v), false),
            PropertyValue::Complex(_) => (None, false),
            PropertyValue::Collection { kind, items } => {
                (common_type(items), !uniform_shape(*kind, items))
            }
        };
        Self {
            name: name.to_string(),
            kind: value.kind(),
            primitive,
            untyped,
        }
    }
}

fn common_type(items: &[PropertyValue]) -> Option<PrimitiveType> {
    let mut common: Option<PrimitiveType> = None;
    for item in items {
        let ty = match item {
            PropertyValue::Primitive(Value::Null) => continue,
            PropertyValue::Primitive(v) => PrimitiveType::infer(v)?,
            _ => return None,
        };
        common = Some(match common {
            Some(current) => current.widen(ty)?,
            None => ty,
        });
    }
    common
}

/// Whether every element matches the collection's element kind
fn uniform_shape(kind: PropertyKind, items: &[PropertyValue]) -> bool {
    items.iter().all(|item| match item {
        PropertyValue::Primitive(Value::Null) => true,
        PropertyValue::Primitive(v) => {
            kind == PropertyKind::CollectionPrimitive && !v.is_array() && !v.is_object()
        }
        PropertyValue::Complex(_) => kind == PropertyKind::CollectionComplex,
        PropertyValue::Collection { .. } => false,
    })
}

/// Writes projected results for one entity type
pub struct ResponseSerializer<'a> {
    entity_type: &'a EntityType,
    options: &'a SerializerOptions,
}

impl<'a> ResponseSerializer<'a> {
    pub fn new(entity_type: &'a EntityType, options: &'a SerializerOptions) -> Self {
        Self {
            entity_type,
            options,
        }
    }

    /// Entity collection response
    pub fn entity_collection(&self, collection: &ProjectedCollection) -> SerializerResult<Value> {
        let mut out = Map::new();
        if self.options.metadata != MetadataLevel::None {
            if let Some(context) = &self.options.context {
                out.insert(JSON_CONTEXT.into(), json!(context.to_string()));
            }
        }
        self.write_etag(&mut out);
        if let Some(count) = collection.count {
            out.insert(JSON_COUNT.into(), json!(count));
        }

        let entities = collection
            .entities
            .iter()
            .map(|entity| self.entity(entity))
            .collect::<SerializerResult<Vec<_>>>()?;
        out.insert(VALUE.into(), Value::Array(entities));
        Ok(Value::Object(out))
    }

    /// Single primitive property response. A context URL is required unless
    /// metadata is suppressed.
    pub fn primitive(&self, property: &ProjectedProperty) -> SerializerResult<Value> {
        let mut out = Map::new();
        if self.options.metadata != MetadataLevel::None {
            let context = self
                .options
                .context
                .as_ref()
                .ok_or_else(SerializerError::missing_context)?;
            out.insert(JSON_CONTEXT.into(), json!(context.to_string()));
        }
        self.write_etag(&mut out);

        if property.value.is_null() {
            out.insert(JSON_NULL.into(), Value::Bool(true));
        } else {
            let descriptor = self.descriptor(property);
            out.insert(VALUE.into(), write_value(&descriptor, &property.value, &[])?);
        }
        Ok(Value::Object(out))
    }

    fn write_etag(&self, out: &mut Map<String, Value>) {
        if self.options.metadata == MetadataLevel::None {
            return;
        }
        if let Some(etag) = &self.options.metadata_etag {
            out.insert(JSON_METADATA_ETAG.into(), json!(etag));
        }
    }

    fn entity(&self, entity: &ProjectedEntity) -> SerializerResult<Value> {
        let full = self.options.metadata == MetadataLevel::Full;
        let entity_url = format!(
            "{}/{}('{}')",
            self.options.service_root.trim_end_matches('/'),
            self.options.entity_set,
            entity.id.replace('\'', "''")
        );

        let mut obj = Map::new();
        if full {
            obj.insert(JSON_ID.into(), json!(entity_url));
            obj.insert(
                JSON_TYPE.into(),
                json!(format!("#{}", self.entity_type.qualified_name())),
            );
        }

        for property in &entity.properties {
            let Some(sub_select) = self.selection(&property.name) else {
                continue;
            };
            let descriptor = self.descriptor(property);
            obj.insert(
                property.name.clone(),
                write_value(&descriptor, &property.value, &sub_select)?,
            );
        }

        if full {
            for operation in &self.entity_type.operations {
                let qualified = if self.entity_type.namespace.is_empty() {
                    operation.clone()
                } else {
                    format!("{}.{}", self.entity_type.namespace, operation)
                };
                obj.insert(
                    format!("#{}", qualified),
                    json!({
                        "title": operation,
                        "target": format!("{}/{}", entity_url, qualified),
                    }),
                );
            }
        }
        Ok(Value::Object(obj))
    }

    /// None when the property is not selected; otherwise the selected
    /// sub-property names (empty means all of them)
    fn selection(&self, name: &str) -> Option<Vec<&'a str>> {
        if self.options.select.is_empty() {
            return Some(Vec::new());
        }
        let mut whole = false;
        let mut subs = Vec::new();
        for path in &self.options.select {
            let mut parts = path.split('/');
            if parts.next() != Some(name) {
                continue;
            }
            match parts.next() {
                Some(sub) => subs.push(sub),
                None => whole = true,
            }
        }
        match (whole, subs.is_empty()) {
            (true, _) => Some(Vec::new()),
            (false, false) => Some(subs),
            (false, true) => None,
        }
    }

    fn descriptor(&self, property: &ProjectedProperty) -> PropertyDescriptor {
        match self.entity_type.property(&property.name) {
            Some(declared) => PropertyDescriptor::declared(declared),
            None => PropertyDescriptor::synthesize(&property.name, &property.value),
        }
    }
}

/// Writes one value against its descriptor
fn write_value(
    descriptor: &PropertyDescriptor,
    value: &PropertyValue,
    sub_select: &[&str],
) -> SerializerResult<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    if descriptor.untyped {
        return Ok(value.to_json());
    }

    match (descriptor.kind, value) {
        (PropertyKind::Primitive, PropertyValue::Primitive(v)) => write_primitive(descriptor, v),
        (PropertyKind::Complex, PropertyValue::Complex(subs)) => Ok(write_complex(subs, sub_select)),
        (PropertyKind::CollectionPrimitive, PropertyValue::Collection { items, .. }) => items
            .iter()
            .map(|item| match item {
                PropertyValue::Primitive(v) => write_primitive(descriptor, v),
                other => Err(SerializerError::inconsistent_property_type(
                    &descriptor.name,
                    "collection of primitives",
                    other.kind().as_str(),
                )),
            })
            .collect::<SerializerResult<Vec<_>>>()
            .map(Value::Array),
        (PropertyKind::CollectionComplex, PropertyValue::Collection { items, .. }) => items
            .iter()
            .map(|item| match item {
                PropertyValue::Complex(subs) => Ok(write_complex(subs, sub_select)),
                PropertyValue::Primitive(Value::Null) => Ok(Value::Null),
                other => Err(SerializerError::inconsistent_property_type(
                    &descriptor.name,
                    "collection of complex values",
                    other.kind().as_str(),
                )),
            })
            .collect::<SerializerResult<Vec<_>>>()
            .map(Value::Array),
        (kind, other) => Err(SerializerError::inconsistent_property_type(
            &descriptor.name,
            kind.as_str(),
            other.kind().as_str(),
        )),
    }
}

fn write_complex(subs: &[ProjectedProperty], sub_select: &[&str]) -> Value {
    Value::Object(
        subs.iter()
            .filter(|p| sub_select.is_empty() || sub_select.contains(&p.name.as_str()))
            .map(|p| (p.name.clone(), p.value.to_json()))
            .collect(),
    )
}

fn write_primitive(descriptor: &PropertyDescriptor, value: &Value) -> SerializerResult<Value> {
    if value.is_array() || value.is_object() {
        return Err(SerializerError::inconsistent_property_type(
            &descriptor.name,
            "primitive",
            "structured",
        ));
    }
    let Some(ty) = descriptor.primitive else {
        return Ok(value.clone());
    };
    if value.is_null() || fits(ty, value) {
        Ok(value.clone())
    } else {
        Err(SerializerError::wrong_property_value(
            &descriptor.name,
            format!("{} is not a valid {}", value, ty.full_name()),
        ))
    }
}

/// Whether a JSON scalar is a legal value of the primitive type
fn fits(ty: PrimitiveType, value: &Value) -> bool {
    match ty {
        PrimitiveType::String => value.is_string(),
        PrimitiveType::Boolean => value.is_boolean(),
        PrimitiveType::Int32 => value
            .as_i64()
            .map_or(false, |i| i32::try_from(i).is_ok()),
        PrimitiveType::Int64 => value.is_i64() || value.is_u64(),
        PrimitiveType::Double => value.is_number(),
        PrimitiveType::Date => value
            .as_str()
            .map_or(false, |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()),
        PrimitiveType::DateTimeOffset => value
            .as_str()
            .map_or(false, |s| DateTime::parse_from_rfc3339(s).is_ok()),
        PrimitiveType::Guid => value.as_str().map_or(false, |s| Uuid::parse_str(s).is_ok()),
    }
}
