//! Resource path segments
//!
//! A path is delivered already parsed: an ordered list of segments where the
//! first names an entity set, zero or more navigations follow, and an
//! optional primitive property may close the path.

use serde::{Deserialize, Serialize};

/// Key predicate attached to a segment, e.g. `Books('42')`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPredicate {
    /// Key property name when given in `name=value` form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Literal text as written in the path, quotes included
    pub text: String,
}

impl KeyPredicate {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            name: None,
            text: text.into(),
        }
    }

    /// Key value with surrounding quotes removed and doubled quotes unescaped.
    pub fn value(&self) -> String {
        let text = self.text.trim();
        match text
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix('\''))
        {
            Some(inner) => inner.replace("''", "'"),
            None => text.to_string(),
        }
    }
}

/// One step of a resource path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceSegment {
    /// Entity set reference
    EntitySet {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        keys: Vec<KeyPredicate>,
    },
    /// Navigation property reference
    Navigation {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        keys: Vec<KeyPredicate>,
    },
    /// Terminal primitive property reference
    PrimitiveProperty { name: String },
    /// Any other segment kind the parser produced ($count, functions, singletons...)
    Other { segment: String },
}

impl ResourceSegment {
    pub fn entity_set(name: impl Into<String>) -> Self {
        ResourceSegment::EntitySet {
            name: name.into(),
            keys: Vec::new(),
        }
    }

    pub fn navigation(name: impl Into<String>) -> Self {
        ResourceSegment::Navigation {
            name: name.into(),
            keys: Vec::new(),
        }
    }

    pub fn property(name: impl Into<String>) -> Self {
        ResourceSegment::PrimitiveProperty { name: name.into() }
    }

    /// Adds a key predicate to an entity set or navigation segment
    pub fn with_key(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            ResourceSegment::EntitySet { keys, .. } | ResourceSegment::Navigation { keys, .. } => {
                keys.push(KeyPredicate::new(text));
            }
            _ => {}
        }
        self
    }

    /// Key predicates on this segment (empty for keyless kinds)
    pub fn keys(&self) -> &[KeyPredicate] {
        match self {
            ResourceSegment::EntitySet { keys, .. } | ResourceSegment::Navigation { keys, .. } => {
                keys
            }
            _ => &[],
        }
    }

    /// Segment text as it appears in the path
    pub fn name(&self) -> &str {
        match self {
            ResourceSegment::EntitySet { name, .. }
            | ResourceSegment::Navigation { name, .. }
            | ResourceSegment::PrimitiveProperty { name } => name,
            ResourceSegment::Other { segment } => segment,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ResourceSegment::EntitySet { .. } => "entity_set",
            ResourceSegment::Navigation { .. } => "navigation",
            ResourceSegment::PrimitiveProperty { .. } => "primitive_property",
            ResourceSegment::Other { .. } => "other",
        }
    }

    pub fn is_primitive_property(&self) -> bool {
        matches!(self, ResourceSegment::PrimitiveProperty { .. })
    }
}
