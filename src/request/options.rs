//! Query options and the complete parsed request

use serde::{Deserialize, Serialize};

use super::expression::Expression;
use super::path::ResourceSegment;
use crate::serializer::MetadataLevel;

/// One `$select` item; a `/`-separated path into the entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SelectItem {
    pub path: Vec<String>,
}

impl SelectItem {
    /// Last path element; the property actually selected
    pub fn leaf(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or("")
    }
}

impl From<String> for SelectItem {
    fn from(value: String) -> Self {
        Self {
            path: value
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl From<&str> for SelectItem {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<SelectItem> for String {
    fn from(item: SelectItem) -> Self {
        item.path.join("/")
    }
}

/// One `$orderby` item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByItem {
    pub expression: Expression,
    #[serde(default)]
    pub descending: bool,
}

impl OrderByItem {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            expression: Expression::member(field),
            descending: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            expression: Expression::member(field),
            descending: true,
        }
    }
}

/// System query options; every option is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Expression>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub select: Vec<SelectItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderByItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(default)]
    pub count: bool,
    /// Expanded navigation paths; parsed but not materialized in responses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expand: Vec<String>,
}

/// A fully parsed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ODataRequest {
    pub path: Vec<ResourceSegment>,
    #[serde(default)]
    pub options: QueryOptions,
    /// Requested metadata verbosity; falls back to the configured level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataLevel>,
}

impl ODataRequest {
    pub fn new(path: Vec<ResourceSegment>) -> Self {
        Self {
            path,
            options: QueryOptions::default(),
            metadata: None,
        }
    }

    pub fn with_filter(mut self, filter: Expression) -> Self {
        self.options.filter = Some(filter);
        self
    }

    pub fn with_select<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SelectItem>,
    {
        self.options.select = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_order_by(mut self, item: OrderByItem) -> Self {
        self.options.order_by.push(item);
        self
    }

    pub fn with_top(mut self, top: u64) -> Self {
        self.options.top = Some(top);
        self
    }

    pub fn with_skip(mut self, skip: u64) -> Self {
        self.options.skip = Some(skip);
        self
    }

    pub fn with_count(mut self) -> Self {
        self.options.count = true;
        self
    }

    pub fn with_metadata(mut self, level: MetadataLevel) -> Self {
        self.metadata = Some(level);
        self
    }

    /// Name of the trailing primitive property, if the path selects a scalar
    pub fn trailing_property(&self) -> Option<&str> {
        match self.path.last() {
            Some(ResourceSegment::PrimitiveProperty { name }) => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_select_item_from_path() {
        let item = SelectItem::from("address/city");
        assert_eq!(item.path, vec!["address", "city"]);
        assert_eq!(item.leaf(), "city");
        assert_eq!(String::from(item), "address/city");
    }

    #[test]
    fn test_trailing_property() {
        let scalar = ODataRequest::new(vec![
            ResourceSegment::entity_set("Books").with_key("'1'"),
            ResourceSegment::property("year"),
        ]);
        assert_eq!(scalar.trailing_property(), Some("year"));

        let collection = ODataRequest::new(vec![ResourceSegment::entity_set("Books")]);
        assert_eq!(collection.trailing_property(), None);
    }

    #[test]
    fn test_deserialize_request_defaults() {
        let request: ODataRequest = serde_json::from_value(json!({
            "path": [{"kind": "entity_set", "name": "Books"}],
            "options": {"select": ["title", "tags"], "top": 5, "count": true},
            "metadata": "none"
        }))
        .unwrap();

        assert_eq!(request.options.select.len(), 2);
        assert_eq!(request.options.top, Some(5));
        assert_eq!(request.options.skip, None);
        assert!(request.options.count);
        assert!(request.options.filter.is_none());
        assert_eq!(request.metadata, Some(MetadataLevel::None));
    }
}
