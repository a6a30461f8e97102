//! Metadata levels and context URLs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Requested metadata verbosity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataLevel {
    /// No envelope metadata at all
    None,
    #[default]
    Minimal,
    /// Adds per-entity id, type and operations
    Full,
}

impl MetadataLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataLevel::None => "none",
            MetadataLevel::Minimal => "minimal",
            MetadataLevel::Full => "full",
        }
    }
}

/// `@odata.context` value: service root, `$metadata`, and a fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextUrl {
    service_root: String,
    fragment: String,
}

impl ContextUrl {
    /// Entity collection, optionally narrowed by a select list
    pub fn collection(
        service_root: &str,
        entity_set: &str,
        select: &[String],
        separator: &str,
    ) -> Self {
        let fragment = if select.is_empty() {
            entity_set.to_string()
        } else {
            format!("{}({})", entity_set, select.join(separator))
        };
        Self::new(service_root, fragment)
    }

    /// Single primitive property of one entity
    pub fn property(service_root: &str, entity_set: &str, key: Option<&str>, property: &str) -> Self {
        let fragment = match key {
            Some(key) => format!("{}('{}')/{}", entity_set, key.replace('\'', "''"), property),
            None => format!("{}/{}", entity_set, property),
        };
        Self::new(service_root, fragment)
    }

    fn new(service_root: &str, fragment: String) -> Self {
        Self {
            service_root: service_root.trim_end_matches('/').to_string(),
            fragment,
        }
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

impl fmt::Display for ContextUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/$metadata#{}", self.service_root, self.fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_context() {
        let ctx = ContextUrl::collection("http://host/odata/", "Books", &[], ",");
        assert_eq!(ctx.to_string(), "http://host/odata/$metadata#Books");

        let select = vec!["title".to_string(), "year".to_string()];
        let ctx = ContextUrl::collection("http://host/odata", "Books", &select, ",");
        assert_eq!(ctx.to_string(), "http://host/odata/$metadata#Books(title,year)");
    }

    #[test]
    fn test_property_context() {
        let ctx = ContextUrl::property("http://host", "Books", Some("O'Neil"), "year");
        assert_eq!(ctx.to_string(), "http://host/$metadata#Books('O''Neil')/year");
        let ctx = ContextUrl::property("http://host", "Books", None, "year");
        assert_eq!(ctx.fragment(), "Books/year");
    }

    #[test]
    fn test_metadata_level_serde() {
        let level: MetadataLevel = serde_json::from_str("\"full\"").unwrap();
        assert_eq!(level, MetadataLevel::Full);
        assert_eq!(MetadataLevel::default(), MetadataLevel::Minimal);
    }
}
