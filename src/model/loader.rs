//! Entity model loader
//!
//! Reads a JSON model document from disk at startup:
//!
//! ```json
//! {
//!   "entity_types": [{ "name": "Book", "properties": [...], "navigations": [...] }],
//!   "entity_sets": [{ "name": "Books", "entity_type": "Book", "index": "library" }]
//! }
//! ```
//!
//! A missing or malformed model is fatal.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::accessor::EntityModel;
use super::errors::{ModelError, ModelResult};
use super::types::{EntitySet, EntityType};

/// On-disk model document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelDocument {
    #[serde(default)]
    pub entity_types: Vec<EntityType>,
    #[serde(default)]
    pub entity_sets: Vec<EntitySet>,
}

/// Loads entity models from JSON
pub struct ModelLoader;

impl ModelLoader {
    /// Loads and validates a model file.
    pub fn load_file(path: &Path) -> ModelResult<EntityModel> {
        let content = fs::read_to_string(path).map_err(|e| {
            ModelError::malformed_model(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;

        Self::load_str(&content).map_err(|e| {
            ModelError::malformed_model(path.display().to_string(), e.message().to_string())
        })
    }

    /// Parses and validates a model from a JSON string.
    pub fn load_str(content: &str) -> ModelResult<EntityModel> {
        let document: ModelDocument = serde_json::from_str(content)
            .map_err(|e| ModelError::malformed_model("<inline>", format!("Invalid JSON: {}", e)))?;
        Self::from_document(document)
    }

    /// Validates an already-parsed model document.
    pub fn from_document(document: ModelDocument) -> ModelResult<EntityModel> {
        EntityModel::new(document.entity_types, document.entity_sets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::accessor::SchemaAccessor;
    use crate::model::errors::ModelErrorCode;
    use crate::model::types::PropertyKind;
    use tempfile::TempDir;

    const MODEL: &str = r#"{
        "entity_types": [
            {
                "name": "Book",
                "namespace": "Library",
                "properties": [
                    { "name": "id", "field": "_id", "type": "Edm.String" },
                    { "name": "title", "type": "Edm.String", "keyword": true },
                    { "name": "reviews", "kind": "collection_complex" }
                ]
            }
        ],
        "entity_sets": [
            { "name": "Books", "entity_type": "Book", "index": "library", "doc_type": "book" }
        ]
    }"#;

    #[test]
    fn test_load_str() {
        let model = ModelLoader::load_str(MODEL).unwrap();
        let set = model.entity_set("Books").unwrap();
        assert_eq!(set.doc_type(), "book");
        let ty = model.entity_type_of(set).unwrap();
        assert_eq!(ty.property("reviews").unwrap().kind, PropertyKind::CollectionComplex);
        assert!(ty.property("title").unwrap().keyword);
    }

    #[test]
    fn test_load_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("model.json");
        fs::write(&path, MODEL).unwrap();

        let model = ModelLoader::load_file(&path).unwrap();
        assert_eq!(model.entity_sets().count(), 1);
    }

    #[test]
    fn test_missing_file_is_malformed() {
        let tmp = TempDir::new().unwrap();
        let err = ModelLoader::load_file(&tmp.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code(), ModelErrorCode::EdmMalformedModel);
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = ModelLoader::load_str("{ not json").unwrap_err();
        assert_eq!(err.code(), ModelErrorCode::EdmMalformedModel);
        assert!(err.message().contains("Invalid JSON"));
    }
}
