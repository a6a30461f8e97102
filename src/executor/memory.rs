//! In-memory search engine
//!
//! Implements [`SearchClient`] over a document list held in memory, with the
//! same request semantics the pipeline expects from a real engine: query
//! evaluation including parent/child joins, sort, from/size, `_source`
//! filtering, and a total count taken before paging.

use std::fs;
use std::path::Path;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::client::{SearchClient, SearchRequest};
use super::errors::{ExecutorError, ExecutorResult};
use super::filters::QueryMatcher;
use super::result::{RawHit, SearchResponse};
use super::sorter::HitSorter;

/// A stored document with its routing metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type")]
    pub doc_type: String,
    #[serde(rename = "_id")]
    pub id: String,
    /// Parent document id for join queries
    #[serde(rename = "_parent", default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
}

impl StoredDocument {
    pub fn new(
        index: impl Into<String>,
        doc_type: impl Into<String>,
        id: impl Into<String>,
        source: Map<String, Value>,
    ) -> Self {
        Self {
            index: index.into(),
            doc_type: doc_type.into(),
            id: id.into(),
            parent: None,
            source,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Looks up a dotted field path. A path ending in the keyword suffix
    /// falls back to the base field, since documents hold one value per field.
    pub fn field(&self, path: &str, keyword_suffix: &str) -> Option<&Value> {
        lookup(&self.source, path).or_else(|| {
            path.strip_suffix(keyword_suffix)
                .filter(|_| !keyword_suffix.is_empty())
                .and_then(|base| lookup(&self.source, base))
        })
    }
}

fn lookup<'v>(source: &'v Map<String, Value>, path: &str) -> Option<&'v Value> {
    if let Some(value) = source.get(path) {
        return Some(value);
    }
    let (head, rest) = path.split_once('.')?;
    match source.get(head)? {
        Value::Object(inner) => lookup(inner, rest),
        _ => None,
    }
}

/// Keeps only the requested fields, in source order. Dotted fields keep the
/// matching part of a nested object.
fn filter_source(source: &Map<String, Value>, fields: &[String]) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in source {
        if fields.iter().any(|f| f == key) {
            out.insert(key.clone(), value.clone());
            continue;
        }
        let prefix = format!("{}.", key);
        let nested: Vec<String> = fields
            .iter()
            .filter_map(|f| f.strip_prefix(&prefix).map(str::to_string))
            .collect();
        if let (false, Value::Object(inner)) = (nested.is_empty(), value) {
            out.insert(key.clone(), Value::Object(filter_source(inner, &nested)));
        }
    }
    out
}

/// Thread-safe in-memory engine
#[derive(Debug)]
pub struct MemorySearchClient {
    documents: RwLock<Vec<StoredDocument>>,
    keyword_suffix: String,
}

impl Default for MemorySearchClient {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl MemorySearchClient {
    pub fn new(documents: Vec<StoredDocument>) -> Self {
        Self {
            documents: RwLock::new(documents),
            keyword_suffix: ".keyword".to_string(),
        }
    }

    /// Suffix the planner appends for exact-match fields
    pub fn with_keyword_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.keyword_suffix = suffix.into();
        self
    }

    /// Loads documents from a JSON array file
    pub fn load_file(path: &Path) -> ExecutorResult<Self> {
        let source = path.display().to_string();
        let content = fs::read_to_string(path)
            .map_err(|e| ExecutorError::document_load(&source, e.to_string()))?;
        let documents: Vec<StoredDocument> = serde_json::from_str(&content)
            .map_err(|e| ExecutorError::document_load(&source, e.to_string()))?;
        Ok(Self::new(documents))
    }

    /// Adds a document, replacing any with the same index, type and id
    pub fn insert(&self, document: StoredDocument) -> ExecutorResult<()> {
        let mut docs = self
            .documents
            .write()
            .map_err(|_| ExecutorError::search_failed(&document.index, "document store poisoned"))?;
        docs.retain(|d| {
            !(d.index == document.index && d.doc_type == document.doc_type && d.id == document.id)
        });
        docs.push(document);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SearchClient for MemorySearchClient {
    fn search(&self, request: &SearchRequest) -> ExecutorResult<SearchResponse> {
        let docs = self
            .documents
            .read()
            .map_err(|_| ExecutorError::search_failed(&request.index, "document store poisoned"))?;

        if !docs.iter().any(|d| d.index == request.index) {
            return Err(ExecutorError::search_failed(
                &request.index,
                "no such index",
            ));
        }

        // 1. Filter
        let matcher = QueryMatcher::new(&docs, &self.keyword_suffix);
        let mut matched: Vec<&StoredDocument> = docs
            .iter()
            .filter(|d| d.index == request.index && d.doc_type == request.doc_type)
            .filter(|d| matcher.matches(d, &request.query))
            .collect();
        let total = matched.len() as u64;

        // 2. Sort
        HitSorter::new(&self.keyword_suffix).sort(&mut matched, &request.sort);

        // 3. Window and projection
        let hits = matched
            .into_iter()
            .skip(request.from as usize)
            .take(request.size as usize)
            .map(|d| {
                let source = if request.source.is_empty() {
                    d.source.clone()
                } else {
                    filter_source(&d.source, &request.source)
                };
                RawHit::new(d.id.clone(), source)
            })
            .collect();

        Ok(SearchResponse::new(hits, total))
    }
}
