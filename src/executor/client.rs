//! Search client seam
//!
//! The engine itself is an external collaborator; the pipeline only needs one
//! blocking call. Implementations must be safe to share between concurrent
//! requests.

use serde_json::{json, Map, Value};

use super::errors::ExecutorResult;
use super::result::SearchResponse;
use crate::planner::{SearchQuery, SortKey};

/// One search call: query, window, sort and field projection against an
/// index/document-type pair
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub index: String,
    pub doc_type: String,
    pub query: SearchQuery,
    pub from: u64,
    pub size: u64,
    pub sort: Vec<SortKey>,
    /// Fields to return; empty returns the whole document
    pub source: Vec<String>,
}

impl SearchRequest {
    /// Endpoint path the body is sent to
    pub fn endpoint(&self) -> String {
        format!("/{}/{}/_search", self.index, self.doc_type)
    }

    /// Renders the Elasticsearch search body
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("query".into(), self.query.to_json());
        body.insert("from".into(), json!(self.from));
        body.insert("size".into(), json!(self.size));
        if !self.sort.is_empty() {
            let sort = self
                .sort
                .iter()
                .map(|key| json!({ key.field.as_str(): { "order": key.direction.as_str() } }))
                .collect();
            body.insert("sort".into(), Value::Array(sort));
        }
        if !self.source.is_empty() {
            body.insert("_source".into(), json!(self.source));
        }
        Value::Object(body)
    }
}

/// Blocking search engine client
pub trait SearchClient: Send + Sync {
    /// Executes one search; failures are returned as-is, never retried
    fn search(&self, request: &SearchRequest) -> ExecutorResult<SearchResponse>;
}
