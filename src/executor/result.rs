//! Raw search results
//!
//! Hits are schema-less field maps; field order is kept as the engine
//! returned it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{ExecutorError, ExecutorResult};

/// One matching document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    /// Engine-generated identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Returned fields, possibly restricted by `_source`
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
}

impl RawHit {
    pub fn new(id: impl Into<String>, source: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            source,
        }
    }
}

/// Hit sequence plus total-match count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    pub hits: Vec<RawHit>,
    /// Matches before `from`/`size` were applied
    pub total: u64,
}

impl SearchResponse {
    pub fn new(hits: Vec<RawHit>, total: u64) -> Self {
        Self { hits, total }
    }

    /// Parses an Elasticsearch search response body.
    ///
    /// `hits.total` is accepted both as a bare number and as `{"value": n}`.
    pub fn from_body(body: &Value) -> ExecutorResult<Self> {
        let hits = body
            .get("hits")
            .ok_or_else(|| ExecutorError::malformed_response("response has no 'hits'"))?;

        let total = match hits.get("total") {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::Object(obj)) => obj.get("value").and_then(Value::as_u64),
            _ => None,
        }
        .ok_or_else(|| ExecutorError::malformed_response("'hits.total' is missing or invalid"))?;

        let raw = hits
            .get("hits")
            .and_then(Value::as_array)
            .ok_or_else(|| ExecutorError::malformed_response("'hits.hits' is not an array"))?;

        let hits = raw
            .iter()
            .map(|hit| {
                serde_json::from_value::<RawHit>(hit.clone())
                    .map_err(|e| ExecutorError::malformed_response(format!("bad hit: {}", e)))
            })
            .collect::<ExecutorResult<Vec<_>>>()?;

        Ok(Self { hits, total })
    }
}
