//! Search-engine query DSL
//!
//! The subset of the Elasticsearch query language the compiler emits. Nodes
//! are plain data; `to_json` renders the wire form.

use serde_json::{json, Map, Value};

/// Bounds of a range predicate; at least one is set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeBounds {
    pub gt: Option<Value>,
    pub gte: Option<Value>,
    pub lt: Option<Value>,
    pub lte: Option<Value>,
}

/// Boolean combinator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    pub must: Vec<SearchQuery>,
    pub filter: Vec<SearchQuery>,
    pub should: Vec<SearchQuery>,
    pub must_not: Vec<SearchQuery>,
    pub minimum_should_match: Option<u32>,
}

/// One search predicate node
#[derive(Debug, Clone, PartialEq)]
pub enum SearchQuery {
    MatchAll,
    /// Identifier restriction, optionally scoped to one document type
    Ids {
        doc_type: Option<String>,
        values: Vec<String>,
    },
    Term {
        field: String,
        value: Value,
    },
    Exists {
        field: String,
    },
    Range {
        field: String,
        bounds: RangeBounds,
    },
    Bool(BoolQuery),
    /// Matches children whose parent of `parent_type` matches `query`
    HasParent {
        parent_type: String,
        query: Box<SearchQuery>,
    },
    /// Matches parents having a child of `child_type` that matches `query`
    HasChild {
        child_type: String,
        query: Box<SearchQuery>,
    },
}

impl SearchQuery {
    pub fn ids(doc_type: Option<&str>, values: Vec<String>) -> Self {
        SearchQuery::Ids {
            doc_type: doc_type.map(str::to_string),
            values,
        }
    }

    pub fn term(field: impl Into<String>, value: Value) -> Self {
        SearchQuery::Term {
            field: field.into(),
            value,
        }
    }

    pub fn exists(field: impl Into<String>) -> Self {
        SearchQuery::Exists {
            field: field.into(),
        }
    }

    pub fn range(field: impl Into<String>, bounds: RangeBounds) -> Self {
        SearchQuery::Range {
            field: field.into(),
            bounds,
        }
    }

    /// Logical negation
    pub fn not(query: SearchQuery) -> Self {
        SearchQuery::Bool(BoolQuery {
            must_not: vec![query],
            ..Default::default()
        })
    }

    /// Scoring conjunction
    pub fn all_of(queries: Vec<SearchQuery>) -> Self {
        SearchQuery::Bool(BoolQuery {
            must: queries,
            ..Default::default()
        })
    }

    /// Disjunction requiring at least one match
    pub fn any_of(queries: Vec<SearchQuery>) -> Self {
        SearchQuery::Bool(BoolQuery {
            should: queries,
            minimum_should_match: Some(1),
            ..Default::default()
        })
    }

    /// Non-scoring conjunction
    pub fn filter_all(queries: Vec<SearchQuery>) -> Self {
        SearchQuery::Bool(BoolQuery {
            filter: queries,
            ..Default::default()
        })
    }

    pub fn has_parent(parent_type: impl Into<String>, query: SearchQuery) -> Self {
        SearchQuery::HasParent {
            parent_type: parent_type.into(),
            query: Box::new(query),
        }
    }

    pub fn has_child(child_type: impl Into<String>, query: SearchQuery) -> Self {
        SearchQuery::HasChild {
            child_type: child_type.into(),
            query: Box::new(query),
        }
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, SearchQuery::MatchAll)
    }

    /// Renders the query in Elasticsearch JSON form
    pub fn to_json(&self) -> Value {
        match self {
            SearchQuery::MatchAll => json!({ "match_all": {} }),
            SearchQuery::Ids { doc_type, values } => {
                let mut body = Map::new();
                if let Some(doc_type) = doc_type {
                    body.insert("type".into(), json!(doc_type));
                }
                body.insert("values".into(), json!(values));
                json!({ "ids": body })
            }
            SearchQuery::Term { field, value } => json!({ "term": { field.as_str(): value } }),
            SearchQuery::Exists { field } => json!({ "exists": { "field": field } }),
            SearchQuery::Range { field, bounds } => {
                let mut body = Map::new();
                for (key, bound) in [
                    ("gt", &bounds.gt),
                    ("gte", &bounds.gte),
                    ("lt", &bounds.lt),
                    ("lte", &bounds.lte),
                ] {
                    if let Some(value) = bound {
                        body.insert(key.into(), value.clone());
                    }
                }
                json!({ "range": { field.as_str(): body } })
            }
            SearchQuery::Bool(b) => {
                let mut body = Map::new();
                for (key, clauses) in [
                    ("must", &b.must),
                    ("filter", &b.filter),
                    ("should", &b.should),
                    ("must_not", &b.must_not),
                ] {
                    if !clauses.is_empty() {
                        body.insert(
                            key.into(),
                            Value::Array(clauses.iter().map(SearchQuery::to_json).collect()),
                        );
                    }
                }
                if let Some(min) = b.minimum_should_match {
                    body.insert("minimum_should_match".into(), json!(min));
                }
                json!({ "bool": body })
            }
            SearchQuery::HasParent { parent_type, query } => json!({
                "has_parent": { "parent_type": parent_type, "query": query.to_json() }
            }),
            SearchQuery::HasChild { child_type, query } => json!({
                "has_child": { "type": child_type, "query": query.to_json() }
            }),
        }
    }
}
