//! Query evaluation for the in-memory engine
//!
//! Evaluates the search DSL against stored documents. Joins look up related
//! documents in the same index through the parent link.

use std::cmp::Ordering;

use serde_json::Value;

use super::memory::StoredDocument;
use super::sorter::compare_values;
use crate::planner::{BoolQuery, RangeBounds, SearchQuery};

/// Evaluates queries over one index's documents
pub struct QueryMatcher<'a> {
    documents: &'a [StoredDocument],
    keyword_suffix: &'a str,
}

impl<'a> QueryMatcher<'a> {
    pub fn new(documents: &'a [StoredDocument], keyword_suffix: &'a str) -> Self {
        Self {
            documents,
            keyword_suffix,
        }
    }

    /// Checks if a document matches the query
    pub fn matches(&self, doc: &StoredDocument, query: &SearchQuery) -> bool {
        match query {
            SearchQuery::MatchAll => true,
            SearchQuery::Ids { doc_type, values } => {
                doc_type.as_ref().map_or(true, |t| *t == doc.doc_type)
                    && values.iter().any(|v| *v == doc.id)
            }
            SearchQuery::Term { field, value } => doc
                .field(field, self.keyword_suffix)
                .map_or(false, |actual| any_element(actual, |v| values_equal(v, value))),
            SearchQuery::Exists { field } => doc
                .field(field, self.keyword_suffix)
                .map_or(false, |actual| match actual {
                    Value::Null => false,
                    Value::Array(items) => items.iter().any(|v| !v.is_null()),
                    _ => true,
                }),
            SearchQuery::Range { field, bounds } => doc
                .field(field, self.keyword_suffix)
                .map_or(false, |actual| any_element(actual, |v| in_range(v, bounds))),
            SearchQuery::Bool(b) => self.matches_bool(doc, b),
            SearchQuery::HasParent { parent_type, query } => match &doc.parent {
                Some(parent_id) => self.documents.iter().any(|p| {
                    p.index == doc.index
                        && p.doc_type == *parent_type
                        && p.id == *parent_id
                        && self.matches(p, query)
                }),
                None => false,
            },
            SearchQuery::HasChild { child_type, query } => self.documents.iter().any(|c| {
                c.index == doc.index
                    && c.doc_type == *child_type
                    && c.parent.as_deref() == Some(doc.id.as_str())
                    && self.matches(c, query)
            }),
        }
    }

    fn matches_bool(&self, doc: &StoredDocument, b: &BoolQuery) -> bool {
        if !b.must.iter().chain(&b.filter).all(|q| self.matches(doc, q)) {
            return false;
        }
        if b.must_not.iter().any(|q| self.matches(doc, q)) {
            return false;
        }
        if b.should.is_empty() {
            return true;
        }

        // Should clauses are optional next to must/filter unless a minimum is set
        let required = match b.minimum_should_match {
            Some(min) => min as usize,
            None if b.must.is_empty() && b.filter.is_empty() => 1,
            None => 0,
        };
        b.should.iter().filter(|q| self.matches(doc, q)).count() >= required
    }
}

/// Applies `pred` to a scalar, or to each element of an array
fn any_element(value: &Value, pred: impl Fn(&Value) -> bool) -> bool {
    match value {
        Value::Array(items) => items.iter().any(&pred),
        other => pred(other),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn in_range(value: &Value, bounds: &RangeBounds) -> bool {
    let cmp = |bound: &Value| {
        // Bounds only compare within the same JSON type
        if std::mem::discriminant(value) != std::mem::discriminant(bound) {
            return None;
        }
        Some(compare_values(Some(value), Some(bound)))
    };
    let check = |bound: &Option<Value>, ok: fn(Ordering) -> bool| {
        bound.as_ref().map_or(true, |b| cmp(b).map_or(false, ok))
    };

    check(&bounds.gt, |o| o == Ordering::Greater)
        && check(&bounds.gte, |o| o != Ordering::Less)
        && check(&bounds.lt, |o| o == Ordering::Less)
        && check(&bounds.lte, |o| o != Ordering::Greater)
}
