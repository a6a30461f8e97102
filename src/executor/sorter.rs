//! Hit ordering for the in-memory engine
//!
//! Sort keys apply in order; documents that tie on every key are ordered by
//! identifier so paging is deterministic.

use std::cmp::Ordering;

use serde_json::Value;

use super::memory::StoredDocument;
use crate::planner::{SortDirection, SortKey};

/// Sorts stored documents by resolved sort keys
pub struct HitSorter<'a> {
    keyword_suffix: &'a str,
}

impl<'a> HitSorter<'a> {
    pub fn new(keyword_suffix: &'a str) -> Self {
        Self { keyword_suffix }
    }

    pub fn sort(&self, documents: &mut [&StoredDocument], keys: &[SortKey]) {
        documents.sort_by(|a, b| {
            for key in keys {
                let a_val = a.field(&key.field, self.keyword_suffix);
                let b_val = b.field(&key.field, self.keyword_suffix);
                let ordering = compare_values(a_val, b_val);
                let ordering = match key.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            a.id.cmp(&b.id)
        });
    }
}

/// Compares two JSON values.
///
/// Missing sorts first, then null < bool < number < string; arrays and
/// objects compare equal to each other.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a_val), Some(b_val)) => {
            let type_order = |v: &Value| -> u8 {
                match v {
                    Value::Null => 0,
                    Value::Bool(_) => 1,
                    Value::Number(_) => 2,
                    Value::String(_) => 3,
                    Value::Array(_) => 4,
                    Value::Object(_) => 5,
                }
            };

            let a_type = type_order(a_val);
            let b_type = type_order(b_val);
            if a_type != b_type {
                return a_type.cmp(&b_type);
            }

            match (a_val, b_val) {
                (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
                (Value::Number(x), Value::Number(y)) => {
                    let x = x.as_f64().unwrap_or(0.0);
                    let y = y.as_f64().unwrap_or(0.0);
                    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                }
                (Value::String(x), Value::String(y)) => x.cmp(y),
                _ => Ordering::Equal,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, body: Value) -> StoredDocument {
        StoredDocument::new("library", "Book", id, body.as_object().cloned().unwrap_or_default())
    }

    fn key(field: &str, direction: SortDirection) -> SortKey {
        SortKey {
            property: field.into(),
            field: field.into(),
            direction,
        }
    }

    fn ids(docs: &[&StoredDocument]) -> Vec<String> {
        docs.iter().map(|d| d.id.clone()).collect()
    }

    #[test]
    fn test_sort_ascending_and_descending() {
        let (c, a, b) = (
            doc("c", json!({"year": 2001})),
            doc("a", json!({"year": 1999})),
            doc("b", json!({"year": 2000})),
        );
        let mut docs = vec![&c, &a, &b];
        let sorter = HitSorter::new(".keyword");

        sorter.sort(&mut docs, &[key("year", SortDirection::Asc)]);
        assert_eq!(ids(&docs), vec!["a", "b", "c"]);

        sorter.sort(&mut docs, &[key("year", SortDirection::Desc)]);
        assert_eq!(ids(&docs), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_ties_break_on_id() {
        let (b, a) = (doc("b", json!({"year": 1})), doc("a", json!({"year": 1})));
        let mut docs = vec![&b, &a];
        HitSorter::new(".keyword").sort(&mut docs, &[key("year", SortDirection::Asc)]);
        assert_eq!(ids(&docs), vec!["a", "b"]);
    }

    #[test]
    fn test_keyword_suffix_resolves_to_base_field() {
        let (x, y) = (doc("1", json!({"title": "zeta"})), doc("2", json!({"title": "alpha"})));
        let mut docs = vec![&x, &y];
        HitSorter::new(".keyword").sort(&mut docs, &[key("title.keyword", SortDirection::Asc)]);
        assert_eq!(ids(&docs), vec!["2", "1"]);
    }

    #[test]
    fn test_type_ordering() {
        assert_eq!(compare_values(None, Some(&json!(null))), Ordering::Less);
        assert_eq!(
            compare_values(Some(&json!(true)), Some(&json!(0))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&json!(10)), Some(&json!("1"))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&json!(2.5)), Some(&json!(2))),
            Ordering::Greater
        );
    }
}
