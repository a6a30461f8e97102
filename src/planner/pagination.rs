//! Pagination and sort resolution
//!
//! Pure extraction; always succeeds.

use serde::Serialize;

use crate::model::{EntityType, SchemaAccessor};
use crate::request::{Expression, QueryOptions};

/// Page size used when the request has no `$top`
pub const DEFAULT_TOP: u64 = 25;

/// Offset used when the request has no `$skip`
pub const DEFAULT_SKIP: u64 = 0;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// One resolved sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Declared property name
    pub property: String,
    /// Document field the engine sorts on
    pub field: String,
    pub direction: SortDirection,
}

/// Resolved paging window and ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub top: u64,
    pub skip: u64,
    pub order_by: Vec<SortKey>,
}

/// Resolves `$top`, `$skip` and `$orderby`
#[derive(Debug, Clone)]
pub struct PaginationResolver {
    default_top: u64,
    max_top: Option<u64>,
    keyword_suffix: String,
}

impl Default for PaginationResolver {
    fn default() -> Self {
        Self::new(DEFAULT_TOP, None, ".keyword")
    }
}

impl PaginationResolver {
    pub fn new(default_top: u64, max_top: Option<u64>, keyword_suffix: impl Into<String>) -> Self {
        Self {
            default_top,
            max_top,
            keyword_suffix: keyword_suffix.into(),
        }
    }

    pub fn resolve<M: SchemaAccessor>(
        &self,
        model: &M,
        entity_type: &EntityType,
        options: &QueryOptions,
    ) -> Pagination {
        let mut top = options.top.unwrap_or(self.default_top);
        if let Some(max) = self.max_top {
            top = top.min(max);
        }

        let order_by = options
            .order_by
            .iter()
            .filter_map(|item| {
                let path = match &item.expression {
                    Expression::Member { path } if !path.is_empty() => path,
                    _ => return None,
                };
                let direction = if item.descending {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                };
                Some(SortKey {
                    property: path.join("/"),
                    field: self.sort_field(model, entity_type, path)?,
                    direction,
                })
            })
            .collect();

        Pagination {
            top,
            skip: options.skip.unwrap_or(DEFAULT_SKIP),
            order_by,
        }
    }

    fn sort_field<M: SchemaAccessor>(
        &self,
        model: &M,
        entity_type: &EntityType,
        path: &[String],
    ) -> Option<String> {
        // Only declared properties are sortable
        let head = &path[0];
        let base = entity_type.property(head)?.field().to_string();
        if path.len() > 1 {
            return Some(format!("{}.{}", base, path[1..].join(".")));
        }
        if model.needs_keyword(entity_type, head) {
            Some(format!("{}{}", base, self.keyword_suffix))
        } else {
            Some(base)
        }
    }
}
