//! Query planner
//!
//! Runs the pure compilation phases for one request and freezes their output
//! into an immutable [`QueryPlan`]:
//!
//! 1. Query assembly over the resource path
//! 2. Filter compilation against the terminal entity type
//! 3. Pagination and sort resolution
//! 4. Field projection from `$select` (or the trailing scalar property)
//!
//! Same inputs always produce the same plan.

use serde::{Deserialize, Serialize};

use super::assembler::{ComposedQuery, QueryAssembler};
use super::errors::{PlannerError, PlannerResult};
use super::pagination::{Pagination, PaginationResolver, DEFAULT_TOP};
use super::predicate::PredicateCompiler;
use super::query::SearchQuery;
use crate::model::{EntitySet, EntityType, SchemaAccessor};
use crate::request::ODataRequest;

/// What happens when a filter cannot be compiled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterPolicy {
    /// Drop the filter and run the request unfiltered
    #[default]
    Lenient,
    /// Reject the request
    Strict,
}

/// Constants the planner needs; passed in explicitly per planner
#[derive(Debug, Clone)]
pub struct PlannerSettings {
    pub id_field: String,
    pub keyword_suffix: String,
    pub default_top: u64,
    pub max_top: Option<u64>,
    pub filter_policy: FilterPolicy,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            id_field: "_id".to_string(),
            keyword_suffix: ".keyword".to_string(),
            default_top: DEFAULT_TOP,
            max_top: None,
            filter_policy: FilterPolicy::Lenient,
        }
    }
}

/// Immutable plan for one request
#[derive(Debug, Clone)]
pub struct QueryPlan<'a> {
    pub query: ComposedQuery,
    /// Compiled filter, if one was supplied and compiled
    pub filter: Option<SearchQuery>,
    /// Filter failure swallowed under the lenient policy
    pub ignored_filter: Option<PlannerError>,
    pub pagination: Pagination,
    /// Document fields to fetch; empty fetches everything
    pub fields: Vec<String>,
    /// Select list as requested, for the context URL
    pub select: Vec<String>,
    pub entity_set: &'a EntitySet,
    pub entity_type: &'a EntityType,
    pub scalar: Option<&'a str>,
}

impl QueryPlan<'_> {
    /// Composed query AND filter (match-all when absent)
    pub fn effective_query(&self) -> SearchQuery {
        SearchQuery::filter_all(vec![
            self.query.query(),
            self.filter.clone().unwrap_or(SearchQuery::MatchAll),
        ])
    }
}

/// Query planner over a schema accessor
pub struct QueryPlanner<'a, M: SchemaAccessor> {
    model: &'a M,
    settings: &'a PlannerSettings,
}

impl<'a, M: SchemaAccessor> QueryPlanner<'a, M> {
    pub fn new(model: &'a M, settings: &'a PlannerSettings) -> Self {
        Self { model, settings }
    }

    /// Plans a request, returning an immutable plan or error.
    pub fn plan(&self, request: &'a ODataRequest) -> PlannerResult<QueryPlan<'a>> {
        // 1. Path
        let assembled = QueryAssembler::new(self.model).assemble(&request.path)?;
        let entity_type = assembled.entity_type;

        // 2. Filter
        let (filter, ignored_filter) = match &request.options.filter {
            None => (None, None),
            Some(expr) => {
                let compiler = PredicateCompiler::new(
                    self.model,
                    entity_type,
                    &self.settings.id_field,
                    &self.settings.keyword_suffix,
                );
                match compiler.compile(expr) {
                    Ok(query) => (Some(query), None),
                    Err(err)
                        if err.is_recoverable()
                            && self.settings.filter_policy == FilterPolicy::Lenient =>
                    {
                        (None, Some(err))
                    }
                    Err(err) => return Err(err),
                }
            }
        };

        // 3. Paging
        let pagination = PaginationResolver::new(
            self.settings.default_top,
            self.settings.max_top,
            self.settings.keyword_suffix.clone(),
        )
        .resolve(self.model, entity_type, &request.options);

        // 4. Fields
        let select: Vec<String> = request
            .options
            .select
            .iter()
            .map(|item| item.path.join("/"))
            .collect();
        let fields = if !request.options.select.is_empty() {
            request
                .options
                .select
                .iter()
                .filter(|item| !item.path.is_empty())
                .map(|item| {
                    let head = &item.path[0];
                    let base = entity_type
                        .property(head)
                        .map(|p| p.field().to_string())
                        .unwrap_or_else(|| head.clone());
                    std::iter::once(base)
                        .chain(item.path[1..].iter().cloned())
                        .collect::<Vec<_>>()
                        .join(".")
                })
                .collect()
        } else if let Some(name) = assembled.scalar {
            entity_type
                .property(name)
                .map(|p| vec![p.field().to_string()])
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        Ok(QueryPlan {
            query: assembled.query,
            filter,
            ignored_filter,
            pagination,
            fields,
            select,
            entity_set: assembled.entity_set,
            entity_type,
            scalar: assembled.scalar,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityModel, PrimitiveType, Property};
    use crate::planner::errors::PlannerErrorCode;
    use crate::request::{Expression, ResourceSegment};
    use serde_json::json;

    fn model() -> EntityModel {
        let book = EntityType::new("Book")
            .with_property(Property::primitive("id", PrimitiveType::String).with_field("_id"))
            .with_property(Property::text("title"))
            .with_property(Property::primitive("year", PrimitiveType::Int32).with_field("published"))
            .with_property(Property::complex("dimensions"));
        EntityModel::new(vec![book], vec![EntitySet::new("Books", "Book", "library")]).unwrap()
    }

    fn books() -> ODataRequest {
        ODataRequest::new(vec![ResourceSegment::entity_set("Books")])
    }

    #[test]
    fn test_plan_without_filter_uses_match_all() {
        let m = model();
        let settings = PlannerSettings::default();
        let request = books();
        let plan = QueryPlanner::new(&m, &settings).plan(&request).unwrap();

        assert!(plan.filter.is_none());
        assert!(plan.ignored_filter.is_none());
        assert_eq!(
            plan.effective_query().to_json(),
            json!({"bool": {"filter": [{"match_all": {}}, {"match_all": {}}]}})
        );
        assert_eq!(plan.pagination.top, DEFAULT_TOP);
        assert!(plan.fields.is_empty());
    }

    #[test]
    fn test_lenient_policy_drops_unsupported_filter() {
        let m = model();
        let settings = PlannerSettings::default();
        let request = books().with_filter(Expression::Method {
            name: "contains".into(),
            args: vec![],
        });
        let plan = QueryPlanner::new(&m, &settings).plan(&request).unwrap();

        assert!(plan.filter.is_none());
        assert_eq!(
            plan.ignored_filter.map(|e| e.code()),
            Some(PlannerErrorCode::EdmUnsupportedExpression)
        );
    }

    #[test]
    fn test_strict_policy_rejects_unsupported_filter() {
        let m = model();
        let settings = PlannerSettings {
            filter_policy: FilterPolicy::Strict,
            ..Default::default()
        };
        let request = books().with_filter(Expression::eq("nickname", json!("x")));
        let err = QueryPlanner::new(&m, &settings).plan(&request).unwrap_err();
        assert_eq!(err.code(), PlannerErrorCode::EdmUnsupportedExpression);
    }

    #[test]
    fn test_invalid_value_is_never_swallowed() {
        let m = model();
        let settings = PlannerSettings::default();
        let request = books().with_filter(Expression::eq("id", json!(null)));
        let err = QueryPlanner::new(&m, &settings).plan(&request).unwrap_err();
        assert_eq!(err.code(), PlannerErrorCode::EdmInvalidValue);
    }

    #[test]
    fn test_select_maps_to_backing_fields() {
        let m = model();
        let settings = PlannerSettings::default();
        let request = books().with_select(["title", "year", "dimensions/height", "extra"]);
        let plan = QueryPlanner::new(&m, &settings).plan(&request).unwrap();

        assert_eq!(
            plan.fields,
            vec!["title", "published", "dimensions.height", "extra"]
        );
        assert_eq!(plan.select, vec!["title", "year", "dimensions/height", "extra"]);
    }

    #[test]
    fn test_scalar_path_fetches_its_field() {
        let m = model();
        let settings = PlannerSettings::default();
        let request = ODataRequest::new(vec![
            ResourceSegment::entity_set("Books").with_key("'1'"),
            ResourceSegment::property("year"),
        ]);
        let plan = QueryPlanner::new(&m, &settings).plan(&request).unwrap();

        assert_eq!(plan.scalar, Some("year"));
        assert_eq!(plan.fields, vec!["published"]);
    }
}
