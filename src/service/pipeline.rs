//! Compile-and-execute pipeline
//!
//! One request flows through:
//!
//! 1. Plan (assembly, filter, paging, fields); rejections happen here
//! 2. Exactly one search call
//! 3. Projection of raw hits
//! 4. Serialization with the metadata envelope
//!
//! The service holds no per-request state, so one instance can serve
//! concurrent requests.

use serde_json::{json, Value};

use super::errors::{ServiceError, ServiceResult};
use crate::config::ServiceConfig;
use crate::executor::{SearchClient, SearchExecutor, SearchRequest, SearchResponse};
use crate::model::SchemaAccessor;
use crate::observability::{log_event, Event, MetricsRegistry, ObservationScope};
use crate::planner::{PlannerSettings, QueryPlan, QueryPlanner};
use crate::projection::ResultProjector;
use crate::request::{ODataRequest, ResourceSegment};
use crate::serializer::{ContextUrl, MetadataLevel, ResponseSerializer, SerializerOptions};

/// Runs requests against one model and one search client
pub struct QueryService<'a, M: SchemaAccessor, C: SearchClient + ?Sized> {
    model: &'a M,
    client: &'a C,
    config: &'a ServiceConfig,
    settings: PlannerSettings,
    metrics: &'a MetricsRegistry,
}

impl<'a, M: SchemaAccessor, C: SearchClient + ?Sized> QueryService<'a, M, C> {
    pub fn new(
        model: &'a M,
        client: &'a C,
        config: &'a ServiceConfig,
        metrics: &'a MetricsRegistry,
    ) -> Self {
        Self {
            model,
            client,
            config,
            settings: config.planner_settings(),
            metrics,
        }
    }

    /// Compiles the request, runs the search, and returns the response body
    pub fn compile_and_execute(&self, request: &ODataRequest) -> ServiceResult<Value> {
        let segments = request.path.len().to_string();
        log_event(
            Event::RequestReceived,
            &[
                ("entity_set", request.path.first().map_or("", ResourceSegment::name)),
                ("segments", &segments),
            ],
        );

        match self.run(request) {
            Ok(body) => {
                self.metrics.increment_requests_served();
                Ok(body)
            }
            Err(err) => {
                self.metrics.increment_requests_rejected();
                let status = err.status_code().to_string();
                log_event(
                    Event::RequestRejected,
                    &[
                        ("code", err.code()),
                        ("message", &err.message()),
                        ("status", &status),
                    ],
                );
                Err(err)
            }
        }
    }

    /// Compiles the request and returns the search call it would issue
    pub fn explain(&self, request: &ODataRequest) -> ServiceResult<Value> {
        let plan = self.plan(request)?;
        let search = SearchRequest::from_plan(&plan);
        let mut out = json!({
            "endpoint": search.endpoint(),
            "body": search.to_body(),
        });
        if let Some(err) = &plan.ignored_filter {
            out["ignored_filter"] = json!({ "code": err.code().code(), "message": err.message() });
        }
        Ok(out)
    }

    fn run(&self, request: &ODataRequest) -> ServiceResult<Value> {
        // 1. Plan
        let plan = self.plan(request)?;

        // 2. Search
        let response = self.search(&plan)?;

        // 3-4. Project and serialize
        let metadata = request.metadata.unwrap_or(self.config.metadata);
        let projector = ResultProjector::new(plan.entity_type, &self.config.id_field);
        let body = match plan.scalar {
            Some(property) => {
                let projected = projector
                    .project_scalar(&response, property)
                    .ok_or_else(|| ServiceError::NotFound(property.to_string()))?;
                let context = ContextUrl::property(
                    &self.config.service_root,
                    &plan.entity_set.name,
                    terminal_key(request).as_deref(),
                    property,
                );
                let options = self.serializer_options(&plan, metadata, context);
                ResponseSerializer::new(plan.entity_type, &options).primitive(&projected)?
            }
            None => {
                let collection = projector.project(&response, request.options.count);
                let context = ContextUrl::collection(
                    &self.config.service_root,
                    &plan.entity_set.name,
                    &plan.select,
                    &self.config.select_separator,
                );
                let options = self.serializer_options(&plan, metadata, context);
                ResponseSerializer::new(plan.entity_type, &options).entity_collection(&collection)?
            }
        };

        let hits = response.hits.len().to_string();
        log_event(
            Event::ResponseSerialized,
            &[
                ("entity_set", &plan.entity_set.name),
                ("hits", &hits),
                ("metadata", metadata.as_str()),
            ],
        );
        Ok(body)
    }

    fn plan<'r>(&'r self, request: &'r ODataRequest) -> ServiceResult<QueryPlan<'r>> {
        let plan = QueryPlanner::new(self.model, &self.settings).plan(request)?;

        let clauses = plan.query.clauses().len().to_string();
        log_event(
            Event::QueryAssembled,
            &[
                ("clauses", &clauses),
                ("doc_type", plan.query.doc_type()),
                ("index", plan.query.index()),
            ],
        );
        match (&plan.filter, &plan.ignored_filter) {
            (Some(_), _) => log_event(Event::FilterCompiled, &[("entity_type", &plan.entity_type.name)]),
            (None, Some(err)) => {
                self.metrics.increment_filters_ignored();
                log_event(
                    Event::FilterIgnored,
                    &[("code", err.code().code()), ("message", err.message())],
                );
            }
            (None, None) => {}
        }
        Ok(plan)
    }

    fn search(&self, plan: &QueryPlan<'_>) -> ServiceResult<SearchResponse> {
        let index = plan.query.index();
        let scope = ObservationScope::with_fields("SEARCH", &[("index", index)]);

        match SearchExecutor::new(self.client).execute(plan) {
            Ok(response) => {
                let hits = response.hits.len().to_string();
                let total = response.total.to_string();
                scope.complete_with_fields(&[("hits", &hits)]);
                self.metrics.add_hits(response.hits.len() as u64);
                log_event(
                    Event::SearchExecuted,
                    &[("hits", &hits), ("index", index), ("total", &total)],
                );
                Ok(response)
            }
            Err(err) => {
                scope.fail(err.message());
                self.metrics.increment_search_failures();
                log_event(
                    Event::SearchFailed,
                    &[("code", err.code().code()), ("index", index), ("message", err.message())],
                );
                Err(err.into())
            }
        }
    }

    fn serializer_options(
        &self,
        plan: &QueryPlan<'_>,
        metadata: MetadataLevel,
        context: ContextUrl,
    ) -> SerializerOptions {
        SerializerOptions {
            metadata,
            context: Some(context),
            metadata_etag: self.config.metadata_etag.clone(),
            select: plan.select.clone(),
            service_root: self.config.service_root.clone(),
            entity_set: plan.entity_set.name.clone(),
        }
    }
}

/// Key value of the segment the trailing property hangs off, if keyed
fn terminal_key(request: &ODataRequest) -> Option<String> {
    request
        .path
        .iter()
        .rev()
        .find(|segment| !segment.is_primitive_property())
        .and_then(|segment| segment.keys().first())
        .map(|key| key.value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{ExecutorError, ExecutorResult, MemorySearchClient, StoredDocument};
    use crate::model::{
        Cardinality, EntityModel, EntitySet, EntityType, NavigationProperty, PrimitiveType,
        Property,
    };
    use crate::request::Expression;

    fn model() -> EntityModel {
        let book = EntityType::new("Book")
            .with_namespace("Library")
            .with_property(Property::primitive("id", PrimitiveType::String).with_field("_id"))
            .with_property(Property::text("title"))
            .with_property(Property::primitive("year", PrimitiveType::Int32))
            .with_navigation(NavigationProperty::new("author", "Author", Cardinality::One));
        let author = EntityType::new("Author")
            .with_namespace("Library")
            .with_property(Property::primitive("id", PrimitiveType::String).with_field("_id"))
            .with_property(Property::text("name"))
            .with_navigation(NavigationProperty::new("books", "Book", Cardinality::Many));
        EntityModel::new(
            vec![book, author],
            vec![
                EntitySet::new("Books", "Book", "library"),
                EntitySet::new("Authors", "Author", "library"),
            ],
        )
        .unwrap()
    }

    fn doc(doc_type: &str, id: &str, source: Value) -> StoredDocument {
        StoredDocument::new("library", doc_type, id, source.as_object().cloned().unwrap_or_default())
    }

    fn client() -> MemorySearchClient {
        MemorySearchClient::new(vec![
            doc("Author", "a1", json!({"name": "Ann"})),
            doc("Author", "a2", json!({"name": "Bob"})),
            doc("Book", "b1", json!({"title": "First", "year": 2020})).with_parent("a1"),
            doc("Book", "b2", json!({"title": "Second", "year": 2021})).with_parent("a1"),
            doc("Book", "b3", json!({"title": "Third"})).with_parent("a2"),
        ])
    }

    struct FailingClient;

    impl SearchClient for FailingClient {
        fn search(&self, request: &SearchRequest) -> ExecutorResult<SearchResponse> {
            Err(ExecutorError::search_failed(&request.index, "connection refused"))
        }
    }

    #[test]
    fn test_collection_request() {
        let (m, c, config, metrics) = (model(), client(), ServiceConfig::default(), MetricsRegistry::new());
        let service = QueryService::new(&m, &c, &config, &metrics);
        let request = ODataRequest::new(vec![ResourceSegment::entity_set("Books")])
            .with_filter(Expression::eq("title", json!("Second")))
            .with_count();

        let body = service.compile_and_execute(&request).unwrap();
        assert_eq!(body["@odata.context"], "http://localhost/odata/$metadata#Books");
        assert_eq!(body["@odata.count"], 1);
        assert_eq!(body["value"][0]["id"], "b2");
        assert_eq!(body["value"][0]["title"], "Second");
        assert_eq!(metrics.snapshot().requests_served, 1);
    }

    #[test]
    fn test_child_join_over_to_one_navigation() {
        let (m, c, config, metrics) = (model(), client(), ServiceConfig::default(), MetricsRegistry::new());
        let service = QueryService::new(&m, &c, &config, &metrics);
        let request = ODataRequest::new(vec![
            ResourceSegment::entity_set("Books").with_key("'b3'"),
            ResourceSegment::navigation("author"),
        ]);

        let body = service.compile_and_execute(&request).unwrap();
        let values = body["value"].as_array().unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0]["name"], "Bob");
    }

    #[test]
    fn test_parent_join_over_to_many_navigation() {
        let (m, c, config, metrics) = (model(), client(), ServiceConfig::default(), MetricsRegistry::new());
        let service = QueryService::new(&m, &c, &config, &metrics);
        let request = ODataRequest::new(vec![
            ResourceSegment::entity_set("Authors").with_key("'a1'"),
            ResourceSegment::navigation("books"),
        ]);

        let body = service.compile_and_execute(&request).unwrap();
        let ids: Vec<&str> = body["value"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v["id"].as_str())
            .collect();
        assert_eq!(ids, vec!["b1", "b2"]);
    }

    #[test]
    fn test_scalar_request() {
        let (m, c, config, metrics) = (model(), client(), ServiceConfig::default(), MetricsRegistry::new());
        let service = QueryService::new(&m, &c, &config, &metrics);
        let request = ODataRequest::new(vec![
            ResourceSegment::entity_set("Books").with_key("'b1'"),
            ResourceSegment::property("year"),
        ]);

        let body = service.compile_and_execute(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "@odata.context": "http://localhost/odata/$metadata#Books('b1')/year",
                "value": 2020
            })
        );
    }

    #[test]
    fn test_scalar_without_hit_is_not_found() {
        let (m, c, config, metrics) = (model(), client(), ServiceConfig::default(), MetricsRegistry::new());
        let service = QueryService::new(&m, &c, &config, &metrics);
        let request = ODataRequest::new(vec![
            ResourceSegment::entity_set("Books").with_key("'missing'"),
            ResourceSegment::property("year"),
        ]);

        let err = service.compile_and_execute(&request).unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(metrics.snapshot().requests_rejected, 1);
    }

    #[test]
    fn test_ignored_filter_is_counted() {
        let (m, c, config, metrics) = (model(), client(), ServiceConfig::default(), MetricsRegistry::new());
        let service = QueryService::new(&m, &c, &config, &metrics);
        let request = ODataRequest::new(vec![ResourceSegment::entity_set("Books")])
            .with_filter(Expression::Method {
                name: "contains".into(),
                args: vec![],
            });

        let body = service.compile_and_execute(&request).unwrap();
        assert_eq!(body["value"].as_array().unwrap().len(), 3);
        assert_eq!(metrics.snapshot().filters_ignored, 1);
    }

    #[test]
    fn test_search_failure_is_fatal() {
        let (m, config, metrics) = (model(), ServiceConfig::default(), MetricsRegistry::new());
        let service = QueryService::new(&m, &FailingClient, &config, &metrics);
        let request = ODataRequest::new(vec![ResourceSegment::entity_set("Books")]);

        let err = service.compile_and_execute(&request).unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.code(), "EDM_SEARCH_FAILED");
        assert_eq!(metrics.snapshot().search_failures, 1);
    }

    #[test]
    fn test_explain_does_not_search() {
        let (m, config, metrics) = (model(), ServiceConfig::default(), MetricsRegistry::new());
        let service = QueryService::new(&m, &FailingClient, &config, &metrics);
        let request = ODataRequest::new(vec![ResourceSegment::entity_set("Books")]).with_top(5);

        let out = service.explain(&request).unwrap();
        assert_eq!(out["endpoint"], "/library/Book/_search");
        assert_eq!(out["body"]["size"], 5);
        assert_eq!(out["body"]["from"], 0);
    }

    #[test]
    fn test_request_metadata_overrides_config() {
        let (m, c, config, metrics) = (model(), client(), ServiceConfig::default(), MetricsRegistry::new());
        let service = QueryService::new(&m, &c, &config, &metrics);
        let request = ODataRequest::new(vec![ResourceSegment::entity_set("Books").with_key("'b1'")])
            .with_metadata(MetadataLevel::Full);

        let body = service.compile_and_execute(&request).unwrap();
        assert_eq!(body["value"][0]["@odata.id"], "http://localhost/odata/Books('b1')");
        assert_eq!(body["value"][0]["@odata.type"], "#Library.Book");
    }
}
