//! Pipeline Invariant Tests
//!
//! End-to-end properties of compile-and-execute:
//! - Navigation direction decides the join kind
//! - Rejections happen before any search call
//! - Null comparisons compile to field absence
//! - Paging defaults and count independence
//! - Projection and serialization keep field values intact
//! - Scalar paths and undeclared fields

use std::sync::atomic::{AtomicUsize, Ordering};

use edmquery::config::ServiceConfig;
use edmquery::executor::{
    ExecutorResult, MemorySearchClient, SearchClient, SearchRequest, SearchResponse,
    StoredDocument,
};
use edmquery::model::{
    Cardinality, EntityModel, EntitySet, EntityType, NavigationProperty, PrimitiveType, Property,
    SchemaAccessor,
};
use edmquery::observability::MetricsRegistry;
use edmquery::planner::{
    FilterPolicy, PlannerErrorCode, PlannerSettings, PredicateCompiler, QueryPlanner, SearchQuery,
    DEFAULT_TOP,
};
use edmquery::request::{Expression, ODataRequest, OrderByItem, ResourceSegment};
use edmquery::service::QueryService;
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn model() -> EntityModel {
    let book = EntityType::new("Book")
        .with_namespace("Library")
        .with_property(Property::primitive("id", PrimitiveType::String).with_field("_id"))
        .with_property(Property::text("title"))
        .with_property(Property::collection("tags", PrimitiveType::String))
        .with_property(Property::primitive("year", PrimitiveType::Int32))
        .with_property(Property::primitive("name", PrimitiveType::String))
        .with_navigation(NavigationProperty::new("author", "Author", Cardinality::One));
    let author = EntityType::new("Author")
        .with_namespace("Library")
        .with_property(Property::primitive("id", PrimitiveType::String).with_field("_id"))
        .with_property(Property::primitive("name", PrimitiveType::String))
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

fn books() -> ODataRequest {
    ODataRequest::new(vec![ResourceSegment::entity_set("Books")])
}

/// Counts search calls and answers with nothing
#[derive(Default)]
struct CountingClient {
    calls: AtomicUsize,
}

impl SearchClient for CountingClient {
    fn search(&self, _request: &SearchRequest) -> ExecutorResult<SearchResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(SearchResponse::new(vec![], 0))
    }
}

fn run(client: &dyn SearchClient, request: &ODataRequest) -> Result<Value, (u16, String)> {
    let m = model();
    let config = ServiceConfig::default();
    let metrics = MetricsRegistry::new();
    QueryService::new(&m, client, &config, &metrics)
        .compile_and_execute(request)
        .map_err(|e| (e.status_code(), e.code().to_string()))
}

// =============================================================================
// Join Direction Tests
// =============================================================================

/// Books -> author (to-one) is a child join on the Book type.
#[test]
fn test_to_one_navigation_is_child_join() {
    let m = model();
    let settings = PlannerSettings::default();
    let request = ODataRequest::new(vec![
        ResourceSegment::entity_set("Books"),
        ResourceSegment::navigation("author"),
    ]);
    let plan = QueryPlanner::new(&m, &settings).plan(&request).unwrap();

    assert_eq!(plan.entity_set.name, "Authors");
    assert_eq!(
        plan.query.query(),
        SearchQuery::has_child("Book", SearchQuery::MatchAll)
    );
}

/// Authors('a1') -> books (to-many) is a parent join keyed on the author.
#[test]
fn test_to_many_navigation_is_parent_join() {
    let m = model();
    let settings = PlannerSettings::default();
    let request = ODataRequest::new(vec![
        ResourceSegment::entity_set("Authors").with_key("'a1'"),
        ResourceSegment::navigation("books"),
    ]);
    let plan = QueryPlanner::new(&m, &settings).plan(&request).unwrap();

    assert_eq!(plan.query.doc_type(), "Book");
    assert_eq!(
        plan.query.query().to_json(),
        json!({"has_parent": {
            "parent_type": "Author",
            "query": {"ids": {"type": "Author", "values": ["a1"]}}
        }})
    );
}

// =============================================================================
// Rejection Tests
// =============================================================================

/// Composite keys fail with 501 and never reach the engine.
#[test]
fn test_composite_key_rejected_before_search() {
    let client = CountingClient::default();
    let request = ODataRequest::new(vec![ResourceSegment::entity_set("Books")
        .with_key("'a'")
        .with_key("'b'")]);

    let (status, code) = run(&client, &request).unwrap_err();
    assert_eq!(status, 501);
    assert_eq!(code, "EDM_COMPOSITE_KEY");
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
}

/// Identifier compared with null is a bad request, even under the lenient policy.
#[test]
fn test_null_identifier_rejected_before_search() {
    let client = CountingClient::default();
    let request = books().with_filter(Expression::eq("id", Value::Null));

    let (status, code) = run(&client, &request).unwrap_err();
    assert_eq!(status, 400);
    assert_eq!(code, "EDM_INVALID_VALUE");
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
}

/// Root segment must be an entity set.
#[test]
fn test_navigation_root_rejected() {
    let client = CountingClient::default();
    let request = ODataRequest::new(vec![ResourceSegment::navigation("author")]);

    let (status, _) = run(&client, &request).unwrap_err();
    assert_eq!(status, 501);
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Filter Tests
// =============================================================================

#[test]
fn test_null_equality_is_absence() {
    let m = model();
    let book = m.entity_type("Book").unwrap();
    let compiler = PredicateCompiler::new(&m, book, "_id", ".keyword");

    assert_eq!(
        compiler.compile(&Expression::eq("name", Value::Null)).unwrap(),
        SearchQuery::not(SearchQuery::exists("name"))
    );
    assert_eq!(
        compiler.compile(&Expression::eq("name", json!("Alice"))).unwrap(),
        SearchQuery::term("name", json!("Alice"))
    );
}

#[test]
fn test_strict_policy_turns_dropped_filter_into_501() {
    let m = model();
    let settings = PlannerSettings {
        filter_policy: FilterPolicy::Strict,
        ..Default::default()
    };
    let request = books().with_filter(Expression::Method {
        name: "startswith".into(),
        args: vec![],
    });
    let err = QueryPlanner::new(&m, &settings).plan(&request).unwrap_err();
    assert_eq!(err.code(), PlannerErrorCode::EdmUnsupportedExpression);
}

// =============================================================================
// Paging Tests
// =============================================================================

#[test]
fn test_paging_defaults() {
    let m = model();
    let settings = PlannerSettings::default();
    let request = books();
    let plan = QueryPlanner::new(&m, &settings).plan(&request).unwrap();

    assert_eq!(plan.pagination.top, DEFAULT_TOP);
    assert_eq!(plan.pagination.skip, 0);
}

/// Count reports all matches regardless of the window.
#[test]
fn test_count_independent_of_top() {
    let docs = (0..50)
        .map(|i| doc("Book", &format!("b{:02}", i), json!({"title": "T"})))
        .collect();
    let client = MemorySearchClient::new(docs);
    let request = books().with_top(1).with_skip(0).with_count();

    let body = run(&client, &request).unwrap();
    assert_eq!(body["value"].as_array().unwrap().len(), 1);
    assert_eq!(body["@odata.count"], 50);
}

// =============================================================================
// Projection Tests
// =============================================================================

#[test]
fn test_round_trip_of_projected_fields() {
    let client = MemorySearchClient::new(vec![doc(
        "Book",
        "b1",
        json!({"title": "X", "tags": ["a", "b"]}),
    )]);

    let body = run(&client, &books()).unwrap();
    let text = serde_json::to_string(&body).unwrap();
    let parsed: Value = serde_json::from_str(&text).unwrap();
    let entity = &parsed["value"][0];

    assert_eq!(entity["title"], "X");
    assert_eq!(entity["tags"], json!(["a", "b"]));
}

#[test]
fn test_scalar_of_empty_source_is_identifier() {
    let client = MemorySearchClient::new(vec![doc("Book", "b1", json!({"title": "X"}))]);
    let request = ODataRequest::new(vec![
        ResourceSegment::entity_set("Books").with_key("'b1'"),
        ResourceSegment::property("id"),
    ]);

    let body = run(&client, &request).unwrap();
    assert_eq!(body["value"], "b1");
}

#[test]
fn test_scalar_of_field() {
    let client = MemorySearchClient::new(vec![doc("Book", "b1", json!({"year": 2020}))]);
    let request = ODataRequest::new(vec![
        ResourceSegment::entity_set("Books").with_key("'b1'"),
        ResourceSegment::property("year"),
    ]);

    let body = run(&client, &request).unwrap();
    assert_eq!(body["value"], 2020);
}

#[test]
fn test_undeclared_fields_serialize() {
    let client = MemorySearchClient::new(vec![doc(
        "Book",
        "b1",
        json!({"title": "X", "rating": 4.5, "meta": {"source": "import"}}),
    )]);

    let body = run(&client, &books()).unwrap();
    assert_eq!(body["value"][0]["rating"], 4.5);
    assert_eq!(body["value"][0]["meta"], json!({"source": "import"}));
}

/// A scalar path over a document lacking the field yields the identifier.
#[test]
fn test_scalar_of_missing_field_is_identifier() {
    let client = MemorySearchClient::new(vec![doc("Book", "b1", json!({"title": "X"}))]);
    let request = ODataRequest::new(vec![
        ResourceSegment::entity_set("Books").with_key("'b1'"),
        ResourceSegment::property("year"),
    ]);

    let body = run(&client, &request).unwrap();
    assert_eq!(body["value"], "b1");
}

#[test]
fn test_undeclared_mixed_arrays_serialize() {
    let client = MemorySearchClient::new(vec![doc(
        "Book",
        "b1",
        json!({"scores": [1, 2.5], "extra": [1, {"a": 1}]}),
    )]);

    let body = run(&client, &books()).unwrap();
    assert_eq!(body["value"][0]["scores"], json!([1, 2.5]));
    assert_eq!(body["value"][0]["extra"], json!([1, {"a": 1}]));
}

#[test]
fn test_undeclared_sort_property_is_ignored() {
    let client = MemorySearchClient::new(vec![
        doc("Book", "b2", json!({"year": 2001, "rating": 1})),
        doc("Book", "b1", json!({"year": 2002, "rating": 2})),
    ]);
    let request = books()
        .with_order_by(OrderByItem::desc("rating"))
        .with_order_by(OrderByItem::asc("year"));

    let body = run(&client, &request).unwrap();
    assert_eq!(body["value"][0]["id"], "b2");
    assert_eq!(body["value"][1]["id"], "b1");
}
