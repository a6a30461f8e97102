//! Search executor
//!
//! Turns a frozen plan into exactly one search call. The effective query is
//! the composed join/identifier query AND the compiled filter (match-all when
//! there is none). No retry, no timeout: a failed call fails the request.

use super::client::{SearchClient, SearchRequest};
use super::errors::ExecutorResult;
use super::result::SearchResponse;
use crate::planner::QueryPlan;

impl SearchRequest {
    /// Builds the single search request for a plan
    pub fn from_plan(plan: &QueryPlan<'_>) -> Self {
        Self {
            index: plan.query.index().to_string(),
            doc_type: plan.query.doc_type().to_string(),
            query: plan.effective_query(),
            from: plan.pagination.skip,
            size: plan.pagination.top,
            sort: plan.pagination.order_by.clone(),
            source: plan.fields.clone(),
        }
    }
}

/// Executes plans against a search client
pub struct SearchExecutor<'a, C: SearchClient + ?Sized> {
    client: &'a C,
}

impl<'a, C: SearchClient + ?Sized> SearchExecutor<'a, C> {
    /// Creates a new executor
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Issues the search call for a plan
    pub fn execute(&self, plan: &QueryPlan<'_>) -> ExecutorResult<SearchResponse> {
        let request = SearchRequest::from_plan(plan);
        self.client.search(&request)
    }
}
