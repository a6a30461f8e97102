//! Query compilation
//!
//! Turns a parsed request into one search query, with no I/O.
//!
//! # Phases
//!
//! 1. Query assembly: resource path to parent/child joins and identifier
//!    restrictions
//! 2. Predicate compilation: filter expression to search predicate
//! 3. Pagination and sort resolution
//!
//! Unsupported filter syntax is recoverable; everything else rejects the
//! request before the search call.

mod assembler;
mod errors;
mod pagination;
mod planner;
mod predicate;
mod query;

pub use assembler::{AssembledPath, ComposedQuery, QueryAssembler};
pub use errors::{PlannerError, PlannerErrorCode, PlannerResult, Severity};
pub use pagination::{
    Pagination, PaginationResolver, SortDirection, SortKey, DEFAULT_SKIP, DEFAULT_TOP,
};
pub use planner::{FilterPolicy, PlannerSettings, QueryPlan, QueryPlanner};
pub use predicate::PredicateCompiler;
pub use query::{BoolQuery, RangeBounds, SearchQuery};
