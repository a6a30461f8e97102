//! Search execution
//!
//! One blocking search call per request, through the [`SearchClient`] seam.
//!
//! # Execution Flow
//!
//! 1. Combine the composed query with the filter (or match-all)
//! 2. Attach sort, from/size and `_source` projection
//! 3. Issue the call and return raw hits plus the total match count
//!
//! [`MemorySearchClient`] evaluates the same request shape in process.

mod client;
mod errors;
mod executor;
mod filters;
mod memory;
mod result;
mod sorter;

pub use client::{SearchClient, SearchRequest};
pub use errors::{ExecutorError, ExecutorErrorCode, ExecutorResult, Severity};
pub use executor::SearchExecutor;
pub use filters::QueryMatcher;
pub use memory::{MemorySearchClient, StoredDocument};
pub use result::{RawHit, SearchResponse};
pub use sorter::{compare_values, HitSorter};
