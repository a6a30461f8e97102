//! edmquery - compiles entity-model queries into search engine queries
//!
//! A parsed request (resource path, filter, select, paging) is compiled
//! against an immutable entity model into one search query, executed with a
//! single search call, and the raw hits are projected back into typed
//! entities and serialized with their metadata envelope.
//!
//! # Pipeline
//!
//! 1. [`planner`]: path assembly, filter compilation, paging
//! 2. [`executor`]: the search call
//! 3. [`projection`]: raw hits to typed entities
//! 4. [`serializer`]: response body
//!
//! [`service::QueryService`] runs all four.

pub mod cli;
pub mod config;
pub mod executor;
pub mod model;
pub mod observability;
pub mod planner;
pub mod projection;
pub mod request;
pub mod serializer;
pub mod service;
