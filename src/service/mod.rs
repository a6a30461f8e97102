//! Request orchestration
//!
//! [`QueryService::compile_and_execute`] is the one operation exposed to
//! callers: parsed request in, response body or typed failure out. Every
//! failure carries the protocol status it maps to.

mod errors;
mod pipeline;

pub use errors::{ErrorResponse, ServiceError, ServiceResult};
pub use pipeline::QueryService;
