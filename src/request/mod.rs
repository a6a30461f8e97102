//! Parsed request representation
//!
//! Parsing raw request text is done by an external collaborator; this module
//! only defines the structures it hands over: resource path segments with key
//! predicates, the filter expression tree, and the remaining query options.

mod expression;
mod options;
mod path;

pub use expression::{BinaryOperator, Expression};
pub use options::{ODataRequest, OrderByItem, QueryOptions, SelectItem};
pub use path::{KeyPredicate, ResourceSegment};
