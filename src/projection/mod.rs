//! Result projection
//!
//! Converts raw hits into typed entities keyed by the entity model. Nesting
//! stops after one complex level.

mod entity;
mod projector;

pub use entity::{ProjectedCollection, ProjectedEntity, ProjectedProperty, PropertyValue};
pub use projector::{materialize, ResultProjector};
