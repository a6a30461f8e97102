//! Entity data model and schema accessor
//!
//! The model is an immutable, pre-validated snapshot. Every property and
//! navigation lookup made by the planner, projector and serializer goes
//! through [`SchemaAccessor`], so the pipeline never depends on how the model
//! was loaded.

mod accessor;
mod errors;
mod loader;
mod types;

pub use accessor::{EntityModel, SchemaAccessor};
pub use errors::{ModelError, ModelErrorCode, ModelResult};
pub use loader::{ModelDocument, ModelLoader};
pub use types::{
    Cardinality, EntitySet, EntityType, NavigationProperty, PrimitiveType, Property, PropertyKind,
};
