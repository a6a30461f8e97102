//! Response serialization
//!
//! Writes projected entities and scalar values with their metadata envelope.
//! Beyond plain JSON writing it:
//!
//! - synthesizes a descriptor for properties the entity type does not declare
//! - requires a context URL for scalar responses unless metadata is `none`
//! - omits context, ETag and operations when metadata is `none`
//! - flags null scalars with `@odata.null`

mod context;
mod errors;
mod writer;

pub use context::{ContextUrl, MetadataLevel};
pub use errors::{SerializerError, SerializerErrorCode, SerializerResult};
pub use writer::{PropertyDescriptor, ResponseSerializer, SerializerOptions, JSON_NULL};
