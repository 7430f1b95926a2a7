//! Entity key metadata
//!
//! Describes an entity's partition key, optional sort key, secondary
//! indexes and per-property attribute overrides. Schemas are declared
//! explicitly, either in code through [`KeySchemaBuilder`] or from JSON
//! descriptors through [`SchemaLoader`], and are immutable once built.

mod errors;
mod key_schema;
mod loader;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use key_schema::{KeySchema, KeySchemaBuilder};
pub use loader::{AttributeDescriptor, EntityDefinition, EntityDescriptor, SchemaLoader};
pub use types::{AttributeType, IndexDefinition, KeyRole, KeyShape, PropertyDef};
