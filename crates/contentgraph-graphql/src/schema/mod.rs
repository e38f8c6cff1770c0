//! GraphQL schema compilation and caching.
//!
//! The schemas of an app are compiled into one dynamic GraphQL schema,
//! which is cached until the app or one of its schemas changes.
//!
//! ## Components
//!
//! - [`map_field`] - Maps a field kind to its GraphQL type
//! - [`resolve_value`] - Reads a field value with language fallback
//! - [`ContentSchemaBuilder`] - Builds the GraphQL schema of an app
//! - [`SchemaCache`] - Shares compiled schemas between requests
//!
//! ## Architecture
//!
//! The compile process:
//! 1. The schema set of the app is turned into a [`CacheKey`]
//! 2. The first request for a key compiles; concurrent requests wait
//! 3. The compiled graph is shared until a newer key of the app replaces it

mod asset_type;
mod builder;
mod cache;
mod content_type;
mod field_types;
mod registry;
mod values;

pub use builder::{CompiledTypeGraph, ContentSchemaBuilder, SchemaBuilderConfig};
pub use cache::{CacheKey, SchemaCache};
pub use content_type::{ContentTypeBuilder, SchemaTypeNames};
pub use field_types::{
    ASSET_RESULT_TYPE, ASSET_TYPE, CONTENT_FALLBACK_TYPE, DATETIME_SCALAR, FieldMapping,
    GEOLOCATION_TYPE, JSON_SCALAR, ReferenceTarget, ResolvedValue, convert_value, map_field,
};
pub use registry::{QUERY_TYPE, TypeNameRegistry};
pub use values::{resolve_field, resolve_value};
