//! # contentgraph-core
//!
//! Content model shared by the contentgraph crates: apps (tenants) and their
//! language configuration, schema and field definitions, content items,
//! assets and the identifier helpers used to derive GraphQL names.

pub mod app;
pub mod asset;
pub mod content;
pub mod error;
pub mod id;
pub mod languages;
pub mod naming;
pub mod schema;
pub mod time;

pub use app::{App, Principal};
pub use asset::AssetItem;
pub use content::{ContentData, ContentFieldData, ContentItem};
pub use error::{CoreError, Result};
pub use id::{RefToken, generate_id};
pub use languages::{LanguageConfig, LanguagesConfig};
pub use schema::{
    FieldDefinition, FieldKind, FieldProperties, INVARIANT_KEY, Partitioning, SchemaDefinition,
    SchemaEntity,
};
pub use time::{Timestamp, now_utc};
