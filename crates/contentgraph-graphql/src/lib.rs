//! # contentgraph-graphql
//!
//! GraphQL read API over the content of an app.
//!
//! Every app (tenant) defines its own content schemas at runtime. This crate
//! compiles those schemas into a GraphQL schema and executes read queries
//! against it. It supports:
//!
//! - One content type family per schema, with localized field values and
//!   language fallback
//! - Query fields to find and list contents and assets
//! - References to other contents and to assets, loaded in batches
//! - Compiled schemas cached per app and schema version
//!
//! ## Overview
//!
//! The GraphQL schema is generated with async-graphql's dynamic schema API.
//! Compilation happens on the first query after a schema change; concurrent
//! queries for the same schema version share one compile.
//!
//! ## Configuration
//!
//! Add to the host's TOML file:
//!
//! ```toml
//! [graphql]
//! introspection = true
//! loader_delay_ms = 1
//! loader_max_batch_size = 1000
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration options
//! - [`schema`] - Schema compilation and caching
//! - [`context`] - GraphQL execution context
//! - [`loaders`] - Batched reference loading
//! - [`service`] - The query entry point
//! - [`error`] - Error types for GraphQL operations

pub mod config;
pub mod context;
pub mod error;
pub mod loaders;
pub mod resolvers;
pub mod schema;
pub mod service;

// Re-export main types
pub use config::GraphQLConfig;
pub use context::{ContextBuilderError, GraphQLContext, GraphQLContextBuilder};
pub use error::GraphQLError;
pub use loaders::{DataLoaders, LoaderConfig};
pub use schema::{
    CacheKey, CompiledTypeGraph, ContentSchemaBuilder, SchemaBuilderConfig, SchemaCache,
};
pub use service::{GraphQLQuery, GraphQLService, QueryError, QueryErrorLocation, QueryResult};

/// Result type for GraphQL operations.
pub type Result<T> = std::result::Result<T, GraphQLError>;
