//! GraphQL execution context.
//!
//! This module provides the context struct that holds all dependencies needed
//! by GraphQL resolvers. The context is constructed per-request and contains
//! both shared state (stores, URL generator) and request-specific state (app,
//! principal, loaders).
//!
//! # Example
//!
//! ```ignore
//! use contentgraph_graphql::GraphQLContextBuilder;
//!
//! let context = GraphQLContextBuilder::new()
//!     .with_app(app.clone())
//!     .with_principal(principal.clone())
//!     .with_content_store(content_store.clone())
//!     .with_asset_store(asset_store.clone())
//!     .with_url_generator(url_generator.clone())
//!     .with_request_id("req-123")
//!     .build()?;
//! ```

use std::sync::Arc;

use async_graphql::dynamic::ResolverContext;
use contentgraph_core::{App, Principal};
use contentgraph_storage::{DynAssetStore, DynContentStore, DynUrlGenerator};

use crate::loaders::{DataLoaders, LoaderConfig};

/// GraphQL execution context.
///
/// Passed to every execution as request data. Cloning is cheap; all shared
/// state is behind `Arc`.
#[derive(Clone)]
pub struct GraphQLContext {
    /// The app (tenant) the query runs against.
    pub app: Arc<App>,

    /// The caller, passed through to the stores.
    pub principal: Arc<Principal>,

    /// Content store.
    pub content_store: DynContentStore,

    /// Asset store.
    pub asset_store: DynAssetStore,

    /// URL generator for `url` fields.
    pub url_generator: DynUrlGenerator,

    /// Request ID for tracing and correlation.
    pub request_id: String,

    /// DataLoaders for batched reference loading, scoped to this request.
    pub loaders: DataLoaders,
}

impl GraphQLContext {
    /// Creates a new builder for GraphQLContext.
    #[must_use]
    pub fn builder() -> GraphQLContextBuilder {
        GraphQLContextBuilder::default()
    }

    /// Extracts the context from a resolver context.
    ///
    /// # Errors
    ///
    /// Returns an error if the request was executed without a context.
    pub fn from_resolver<'a>(
        ctx: &'a ResolverContext<'_>,
    ) -> Result<&'a GraphQLContext, async_graphql::Error> {
        ctx.data::<GraphQLContext>()
            .map_err(|_| async_graphql::Error::new("GraphQL context not available"))
    }
}

impl std::fmt::Debug for GraphQLContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphQLContext")
            .field("app", &self.app.name)
            .field("principal", &self.principal)
            .field("request_id", &self.request_id)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing GraphQLContext.
///
/// This builder validates that all required fields are provided before
/// creating the context.
#[derive(Default)]
pub struct GraphQLContextBuilder {
    app: Option<Arc<App>>,
    principal: Option<Arc<Principal>>,
    content_store: Option<DynContentStore>,
    asset_store: Option<DynAssetStore>,
    url_generator: Option<DynUrlGenerator>,
    request_id: Option<String>,
    loader_config: LoaderConfig,
}

impl GraphQLContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the app.
    #[must_use]
    pub fn with_app(mut self, app: Arc<App>) -> Self {
        self.app = Some(app);
        self
    }

    /// Sets the principal. Defaults to an anonymous principal.
    #[must_use]
    pub fn with_principal(mut self, principal: Arc<Principal>) -> Self {
        self.principal = Some(principal);
        self
    }

    /// Sets the content store.
    #[must_use]
    pub fn with_content_store(mut self, store: DynContentStore) -> Self {
        self.content_store = Some(store);
        self
    }

    /// Sets the asset store.
    #[must_use]
    pub fn with_asset_store(mut self, store: DynAssetStore) -> Self {
        self.asset_store = Some(store);
        self
    }

    /// Sets the URL generator.
    #[must_use]
    pub fn with_url_generator(mut self, generator: DynUrlGenerator) -> Self {
        self.url_generator = Some(generator);
        self
    }

    /// Sets the request ID.
    #[must_use]
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Sets the batching settings of the loaders.
    #[must_use]
    pub fn with_loader_config(mut self, config: LoaderConfig) -> Self {
        self.loader_config = config;
        self
    }

    /// Builds the GraphQLContext.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<GraphQLContext, ContextBuilderError> {
        let app = self.app.ok_or(ContextBuilderError::MissingField("app"))?;

        let content_store = self
            .content_store
            .ok_or(ContextBuilderError::MissingField("content_store"))?;

        let asset_store = self
            .asset_store
            .ok_or(ContextBuilderError::MissingField("asset_store"))?;

        let url_generator = self
            .url_generator
            .ok_or(ContextBuilderError::MissingField("url_generator"))?;

        let request_id = self
            .request_id
            .ok_or(ContextBuilderError::MissingField("request_id"))?;

        let principal = self
            .principal
            .unwrap_or_else(|| Arc::new(Principal::anonymous()));

        // Each request gets its own set of loaders to scope batching and caching
        let loaders = DataLoaders::new(
            app.clone(),
            principal.clone(),
            content_store.clone(),
            asset_store.clone(),
            &self.loader_config,
        );

        Ok(GraphQLContext {
            app,
            principal,
            content_store,
            asset_store,
            url_generator,
            request_id,
            loaders,
        })
    }
}

/// Errors that can occur when building a GraphQLContext.
#[derive(Debug, thiserror::Error)]
pub enum ContextBuilderError {
    /// A required field was not provided.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
