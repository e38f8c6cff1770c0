//! Query entry point.
//!
//! [`GraphQLService::query`] runs one GraphQL request against the compiled
//! schema of an app: it loads the app's schemas, gets or compiles the
//! graph, creates a fresh request context and converts the engine response
//! into a [`QueryResult`].

use std::sync::Arc;

use async_graphql::{PathSegment, Request, Response, ServerError, Variables};
use contentgraph_core::{App, Principal, generate_id};
use contentgraph_storage::{DynAppProvider, DynAssetStore, DynContentStore, DynUrlGenerator};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::GraphQLConfig;
use crate::context::GraphQLContextBuilder;
use crate::error::GraphQLError;
use crate::schema::{CacheKey, CompiledTypeGraph, ContentSchemaBuilder, SchemaCache};

/// GraphQL request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQLQuery {
    /// The GraphQL query string.
    #[serde(default)]
    pub query: Option<String>,

    /// Optional operation name for multi-operation documents.
    #[serde(rename = "operationName", default)]
    pub operation_name: Option<String>,

    /// Optional variables for the query.
    #[serde(default)]
    pub variables: Option<serde_json::Value>,
}

impl GraphQLQuery {
    /// Creates a query without operation name and variables.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }

    #[must_use]
    pub fn with_variables(mut self, variables: serde_json::Value) -> Self {
        self.variables = Some(variables);
        self
    }
}

/// Location of an error in the query document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryErrorLocation {
    pub line: usize,
    pub column: usize,
}

/// One error of a query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryError {
    pub message: String,

    /// Response path of the failed field; field names and list indices.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<QueryErrorLocation>,

    /// Stable error code from `extensions.code`, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl From<ServerError> for QueryError {
    fn from(error: ServerError) -> Self {
        let path = error
            .path
            .iter()
            .map(|segment| match segment {
                PathSegment::Field(name) => serde_json::Value::from(name.as_str()),
                PathSegment::Index(index) => serde_json::Value::from(*index),
            })
            .collect();

        let locations = error
            .locations
            .iter()
            .map(|pos| QueryErrorLocation {
                line: pos.line,
                column: pos.column,
            })
            .collect();

        let code = error
            .extensions
            .as_ref()
            .and_then(|extensions| extensions.get("code"))
            .and_then(|code| match code {
                async_graphql::Value::String(code) => Some(code.clone()),
                _ => None,
            });

        Self {
            message: error.message,
            path,
            locations,
            code,
        }
    }
}

/// The result of a query: the response tree and the errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// `null` when the query failed validation.
    pub data: serde_json::Value,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<QueryError>,
}

impl QueryResult {
    /// The result of an empty query: `{ "data": {} }`.
    pub fn empty() -> Self {
        Self {
            data: serde_json::Value::Object(serde_json::Map::new()),
            errors: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl From<Response> for QueryResult {
    fn from(response: Response) -> Self {
        let data = response.data.into_json().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to convert response data");
            serde_json::Value::Null
        });

        Self {
            data,
            errors: response.errors.into_iter().map(QueryError::from).collect(),
        }
    }
}

/// Runs GraphQL queries against the content of apps.
///
/// One service is shared by all requests; compiled schemas are kept in its
/// [`SchemaCache`].
pub struct GraphQLService {
    app_provider: DynAppProvider,
    content_store: DynContentStore,
    asset_store: DynAssetStore,
    url_generator: DynUrlGenerator,
    cache: Arc<SchemaCache>,
    builder: ContentSchemaBuilder,
    config: GraphQLConfig,
}

impl GraphQLService {
    /// Creates a service with its own schema cache.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `config` does not pass
    /// [`GraphQLConfig::validate`].
    pub fn new(
        app_provider: DynAppProvider,
        content_store: DynContentStore,
        asset_store: DynAssetStore,
        url_generator: DynUrlGenerator,
        config: GraphQLConfig,
    ) -> Result<Self, GraphQLError> {
        config.validate().map_err(GraphQLError::InvalidConfig)?;

        Ok(Self {
            app_provider,
            content_store,
            asset_store,
            url_generator,
            cache: Arc::new(SchemaCache::new()),
            builder: ContentSchemaBuilder::new(config.to_compiler_config()),
            config,
        })
    }

    /// Uses a shared schema cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<SchemaCache>) -> Self {
        self.cache = cache;
        self
    }

    /// The schema cache of this service.
    pub fn cache(&self) -> &Arc<SchemaCache> {
        &self.cache
    }

    /// Executes a query as `principal`.
    ///
    /// A missing or blank query yields `{ "data": {} }` without compiling
    /// anything. Errors of single fields are part of the result; only
    /// failures to load or compile the schema are returned as `Err`.
    ///
    /// # Errors
    ///
    /// Returns an error if the schemas cannot be loaded or compiled.
    #[instrument(skip(self, app, principal, query), fields(app = %app.name))]
    pub async fn query(
        &self,
        app: &App,
        principal: &Principal,
        query: GraphQLQuery,
    ) -> Result<QueryResult, GraphQLError> {
        let Some(text) = query.query.filter(|text| !text.trim().is_empty()) else {
            debug!("Empty GraphQL query");
            return Ok(QueryResult::empty());
        };

        let graph = self.compiled_graph(app).await?;

        let request_id = generate_id().to_string();
        let context = GraphQLContextBuilder::new()
            .with_app(Arc::new(app.clone()))
            .with_principal(Arc::new(principal.clone()))
            .with_content_store(self.content_store.clone())
            .with_asset_store(self.asset_store.clone())
            .with_url_generator(self.url_generator.clone())
            .with_request_id(request_id.clone())
            .with_loader_config(self.config.to_loader_config())
            .build()
            .map_err(|e| GraphQLError::Internal(e.to_string()))?;

        let mut request = Request::new(text);

        if let Some(operation_name) = query.operation_name {
            request = request.operation_name(operation_name);
        }

        if let Some(variables) = query.variables {
            request = request.variables(Variables::from_json(variables));
        }

        request = request.data(context);

        debug!(request_id = %request_id, "Executing GraphQL query");
        let response = graph.execute(request).await;

        let result = QueryResult::from(response);
        if !result.is_ok() {
            debug!(
                request_id = %request_id,
                error_count = result.errors.len(),
                "GraphQL query completed with errors"
            );
        }

        Ok(result)
    }

    /// Returns the compiled graph for the current schemas of `app`.
    ///
    /// # Errors
    ///
    /// Returns an error if the schemas cannot be loaded or compiled.
    pub async fn compiled_graph(&self, app: &App) -> Result<Arc<CompiledTypeGraph>, GraphQLError> {
        let schemas = self.app_provider.get_schemas(app.id).await.map_err(|e| {
            warn!(error = %e, "Failed to load schemas");
            GraphQLError::from(e)
        })?;

        let key = CacheKey::new(app, &schemas);

        self.cache
            .get_or_build(key, || self.builder.build(app, &schemas))
            .await
    }
}

impl std::fmt::Debug for GraphQLService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphQLService")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_deserialize() {
        let query: GraphQLQuery = serde_json::from_value(json!({
            "query": "query Q { findAsset(id: \"1\") { id } }",
            "operationName": "Q",
            "variables": {"foo": "bar"}
        }))
        .unwrap();

        assert_eq!(query.operation_name.as_deref(), Some("Q"));
        assert_eq!(query.variables, Some(json!({"foo": "bar"})));
    }

    #[test]
    fn test_query_minimal() {
        let query: GraphQLQuery = serde_json::from_value(json!({})).unwrap();
        assert!(query.query.is_none());
        assert!(query.operation_name.is_none());
        assert!(query.variables.is_none());
    }

    #[test]
    fn test_empty_result_serialization() {
        let value = serde_json::to_value(QueryResult::empty()).unwrap();
        assert_eq!(value, json!({"data": {}}));
    }

    #[test]
    fn test_error_conversion() {
        let mut error = ServerError::new("boom", Some(async_graphql::Pos { line: 2, column: 5 }));
        error.path = vec![
            PathSegment::Field("queryAssets".to_string()),
            PathSegment::Index(1),
        ];

        let error = QueryError::from(error);
        assert_eq!(error.message, "boom");
        assert_eq!(error.path, vec![json!("queryAssets"), json!(1)]);
        assert_eq!(error.locations, vec![QueryErrorLocation { line: 2, column: 5 }]);
        assert!(error.code.is_none());
    }
}
