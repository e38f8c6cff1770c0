//! Error types for GraphQL operations.
//!
//! Compile failures are returned from [`crate::GraphQLService::query`];
//! failures inside resolvers are converted into field errors carrying an
//! `extensions.code` entry (see [`GraphQLError::error_code`]).

use async_graphql::ErrorExtensions;
use contentgraph_storage::StorageError;

/// Errors that can occur during GraphQL operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphQLError {
    /// Schema build failed.
    #[error("Failed to build GraphQL schema: {0}")]
    SchemaBuildFailed(String),

    /// Two schemas (or a schema and a built-in type) derive the same type name.
    #[error("Duplicate GraphQL type name '{type_name}' derived from schema '{schema_name}'")]
    DuplicateTypeName {
        /// The derived GraphQL type name.
        type_name: String,
        /// The schema whose name produced the collision.
        schema_name: String,
    },

    /// Invalid `[graphql]` configuration.
    #[error("Invalid GraphQL configuration: {0}")]
    InvalidConfig(String),

    /// Invalid query or argument.
    #[error("Invalid GraphQL query: {0}")]
    InvalidQuery(String),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GraphQLError {
    /// Returns the error code for GraphQL error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SchemaBuildFailed(_) => "SCHEMA_BUILD_FAILED",
            Self::DuplicateTypeName { .. } => "DUPLICATE_TYPE_NAME",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::Storage(StorageError::NotFound { .. }) => "NOT_FOUND",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a new `DuplicateTypeName` error.
    #[must_use]
    pub fn duplicate_type_name(
        type_name: impl Into<String>,
        schema_name: impl Into<String>,
    ) -> Self {
        Self::DuplicateTypeName {
            type_name: type_name.into(),
            schema_name: schema_name.into(),
        }
    }
}

impl ErrorExtensions for GraphQLError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.error_code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, ext| ext.set("code", code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            GraphQLError::SchemaBuildFailed("boom".into()).error_code(),
            "SCHEMA_BUILD_FAILED"
        );
        assert_eq!(
            GraphQLError::duplicate_type_name("MySchemaDto", "my_schema").error_code(),
            "DUPLICATE_TYPE_NAME"
        );
        assert_eq!(
            GraphQLError::from(StorageError::not_found("content", "1")).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            GraphQLError::from(StorageError::connection_error("refused")).error_code(),
            "STORAGE_ERROR"
        );
        assert_eq!(
            GraphQLError::InvalidConfig("x".into()).error_code(),
            "INVALID_CONFIG"
        );
    }

    #[test]
    fn test_error_display() {
        let err = GraphQLError::duplicate_type_name("MySchemaDto", "my_schema");
        assert_eq!(
            err.to_string(),
            "Duplicate GraphQL type name 'MySchemaDto' derived from schema 'my_schema'"
        );

        let err = GraphQLError::from(StorageError::internal("disk full"));
        assert_eq!(err.to_string(), "Storage error: Internal error: disk full");
    }

    #[test]
    fn test_extend_sets_code() {
        let err = GraphQLError::InvalidQuery("bad id".into()).extend();
        assert_eq!(err.message, "Invalid GraphQL query: bad id");
        let code = err
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .cloned();
        assert_eq!(code, Some(async_graphql::Value::from("INVALID_QUERY")));
    }
}
