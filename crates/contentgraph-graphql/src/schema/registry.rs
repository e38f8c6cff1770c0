//! Type name allocation.

use std::collections::HashMap;

use super::field_types::{
    ASSET_RESULT_TYPE, ASSET_TYPE, CONTENT_FALLBACK_TYPE, DATETIME_SCALAR, GEOLOCATION_TYPE,
    JSON_SCALAR,
};
use crate::error::GraphQLError;

/// Name of the query root type.
pub const QUERY_TYPE: &str = "Query";

const RESERVED: [&str; 12] = [
    QUERY_TYPE,
    DATETIME_SCALAR,
    JSON_SCALAR,
    GEOLOCATION_TYPE,
    ASSET_TYPE,
    ASSET_RESULT_TYPE,
    CONTENT_FALLBACK_TYPE,
    "String",
    "Int",
    "Float",
    "Boolean",
    "ID",
];

/// Tracks which schema claimed which GraphQL type name during one compile.
#[derive(Debug, Clone)]
pub struct TypeNameRegistry {
    owners: HashMap<String, String>,
}

impl TypeNameRegistry {
    /// Creates a registry with the built-in type names already taken.
    pub fn new() -> Self {
        let owners = RESERVED
            .iter()
            .map(|name| (name.to_string(), String::new()))
            .collect();

        Self { owners }
    }

    /// Claims `type_name` for the schema `owner`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTypeName` if the name is built in or was claimed
    /// before.
    pub fn claim(&mut self, type_name: &str, owner: &str) -> Result<(), GraphQLError> {
        if self.owners.contains_key(type_name) {
            return Err(GraphQLError::duplicate_type_name(type_name, owner));
        }

        self.owners.insert(type_name.to_string(), owner.to_string());
        Ok(())
    }
}

impl Default for TypeNameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_are_reserved() {
        let mut registry = TypeNameRegistry::new();
        assert!(registry.claim("Query", "query").is_err());

        let err = registry.claim("AssetResultDto", "asset").unwrap_err();
        assert!(matches!(err, GraphQLError::DuplicateTypeName { .. }));
    }

    #[test]
    fn test_second_claim_fails() {
        let mut registry = TypeNameRegistry::new();
        registry.claim("MySchemaDto", "my-schema").unwrap();

        let err = registry.claim("MySchemaDto", "my_schema").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Duplicate GraphQL type name 'MySchemaDto' derived from schema 'my_schema'"
        );
    }
}
