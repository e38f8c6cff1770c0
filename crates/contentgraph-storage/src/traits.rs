//! Collaborator traits the GraphQL layer depends on.
//!
//! Implementations must be thread-safe (`Send + Sync`); they are shared
//! across concurrent query executions behind an `Arc`.

use std::collections::BTreeSet;

use async_trait::async_trait;
use contentgraph_core::{App, AssetItem, ContentItem, Principal, SchemaEntity};
use uuid::Uuid;

use crate::error::StorageError;
use crate::types::{ContentQuery, EtagVersion, ResultList};

/// Read access to the content items of an app.
///
/// Permission checks on `principal` are the store's responsibility.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Queries content items of one schema.
    ///
    /// With [`ContentQuery::Ids`] the result contains every requested item
    /// that exists; missing ids are simply omitted. Returns the schema the
    /// items belong to together with the page of items.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the schema does not exist.
    /// Returns `StorageError::InvalidQuery` for malformed OData queries.
    async fn query_contents(
        &self,
        app: &App,
        schema_id: Uuid,
        principal: &Principal,
        query: &ContentQuery,
    ) -> Result<(SchemaEntity, ResultList<ContentItem>), StorageError>;

    /// Reads a single content item.
    ///
    /// Returns `None` for the item if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the schema does not exist.
    async fn find_content(
        &self,
        app: &App,
        schema_id: Uuid,
        principal: &Principal,
        id: Uuid,
        version: EtagVersion,
    ) -> Result<(SchemaEntity, Option<ContentItem>), StorageError>;
}

/// Read access to the assets of an app.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Queries assets, optionally restricted to a set of ids.
    ///
    /// # Errors
    ///
    /// Returns an error for infrastructure issues.
    async fn query_assets(
        &self,
        app_id: Uuid,
        parent_id: Option<Uuid>,
        ids: Option<&BTreeSet<Uuid>>,
        search: Option<&str>,
        top: u32,
        skip: u32,
    ) -> Result<ResultList<AssetItem>, StorageError>;

    /// Reads a single asset. Returns `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    async fn find_asset(&self, id: Uuid) -> Result<Option<AssetItem>, StorageError>;
}

/// Builds the public URLs exposed on content and asset types.
pub trait UrlGenerator: Send + Sync {
    fn content_url(&self, app: &App, schema: &SchemaEntity, content_id: Uuid) -> String;

    fn asset_url(&self, app: &App, asset: &AssetItem) -> String;

    /// Thumbnail URL; `None` for assets without a preview (non-images).
    fn asset_thumbnail_url(&self, app: &App, asset: &AssetItem) -> Option<String>;

    fn asset_source_url(&self, app: &App, asset: &AssetItem) -> Option<String>;
}

/// Provides the schemas of an app.
#[async_trait]
pub trait AppProvider: Send + Sync {
    /// All schemas of the app, published or not.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the app does not exist.
    async fn get_schemas(&self, app_id: Uuid) -> Result<Vec<SchemaEntity>, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time checks that the traits are object-safe
    fn _assert_content_store_object_safe(_: &dyn ContentStore) {}

    fn _assert_asset_store_object_safe(_: &dyn AssetStore) {}

    fn _assert_url_generator_object_safe(_: &dyn UrlGenerator) {}

    fn _assert_app_provider_object_safe(_: &dyn AppProvider) {}
}
