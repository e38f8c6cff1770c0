//! DataLoaders for efficient batched reference loading.
//!
//! Reference fields (`References`, `Assets`) only hold ids. Resolving them
//! one by one would issue one store call per reference; instead every
//! resolver registers its ids with a per-request DataLoader, which collects
//! the keys of one execution wave and fetches them in grouped calls.
//!
//! ## Overview
//!
//! - [`ContentLoader`] - Loads content items by (schema, id), one call per schema
//! - [`AssetLoader`] - Loads assets by id, one call per batch
//!
//! Both loaders use a request-scoped cache: a key that was already loaded
//! in the same execution is not fetched again.
//!
//! ## Usage
//!
//! ```ignore
//! let loaders = DataLoaders::new(app, principal, content_store, asset_store, &config);
//! let items = loaders.load_contents(schema_id, &ids).await?;
//! ```

mod asset;
mod content;

pub use asset::{AssetKey, AssetLoader};
pub use content::{ContentKey, ContentLoader};

use std::sync::Arc;
use std::time::Duration;

use async_graphql::dataloader::{DataLoader, HashMapCache};
use contentgraph_core::{App, AssetItem, ContentItem, Principal};
use contentgraph_storage::{DynAssetStore, DynContentStore};
use uuid::Uuid;

use crate::error::GraphQLError;

/// Batching settings of the per-request loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// How long to wait for more keys before fetching.
    pub delay: Duration,
    /// Fetch immediately once this many keys are pending.
    pub max_batch_size: usize,
    /// `top` passed to the asset store for grouped asset fetches.
    pub asset_reference_limit: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(1),
            max_batch_size: 1000,
            asset_reference_limit: u32::MAX,
        }
    }
}

/// Collection of all DataLoaders for a GraphQL request.
///
/// Created once per request to scope batching and caching to a single
/// execution. Loaders are wrapped in Arc for cheap cloning.
#[derive(Clone)]
pub struct DataLoaders {
    /// Loader for referenced content items.
    pub content_loader: Arc<DataLoader<ContentLoader, HashMapCache>>,

    /// Loader for referenced assets.
    pub asset_loader: Arc<DataLoader<AssetLoader, HashMapCache>>,
}

impl DataLoaders {
    /// Creates a new set of DataLoaders.
    #[must_use]
    pub fn new(
        app: Arc<App>,
        principal: Arc<Principal>,
        content_store: DynContentStore,
        asset_store: DynAssetStore,
        config: &LoaderConfig,
    ) -> Self {
        let asset_loader = AssetLoader::new(app.id, asset_store, config.asset_reference_limit);
        let content_loader = ContentLoader::new(app, principal, content_store);

        Self {
            content_loader: Arc::new(
                DataLoader::with_cache(content_loader, tokio::spawn, HashMapCache::default())
                    .delay(config.delay)
                    .max_batch_size(config.max_batch_size),
            ),
            asset_loader: Arc::new(
                DataLoader::with_cache(asset_loader, tokio::spawn, HashMapCache::default())
                    .delay(config.delay)
                    .max_batch_size(config.max_batch_size),
            ),
        }
    }

    /// Loads the referenced content items of one schema.
    ///
    /// The result keeps the order of `ids`; ids that do not exist are
    /// omitted.
    ///
    /// # Errors
    ///
    /// Returns the store error of the grouped fetch, shared by every
    /// resolver that took part in the batch.
    pub async fn load_contents(
        &self,
        schema_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<Arc<ContentItem>>, Arc<GraphQLError>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys = ids.iter().map(|id| ContentKey::new(schema_id, *id));
        let loaded = self.content_loader.load_many(keys).await?;

        Ok(ids
            .iter()
            .filter_map(|id| loaded.get(&ContentKey::new(schema_id, *id)).cloned())
            .collect())
    }

    /// Loads referenced assets, keeping the order of `ids` and omitting
    /// ids that do not exist.
    ///
    /// # Errors
    ///
    /// Returns the store error of the grouped fetch.
    pub async fn load_assets(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<Arc<AssetItem>>, Arc<GraphQLError>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys = ids.iter().map(|id| AssetKey(*id));
        let loaded = self.asset_loader.load_many(keys).await?;

        Ok(ids
            .iter()
            .filter_map(|id| loaded.get(&AssetKey(*id)).cloned())
            .collect())
    }
}

impl std::fmt::Debug for DataLoaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataLoaders")
            .field("content_loader", &"DataLoader<ContentLoader>")
            .field("asset_loader", &"DataLoader<AssetLoader>")
            .finish()
    }
}
