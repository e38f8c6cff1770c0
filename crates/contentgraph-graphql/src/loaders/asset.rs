//! Asset DataLoader for batched reference loading.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_graphql::dataloader::Loader;
use contentgraph_core::AssetItem;
use contentgraph_storage::DynAssetStore;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::error::GraphQLError;

/// Key for looking up an asset by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetKey(pub Uuid);

impl std::fmt::Display for AssetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// DataLoader for fetching assets of one app with a single id query.
pub struct AssetLoader {
    app_id: Uuid,
    store: DynAssetStore,
    limit: u32,
}

impl AssetLoader {
    /// Creates a new asset loader. `limit` is passed as `top` to the store.
    #[must_use]
    pub fn new(app_id: Uuid, store: DynAssetStore, limit: u32) -> Self {
        Self {
            app_id,
            store,
            limit,
        }
    }
}

impl Loader<AssetKey> for AssetLoader {
    type Value = Arc<AssetItem>;
    type Error = Arc<GraphQLError>;

    #[instrument(skip(self, keys), fields(key_count = keys.len()))]
    async fn load(&self, keys: &[AssetKey]) -> Result<HashMap<AssetKey, Self::Value>, Self::Error> {
        debug!(key_count = keys.len(), "Loading assets batch");

        let ids: BTreeSet<Uuid> = keys.iter().map(|key| key.0).collect();

        let result = self
            .store
            .query_assets(self.app_id, None, Some(&ids), None, self.limit, 0)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to load referenced assets");
                Arc::new(GraphQLError::from(e))
            })?;

        let results: HashMap<AssetKey, Self::Value> = result
            .items
            .into_iter()
            .map(|asset| (AssetKey(asset.id), Arc::new(asset)))
            .collect();

        debug!(
            requested = keys.len(),
            found = results.len(),
            "Assets batch load complete"
        );

        Ok(results)
    }
}
