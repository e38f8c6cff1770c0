//! Compiled schema cache.
//!
//! Compiling an app's schemas is expensive, so compiled graphs are kept per
//! [`CacheKey`] and shared between requests. Each key owns a
//! `tokio::sync::OnceCell`: concurrent requests for a key that is still
//! compiling wait for that compile instead of starting their own, while
//! compiles for different keys run independently.

use std::sync::Arc;

use contentgraph_core::{App, SchemaEntity};
use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use uuid::Uuid;

use super::builder::CompiledTypeGraph;
use crate::error::GraphQLError;

/// Identifies one compiled graph: the app, its version and the versions of
/// all its schemas.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub app_id: Uuid,
    pub app_version: i64,
    /// `(schema id, schema version)`, sorted by id.
    pub schemas: Vec<(Uuid, i64)>,
}

impl CacheKey {
    /// Derives the key of an app and its schema set. The order of `schemas`
    /// does not matter.
    pub fn new(app: &App, schemas: &[SchemaEntity]) -> Self {
        let mut versions: Vec<(Uuid, i64)> = schemas
            .iter()
            .map(|schema| (schema.id, schema.version))
            .collect();
        versions.sort_unstable();

        Self {
            app_id: app.id,
            app_version: app.version,
            schemas: versions,
        }
    }
}

type Slot = Arc<OnceCell<Arc<CompiledTypeGraph>>>;

/// Process-wide cache of compiled graphs.
#[derive(Default)]
pub struct SchemaCache {
    entries: DashMap<CacheKey, Slot>,
}

impl SchemaCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the graph of `key`, compiling it with `build` if needed.
    ///
    /// At most one `build` runs per key at a time. A successful compile
    /// replaces all other entries of the same app.
    ///
    /// # Errors
    ///
    /// Returns the error of `build`. Nothing is cached in that case, so the
    /// next call compiles again.
    pub async fn get_or_build<F>(
        &self,
        key: CacheKey,
        build: F,
    ) -> Result<Arc<CompiledTypeGraph>, GraphQLError>
    where
        F: FnOnce() -> Result<CompiledTypeGraph, GraphQLError>,
    {
        if let Some(graph) = self.get(&key) {
            return Ok(graph);
        }

        let slot = self.entries.entry(key.clone()).or_default().clone();
        let app_id = key.app_id;
        let schema_count = key.schemas.len();

        let result = slot
            .get_or_try_init(|| async move {
                let graph = build()?;
                info!(
                    app_id = %app_id,
                    schema_count = schema_count,
                    "Compiled GraphQL schema"
                );
                Ok::<_, GraphQLError>(Arc::new(graph))
            })
            .await;

        match result {
            Ok(graph) => {
                let graph = graph.clone();
                self.evict_other_versions(&key);
                Ok(graph)
            }
            Err(e) => {
                self.entries.remove_if(&key, |_, slot| !slot.initialized());
                Err(e)
            }
        }
    }

    /// Returns the graph of `key` if it is compiled.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<CompiledTypeGraph>> {
        self.entries
            .get(key)
            .and_then(|slot| slot.get().cloned())
    }

    /// Removes one entry. Returns true if it existed.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            debug!(app_id = %key.app_id, "Invalidated compiled GraphQL schema");
        }
        removed
    }

    /// Removes all entries of an app. Returns the number of removed entries.
    pub fn invalidate_app(&self, app_id: Uuid) -> usize {
        let mut removed = 0;
        self.entries.retain(|key, _| {
            let keep = key.app_id != app_id;
            if !keep {
                removed += 1;
            }
            keep
        });

        if removed > 0 {
            info!(app_id = %app_id, removed = removed, "Invalidated compiled GraphQL schemas");
        }
        removed
    }

    /// Number of compiled graphs.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn evict_other_versions(&self, key: &CacheKey) {
        let mut evicted = 0;
        self.entries.retain(|other, _| {
            let keep = other.app_id != key.app_id || other == key;
            if !keep {
                evicted += 1;
            }
            keep
        });

        if evicted > 0 {
            info!(
                app_id = %key.app_id,
                evicted = evicted,
                "Evicted outdated GraphQL schemas"
            );
        }
    }
}

impl std::fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}
