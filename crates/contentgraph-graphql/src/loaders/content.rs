//! Content DataLoader for batched reference loading.
//!
//! Keys are grouped by the schema that owns them, so one batch issues one
//! `query_contents` call per distinct schema, whatever the number of keys.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_graphql::dataloader::Loader;
use contentgraph_core::{App, ContentItem, Principal};
use contentgraph_storage::{ContentQuery, DynContentStore};
use futures_util::future::try_join_all;
use tracing::{debug, instrument, trace, warn};
use uuid::Uuid;

use crate::error::GraphQLError;

/// Key for looking up a content item of a known schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentKey {
    /// The schema the content item belongs to.
    pub schema_id: Uuid,
    /// The content item id.
    pub id: Uuid,
}

impl ContentKey {
    #[must_use]
    pub fn new(schema_id: Uuid, id: Uuid) -> Self {
        Self { schema_id, id }
    }
}

impl std::fmt::Display for ContentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.schema_id, self.id)
    }
}

/// DataLoader for fetching content items by (schema, id) pairs.
pub struct ContentLoader {
    app: Arc<App>,
    principal: Arc<Principal>,
    store: DynContentStore,
}

impl ContentLoader {
    #[must_use]
    pub fn new(app: Arc<App>, principal: Arc<Principal>, store: DynContentStore) -> Self {
        Self {
            app,
            principal,
            store,
        }
    }

    async fn load_schema_group(
        &self,
        schema_id: Uuid,
        ids: BTreeSet<Uuid>,
    ) -> Result<Vec<(ContentKey, Arc<ContentItem>)>, Arc<GraphQLError>> {
        trace!(schema_id = %schema_id, count = ids.len(), "Fetching content group");

        let query = ContentQuery::Ids(ids);
        let (_, result) = self
            .store
            .query_contents(&self.app, schema_id, &self.principal, &query)
            .await
            .map_err(|e| {
                warn!(schema_id = %schema_id, error = %e, "Failed to load referenced contents");
                Arc::new(GraphQLError::from(e))
            })?;

        Ok(result
            .items
            .into_iter()
            .map(|item| (ContentKey::new(schema_id, item.id), Arc::new(item)))
            .collect())
    }
}

impl Loader<ContentKey> for ContentLoader {
    type Value = Arc<ContentItem>;
    type Error = Arc<GraphQLError>;

    #[instrument(skip(self, keys), fields(key_count = keys.len()))]
    async fn load(
        &self,
        keys: &[ContentKey],
    ) -> Result<HashMap<ContentKey, Self::Value>, Self::Error> {
        debug!(key_count = keys.len(), "Loading contents batch");

        let mut by_schema: BTreeMap<Uuid, BTreeSet<Uuid>> = BTreeMap::new();
        for key in keys {
            by_schema.entry(key.schema_id).or_default().insert(key.id);
        }

        let groups = by_schema.len();
        let fetched = try_join_all(
            by_schema
                .into_iter()
                .map(|(schema_id, ids)| self.load_schema_group(schema_id, ids)),
        )
        .await?;

        let results: HashMap<ContentKey, Self::Value> = fetched.into_iter().flatten().collect();

        debug!(
            requested = keys.len(),
            groups,
            found = results.len(),
            "Contents batch load complete"
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_key_display() {
        let schema_id = Uuid::nil();
        let id = Uuid::from_u128(1);
        let key = ContentKey::new(schema_id, id);
        assert_eq!(
            key.to_string(),
            "00000000-0000-0000-0000-000000000000/00000000-0000-0000-0000-000000000001"
        );
    }

    #[test]
    fn test_content_key_hash() {
        use std::collections::HashSet;

        let schema_id = Uuid::new_v4();
        let id = Uuid::new_v4();

        let mut set = HashSet::new();
        set.insert(ContentKey::new(schema_id, id));
        set.insert(ContentKey::new(schema_id, id));
        set.insert(ContentKey::new(Uuid::new_v4(), id));

        assert_eq!(set.len(), 2);
    }
}
