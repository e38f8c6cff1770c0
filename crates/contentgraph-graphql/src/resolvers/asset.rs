//! Asset root resolvers.

use std::sync::Arc;

use async_graphql::ErrorExtensions;
use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use contentgraph_core::AssetItem;
use contentgraph_storage::ResultList;
use tracing::{debug, warn};

use super::{id_argument, null_on_error, string_argument, u32_argument};
use crate::context::GraphQLContext;
use crate::error::GraphQLError;

/// Page size of `queryAssets` when `top` is not given.
pub const DEFAULT_ASSET_TOP: u32 = 20;

/// One page of assets together with the total number of matches.
#[derive(Debug, Clone, Default)]
pub struct AssetPage {
    pub total: i64,
    pub items: Vec<Arc<AssetItem>>,
}

impl From<ResultList<AssetItem>> for AssetPage {
    fn from(result: ResultList<AssetItem>) -> Self {
        Self {
            total: result.total,
            items: result.items.into_iter().map(Arc::new).collect(),
        }
    }
}

/// Resolver for `findAsset(id: String!)`.
pub struct FindAssetResolver;

impl FindAssetResolver {
    pub fn resolve() -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                let result = find_asset(&ctx).await;
                Ok(null_on_error(&ctx, result))
            })
        }
    }
}

/// Resolver for the asset list queries.
pub struct AssetQueryResolver;

impl AssetQueryResolver {
    /// Creates the resolver of `queryAssets(top, skip, search)`.
    pub fn resolve() -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                let result = query_assets(&ctx).await.map(|page| {
                    Some(FieldValue::list(
                        page.items.into_iter().map(FieldValue::owned_any),
                    ))
                });
                Ok(null_on_error(&ctx, result))
            })
        }
    }

    /// Creates the resolver of `queryAssetsWithTotal(top, skip, search)`.
    pub fn resolve_with_total()
    -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                let result = query_assets(&ctx)
                    .await
                    .map(|page| Some(FieldValue::owned_any(Arc::new(page))));
                Ok(null_on_error(&ctx, result))
            })
        }
    }
}

async fn find_asset<'a>(
    ctx: &ResolverContext<'_>,
) -> Result<Option<FieldValue<'a>>, async_graphql::Error> {
    let id = id_argument(ctx)?;

    debug!(id = %id, "Resolving single asset read");

    let gql_ctx = GraphQLContext::from_resolver(ctx)?;

    let asset = gql_ctx.asset_store.find_asset(id).await.map_err(|e| {
        warn!(error = %e, "Storage error reading asset");
        GraphQLError::from(e).extend()
    })?;

    Ok(asset.map(|asset| FieldValue::owned_any(Arc::new(asset))))
}

async fn query_assets(ctx: &ResolverContext<'_>) -> Result<AssetPage, async_graphql::Error> {
    let top = u32_argument(ctx, "top")?.unwrap_or(DEFAULT_ASSET_TOP);
    let skip = u32_argument(ctx, "skip")?.unwrap_or(0);
    let search = string_argument(ctx, "search")?;

    let gql_ctx = GraphQLContext::from_resolver(ctx)?;

    debug!(
        top = top,
        skip = skip,
        search = ?search,
        "Resolving asset query"
    );

    let result = gql_ctx
        .asset_store
        .query_assets(gql_ctx.app.id, None, None, search.as_deref(), top, skip)
        .await
        .map_err(|e| {
            warn!(error = %e, "Storage error querying assets");
            GraphQLError::from(e).extend()
        })?;

    debug!(count = result.len(), total = result.total, "Asset query complete");

    Ok(AssetPage::from(result))
}
