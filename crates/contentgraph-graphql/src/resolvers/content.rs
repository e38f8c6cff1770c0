//! Content root resolvers.
//!
//! Implements `find<Schema>Content(id)`, which reads a single item, and the
//! `query<Schema>Contents` list queries, which forward their arguments to
//! the content store as an OData query.

use std::sync::Arc;

use async_graphql::ErrorExtensions;
use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use contentgraph_core::ContentItem;
use contentgraph_storage::{ContentQuery, EtagVersion, ODataQuery, ResultList};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{id_argument, null_on_error, string_argument, u32_argument};
use crate::context::GraphQLContext;
use crate::error::GraphQLError;

/// One page of content items together with the total number of matches.
#[derive(Debug, Clone, Default)]
pub struct ContentPage {
    pub total: i64,
    pub items: Vec<Arc<ContentItem>>,
}

impl From<ResultList<ContentItem>> for ContentPage {
    fn from(result: ResultList<ContentItem>) -> Self {
        Self {
            total: result.total,
            items: result.items.into_iter().map(Arc::new).collect(),
        }
    }
}

/// Resolver for single content reads.
pub struct FindContentResolver;

impl FindContentResolver {
    /// Creates the resolver of `find<Schema>Content(id: String!)`.
    ///
    /// A missing item resolves to `null`, not to an error.
    pub fn resolve(
        schema_id: Uuid,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            FieldFuture::new(async move {
                let result = find_content(&ctx, schema_id).await;
                Ok(null_on_error(&ctx, result))
            })
        }
    }
}

/// Resolver for content list queries.
pub struct ContentQueryResolver;

impl ContentQueryResolver {
    /// Creates the resolver of `query<Schema>Contents(...)`.
    pub fn resolve(
        schema_id: Uuid,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            FieldFuture::new(async move {
                let result = query_contents(&ctx, schema_id).await.map(|page| {
                    Some(FieldValue::list(
                        page.items.into_iter().map(FieldValue::owned_any),
                    ))
                });
                Ok(null_on_error(&ctx, result))
            })
        }
    }

    /// Creates the resolver of `query<Schema>ContentsWithTotal(...)`.
    pub fn resolve_with_total(
        schema_id: Uuid,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            FieldFuture::new(async move {
                let result = query_contents(&ctx, schema_id)
                    .await
                    .map(|page| Some(FieldValue::owned_any(Arc::new(page))));
                Ok(null_on_error(&ctx, result))
            })
        }
    }
}

async fn find_content<'a>(
    ctx: &ResolverContext<'_>,
    schema_id: Uuid,
) -> Result<Option<FieldValue<'a>>, async_graphql::Error> {
    let id = id_argument(ctx)?;

    debug!(schema_id = %schema_id, id = %id, "Resolving single content read");

    let gql_ctx = GraphQLContext::from_resolver(ctx)?;

    let (_, item) = gql_ctx
        .content_store
        .find_content(
            &gql_ctx.app,
            schema_id,
            &gql_ctx.principal,
            id,
            EtagVersion::Any,
        )
        .await
        .map_err(|e| {
            warn!(error = %e, "Storage error reading content");
            GraphQLError::from(e).extend()
        })?;

    if item.is_none() {
        debug!(schema_id = %schema_id, id = %id, "Content not found");
    }

    Ok(item.map(|item| FieldValue::owned_any(Arc::new(item))))
}

/// Builds the OData query from the field arguments. Absent arguments are
/// left out.
fn odata_query(ctx: &ResolverContext<'_>) -> Result<ODataQuery, async_graphql::Error> {
    Ok(ODataQuery {
        top: u32_argument(ctx, "top")?,
        skip: u32_argument(ctx, "skip")?,
        search: string_argument(ctx, "search")?,
        filter: string_argument(ctx, "filter")?,
        orderby: string_argument(ctx, "orderby")?,
    })
}

async fn query_contents(
    ctx: &ResolverContext<'_>,
    schema_id: Uuid,
) -> Result<ContentPage, async_graphql::Error> {
    let query = odata_query(ctx)?;

    debug!(
        schema_id = %schema_id,
        query = %query.to_query_string(),
        "Resolving content query"
    );

    let gql_ctx = GraphQLContext::from_resolver(ctx)?;

    let (_, result) = gql_ctx
        .content_store
        .query_contents(
            &gql_ctx.app,
            schema_id,
            &gql_ctx.principal,
            &ContentQuery::OData(query),
        )
        .await
        .map_err(|e| {
            warn!(error = %e, "Storage error querying contents");
            GraphQLError::from(e).extend()
        })?;

    debug!(
        schema_id = %schema_id,
        count = result.len(),
        total = result.total,
        "Content query complete"
    );

    Ok(ContentPage::from(result))
}
