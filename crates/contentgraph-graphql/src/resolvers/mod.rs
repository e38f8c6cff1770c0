//! GraphQL resolvers.
//!
//! Root resolvers live in the submodules:
//! - `content`: `find<Schema>Content`, `query<Schema>Contents` and
//!   `query<Schema>ContentsWithTotal`
//! - `asset`: `findAsset`, `queryAssets` and `queryAssetsWithTotal`
//!
//! The helpers below are shared with the object types built in
//! [`crate::schema`], whose field resolvers read their parent value.

mod asset;
mod content;

pub use asset::{AssetPage, AssetQueryResolver, DEFAULT_ASSET_TOP, FindAssetResolver};
pub use content::{ContentPage, ContentQueryResolver, FindContentResolver};

use std::sync::Arc;

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, ResolverContext, TypeRef};
use async_graphql::{ErrorExtensions, Value};
use uuid::Uuid;

use crate::error::GraphQLError;

/// Returns the parent value of an object field, stored as `Arc<T>`.
pub(crate) fn parent_item<'a, T>(ctx: &'a ResolverContext<'_>) -> Result<&'a Arc<T>, async_graphql::Error>
where
    T: Send + Sync + 'static,
{
    ctx.parent_value.try_downcast_ref::<Arc<T>>()
}

/// Resolves a field to `null` when `result` failed and records the error
/// at the field's own path.
///
/// The engine drops a failed field from its parent object, which nulls the
/// parent chain; resolving to `null` keeps the field and its siblings.
pub(crate) fn null_on_error<'a>(
    ctx: &ResolverContext<'_>,
    result: Result<Option<FieldValue<'a>>, async_graphql::Error>,
) -> Option<FieldValue<'a>> {
    match result {
        Ok(value) => value,
        Err(error) => {
            ctx.add_error(ctx.set_error_path(error.into_server_error(ctx.item.pos)));
            None
        }
    }
}

/// Creates a field that reads a plain value from an `Arc<T>` parent.
///
/// `get` returning `None` resolves the field to `null`.
pub(crate) fn property_field<T, F>(name: &str, type_ref: TypeRef, get: F) -> Field
where
    T: Send + Sync + 'static,
    F: Fn(&T) -> Option<Value> + Send + Sync + 'static,
{
    Field::new(name, type_ref, move |ctx| {
        let value = parent_item::<T>(&ctx).map(|item| get(item.as_ref()));
        FieldFuture::new(async move { value })
    })
}

/// Reads the required `id` argument.
pub(crate) fn id_argument(ctx: &ResolverContext<'_>) -> Result<Uuid, async_graphql::Error> {
    let id = ctx.args.try_get("id")?.string()?;

    Uuid::parse_str(id)
        .map_err(|_| GraphQLError::InvalidQuery(format!("'{id}' is not a valid id")).extend())
}

/// Reads an optional non-negative integer argument such as `top` or `skip`.
pub(crate) fn u32_argument(
    ctx: &ResolverContext<'_>,
    name: &str,
) -> Result<Option<u32>, async_graphql::Error> {
    let Some(value) = ctx.args.get(name).filter(|v| !v.is_null()) else {
        return Ok(None);
    };

    let number = value.i64()?;
    u32::try_from(number).map(Some).map_err(|_| {
        GraphQLError::InvalidQuery(format!(
            "Argument '{name}' must be between 0 and {}, got {number}",
            u32::MAX
        ))
        .extend()
    })
}

/// Reads an optional string argument. Blank strings count as absent.
pub(crate) fn string_argument(
    ctx: &ResolverContext<'_>,
    name: &str,
) -> Result<Option<String>, async_graphql::Error> {
    let Some(value) = ctx.args.get(name).filter(|v| !v.is_null()) else {
        return Ok(None);
    };

    let value = value.string()?;
    Ok((!value.trim().is_empty()).then(|| value.to_string()))
}
