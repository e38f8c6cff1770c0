//! Shared object types: `Asset`, `AssetResultDto`, `Geolocation` and the
//! generic `Content` type.

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, Object, TypeRef};
use async_graphql::Value;
use contentgraph_core::AssetItem;

use super::content_type::add_identity_fields;
use super::field_types::{
    ASSET_RESULT_TYPE, ASSET_TYPE, CONTENT_FALLBACK_TYPE, DATETIME_SCALAR, GEOLOCATION_TYPE,
};
use crate::context::GraphQLContext;
use crate::resolvers::{AssetPage, parent_item, property_field};

/// Builds the `Asset` type.
pub fn asset_type() -> Object {
    Object::new(ASSET_TYPE)
        .description("An asset")
        .field(
            property_field::<AssetItem, _>("id", TypeRef::named_nn(TypeRef::STRING), |asset| {
                Some(Value::from(asset.id.to_string()))
            })
            .description("The id of the asset."),
        )
        .field(
            property_field::<AssetItem, _>("version", TypeRef::named_nn(TypeRef::INT), |asset| {
                Some(Value::from(asset.version))
            })
            .description("The version of the asset."),
        )
        .field(
            property_field::<AssetItem, _>("created", TypeRef::named_nn(DATETIME_SCALAR), |asset| {
                Some(Value::from(asset.created.to_rfc3339()))
            })
            .description("The date and time when the asset has been created."),
        )
        .field(
            property_field::<AssetItem, _>("createdBy", TypeRef::named_nn(TypeRef::STRING), |asset| {
                Some(Value::from(asset.created_by.to_string()))
            })
            .description("The user that has created the asset."),
        )
        .field(
            property_field::<AssetItem, _>(
                "lastModified",
                TypeRef::named_nn(DATETIME_SCALAR),
                |asset| Some(Value::from(asset.last_modified.to_rfc3339())),
            )
            .description("The date and time when the asset has been modified last."),
        )
        .field(
            property_field::<AssetItem, _>(
                "lastModifiedBy",
                TypeRef::named_nn(TypeRef::STRING),
                |asset| Some(Value::from(asset.last_modified_by.to_string())),
            )
            .description("The user that has updated the asset last."),
        )
        .field(url_field("url", TypeRef::named_nn(TypeRef::STRING), |ctx, asset| {
            Some(ctx.url_generator.asset_url(&ctx.app, asset))
        })
        .description("The url to the asset."))
        .field(url_field("thumbnailUrl", TypeRef::named(TypeRef::STRING), |ctx, asset| {
            ctx.url_generator.asset_thumbnail_url(&ctx.app, asset)
        })
        .description("The thumbnail url to the asset."))
        .field(url_field("sourceUrl", TypeRef::named(TypeRef::STRING), |ctx, asset| {
            ctx.url_generator.asset_source_url(&ctx.app, asset)
        })
        .description("The source url to the asset."))
        .field(
            property_field::<AssetItem, _>("mimeType", TypeRef::named_nn(TypeRef::STRING), |asset| {
                Some(Value::from(asset.mime_type.as_str()))
            })
            .description("The mime type."),
        )
        .field(
            property_field::<AssetItem, _>("fileName", TypeRef::named_nn(TypeRef::STRING), |asset| {
                Some(Value::from(asset.file_name.as_str()))
            })
            .description("The file name."),
        )
        .field(
            property_field::<AssetItem, _>("fileSize", TypeRef::named_nn(TypeRef::INT), |asset| {
                Some(Value::from(asset.file_size))
            })
            .description("The size of the file in bytes."),
        )
        .field(
            property_field::<AssetItem, _>("fileVersion", TypeRef::named_nn(TypeRef::INT), |asset| {
                Some(Value::from(asset.file_version))
            })
            .description("The version of the file."),
        )
        .field(
            property_field::<AssetItem, _>("isImage", TypeRef::named_nn(TypeRef::BOOLEAN), |asset| {
                Some(Value::from(asset.is_image))
            })
            .description("Determines if the uploaded file is an image."),
        )
        .field(
            property_field::<AssetItem, _>("pixelWidth", TypeRef::named(TypeRef::INT), |asset| {
                asset.pixel_width.map(Value::from)
            })
            .description("The width of the image in pixels if the asset is an image."),
        )
        .field(
            property_field::<AssetItem, _>("pixelHeight", TypeRef::named(TypeRef::INT), |asset| {
                asset.pixel_height.map(Value::from)
            })
            .description("The height of the image in pixels if the asset is an image."),
        )
}

/// Builds `AssetResultDto`, the page type of `queryAssetsWithTotal`.
pub fn asset_result_type() -> Object {
    Object::new(ASSET_RESULT_TYPE)
        .description("List of assets and total count of assets.")
        .field(
            property_field::<AssetPage, _>("total", TypeRef::named_nn(TypeRef::INT), |page| {
                Some(Value::from(page.total))
            })
            .description("The total count of assets."),
        )
        .field(
            Field::new("items", TypeRef::named_nn_list_nn(ASSET_TYPE), |ctx| {
                FieldFuture::new(async move {
                    let page = parent_item::<AssetPage>(&ctx)?;
                    Ok(Some(FieldValue::list(
                        page.items.iter().cloned().map(FieldValue::owned_any),
                    )))
                })
            })
            .description("The assets."),
        )
}

/// Builds the `Geolocation` type. Its parent value is the converted
/// `{ latitude, longitude }` object.
pub fn geolocation_type() -> Object {
    Object::new(GEOLOCATION_TYPE)
        .description("A geolocation.")
        .field(coordinate_field("latitude"))
        .field(coordinate_field("longitude"))
}

/// Builds the generic `Content` type, the item type of references whose
/// target schema is not part of the app.
pub fn content_fallback_type() -> Object {
    add_identity_fields(
        Object::new(CONTENT_FALLBACK_TYPE).description("A content item of an unknown schema."),
        "referenced",
    )
}

fn coordinate_field(name: &'static str) -> Field {
    Field::new(name, TypeRef::named_nn(TypeRef::FLOAT), move |ctx| {
        FieldFuture::new(async move {
            let value = match ctx.parent_value.as_value() {
                Some(Value::Object(obj)) => obj.get(name).cloned(),
                _ => None,
            };
            Ok(value)
        })
    })
}

fn url_field<F>(name: &str, type_ref: TypeRef, url: F) -> Field
where
    F: Fn(&GraphQLContext, &AssetItem) -> Option<String> + Send + Sync + 'static,
{
    Field::new(name, type_ref, move |ctx| {
        let value = GraphQLContext::from_resolver(&ctx).and_then(|gql_ctx| {
            let asset = parent_item::<AssetItem>(&ctx)?;
            Ok(url(gql_ctx, asset.as_ref()).map(Value::from))
        });
        FieldFuture::new(async move { value })
    })
}
