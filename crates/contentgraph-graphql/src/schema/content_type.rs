//! Content object types.
//!
//! Every schema of an app compiles into a family of object types:
//!
//! - `<Schema>Dto`: a content item with identity and audit fields, its `url`
//!   and, when at least one field maps, its `data`
//! - `<Schema>DataDto`: one member per mapped field
//! - `<Schema>Data<Field>Dto`: one member per partition key of the field
//! - `<Schema>ResultDto`: a page of items with the total count
//!
//! Content items travel through the tree as `Arc<ContentItem>` parent
//! values, so the field objects read from the same item as their content.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, Object, ResolverContext, TypeRef};
use async_graphql::{ErrorExtensions, Value};
use contentgraph_core::naming::{to_camel_case, to_identifier, to_pascal_case};
use contentgraph_core::{ContentItem, FieldDefinition, FieldKind, LanguagesConfig, SchemaEntity};
use tracing::{trace, warn};
use uuid::Uuid;

use super::field_types::{
    DATETIME_SCALAR, FieldMapping, ReferenceTarget, ResolvedValue, map_field,
};
use super::registry::TypeNameRegistry;
use super::values::resolve_field;
use crate::context::GraphQLContext;
use crate::error::GraphQLError;
use crate::resolvers::{ContentPage, null_on_error, parent_item, property_field};

/// The type names allocated for one schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaTypeNames {
    /// PascalCase form of the schema name.
    pub pascal: String,
    /// `<Pascal>Dto`
    pub content: String,
    /// `<Pascal>DataDto`
    pub data: String,
    /// `<Pascal>ResultDto`
    pub result: String,
}

impl SchemaTypeNames {
    /// Derives the type names of a schema. Returns `None` if the name has
    /// no identifier characters.
    pub fn new(schema_name: &str) -> Option<Self> {
        let pascal = to_pascal_case(schema_name);
        if pascal.is_empty() {
            return None;
        }

        Some(Self {
            content: format!("{pascal}Dto"),
            data: format!("{pascal}DataDto"),
            result: format!("{pascal}ResultDto"),
            pascal,
        })
    }

    /// Name of the object type of one data field.
    pub fn data_field(&self, field_pascal: &str) -> String {
        format!("{}Data{}Dto", self.pascal, field_pascal)
    }

    /// The names claimed in the first compile pass.
    pub fn all(&self) -> [&str; 3] {
        [&self.content, &self.data, &self.result]
    }
}

/// Adds `id`, `version` and the audit fields to a content object type.
pub(crate) fn add_identity_fields(object: Object, display_name: &str) -> Object {
    object
        .field(
            property_field::<ContentItem, _>("id", TypeRef::named_nn(TypeRef::STRING), |item| {
                Some(Value::from(item.id.to_string()))
            })
            .description(format!("The id of the {display_name} content.")),
        )
        .field(
            property_field::<ContentItem, _>("version", TypeRef::named_nn(TypeRef::INT), |item| {
                Some(Value::from(item.version))
            })
            .description(format!("The version of the {display_name} content.")),
        )
        .field(
            property_field::<ContentItem, _>("created", TypeRef::named_nn(DATETIME_SCALAR), |item| {
                Some(Value::from(item.created.to_rfc3339()))
            })
            .description(format!("The date and time when the {display_name} content has been created.")),
        )
        .field(
            property_field::<ContentItem, _>("createdBy", TypeRef::named_nn(TypeRef::STRING), |item| {
                Some(Value::from(item.created_by.to_string()))
            })
            .description(format!("The user that has created the {display_name} content.")),
        )
        .field(
            property_field::<ContentItem, _>(
                "lastModified",
                TypeRef::named_nn(DATETIME_SCALAR),
                |item| Some(Value::from(item.last_modified.to_rfc3339())),
            )
            .description(format!("The date and time when the {display_name} content has been modified last.")),
        )
        .field(
            property_field::<ContentItem, _>(
                "lastModifiedBy",
                TypeRef::named_nn(TypeRef::STRING),
                |item| Some(Value::from(item.last_modified_by.to_string())),
            )
            .description(format!("The user that has updated the {display_name} content last.")),
        )
}

/// Builds the object types of one schema.
pub struct ContentTypeBuilder<'a> {
    schema: Arc<SchemaEntity>,
    names: &'a SchemaTypeNames,
    languages: &'a LanguagesConfig,
    targets: &'a HashMap<Uuid, String>,
}

impl<'a> ContentTypeBuilder<'a> {
    /// `targets` maps the ids of all schemas of the app to their content
    /// type names.
    pub fn new(
        schema: Arc<SchemaEntity>,
        names: &'a SchemaTypeNames,
        languages: &'a LanguagesConfig,
        targets: &'a HashMap<Uuid, String>,
    ) -> Self {
        Self {
            schema,
            names,
            languages,
            targets,
        }
    }

    /// Builds the content, data, data field and result types.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTypeName` if a data field type name is already
    /// taken.
    pub fn build(&self, registry: &mut TypeNameRegistry) -> Result<Vec<Object>, GraphQLError> {
        let display_name = self.schema.display_name();
        let (data_type, field_types) = self.build_data_types(registry)?;

        let mut content = add_identity_fields(
            Object::new(&self.names.content)
                .description(format!("The structure of a {display_name} content type.")),
            display_name,
        )
        .field(self.url_field());

        if data_type.is_some() {
            content = content.field(
                Field::new("data", TypeRef::named_nn(&self.names.data), |ctx| {
                    FieldFuture::new(async move {
                        let item = parent_item::<ContentItem>(&ctx)?.clone();
                        Ok(Some(FieldValue::owned_any(item)))
                    })
                })
                .description(format!("The data of the {display_name} content.")),
            );
        }

        let mut objects = vec![content, self.result_type()];
        objects.extend(data_type);
        objects.extend(field_types);

        trace!(
            schema = %self.schema.name(),
            type_name = %self.names.content,
            type_count = objects.len(),
            "Built content types"
        );

        Ok(objects)
    }

    fn url_field(&self) -> Field {
        let schema = self.schema.clone();

        Field::new("url", TypeRef::named_nn(TypeRef::STRING), move |ctx| {
            let schema = schema.clone();
            FieldFuture::new(async move {
                let gql_ctx = GraphQLContext::from_resolver(&ctx)?;
                let item = parent_item::<ContentItem>(&ctx)?;

                let url = gql_ctx
                    .url_generator
                    .content_url(&gql_ctx.app, &schema, item.id);

                Ok(Some(Value::from(url)))
            })
        })
        .description(format!(
            "The url to the {} content.",
            self.schema.display_name()
        ))
    }

    fn result_type(&self) -> Object {
        let display_name = self.schema.display_name();

        Object::new(&self.names.result)
            .description(format!("List of {display_name} items and total count."))
            .field(
                property_field::<ContentPage, _>("total", TypeRef::named_nn(TypeRef::INT), |page| {
                    Some(Value::from(page.total))
                })
                .description(format!("The total count of {display_name} items.")),
            )
            .field(
                Field::new(
                    "items",
                    TypeRef::named_nn_list_nn(&self.names.content),
                    |ctx| {
                        FieldFuture::new(async move {
                            let page = parent_item::<ContentPage>(&ctx)?;
                            Ok(Some(FieldValue::list(
                                page.items.iter().cloned().map(FieldValue::owned_any),
                            )))
                        })
                    },
                )
                .description(format!("The {display_name} items.")),
            )
    }

    /// Builds the data type and its field types. The data type is `None`
    /// when no field maps.
    fn build_data_types(
        &self,
        registry: &mut TypeNameRegistry,
    ) -> Result<(Option<Object>, Vec<Object>), GraphQLError> {
        let display_name = self.schema.display_name();
        let mut data = Object::new(&self.names.data)
            .description(format!("The structure of the {display_name} data type."));
        let mut field_types = Vec::new();
        let mut member_names = HashSet::new();

        for field in &self.schema.definition.fields {
            let Some(mapping) = map_field(field, self.targets) else {
                trace!(schema = %self.schema.name(), field = %field.name, "Skipping unmapped field");
                continue;
            };

            if field.partitioning.keys(self.languages).is_empty() {
                warn!(
                    schema = %self.schema.name(),
                    field = %field.name,
                    "Skipping field without partition keys"
                );
                continue;
            }

            let member_name = to_camel_case(&field.name);
            let field_pascal = to_pascal_case(&field.name);

            if member_name.is_empty() {
                warn!(
                    schema = %self.schema.name(),
                    field = %field.name,
                    "Skipping field without identifier characters"
                );
                continue;
            }

            if !member_names.insert(member_name.clone()) {
                warn!(
                    schema = %self.schema.name(),
                    field = %field.name,
                    name = %member_name,
                    "Skipping field with duplicate GraphQL name"
                );
                continue;
            }

            if mapping.target == Some(ReferenceTarget::Dangling) {
                warn!(
                    schema = %self.schema.name(),
                    field = %field.name,
                    "Reference field targets a schema outside the app; it resolves to an empty list"
                );
            }

            let type_name = self.names.data_field(&field_pascal);
            registry.claim(&type_name, self.schema.name())?;

            field_types.push(self.field_type(&type_name, field, mapping));

            let field_name = field.name.clone();
            data = data.field(
                Field::new(&member_name, TypeRef::named(&type_name), move |ctx| {
                    let field_name = field_name.clone();
                    FieldFuture::new(async move {
                        let item = parent_item::<ContentItem>(&ctx)?;

                        // no value under any key
                        if item.field(&field_name).is_none() {
                            return Ok(None);
                        }

                        Ok(Some(FieldValue::owned_any(item.clone())))
                    })
                })
                .description(format!("The {display_name} field '{}'.", field.name)),
            );
        }

        if field_types.is_empty() {
            return Ok((None, Vec::new()));
        }

        Ok((Some(data), field_types))
    }

    /// Builds `<Schema>Data<Field>Dto` with one member per partition key.
    fn field_type(&self, type_name: &str, field: &FieldDefinition, mapping: FieldMapping) -> Object {
        let field = Arc::new(field.clone());
        let mut object = Object::new(type_name)
            .description(format!("The structure of the {} field.", field.name));
        let mut member_names = HashSet::new();

        for key in field.partitioning.keys(self.languages) {
            let member_name = to_identifier(key);
            if !member_names.insert(member_name.clone()) {
                continue;
            }

            let field = field.clone();
            let key = key.to_string();
            let kind = mapping.kind;
            let target = mapping.target;

            object = object.field(
                Field::new(&member_name, mapping.type_ref.clone(), move |ctx| {
                    let field = field.clone();
                    let key = key.clone();
                    FieldFuture::new(async move {
                        let result = partition_value(&ctx, &field, &key, kind, target).await;
                        Ok(null_on_error(&ctx, result))
                    })
                }),
            );
        }

        object
    }
}

/// Resolves one partition member of a content item's field. Store failures
/// while loading references surface as an error on this member only.
async fn partition_value<'a>(
    ctx: &ResolverContext<'_>,
    field: &FieldDefinition,
    key: &str,
    kind: FieldKind,
    target: Option<ReferenceTarget>,
) -> Result<Option<FieldValue<'a>>, async_graphql::Error> {
    let gql_ctx = GraphQLContext::from_resolver(ctx)?;
    let item = parent_item::<ContentItem>(ctx)?;

    let Some(value) = resolve_field(item, field, &gql_ctx.app.languages, key) else {
        return Ok(None);
    };

    member_value(gql_ctx, kind, target, value).await.map(Some)
}

/// Turns a converted value into the value of a partition member, loading
/// referenced assets and contents through the request's loaders.
async fn member_value<'a>(
    gql_ctx: &GraphQLContext,
    kind: FieldKind,
    target: Option<ReferenceTarget>,
    value: ResolvedValue,
) -> Result<FieldValue<'a>, async_graphql::Error> {
    match value {
        ResolvedValue::Value(Value::List(items)) if kind == FieldKind::Tags => {
            Ok(FieldValue::list(items.into_iter().map(FieldValue::value)))
        }
        ResolvedValue::Value(value) => Ok(FieldValue::value(value)),
        ResolvedValue::Assets(ids) => {
            let assets = gql_ctx
                .loaders
                .load_assets(&ids)
                .await
                .map_err(|e| e.extend())?;

            Ok(FieldValue::list(assets.into_iter().map(FieldValue::owned_any)))
        }
        ResolvedValue::References(ids) => {
            let Some(ReferenceTarget::Schema(schema_id)) = target else {
                return Ok(FieldValue::list(Vec::<FieldValue<'a>>::new()));
            };

            let contents = gql_ctx
                .loaders
                .load_contents(schema_id, &ids)
                .await
                .map_err(|e| e.extend())?;

            Ok(FieldValue::list(contents.into_iter().map(FieldValue::owned_any)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        let names = SchemaTypeNames::new("my-schema").unwrap();
        assert_eq!(names.pascal, "MySchema");
        assert_eq!(names.content, "MySchemaDto");
        assert_eq!(names.data, "MySchemaDataDto");
        assert_eq!(names.result, "MySchemaResultDto");
        assert_eq!(names.data_field("MyString"), "MySchemaDataMyStringDto");
    }

    #[test]
    fn test_type_names_need_identifier_characters() {
        assert!(SchemaTypeNames::new("---").is_none());
        assert_eq!(SchemaTypeNames::new("1st").unwrap().content, "_1stDto");
    }
}
