//! Content GraphQL schema builder.
//!
//! This module provides `ContentSchemaBuilder`, which compiles the schemas
//! of an app into a GraphQL schema. The builder uses async-graphql's dynamic
//! schema API to construct the schema at runtime.
//!
//! Compilation runs in two passes. The first pass allocates the type names
//! of every schema, so that reference fields can point at any content type
//! by name, including their own. The second pass builds the object types and
//! the query root.

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dynamic::{Field, InputValue, Object, Scalar, Schema, SchemaBuilder, TypeRef};
use async_graphql::{Request, Response};
use contentgraph_core::{App, SchemaEntity};
use tracing::{debug, trace};
use uuid::Uuid;

use super::asset_type::{asset_result_type, asset_type, content_fallback_type, geolocation_type};
use super::content_type::{ContentTypeBuilder, SchemaTypeNames};
use super::field_types::{ASSET_RESULT_TYPE, ASSET_TYPE, DATETIME_SCALAR, JSON_SCALAR};
use super::registry::{QUERY_TYPE, TypeNameRegistry};
use crate::error::GraphQLError;
use crate::resolvers::{
    AssetQueryResolver, ContentQueryResolver, DEFAULT_ASSET_TOP, FindAssetResolver,
    FindContentResolver,
};

/// Configuration for the schema builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaBuilderConfig {
    /// Whether to enable introspection queries.
    pub introspection_enabled: bool,
}

impl Default for SchemaBuilderConfig {
    fn default() -> Self {
        Self {
            introspection_enabled: true,
        }
    }
}

/// A compiled, immutable GraphQL schema of one app.
///
/// Shared between concurrent executions behind an `Arc`.
pub struct CompiledTypeGraph {
    schema: Schema,
    type_names: HashMap<Uuid, SchemaTypeNames>,
}

impl CompiledTypeGraph {
    /// The executable schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The content type name allocated for a schema.
    pub fn content_type_name(&self, schema_id: Uuid) -> Option<&str> {
        self.type_names
            .get(&schema_id)
            .map(|names| names.content.as_str())
    }

    /// The schema in SDL form.
    pub fn sdl(&self) -> String {
        self.schema.sdl()
    }

    /// Executes a request against the schema.
    pub async fn execute(&self, request: Request) -> Response {
        self.schema.execute(request).await
    }
}

impl std::fmt::Debug for CompiledTypeGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledTypeGraph")
            .field("content_types", &self.type_names.len())
            .finish_non_exhaustive()
    }
}

/// Builds a GraphQL schema from the schemas of an app.
///
/// The generated schema contains:
/// - The `DateTime` and `Json` scalars and the shared `Geolocation`,
///   `Asset`, `AssetResultDto` and `Content` types
/// - A content type family per schema (see [`ContentTypeBuilder`])
/// - Query fields per published schema plus the asset queries
///
/// # Example
///
/// ```ignore
/// let builder = ContentSchemaBuilder::new(SchemaBuilderConfig::default());
/// let graph = builder.build(&app, &schemas)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContentSchemaBuilder {
    config: SchemaBuilderConfig,
}

impl ContentSchemaBuilder {
    /// Creates a new schema builder.
    pub fn new(config: SchemaBuilderConfig) -> Self {
        Self { config }
    }

    /// Builds the GraphQL schema.
    ///
    /// Unpublished schemas get no query fields but their types are still
    /// built, so that references to them resolve.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTypeName` if two schemas (or a schema and a built-in
    /// type) derive the same type name, and `SchemaBuildFailed` if a schema
    /// name has no identifier characters or the schema does not validate.
    pub fn build(
        &self,
        app: &App,
        schemas: &[SchemaEntity],
    ) -> Result<CompiledTypeGraph, GraphQLError> {
        debug!(
            app = %app.name,
            schema_count = schemas.len(),
            "Starting GraphQL schema build"
        );

        let mut registry = TypeNameRegistry::new();

        // Pass 1: allocate type names
        let mut allocated = Vec::with_capacity(schemas.len());
        for schema in schemas {
            let names = SchemaTypeNames::new(schema.name()).ok_or_else(|| {
                GraphQLError::SchemaBuildFailed(format!(
                    "Schema name '{}' contains no identifier characters",
                    schema.name()
                ))
            })?;

            for type_name in names.all() {
                registry.claim(type_name, schema.name())?;
            }

            allocated.push((Arc::new(schema.clone()), names));
        }

        let targets: HashMap<Uuid, String> = allocated
            .iter()
            .map(|(schema, names)| (schema.id, names.content.clone()))
            .collect();

        // Pass 2: build types and the query root
        let mut schema_builder = Schema::build(QUERY_TYPE, None, None);
        schema_builder = self.register_shared_types(schema_builder);

        let mut query = Object::new(QUERY_TYPE);

        for (schema, names) in &allocated {
            let types = ContentTypeBuilder::new(schema.clone(), names, &app.languages, &targets)
                .build(&mut registry)?;

            for object in types {
                schema_builder = schema_builder.register(object);
            }

            if schema.is_published {
                query = self.add_content_query_fields(query, schema, names);
            } else {
                trace!(schema = %schema.name(), "Schema not published, no query fields");
            }
        }

        query = self.add_asset_query_fields(query);
        schema_builder = schema_builder.register(query);

        if !self.config.introspection_enabled {
            schema_builder = schema_builder.disable_introspection();
        }

        let schema = schema_builder
            .finish()
            .map_err(|e| GraphQLError::SchemaBuildFailed(e.to_string()))?;

        debug!(
            app = %app.name,
            content_types = allocated.len(),
            "GraphQL schema build complete"
        );

        Ok(CompiledTypeGraph {
            schema,
            type_names: allocated
                .into_iter()
                .map(|(schema, names)| (schema.id, names))
                .collect(),
        })
    }

    /// Registers the scalars and the types every app schema contains.
    fn register_shared_types(&self, builder: SchemaBuilder) -> SchemaBuilder {
        builder
            .register(
                Scalar::new(DATETIME_SCALAR).description("An ISO 8601 date and time (RFC 3339)"),
            )
            .register(Scalar::new(JSON_SCALAR).description("Unstructured JSON data"))
            .register(geolocation_type())
            .register(asset_type())
            .register(asset_result_type())
            .register(content_fallback_type())
    }

    /// Adds the query fields of a published schema.
    fn add_content_query_fields(
        &self,
        query: Object,
        schema: &SchemaEntity,
        names: &SchemaTypeNames,
    ) -> Object {
        let display_name = schema.display_name();

        // 1. Single read: findMySchemaContent(id: String!): MySchemaDto
        let find_field = Field::new(
            format!("find{}Content", names.pascal),
            TypeRef::named(&names.content),
            FindContentResolver::resolve(schema.id),
        )
        .argument(InputValue::new("id", TypeRef::named_nn(TypeRef::STRING)))
        .description(format!("Find an {display_name} content by id."));

        // 2. List query: queryMySchemaContents(...): [MySchemaDto!]
        let list_field = Field::new(
            format!("query{}Contents", names.pascal),
            TypeRef::named_nn_list(&names.content),
            ContentQueryResolver::resolve(schema.id),
        )
        .description(format!("Query {display_name} content items."));

        // 3. List query with total: queryMySchemaContentsWithTotal(...): MySchemaResultDto
        let total_field = Field::new(
            format!("query{}ContentsWithTotal", names.pascal),
            TypeRef::named(&names.result),
            ContentQueryResolver::resolve_with_total(schema.id),
        )
        .description(format!(
            "Query {display_name} content items with total count."
        ));

        trace!(schema = %schema.name(), "Added content query fields");

        query
            .field(find_field)
            .field(add_odata_arguments(list_field))
            .field(add_odata_arguments(total_field))
    }

    /// Adds `findAsset`, `queryAssets` and `queryAssetsWithTotal`.
    fn add_asset_query_fields(&self, query: Object) -> Object {
        let find_field = Field::new(
            "findAsset",
            TypeRef::named(ASSET_TYPE),
            FindAssetResolver::resolve(),
        )
        .argument(InputValue::new("id", TypeRef::named_nn(TypeRef::STRING)))
        .description("Find an asset by id.");

        let list_field = Field::new(
            "queryAssets",
            TypeRef::named_nn_list(ASSET_TYPE),
            AssetQueryResolver::resolve(),
        )
        .description("Get assets.");

        let total_field = Field::new(
            "queryAssetsWithTotal",
            TypeRef::named(ASSET_RESULT_TYPE),
            AssetQueryResolver::resolve_with_total(),
        )
        .description("Get assets and total count.");

        query
            .field(find_field)
            .field(add_asset_arguments(list_field))
            .field(add_asset_arguments(total_field))
    }
}

/// Adds `top`, `skip`, `search`, `filter` and `orderby`.
fn add_odata_arguments(field: Field) -> Field {
    field
        .argument(
            InputValue::new("top", TypeRef::named(TypeRef::INT))
                .description("Optional number of contents to take."),
        )
        .argument(
            InputValue::new("skip", TypeRef::named(TypeRef::INT))
                .description("Optional number of contents to skip."),
        )
        .argument(
            InputValue::new("search", TypeRef::named(TypeRef::STRING))
                .description("Optional full text search."),
        )
        .argument(
            InputValue::new("filter", TypeRef::named(TypeRef::STRING))
                .description("Optional OData filter."),
        )
        .argument(
            InputValue::new("orderby", TypeRef::named(TypeRef::STRING))
                .description("Optional OData order definition."),
        )
}

fn add_asset_arguments(field: Field) -> Field {
    field
        .argument(
            InputValue::new("top", TypeRef::named(TypeRef::INT))
                .default_value(DEFAULT_ASSET_TOP)
                .description("Optional number of assets to take."),
        )
        .argument(
            InputValue::new("skip", TypeRef::named(TypeRef::INT))
                .default_value(0)
                .description("Optional number of assets to skip."),
        )
        .argument(
            InputValue::new("search", TypeRef::named(TypeRef::STRING))
                .description("Optional query to limit the files by name."),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentgraph_core::{
        FieldDefinition, FieldProperties, LanguagesConfig, Partitioning, SchemaDefinition,
    };

    fn app() -> App {
        App::new(
            Uuid::new_v4(),
            "my-app",
            LanguagesConfig::build(["de", "en-US"]).unwrap(),
        )
    }

    fn schema(name: &str, fields: Vec<FieldDefinition>) -> SchemaEntity {
        let definition = fields
            .into_iter()
            .fold(SchemaDefinition::new(name), SchemaDefinition::add_field);
        SchemaEntity::new(Uuid::new_v4(), definition)
    }

    fn string_field(id: u64, name: &str) -> FieldDefinition {
        FieldDefinition::new(id, name, Partitioning::Language, FieldProperties::String)
    }

    #[test]
    fn test_default_config() {
        let config = SchemaBuilderConfig::default();
        assert!(config.introspection_enabled);
    }

    #[test]
    fn test_builds_schema_without_content_types() {
        let graph = ContentSchemaBuilder::default().build(&app(), &[]).unwrap();
        let sdl = graph.sdl();

        assert!(sdl.contains("findAsset"));
        assert!(sdl.contains("queryAssetsWithTotal"));
        assert!(sdl.contains("type Asset"));
        assert!(sdl.contains("type AssetResultDto"));
        assert!(sdl.contains("scalar DateTime"));
    }

    #[test]
    fn test_builds_content_types_and_queries() {
        let my_schema = schema("my-schema", vec![string_field(1, "my-string")]);
        let schema_id = my_schema.id;

        let graph = ContentSchemaBuilder::default()
            .build(&app(), &[my_schema])
            .unwrap();
        let sdl = graph.sdl();

        assert_eq!(graph.content_type_name(schema_id), Some("MySchemaDto"));
        assert!(sdl.contains("type MySchemaDto"));
        assert!(sdl.contains("type MySchemaDataDto"));
        assert!(sdl.contains("type MySchemaDataMyStringDto"));
        assert!(sdl.contains("type MySchemaResultDto"));
        assert!(sdl.contains("en_US: String"));
        assert!(sdl.contains("findMySchemaContent"));
        assert!(sdl.contains("queryMySchemaContents"));
        assert!(sdl.contains("queryMySchemaContentsWithTotal"));
    }

    #[test]
    fn test_schema_without_mapped_fields_has_no_data() {
        let empty = schema(
            "empty",
            vec![string_field(1, "hidden").hidden()],
        );

        let graph = ContentSchemaBuilder::default().build(&app(), &[empty]).unwrap();
        let sdl = graph.sdl();

        assert!(sdl.contains("type EmptyDto"));
        assert!(!sdl.contains("EmptyDataDto"));
    }

    #[test]
    fn test_recursive_references_compile() {
        let (author_id, post_id) = (Uuid::new_v4(), Uuid::new_v4());
        let references = |id: u64, name: &str, target: Uuid| {
            FieldDefinition::new(
                id,
                name,
                Partitioning::Invariant,
                FieldProperties::References {
                    schema_id: Some(target),
                },
            )
        };

        let author = SchemaEntity::new(
            author_id,
            SchemaDefinition::new("author")
                .add_field(references(1, "posts", post_id))
                .add_field(references(2, "mentor", author_id)),
        );
        let post = SchemaEntity::new(
            post_id,
            SchemaDefinition::new("post").add_field(references(1, "authors", author_id)),
        );

        let graph = ContentSchemaBuilder::default()
            .build(&app(), &[author, post])
            .unwrap();
        let sdl = graph.sdl();

        assert!(sdl.contains("type AuthorDataPostsDto"));
        assert!(sdl.contains("type AuthorDataMentorDto"));
        assert!(sdl.contains("type PostDataAuthorsDto"));
        assert!(sdl.contains("iv: [PostDto!]"));
        assert!(sdl.contains("iv: [AuthorDto!]"));
    }

    #[test]
    fn test_unpublished_schema_has_types_but_no_queries() {
        let draft = schema("draft", vec![string_field(1, "title")]).unpublished();
        let blog = schema(
            "blog",
            vec![FieldDefinition::new(
                1,
                "drafts",
                Partitioning::Invariant,
                FieldProperties::References {
                    schema_id: Some(draft.id),
                },
            )],
        );
        let draft_id = draft.id;

        let graph = ContentSchemaBuilder::default()
            .build(&app(), &[draft, blog])
            .unwrap();
        let sdl = graph.sdl();

        assert_eq!(graph.content_type_name(draft_id), Some("DraftDto"));
        assert!(sdl.contains("type DraftDto"));
        assert!(sdl.contains("iv: [DraftDto!]"));
        assert!(!sdl.contains("findDraftContent"));
        assert!(sdl.contains("findBlogContent"));
    }

    #[test]
    fn test_duplicate_type_names_fail() {
        let first = schema("my-schema", vec![]);
        let second = schema("my_schema", vec![]);

        let err = ContentSchemaBuilder::default()
            .build(&app(), &[first, second])
            .unwrap_err();

        assert!(matches!(
            err,
            GraphQLError::DuplicateTypeName { ref type_name, .. } if type_name == "MySchemaDto"
        ));
    }

    #[test]
    fn test_schema_colliding_with_builtin_type_fails() {
        let err = ContentSchemaBuilder::default()
            .build(&app(), &[schema("asset", vec![])])
            .unwrap_err();

        assert!(matches!(
            err,
            GraphQLError::DuplicateTypeName { ref type_name, .. } if type_name == "AssetResultDto"
        ));
    }

    #[test]
    fn test_schema_name_without_identifier_fails() {
        let err = ContentSchemaBuilder::default()
            .build(&app(), &[schema("--", vec![])])
            .unwrap_err();

        assert!(matches!(err, GraphQLError::SchemaBuildFailed(_)));
    }

    #[test]
    fn test_schema_with_disabled_introspection() {
        let builder = ContentSchemaBuilder::new(SchemaBuilderConfig {
            introspection_enabled: false,
        });

        assert!(builder.build(&app(), &[]).is_ok());
    }
}
