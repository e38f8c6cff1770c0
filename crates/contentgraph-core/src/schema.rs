//! Schema and field definitions.
//!
//! A schema is the content type of an app: an ordered list of typed fields.
//! Schema definitions are immutable per version; editing a schema produces a
//! new [`SchemaEntity`] with a higher version.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::languages::LanguagesConfig;

/// Partition key of invariant (non-localized) values.
pub const INVARIANT_KEY: &str = "iv";

/// How the values of a field are partitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Partitioning {
    /// A single value stored under [`INVARIANT_KEY`].
    #[default]
    Invariant,
    /// One value per configured app language.
    Language,
}

impl Partitioning {
    /// The legal partition keys for this partitioning.
    pub fn keys<'a>(&self, languages: &'a LanguagesConfig) -> Vec<&'a str> {
        match self {
            Self::Invariant => vec![INVARIANT_KEY],
            Self::Language => languages.codes().collect(),
        }
    }

    pub fn is_valid_key(&self, key: &str, languages: &LanguagesConfig) -> bool {
        match self {
            Self::Invariant => key == INVARIANT_KEY,
            Self::Language => languages.contains(key),
        }
    }
}

/// The kind of a field, without its kind-specific properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    DateTime,
    Json,
    Tags,
    Geolocation,
    Assets,
    References,
    Unknown,
}

/// Kind-specific field properties, tagged by `fieldType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "fieldType")]
pub enum FieldProperties {
    String,
    Number,
    Boolean,
    DateTime,
    Json,
    Tags,
    Geolocation,
    Assets,
    References {
        /// The schema the referenced content items belong to.
        #[serde(rename = "schemaId", default)]
        schema_id: Option<Uuid>,
    },
    /// A field kind this crate does not know about.
    #[serde(other)]
    Unknown,
}

impl FieldProperties {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::String => FieldKind::String,
            Self::Number => FieldKind::Number,
            Self::Boolean => FieldKind::Boolean,
            Self::DateTime => FieldKind::DateTime,
            Self::Json => FieldKind::Json,
            Self::Tags => FieldKind::Tags,
            Self::Geolocation => FieldKind::Geolocation,
            Self::Assets => FieldKind::Assets,
            Self::References { .. } => FieldKind::References,
            Self::Unknown => FieldKind::Unknown,
        }
    }
}

/// A single field of a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Numeric field id, stable across renames.
    pub id: u64,
    /// Field name, also the key in [`crate::ContentData`].
    pub name: String,
    #[serde(default)]
    pub partitioning: Partitioning,
    /// Hidden fields are not exposed through the API.
    #[serde(default)]
    pub is_hidden: bool,
    pub properties: FieldProperties,
}

impl FieldDefinition {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        partitioning: Partitioning,
        properties: FieldProperties,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            partitioning,
            is_hidden: false,
            properties,
        }
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    pub fn kind(&self) -> FieldKind {
        self.properties.kind()
    }
}

/// The ordered field list of a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDefinition {
    /// Schema slug, e.g. `my-schema`.
    pub name: String,
    /// Optional human readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl SchemaDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn add_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// The label, or the name when no (non-blank) label is set.
    pub fn display_name(&self) -> &str {
        match &self.label {
            Some(label) if !label.trim().is_empty() => label,
            _ => &self.name,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A versioned schema as loaded for an app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaEntity {
    pub id: Uuid,
    pub version: i64,
    /// Unpublished schemas are not queryable but remain reference targets.
    pub is_published: bool,
    pub definition: SchemaDefinition,
}

impl SchemaEntity {
    pub fn new(id: Uuid, definition: SchemaDefinition) -> Self {
        Self {
            id,
            version: 0,
            is_published: true,
            definition,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn unpublished(mut self) -> Self {
        self.is_published = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn display_name(&self) -> &str {
        self.definition.display_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_keys() {
        let languages = LanguagesConfig::build(["de", "en"]).unwrap();
        assert_eq!(Partitioning::Invariant.keys(&languages), vec!["iv"]);
        assert_eq!(Partitioning::Language.keys(&languages), vec!["de", "en"]);
        assert!(Partitioning::Invariant.is_valid_key("iv", &languages));
        assert!(!Partitioning::Invariant.is_valid_key("de", &languages));
        assert!(!Partitioning::Language.is_valid_key("iv", &languages));
    }

    #[test]
    fn test_display_name_falls_back_to_name() {
        let def = SchemaDefinition::new("my-schema");
        assert_eq!(def.display_name(), "my-schema");

        let def = def.with_label("Blog Post");
        assert_eq!(def.display_name(), "Blog Post");

        let def = SchemaDefinition::new("my-schema").with_label("   ");
        assert_eq!(def.display_name(), "my-schema");
    }

    #[test]
    fn test_deserialize_field_properties() {
        let json = serde_json::json!({
            "id": 7,
            "name": "my-references",
            "partitioning": "invariant",
            "properties": {
                "fieldType": "References",
                "schemaId": "8f0e4c54-44b8-4e5c-a4a7-5d9f0a6b0c11"
            }
        });
        let field: FieldDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(field.kind(), FieldKind::References);
        assert!(!field.is_hidden);
    }

    #[test]
    fn test_deserialize_unknown_field_kind() {
        let json = serde_json::json!({
            "id": 1,
            "name": "my-ui",
            "properties": { "fieldType": "UI" }
        });
        let field: FieldDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(field.kind(), FieldKind::Unknown);
        assert_eq!(field.partitioning, Partitioning::Invariant);
    }
}
