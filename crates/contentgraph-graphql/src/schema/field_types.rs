//! Field type mapping.
//!
//! Maps a field kind to the GraphQL type of one partition member and
//! converts raw stored values into values of that type. Mapping never
//! fails: unknown kinds and hidden fields are skipped, and a raw value of
//! an unexpected shape converts to absent.

use std::collections::HashMap;
use std::str::FromStr;

use async_graphql::dynamic::TypeRef;
use async_graphql::indexmap::IndexMap;
use async_graphql::{Name, Value};
use contentgraph_core::{FieldDefinition, FieldKind, FieldProperties, Timestamp};
use uuid::Uuid;

/// Custom scalar for RFC 3339 date-time strings.
pub const DATETIME_SCALAR: &str = "DateTime";

/// Custom scalar for arbitrary JSON values.
pub const JSON_SCALAR: &str = "Json";

/// Shared object type of geolocation values.
pub const GEOLOCATION_TYPE: &str = "Geolocation";

/// Object type of assets.
pub const ASSET_TYPE: &str = "Asset";

/// Object type of asset pages with a total.
pub const ASSET_RESULT_TYPE: &str = "AssetResultDto";

/// Generic content type used as target of dangling references.
pub const CONTENT_FALLBACK_TYPE: &str = "Content";

/// What a reference field points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceTarget {
    /// A schema of the app.
    Schema(Uuid),
    /// A schema that is not part of the app; always resolves to `[]`.
    Dangling,
}

/// The GraphQL shape of a mapped field.
#[derive(Debug, Clone)]
pub struct FieldMapping {
    pub kind: FieldKind,
    /// Type of each partition member.
    pub type_ref: TypeRef,
    /// Set for `References` fields.
    pub target: Option<ReferenceTarget>,
}

/// Maps a field to the type of its partition members.
///
/// `targets` maps schema ids to their content type names. Returns `None`
/// for hidden fields and unknown kinds.
pub fn map_field(field: &FieldDefinition, targets: &HashMap<Uuid, String>) -> Option<FieldMapping> {
    if field.is_hidden {
        return None;
    }

    let kind = field.kind();
    let (type_ref, target) = match &field.properties {
        FieldProperties::String => (TypeRef::named(TypeRef::STRING), None),
        FieldProperties::Number => (TypeRef::named(TypeRef::FLOAT), None),
        FieldProperties::Boolean => (TypeRef::named(TypeRef::BOOLEAN), None),
        FieldProperties::DateTime => (TypeRef::named(DATETIME_SCALAR), None),
        FieldProperties::Json => (TypeRef::named(JSON_SCALAR), None),
        FieldProperties::Geolocation => (TypeRef::named(GEOLOCATION_TYPE), None),
        FieldProperties::Tags => (TypeRef::named_nn_list(TypeRef::STRING), None),
        FieldProperties::Assets => (TypeRef::named_nn_list(ASSET_TYPE), None),
        FieldProperties::References { schema_id } => {
            match schema_id.and_then(|id| targets.get(&id).map(|name| (id, name))) {
                Some((id, type_name)) => (
                    TypeRef::named_nn_list(type_name),
                    Some(ReferenceTarget::Schema(id)),
                ),
                None => (
                    TypeRef::named_nn_list(CONTENT_FALLBACK_TYPE),
                    Some(ReferenceTarget::Dangling),
                ),
            }
        }
        FieldProperties::Unknown => return None,
    };

    Some(FieldMapping {
        kind,
        type_ref,
        target,
    })
}

/// A converted field value.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
    /// A plain GraphQL value (scalars, tags, geolocation).
    Value(Value),
    /// Ids of referenced assets, still to be loaded.
    Assets(Vec<Uuid>),
    /// Ids of referenced content items, still to be loaded.
    References(Vec<Uuid>),
}

/// Converts a raw stored value. Returns `None` when the raw value is null
/// or does not have the shape the kind expects.
pub fn convert_value(kind: FieldKind, raw: &serde_json::Value) -> Option<ResolvedValue> {
    use serde_json::Value as Json;

    let value = match (kind, raw) {
        (_, Json::Null) => return None,
        (FieldKind::String, Json::String(s)) => Value::String(s.clone()),
        (FieldKind::Number, Json::Number(n)) => Value::Number(n.clone()),
        (FieldKind::Boolean, Json::Bool(b)) => Value::Boolean(*b),
        (FieldKind::DateTime, Json::String(s)) => {
            Value::String(Timestamp::from_str(s).ok()?.to_rfc3339())
        }
        (FieldKind::Json, raw) => Value::from_json(raw.clone()).ok()?,
        (FieldKind::Geolocation, Json::Object(obj)) => {
            let (Some(Json::Number(latitude)), Some(Json::Number(longitude))) =
                (obj.get("latitude"), obj.get("longitude"))
            else {
                return None;
            };

            let mut map = IndexMap::new();
            map.insert(Name::new("latitude"), Value::Number(latitude.clone()));
            map.insert(Name::new("longitude"), Value::Number(longitude.clone()));
            Value::Object(map)
        }
        (FieldKind::Tags, Json::Array(items)) => Value::List(
            items
                .iter()
                .filter_map(|item| item.as_str().map(|s| Value::String(s.to_string())))
                .collect(),
        ),
        (FieldKind::Assets, Json::Array(items)) => {
            return Some(ResolvedValue::Assets(parse_ids(items)));
        }
        (FieldKind::References, Json::Array(items)) => {
            return Some(ResolvedValue::References(parse_ids(items)));
        }
        _ => return None,
    };

    Some(ResolvedValue::Value(value))
}

fn parse_ids(items: &[serde_json::Value]) -> Vec<Uuid> {
    items
        .iter()
        .filter_map(|item| item.as_str().and_then(|s| Uuid::parse_str(s).ok()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentgraph_core::Partitioning;
    use serde_json::json;

    fn field(properties: FieldProperties) -> FieldDefinition {
        FieldDefinition::new(1, "my-field", Partitioning::Invariant, properties)
    }

    #[test]
    fn test_map_scalar_kinds() {
        let targets = HashMap::new();
        let cases = [
            (FieldProperties::String, "String"),
            (FieldProperties::Number, "Float"),
            (FieldProperties::Boolean, "Boolean"),
            (FieldProperties::DateTime, "DateTime"),
            (FieldProperties::Json, "Json"),
            (FieldProperties::Geolocation, "Geolocation"),
            (FieldProperties::Tags, "[String!]"),
            (FieldProperties::Assets, "[Asset!]"),
        ];

        for (properties, expected) in cases {
            let mapping = map_field(&field(properties), &targets).unwrap();
            assert_eq!(mapping.type_ref.to_string(), expected);
            assert!(mapping.target.is_none());
        }
    }

    #[test]
    fn test_map_references() {
        let schema_id = Uuid::new_v4();
        let targets = HashMap::from([(schema_id, "MySchemaDto".to_string())]);

        let known = field(FieldProperties::References {
            schema_id: Some(schema_id),
        });
        let mapping = map_field(&known, &targets).unwrap();
        assert_eq!(mapping.type_ref.to_string(), "[MySchemaDto!]");
        assert_eq!(mapping.target, Some(ReferenceTarget::Schema(schema_id)));

        let dangling = field(FieldProperties::References {
            schema_id: Some(Uuid::new_v4()),
        });
        let mapping = map_field(&dangling, &targets).unwrap();
        assert_eq!(mapping.type_ref.to_string(), "[Content!]");
        assert_eq!(mapping.target, Some(ReferenceTarget::Dangling));
    }

    #[test]
    fn test_skip_hidden_and_unknown() {
        let targets = HashMap::new();
        assert!(map_field(&field(FieldProperties::String).hidden(), &targets).is_none());
        assert!(map_field(&field(FieldProperties::Unknown), &targets).is_none());
    }

    #[test]
    fn test_convert_scalars() {
        assert_eq!(
            convert_value(FieldKind::String, &json!("value")),
            Some(ResolvedValue::Value(Value::from("value")))
        );
        assert_eq!(
            convert_value(FieldKind::Number, &json!(1)),
            Some(ResolvedValue::Value(Value::from(1)))
        );
        assert_eq!(
            convert_value(FieldKind::Boolean, &json!(true)),
            Some(ResolvedValue::Value(Value::from(true)))
        );
        assert_eq!(
            convert_value(FieldKind::DateTime, &json!("2024-01-01T10:00:00Z")),
            Some(ResolvedValue::Value(Value::from("2024-01-01T10:00:00Z")))
        );
    }

    #[test]
    fn test_convert_unexpected_shapes_are_absent() {
        assert!(convert_value(FieldKind::String, &json!(1)).is_none());
        assert!(convert_value(FieldKind::Number, &json!("1")).is_none());
        assert!(convert_value(FieldKind::DateTime, &json!("yesterday")).is_none());
        assert!(convert_value(FieldKind::Geolocation, &json!({"latitude": 10})).is_none());
        assert!(convert_value(FieldKind::Tags, &json!("tag")).is_none());
        assert!(convert_value(FieldKind::Assets, &json!({"id": 1})).is_none());
        assert!(convert_value(FieldKind::Json, &json!(null)).is_none());
        assert!(convert_value(FieldKind::Unknown, &json!("x")).is_none());
    }

    #[test]
    fn test_convert_geolocation() {
        let value = convert_value(
            FieldKind::Geolocation,
            &json!({"latitude": 10, "longitude": 20.5, "extra": true}),
        );
        let Some(ResolvedValue::Value(value)) = value else {
            panic!("expected a value");
        };
        assert_eq!(
            value.into_json().unwrap(),
            json!({"latitude": 10, "longitude": 20.5})
        );
    }

    #[test]
    fn test_convert_tags_drops_non_strings() {
        let value = convert_value(FieldKind::Tags, &json!(["tag1", 2, "tag2", null]));
        assert_eq!(
            value,
            Some(ResolvedValue::Value(Value::List(vec![
                Value::from("tag1"),
                Value::from("tag2")
            ])))
        );
    }

    #[test]
    fn test_convert_reference_ids() {
        let id = Uuid::new_v4();
        let value = convert_value(
            FieldKind::References,
            &json!([id.to_string(), "not-a-uuid", 5]),
        );
        assert_eq!(value, Some(ResolvedValue::References(vec![id])));

        let value = convert_value(FieldKind::Assets, &json!([id.to_string()]));
        assert_eq!(value, Some(ResolvedValue::Assets(vec![id])));
    }
}
