//! Value resolution with language fallback.

use contentgraph_core::{
    ContentItem, FieldDefinition, INVARIANT_KEY, LanguagesConfig, Partitioning,
};

use super::field_types::{ResolvedValue, convert_value};

/// Looks up the raw value of `field` for partition `key`.
///
/// Localized fields walk the fallback chain of `key` and return the first
/// present, non-null value. Invariant fields only answer to `iv`. Anything
/// else is absent.
pub fn resolve_value<'a>(
    item: &'a ContentItem,
    field: &FieldDefinition,
    languages: &LanguagesConfig,
    key: &str,
) -> Option<&'a serde_json::Value> {
    let values = item.field(&field.name)?;

    if !field.partitioning.is_valid_key(key, languages) {
        return None;
    }

    match field.partitioning {
        Partitioning::Invariant => values.get(INVARIANT_KEY).filter(|v| !v.is_null()),
        Partitioning::Language => languages
            .fallback_chain(key)
            .into_iter()
            .find_map(|language| values.get(language).filter(|v| !v.is_null())),
    }
}

/// Looks up and converts the value of `field` for partition `key`.
pub fn resolve_field(
    item: &ContentItem,
    field: &FieldDefinition,
    languages: &LanguagesConfig,
    key: &str,
) -> Option<ResolvedValue> {
    resolve_value(item, field, languages, key).and_then(|raw| convert_value(field.kind(), raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentgraph_core::{
        ContentData, FieldProperties, LanguageConfig, RefToken, now_utc,
    };
    use serde_json::json;
    use uuid::Uuid;

    fn item(data: serde_json::Value) -> ContentItem {
        let now = now_utc();
        ContentItem {
            id: Uuid::new_v4(),
            schema_id: Uuid::new_v4(),
            version: 1,
            created: now,
            created_by: RefToken::subject("user1"),
            last_modified: now,
            last_modified_by: RefToken::subject("user2"),
            data: serde_json::from_value::<ContentData>(data).unwrap(),
        }
    }

    fn languages() -> LanguagesConfig {
        LanguagesConfig::new(
            "en",
            vec![
                LanguageConfig::new("en"),
                LanguageConfig::new("de").with_fallback(["fr"]),
                LanguageConfig::new("fr"),
                LanguageConfig::new("it"),
            ],
        )
        .unwrap()
    }

    fn localized(name: &str) -> FieldDefinition {
        FieldDefinition::new(1, name, Partitioning::Language, FieldProperties::String)
    }

    fn invariant(name: &str) -> FieldDefinition {
        FieldDefinition::new(2, name, Partitioning::Invariant, FieldProperties::Number)
    }

    #[test]
    fn test_localized_value_direct_hit() {
        let item = item(json!({"title": {"de": "Hallo", "en": "Hello"}}));
        let value = resolve_value(&item, &localized("title"), &languages(), "de");
        assert_eq!(value, Some(&json!("Hallo")));
    }

    #[test]
    fn test_localized_value_explicit_fallback_first() {
        let item = item(json!({"title": {"fr": "Bonjour", "en": "Hello"}}));
        let value = resolve_value(&item, &localized("title"), &languages(), "de");
        assert_eq!(value, Some(&json!("Bonjour")));
    }

    #[test]
    fn test_localized_value_master_fallback() {
        let item = item(json!({"title": {"en": "Hello", "de": null}}));
        let value = resolve_value(&item, &localized("title"), &languages(), "de");
        assert_eq!(value, Some(&json!("Hello")));

        let value = resolve_value(&item, &localized("title"), &languages(), "it");
        assert_eq!(value, Some(&json!("Hello")));
    }

    #[test]
    fn test_localized_value_absent_everywhere() {
        let item = item(json!({"title": {"it": "Ciao"}}));
        assert!(resolve_value(&item, &localized("title"), &languages(), "de").is_none());
        assert!(resolve_value(&item, &localized("other"), &languages(), "it").is_none());
    }

    #[test]
    fn test_localized_value_unknown_language() {
        let item = item(json!({"title": {"es": "Hola", "en": "Hello"}}));
        assert!(resolve_value(&item, &localized("title"), &languages(), "es").is_none());
        assert!(resolve_value(&item, &localized("title"), &languages(), "iv").is_none());
    }

    #[test]
    fn test_invariant_isolation() {
        let item = item(json!({"count": {"iv": 1, "de": 2}}));
        let field = invariant("count");
        assert_eq!(
            resolve_value(&item, &field, &languages(), "iv"),
            Some(&json!(1))
        );
        assert!(resolve_value(&item, &field, &languages(), "de").is_none());
        assert!(resolve_value(&item, &field, &languages(), "en").is_none());
    }

    #[test]
    fn test_resolve_field_converts() {
        let item = item(json!({"count": {"iv": 42}, "title": {"en": 7}}));
        assert_eq!(
            resolve_field(&item, &invariant("count"), &languages(), "iv"),
            Some(ResolvedValue::Value(async_graphql::Value::from(42)))
        );
        // wrong shape for a string field
        assert!(resolve_field(&item, &localized("title"), &languages(), "en").is_none());
    }
}
