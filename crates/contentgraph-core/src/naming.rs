//! Identifier helpers for deriving GraphQL names from user-defined names.
//!
//! Schema and field names are free-form (`my-schema`, `Blog Post`,
//! `en-US`), while GraphQL names must match `[_a-zA-Z][_a-zA-Z0-9]*`.
//! Names are split into words at every character outside `[a-zA-Z0-9]`;
//! everything else is dropped.

/// Converts a name to PascalCase, e.g. `my-schema` → `MySchema`.
///
/// Returns an empty string if the name contains no identifier characters.
pub fn to_pascal_case(name: &str) -> String {
    let joined: String = words(name).map(capitalize_first).collect();
    guard_leading_digit(joined)
}

/// Converts a name to camelCase, e.g. `my-string` → `myString`.
///
/// Returns an empty string if the name contains no identifier characters.
pub fn to_camel_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    for (index, word) in words(name).enumerate() {
        if index == 0 {
            result.push_str(&lowercase_first(word));
        } else {
            result.push_str(&capitalize_first(word));
        }
    }
    guard_leading_digit(result)
}

/// Keeps identifier characters and replaces every other character with `_`,
/// e.g. `en-US` → `en_US`. Used for partition keys, which keep their case.
pub fn to_identifier(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    guard_leading_digit(replaced)
}

fn words(name: &str) -> impl Iterator<Item = &str> {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_ascii_uppercase().to_string() + chars.as_str(),
    }
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_ascii_lowercase().to_string() + chars.as_str(),
    }
}

fn guard_leading_digit(name: String) -> String {
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case() {
        assert_eq!(to_pascal_case("my-schema"), "MySchema");
        assert_eq!(to_pascal_case("Blog Post"), "BlogPost");
        assert_eq!(to_pascal_case("blogPost"), "BlogPost");
        assert_eq!(to_pascal_case("my_schema_2"), "MySchema2");
        assert_eq!(to_pascal_case("2nd-schema"), "_2ndSchema");
        assert_eq!(to_pascal_case("äöü"), "");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(to_camel_case("my-string"), "myString");
        assert_eq!(to_camel_case("MyNumber"), "myNumber");
        assert_eq!(to_camel_case("my geo location"), "myGeoLocation");
        assert_eq!(to_camel_case("---"), "");
    }

    #[test]
    fn test_identifier() {
        assert_eq!(to_identifier("iv"), "iv");
        assert_eq!(to_identifier("en-US"), "en_US");
        assert_eq!(to_identifier("zh-Hant-TW"), "zh_Hant_TW");
    }
}
