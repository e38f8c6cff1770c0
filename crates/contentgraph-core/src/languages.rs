//! Language configuration of an app.
//!
//! Every app configures the languages its localized fields are stored in.
//! One of them is the master language; every other language may declare an
//! explicit fallback list that is consulted before the master language when
//! a localized value is missing.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Configuration of a single language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageConfig {
    /// Language code, e.g. `de` or `en-US`.
    pub language: String,

    /// Languages to try, in order, when a value is missing in this language.
    #[serde(default)]
    pub fallback: Vec<String>,

    /// Whether values in this language may be left empty.
    #[serde(default)]
    pub is_optional: bool,
}

impl LanguageConfig {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            fallback: Vec::new(),
            is_optional: false,
        }
    }

    #[must_use]
    pub fn with_fallback<I, S>(mut self, fallback: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback = fallback.into_iter().map(Into::into).collect();
        self
    }
}

/// All languages of an app, in configuration order.
///
/// Deserialization goes through [`LanguagesConfig::new`], so a config whose
/// master language is not configured (including an empty list) is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawLanguagesConfig")]
pub struct LanguagesConfig {
    master: String,
    languages: Vec<LanguageConfig>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLanguagesConfig {
    master: String,
    languages: Vec<LanguageConfig>,
}

impl TryFrom<RawLanguagesConfig> for LanguagesConfig {
    type Error = CoreError;

    fn try_from(raw: RawLanguagesConfig) -> Result<Self> {
        Self::new(raw.master, raw.languages)
    }
}

impl LanguagesConfig {
    /// Builds a configuration from language codes; the first one becomes
    /// the master language.
    ///
    /// # Errors
    ///
    /// Returns an error if no language is given.
    pub fn build<I, S>(languages: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let languages: Vec<LanguageConfig> =
            languages.into_iter().map(LanguageConfig::new).collect();

        let master = languages
            .first()
            .map(|l| l.language.clone())
            .ok_or_else(|| CoreError::unknown_language(""))?;

        Ok(Self { master, languages })
    }

    /// Builds a configuration from explicit language entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the master language is not part of `languages`.
    pub fn new(master: impl Into<String>, languages: Vec<LanguageConfig>) -> Result<Self> {
        let master = master.into();
        if !languages.iter().any(|l| l.language == master) {
            return Err(CoreError::unknown_language(master));
        }
        Ok(Self { master, languages })
    }

    /// The master language.
    pub fn master(&self) -> &str {
        &self.master
    }

    /// Configured language codes, in configuration order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(|l| l.language.as_str())
    }

    pub fn contains(&self, language: &str) -> bool {
        self.get(language).is_some()
    }

    pub fn get(&self, language: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|l| l.language == language)
    }

    /// The ordered list of languages to consult for `language`: the language
    /// itself, its explicit fallbacks, then the master language. Duplicates
    /// and unconfigured languages are dropped. Empty for unknown languages.
    pub fn fallback_chain(&self, language: &str) -> Vec<&str> {
        let Some(config) = self.get(language) else {
            return Vec::new();
        };

        let mut chain: Vec<&str> = Vec::with_capacity(config.fallback.len() + 2);
        let candidates = std::iter::once(config.language.as_str())
            .chain(config.fallback.iter().map(String::as_str))
            .chain(std::iter::once(self.master.as_str()));

        for candidate in candidates {
            if self.contains(candidate) && !chain.contains(&candidate) {
                chain.push(candidate);
            }
        }

        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_single_language() {
        let config = LanguagesConfig::build(["de"]).unwrap();
        assert_eq!(config.master(), "de");
        assert_eq!(config.codes().collect::<Vec<_>>(), vec!["de"]);
        assert_eq!(config.fallback_chain("de"), vec!["de"]);
    }

    #[test]
    fn test_build_empty_fails() {
        assert!(LanguagesConfig::build(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_fallback_chain_with_explicit_fallback() {
        let config = LanguagesConfig::new(
            "en",
            vec![
                LanguageConfig::new("en"),
                LanguageConfig::new("de"),
                LanguageConfig::new("de-CH").with_fallback(["de", "unknown"]),
            ],
        )
        .unwrap();

        assert_eq!(config.fallback_chain("de-CH"), vec!["de-CH", "de", "en"]);
        assert_eq!(config.fallback_chain("de"), vec!["de", "en"]);
        assert_eq!(config.fallback_chain("en"), vec!["en"]);
        assert!(config.fallback_chain("fr").is_empty());
    }

    #[test]
    fn test_master_must_be_configured() {
        assert!(LanguagesConfig::new("fr", vec![LanguageConfig::new("en")]).is_err());
    }

    #[test]
    fn test_deserialize() {
        let json = serde_json::json!({
            "master": "en",
            "languages": [
                {"language": "en"},
                {"language": "de", "fallback": ["en"], "isOptional": true}
            ]
        });
        let config: LanguagesConfig = serde_json::from_value(json).unwrap();
        assert!(config.get("de").unwrap().is_optional);
        assert_eq!(config.fallback_chain("de"), vec!["de", "en"]);
    }

    #[test]
    fn test_deserialize_from_toml() {
        let config: LanguagesConfig = toml::from_str(
            r#"
            master = "de"

            [[languages]]
            language = "de"

            [[languages]]
            language = "en"
            "#,
        )
        .unwrap();

        assert_eq!(config.master(), "de");
        assert_eq!(config.fallback_chain("en"), vec!["en", "de"]);
    }

    #[test]
    fn test_deserialize_rejects_unconfigured_master() {
        let empty = serde_json::json!({ "master": "en", "languages": [] });
        assert!(serde_json::from_value::<LanguagesConfig>(empty).is_err());

        let missing = serde_json::json!({
            "master": "fr",
            "languages": [{ "language": "en" }]
        });
        assert!(serde_json::from_value::<LanguagesConfig>(missing).is_err());
    }
}
