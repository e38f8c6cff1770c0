use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::languages::LanguagesConfig;

/// An app is the tenant that owns schemas, content and assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub id: Uuid,
    pub name: String,
    /// Bumped whenever app-level settings (such as languages) change.
    pub version: i64,
    pub languages: LanguagesConfig,
}

impl App {
    pub fn new(id: Uuid, name: impl Into<String>, languages: LanguagesConfig) -> Self {
        Self {
            id,
            name: name.into(),
            version: 0,
            languages,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }
}

/// The identity a query runs as. Passed through to the stores, which apply
/// their own permission checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub subject: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Principal {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn subject(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            roles: Vec::new(),
        }
    }
}
