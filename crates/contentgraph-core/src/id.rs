// Identifiers and actor references.
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{CoreError, Result};

pub fn generate_id() -> Uuid {
    Uuid::new_v4()
}

/// Reference to the actor that touched an entity, written `type:identifier`
/// (for example `subject:user1` or `client:frontend`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefToken {
    pub token_type: String,
    pub identifier: String,
}

impl RefToken {
    pub fn new(token_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            token_type: token_type.into(),
            identifier: identifier.into(),
        }
    }

    pub fn subject(identifier: impl Into<String>) -> Self {
        Self::new("subject", identifier)
    }
}

impl fmt::Display for RefToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.token_type, self.identifier)
    }
}

impl FromStr for RefToken {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let (token_type, identifier) = s
            .split_once(':')
            .ok_or_else(|| CoreError::invalid_ref_token(s))?;

        let token_type = token_type.trim();
        let identifier = identifier.trim();
        if token_type.is_empty() || identifier.is_empty() {
            return Err(CoreError::invalid_ref_token(s));
        }

        Ok(Self::new(token_type.to_lowercase(), identifier))
    }
}

impl Serialize for RefToken {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RefToken {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RefToken::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_token_roundtrip() {
        let token: RefToken = "subject:user1".parse().unwrap();
        assert_eq!(token.token_type, "subject");
        assert_eq!(token.identifier, "user1");
        assert_eq!(token.to_string(), "subject:user1");
    }

    #[test]
    fn test_ref_token_identifier_may_contain_colons() {
        let token: RefToken = "client:app:frontend".parse().unwrap();
        assert_eq!(token.token_type, "client");
        assert_eq!(token.identifier, "app:frontend");
    }

    #[test]
    fn test_ref_token_invalid() {
        assert!("user1".parse::<RefToken>().is_err());
        assert!(":user1".parse::<RefToken>().is_err());
        assert!("subject:".parse::<RefToken>().is_err());
    }

    #[test]
    fn test_generate_id_unique() {
        assert_ne!(generate_id(), generate_id());
    }
}
