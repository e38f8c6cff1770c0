//! GraphQL configuration.
//!
//! This module provides configuration options for the GraphQL layer.
//! Configuration can be specified in the host's TOML file under the
//! `[graphql]` section.
//!
//! # Example Configuration
//!
//! ```toml
//! [graphql]
//! introspection = true
//! loader_delay_ms = 1
//! loader_max_batch_size = 1000
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::loaders::LoaderConfig;
use crate::schema::SchemaBuilderConfig;

/// GraphQL API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQLConfig {
    /// Enable GraphQL introspection queries.
    /// Default: true
    #[serde(default = "default_introspection")]
    pub introspection: bool,

    /// How long a reference loader waits for more keys before it fetches,
    /// in milliseconds.
    /// Default: 1
    #[serde(default = "default_loader_delay_ms")]
    pub loader_delay_ms: u64,

    /// Maximum number of keys in one grouped fetch.
    /// Default: 1000
    #[serde(default = "default_loader_max_batch_size")]
    pub loader_max_batch_size: usize,

    /// `top` passed to the asset store when resolving asset references.
    /// Default: unlimited (`u32::MAX`)
    #[serde(default = "default_asset_reference_limit")]
    pub asset_reference_limit: u32,
}

fn default_introspection() -> bool {
    true
}

fn default_loader_delay_ms() -> u64 {
    1
}

fn default_loader_max_batch_size() -> usize {
    1000
}

fn default_asset_reference_limit() -> u32 {
    u32::MAX
}

impl Default for GraphQLConfig {
    fn default() -> Self {
        Self {
            introspection: default_introspection(),
            loader_delay_ms: default_loader_delay_ms(),
            loader_max_batch_size: default_loader_max_batch_size(),
            asset_reference_limit: default_asset_reference_limit(),
        }
    }
}

impl GraphQLConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.loader_max_batch_size == 0 {
            return Err("graphql.loader_max_batch_size must be > 0".into());
        }
        if self.asset_reference_limit == 0 {
            return Err("graphql.asset_reference_limit must be > 0".into());
        }
        Ok(())
    }

    /// Converts this config to a SchemaBuilderConfig.
    #[must_use]
    pub fn to_compiler_config(&self) -> SchemaBuilderConfig {
        SchemaBuilderConfig {
            introspection_enabled: self.introspection,
        }
    }

    /// Converts this config to the settings of the per-request loaders.
    #[must_use]
    pub fn to_loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            delay: Duration::from_millis(self.loader_delay_ms),
            max_batch_size: self.loader_max_batch_size,
            asset_reference_limit: self.asset_reference_limit,
        }
    }
}
