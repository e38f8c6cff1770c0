//! # contentgraph-storage
//!
//! The boundary between the GraphQL layer and the rest of the system.
//!
//! This crate only defines traits and the types they exchange; stores,
//! URL generation and app configuration are provided by the host.
//!
//! ## Overview
//!
//! - [`ContentStore`]: query and find content items of a schema
//! - [`AssetStore`]: query and find assets
//! - [`UrlGenerator`]: public URLs of contents and assets
//! - [`AppProvider`]: the schemas of an app
//!
//! ## Example
//!
//! ```ignore
//! use contentgraph_storage::{ContentQuery, ContentStore, ODataQuery, StorageError};
//!
//! async fn first_page(
//!     store: &dyn ContentStore,
//!     app: &App,
//!     schema_id: Uuid,
//!     principal: &Principal,
//! ) -> Result<Vec<ContentItem>, StorageError> {
//!     let query = ContentQuery::OData(ODataQuery::new().with_top(20));
//!     let (_, result) = store.query_contents(app, schema_id, principal, &query).await?;
//!     Ok(result.items)
//! }
//! ```

mod error;
mod traits;
mod types;

use std::sync::Arc;

pub use error::StorageError;
pub use traits::{AppProvider, AssetStore, ContentStore, UrlGenerator};
pub use types::{ContentQuery, EtagVersion, ODataQuery, ResultList};

/// Shared content store trait object.
pub type DynContentStore = Arc<dyn ContentStore>;

/// Shared asset store trait object.
pub type DynAssetStore = Arc<dyn AssetStore>;

/// Shared URL generator trait object.
pub type DynUrlGenerator = Arc<dyn UrlGenerator>;

/// Shared app provider trait object.
pub type DynAppProvider = Arc<dyn AppProvider>;
