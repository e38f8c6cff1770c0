use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::id::RefToken;
use crate::time::Timestamp;

/// Values of one field, keyed by partition key (`iv` or a language code).
pub type ContentFieldData = IndexMap<String, Value>;

/// Field values of a content item, keyed by field name.
pub type ContentData = IndexMap<String, ContentFieldData>;

/// A content item as returned by the content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: Uuid,
    pub schema_id: Uuid,
    pub version: i64,
    pub created: Timestamp,
    pub created_by: RefToken,
    pub last_modified: Timestamp,
    pub last_modified_by: RefToken,
    #[serde(default)]
    pub data: ContentData,
}

impl ContentItem {
    /// Raw values of a field, if the item has any for it.
    pub fn field(&self, name: &str) -> Option<&ContentFieldData> {
        self.data.get(name)
    }
}
