use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::id::RefToken;
use crate::time::Timestamp;

/// Metadata of an uploaded binary asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetItem {
    pub id: Uuid,
    pub version: i64,
    pub created: Timestamp,
    pub created_by: RefToken,
    pub last_modified: Timestamp,
    pub last_modified_by: RefToken,
    pub file_name: String,
    pub file_size: i64,
    pub file_version: i64,
    pub mime_type: String,
    pub is_image: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_height: Option<i32>,
}
