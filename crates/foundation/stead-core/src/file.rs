//! Uploaded-file metadata.
//!
//! Client-side transient record. Never persisted on its own, only embedded
//! into parent documents (`images`, `host.avatar`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub url: String,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
    pub last_modified: i64,
}
