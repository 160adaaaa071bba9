use serde::{Deserialize, Serialize};

/// One entry of the search index document.
///
/// Field names are the contract with the client-side search widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Primary key of the search index.
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub title: String,
    pub tags: Vec<String>,
    /// Full plain-text body.
    pub content: String,
    pub section: String,
    pub summary: String,
    pub description: String,
    /// Site-relative permalink.
    pub url: String,
}
