use serde::{Deserialize, Serialize};

/// One catalog entry. `id` is the only field the availability check looks at;
/// `name`, `icon` and anything else in the source document ride along untouched,
/// whatever their JSON type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<serde_json::Value>,
    /// Descriptive fields we don't model, preserved as-is for listing.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ProductRecord {
    /// A record carrying nothing but its identifier.
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            icon: None,
            extra: serde_json::Map::new(),
        }
    }
}
