use serde::{Deserialize, Serialize};

/// A named, persisted tag collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: Option<i64>,
    pub name: String,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Collection {
    pub fn new(name: String) -> Self {
        let now = now_timestamp();
        Self {
            id: None,
            name,
            tags: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Current UTC time in the storage timestamp format
pub fn now_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
