//! API request/response models for items.

use crate::db::models::items::ItemDBResponse;
use crate::types::{ItemId, UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Item request models
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

// Item response models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemResponse {
    pub id: ItemId,
    pub title: String,
    /// Always present in responses, `null` when the item has no description
    pub description: Option<String>,
    pub owner_id: UserId,
}

impl From<ItemDBResponse> for ItemResponse {
    fn from(db: ItemDBResponse) -> Self {
        Self {
            id: db.id,
            title: db.title,
            description: db.description,
            owner_id: db.owner_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_create_description_optional() {
        let create: ItemCreate = serde_json::from_value(json!({ "title": "t" })).unwrap();
        assert_eq!(create.title, "t");
        assert_eq!(create.description, None);
    }

    #[test]
    fn test_item_create_requires_title() {
        let result = serde_json::from_value::<ItemCreate>(json!({ "description": "no title" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_item_response_serializes_null_description() {
        let response = ItemResponse {
            id: 1,
            title: "t".to_string(),
            description: None,
            owner_id: 1,
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "id": 1, "title": "t", "description": null, "owner_id": 1 })
        );
    }
}
