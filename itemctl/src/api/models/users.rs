//! API request/response models for users.

use crate::api::models::items::ItemResponse;
use crate::db::models::users::UserDBResponse;
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// User request models
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserCreate {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserUpdate {
    pub email: String,
}

// User response models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub is_active: bool,
    /// Items owned by this user, ordered by id
    #[serde(default)]
    pub items: Vec<ItemResponse>,
}

impl From<UserDBResponse> for UserResponse {
    fn from(db: UserDBResponse) -> Self {
        Self {
            id: db.id,
            email: db.email,
            is_active: db.is_active,
            items: Vec::new(), // Filled in by the handler when items are loaded
        }
    }
}

impl UserResponse {
    /// Create a response with the user's items included
    pub fn with_items(mut self, items: Vec<ItemResponse>) -> Self {
        self.items = items;
        self
    }
}

/// Confirmation body returned by update and delete routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_response_never_exposes_password() {
        let db = UserDBResponse {
            id: 7,
            email: "a@x.com".to_string(),
            hashed_password: "$argon2id$secret".to_string(),
            is_active: true,
        };

        let value = serde_json::to_value(UserResponse::from(db)).unwrap();
        assert_eq!(value, json!({ "id": 7, "email": "a@x.com", "is_active": true, "items": [] }));
    }

    #[test]
    fn test_user_create_requires_password() {
        let result = serde_json::from_value::<UserCreate>(json!({ "email": "a@x.com" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_with_items() {
        let user = UserResponse {
            id: 1,
            email: "a@x.com".to_string(),
            is_active: true,
            items: vec![],
        };
        let item = ItemResponse {
            id: 3,
            title: "t".to_string(),
            description: None,
            owner_id: 1,
        };

        let user = user.with_items(vec![item.clone()]);
        assert_eq!(user.items, vec![item]);
    }
}
