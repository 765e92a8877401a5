//! Database models for items.

use crate::api::models::items::ItemCreate;
use crate::types::{ItemId, UserId};

/// Database request for creating a new item
#[derive(Debug, Clone)]
pub struct ItemCreateDBRequest {
    pub title: String,
    pub description: Option<String>,
    pub owner_id: UserId,
}

impl ItemCreateDBRequest {
    pub fn new(owner_id: UserId, create: ItemCreate) -> Self {
        Self {
            title: create.title,
            description: create.description,
            owner_id,
        }
    }
}

/// Database response for an item
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDBResponse {
    pub id: ItemId,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: UserId,
}
