//! Database models for users.

use crate::api::models::users::UserUpdate;
use crate::types::UserId;

/// Database request for creating a new user
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
}

impl UserCreateDBRequest {
    /// Build an insert request from the submitted email and an already-hashed password.
    /// New users are always active.
    pub fn new(email: String, hashed_password: String) -> Self {
        Self {
            email,
            hashed_password,
            is_active: true,
        }
    }
}

/// Database request for updating a user
#[derive(Debug, Clone)]
pub struct UserUpdateDBRequest {
    pub email: String,
}

impl From<UserUpdate> for UserUpdateDBRequest {
    fn from(api: UserUpdate) -> Self {
        Self { email: api.email }
    }
}

/// Database response for a user
#[derive(Debug, Clone, PartialEq)]
pub struct UserDBResponse {
    pub id: UserId,
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
}
