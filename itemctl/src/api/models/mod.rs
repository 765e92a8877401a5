//! API request and response data models.
//!
//! These structures define the public JSON contract. They are distinct from the database
//! models in [`crate::db::models`] so storage and API representations can evolve
//! independently (for example, users are stored with a password hash that no response
//! ever carries).
//!
//! - [`users`]: User creation/update requests and the user response with nested items
//! - [`items`]: Item creation/update requests and the item response
//! - [`pagination`]: `skip`/`limit` query parameters shared by list endpoints

pub mod items;
pub mod pagination;
pub mod users;
