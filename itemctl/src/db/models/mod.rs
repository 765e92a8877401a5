//! Database record models matching table schemas.
//!
//! Each entity has a create request, an update request and a response record. Repositories
//! in [`crate::db::handlers`] accept the requests and return the responses; the row structs
//! that derive `sqlx::FromRow` stay private to the repositories.
//!
//! Database models are distinct from API models: a [`users::UserDBResponse`] carries the
//! password hash, the API's `UserResponse` never does.
//!
//! ```ignore
//! use itemctl::api::models::users::UserResponse;
//!
//! let db_user: UserDBResponse = /* ... */;
//! let api_response: UserResponse = db_user.into();
//! ```

pub mod items;
pub mod users;
