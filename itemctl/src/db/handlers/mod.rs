//! Repository implementations for database access.
//!
//! Repositories follow a consistent pattern and implement the [`Repository`] trait.
//!
//! Each repository:
//! - Wraps a borrowed SQLx connection or transaction (the caller's scoped session)
//! - Provides strongly-typed CRUD operations
//! - Returns domain models from [`crate::db::models`]
//!
//! Available repositories:
//!
//! - [`Users`]: User accounts
//! - [`Items`]: Items owned by users
//!
//! # Common Pattern
//!
//! ```ignore
//! use itemctl::db::handlers::{Repository, Users};
//!
//! async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//!     // Start a transaction
//!     let mut tx = pool.begin().await?;
//!
//!     // Create repository from transaction
//!     let mut repo = Users::new(&mut tx);
//!
//!     // Perform operations
//!     let user = repo.get_user_by_email("a@x.com").await?;
//!
//!     // Commit, or drop the transaction to roll back
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod items;
pub mod repository;
pub mod users;

pub use items::Items;
pub use repository::Repository;
pub use users::Users;
