//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with SQLite, following the
//! Repository pattern.
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - queries)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - database records)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   SQLite    │
//! └─────────────┘
//! ```
//!
//! # Sessions
//!
//! Repositories borrow a connection for their whole lifetime. Handlers obtain that
//! connection from the pool in [`crate::AppState`], either as a pooled connection for reads
//! or as a transaction for writes. Write transactions are opened with
//! [`pools::begin_write`] so they hold the SQLite write lock from the start:
//!
//! ```ignore
//! let mut tx = pools::begin_write(&pool).await?;
//! let mut repo = Users::new(&mut tx);
//! // ... operations ...
//! tx.commit().await?;
//! ```
//!
//! Both are returned to the pool when dropped; a transaction that was not committed is
//! rolled back.
//!
//! # Schema
//!
//! The schema lives in the `migrations/` directory and is applied on startup by
//! [`crate::migrator`].

pub mod errors;
pub mod handlers;
pub mod models;
pub mod pools;
