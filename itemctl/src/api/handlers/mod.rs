//! HTTP request handlers for the users and items API.
//!
//! Each handler takes a scoped session from the pool in [`crate::AppState`]: a pooled
//! connection for reads, a transaction for writes. Transactions roll back when dropped
//! without a commit, so an early return never leaves a partial write behind.

pub mod items;
pub mod users;
