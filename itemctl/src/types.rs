//! Common type definitions.
//!
//! Entity ids are integers assigned by the database on insert. They are wrapped in type
//! aliases so signatures say which entity an id belongs to:
//!
//! - [`UserId`]: User account identifier
//! - [`ItemId`]: Item identifier

// Type aliases for IDs
pub type UserId = i64;
pub type ItemId = i64;
