//! Kitchen domain model.
//!
//! # Responsibility
//! - Define canonical records for dish types, dishes and cooks.
//! - Own field-level validation shared by repositories and services.
//! - Define the paging envelope returned by list queries.
//!
//! # Invariants
//! - Every record is identified by a stable, non-nil UUID.
//! - A dish always references exactly one dish type.

pub mod cook;
pub mod dish;
pub mod dish_type;
pub mod page;
pub mod validation;
