//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts (the entity store).
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes call the model's `validate()` before SQL mutations.
//! - Every multi-statement write runs in one IMMEDIATE transaction.
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`) in
//!   addition to DB transport errors.

pub mod assignment_repo;
pub mod cook_repo;
pub mod dish_repo;
pub mod dish_type_repo;
mod error;
mod schema;
mod sql;

pub use error::{EntityKind, RepoError, RepoResult};
