//! Domain Layer
//!
//! Core entities and business rules.

mod entity;
mod task;

pub use entity::{DomainError, DomainResult, Entity};
pub use task::Task;
