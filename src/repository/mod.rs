//! Repository Layer
//!
//! Data access abstractions and implementations.

mod db;
mod settings_repo;
mod task_repo;
mod traits;

#[cfg(test)]
mod tests;

pub use db::init_db;
pub use settings_repo::{SettingsRepository, HAS_LAUNCHED_BEFORE};
pub use task_repo::TaskRepository;
pub use traits::{Repository, SearchableRepository};
